//! Deployment configuration
//!
//! Gathers the deployment parameters from the environment, prompting
//! interactively for anything missing, and coerces each raw value per the
//! parameter table below. Resolution happens exactly once at startup; the
//! resulting [`Config`] is read-only for the rest of the run.

use crate::error::{ConvoyError, Result};
use std::io::{self, Write};

/// Target type a parameter's raw value is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
}

impl ParamKind {
    /// Name used in coercion-failure messages.
    pub fn label(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
        }
    }
}

/// One required parameter: environment key, help text shown in the
/// interactive prompt, and the declared target type.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub env: &'static str,
    pub help: &'static str,
    pub kind: ParamKind,
}

/// The fixed parameter table. Resolution and prompting follow this order.
pub const PARAMS: [ParamSpec; 6] = [
    ParamSpec {
        env: "YC_CLOUD_ID",
        help: "Id of the cloud",
        kind: ParamKind::String,
    },
    ParamSpec {
        env: "YC_FOLDER_ID",
        help: "Id of the folder",
        kind: ParamKind::String,
    },
    ParamSpec {
        env: "YC_TOKEN",
        help: "OAUTH token",
        kind: ParamKind::String,
    },
    ParamSpec {
        env: "YC_CR",
        help: "Container registry name",
        kind: ParamKind::String,
    },
    ParamSpec {
        env: "NUM_BACKENDS",
        help: "Number of healthcheck instances",
        kind: ParamKind::Integer,
    },
    ParamSpec {
        env: "DRY_RUN",
        help: "Do not apply changes",
        kind: ParamKind::Boolean,
    },
];

/// Derived variable the infrastructure templates expect.
const TF_REPLICATION_VAR: &str = "TF_VAR_replication";

/// Resolved deployment configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub cloud_id: String,
    pub folder_id: String,
    pub token: String,
    pub registry: String,
    pub replication: u32,
    pub dry_run: bool,
}

impl Config {
    /// Resolve every parameter, reading missing ones from stdin.
    pub fn load() -> Result<Self> {
        Self::load_with(prompt_stdin)
    }

    /// Resolve with a custom prompt function. The prompt is only invoked
    /// for parameters whose environment variable is unset.
    pub fn load_with(mut prompt: impl FnMut(&ParamSpec) -> io::Result<String>) -> Result<Self> {
        let [cloud, folder, token, registry, replication, dry_run] = &PARAMS;
        Ok(Self {
            cloud_id: resolve(cloud, &mut prompt)?,
            folder_id: resolve(folder, &mut prompt)?,
            token: resolve(token, &mut prompt)?,
            registry: resolve(registry, &mut prompt)?,
            replication: parse_integer(replication, &resolve(replication, &mut prompt)?)?,
            dry_run: parse_boolean(dry_run, &resolve(dry_run, &mut prompt)?)?,
        })
    }

    /// Serialize the configuration into the environment the provisioning
    /// tool inherits: every parameter under its own key, stringified, plus
    /// the derived replication variable.
    pub fn tool_env(&self) -> Vec<(String, String)> {
        let [cloud, folder, token, registry, replication, dry_run] = &PARAMS;
        vec![
            (cloud.env.to_string(), self.cloud_id.clone()),
            (folder.env.to_string(), self.folder_id.clone()),
            (token.env.to_string(), self.token.clone()),
            (registry.env.to_string(), self.registry.clone()),
            (replication.env.to_string(), self.replication.to_string()),
            (dry_run.env.to_string(), self.dry_run.to_string()),
            (TF_REPLICATION_VAR.to_string(), self.replication.to_string()),
        ]
    }
}

/// Read one parameter: the named environment variable if present, else one
/// line from the prompt.
fn resolve(
    spec: &ParamSpec,
    prompt: &mut impl FnMut(&ParamSpec) -> io::Result<String>,
) -> Result<String> {
    match std::env::var(spec.env) {
        Ok(value) => Ok(value),
        Err(_) => prompt(spec).map_err(|e| ConvoyError::Prompt {
            key: spec.env.to_string(),
            source: e,
        }),
    }
}

/// Default interactive prompt: one line from stdin.
fn prompt_stdin(spec: &ParamSpec) -> io::Result<String> {
    print!("Enter value for ${} ({}): ", spec.env, spec.help);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn parse_integer(spec: &ParamSpec, raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|_| ConvoyError::InvalidParameter {
            key: spec.env.to_string(),
            expected: spec.kind.label(),
            value: raw.to_string(),
        })
}

/// Boolean coercion. The empty string counts as false so an operator can
/// export `DRY_RUN=` to clear the flag.
pub fn parse_boolean(spec: &ParamSpec, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConvoyError::InvalidParameter {
            key: spec.env.to_string(),
            expected: spec.kind.label(),
            value: raw.to_string(),
        }),
    }
}
