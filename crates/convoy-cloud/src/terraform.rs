//! terraform CLI wrapper

use crate::error::Result;
use convoy_core::process;
use std::path::PathBuf;

/// terraform CLI wrapper
///
/// Carries the working directory holding the declarations and the
/// serialized configuration environment; both are applied on every
/// invocation so terraform inherits exactly what the run resolved.
pub struct Terraform {
    workdir: PathBuf,
    env: Vec<(String, String)>,
    program: String,
}

impl Terraform {
    pub fn new(workdir: impl Into<PathBuf>, env: Vec<(String, String)>) -> Self {
        Self {
            workdir: workdir.into(),
            env,
            program: "terraform".to_string(),
        }
    }

    /// Use a different executable in place of `terraform` (tests).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Run `terraform plan` and return its output for the operator.
    pub async fn plan(&self) -> Result<String> {
        tracing::info!("Running terraform plan");
        let output = process::run(&self.program, &["plan"], Some(&self.workdir), &self.env).await?;
        Ok(output)
    }

    /// Run `terraform apply`. Output streams straight to the terminal;
    /// `-auto-approve` keeps the step non-stop once the operator chose to
    /// apply.
    pub async fn apply(&self) -> Result<()> {
        tracing::info!("Running terraform apply");
        process::run_interactive(
            &self.program,
            &["apply", "-auto-approve"],
            Some(&self.workdir),
            &self.env,
        )
        .await?;
        Ok(())
    }
}
