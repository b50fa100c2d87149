//! Service definitions
//!
//! The three deployable units of the stack as a closed set. Each variant
//! supplies its name, how its image comes to exist, the runtime
//! environment its container starts with, and any config files it needs
//! generated before the build. The pipeline in [`crate::deploy`] sequences
//! those four pieces; nothing here talks to docker or terraform.

use convoy_core::{Config, Result, template};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tera::Context;

/// Database credentials baked into the stack. The application reaches the
/// database under the database service's name, so the connection string
/// embeds both.
const POSTGRES_USER: &str = "healthcheck";
const POSTGRES_PASSWORD: &str = "aefac2e2d9fccd1";

/// Fixed project-relative paths the pipeline reads and writes.
pub const NGINX_TEMPLATE: &str = "nginx/nginx.conf.tera";
pub const NGINX_OUTPUT: &str = "nginx/nginx.conf.generated";
pub const DECLARATION_TEMPLATE: &str = "terraform/docker/template.yaml.tera";
pub const DECLARATION_DIR: &str = "terraform/docker";
pub const TERRAFORM_DIR: &str = "terraform";

/// How a service's image comes to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Built locally from a context directory under the project root.
    Build(&'static str),
    /// Taken as-is from a public registry; no local build.
    Prebuilt(&'static str),
}

/// One deployable unit of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    ReverseProxy,
    Database,
    Application,
}

impl Service {
    /// The pipeline processes services in this order, always.
    pub const DEPLOY_ORDER: [Service; 3] =
        [Service::ReverseProxy, Service::Database, Service::Application];

    pub fn name(&self) -> &'static str {
        match self {
            Service::ReverseProxy => "nginx",
            Service::Database => "postgres",
            Service::Application => "healthcheck",
        }
    }

    pub fn image_source(&self) -> ImageSource {
        match self {
            Service::ReverseProxy => ImageSource::Build("nginx"),
            Service::Database => ImageSource::Prebuilt("postgres:13"),
            Service::Application => ImageSource::Build("app"),
        }
    }

    /// Runtime environment the service's container starts with. A service
    /// name used as a hostname here is a naming convention the declarations
    /// rely on, not an enforced dependency.
    pub fn environment(&self) -> BTreeMap<String, String> {
        match self {
            Service::ReverseProxy => BTreeMap::new(),
            Service::Database => BTreeMap::from([
                ("POSTGRES_USER".to_string(), POSTGRES_USER.to_string()),
                ("POSTGRES_PASSWORD".to_string(), POSTGRES_PASSWORD.to_string()),
            ]),
            Service::Application => BTreeMap::from([
                (
                    "NODE_DATABASE_URL".to_string(),
                    format!(
                        "postgres://{}:{}@{}/postgres",
                        POSTGRES_USER,
                        POSTGRES_PASSWORD,
                        Service::Database.name()
                    ),
                ),
                ("NODE_BIND_ADDRESS".to_string(), "0.0.0.0:80".to_string()),
            ]),
        }
    }

    /// Generate any config files the service needs before its image builds.
    /// Only the reverse proxy has one: the upstream list for the load
    /// balancer, one synthetic hostname per application replica.
    pub fn generate_configs(&self, root: &Path, config: &Config) -> Result<()> {
        match self {
            Service::ReverseProxy => {
                let mut ctx = Context::new();
                ctx.insert("backends", &backend_hostnames(config.replication));
                template::render_to_file(
                    &root.join(NGINX_TEMPLATE),
                    &root.join(NGINX_OUTPUT),
                    &ctx,
                )
            }
            Service::Database | Service::Application => Ok(()),
        }
    }
}

/// `healthcheck-0` … `healthcheck-(n-1)`: the hostnames the application
/// replicas are reachable under.
pub fn backend_hostnames(replication: u32) -> Vec<String> {
    (0..replication)
        .map(|i| format!("{}-{}", Service::Application.name(), i))
        .collect()
}

/// Output path of a service's rendered infrastructure declaration.
pub fn declaration_path(root: &Path, service: Service) -> PathBuf {
    root.join(DECLARATION_DIR)
        .join(format!("{}.generated.yaml", service.name()))
}
