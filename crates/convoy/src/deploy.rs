//! Deployment pipeline
//!
//! Sequences every service through generate → build → tag → push →
//! declare, then hands the rendered declarations to terraform: plan is
//! always shown, apply only runs outside dry-run mode. Fail-fast: the
//! first error aborts the run and leaves whatever was already pushed or
//! written in place.

use crate::services::{self, ImageSource, Service};
use colored::Colorize;
use convoy_cloud::Terraform;
use convoy_container::{DockerCli, Image};
use convoy_core::{Config, template};
use serde::Serialize;
use std::path::Path;
use tera::Context;

/// Registry host the stack pushes to.
const REGISTRY_HOST: &str = "cr.yandex";

/// What the pipeline did for one service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceReport {
    pub name: String,
    pub image_tag: String,
    pub pushed: bool,
}

/// Run the full pipeline over all services, then terraform.
pub async fn run(root: &Path, config: &Config) -> anyhow::Result<()> {
    let docker = DockerCli::new();

    let mut reports = Vec::new();
    for service in Service::DEPLOY_ORDER {
        tracing::info!("Building service {}", service.name());
        println!("{}", format!("Deploying {}...", service.name()).green().bold());
        reports.push(build_service(root, config, &docker, service).await?);
    }

    let terraform = Terraform::new(root.join(services::TERRAFORM_DIR), config.tool_env());
    println!("{}", terraform.plan().await?);

    if config.dry_run {
        tracing::info!("Skipped terraform apply");
        println!("{}", "Dry run: skipped terraform apply".yellow());
    } else {
        terraform.apply().await?;
    }

    print_summary(&reports);
    Ok(())
}

/// One service's pass through the pipeline: configs, image, tag,
/// push-or-skip, declaration.
async fn build_service(
    root: &Path,
    config: &Config,
    docker: &DockerCli,
    service: Service,
) -> anyhow::Result<ServiceReport> {
    service.generate_configs(root, config)?;

    let mut image = match service.image_source() {
        ImageSource::Build(dir) => docker.build(&root.join(dir)).await?,
        ImageSource::Prebuilt(reference) => Image::prebuilt(reference),
    };

    docker.tag(&mut image, registry_tag(config, service)).await?;

    let pushed = if config.dry_run {
        tracing::info!("Skipped image uploading");
        println!("  {} push skipped (dry run)", "→".yellow());
        false
    } else {
        docker.push(&image).await?;
        true
    };

    write_declaration(root, service, &image)?;

    Ok(ServiceReport {
        name: service.name().to_string(),
        image_tag: image.tag().to_string(),
        pushed,
    })
}

/// The tag a service's image is pushed and declared under.
fn registry_tag(config: &Config, service: Service) -> String {
    format!(
        "{}/{}/{}:latest",
        REGISTRY_HOST,
        config.registry,
        service.name()
    )
}

/// Render the service's infrastructure declaration next to the terraform
/// sources.
fn write_declaration(root: &Path, service: Service, image: &Image) -> convoy_core::Result<()> {
    let mut ctx = Context::new();
    ctx.insert("image", image.tag());
    ctx.insert("env", &service.environment());
    template::render_to_file(
        &root.join(services::DECLARATION_TEMPLATE),
        &services::declaration_path(root, service),
        &ctx,
    )
}

fn print_summary(reports: &[ServiceReport]) {
    println!();
    println!("{}", "Summary:".bold());
    for report in reports {
        let status = if report.pushed {
            "pushed".green()
        } else {
            "push skipped".yellow()
        };
        println!(
            "  {} {}: {} ({})",
            "✓".green(),
            report.name,
            report.image_tag.cyan(),
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_tag_format() {
        let config = Config {
            cloud_id: "cloud-1".to_string(),
            folder_id: "folder-1".to_string(),
            token: "secret".to_string(),
            registry: "registry-1".to_string(),
            replication: 1,
            dry_run: false,
        };

        assert_eq!(
            registry_tag(&config, Service::ReverseProxy),
            "cr.yandex/registry-1/nginx:latest"
        );
        assert_eq!(
            registry_tag(&config, Service::Application),
            "cr.yandex/registry-1/healthcheck:latest"
        );
    }
}
