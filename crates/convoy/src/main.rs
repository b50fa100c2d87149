mod deploy;
mod services;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "convoy")]
#[command(about = "Build, push and provision the health-check stack", long_about = None)]
struct Cli {
    /// Project root containing nginx/, app/ and terraform/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build all images, render declarations and provision the stack
    Deploy {
        /// Preview only: skip image pushes and terraform apply
        #[arg(long)]
        dry_run: bool,
    },
    /// Same as deploy --dry-run: stop after terraform plan
    Plan,
    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Version needs no configuration
    if matches!(cli.command, Commands::Version) {
        println!("convoy {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // A dry-run request from the command line is published as the DRY_RUN
    // parameter before the configuration resolves, so the loader neither
    // prompts for it nor contradicts the flag.
    let force_dry_run = matches!(
        cli.command,
        Commands::Plan | Commands::Deploy { dry_run: true }
    );
    if force_dry_run {
        // SAFETY: set before any configuration read and before the pipeline
        // spawns anything that looks at the environment
        unsafe {
            std::env::set_var("DRY_RUN", "true");
        }
    }

    let config = convoy_core::Config::load()?;

    match cli.command {
        Commands::Deploy { .. } | Commands::Plan => {
            deploy::run(&cli.root, &config).await?;
        }
        Commands::Version => {
            unreachable!("Version is handled before config loading");
        }
    }

    Ok(())
}
