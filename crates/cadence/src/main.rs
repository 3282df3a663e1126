//! Cadence CLI binary.
//!
//! This binary provides command-line access to Cadence's functionality:
//! - Run a lesson plan and write its timeline, report, and cue artifacts
//! - Print the run identity of a lesson plan
//! - Print the effective configuration

use cadence::observability::{ObservabilityConfig, init_observability};
use cadence_run::CadenceConfig;
use clap::Parser;
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    use cli::{Cli, Commands, run_lesson, show_config, show_identity};

    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    init_observability(&ObservabilityConfig::new(log_level).with_json_logs(cli.json_logs))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = CadenceConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { lesson, overrides } => {
            let config = overrides.apply(config)?;
            if !run_lesson(&lesson, &config).await? {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Identity { lesson } => {
            show_identity(&lesson, &config)?;
        }

        Commands::Config { overrides } => {
            show_config(&overrides.apply(config)?)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
