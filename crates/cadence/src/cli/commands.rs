//! CLI command definitions.

use cadence_error::ConfigError;
use cadence_run::CadenceConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Cadence - narration-synchronized timelines for generated lesson videos
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(about = "Align narration with visual events and validate scene layouts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file applied over the bundled and user defaults
    #[arg(short, long, global = true, env = "CADENCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every scene of a lesson plan and write its artifacts
    Run {
        /// Path to the lesson plan JSON file
        lesson: PathBuf,

        #[command(flatten)]
        overrides: RunOverrides,
    },

    /// Print the run identity of a lesson plan under the current configuration
    Identity {
        /// Path to the lesson plan JSON file
        lesson: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config {
        #[command(flatten)]
        overrides: RunOverrides,
    },
}

/// Flags that override the loaded configuration.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct RunOverrides {
    /// Root directory for run artifacts
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Root directory that narration audio paths are resolved against
    #[arg(long)]
    pub audio_dir: Option<PathBuf>,

    /// Directory of per-scene footprint snapshots
    #[arg(long)]
    pub footprints: Option<PathBuf>,

    /// Fail the run on significant overlaps instead of warning
    #[arg(long)]
    pub fatal_overlaps: bool,

    /// Maximum number of scenes processed at once
    #[arg(short = 'j', long)]
    pub max_concurrency: Option<usize>,
}

impl RunOverrides {
    /// Apply the flags that were given on top of `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the overridden engine settings are inconsistent.
    pub fn apply(&self, config: CadenceConfig) -> Result<CadenceConfig, ConfigError> {
        let mut engine = config.engine().clone();
        if self.fatal_overlaps {
            engine = engine.with_fatal_significant_overlaps(true);
        }
        if let Some(limit) = self.max_concurrency {
            engine = engine.with_max_concurrency(limit);
        }
        engine.validate()?;

        let mut paths = config.paths().clone();
        if let Some(dir) = &self.output {
            paths = paths.with_output_dir(dir.clone());
        }
        if let Some(dir) = &self.audio_dir {
            paths = paths.with_audio_dir(dir.clone());
        }
        if let Some(dir) = &self.footprints {
            paths = paths.with_footprint_dir(dir.clone());
        }

        Ok(config.with_engine(engine).with_paths(paths))
    }
}
