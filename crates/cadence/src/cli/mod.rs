//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the cadence binary.

mod commands;
mod run;
mod show;

pub use commands::{Cli, Commands};
pub use run::run_lesson;
pub use show::{show_config, show_identity};
