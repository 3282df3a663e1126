//! Read-only commands: effective configuration and run identity.

use anyhow::{Context, Result};
use cadence_core::LessonSpec;
use cadence_run::{CadenceConfig, RunIdentity};
use std::path::Path;

/// Print the effective configuration as TOML.
pub fn show_config(config: &CadenceConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Print the identity a run of the lesson at `lesson_path` would have.
pub fn show_identity(lesson_path: &Path, config: &CadenceConfig) -> Result<()> {
    let lesson = LessonSpec::from_file(lesson_path)
        .with_context(|| format!("Failed to load lesson plan {}", lesson_path.display()))?;
    let identity = RunIdentity::compute(&lesson, config.provider())?;

    println!("{}", identity.id());
    println!("digest: {}", identity.digest());
    println!(
        "directory: {}",
        config.paths().output_dir().join(identity.id()).display()
    );
    Ok(())
}
