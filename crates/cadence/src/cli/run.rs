//! Lesson run command handler.

use anyhow::{Context, Result};
use cadence_core::LessonSpec;
use cadence_run::{CadenceConfig, RunManager, RunOutcome};
use cadence_storage::{SnapshotFootprints, WavProbe};
use std::path::Path;
use std::sync::Arc;

/// Run every scene of the lesson at `lesson_path` and print a summary.
///
/// Ctrl-C cancels the run: scenes already running finish, the rest are reported
/// as cancelled.
///
/// Returns whether the run passed.
#[tracing::instrument(skip_all, fields(lesson = %lesson_path.display()))]
pub async fn run_lesson(lesson_path: &Path, config: &CadenceConfig) -> Result<bool> {
    let lesson = LessonSpec::from_file(lesson_path)
        .with_context(|| format!("Failed to load lesson plan {}", lesson_path.display()))?;

    let paths = config.paths();
    let manager = RunManager::new(
        config.engine().clone(),
        Arc::new(WavProbe::new(paths.audio_dir())),
        Arc::new(SnapshotFootprints::new(paths.footprint_dir())),
    );

    let cancel = manager.cancel_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling scenes not yet started");
            cancel.cancel();
        }
    });

    let outcome = manager
        .run(&lesson, config.provider(), paths.output_dir())
        .await;
    interrupt.abort();

    let outcome = outcome.context("Run did not complete")?;
    print_summary(&outcome);
    Ok(outcome.passed())
}

fn print_summary(outcome: &RunOutcome) {
    let report = outcome.report();

    println!("Run {} ({})", outcome.identity(), outcome.dir().display());
    for scene in report.scenes() {
        let factor = (*scene.alignment().speed_factor())
            .map(|f| format!("{:.3}", f))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<24} {:<10} speed {:>6}  overlaps {}",
            scene.scene_id(),
            scene.state().to_string(),
            factor,
            scene.overlaps().len()
        );
    }

    for scene in report.failed_scenes() {
        if let Some(failure) = scene.failure() {
            println!(
                "  {} failed: {} ({})",
                scene.scene_id(),
                failure.message(),
                failure.kind()
            );
        }
    }

    if *report.warnings() > 0 {
        println!("{} significant overlap(s) reported", report.warnings());
    }
    match report.verdict().reason() {
        None => println!("Verdict: passed"),
        Some(reason) => println!("Verdict: failed ({})", reason),
    }
}
