//! Concurrent scene orchestration.

use crate::{CueFile, RunIdentity, RunRecord, RunReport, TimelineFile, Verdict};
use cadence_core::{EngineConfig, FailureKind, LessonSpec, ProviderConfig};
use cadence_error::{CadenceResult, RunError, RunErrorKind};
use cadence_interface::{AudioProbe, FootprintProvider};
use cadence_storage::{ArtifactRef, RunLayout};
use cadence_timeline::{SceneReport, run_scene};
use chrono::Utc;
use derive_getters::Getters;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Result of a completed run.
#[derive(Debug, Clone, Getters)]
pub struct RunOutcome {
    /// Identity of the run's inputs
    identity: RunIdentity,
    /// Artifact directory
    dir: PathBuf,
    /// Verdict and per-scene reports
    report: RunReport,
    /// Artifacts written, in write order
    artifacts: Vec<ArtifactRef>,
}

impl RunOutcome {
    /// Whether the run passed.
    pub fn passed(&self) -> bool {
        self.report.verdict().passed()
    }
}

/// Runs every scene of a lesson and renders one verdict.
///
/// Scenes are independent tasks bounded by `max_concurrency`; their reports are
/// joined by scene index so output order never depends on completion order.
///
/// # Example
///
/// ```rust,ignore
/// let manager = RunManager::new(config, Arc::new(WavProbe::new("audio")), Arc::new(footprints));
/// let outcome = manager.run(&lesson, &ProviderConfig::default(), Path::new("runs")).await?;
/// println!("{}: {}", outcome.identity(), outcome.report().verdict());
/// ```
pub struct RunManager {
    config: Arc<EngineConfig>,
    probe: Arc<dyn AudioProbe>,
    footprints: Arc<dyn FootprintProvider>,
    cancel: CancellationToken,
}

impl RunManager {
    /// Create a run manager applying `config`.
    pub fn new(
        config: EngineConfig,
        probe: Arc<dyn AudioProbe>,
        footprints: Arc<dyn FootprintProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            probe,
            footprints,
            cancel: CancellationToken::new(),
        }
    }

    /// Use `cancel` as this manager's cancellation signal.
    ///
    /// Cancelling stops dispatch of scenes that have not started; scenes already
    /// running finish to a terminal state.
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A handle that cancels this manager's runs.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate, execute, and persist a full run of `lesson` under `output_root`.
    ///
    /// `report.json` and `timeline.json` are always written; `cues.json` only when
    /// the run passes, and a stale one from an earlier failed run is removed.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration or lesson plan or an unwritable
    /// artifact directory. Scene failures, including a worker that panicked, are not
    /// errors; they are reported in the verdict.
    #[tracing::instrument(skip_all, fields(lesson = %lesson.id()))]
    pub async fn run(
        &self,
        lesson: &LessonSpec,
        provider: &ProviderConfig,
        output_root: &Path,
    ) -> CadenceResult<RunOutcome> {
        self.config.validate()?;
        lesson.validate()?;

        let identity = RunIdentity::compute(lesson, provider)?;
        let layout = RunLayout::create(output_root, identity.id())?;
        tracing::info!(run = %identity, dir = %layout.dir().display(), scenes = lesson.scenes().len(), "Starting run");
        if layout.exists(RunLayout::REPORT).await {
            tracing::info!(run = %identity, "Replacing artifacts of an earlier run with the same inputs");
        }

        let mut artifacts = Vec::new();
        let record = RunRecord::new(identity.clone(), lesson, provider, &self.config);
        artifacts.push(layout.write_json(RunLayout::RUN, &record).await?);

        let started_at = Utc::now();
        let scenes = self.execute(lesson).await?;
        let finished_at = Utc::now();

        let verdict = Verdict::evaluate(&scenes, &self.config);
        let timelines = TimelineFile::from_reports(identity.id(), &scenes);
        artifacts.push(layout.write_json(RunLayout::TIMELINE, &timelines).await?);

        let cues = verdict
            .passed()
            .then(|| CueFile::from_reports(identity.id(), lesson.id().clone(), &scenes, *self.config.frame_rate()))
            .flatten();

        let report = RunReport::new(
            identity.id(),
            lesson.id().clone(),
            started_at,
            finished_at,
            verdict,
            scenes,
        );
        artifacts.push(layout.write_json(RunLayout::REPORT, &report).await?);

        match cues {
            Some(cues) => artifacts.push(layout.write_json(RunLayout::CUES, &cues).await?),
            None => layout.remove(RunLayout::CUES).await?,
        }

        match report.verdict().reason() {
            None => tracing::info!(run = %identity, warnings = report.warnings(), "Run passed"),
            Some(reason) => tracing::warn!(run = %identity, %reason, "Run failed"),
        }

        Ok(RunOutcome {
            identity,
            dir: layout.dir().to_path_buf(),
            report,
            artifacts,
        })
    }

    /// Run every scene of `lesson` and return their reports in plan order.
    ///
    /// A scene is dispatched only once a concurrency slot is free. If the run is
    /// cancelled first, it and every later scene are reported as cancelled. A
    /// worker that panics yields a `WorkerFailed` report for its scene; siblings
    /// are unaffected. Returns once every scene has reached a terminal state.
    ///
    /// # Errors
    ///
    /// Returns `WorkerFailed` if the concurrency limiter is closed.
    #[tracing::instrument(skip_all, fields(scenes = lesson.scenes().len(), limit = self.config.max_concurrency()))]
    pub async fn execute(&self, lesson: &LessonSpec) -> Result<Vec<SceneReport>, RunError> {
        let scenes = lesson.scenes();
        let semaphore = Arc::new(Semaphore::new(*self.config.max_concurrency()));
        let mut tasks = JoinSet::new();
        let mut task_index = HashMap::new();
        let mut slots: Vec<Option<SceneReport>> = scenes.iter().map(|_| None).collect();

        for (index, scene) in scenes.iter().enumerate() {
            let permit = tokio::select! {
                biased;
                () = self.cancel.cancelled() => None,
                acquired = Arc::clone(&semaphore).acquire_owned() => {
                    Some(acquired.map_err(|e| {
                        RunError::new(RunErrorKind::WorkerFailed {
                            scene: scene.id().clone(),
                            reason: e.to_string(),
                        })
                    })?)
                }
            };

            let Some(permit) = permit.filter(|_| !self.cancel.is_cancelled()) else {
                tracing::info!(scene = %scene.id(), "Run cancelled, scene not dispatched");
                slots[index] = Some(SceneReport::cancelled(scene));
                continue;
            };

            let scene = scene.clone();
            let config = Arc::clone(&self.config);
            let probe = Arc::clone(&self.probe);
            let footprints = Arc::clone(&self.footprints);

            tracing::debug!(scene = %scene.id(), index, "Dispatching scene");
            let handle = tasks.spawn_blocking(move || {
                let _permit = permit;
                run_scene(&scene, probe.as_ref(), footprints.as_ref(), &config)
            });
            task_index.insert(handle.id(), index);
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, result) = match joined {
                Ok((id, result)) => (id, result.map_err(|e| e.to_string())),
                Err(e) => (e.id(), Err(e.to_string())),
            };
            let Some(&index) = task_index.get(&id) else {
                continue;
            };
            let report = result.unwrap_or_else(|reason| {
                tracing::error!(scene = %scenes[index].id(), %reason, "Scene worker did not complete");
                SceneReport::aborted(&scenes[index], FailureKind::WorkerFailed, reason)
            });
            slots[index] = Some(report);
        }

        slots
            .into_iter()
            .zip(scenes)
            .map(|(slot, scene)| {
                slot.ok_or_else(|| {
                    RunError::new(RunErrorKind::WorkerFailed {
                        scene: scene.id().clone(),
                        reason: "no report was produced".to_string(),
                    })
                })
            })
            .collect()
    }
}
