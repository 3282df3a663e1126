//! Per-scene pipeline state machine.

use crate::{EventScheduler, NarrationAligner, OverlapValidator};
use cadence_core::{
    AlignmentOutcome, AlignmentRecord, EngineConfig, FailureKind, FailureReason, OverlapReport,
    ResolvedTimeline, SceneSpec, SceneState,
};
use cadence_error::{
    AlignmentError, AlignmentErrorKind, FootprintError, RunError, RunErrorKind, ScheduleError,
    ScheduleErrorKind,
};
use cadence_interface::{AudioProbe, FootprintProvider};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Tracks one scene's state and every state it has passed through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SceneTracker {
    scene_id: String,
    state: SceneState,
    history: Vec<SceneState>,
}

impl SceneTracker {
    /// Start tracking a pending scene.
    pub fn new(scene_id: impl Into<String>) -> Self {
        Self {
            scene_id: scene_id.into(),
            state: SceneState::Pending,
            history: vec![SceneState::Pending],
        }
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns `IllegalTransition` if the step is not allowed from the current
    /// state; the tracker is left unchanged.
    pub fn advance(&mut self, next: SceneState) -> Result<(), RunError> {
        if !self.state.can_transition_to(next) {
            return Err(RunError::new(RunErrorKind::IllegalTransition {
                scene: self.scene_id.clone(),
                from: self.state.to_string(),
                to: next.to_string(),
            }));
        }
        tracing::trace!(scene = %self.scene_id, from = %self.state, to = %next, "Scene transition");
        self.state = next;
        self.history.push(next);
        Ok(())
    }
}

/// Everything the engine learned about one scene in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct SceneReport {
    /// Scene identifier
    scene_id: String,
    /// Terminal state
    state: SceneState,
    /// States passed through, starting with `pending`
    history: Vec<SceneState>,
    /// Alignment record for QA review
    alignment: AlignmentRecord,
    /// Overlaps found at the sample points
    overlaps: Vec<OverlapReport>,
    /// Resolved timeline; present once scheduling succeeded
    timeline: Option<ResolvedTimeline>,
    /// Why the scene failed, if it did
    failure: Option<FailureReason>,
}

impl SceneReport {
    /// Report for a scene that did not run to a terminal state on its own.
    ///
    /// Its history is `[pending, failed]`; how far it got, if it ran at all, is
    /// unknown.
    pub fn aborted(scene: &SceneSpec, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            scene_id: scene.id().clone(),
            state: SceneState::Failed,
            history: vec![SceneState::Pending, SceneState::Failed],
            alignment: AlignmentRecord::unmeasured(scene.id().clone(), scene.expected_narration()),
            overlaps: Vec::new(),
            timeline: None,
            failure: Some(FailureReason::new(kind, scene.id().clone(), message)),
        }
    }

    /// Report for a scene that was never dispatched because the run was cancelled.
    pub fn cancelled(scene: &SceneSpec) -> Self {
        Self::aborted(
            scene,
            FailureKind::Cancelled,
            "run cancelled before the scene was dispatched",
        )
    }

    /// Whether the scene reached `passed`.
    pub fn passed(&self) -> bool {
        self.state == SceneState::Passed
    }

    /// Overlaps classified as significant.
    pub fn significant_overlaps(&self) -> impl Iterator<Item = &OverlapReport> {
        self.overlaps.iter().filter(|r| r.is_significant())
    }

    fn finish(
        mut tracker: SceneTracker,
        alignment: AlignmentRecord,
        overlaps: Vec<OverlapReport>,
        timeline: Option<ResolvedTimeline>,
        failure: Option<FailureReason>,
    ) -> Result<Self, RunError> {
        let terminal = if failure.is_some() {
            SceneState::Failed
        } else {
            SceneState::Passed
        };
        tracker.advance(terminal)?;
        if let Some(reason) = &failure {
            tracing::warn!(scene = %tracker.scene_id, kind = %reason.kind(), "{}", reason.message());
        } else {
            tracing::info!(scene = %tracker.scene_id, outcome = %alignment.outcome(), "Scene passed");
        }
        Ok(Self {
            scene_id: tracker.scene_id,
            state: tracker.state,
            history: tracker.history,
            alignment,
            overlaps,
            timeline,
            failure,
        })
    }
}

fn alignment_failure(err: &AlignmentError) -> FailureReason {
    match &err.kind {
        AlignmentErrorKind::MissingNarrationAudio { scene, .. } => {
            FailureReason::new(FailureKind::MissingNarrationAudio, scene.clone(), err.kind.to_string())
        }
        AlignmentErrorKind::ImplausibleSpeechRate { scene, .. } => {
            FailureReason::new(FailureKind::ImplausibleSpeechRate, scene.clone(), err.kind.to_string())
        }
    }
}

fn schedule_failure(err: &ScheduleError) -> FailureReason {
    match &err.kind {
        ScheduleErrorKind::UnresolvableDrift { scene, .. } => {
            FailureReason::new(FailureKind::UnresolvableDrift, scene.clone(), err.kind.to_string())
        }
        ScheduleErrorKind::InvalidSpeedFactor { scene, .. } => {
            FailureReason::new(FailureKind::ImplausibleSpeechRate, scene.clone(), err.kind.to_string())
        }
    }
}

fn footprint_failure(scene_id: &str, err: &FootprintError) -> FailureReason {
    FailureReason::new(FailureKind::FootprintUnavailable, scene_id, err.kind.to_string())
}

/// Drive one scene from `pending` to a terminal state.
///
/// Scene-fatal conditions end in a `failed` report rather than an error, so one
/// scene's failure never affects another. The scene plan is only read; measured
/// durations and resolved timestamps live in the report.
///
/// # Errors
///
/// Returns an error only for an illegal state transition.
#[tracing::instrument(skip_all, fields(scene = %scene.id()))]
pub fn run_scene(
    scene: &SceneSpec,
    probe: &dyn AudioProbe,
    footprints: &dyn FootprintProvider,
    config: &EngineConfig,
) -> Result<SceneReport, RunError> {
    let mut tracker = SceneTracker::new(scene.id().clone());
    let aligner = NarrationAligner::new(config);

    tracker.advance(SceneState::Aligning)?;
    let alignment = match aligner.measure(scene, probe) {
        Ok(alignment) => alignment,
        Err(e) => {
            let record = AlignmentRecord::unmeasured(scene.id().clone(), scene.expected_narration());
            return SceneReport::finish(tracker, record, Vec::new(), None, Some(alignment_failure(&e)));
        }
    };
    if let Err(e) = aligner.check_plausible(&alignment) {
        let record = alignment.failed_record();
        return SceneReport::finish(tracker, record, Vec::new(), None, Some(alignment_failure(&e)));
    }

    tracker.advance(SceneState::Scheduling)?;
    let schedule = match EventScheduler::new(config).resolve(scene, &alignment) {
        Ok(schedule) => schedule,
        Err(e) => {
            let record = alignment.failed_record();
            return SceneReport::finish(tracker, record, Vec::new(), None, Some(schedule_failure(&e)));
        }
    };
    if let Err(e) = schedule.check_order() {
        let record = schedule.record(AlignmentOutcome::Failed);
        return SceneReport::finish(tracker, record, Vec::new(), None, Some(schedule_failure(&e)));
    }
    let record = schedule.record(schedule.outcome());
    let timeline = schedule.timeline(*config.frame_rate());

    tracker.advance(SceneState::Validating)?;
    match OverlapValidator::new(config).validate(&timeline, footprints) {
        Ok(overlaps) => SceneReport::finish(tracker, record, overlaps, Some(timeline), None),
        Err(e) => {
            let failure = footprint_failure(scene.id(), &e);
            SceneReport::finish(tracker, record, Vec::new(), Some(timeline), Some(failure))
        }
    }
}
