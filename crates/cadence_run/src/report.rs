//! Run artifacts: inputs record, verdict, QA report, resolved timelines, and cues.

use crate::RunIdentity;
use cadence_core::{
    AlignmentOutcome, EngineConfig, EventKind, FailureKind, FailureReason, LessonSpec,
    ProviderConfig, ResolvedTimeline, StyleTokens,
};
use cadence_timeline::SceneReport;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Pass/fail outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// No fatal condition in any scene
    Passed,
    /// At least one fatal condition; `reason` is the first in scene order
    Failed {
        /// First fatal reason
        reason: FailureReason,
    },
}

impl Verdict {
    /// Decide the run's verdict from its scene reports, in scene order.
    ///
    /// Any failed scene fails the run. Significant overlaps fail it only when
    /// `fatal_significant_overlaps` is set; otherwise they are warnings.
    pub fn evaluate(reports: &[SceneReport], config: &EngineConfig) -> Self {
        for report in reports {
            if let Some(reason) = report.failure() {
                return Verdict::Failed {
                    reason: reason.clone(),
                };
            }
            if *config.fatal_significant_overlaps() {
                if let Some(overlap) = report.significant_overlaps().next() {
                    let (a, b) = overlap.elements();
                    return Verdict::Failed {
                        reason: FailureReason::new(
                            FailureKind::SignificantOverlap,
                            report.scene_id().clone(),
                            format!(
                                "'{}' and '{}' overlap by {:.3} at {:.2}s",
                                a,
                                b,
                                overlap.overlap_area(),
                                overlap.sample_time()
                            ),
                        ),
                    };
                }
            }
        }
        Verdict::Passed
    }

    /// Whether the run passed.
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }

    /// First fatal reason, if the run failed.
    pub fn reason(&self) -> Option<&FailureReason> {
        match self {
            Verdict::Passed => None,
            Verdict::Failed { reason } => Some(reason),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Passed => write!(f, "passed"),
            Verdict::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Contents of `run.json`: what went into the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct RunRecord {
    /// Run identity
    identity: RunIdentity,
    /// Lesson identifier
    lesson_id: String,
    /// Lesson topic
    topic: String,
    /// Scene identifiers in plan order
    scenes: Vec<String>,
    /// Style tokens hashed into the identity
    style: StyleTokens,
    /// Provider settings hashed into the identity
    provider: ProviderConfig,
    /// Engine settings the run applied
    engine: EngineConfig,
}

impl RunRecord {
    /// Describe a run of `lesson`.
    pub fn new(
        identity: RunIdentity,
        lesson: &LessonSpec,
        provider: &ProviderConfig,
        engine: &EngineConfig,
    ) -> Self {
        Self {
            identity,
            lesson_id: lesson.id().clone(),
            topic: lesson.topic().clone(),
            scenes: lesson.scenes().iter().map(|s| s.id().clone()).collect(),
            style: lesson.style().clone(),
            provider: provider.clone(),
            engine: engine.clone(),
        }
    }
}

/// Contents of `report.json`: everything needed for QA review.
///
/// Always written, whether or not the run passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct RunReport {
    /// Run identifier
    run_id: String,
    /// Lesson identifier
    lesson_id: String,
    /// When scene dispatch began
    started_at: DateTime<Utc>,
    /// When the last scene reached a terminal state
    finished_at: DateTime<Utc>,
    /// Pass/fail with the first fatal reason
    verdict: Verdict,
    /// Significant overlaps across all scenes
    warnings: usize,
    /// Per-scene reports in plan order
    scenes: Vec<SceneReport>,
}

impl RunReport {
    /// Assemble a report; `scenes` must be in plan order.
    pub fn new(
        run_id: impl Into<String>,
        lesson_id: impl Into<String>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        verdict: Verdict,
        scenes: Vec<SceneReport>,
    ) -> Self {
        let warnings = scenes.iter().map(|s| s.significant_overlaps().count()).sum();
        Self {
            run_id: run_id.into(),
            lesson_id: lesson_id.into(),
            started_at,
            finished_at,
            verdict,
            warnings,
            scenes,
        }
    }

    /// Scenes that failed, in plan order.
    pub fn failed_scenes(&self) -> impl Iterator<Item = &SceneReport> {
        self.scenes.iter().filter(|s| !s.passed())
    }
}

/// Contents of `timeline.json`: resolved timelines handed to the renderer.
///
/// Holds every scene that completed scheduling, in plan order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct TimelineFile {
    /// Run identifier
    run_id: String,
    /// Resolved timelines
    timelines: Vec<ResolvedTimeline>,
}

impl TimelineFile {
    /// Collect the resolved timelines of `reports`.
    pub fn from_reports(run_id: impl Into<String>, reports: &[SceneReport]) -> Self {
        Self {
            run_id: run_id.into(),
            timelines: reports.iter().filter_map(|r| r.timeline().clone()).collect(),
        }
    }
}

/// One cue in lesson time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct CueEntry {
    /// Event identifier
    event_id: String,
    /// Visual action
    kind: EventKind,
    /// Target element
    target: String,
    /// Seconds from scene start
    at: f64,
    /// Seconds from lesson start
    lesson_at: f64,
    /// Frame from lesson start
    frame: u64,
    /// Whether the time was clamped
    clamped: bool,
}

/// Cues of one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct SceneCues {
    /// Scene identifier
    scene_id: String,
    /// Speed factor applied
    speed_factor: f64,
    /// Alignment outcome
    outcome: AlignmentOutcome,
    /// Scene start in lesson time, seconds
    start: f64,
    /// Corrected scene duration, seconds
    duration: f64,
    /// Cues in event order
    cues: Vec<CueEntry>,
}

impl SceneCues {
    /// Resolved timestamps in event order.
    pub fn timestamps(&self) -> Vec<f64> {
        self.cues.iter().map(|c| c.at).collect()
    }
}

/// Contents of `cues.json`: the lesson-wide cue list for downstream assembly.
///
/// Written only when the run passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct CueFile {
    /// Run identifier
    run_id: String,
    /// Lesson identifier
    lesson_id: String,
    /// Frames per second of every frame number
    frame_rate: u32,
    /// Corrected lesson duration, seconds
    duration: f64,
    /// Scenes in plan order
    scenes: Vec<SceneCues>,
}

impl CueFile {
    /// Lay the scenes end to end in plan order.
    ///
    /// Returns `None` if any scene lacks a resolved timeline.
    pub fn from_reports(
        run_id: impl Into<String>,
        lesson_id: impl Into<String>,
        reports: &[SceneReport],
        frame_rate: u32,
    ) -> Option<Self> {
        let mut start = 0.0;
        let mut scenes = Vec::with_capacity(reports.len());

        for report in reports {
            let timeline = report.timeline().as_ref()?;
            let cues = timeline
                .cues()
                .iter()
                .map(|cue| {
                    let lesson_at = start + cue.at();
                    CueEntry {
                        event_id: cue.event_id().clone(),
                        kind: *cue.kind(),
                        target: cue.target().clone(),
                        at: *cue.at(),
                        lesson_at,
                        frame: (lesson_at * f64::from(frame_rate)).round().max(0.0) as u64,
                        clamped: *cue.clamped(),
                    }
                })
                .collect();

            scenes.push(SceneCues {
                scene_id: report.scene_id().clone(),
                speed_factor: *timeline.speed_factor(),
                outcome: *report.alignment().outcome(),
                start,
                duration: *timeline.duration(),
                cues,
            });
            start += timeline.duration();
        }

        Some(Self {
            run_id: run_id.into(),
            lesson_id: lesson_id.into(),
            frame_rate,
            duration: start,
            scenes,
        })
    }
}
