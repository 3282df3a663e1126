//! Per-scene pipeline states and the failure taxonomy.

use serde::{Deserialize, Serialize};

/// Lifecycle of one scene within a run.
///
/// `pending → aligning → scheduling → validating → {passed | failed}`; a scene may
/// fail from any non-terminal state. Terminal states never change.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SceneState {
    /// Waiting for a worker
    #[display("pending")]
    Pending,
    /// Measuring narration audio
    #[display("aligning")]
    Aligning,
    /// Resolving event timestamps
    #[display("scheduling")]
    Scheduling,
    /// Checking footprint overlaps
    #[display("validating")]
    Validating,
    /// Completed without a fatal condition
    #[display("passed")]
    Passed,
    /// Stopped by a fatal condition
    #[display("failed")]
    Failed,
}

impl SceneState {
    /// Whether no further transition is allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SceneState::Passed | SceneState::Failed)
    }

    /// Whether moving from `self` to `next` is a legal step.
    pub fn can_transition_to(&self, next: SceneState) -> bool {
        use SceneState::*;
        match (self, next) {
            (Passed | Failed, _) => false,
            (_, Failed) => true,
            (Pending, Aligning) | (Aligning, Scheduling) | (Scheduling, Validating) => true,
            (Validating, Passed) => true,
            _ => false,
        }
    }
}

/// Why a scene (or the run) failed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum FailureKind {
    /// A narration chunk's audio artifact is missing or unreadable
    #[display("MissingNarrationAudio")]
    MissingNarrationAudio,
    /// Speed factor outside the plausibility band
    #[display("ImplausibleSpeechRate")]
    ImplausibleSpeechRate,
    /// Clamping would reorder events
    #[display("UnresolvableDrift")]
    UnresolvableDrift,
    /// The rendering layer could not supply a footprint sample
    #[display("FootprintUnavailable")]
    FootprintUnavailable,
    /// Significant overlap while overlaps are configured as fatal
    #[display("SignificantOverlap")]
    SignificantOverlap,
    /// The run was cancelled before the scene was dispatched
    #[display("Cancelled")]
    Cancelled,
    /// The scene's worker stopped without producing a report
    #[display("WorkerFailed")]
    WorkerFailed,
}

/// A failure kind with a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct FailureReason {
    /// Failure classification
    kind: FailureKind,
    /// Scene the failure belongs to
    scene_id: String,
    /// Explanation for QA review
    message: String,
}

impl FailureReason {
    /// Creates a failure reason.
    pub fn new(kind: FailureKind, scene_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            scene_id: scene_id.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in scene '{}': {}", self.kind, self.scene_id, self.message)
    }
}
