//! Lesson plan error types.

/// Specific error conditions for lesson plans.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum PlanErrorKind {
    /// Failed to read the lesson file
    #[display("Failed to read lesson file: {}", _0)]
    FileRead(String),
    /// Failed to parse lesson JSON
    #[display("Failed to parse lesson: {}", _0)]
    Parse(String),
    /// Lesson contains no scenes
    #[display("Lesson '{}' has no scenes", _0)]
    NoScenes(String),
    /// Two scenes share an identifier
    #[display("Scene id '{}' appears more than once", _0)]
    DuplicateScene(String),
    /// Two events in one scene share an identifier
    #[display("Event id '{}' appears more than once in scene '{}'", event, scene)]
    DuplicateEvent {
        /// Scene identifier
        scene: String,
        /// Event identifier
        event: String,
    },
    /// Scene expected duration is not strictly positive
    #[display("Scene '{}' has non-positive expected duration {}", scene, duration)]
    NonPositiveDuration {
        /// Scene identifier
        scene: String,
        /// Offending duration in seconds
        duration: f64,
    },
    /// Event timestamps decrease within a scene
    #[display("Event '{}' in scene '{}' is earlier than the event before it", event, scene)]
    EventsOutOfOrder {
        /// Scene identifier
        scene: String,
        /// Event identifier
        event: String,
    },
    /// Event timestamp outside [0, expected_duration]
    #[display(
        "Event '{}' in scene '{}' at {}s is outside [0, {}]",
        event,
        scene,
        at,
        duration
    )]
    EventOutOfRange {
        /// Scene identifier
        scene: String,
        /// Event identifier
        event: String,
        /// Logical timestamp in seconds
        at: f64,
        /// Scene expected duration in seconds
        duration: f64,
    },
    /// Chunk expected span is empty, inverted, or overlaps its predecessor
    #[display("Chunk {} in scene '{}' is not contiguous: {}", chunk, scene, reason)]
    ChunkSpan {
        /// Scene identifier
        scene: String,
        /// Zero-based chunk index
        chunk: usize,
        /// What is wrong with the span
        reason: String,
    },
    /// Event anchors to a chunk index that does not exist
    #[display("Event '{}' in scene '{}' anchors to missing chunk {}", event, scene, chunk)]
    UnknownAnchor {
        /// Scene identifier
        scene: String,
        /// Event identifier
        event: String,
        /// Anchor chunk index
        chunk: usize,
    },
}

/// Error type for lesson plan loading and validation.
///
/// # Examples
///
/// ```
/// use cadence_error::{PlanError, PlanErrorKind};
///
/// let err = PlanError::new(PlanErrorKind::NoScenes("lesson".to_string()));
/// assert!(format!("{}", err).contains("no scenes"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Plan Error: {} at line {} in {}", kind, line, file)]
pub struct PlanError {
    /// The specific error condition
    pub kind: PlanErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PlanError {
    /// Create a new PlanError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PlanErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
