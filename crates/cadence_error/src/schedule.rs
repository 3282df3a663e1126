//! Event scheduling error types.

/// Specific error conditions raised while resolving a scene's event timeline.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum ScheduleErrorKind {
    /// Clamping moved an event before the event that precedes it
    #[display(
        "Event '{}' in scene '{}' resolves to {:.3}s, before preceding event '{}' at {:.3}s",
        event,
        scene,
        resolved,
        previous,
        previous_resolved
    )]
    UnresolvableDrift {
        /// Scene identifier
        scene: String,
        /// The event that would move out of order
        event: String,
        /// Its resolved timestamp in seconds
        resolved: f64,
        /// The preceding event
        previous: String,
        /// The preceding event's resolved timestamp in seconds
        previous_resolved: f64,
    },
    /// The scene's speed factor was not strictly positive
    #[display("Scene '{}' has non-positive speed factor {}", scene, factor)]
    InvalidSpeedFactor {
        /// Scene identifier
        scene: String,
        /// Offending factor
        factor: f64,
    },
}

/// Error type for event scheduling.
///
/// # Examples
///
/// ```
/// use cadence_error::{ScheduleError, ScheduleErrorKind};
///
/// let err = ScheduleError::new(ScheduleErrorKind::InvalidSpeedFactor {
///     scene: "intro".to_string(),
///     factor: 0.0,
/// });
/// assert!(format!("{}", err).contains("non-positive"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Schedule Error: {} at line {} in {}", kind, line, file)]
pub struct ScheduleError {
    /// The specific error condition
    pub kind: ScheduleErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ScheduleError {
    /// Create a new ScheduleError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ScheduleErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
