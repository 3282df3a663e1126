//! Rendered footprint error types.

/// Kinds of footprint errors.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum FootprintErrorKind {
    /// The rendering collaborator could not supply a sample
    #[display("Footprints for scene '{}' at fraction {} are unavailable: {}", scene, fraction, reason)]
    Unavailable {
        /// Scene identifier
        scene: String,
        /// Sample fraction of the scene duration
        fraction: f64,
        /// Why the sample is missing
        reason: String,
    },
    /// A supplied footprint had an inverted or non-finite box
    #[display("Footprint '{}' in scene '{}' is malformed: {}", element, scene, reason)]
    Malformed {
        /// Scene identifier
        scene: String,
        /// Element identifier
        element: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Footprint error with location tracking.
///
/// # Examples
///
/// ```
/// use cadence_error::{FootprintError, FootprintErrorKind};
///
/// let err = FootprintError::new(FootprintErrorKind::Unavailable {
///     scene: "intro".to_string(),
///     fraction: 0.5,
///     reason: "snapshot missing".to_string(),
/// });
/// assert!(format!("{}", err).contains("unavailable"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Footprint Error: {} at line {} in {}", kind, line, file)]
pub struct FootprintError {
    /// The kind of error that occurred
    pub kind: FootprintErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl FootprintError {
    /// Create a new footprint error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FootprintErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
