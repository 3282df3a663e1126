//! Narration alignment error types.

/// Specific error conditions raised while aligning a scene's narration.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum AlignmentErrorKind {
    /// A chunk's synthesized audio is absent or could not be read
    #[display("Narration audio for chunk {} of scene '{}' is unavailable: {}", chunk, scene, reason)]
    MissingNarrationAudio {
        /// Scene identifier
        scene: String,
        /// Zero-based chunk index within the scene
        chunk: usize,
        /// Why the artifact could not be used
        reason: String,
    },
    /// Measured speech runs implausibly faster or slower than planned
    #[display(
        "Speed factor {:.3} for scene '{}' is outside the plausible band [{}, {}]",
        factor,
        scene,
        min,
        max
    )]
    ImplausibleSpeechRate {
        /// Scene identifier
        scene: String,
        /// Measured / expected ratio
        factor: f64,
        /// Lower edge of the plausibility band
        min: f64,
        /// Upper edge of the plausibility band
        max: f64,
    },
}

/// Error type for narration alignment.
///
/// # Examples
///
/// ```
/// use cadence_error::{AlignmentError, AlignmentErrorKind};
///
/// let err = AlignmentError::new(AlignmentErrorKind::ImplausibleSpeechRate {
///     scene: "intro".to_string(),
///     factor: 5.0,
///     min: 0.5,
///     max: 2.0,
/// });
/// assert!(format!("{}", err).contains("plausible band"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Alignment Error: {} at line {} in {}", kind, line, file)]
pub struct AlignmentError {
    /// The specific error condition
    pub kind: AlignmentErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl AlignmentError {
    /// Create a new AlignmentError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AlignmentErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
