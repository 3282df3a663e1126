//! Top-level error wrapper types.

use crate::{
    AlignmentError, ConfigError, FootprintError, JsonError, PlanError, RunError, ScheduleError,
    StorageError,
};

/// Every error condition the Cadence workspace can report.
///
/// # Examples
///
/// ```
/// use cadence_error::{CadenceError, ConfigError};
///
/// let config_err = ConfigError::new("engine.frame_rate", "must be at least 1");
/// let err: CadenceError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CadenceErrorKind {
    /// Lesson plan error
    #[from(PlanError)]
    Plan(PlanError),
    /// Narration alignment error
    #[from(AlignmentError)]
    Alignment(AlignmentError),
    /// Event scheduling error
    #[from(ScheduleError)]
    Schedule(ScheduleError),
    /// Rendered footprint error
    #[from(FootprintError)]
    Footprint(FootprintError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Artifact encoding error
    #[from(JsonError)]
    Json(JsonError),
    /// Artifact storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Run orchestration error
    #[from(RunError)]
    Run(RunError),
}

/// Cadence error with kind discrimination.
///
/// # Examples
///
/// ```
/// use cadence_error::{CadenceErrorKind, CadenceResult, PlanError, PlanErrorKind};
///
/// fn load() -> CadenceResult<()> {
///     Err(PlanError::new(PlanErrorKind::NoScenes("empty".to_string())))?
/// }
///
/// let err = load().unwrap_err();
/// assert!(matches!(err.kind(), CadenceErrorKind::Plan(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Cadence Error: {}", _0)]
pub struct CadenceError(Box<CadenceErrorKind>);

impl CadenceError {
    /// Create a new error from a kind.
    pub fn new(kind: CadenceErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CadenceErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to CadenceErrorKind
impl<T> From<T> for CadenceError
where
    T: Into<CadenceErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Cadence operations.
pub type CadenceResult<T> = std::result::Result<T, CadenceError>;
