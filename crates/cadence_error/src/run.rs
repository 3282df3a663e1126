//! Run orchestration error types.

/// Kinds of run-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RunErrorKind {
    /// A scene worker panicked or was aborted before reaching a terminal state
    #[display("Scene worker for '{}' did not complete: {}", scene, reason)]
    WorkerFailed {
        /// Scene identifier
        scene: String,
        /// Join failure description
        reason: String,
    },
    /// A scene attempted an illegal state transition
    #[display("Scene '{}' cannot move from {} to {}", scene, from, to)]
    IllegalTransition {
        /// Scene identifier
        scene: String,
        /// Current state
        from: String,
        /// Requested state
        to: String,
    },
    /// Failed to hash the run inputs
    #[display("Failed to compute run identity: {}", _0)]
    Identity(String),
}

/// Run error with location tracking.
///
/// # Examples
///
/// ```
/// use cadence_error::{RunError, RunErrorKind};
///
/// let err = RunError::new(RunErrorKind::Identity("bad input".to_string()));
/// assert!(format!("{}", err).contains("run identity"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Run Error: {} at line {} in {}", kind, line, file)]
pub struct RunError {
    /// The kind of error that occurred
    pub kind: RunErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RunError {
    /// Create a new run error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RunErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
