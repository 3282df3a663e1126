//! Artifact encoding errors.

/// A run artifact that could not be encoded as JSON.
///
/// Artifacts are the plain-data records of a run (`report.json`, `cues.json`, ...);
/// encoding only fails for values JSON cannot represent, such as a map keyed by a
/// non-string type.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: cannot encode {}: {} at line {} in {}", artifact, message, line, file)]
pub struct JsonError {
    /// Artifact name
    pub artifact: String,
    /// Encoder message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Record a failure to encode `artifact`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence_error::JsonError;
    ///
    /// let err = JsonError::new("cues.json", "key must be a string");
    /// assert!(err.to_string().contains("cannot encode cues.json"));
    /// ```
    #[track_caller]
    pub fn new(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            artifact: artifact.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
