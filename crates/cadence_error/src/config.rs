//! Configuration errors.

/// A configuration source or setting that Cadence cannot use.
///
/// `setting` names what was rejected: a dotted key such as
/// `engine.clamp_tolerance_ms` for an inconsistent value, or the source
/// (a file path, `layered configuration`) when it could not be read at all.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {}: {} at line {} in {}", setting, message, line, file)]
pub struct ConfigError {
    /// Rejected setting or source
    pub setting: String,
    /// What is wrong with it
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Reject `setting` with an explanation.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence_error::ConfigError;
    ///
    /// let err = ConfigError::new("engine.frame_rate", "must be at least 1");
    /// assert_eq!(err.setting, "engine.frame_rate");
    /// assert!(err.to_string().contains("engine.frame_rate: must be at least 1"));
    /// ```
    #[track_caller]
    pub fn new(setting: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            setting: setting.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
