//! Content-derived run identity.

use cadence_core::{LessonSpec, ProviderConfig, StyleTokens};
use cadence_error::{RunError, RunErrorKind};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Serialize)]
struct IdentityInputs<'a> {
    lesson: &'a LessonSpec,
    style: &'a StyleTokens,
    provider: &'a ProviderConfig,
}

/// Deterministic identifier of a run's inputs.
///
/// The SHA-256 of the canonical JSON encoding of the lesson plan, its style tokens,
/// and the provider configuration. Identical inputs always yield the same identity;
/// the short form names the run's artifact directory.
///
/// # Examples
///
/// ```rust,ignore
/// let identity = RunIdentity::compute(&lesson, &ProviderConfig::default())?;
/// assert_eq!(identity.id().len(), RunIdentity::SHORT_LEN);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunIdentity {
    id: String,
    digest: String,
}

impl RunIdentity {
    /// Hex characters of the digest used as the directory name.
    pub const SHORT_LEN: usize = 16;

    /// Hash the run inputs.
    ///
    /// # Errors
    ///
    /// Returns `Identity` if the inputs cannot be encoded.
    #[tracing::instrument(skip_all, fields(lesson = %lesson.id()))]
    pub fn compute(lesson: &LessonSpec, provider: &ProviderConfig) -> Result<Self, RunError> {
        let inputs = IdentityInputs {
            lesson,
            style: lesson.style(),
            provider,
        };
        let canonical = serde_json::to_vec(&inputs)
            .map_err(|e| RunError::new(RunErrorKind::Identity(e.to_string())))?;

        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        let digest = format!("{:x}", hasher.finalize());
        let id = digest[..Self::SHORT_LEN].to_string();

        tracing::debug!(run = %id, "Computed run identity");
        Ok(Self { id, digest })
    }

    /// Short identifier naming the artifact directory.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Full hex digest.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl std::fmt::Display for RunIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}
