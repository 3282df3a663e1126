//! Per-run artifact directory.

use cadence_error::{CadenceResult, JsonError, StorageError, StorageErrorKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// A written artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ArtifactRef {
    /// File name within the run directory
    name: String,
    /// Full path
    path: PathBuf,
    /// SHA-256 of the file contents, hex encoded
    sha256: String,
    /// File size in bytes
    size_bytes: u64,
}

/// Artifact directory of one run.
///
/// Runs with the same identity share a directory, so re-running the same inputs
/// overwrites the same artifacts and distinct inputs never collide.
///
/// # Structure
///
/// ```text
/// {root}/{run_id}/
/// ├── run.json        (identity and inputs)
/// ├── timeline.json   (per-scene resolved timelines)
/// ├── report.json     (verdict, alignment records, overlaps)
/// └── cues.json       (lesson-wide cue list; successful runs only)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    run_id: String,
    dir: PathBuf,
}

impl RunLayout {
    /// Run inputs and identity.
    pub const RUN: &'static str = "run.json";
    /// Resolved timelines.
    pub const TIMELINE: &'static str = "timeline.json";
    /// QA report.
    pub const REPORT: &'static str = "report.json";
    /// Renderer cue list.
    pub const CUES: &'static str = "cues.json";

    /// Create the directory for `run_id` under `root`.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(root))]
    pub fn create(root: impl AsRef<Path>, run_id: &str) -> Result<Self, StorageError> {
        let dir = root.as_ref().join(run_id);

        std::fs::create_dir_all(&dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;

        tracing::debug!(path = %dir.display(), "Prepared run directory");
        Ok(Self {
            run_id: run_id.to_string(),
            dir,
        })
    }

    /// Run identity this directory belongs to.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// The run directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of artifact `name`.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Whether artifact `name` exists.
    pub async fn exists(&self, name: &str) -> bool {
        tokio::fs::try_exists(self.path(name)).await.unwrap_or(false)
    }

    /// Serialize `value` as pretty JSON into artifact `name`.
    ///
    /// The file is written next to its destination and renamed into place, so a
    /// reader never observes a partial artifact.
    ///
    /// # Errors
    ///
    /// Returns error if serialization, the write, or the rename fails.
    #[tracing::instrument(skip(self, value), fields(run = %self.run_id))]
    pub async fn write_json<T: Serialize>(&self, name: &str, value: &T) -> CadenceResult<ArtifactRef> {
        let data =
            serde_json::to_vec_pretty(value).map_err(|e| JsonError::new(name, e.to_string()))?;
        let path = self.path(name);
        let temp_path = path.with_extension("json.tmp");

        tokio::fs::write(&temp_path, &data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        let sha256 = compute_hash(&data);
        tracing::debug!(path = %path.display(), size = data.len(), hash = %sha256, "Wrote artifact");

        Ok(ArtifactRef {
            name: name.to_string(),
            path,
            sha256,
            size_bytes: data.len() as u64,
        })
    }

    /// Read artifact `name` back.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the artifact is absent, `FileRead` if it cannot be read,
    /// or `InvalidArtifact` if its contents do not parse as `T`.
    pub async fn read_json<T: DeserializeOwned>(&self, name: &str) -> CadenceResult<T> {
        let path = self.path(name);
        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(path.display().to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;
        Ok(serde_json::from_slice(&data).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidArtifact(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?)
    }

    /// Remove artifact `name` if present.
    ///
    /// Used to drop a stale cue list when a re-run of the same identity fails.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be removed.
    pub async fn remove(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "remove {}: {}",
                path.display(),
                e
            )))),
        }
    }
}

/// SHA-256 of `data`, hex encoded.
fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
