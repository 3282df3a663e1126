//! WAV header probing.

use cadence_core::NarrationChunk;
use cadence_error::{StorageError, StorageErrorKind};
use cadence_interface::{AudioInfo, AudioProbe};
use std::path::{Path, PathBuf};

/// Reads narration durations from WAV headers under an audio root.
///
/// Chunk audio paths are resolved relative to the root. Only the header is read.
#[derive(Debug, Clone)]
pub struct WavProbe {
    root: PathBuf,
}

impl WavProbe {
    /// Create a probe resolving chunk paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The audio root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the header of the WAV file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing file and `FileRead` for anything hound
    /// cannot parse.
    pub fn read_header(path: &Path) -> Result<AudioInfo, StorageError> {
        let reader = hound::WavReader::open(path).map_err(|e| match e {
            hound::Error::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                StorageError::new(StorageErrorKind::NotFound(path.display().to_string()))
            }
            other => StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                other
            ))),
        })?;

        // duration() counts frames, i.e. samples per channel
        let spec = reader.spec();
        Ok(AudioInfo::new(u64::from(reader.duration()), spec.sample_rate))
    }
}

impl AudioProbe for WavProbe {
    fn probe(&self, chunk: &NarrationChunk) -> Result<AudioInfo, StorageError> {
        let path = self.root.join(chunk.audio());
        let info = Self::read_header(&path)?;
        tracing::trace!(
            path = %path.display(),
            samples = info.sample_count(),
            rate = info.sample_rate(),
            "Read WAV header"
        );
        Ok(info)
    }
}
