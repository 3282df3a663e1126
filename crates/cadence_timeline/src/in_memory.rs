//! In-memory collaborators for tests and dry runs.

use cadence_core::{Footprint, NarrationChunk, ResolvedTimeline};
use cadence_error::{FootprintError, FootprintErrorKind, StorageError, StorageErrorKind};
use cadence_interface::{AudioInfo, AudioProbe, FootprintProvider, SamplePoint};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Audio probe answering from a map of artifact path to header information.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAudio {
    artifacts: HashMap<PathBuf, AudioInfo>,
}

impl InMemoryAudio {
    /// Create an empty probe; every lookup fails until artifacts are inserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an artifact of `seconds` length at a 1 kHz sample rate.
    pub fn insert_secs(&mut self, path: impl Into<PathBuf>, seconds: f64) {
        let samples = (seconds * 1000.0).round().max(0.0) as u64;
        self.insert(path, AudioInfo::new(samples, 1000));
    }

    /// Register an artifact.
    pub fn insert(&mut self, path: impl Into<PathBuf>, info: AudioInfo) {
        self.artifacts.insert(path.into(), info);
    }

    /// Builder-style [`insert_secs`](Self::insert_secs).
    pub fn with_secs(mut self, path: impl Into<PathBuf>, seconds: f64) -> Self {
        self.insert_secs(path, seconds);
        self
    }

    /// Forget an artifact.
    pub fn remove(&mut self, path: impl AsRef<Path>) {
        self.artifacts.remove(path.as_ref());
    }
}

impl AudioProbe for InMemoryAudio {
    fn probe(&self, chunk: &NarrationChunk) -> Result<AudioInfo, StorageError> {
        self.artifacts.get(chunk.audio()).copied().ok_or_else(|| {
            StorageError::new(StorageErrorKind::NotFound(
                chunk.audio().display().to_string(),
            ))
        })
    }
}

/// Footprint provider holding per-scene element lists.
///
/// Static footprints are returned at every sample; per-sample footprints are added
/// only at their sample index. Scenes marked unavailable fail every request.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFootprints {
    scenes: HashMap<String, Vec<Footprint>>,
    samples: HashMap<(String, usize), Vec<Footprint>>,
    unavailable: Vec<String>,
}

impl InMemoryFootprints {
    /// Create a provider that returns no footprints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Footprints returned at every sample of `scene_id`.
    pub fn insert_static(&mut self, scene_id: impl Into<String>, footprints: Vec<Footprint>) {
        self.scenes.entry(scene_id.into()).or_default().extend(footprints);
    }

    /// Footprints returned only at sample `index` of `scene_id`.
    pub fn insert_sample(
        &mut self,
        scene_id: impl Into<String>,
        index: usize,
        footprints: Vec<Footprint>,
    ) {
        self.samples
            .entry((scene_id.into(), index))
            .or_default()
            .extend(footprints);
    }

    /// Make every request for `scene_id` fail.
    pub fn mark_unavailable(&mut self, scene_id: impl Into<String>) {
        self.unavailable.push(scene_id.into());
    }
}

impl FootprintProvider for InMemoryFootprints {
    fn footprints(
        &self,
        timeline: &ResolvedTimeline,
        sample: &SamplePoint,
    ) -> Result<Vec<Footprint>, FootprintError> {
        let scene = timeline.scene_id();
        if self.unavailable.contains(scene) {
            return Err(FootprintError::new(FootprintErrorKind::Unavailable {
                scene: scene.clone(),
                fraction: *sample.fraction(),
                reason: "renderer produced no snapshot".to_string(),
            }));
        }

        let mut footprints = self.scenes.get(scene).cloned().unwrap_or_default();
        if let Some(extra) = self.samples.get(&(scene.clone(), *sample.index())) {
            footprints.extend(extra.iter().cloned());
        }
        Ok(footprints)
    }
}
