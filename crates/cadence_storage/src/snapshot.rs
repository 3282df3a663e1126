//! Footprint snapshots exported by the renderer.

use cadence_core::{Footprint, ResolvedTimeline, TIME_EPSILON};
use cadence_error::{FootprintError, FootprintErrorKind};
use cadence_interface::{FootprintProvider, SamplePoint};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Footprints captured at one sample of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct SnapshotSample {
    /// Sample fraction of the corrected scene duration
    fraction: f64,
    /// Elements rendered at that sample
    footprints: Vec<Footprint>,
}

impl SnapshotSample {
    /// Creates a sample.
    pub fn new(fraction: f64, footprints: Vec<Footprint>) -> Self {
        Self {
            fraction,
            footprints,
        }
    }
}

/// All snapshots of one scene, stored as `{dir}/{scene_id}.json`.
///
/// # Example JSON Structure
///
/// ```json
/// {
///   "scene_id": "intro",
///   "samples": [
///     {"fraction": 0.0, "footprints": [
///       {"element_id": "title", "appear_time": 0.0, "disappear_time": 4.0,
///        "bounds": {"min_x": -3.0, "min_y": 2.0, "max_x": 3.0, "max_y": 3.0}}
///     ]}
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct SceneSnapshot {
    /// Scene identifier
    scene_id: String,
    /// Samples, in any order
    samples: Vec<SnapshotSample>,
}

impl SceneSnapshot {
    /// Creates a snapshot.
    pub fn new(scene_id: impl Into<String>, samples: Vec<SnapshotSample>) -> Self {
        Self {
            scene_id: scene_id.into(),
            samples,
        }
    }

    fn at(&self, fraction: f64) -> Option<&SnapshotSample> {
        self.samples
            .iter()
            .find(|s| (s.fraction - fraction).abs() <= TIME_EPSILON)
    }
}

/// Serves footprints from per-scene snapshot files.
///
/// Files are read on every request; the renderer may replace them between runs.
#[derive(Debug, Clone)]
pub struct SnapshotFootprints {
    dir: PathBuf,
}

impl SnapshotFootprints {
    /// Create a provider reading snapshots from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the snapshot file for `scene_id`.
    pub fn path_for(&self, scene_id: &str) -> PathBuf {
        self.dir.join(format!("{scene_id}.json"))
    }
}

impl FootprintProvider for SnapshotFootprints {
    fn footprints(
        &self,
        timeline: &ResolvedTimeline,
        sample: &SamplePoint,
    ) -> Result<Vec<Footprint>, FootprintError> {
        let scene = timeline.scene_id();
        let unavailable = |reason: String| {
            FootprintError::new(FootprintErrorKind::Unavailable {
                scene: scene.clone(),
                fraction: *sample.fraction(),
                reason,
            })
        };

        let path = self.path_for(scene);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| unavailable(format!("{}: {}", path.display(), e)))?;
        let snapshot: SceneSnapshot = serde_json::from_str(&content)
            .map_err(|e| unavailable(format!("{}: {}", path.display(), e)))?;

        if snapshot.scene_id != *scene {
            return Err(unavailable(format!(
                "{} holds scene '{}'",
                path.display(),
                snapshot.scene_id
            )));
        }

        snapshot
            .at(*sample.fraction())
            .map(|s| s.footprints.clone())
            .ok_or_else(|| unavailable(format!("{} has no sample", path.display())))
    }
}
