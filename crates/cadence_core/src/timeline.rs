//! The resolved timeline handed to the rendering layer.

use crate::EventKind;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One resolved cue: what to do to which element, and when.
///
/// Carries only resolved time; logical time never leaves the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ResolvedCue {
    /// Event identifier
    event_id: String,
    /// Visual action
    kind: EventKind,
    /// Target element identifier
    target: String,
    /// Resolved time in seconds from scene start
    at: f64,
    /// Frame number at the configured frame rate
    frame: u64,
    /// Whether the time was clamped to its narration boundary
    clamped: bool,
}

impl ResolvedCue {
    /// Creates a cue, deriving its frame number from `frame_rate`.
    pub fn new(
        event_id: impl Into<String>,
        kind: EventKind,
        target: impl Into<String>,
        at: f64,
        frame_rate: u32,
        clamped: bool,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            kind,
            target: target.into(),
            at,
            frame: (at * f64::from(frame_rate)).round().max(0.0) as u64,
            clamped,
        }
    }
}

/// Fully resolved schedule of one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ResolvedTimeline {
    /// Scene identifier
    scene_id: String,
    /// Speed factor the scene was corrected by
    speed_factor: f64,
    /// Corrected scene duration in seconds
    duration: f64,
    /// Cues in event order
    cues: Vec<ResolvedCue>,
}

impl ResolvedTimeline {
    /// Creates a resolved timeline.
    pub fn new(
        scene_id: impl Into<String>,
        speed_factor: f64,
        duration: f64,
        cues: Vec<ResolvedCue>,
    ) -> Self {
        Self {
            scene_id: scene_id.into(),
            speed_factor,
            duration,
            cues,
        }
    }

    /// Resolved timestamps in event order.
    pub fn timestamps(&self) -> Vec<f64> {
        self.cues.iter().map(|c| c.at).collect()
    }
}
