//! Per-scene records produced by the engine for QA review.

use crate::BoundingBox;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Overall alignment outcome of a scene.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentOutcome {
    /// Every anchored event landed within tolerance
    #[display("ok")]
    Ok,
    /// At least one anchored event was clamped
    #[display("clamped")]
    Clamped,
    /// Alignment or scheduling failed
    #[display("failed")]
    Failed,
}

/// Drift bookkeeping for one narration-anchored event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct EventDrift {
    /// Event identifier
    event_id: String,
    /// Anchor chunk index
    anchor: usize,
    /// Corrected start of the anchor chunk, in seconds
    boundary_time: f64,
    /// `logical_timestamp × speed_factor`, in seconds
    corrected_timestamp: f64,
    /// Final timestamp after clamping, in seconds
    resolved_timestamp: f64,
    /// Drift before clamping, in milliseconds
    raw_drift_ms: f64,
    /// Drift remaining after clamping, in milliseconds
    residual_drift_ms: f64,
    /// Whether the timestamp was clamped
    clamped: bool,
}

impl EventDrift {
    /// Records the drift of an event anchored to chunk `anchor`.
    ///
    /// Raw and residual drift are derived from the three timestamps.
    pub fn new(
        event_id: impl Into<String>,
        anchor: usize,
        boundary_time: f64,
        corrected_timestamp: f64,
        resolved_timestamp: f64,
        clamped: bool,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            anchor,
            boundary_time,
            corrected_timestamp,
            resolved_timestamp,
            raw_drift_ms: (corrected_timestamp - boundary_time) * 1000.0,
            residual_drift_ms: (resolved_timestamp - boundary_time) * 1000.0,
            clamped,
        }
    }
}

/// Summary of how a scene's narration and events were reconciled.
///
/// Produced once per scene per run; immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct AlignmentRecord {
    /// Scene identifier
    scene_id: String,
    /// Measured / expected narration ratio, when it could be computed
    #[builder(default)]
    speed_factor: Option<f64>,
    /// Sum of planned chunk lengths, in seconds
    scene_expected: f64,
    /// Sum of measured chunk durations, in seconds
    #[builder(default)]
    scene_measured: Option<f64>,
    /// Drift of every narration-anchored event, in event order.
    ///
    /// Drift is measured against a narration boundary, so an event without an
    /// anchor has none and is not listed; its resolved time is the rescaled
    /// logical time, found in the scene's resolved timeline.
    #[builder(default)]
    drifts: Vec<EventDrift>,
    /// Outcome of the scene's alignment
    outcome: AlignmentOutcome,
}

impl AlignmentRecord {
    /// Record of a scene whose narration was measured.
    pub fn measured(
        scene_id: impl Into<String>,
        speed_factor: f64,
        scene_expected: f64,
        scene_measured: f64,
        drifts: Vec<EventDrift>,
        outcome: AlignmentOutcome,
    ) -> Self {
        Self {
            scene_id: scene_id.into(),
            speed_factor: Some(speed_factor),
            scene_expected,
            scene_measured: Some(scene_measured),
            drifts,
            outcome,
        }
    }

    /// Failed record of a scene whose narration could not be measured.
    pub fn unmeasured(scene_id: impl Into<String>, scene_expected: f64) -> Self {
        Self {
            scene_id: scene_id.into(),
            speed_factor: None,
            scene_expected,
            scene_measured: None,
            drifts: Vec::new(),
            outcome: AlignmentOutcome::Failed,
        }
    }

    /// Whether any event was clamped.
    pub fn clamped(&self) -> bool {
        self.drifts.iter().any(|d| d.clamped)
    }

    /// Identifiers of the clamped events, in event order.
    pub fn clamped_events(&self) -> Vec<&str> {
        self.drifts
            .iter()
            .filter(|d| d.clamped)
            .map(|d| d.event_id.as_str())
            .collect()
    }
}

/// How serious a footprint intersection is.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Severity {
    /// Above the buffer epsilon but under the significance threshold
    #[serde(rename = "below-buffer")]
    #[display("below-buffer")]
    BelowBuffer,
    /// Above the significance threshold
    #[serde(rename = "significant")]
    #[display("significant")]
    Significant,
}

/// One footprint intersection found at a sample point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct OverlapReport {
    /// Sample fraction of the scene duration
    sample_fraction: f64,
    /// Sample time in seconds from scene start
    sample_time: f64,
    /// The intersecting elements, in lexical order
    elements: (String, String),
    /// Shared region
    overlap: BoundingBox,
    /// Area of the shared region
    overlap_area: f64,
    /// Classification against the configured thresholds
    severity: Severity,
}

impl OverlapReport {
    /// Creates an overlap report.
    pub fn new(
        sample_fraction: f64,
        sample_time: f64,
        elements: (String, String),
        overlap: BoundingBox,
        overlap_area: f64,
        severity: Severity,
    ) -> Self {
        Self {
            sample_fraction,
            sample_time,
            elements,
            overlap,
            overlap_area,
            severity,
        }
    }

    /// Whether the overlap is significant.
    pub fn is_significant(&self) -> bool {
        self.severity == Severity::Significant
    }
}
