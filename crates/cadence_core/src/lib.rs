//! Core data types for the Cadence engine.
//!
//! This crate provides the lesson plan model consumed from the prompt-expansion
//! collaborator, the geometry of rendered footprints, and the records the engine
//! produces for each scene (alignment records, overlap reports, resolved timelines).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod geometry;
mod lesson;
mod record;
mod state;
mod style;
mod timeline;

pub use config::{EngineConfig, SAMPLE_FRACTIONS, TIME_EPSILON};
pub use geometry::{BoundingBox, Footprint, FootprintBuilder};
pub use lesson::{
    Event, EventBuilder, EventKind, LessonSpec, LessonSpecBuilder, NarrationChunk,
    NarrationChunkBuilder, SceneSpec, SceneSpecBuilder,
};
pub use record::{
    AlignmentOutcome, AlignmentRecord, AlignmentRecordBuilder, EventDrift, EventDriftBuilder,
    OverlapReport, OverlapReportBuilder, Severity,
};
pub use state::{FailureKind, FailureReason, SceneState};
pub use style::{FontToken, LayoutToken, ProviderConfig, StyleTokens, TransitionToken};
pub use timeline::{ResolvedCue, ResolvedTimeline};
