//! Timeline and synchronization engine for Cadence.
//!
//! This crate reconciles independently produced narration audio with a declarative
//! plan of visual events, one scene at a time:
//!
//! - **[`NarrationAligner`]**: measures each chunk's synthesized audio and derives the
//!   scene's speed factor, rejecting implausible speech rates
//! - **[`EventScheduler`]**: rescales logical event times by the speed factor and
//!   clamps narration-anchored events to within a fixed tolerance of their boundary
//! - **[`OverlapValidator`]**: samples the resolved scene at five fixed fractions and
//!   reports element footprints that collide
//! - **[`run_scene`]**: drives one scene through `pending → aligning → scheduling →
//!   validating → {passed | failed}`
//!
//! # Example
//!
//! ```rust,ignore
//! use cadence_core::{EngineConfig, LessonSpec};
//! use cadence_timeline::{InMemoryAudio, InMemoryFootprints, run_scene};
//!
//! let lesson = LessonSpec::from_file("lesson.json")?;
//! let config = EngineConfig::default();
//! let report = run_scene(&lesson.scenes()[0], &audio, &footprints, &config)?;
//! println!("{}: {}", report.scene_id(), report.state());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aligner;
mod in_memory;
mod overlap;
mod pipeline;
mod placement;
mod scheduler;

pub use aligner::{NarrationAligner, SceneAlignment};
pub use in_memory::{InMemoryAudio, InMemoryFootprints};
pub use overlap::OverlapValidator;
pub use pipeline::{SceneReport, SceneTracker, run_scene};
pub use placement::{Placement, candidates_around, place_label};
pub use scheduler::{EventScheduler, Schedule};
