//! Cadence - narration-synchronized timelines for generated lesson videos
//!
//! Cadence reconciles independently synthesized narration audio with a declarative
//! plan of visual events, so that on-screen changes land on the words that
//! describe them, and checks that the elements on screen do not collide.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use cadence::{CadenceConfig, LessonSpec, RunManager, SnapshotFootprints, WavProbe};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CadenceConfig::load(None)?;
//!     let lesson = LessonSpec::from_file("lesson.json")?;
//!
//!     let manager = RunManager::new(
//!         config.engine().clone(),
//!         Arc::new(WavProbe::new(config.paths().audio_dir())),
//!         Arc::new(SnapshotFootprints::new(config.paths().footprint_dir())),
//!     );
//!     let outcome = manager
//!         .run(&lesson, config.provider(), config.paths().output_dir())
//!         .await?;
//!     println!("{}: {}", outcome.identity(), outcome.report().verdict());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Cadence is organized as a workspace with focused crates:
//!
//! - `cadence_error` - Error types
//! - `cadence_core` - Lesson plan, geometry, and record types
//! - `cadence_interface` - Audio and footprint collaborator traits
//! - `cadence_timeline` - Alignment, scheduling, and overlap validation
//! - `cadence_storage` - Run artifacts, WAV probing, footprint snapshots
//! - `cadence_run` - Run identity, configuration, and concurrent orchestration
//!
//! This crate (`cadence`) re-exports everything for convenience.

pub mod observability;

pub use cadence_core::*;
pub use cadence_error::*;
pub use cadence_interface::*;
pub use cadence_run::{
    CadenceConfig, CancellationToken, CueEntry, CueFile, PathsConfig, RunIdentity, RunManager,
    RunOutcome, RunRecord, RunReport, SceneCues, TimelineFile, Verdict,
};
pub use cadence_storage::{
    ArtifactRef, RunLayout, SceneSnapshot, SnapshotFootprints, SnapshotSample, WavProbe,
};
pub use cadence_timeline::{
    EventScheduler, InMemoryAudio, InMemoryFootprints, NarrationAligner, OverlapValidator,
    Placement, Schedule, SceneAlignment, SceneReport, SceneTracker, candidates_around,
    place_label, run_scene,
};
