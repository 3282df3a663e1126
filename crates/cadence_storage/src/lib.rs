//! Filesystem storage for Cadence runs.
//!
//! - **[`RunLayout`]**: the artifact directory of one run, keyed by run identity.
//!   Every artifact is written atomically (temp file + rename) and hashed with
//!   SHA-256 so reports can reference exactly what was produced.
//! - **[`WavProbe`]**: reads sample count and sample rate from synthesized WAV
//!   narration without decoding it.
//! - **[`SnapshotFootprints`]**: serves element footprints the renderer exported as
//!   per-scene JSON snapshots.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod layout;
mod snapshot;
mod wav;

pub use layout::{ArtifactRef, RunLayout};
pub use snapshot::{SceneSnapshot, SnapshotFootprints, SnapshotSample};
pub use wav::WavProbe;
