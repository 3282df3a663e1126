//! Trait definitions for the collaborators the Cadence engine consumes.
//!
//! Speech synthesis and rendering happen outside the engine. The engine only reads
//! what they produce, through the seams defined here: an [`AudioProbe`] that reports
//! the sample count and rate of a synthesized narration artifact, and a
//! [`FootprintProvider`] that supplies the bounding footprints of rendered elements
//! at fixed sample points. Both are synchronous and are never retried.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{AudioProbe, FootprintProvider};
pub use types::{AudioInfo, SamplePoint};
