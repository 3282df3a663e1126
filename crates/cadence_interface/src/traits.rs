//! Collaborator traits.

use crate::{AudioInfo, SamplePoint};
use cadence_core::{Footprint, NarrationChunk, ResolvedTimeline};
use cadence_error::{FootprintError, StorageError};

/// Reads duration metadata from synthesized narration audio.
///
/// Implementations read only the header (sample count and sample rate); no audio is
/// decoded or re-encoded.
pub trait AudioProbe: Send + Sync {
    /// Probe the artifact referenced by `chunk`.
    ///
    /// An error means the artifact is missing or unreadable; the aligner turns it
    /// into a scene-fatal `MissingNarrationAudio`.
    fn probe(&self, chunk: &NarrationChunk) -> Result<AudioInfo, StorageError>;
}

/// Supplies rendered element footprints for a resolved scene.
pub trait FootprintProvider: Send + Sync {
    /// Footprints of the elements rendered at `sample` of `timeline`'s scene.
    ///
    /// Elements whose active interval does not contain the sample time may be
    /// included; the validator filters them.
    fn footprints(
        &self,
        timeline: &ResolvedTimeline,
        sample: &SamplePoint,
    ) -> Result<Vec<Footprint>, FootprintError>;
}
