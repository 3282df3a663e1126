//! Values exchanged with collaborators.

use cadence_core::SAMPLE_FRACTIONS;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Header information of a synthesized audio artifact.
///
/// # Examples
///
/// ```
/// use cadence_interface::AudioInfo;
///
/// let info = AudioInfo::new(48_000, 24_000);
/// assert_eq!(info.duration_secs(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct AudioInfo {
    /// Samples per channel
    sample_count: u64,
    /// Samples per second
    sample_rate: u32,
}

impl AudioInfo {
    /// Creates audio info from a per-channel sample count and a sample rate.
    pub fn new(sample_count: u64, sample_rate: u32) -> Self {
        Self {
            sample_count,
            sample_rate,
        }
    }

    /// Playback length in seconds, or zero for a zero sample rate.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.sample_count as f64 / f64::from(self.sample_rate)
    }
}

/// A point in a scene at which rendered footprints are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
pub struct SamplePoint {
    /// Position in [`SAMPLE_FRACTIONS`]
    index: usize,
    /// Fraction of the corrected scene duration
    fraction: f64,
    /// Absolute time from scene start, in seconds
    time: f64,
}

impl SamplePoint {
    /// The five fixed sample points of a scene lasting `duration` seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence_interface::SamplePoint;
    ///
    /// let points = SamplePoint::for_duration(20.0);
    /// assert_eq!(points.len(), 5);
    /// assert_eq!(*points[2].time(), 10.0);
    /// ```
    pub fn for_duration(duration: f64) -> Vec<SamplePoint> {
        SAMPLE_FRACTIONS
            .iter()
            .enumerate()
            .map(|(index, &fraction)| SamplePoint {
                index,
                fraction,
                time: duration * fraction,
            })
            .collect()
    }
}
