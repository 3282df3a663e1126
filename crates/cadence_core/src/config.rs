//! Engine configuration.
//!
//! Every tolerance the engine applies lives in one explicit value passed to the
//! run manager at construction; nothing is read from process-wide state.

use cadence_error::ConfigError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Fractions of the corrected scene duration at which footprints are sampled.
pub const SAMPLE_FRACTIONS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Slack used when comparing timestamps computed in floating point.
pub const TIME_EPSILON: f64 = 1e-9;

/// Tolerances and policies for alignment, scheduling, and overlap validation.
///
/// # Examples
///
/// ```
/// use cadence_core::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_clamp_tolerance_ms(250.0)
///     .with_fatal_significant_overlaps(true);
///
/// assert_eq!(*config.clamp_tolerance_ms(), 250.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Lowest plausible speed factor (default 0.5)
    #[serde(default = "default_speed_band_min")]
    speed_band_min: f64,

    /// Highest plausible speed factor (default 2.0)
    #[serde(default = "default_speed_band_max")]
    speed_band_max: f64,

    /// Maximum drift between an anchored event and its boundary (default 300 ms)
    #[serde(default = "default_clamp_tolerance_ms")]
    clamp_tolerance_ms: f64,

    /// Overlap area at or below which intersections are ignored (default 0.04)
    #[serde(default = "default_overlap_epsilon")]
    overlap_epsilon: f64,

    /// Overlap area above which an intersection is significant (default 0.25)
    #[serde(default = "default_significant_overlap_area")]
    significant_overlap_area: f64,

    /// Fail the run when any significant overlap exists (default false)
    #[serde(default)]
    fatal_significant_overlaps: bool,

    /// Maximum scenes processed at once (default: available parallelism)
    #[serde(default = "default_max_concurrency")]
    max_concurrency: usize,

    /// Frames per second used to express cues as frame numbers (default 30)
    #[serde(default = "default_frame_rate")]
    frame_rate: u32,
}

fn default_speed_band_min() -> f64 {
    0.5
}

fn default_speed_band_max() -> f64 {
    2.0
}

fn default_clamp_tolerance_ms() -> f64 {
    300.0
}

fn default_overlap_epsilon() -> f64 {
    // A 0.2 × 0.2 unit clearance square
    0.04
}

fn default_significant_overlap_area() -> f64 {
    0.25
}

fn default_max_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_frame_rate() -> u32 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            speed_band_min: default_speed_band_min(),
            speed_band_max: default_speed_band_max(),
            clamp_tolerance_ms: default_clamp_tolerance_ms(),
            overlap_epsilon: default_overlap_epsilon(),
            significant_overlap_area: default_significant_overlap_area(),
            fatal_significant_overlaps: false,
            max_concurrency: default_max_concurrency(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl EngineConfig {
    /// Clamp tolerance in seconds.
    pub fn clamp_tolerance_secs(&self) -> f64 {
        self.clamp_tolerance_ms / 1000.0
    }

    /// Whether `factor` lies inside the plausibility band (inclusive).
    pub fn is_plausible(&self, factor: f64) -> bool {
        factor.is_finite() && factor >= self.speed_band_min && factor <= self.speed_band_max
    }

    /// Validates that the tolerances are internally consistent.
    ///
    /// # Errors
    ///
    /// Returns an error if the speed band is empty or non-positive, a tolerance is
    /// negative, the significance threshold is below the buffer epsilon, or the
    /// concurrency limit or frame rate is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speed_band_min > 0.0 && self.speed_band_min <= self.speed_band_max) {
            return Err(ConfigError::new(
                "engine.speed_band_min",
                format!(
                    "speed band must satisfy 0 < min <= max, got [{}, {}]",
                    self.speed_band_min, self.speed_band_max
                ),
            ));
        }
        if !(self.clamp_tolerance_ms >= 0.0) {
            return Err(ConfigError::new(
                "engine.clamp_tolerance_ms",
                format!("must not be negative, got {}", self.clamp_tolerance_ms),
            ));
        }
        if !(self.overlap_epsilon >= 0.0) {
            return Err(ConfigError::new(
                "engine.overlap_epsilon",
                format!("must not be negative, got {}", self.overlap_epsilon),
            ));
        }
        if !(self.significant_overlap_area >= self.overlap_epsilon) {
            return Err(ConfigError::new(
                "engine.significant_overlap_area",
                format!(
                    "{} is below overlap_epsilon ({})",
                    self.significant_overlap_area, self.overlap_epsilon
                ),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::new("engine.max_concurrency", "must be at least 1"));
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::new("engine.frame_rate", "must be at least 1"));
        }
        Ok(())
    }
}
