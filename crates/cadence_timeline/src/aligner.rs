//! Narration alignment.
//!
//! The aligner measures every narration chunk's synthesized audio, sums the
//! measurements, and derives the scene's speed factor. It also computes the corrected
//! start of each chunk, which is where narration-anchored events must land.

use cadence_core::{AlignmentOutcome, AlignmentRecord, EngineConfig, NarrationChunk, SceneSpec};
use cadence_error::{AlignmentError, AlignmentErrorKind};
use cadence_interface::AudioProbe;
use derive_getters::Getters;

/// Measured narration of one scene.
///
/// Built fresh for every run; the scene plan it was measured from is never mutated.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct SceneAlignment {
    /// Scene identifier
    scene_id: String,
    /// Chunks carrying their measured durations, in plan order
    chunks: Vec<NarrationChunk>,
    /// Sum of planned chunk lengths in seconds
    scene_expected: f64,
    /// Sum of measured chunk durations in seconds
    scene_measured: f64,
    /// `scene_measured / scene_expected`, or 1.0 for a scene without narration
    speed_factor: f64,
    /// Corrected start of each chunk: the rescaled lead-in before the first chunk
    /// plus the measured durations of the chunks before it
    boundaries: Vec<f64>,
}

impl SceneAlignment {
    /// Corrected start of chunk `index`, if it exists.
    pub fn boundary(&self, index: usize) -> Option<f64> {
        self.boundaries.get(index).copied()
    }

    /// A failed alignment record keeping the measurements.
    pub fn failed_record(&self) -> AlignmentRecord {
        AlignmentRecord::measured(
            self.scene_id.clone(),
            self.speed_factor,
            self.scene_expected,
            self.scene_measured,
            Vec::new(),
            AlignmentOutcome::Failed,
        )
    }
}

/// Derives speed factors from measured narration.
///
/// # Example
///
/// ```rust,ignore
/// let aligner = NarrationAligner::new(&config);
/// let alignment = aligner.align(&scene, &probe)?;
/// println!("speed factor {:.3}", alignment.speed_factor());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NarrationAligner<'a> {
    config: &'a EngineConfig,
}

impl<'a> NarrationAligner<'a> {
    /// Create an aligner applying `config`'s plausibility band.
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Measure every chunk of `scene` and compute its speed factor.
    ///
    /// The factor is not checked against the plausibility band; see
    /// [`check_plausible`](Self::check_plausible).
    ///
    /// # Errors
    ///
    /// Returns `MissingNarrationAudio` for the first chunk whose artifact is missing,
    /// unreadable, or empty.
    #[tracing::instrument(skip_all, fields(scene = %scene.id(), chunks = scene.narration().len()))]
    pub fn measure(
        &self,
        scene: &SceneSpec,
        probe: &dyn AudioProbe,
    ) -> Result<SceneAlignment, AlignmentError> {
        let mut chunks = Vec::with_capacity(scene.narration().len());
        let mut offsets = Vec::with_capacity(scene.narration().len());
        let mut elapsed = 0.0;

        for (index, chunk) in scene.narration().iter().enumerate() {
            let missing = |reason: String| {
                AlignmentError::new(AlignmentErrorKind::MissingNarrationAudio {
                    scene: scene.id().clone(),
                    chunk: index,
                    reason,
                })
            };

            let info = probe.probe(chunk).map_err(|e| missing(e.to_string()))?;
            let measured = info.duration_secs();
            if !(measured.is_finite() && measured > 0.0) {
                return Err(missing(format!(
                    "{} holds no audio ({} samples at {} Hz)",
                    chunk.audio().display(),
                    info.sample_count(),
                    info.sample_rate()
                )));
            }

            tracing::trace!(chunk = index, expected = chunk.expected_length(), measured, "Measured chunk");
            offsets.push(elapsed);
            elapsed += measured;
            chunks.push(chunk.with_measured_duration(measured));
        }

        let scene_expected = scene.expected_narration();
        let speed_factor = if chunks.is_empty() {
            1.0
        } else {
            elapsed / scene_expected
        };

        // Silence before the first chunk stretches with the rest of the scene.
        let lead_in = scene
            .narration()
            .first()
            .map_or(0.0, |first| first.expected_start() * speed_factor);
        let boundaries = offsets.into_iter().map(|offset| lead_in + offset).collect();

        tracing::debug!(
            expected = scene_expected,
            measured = elapsed,
            speed_factor,
            lead_in,
            "Measured scene narration"
        );

        Ok(SceneAlignment {
            scene_id: scene.id().clone(),
            chunks,
            scene_expected,
            scene_measured: elapsed,
            speed_factor,
            boundaries,
        })
    }

    /// Reject a speed factor outside the configured band.
    ///
    /// # Errors
    ///
    /// Returns `ImplausibleSpeechRate` when the factor is below `speed_band_min` or
    /// above `speed_band_max`. Both edges are inclusive.
    pub fn check_plausible(&self, alignment: &SceneAlignment) -> Result<(), AlignmentError> {
        if self.config.is_plausible(alignment.speed_factor) {
            return Ok(());
        }
        tracing::warn!(
            scene = %alignment.scene_id,
            speed_factor = alignment.speed_factor,
            "Speech rate outside plausible band"
        );
        Err(AlignmentError::new(
            AlignmentErrorKind::ImplausibleSpeechRate {
                scene: alignment.scene_id.clone(),
                factor: alignment.speed_factor,
                min: *self.config.speed_band_min(),
                max: *self.config.speed_band_max(),
            },
        ))
    }

    /// Measure `scene` and check its speed factor.
    ///
    /// # Errors
    ///
    /// Returns `MissingNarrationAudio` or `ImplausibleSpeechRate`.
    pub fn align(
        &self,
        scene: &SceneSpec,
        probe: &dyn AudioProbe,
    ) -> Result<SceneAlignment, AlignmentError> {
        let alignment = self.measure(scene, probe)?;
        self.check_plausible(&alignment)?;
        Ok(alignment)
    }
}
