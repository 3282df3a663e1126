//! Footprint overlap validation.

use cadence_core::{EngineConfig, Footprint, OverlapReport, ResolvedTimeline, Severity};
use cadence_error::{FootprintError, FootprintErrorKind};
use cadence_interface::{FootprintProvider, SamplePoint};

/// Detects colliding element footprints at fixed sample points of a scene.
///
/// Only elements active at a sample time are compared. An intersection whose area
/// does not exceed `overlap_epsilon` is ignored; one above `significant_overlap_area`
/// is reported as significant, anything between as below-buffer.
#[derive(Debug, Clone, Copy)]
pub struct OverlapValidator {
    epsilon: f64,
    significant: f64,
}

impl OverlapValidator {
    /// Create a validator with `config`'s thresholds.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            epsilon: *config.overlap_epsilon(),
            significant: *config.significant_overlap_area(),
        }
    }

    /// Compare every pair of footprints active at `sample`.
    ///
    /// Pairs are visited in supplied order; each report names its elements in
    /// lexical order.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if a footprint's box is inverted or non-finite.
    pub fn check_sample(
        &self,
        scene_id: &str,
        sample: &SamplePoint,
        footprints: &[Footprint],
    ) -> Result<Vec<OverlapReport>, FootprintError> {
        if let Some(bad) = footprints.iter().find(|f| !f.bounds().is_well_formed()) {
            return Err(FootprintError::new(FootprintErrorKind::Malformed {
                scene: scene_id.to_string(),
                element: bad.element_id().clone(),
                reason: format!("{:?} is inverted or not finite", bad.bounds()),
            }));
        }

        let active: Vec<&Footprint> = footprints
            .iter()
            .filter(|f| f.is_active_at(*sample.time()))
            .collect();

        let mut reports = Vec::new();
        for (i, a) in active.iter().enumerate() {
            for b in &active[i + 1..] {
                let Some(overlap) = a.bounds().intersection(b.bounds()) else {
                    continue;
                };
                let area = overlap.area();
                if area <= self.epsilon {
                    continue;
                }

                let severity = if area > self.significant {
                    Severity::Significant
                } else {
                    Severity::BelowBuffer
                };
                let (first, second) = if a.element_id() <= b.element_id() {
                    (a.element_id(), b.element_id())
                } else {
                    (b.element_id(), a.element_id())
                };

                tracing::debug!(
                    scene = scene_id,
                    fraction = sample.fraction(),
                    first = %first,
                    second = %second,
                    area,
                    %severity,
                    "Footprints overlap"
                );

                reports.push(OverlapReport::new(
                    *sample.fraction(),
                    *sample.time(),
                    (first.clone(), second.clone()),
                    overlap,
                    area,
                    severity,
                ));
            }
        }
        Ok(reports)
    }

    /// Sample `timeline` at the five fixed fractions and collect every overlap.
    ///
    /// Reports are ordered by sample, then by pair.
    ///
    /// # Errors
    ///
    /// Returns the provider's error for the first sample it cannot supply, or
    /// `Malformed` for an unusable footprint.
    #[tracing::instrument(skip_all, fields(scene = %timeline.scene_id(), duration = timeline.duration()))]
    pub fn validate(
        &self,
        timeline: &ResolvedTimeline,
        provider: &dyn FootprintProvider,
    ) -> Result<Vec<OverlapReport>, FootprintError> {
        let mut reports = Vec::new();
        for sample in SamplePoint::for_duration(*timeline.duration()) {
            let footprints = provider.footprints(timeline, &sample)?;
            reports.extend(self.check_sample(timeline.scene_id(), &sample, &footprints)?);
        }

        let significant = reports
            .iter()
            .filter(|r| *r.severity() == Severity::Significant)
            .count();
        tracing::debug!(overlaps = reports.len(), significant, "Validated scene footprints");
        Ok(reports)
    }
}
