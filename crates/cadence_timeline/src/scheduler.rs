//! Event scheduling.
//!
//! Every event's logical timestamp is scaled by the scene's speed factor. Events
//! anchored to a narration chunk are then held within the clamp tolerance of that
//! chunk's corrected start. Clamping is the first-line correction; a scene fails only
//! when clamped timestamps would reorder its events.

use crate::SceneAlignment;
use cadence_core::{
    AlignmentOutcome, AlignmentRecord, EngineConfig, Event, EventDrift, ResolvedCue,
    ResolvedTimeline, SceneSpec, TIME_EPSILON,
};
use cadence_error::{ScheduleError, ScheduleErrorKind};
use derive_getters::Getters;

/// Resolved events of one scene, before the ordering check.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct Schedule {
    /// Scene identifier
    scene_id: String,
    /// Speed factor applied
    speed_factor: f64,
    /// Corrected scene duration in seconds
    duration: f64,
    /// Planned narration length in seconds
    scene_expected: f64,
    /// Measured narration length in seconds
    scene_measured: f64,
    /// Events carrying their resolved timestamps, in plan order
    events: Vec<Event>,
    /// Drift of each anchored event, in plan order
    drifts: Vec<EventDrift>,
}

impl Schedule {
    /// Fail if any resolved timestamp precedes the one before it.
    ///
    /// Equal timestamps are allowed.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvableDrift` naming the first out-of-order event.
    pub fn check_order(&self) -> Result<(), ScheduleError> {
        for pair in self.events.windows(2) {
            let (previous, event) = (&pair[0], &pair[1]);
            let previous_at = (*previous.resolved_timestamp()).unwrap_or_default();
            let at = (*event.resolved_timestamp()).unwrap_or_default();
            if at < previous_at - TIME_EPSILON {
                return Err(ScheduleError::new(ScheduleErrorKind::UnresolvableDrift {
                    scene: self.scene_id.clone(),
                    event: event.id().clone(),
                    resolved: at,
                    previous: previous.id().clone(),
                    previous_resolved: previous_at,
                }));
            }
        }
        Ok(())
    }

    /// The alignment record of this schedule with the given outcome.
    pub fn record(&self, outcome: AlignmentOutcome) -> AlignmentRecord {
        AlignmentRecord::measured(
            self.scene_id.clone(),
            self.speed_factor,
            self.scene_expected,
            self.scene_measured,
            self.drifts.clone(),
            outcome,
        )
    }

    /// Outcome when the order check passes: `Clamped` if any event was clamped.
    pub fn outcome(&self) -> AlignmentOutcome {
        if self.drifts.iter().any(|d| *d.clamped()) {
            AlignmentOutcome::Clamped
        } else {
            AlignmentOutcome::Ok
        }
    }

    /// The renderer-facing timeline, with cue frames at `frame_rate`.
    pub fn timeline(&self, frame_rate: u32) -> ResolvedTimeline {
        let clamped: Vec<&str> = self
            .drifts
            .iter()
            .filter(|d| *d.clamped())
            .map(|d| d.event_id().as_str())
            .collect();
        let cues = self
            .events
            .iter()
            .map(|event| {
                ResolvedCue::new(
                    event.id().clone(),
                    *event.kind(),
                    event.target().clone(),
                    (*event.resolved_timestamp()).unwrap_or_default(),
                    frame_rate,
                    clamped.contains(&event.id().as_str()),
                )
            })
            .collect();
        ResolvedTimeline::new(self.scene_id.clone(), self.speed_factor, self.duration, cues)
    }
}

/// Resolves logical event times against measured narration.
#[derive(Debug, Clone, Copy)]
pub struct EventScheduler {
    tolerance: f64,
}

impl EventScheduler {
    /// Create a scheduler with `config`'s clamp tolerance.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            tolerance: config.clamp_tolerance_secs(),
        }
    }

    /// Resolve every event of `scene` without checking their order.
    ///
    /// Resolution reads only logical timestamps, so resolving the same scene twice
    /// yields identical results.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSpeedFactor` if the alignment's factor is not strictly positive.
    #[tracing::instrument(skip_all, fields(scene = %scene.id(), events = scene.events().len()))]
    pub fn resolve(
        &self,
        scene: &SceneSpec,
        alignment: &SceneAlignment,
    ) -> Result<Schedule, ScheduleError> {
        let factor = *alignment.speed_factor();
        if !(factor.is_finite() && factor > 0.0) {
            return Err(ScheduleError::new(ScheduleErrorKind::InvalidSpeedFactor {
                scene: scene.id().clone(),
                factor,
            }));
        }

        let mut events = Vec::with_capacity(scene.events().len());
        let mut drifts = Vec::new();

        for event in scene.events() {
            let corrected = event.logical_timestamp() * factor;
            let boundary = (*event.anchor()).and_then(|a| alignment.boundary(a).map(|b| (a, b)));

            let resolved = match boundary {
                Some((anchor, boundary)) => {
                    let drift = self.clamp(event, anchor, boundary, corrected);
                    let resolved = *drift.resolved_timestamp();
                    drifts.push(drift);
                    resolved
                }
                None => corrected,
            };
            events.push(event.with_resolved_timestamp(resolved));
        }

        Ok(Schedule {
            scene_id: scene.id().clone(),
            speed_factor: factor,
            duration: scene.expected_duration() * factor,
            scene_expected: *alignment.scene_expected(),
            scene_measured: *alignment.scene_measured(),
            events,
            drifts,
        })
    }

    /// Resolve `scene` and check the result is ordered.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSpeedFactor` or `UnresolvableDrift`.
    pub fn schedule(
        &self,
        scene: &SceneSpec,
        alignment: &SceneAlignment,
    ) -> Result<Schedule, ScheduleError> {
        let schedule = self.resolve(scene, alignment)?;
        schedule.check_order()?;
        Ok(schedule)
    }

    fn clamp(&self, event: &Event, anchor: usize, boundary: f64, corrected: f64) -> EventDrift {
        let drift = corrected - boundary;
        let clamped = drift.abs() > self.tolerance + TIME_EPSILON;
        let resolved = if clamped {
            boundary + self.tolerance.copysign(drift)
        } else {
            corrected
        };

        if clamped {
            tracing::debug!(
                event = %event.id(),
                drift_ms = drift * 1000.0,
                boundary,
                resolved,
                "Clamped anchored event"
            );
        }

        EventDrift::new(event.id().clone(), anchor, boundary, corrected, resolved, clamped)
    }
}
