//! Lesson plan structures produced by the prompt-expansion collaborator.

use crate::{StyleTokens, TIME_EPSILON};
use cadence_error::{PlanError, PlanErrorKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Visual action performed by an event.
///
/// The renderer decides what each kind looks like; the engine only schedules them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Bring an element on screen
    #[display("reveal")]
    Reveal,
    /// Emphasise an element already on screen
    #[display("highlight")]
    Highlight,
    /// Morph one element into another
    #[display("transform")]
    Transform,
    /// Show a scene or section title
    #[display("title")]
    Title,
    /// Fade an element out
    #[display("fade")]
    Fade,
}

/// A contiguous span of narration with its planned timing.
///
/// `measured_duration` is absent in a plan and is filled in by the aligner from the
/// synthesized audio artifact referenced by `audio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct NarrationChunk {
    /// Spoken text
    #[builder(default)]
    #[serde(default)]
    text: String,
    /// Planned start relative to scene start, in seconds
    expected_start: f64,
    /// Planned end relative to scene start, in seconds
    expected_end: f64,
    /// Synthesized audio artifact, relative to the run's audio root
    audio: PathBuf,
    /// Duration read from the audio artifact, in seconds
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    measured_duration: Option<f64>,
}

impl NarrationChunk {
    /// Planned length of this chunk in seconds.
    pub fn expected_length(&self) -> f64 {
        self.expected_end - self.expected_start
    }

    /// Returns a copy carrying the measured duration.
    pub fn with_measured_duration(&self, seconds: f64) -> Self {
        Self {
            measured_duration: Some(seconds),
            ..self.clone()
        }
    }
}

/// A scheduled visual action tied to a logical time within a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct Event {
    /// Event identifier, unique within its scene
    id: String,
    /// Pre-correction timestamp relative to scene start, in seconds
    logical_timestamp: f64,
    /// Visual action
    kind: EventKind,
    /// Target element identifier
    target: String,
    /// Narration chunk whose spoken start this event must coincide with
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anchor: Option<usize>,
    /// Corrected timestamp, set once by the scheduler
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resolved_timestamp: Option<f64>,
}

impl Event {
    /// Returns a copy carrying the resolved timestamp.
    pub fn with_resolved_timestamp(&self, seconds: f64) -> Self {
        Self {
            resolved_timestamp: Some(seconds),
            ..self.clone()
        }
    }

    /// Whether this event was authored to coincide with a narration boundary.
    pub fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }
}

/// A single instructional scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct SceneSpec {
    /// Scene identifier, unique within the lesson
    id: String,
    /// Human-readable title
    #[builder(default)]
    #[serde(default)]
    title: String,
    /// Ordered narration chunks
    #[builder(default)]
    #[serde(default)]
    narration: Vec<NarrationChunk>,
    /// Events in non-decreasing logical order
    #[builder(default)]
    #[serde(default)]
    events: Vec<Event>,
    /// Pre-synthesis estimate of the scene length, in seconds
    expected_duration: f64,
}

impl SceneSpec {
    /// Sum of planned chunk lengths in seconds.
    pub fn expected_narration(&self) -> f64 {
        self.narration.iter().map(NarrationChunk::expected_length).sum()
    }

    /// Checks the scene invariants: positive duration, contiguous chunks,
    /// ordered in-range events with unique ids and valid anchors.
    pub fn validate(&self) -> Result<(), PlanError> {
        if !(self.expected_duration.is_finite() && self.expected_duration > 0.0) {
            return Err(PlanError::new(PlanErrorKind::NonPositiveDuration {
                scene: self.id.clone(),
                duration: self.expected_duration,
            }));
        }

        let mut previous_end: Option<f64> = None;
        for (index, chunk) in self.narration.iter().enumerate() {
            let span_error = |reason: String| {
                PlanError::new(PlanErrorKind::ChunkSpan {
                    scene: self.id.clone(),
                    chunk: index,
                    reason,
                })
            };

            if chunk.expected_start < 0.0 || chunk.expected_end <= chunk.expected_start {
                return Err(span_error(format!(
                    "span [{}, {}] is empty or inverted",
                    chunk.expected_start, chunk.expected_end
                )));
            }
            if let Some(end) = previous_end {
                if (chunk.expected_start - end).abs() > TIME_EPSILON {
                    return Err(span_error(format!(
                        "starts at {} but previous chunk ends at {}",
                        chunk.expected_start, end
                    )));
                }
            }
            previous_end = Some(chunk.expected_end);
        }

        let mut seen = HashSet::new();
        let mut previous_at = 0.0;
        for event in &self.events {
            if !seen.insert(event.id.as_str()) {
                return Err(PlanError::new(PlanErrorKind::DuplicateEvent {
                    scene: self.id.clone(),
                    event: event.id.clone(),
                }));
            }
            let at = event.logical_timestamp;
            if !(0.0..=self.expected_duration).contains(&at) {
                return Err(PlanError::new(PlanErrorKind::EventOutOfRange {
                    scene: self.id.clone(),
                    event: event.id.clone(),
                    at,
                    duration: self.expected_duration,
                }));
            }
            if at < previous_at {
                return Err(PlanError::new(PlanErrorKind::EventsOutOfOrder {
                    scene: self.id.clone(),
                    event: event.id.clone(),
                }));
            }
            if let Some(chunk) = event.anchor.filter(|&c| c >= self.narration.len()) {
                return Err(PlanError::new(PlanErrorKind::UnknownAnchor {
                    scene: self.id.clone(),
                    event: event.id.clone(),
                    chunk,
                }));
            }
            previous_at = at;
        }

        Ok(())
    }
}

/// Top-level lesson plan derived from a prompt.
///
/// # Example JSON Structure
///
/// ```json
/// {
///   "id": "newton-2",
///   "topic": "Newton's second law",
///   "scenes": [{
///     "id": "intro",
///     "expected_duration": 12.0,
///     "narration": [
///       {"text": "Force is mass times acceleration.", "expected_start": 0.0,
///        "expected_end": 6.0, "audio": "intro/000.wav"}
///     ],
///     "events": [
///       {"id": "title", "logical_timestamp": 0.0, "kind": "title",
///        "target": "heading", "anchor": 0}
///     ]
///   }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct LessonSpec {
    /// Lesson identifier
    id: String,
    /// Lesson topic
    topic: String,
    /// Prompt the lesson was expanded from
    #[builder(default)]
    #[serde(default)]
    prompt: String,
    /// Visual identity tokens shared across scenes
    #[builder(default)]
    #[serde(default)]
    style: StyleTokens,
    /// Ordered scenes
    scenes: Vec<SceneSpec>,
}

impl LessonSpec {
    /// Loads and validates a lesson plan from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the JSON is invalid,
    /// or any scene violates the plan invariants.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PlanError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PlanError::new(PlanErrorKind::FileRead(e.to_string())))?;
        content.parse()
    }

    /// Checks lesson-wide invariants, then each scene's.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.scenes.is_empty() {
            return Err(PlanError::new(PlanErrorKind::NoScenes(self.id.clone())));
        }

        let mut seen = HashSet::new();
        for scene in &self.scenes {
            if !seen.insert(scene.id.as_str()) {
                return Err(PlanError::new(PlanErrorKind::DuplicateScene(
                    scene.id.clone(),
                )));
            }
            scene.validate()?;
        }

        tracing::debug!(lesson = %self.id, scenes = self.scenes.len(), "Validated lesson plan");
        Ok(())
    }
}

impl FromStr for LessonSpec {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lesson: LessonSpec = serde_json::from_str(s)
            .map_err(|e| PlanError::new(PlanErrorKind::Parse(e.to_string())))?;
        lesson.validate()?;
        Ok(lesson)
    }
}
