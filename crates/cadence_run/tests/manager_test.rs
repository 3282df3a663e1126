//! Tests for concurrent scene orchestration and run artifacts.

use cadence_core::{
    BoundingBox, EngineConfig, Event, EventBuilder, EventKind, FailureKind, FootprintBuilder,
    LessonSpec, LessonSpecBuilder, NarrationChunk, NarrationChunkBuilder, ProviderConfig,
    SceneSpec, SceneSpecBuilder, SceneState,
};
use cadence_error::StorageError;
use cadence_interface::{AudioInfo, AudioProbe};
use cadence_run::{CancellationToken, CueFile, RunIdentity, RunManager, RunReport, TimelineFile};
use cadence_storage::RunLayout;
use cadence_timeline::{InMemoryAudio, InMemoryFootprints};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn chunk(scene: &str, index: usize, start: f64, end: f64) -> NarrationChunk {
    NarrationChunkBuilder::default()
        .text(format!("{scene} part {index}"))
        .expected_start(start)
        .expected_end(end)
        .audio(format!("{scene}/{index}.wav"))
        .build()
        .unwrap()
}

fn event(id: &str, at: f64, anchor: Option<usize>) -> Event {
    EventBuilder::default()
        .id(id)
        .logical_timestamp(at)
        .kind(EventKind::Reveal)
        .target(id)
        .anchor(anchor)
        .build()
        .unwrap()
}

/// A 10 second scene of two 5 second chunks with events anchored to each.
fn scene(id: &str) -> SceneSpec {
    SceneSpecBuilder::default()
        .id(id)
        .title(id.to_uppercase())
        .narration(vec![chunk(id, 0, 0.0, 5.0), chunk(id, 1, 5.0, 10.0)])
        .events(vec![
            event(&format!("{id}_title"), 0.0, Some(0)),
            event(&format!("{id}_body"), 5.0, Some(1)),
        ])
        .expected_duration(10.0)
        .build()
        .unwrap()
}

fn lesson(ids: &[&str]) -> LessonSpec {
    LessonSpecBuilder::default()
        .id("kinematics")
        .topic("Motion in one dimension")
        .scenes(ids.iter().map(|id| scene(id)).collect::<Vec<_>>())
        .build()
        .unwrap()
}

/// Every chunk narrated in `seconds`.
fn audio(ids: &[&str], seconds: f64) -> InMemoryAudio {
    let mut audio = InMemoryAudio::new();
    for id in ids {
        audio.insert_secs(format!("{id}/0.wav"), seconds);
        audio.insert_secs(format!("{id}/1.wav"), seconds);
    }
    audio
}

fn config(concurrency: usize) -> EngineConfig {
    EngineConfig::default().with_max_concurrency(concurrency)
}

/// Delays audio of earlier scenes longer, so scenes finish in reverse order.
struct SlowAudio {
    inner: InMemoryAudio,
    order: Vec<String>,
}

impl AudioProbe for SlowAudio {
    fn probe(&self, chunk: &NarrationChunk) -> Result<AudioInfo, StorageError> {
        let scene = chunk.audio().parent().and_then(|p| p.to_str()).unwrap_or_default();
        let rank = self.order.iter().position(|s| s == scene).unwrap_or(0);
        std::thread::sleep(Duration::from_millis(20 * (self.order.len() - rank) as u64));
        self.inner.probe(chunk)
    }
}

/// Cancels the run the first time any audio is measured.
struct CancellingAudio {
    inner: InMemoryAudio,
    cancel: CancellationToken,
}

impl AudioProbe for CancellingAudio {
    fn probe(&self, chunk: &NarrationChunk) -> Result<AudioInfo, StorageError> {
        self.cancel.cancel();
        self.inner.probe(chunk)
    }
}

/// Panics while measuring one scene's audio; every other scene gets `seconds`.
struct PanickingAudio {
    scene: &'static str,
    seconds: f64,
}

impl AudioProbe for PanickingAudio {
    fn probe(&self, chunk: &NarrationChunk) -> Result<AudioInfo, StorageError> {
        if chunk.audio().starts_with(self.scene) {
            panic!("decoder crashed on {}", chunk.audio().display());
        }
        Ok(AudioInfo::new((self.seconds * 1000.0) as u64, 1000))
    }
}

#[tokio::test]
async fn test_reports_follow_plan_order_not_completion_order() {
    let ids = ["a", "b", "c", "d", "e"];
    let slow = SlowAudio {
        inner: audio(&ids, 5.5),
        order: ids.iter().map(|s| s.to_string()).collect(),
    };
    let manager = RunManager::new(
        config(ids.len()),
        Arc::new(slow),
        Arc::new(InMemoryFootprints::new()),
    );

    let reports = manager.execute(&lesson(&ids)).await.unwrap();

    let order: Vec<&str> = reports.iter().map(|r| r.scene_id().as_str()).collect();
    assert_eq!(order, ids);
    assert!(reports.iter().all(|r| r.passed()));
}

#[tokio::test]
async fn test_failed_scene_does_not_block_siblings() {
    let ids = ["intro", "broken", "outro"];
    let mut audio = audio(&ids, 5.0);
    audio.remove("broken/1.wav");
    let manager = RunManager::new(config(2), Arc::new(audio), Arc::new(InMemoryFootprints::new()));
    let temp_dir = TempDir::new().unwrap();

    let outcome = manager
        .run(&lesson(&ids), &ProviderConfig::default(), temp_dir.path())
        .await
        .unwrap();

    assert!(!outcome.passed());
    let scenes = outcome.report().scenes();
    assert!(scenes[0].passed());
    assert_eq!(*scenes[1].state(), SceneState::Failed);
    assert!(scenes[2].passed());

    let reason = outcome.report().verdict().reason().unwrap();
    assert_eq!(*reason.kind(), FailureKind::MissingNarrationAudio);
    assert_eq!(reason.scene_id(), "broken");
}

#[tokio::test]
async fn test_first_reason_is_in_scene_order() {
    let ids = ["first", "second"];
    let mut audio = audio(&ids, 5.0);
    // second: implausibly slow; first: missing audio
    audio.insert_secs("second/0.wav", 40.0);
    audio.remove("first/0.wav");
    let manager = RunManager::new(config(2), Arc::new(audio), Arc::new(InMemoryFootprints::new()));

    let reports = manager.execute(&lesson(&ids)).await.unwrap();
    let verdict = cadence_run::Verdict::evaluate(&reports, manager.config());

    assert_eq!(*verdict.reason().unwrap().kind(), FailureKind::MissingNarrationAudio);
    assert_eq!(
        *reports[1].failure().as_ref().unwrap().kind(),
        FailureKind::ImplausibleSpeechRate
    );
}

#[tokio::test]
async fn test_successful_run_writes_every_artifact() {
    let ids = ["intro", "outro"];
    let manager = RunManager::new(
        config(2),
        Arc::new(audio(&ids, 5.5)),
        Arc::new(InMemoryFootprints::new()),
    );
    let temp_dir = TempDir::new().unwrap();
    let lesson = lesson(&ids);
    let provider = ProviderConfig::default();

    let outcome = manager.run(&lesson, &provider, temp_dir.path()).await.unwrap();

    assert!(outcome.passed());
    let identity = RunIdentity::compute(&lesson, &provider).unwrap();
    assert_eq!(outcome.identity(), &identity);
    assert_eq!(outcome.dir(), &temp_dir.path().join(identity.id()));
    assert_eq!(outcome.artifacts().len(), 4);

    let layout = RunLayout::create(temp_dir.path(), identity.id()).unwrap();
    let cues: CueFile = layout.read_json(RunLayout::CUES).await.unwrap();
    assert_eq!(cues.scenes().len(), 2);
    assert!((cues.duration() - 22.0).abs() < 1e-9);

    let outro = &cues.scenes()[1];
    assert!((outro.start() - 11.0).abs() < 1e-9);
    assert!((outro.speed_factor() - 1.1).abs() < 1e-9);
    // outro_body: 5.0 × 1.1 = 5.5 within the scene, 16.5 in the lesson
    let body = &outro.cues()[1];
    assert!((body.at() - 5.5).abs() < 1e-9);
    assert!((body.lesson_at() - 16.5).abs() < 1e-9);
    assert_eq!(*body.frame(), 495);

    let report: RunReport = layout.read_json(RunLayout::REPORT).await.unwrap();
    assert!(report.verdict().passed());
    let timelines: TimelineFile = layout.read_json(RunLayout::TIMELINE).await.unwrap();
    assert_eq!(timelines.timelines().len(), 2);
}

#[tokio::test]
async fn test_failed_run_writes_report_but_no_cues() {
    let ids = ["only"];
    let manager = RunManager::new(
        config(1),
        Arc::new(audio(&ids, 30.0)),
        Arc::new(InMemoryFootprints::new()),
    );
    let temp_dir = TempDir::new().unwrap();

    let outcome = manager
        .run(&lesson(&ids), &ProviderConfig::default(), temp_dir.path())
        .await
        .unwrap();

    assert!(!outcome.passed());
    assert!(outcome.dir().join(RunLayout::REPORT).exists());
    assert!(outcome.dir().join(RunLayout::RUN).exists());
    assert!(!outcome.dir().join(RunLayout::CUES).exists());
    assert_eq!(
        *outcome.report().verdict().reason().unwrap().kind(),
        FailureKind::ImplausibleSpeechRate
    );
}

#[tokio::test]
async fn test_significant_overlaps_warn_unless_fatal() {
    let ids = ["crowded"];
    let mut footprints = InMemoryFootprints::new();
    let bounds = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
    footprints.insert_sample(
        "crowded",
        2,
        ["graph", "caption"]
            .into_iter()
            .map(|id| {
                FootprintBuilder::default()
                    .element_id(id)
                    .bounds(bounds)
                    .appear_time(0.0)
                    .disappear_time(20.0)
                    .build()
                    .unwrap()
            })
            .collect(),
    );
    let footprints = Arc::new(footprints);
    let temp_dir = TempDir::new().unwrap();

    let lenient = RunManager::new(config(1), Arc::new(audio(&ids, 5.0)), footprints.clone());
    let outcome = lenient
        .run(&lesson(&ids), &ProviderConfig::default(), temp_dir.path())
        .await
        .unwrap();
    assert!(outcome.passed());
    assert_eq!(*outcome.report().warnings(), 1);

    let strict = RunManager::new(
        config(1).with_fatal_significant_overlaps(true),
        Arc::new(audio(&ids, 5.0)),
        footprints,
    );
    let outcome = strict
        .run(&lesson(&ids), &ProviderConfig::default(), temp_dir.path())
        .await
        .unwrap();
    assert!(!outcome.passed());
    assert_eq!(
        *outcome.report().verdict().reason().unwrap().kind(),
        FailureKind::SignificantOverlap
    );
    // Same inputs, same directory; the earlier cue list is gone.
    assert!(!outcome.dir().join(RunLayout::CUES).exists());
}

#[tokio::test]
async fn test_cancellation_stops_dispatch_of_remaining_scenes() {
    let ids = ["one", "two", "three"];
    let cancel = CancellationToken::new();
    let cancelling = CancellingAudio {
        inner: audio(&ids, 5.0),
        cancel: cancel.clone(),
    };
    let manager = RunManager::new(config(1), Arc::new(cancelling), Arc::new(InMemoryFootprints::new()))
        .with_cancel_token(cancel);

    let reports = manager.execute(&lesson(&ids)).await.unwrap();

    // The in-flight scene finishes; the rest are never dispatched.
    assert!(reports[0].passed());
    for report in &reports[1..] {
        assert_eq!(*report.state(), SceneState::Failed);
        assert_eq!(
            *report.failure().as_ref().unwrap().kind(),
            FailureKind::Cancelled
        );
        assert_eq!(report.history(), &vec![SceneState::Pending, SceneState::Failed]);
    }
}

#[tokio::test]
async fn test_panicking_worker_fails_its_scene_and_report_is_written() {
    let ids = ["good", "bad", "also_good"];
    let panicking = PanickingAudio {
        scene: "bad",
        seconds: 5.0,
    };
    let manager = RunManager::new(config(2), Arc::new(panicking), Arc::new(InMemoryFootprints::new()));
    let temp_dir = TempDir::new().unwrap();

    let outcome = manager
        .run(&lesson(&ids), &ProviderConfig::default(), temp_dir.path())
        .await
        .unwrap();

    assert!(!outcome.passed());
    let scenes = outcome.report().scenes();
    assert!(scenes[0].passed());
    assert_eq!(*scenes[1].state(), SceneState::Failed);
    assert!(scenes[2].passed());

    let reason = outcome.report().verdict().reason().unwrap();
    assert_eq!(*reason.kind(), FailureKind::WorkerFailed);
    assert_eq!(reason.scene_id(), "bad");

    assert!(outcome.dir().join(RunLayout::REPORT).exists());
    assert!(!outcome.dir().join(RunLayout::CUES).exists());
    let timelines: TimelineFile = RunLayout::create(temp_dir.path(), outcome.identity().id())
        .unwrap()
        .read_json(RunLayout::TIMELINE)
        .await
        .unwrap();
    assert_eq!(timelines.timelines().len(), 2);
}

#[tokio::test]
async fn test_invalid_plan_is_rejected_before_dispatch() {
    let bad = LessonSpecBuilder::default()
        .id("empty")
        .topic("nothing")
        .scenes(Vec::<SceneSpec>::new())
        .build()
        .unwrap();
    let manager = RunManager::new(config(1), Arc::new(InMemoryAudio::new()), Arc::new(InMemoryFootprints::new()));
    let temp_dir = TempDir::new().unwrap();

    let result = manager.run(&bad, &ProviderConfig::default(), temp_dir.path()).await;

    assert!(result.is_err());
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_identity_is_deterministic_and_input_sensitive() {
    let lesson = lesson(&["a", "b"]);
    let provider = ProviderConfig::default();

    let first = RunIdentity::compute(&lesson, &provider).unwrap();
    let second = RunIdentity::compute(&lesson, &provider).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.id().len(), RunIdentity::SHORT_LEN);
    assert!(first.digest().starts_with(first.id()));

    let other_voice = RunIdentity::compute(&lesson, &provider.clone().with_voice("verse")).unwrap();
    assert_ne!(first, other_voice);

    let other_lesson = RunIdentity::compute(&self::lesson(&["a"]), &provider).unwrap();
    assert_ne!(first, other_lesson);
}
