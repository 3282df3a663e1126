//! Tests for the per-scene pipeline.

use cadence_core::{
    AlignmentOutcome, BoundingBox, EngineConfig, Event, EventBuilder, EventKind, FailureKind,
    FootprintBuilder, NarrationChunkBuilder, SceneSpec, SceneSpecBuilder, SceneState,
};
use cadence_timeline::{InMemoryAudio, InMemoryFootprints, SceneReport, run_scene};

fn event(id: &str, at: f64, anchor: Option<usize>) -> Event {
    EventBuilder::default()
        .id(id)
        .logical_timestamp(at)
        .kind(EventKind::Highlight)
        .target(id)
        .anchor(anchor)
        .build()
        .unwrap()
}

fn scene(events: Vec<Event>) -> SceneSpec {
    SceneSpecBuilder::default()
        .id("momentum")
        .narration(vec![
            NarrationChunkBuilder::default()
                .expected_start(0.0)
                .expected_end(10.0)
                .audio("m/0.wav")
                .build()
                .unwrap(),
            NarrationChunkBuilder::default()
                .expected_start(10.0)
                .expected_end(20.0)
                .audio("m/1.wav")
                .build()
                .unwrap(),
        ])
        .events(events)
        .expected_duration(20.0)
        .build()
        .unwrap()
}

fn audio() -> InMemoryAudio {
    InMemoryAudio::new()
        .with_secs("m/0.wav", 11.0)
        .with_secs("m/1.wav", 11.0)
}

#[test]
fn test_passing_scene_walks_every_state() {
    let config = EngineConfig::default();
    let scene = scene(vec![event("p", 0.0, Some(0)), event("v", 10.0, Some(1))]);

    let report = run_scene(&scene, &audio(), &InMemoryFootprints::new(), &config).unwrap();

    assert!(report.passed());
    assert_eq!(
        report.history(),
        &vec![
            SceneState::Pending,
            SceneState::Aligning,
            SceneState::Scheduling,
            SceneState::Validating,
            SceneState::Passed,
        ]
    );
    assert_eq!(*report.alignment().outcome(), AlignmentOutcome::Ok);
    let timeline = report.timeline().as_ref().unwrap();
    assert!((timeline.duration() - 22.0).abs() < 1e-9);
    assert_eq!(timeline.cues().len(), 2);
    assert!(report.failure().is_none());
}

#[test]
fn test_missing_audio_fails_while_aligning() {
    let config = EngineConfig::default();
    let audio = InMemoryAudio::new().with_secs("m/0.wav", 11.0);

    let report = run_scene(&scene(vec![]), &audio, &InMemoryFootprints::new(), &config).unwrap();

    assert_eq!(*report.state(), SceneState::Failed);
    assert_eq!(
        report.history(),
        &vec![SceneState::Pending, SceneState::Aligning, SceneState::Failed]
    );
    assert_eq!(
        *report.failure().as_ref().unwrap().kind(),
        FailureKind::MissingNarrationAudio
    );
    assert!(report.alignment().speed_factor().is_none());
    assert!(report.timeline().is_none());
}

#[test]
fn test_implausible_rate_resolves_no_events() {
    let config = EngineConfig::default();
    let audio = InMemoryAudio::new()
        .with_secs("m/0.wav", 50.0)
        .with_secs("m/1.wav", 50.0);

    let report = run_scene(
        &scene(vec![event("p", 1.0, None)]),
        &audio,
        &InMemoryFootprints::new(),
        &config,
    )
    .unwrap();

    assert_eq!(
        *report.failure().as_ref().unwrap().kind(),
        FailureKind::ImplausibleSpeechRate
    );
    assert_eq!(*report.alignment().speed_factor(), Some(5.0));
    assert_eq!(*report.alignment().outcome(), AlignmentOutcome::Failed);
    assert!(report.timeline().is_none());
}

#[test]
fn test_unresolvable_drift_fails_while_scheduling() {
    let config = EngineConfig::default();
    let report = run_scene(
        &scene(vec![event("early", 5.0, Some(1)), event("next", 6.0, None)]),
        &audio(),
        &InMemoryFootprints::new(),
        &config,
    )
    .unwrap();

    assert_eq!(
        report.history().last(),
        Some(&SceneState::Failed)
    );
    assert_eq!(report.history()[2], SceneState::Scheduling);
    assert_eq!(
        *report.failure().as_ref().unwrap().kind(),
        FailureKind::UnresolvableDrift
    );
    assert_eq!(report.alignment().drifts().len(), 1);
}

#[test]
fn test_overlaps_are_reported_without_failing_the_scene() {
    let config = EngineConfig::default();
    let mut footprints = InMemoryFootprints::new();
    let bounds = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
    footprints.insert_static(
        "momentum",
        ["cart", "arrow"]
            .into_iter()
            .map(|id| {
                FootprintBuilder::default()
                    .element_id(id)
                    .bounds(bounds)
                    .appear_time(0.0)
                    .disappear_time(30.0)
                    .build()
                    .unwrap()
            })
            .collect(),
    );

    let report = run_scene(&scene(vec![]), &audio(), &footprints, &config).unwrap();

    assert!(report.passed());
    assert_eq!(report.overlaps().len(), 5);
    assert_eq!(report.significant_overlaps().count(), 5);
}

#[test]
fn test_unavailable_footprints_fail_while_validating() {
    let config = EngineConfig::default();
    let mut footprints = InMemoryFootprints::new();
    footprints.mark_unavailable("momentum");

    let report = run_scene(&scene(vec![]), &audio(), &footprints, &config).unwrap();

    assert_eq!(report.history()[3], SceneState::Validating);
    assert_eq!(
        *report.failure().as_ref().unwrap().kind(),
        FailureKind::FootprintUnavailable
    );
}

#[test]
fn test_cancelled_report() {
    let report = SceneReport::cancelled(&scene(vec![]));

    assert_eq!(*report.state(), SceneState::Failed);
    assert_eq!(
        *report.failure().as_ref().unwrap().kind(),
        FailureKind::Cancelled
    );
}
