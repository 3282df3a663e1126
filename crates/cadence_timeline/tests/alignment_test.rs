//! Tests for narration alignment and event scheduling.

use cadence_core::{
    AlignmentOutcome, EngineConfig, Event, EventBuilder, EventKind, NarrationChunk,
    NarrationChunkBuilder, SceneSpec, SceneSpecBuilder,
};
use cadence_error::{AlignmentErrorKind, ScheduleErrorKind};
use cadence_timeline::{EventScheduler, InMemoryAudio, NarrationAligner};

const EPS: f64 = 1e-9;

fn chunk(start: f64, end: f64, audio: &str) -> NarrationChunk {
    NarrationChunkBuilder::default()
        .expected_start(start)
        .expected_end(end)
        .audio(audio)
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

/// Plan of 10 + 9 + 11 seconds narrated in 11.2 + 9.7 + 12.1 seconds (factor 1.1).
fn three_chunk_scene(events: Vec<Event>) -> (SceneSpec, InMemoryAudio) {
    let scene = SceneSpecBuilder::default()
        .id("forces")
        .narration(vec![
            chunk(0.0, 10.0, "forces/0.wav"),
            chunk(10.0, 19.0, "forces/1.wav"),
            chunk(19.0, 30.0, "forces/2.wav"),
        ])
        .events(events)
        .expected_duration(30.0)
        .build()
        .unwrap();
    let audio = InMemoryAudio::new()
        .with_secs("forces/0.wav", 11.2)
        .with_secs("forces/1.wav", 9.7)
        .with_secs("forces/2.wav", 12.1);
    (scene, audio)
}

#[test]
fn test_speed_factor_is_measured_over_expected() {
    let config = EngineConfig::default();
    let (scene, audio) = three_chunk_scene(vec![]);

    let alignment = NarrationAligner::new(&config).align(&scene, &audio).unwrap();

    assert!((alignment.speed_factor() - 1.1).abs() < EPS);
    assert!((alignment.scene_measured() - 33.0).abs() < EPS);
    assert_eq!(*alignment.scene_expected(), 30.0);
    assert_eq!(alignment.boundary(0), Some(0.0));
    assert!((alignment.boundary(2).unwrap() - 20.9).abs() < EPS);
    assert!(
        alignment
            .chunks()
            .iter()
            .all(|c| c.measured_duration().is_some())
    );
    // The plan itself is untouched.
    assert!(scene.narration().iter().all(|c| c.measured_duration().is_none()));
}

#[test]
fn test_anchored_event_within_tolerance_is_accepted() {
    let config = EngineConfig::default();
    let (scene, audio) = three_chunk_scene(vec![event("reveal_f", 10.0, Some(1))]);

    let alignment = NarrationAligner::new(&config).align(&scene, &audio).unwrap();
    let schedule = EventScheduler::new(&config).schedule(&scene, &alignment).unwrap();

    let drift = &schedule.drifts()[0];
    assert!((schedule.events()[0].resolved_timestamp().unwrap() - 11.0).abs() < EPS);
    assert!((drift.boundary_time() - 11.2).abs() < EPS);
    assert!((drift.raw_drift_ms() + 200.0).abs() < 1e-6);
    assert!(!drift.clamped());
    assert_eq!(schedule.outcome(), AlignmentOutcome::Ok);
}

#[test]
fn test_only_anchored_events_carry_drift() {
    let config = EngineConfig::default();
    let (scene, audio) = three_chunk_scene(vec![
        event("glow", 4.0, None),
        event("reveal_f", 10.0, Some(1)),
        event("fade", 25.0, None),
    ]);

    let alignment = NarrationAligner::new(&config).align(&scene, &audio).unwrap();
    let schedule = EventScheduler::new(&config).schedule(&scene, &alignment).unwrap();

    assert_eq!(schedule.drifts().len(), 1);
    assert_eq!(schedule.drifts()[0].event_id(), "reveal_f");
    assert!((schedule.events()[0].resolved_timestamp().unwrap() - 4.4).abs() < EPS);
    assert!((schedule.events()[2].resolved_timestamp().unwrap() - 27.5).abs() < EPS);
}

#[test]
fn test_anchored_event_beyond_tolerance_is_clamped() {
    let config = EngineConfig::default();
    let (scene, audio) = three_chunk_scene(vec![event("reveal_a", 200.0 / 11.0, Some(2))]);

    let alignment = NarrationAligner::new(&config).align(&scene, &audio).unwrap();
    let schedule = EventScheduler::new(&config).schedule(&scene, &alignment).unwrap();

    let drift = &schedule.drifts()[0];
    assert!((drift.corrected_timestamp() - 20.0).abs() < EPS);
    assert!((drift.resolved_timestamp() - 20.6).abs() < EPS);
    assert!((drift.residual_drift_ms() + 300.0).abs() < 1e-6);
    assert!(*drift.clamped());

    let record = schedule.record(schedule.outcome());
    assert_eq!(*record.outcome(), AlignmentOutcome::Clamped);
    assert_eq!(record.clamped_events(), vec!["reveal_a"]);

    let timeline = schedule.timeline(30);
    assert!(*timeline.cues()[0].clamped());
    assert_eq!(*timeline.cues()[0].frame(), 618);
}

#[test]
fn test_late_anchored_event_clamps_after_boundary() {
    let config = EngineConfig::default();
    let (scene, audio) = three_chunk_scene(vec![event("late", 10.0, Some(0))]);

    let alignment = NarrationAligner::new(&config).align(&scene, &audio).unwrap();
    let schedule = EventScheduler::new(&config).schedule(&scene, &alignment).unwrap();

    assert!((schedule.drifts()[0].resolved_timestamp() - 0.3).abs() < EPS);
}

#[test]
fn test_lead_in_before_first_chunk_offsets_boundaries() {
    let config = EngineConfig::default();
    let scene = SceneSpecBuilder::default()
        .id("late_start")
        .narration(vec![chunk(5.0, 10.0, "l/0.wav")])
        .events(vec![event("on_cue", 5.0, Some(0))])
        .expected_duration(12.0)
        .build()
        .unwrap();
    scene.validate().unwrap();
    let audio = InMemoryAudio::new().with_secs("l/0.wav", 5.0);

    let alignment = NarrationAligner::new(&config).align(&scene, &audio).unwrap();
    let schedule = EventScheduler::new(&config).schedule(&scene, &alignment).unwrap();

    assert_eq!(alignment.boundary(0), Some(5.0));
    let drift = &schedule.drifts()[0];
    assert!((drift.resolved_timestamp() - 5.0).abs() < EPS);
    assert!(drift.residual_drift_ms().abs() < 1e-6);
    assert!(!*drift.clamped());
    assert_eq!(schedule.outcome(), AlignmentOutcome::Ok);
}

#[test]
fn test_lead_in_is_rescaled_with_the_scene() {
    let config = EngineConfig::default();
    let scene = SceneSpecBuilder::default()
        .id("slow_start")
        .narration(vec![chunk(4.0, 9.0, "s/0.wav"), chunk(9.0, 14.0, "s/1.wav")])
        .events(vec![event("first", 4.0, Some(0)), event("second", 9.0, Some(1))])
        .expected_duration(16.0)
        .build()
        .unwrap();
    // 12 s over a 10 s plan: factor 1.2
    let audio = InMemoryAudio::new()
        .with_secs("s/0.wav", 6.0)
        .with_secs("s/1.wav", 6.0);

    let alignment = NarrationAligner::new(&config).align(&scene, &audio).unwrap();
    let schedule = EventScheduler::new(&config).schedule(&scene, &alignment).unwrap();

    assert!((alignment.boundary(0).unwrap() - 4.8).abs() < EPS);
    assert!((alignment.boundary(1).unwrap() - 10.8).abs() < EPS);
    assert!(schedule.drifts().iter().all(|d| !*d.clamped()));
    assert!((schedule.drifts()[1].resolved_timestamp() - 10.8).abs() < EPS);
}

#[test]
fn test_implausible_speech_rate_fails_alignment() {
    let config = EngineConfig::default();
    let scene = SceneSpecBuilder::default()
        .id("rushed")
        .narration(vec![chunk(0.0, 4.0, "r/0.wav"), chunk(4.0, 10.0, "r/1.wav")])
        .events(vec![event("e", 2.0, None)])
        .expected_duration(10.0)
        .build()
        .unwrap();
    let audio = InMemoryAudio::new()
        .with_secs("r/0.wav", 20.0)
        .with_secs("r/1.wav", 30.0);

    let err = NarrationAligner::new(&config).align(&scene, &audio).unwrap_err();

    match err.kind {
        AlignmentErrorKind::ImplausibleSpeechRate { factor, .. } => {
            assert!((factor - 5.0).abs() < EPS)
        }
        other => panic!("Expected ImplausibleSpeechRate, got {other:?}"),
    }
}

#[test]
fn test_band_edges_are_plausible() {
    let config = EngineConfig::default();
    for (measured, expected_ok) in [(5.0, true), (20.0, true), (4.9, false), (20.1, false)] {
        let scene = SceneSpecBuilder::default()
            .id("edge")
            .narration(vec![chunk(0.0, 10.0, "edge.wav")])
            .expected_duration(10.0)
            .build()
            .unwrap();
        let audio = InMemoryAudio::new().with_secs("edge.wav", measured);
        let result = NarrationAligner::new(&config).align(&scene, &audio);
        assert_eq!(result.is_ok(), expected_ok, "measured {measured}s");
    }
}

#[test]
fn test_missing_audio_names_the_chunk() {
    let config = EngineConfig::default();
    let (scene, mut audio) = three_chunk_scene(vec![]);
    audio.remove("forces/1.wav");

    let err = NarrationAligner::new(&config).align(&scene, &audio).unwrap_err();

    assert!(matches!(
        err.kind,
        AlignmentErrorKind::MissingNarrationAudio { chunk: 1, ref scene, .. } if scene == "forces"
    ));
}

#[test]
fn test_empty_audio_counts_as_missing() {
    let config = EngineConfig::default();
    let (scene, mut audio) = three_chunk_scene(vec![]);
    audio.insert_secs("forces/2.wav", 0.0);

    let err = NarrationAligner::new(&config).align(&scene, &audio).unwrap_err();

    assert!(matches!(
        err.kind,
        AlignmentErrorKind::MissingNarrationAudio { chunk: 2, .. }
    ));
}

#[test]
fn test_scene_without_narration_keeps_logical_times() {
    let config = EngineConfig::default();
    let scene = SceneSpecBuilder::default()
        .id("silent")
        .events(vec![event("a", 1.0, None), event("b", 4.5, None)])
        .expected_duration(5.0)
        .build()
        .unwrap();

    let alignment = NarrationAligner::new(&config)
        .align(&scene, &InMemoryAudio::new())
        .unwrap();
    let schedule = EventScheduler::new(&config).schedule(&scene, &alignment).unwrap();

    assert_eq!(*alignment.speed_factor(), 1.0);
    assert_eq!(schedule.timeline(30).timestamps(), vec![1.0, 4.5]);
    assert_eq!(*schedule.duration(), 5.0);
}

#[test]
fn test_unanchored_events_scale_exactly() {
    let config = EngineConfig::default();
    let logical = [0.0, 1.25, 3.5, 7.0, 9.75];
    for measured in [5.0, 8.0, 10.0, 13.3, 19.9] {
        let scene = SceneSpecBuilder::default()
            .id("scaled")
            .narration(vec![chunk(0.0, 10.0, "s.wav")])
            .events(
                logical
                    .iter()
                    .enumerate()
                    .map(|(i, &at)| event(&format!("e{i}"), at, None))
                    .collect::<Vec<_>>(),
            )
            .expected_duration(10.0)
            .build()
            .unwrap();
        let audio = InMemoryAudio::new().with_secs("s.wav", measured);

        let alignment = NarrationAligner::new(&config).align(&scene, &audio).unwrap();
        let factor = *alignment.speed_factor();
        let schedule = EventScheduler::new(&config).schedule(&scene, &alignment).unwrap();

        for (event, at) in schedule.events().iter().zip(logical) {
            assert_eq!(event.resolved_timestamp().unwrap(), at * factor);
        }
        assert!(schedule.drifts().is_empty());
    }
}

#[test]
fn test_rescheduling_is_idempotent() {
    let config = EngineConfig::default();
    let (scene, audio) = three_chunk_scene(vec![
        event("title", 0.0, Some(0)),
        event("reveal_f", 10.0, Some(1)),
        event("reveal_a", 200.0 / 11.0, Some(2)),
        event("outro", 29.0, None),
    ]);
    let aligner = NarrationAligner::new(&config);
    let scheduler = EventScheduler::new(&config);

    let first = scheduler
        .schedule(&scene, &aligner.align(&scene, &audio).unwrap())
        .unwrap();
    let second = scheduler
        .schedule(&scene, &aligner.align(&scene, &audio).unwrap())
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.timeline(30), second.timeline(30));
}

#[test]
fn test_clamping_that_reorders_events_is_unresolvable() {
    let config = EngineConfig::default();
    let scene = SceneSpecBuilder::default()
        .id("tangled")
        .narration(vec![chunk(0.0, 10.0, "t/0.wav"), chunk(10.0, 20.0, "t/1.wav")])
        .events(vec![event("early", 5.0, Some(1)), event("next", 6.0, None)])
        .expected_duration(20.0)
        .build()
        .unwrap();
    let audio = InMemoryAudio::new()
        .with_secs("t/0.wav", 10.0)
        .with_secs("t/1.wav", 10.0);

    let alignment = NarrationAligner::new(&config).align(&scene, &audio).unwrap();
    let scheduler = EventScheduler::new(&config);

    let resolved = scheduler.resolve(&scene, &alignment).unwrap();
    assert!((resolved.drifts()[0].resolved_timestamp() - 9.7).abs() < EPS);

    let err = scheduler.schedule(&scene, &alignment).unwrap_err();
    assert!(matches!(
        err.kind,
        ScheduleErrorKind::UnresolvableDrift { ref event, ref previous, .. }
            if event == "next" && previous == "early"
    ));
}

#[test]
fn test_equal_resolved_timestamps_are_ordered() {
    let config = EngineConfig::default();
    let scene = SceneSpecBuilder::default()
        .id("tied")
        .narration(vec![chunk(0.0, 10.0, "t/0.wav"), chunk(10.0, 20.0, "t/1.wav")])
        .events(vec![event("clamped", 5.0, Some(1)), event("same", 9.7, None)])
        .expected_duration(20.0)
        .build()
        .unwrap();
    let audio = InMemoryAudio::new()
        .with_secs("t/0.wav", 10.0)
        .with_secs("t/1.wav", 10.0);

    let alignment = NarrationAligner::new(&config).align(&scene, &audio).unwrap();

    assert!(EventScheduler::new(&config).schedule(&scene, &alignment).is_ok());
}
