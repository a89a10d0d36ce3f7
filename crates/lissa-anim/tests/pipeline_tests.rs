use std::f64::consts::FRAC_PI_2;
use std::time::Duration;

use glam::DVec3;
use lissa_anim::{
    AnimationDriver, AxisBounds, Layer, ManualScheduler, MarkerStyle, Scene, SceneRecorder,
    Scheduler, TimerScheduler, Visualizer, VisualizerSettings,
};
use lissa_core::{
    generate, AnimationConfig, AxisWave, Fragmentation, FrameState, ParameterName, Toggle,
    WaveError, WaveParameters,
};

// ── Helpers ──────────────────────────────────────────────────────

const EPSILON: f64 = 1e-9;

fn approx(a: DVec3, b: DVec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

/// Free Mode leaves the default parameters untouched.
fn free_settings(state: FrameState) -> VisualizerSettings {
    VisualizerSettings {
        frame_state: state,
        preset: Some("Free Mode".to_string()),
        ..Default::default()
    }
}

fn manual(settings: VisualizerSettings) -> Visualizer<ManualScheduler, SceneRecorder> {
    let mut v = Visualizer::new(settings, ManualScheduler::new(), SceneRecorder::new()).unwrap();
    v.start();
    v
}

fn last_scene(v: &Visualizer<ManualScheduler, SceneRecorder>) -> &Scene {
    v.renderer().scene()
}

// ── 1. Default trajectory ────────────────────────────────────────

#[test]
fn default_trajectory_matches_closed_form() {
    let v = manual(free_settings(FrameState::default()));
    let samples = v.samples().unwrap();
    assert_eq!(samples.len(), 360);
    assert!(approx(samples.point(0).unwrap(), DVec3::new(1.0, 0.0, 1.0)));
    assert!(approx(samples.point(90).unwrap(), DVec3::new(-1.0, 0.0, 1.0)));
}

#[test]
fn flat_disk_start_flattens_z() {
    let v = manual(VisualizerSettings::default());
    let samples = v.samples().unwrap();
    assert!(samples.axis(lissa_core::Axis::Z).all(|z| z == 0.0));
    assert_eq!(v.parameters().y.phase, FRAC_PI_2);
}

// ── 2. Frame order and layers ────────────────────────────────────

#[test]
fn every_frame_emitted_even_with_nothing_enabled() {
    let mut v = manual(free_settings(FrameState::none()));
    assert_eq!(v.run(360).unwrap(), 360);
    assert_eq!(v.renderer().frames_rendered(), 360);
    assert!(last_scene(&v).is_blank());
    assert!(last_scene(&v).bounds.is_none());
}

#[test]
fn time_track_grows_to_full_loop() {
    let state = FrameState { time_track: true, ..FrameState::none() };
    let mut v = manual(free_settings(state));
    v.tick().unwrap();
    assert!(last_scene(&v).polyline(Layer::Track).is_empty());
    v.run(359).unwrap();
    assert_eq!(last_scene(&v).frame, Some(359));
    assert_eq!(last_scene(&v).polyline(Layer::Track).len(), 359);
}

#[test]
fn vector_tip_follows_sample_buffer() {
    let state = FrameState { vector: true, ..FrameState::none() };
    let mut v = manual(free_settings(state));
    v.run(91).unwrap();
    let slot = last_scene(&v).vectors[0];
    let segment = slot.segment.unwrap();
    assert_eq!(segment.origin, DVec3::ZERO);
    assert!(approx(segment.tip, DVec3::new(-1.0, 0.0, 1.0)));
    assert_eq!(slot.opacity, 1.0);
}

// ── 3. Autoscale ─────────────────────────────────────────────────

#[test]
fn autoscale_uses_amplitude_plus_offset() {
    let mut settings = free_settings(FrameState { autoscale: true, ..FrameState::none() });
    settings.parameters = WaveParameters {
        x: AxisWave::new(1.0, 1.0, 0.0, 0.0),
        y: AxisWave::new(1.0, 2.0, 0.0, 0.0),
        z: AxisWave::new(1.0, 3.0, 0.0, 1.0),
    };
    let mut v = manual(settings);
    v.tick().unwrap();
    assert_eq!(last_scene(&v).bounds, Some(AxisBounds::symmetric(4.0)));
}

// ── 4. Vector trail ──────────────────────────────────────────────

#[test]
fn trail_fades_oldest_to_one_over_n() {
    let mut settings = free_settings(FrameState { vector_track: true, ..FrameState::none() });
    settings.animation.n_vector = 5;
    let mut v = manual(settings);
    v.run(13).unwrap();

    // Frame 12 was written to slot 2; slot 3 holds the oldest vector
    let scene = last_scene(&v);
    assert_eq!(scene.vectors[2].opacity, 1.0);
    for back in 0..5 {
        let slot = (2 + 5 - back) % 5;
        let expected = 1.0 - back as f64 / 5.0;
        assert!((scene.vectors[slot].opacity - expected).abs() < EPSILON);
    }
    assert!((scene.vectors[3].opacity - 0.2).abs() < EPSILON);
}

#[test]
fn growing_vector_count_keeps_prefix_then_resets() {
    let mut driver = AnimationDriver::new(3);
    let samples = generate(&WaveParameters::default(), 36, &Fragmentation::disabled()).unwrap();
    let state = FrameState { vector_track: true, ..FrameState::none() };
    for frame in 0..3 {
        driver.update(&state, &WaveParameters::default(), 3, &samples, frame).unwrap();
    }
    let before = driver.trail().slots().to_vec();
    driver.resize_trail(6);
    assert_eq!(&driver.trail().slots()[..3], &before[..]);
    assert!(driver.trail().slots()[3..].iter().all(|s| s.segment.is_none()));
}

// ── 5. Fragmentation ─────────────────────────────────────────────

#[test]
fn fragmentation_zeroes_gaps_and_round_trips() {
    let mut v = manual(free_settings(FrameState::default()));
    let plain = v.samples().unwrap().clone();

    v.set_toggle(Toggle::Fragmented, true).unwrap();
    let gapped = v.samples().unwrap().clone();
    assert_eq!(gapped.point(12).unwrap(), DVec3::ZERO);
    assert_eq!(gapped.point(9).unwrap(), plain.point(9).unwrap());
    assert_eq!(last_scene(&v).marker, MarkerStyle::Points);

    v.set_toggle(Toggle::Fragmented, false).unwrap();
    assert_eq!(v.samples().unwrap(), &plain);
}

#[test]
fn fragmentation_lengths_checked_at_input() {
    let mut v = manual(free_settings(FrameState::default()));
    let err = v.set_fragmentation(300, 61).unwrap_err();
    assert!(matches!(err, WaveError::InvalidConfig(_)));
    assert!(err.to_string().contains("plot length + gap length must not exceed sample count"));
    assert_eq!(v.config().fragmented_plot_len, 10);
}

#[test]
fn empty_fragment_block_keeps_playback_alive() {
    let mut v = manual(free_settings(FrameState { fragmented: true, ..FrameState::default() }));
    v.run(2).unwrap();
    assert!(matches!(v.set_fragmentation(0, 0), Err(WaveError::InvalidConfig(_))));
    assert_eq!(v.config().fragment_total_len(), 15);
    assert!(v.samples().is_some());
    assert_eq!(v.tick().unwrap(), Some(2));

    // Same with fragmentation off, then switched on
    let mut v = manual(free_settings(FrameState::default()));
    assert!(v.set_fragmentation(0, 0).is_err());
    v.set_toggle(Toggle::Fragmented, true).unwrap();
    assert!(v.frame_state().fragmented);
    assert_eq!(last_scene(&v).marker, MarkerStyle::Points);
    assert_eq!(v.tick().unwrap(), Some(0));
}

#[test]
fn overflowing_fragment_lengths_rejected() {
    let mut settings = free_settings(FrameState::default());
    settings.animation.fragmented_plot_len = usize::MAX;
    settings.animation.fragmented_no_plot_len = 1;
    let result = Visualizer::new(settings, ManualScheduler::new(), SceneRecorder::new());
    assert!(matches!(result, Err(WaveError::InvalidConfig(_))));

    let mut v = manual(free_settings(FrameState::default()));
    assert!(v.set_fragmentation(usize::MAX, 1).is_err());
    assert_eq!(v.config().fragment_total_len(), 15);
}

// ── 6. Presets and the input surface ─────────────────────────────

#[test]
fn preset_selection_pushes_defaults_in_order() {
    let mut v = manual(free_settings(FrameState::default()));
    v.select_preset("Wide Cone").unwrap();
    let p = v.parameters();
    assert_eq!(p.get(ParameterName::FrequencyX), 1.0);
    assert_eq!(p.get(ParameterName::FrequencyY), 1.0);
    assert_eq!(p.get(ParameterName::AmplitudeX), 2.0);
    assert_eq!(p.get(ParameterName::AmplitudeY), 2.0);
    assert_eq!(p.get(ParameterName::AmplitudeZ), 3.0);
    assert_eq!(p.get(ParameterName::PhaseY), FRAC_PI_2);
    assert_eq!(p.get(ParameterName::FrequencyZ), 0.0);

    assert!(matches!(v.select_preset("Helix"), Err(WaveError::UnknownPreset(_))));
}

#[test]
fn linked_parameter_tracks_source_live() {
    let mut v = manual(VisualizerSettings::default());
    v.set_parameter(ParameterName::FrequencyX, 5.0).unwrap();
    assert_eq!(v.parameters().get(ParameterName::FrequencyY), 5.0);
    v.set_parameter(ParameterName::FrequencyX, 1.0).unwrap();
    assert_eq!(v.parameters().get(ParameterName::FrequencyY), 1.0);
    assert!(v.set_parameter(ParameterName::FrequencyY, 2.0).is_err());
}

#[test]
fn edit_clamps_to_sample_count() {
    let mut v = manual(free_settings(FrameState::default()));
    let change = v.set_parameter(ParameterName::AmplitudeX, 1e6).unwrap();
    assert_eq!(change.new, 360.0);
    assert_eq!(v.parameters().x.amplitude, 360.0);
}

// ── 7. Scheduler discipline ──────────────────────────────────────

#[test]
fn edits_rewind_and_keep_running() {
    let mut v = manual(free_settings(FrameState::default()));
    v.run(50).unwrap();
    v.set_parameter(ParameterName::OffsetZ, 2.0).unwrap();
    assert!(v.scheduler().is_running());
    assert_eq!(v.tick().unwrap(), Some(0));
}

#[test]
fn paused_visualizer_renders_nothing() {
    let mut v = manual(free_settings(FrameState::default()));
    v.run(3).unwrap();
    v.pause();
    assert_eq!(v.run(10).unwrap(), 0);
    v.resume();
    assert_eq!(v.tick().unwrap(), Some(3));
}

#[test]
fn no_repeat_holds_at_last_frame() {
    let mut settings = free_settings(FrameState::default());
    settings.animation.repeat = false;
    let mut v = manual(settings);
    assert_eq!(v.run(1000).unwrap(), 360);
    assert_eq!(last_scene(&v).frame, Some(359));
}

#[test]
fn timer_scheduler_drives_visualizer() {
    let mut settings = free_settings(FrameState::default());
    settings.animation = AnimationConfig {
        n_point: 8,
        n_vector: 2,
        interval_ms: 1,
        fragmented_plot_len: 2,
        fragmented_no_plot_len: 1,
        ..Default::default()
    };
    let mut v = Visualizer::new(settings, TimerScheduler::new(), SceneRecorder::new()).unwrap();
    v.start();
    assert_eq!(v.run(10).unwrap(), 10);
    assert_eq!(v.renderer().scene().frame, Some(1));
    v.stop();
    assert_eq!(v.tick().unwrap(), None);
}

// ── 8. Export ────────────────────────────────────────────────────

#[test]
fn export_does_not_disturb_live_trail() {
    let mut settings = free_settings(FrameState { vector_track: true, ..FrameState::none() });
    settings.animation.n_vector = 4;
    let mut v = manual(settings);
    v.run(10).unwrap();

    let path = std::env::temp_dir().join(format!("lissa-pipeline-{}.json", std::process::id()));
    let summary = v.export(&path).unwrap();
    assert_eq!(summary.frames, 360);

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["n_point"], 360);
    assert_eq!(doc["frames"].as_array().unwrap().len(), 360);
    std::fs::remove_file(&path).ok();

    // Playback restarts cleanly from frame 0 with an empty trail
    assert!(v.trail().slots().iter().all(|s| s.segment.is_none()));
    assert_eq!(v.tick().unwrap(), Some(0));
    assert_eq!(last_scene(&v).visible_vectors().count(), 1);
}
