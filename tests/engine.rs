//! End-to-end tests over the public engine surface

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use kinesis::{
    AnimationConfig, AnimationEngine, AnimationKind, DecayConfig, Easing, KeyframeEffect,
    KeyframeProperties, NativeAnimationBackend, NormalizedKeyframe, PlaybackState, SpringConfig,
    StaggerConfig, StaggerFrom, TimelinePosition, TrackKeyframe, Tween,
};

fn config(duration_ms: f32) -> AnimationConfig {
    AnimationConfig::new(duration_ms).unwrap()
}

/// Route engine logs through the test harness when RUST_LOG is set
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn engine_goes_idle_when_last_animation_finishes() {
    init_tracing();
    let engine = AnimationEngine::new();
    let wakes = Arc::new(AtomicU32::new(0));
    let w = Arc::clone(&wakes);
    engine.set_frame_callback(move || {
        w.fetch_add(1, Ordering::SeqCst);
    });

    let _a = engine.animate(0.0, 100.0, config(100.0));
    let _b = engine.spring(0.0, 10.0, SpringConfig::stiff());
    assert!(engine.needs_tick());
    assert_eq!(wakes.load(Ordering::SeqCst), 1);

    let mut ticks = 0;
    while engine.advance(16.0) {
        ticks += 1;
        assert!(ticks < 1000, "engine never went idle");
    }

    // Idle means idle: no further tick obligation until a new registration
    assert!(!engine.needs_tick());
    assert!(!engine.advance(16.0));

    let _c = engine.animate(0.0, 1.0, config(50.0));
    assert_eq!(wakes.load(Ordering::SeqCst), 2);
    assert!(engine.needs_tick());
}

#[test]
fn timeline_entries_at_appended_zero_offset_start_same_tick() {
    let engine = AnimationEngine::new();
    let timeline = engine.create_timeline(Default::default());

    let first = timeline
        .add(
            Tween::new(0.0, 100.0, config(500.0)),
            TimelinePosition::Absolute(0.0),
        )
        .unwrap();
    // "+=0" resolves against the append point, which the absolute placement
    // above never moved, so the second entry also lands at offset 0
    let second = timeline
        .add(
            Tween::new(100.0, 0.0, config(500.0)),
            TimelinePosition::RelativeToEnd(0.0),
        )
        .unwrap();

    timeline.play();
    engine.advance(250.0);

    assert!((timeline.progress(first).unwrap() - 0.5).abs() < 1e-6);
    assert!((timeline.progress(second).unwrap() - 0.5).abs() < 1e-6);
    assert!((timeline.value(first).unwrap() - 50.0).abs() < 1e-4);
    assert!((timeline.value(second).unwrap() - 50.0).abs() < 1e-4);
}

#[test]
fn timeline_completion_via_engine() {
    let engine = AnimationEngine::new();
    let timeline = engine.create_timeline(Default::default());
    timeline.add(
        Tween::new(0.0, 1.0, config(100.0)),
        TimelinePosition::Absolute(0.0),
    );

    let fired = Arc::new(AtomicU32::new(0));
    let f = Arc::clone(&fired);
    timeline.on_complete(move || {
        f.fetch_add(1, Ordering::SeqCst);
    });

    timeline.play();
    assert!(engine.needs_tick());
    engine.advance(100.0);

    assert_eq!(timeline.state(), Some(PlaybackState::Finished));
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!engine.needs_tick());

    // Timelines persist for replay
    assert!(timeline.is_alive());
    timeline.play();
    assert!(engine.needs_tick());
}

#[test]
fn default_spring_converges_at_frame_rate_within_envelope() {
    // Stiffness 100, damping 10, mass 1 gives damping ratio 0.5; the first
    // overshoot of an underdamped spring is bounded by
    // exp(-pi * zeta / sqrt(1 - zeta^2)), about 16.3% of the travel.
    let engine = AnimationEngine::new();
    let cell = engine.create_value(0.0);
    let _handle = engine.spring_value(&cell, 100.0, SpringConfig::default());

    let mut ticks = 0;
    while engine.advance(16.0) {
        assert!(cell.get() < 120.0, "overshoot too large: {}", cell.get());
        ticks += 1;
        assert!(ticks < 600, "spring failed to settle");
    }
    assert_eq!(cell.get(), 100.0);
}

#[test]
fn stagger_center_wave_is_symmetric() {
    let engine = AnimationEngine::new();
    let targets: Vec<_> = (0..5).map(|_| engine.create_value(0.0)).collect();

    let keyframes = vec![
        TrackKeyframe::linear(0.0, 0.0),
        TrackKeyframe::linear(1.0, 1.0),
    ];
    let stagger = StaggerConfig::new(50.0).unwrap().from(StaggerFrom::Center);
    let _handle = engine
        .stagger(&targets, keyframes, config(100.0), stagger)
        .unwrap();

    // Middle target has no delay; mirror pairs share one
    engine.advance(50.0);
    assert!((targets[2].get() - 0.5).abs() < 1e-4);
    assert_eq!(targets[1].get(), targets[3].get());
    assert_eq!(targets[0].get(), targets[4].get());

    engine.advance(100.0);
    assert_eq!(targets[1].get(), targets[3].get());
    assert!((targets[2].get() - 1.0).abs() < 1e-4);
}

#[test]
fn decay_slows_monotonically_through_engine() {
    let engine = AnimationEngine::new();
    let handle = engine.decay(0.0, DecayConfig::new(900.0));

    let speeds = Arc::new(Mutex::new(Vec::new()));
    for _ in 0..30 {
        engine.advance(16.0);
        if let Some(value) = handle.value() {
            speeds.lock().unwrap().push(value);
        }
    }

    let positions = speeds.lock().unwrap();
    // Positions advance but by shrinking increments
    let deltas: Vec<f32> = positions.windows(2).map(|w| w[1] - w[0]).collect();
    for pair in deltas.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-4);
    }
}

#[test]
fn sequence_then_parallel_composition() {
    let engine = AnimationEngine::new();

    let seq = AnimationKind::Sequence(kinesis::SequenceGroup::new(vec![
        AnimationKind::Tween(Tween::new(0.0, 1.0, config(100.0))),
        AnimationKind::Tween(Tween::new(1.0, 0.0, config(100.0))),
    ]));
    let handle = engine.parallel(vec![
        seq,
        AnimationKind::Tween(Tween::new(0.0, 1.0, config(150.0))),
    ]);

    engine.advance(100.0);
    assert!(handle.is_alive());
    engine.advance(50.0);
    assert!(handle.is_alive());
    engine.advance(50.0);
    // Everything finished and the group retired
    assert!(!handle.is_alive());
    assert!(!engine.needs_tick());
}

#[derive(Default)]
struct FakeBackend {
    plan_len: Arc<AtomicU32>,
    state: Arc<Mutex<PlaybackState>>,
}

impl NativeAnimationBackend for FakeBackend {
    fn load(&mut self, plan: &[NormalizedKeyframe], _duration_ms: f32) {
        self.plan_len.store(plan.len() as u32, Ordering::SeqCst);
    }

    fn play(&mut self) {
        *self.state.lock().unwrap() = PlaybackState::Running;
    }

    fn pause(&mut self) {
        *self.state.lock().unwrap() = PlaybackState::Paused;
    }

    fn cancel(&mut self) {
        *self.state.lock().unwrap() = PlaybackState::Idle;
    }

    fn reverse(&mut self) {}

    fn seek(&mut self, _progress: f32) {}

    fn progress(&self) -> f32 {
        0.0
    }

    fn state(&self) -> PlaybackState {
        *self.state.lock().unwrap()
    }
}

#[test]
fn bridged_animation_stays_off_the_tick_loop() {
    let engine = AnimationEngine::new();

    let backend = FakeBackend::default();
    let plan_len = Arc::clone(&backend.plan_len);
    let state = Arc::clone(&backend.state);

    let effect = KeyframeEffect::new(200.0)
        .unwrap()
        .keyframe(0.0, KeyframeProperties::opacity(0.0), Easing::Linear)
        .unwrap()
        .keyframe(1.0, KeyframeProperties::opacity(1.0), Easing::Linear)
        .unwrap();

    let handle = engine.animate_keyframes(Box::new(backend), &effect);

    // Plan was handed over and playback started, yet the engine stays idle
    assert_eq!(plan_len.load(Ordering::SeqCst), 2);
    assert_eq!(handle.state(), Some(PlaybackState::Running));
    assert!(!engine.needs_tick());

    // Backend finishes on its own clock; the next tick retires the entry
    *state.lock().unwrap() = PlaybackState::Finished;
    engine.advance(0.0);
    assert!(!handle.is_alive());
}

#[test]
fn value_subscriptions_observe_engine_driven_changes() {
    let engine = AnimationEngine::new();
    let cell = engine.create_value(0.0);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    let sub = cell.subscribe(move |value| s.lock().unwrap().push(value));

    let _handle = engine.timing(&cell, 100.0, config(100.0));
    engine.advance(50.0);
    engine.advance(50.0);

    let values = seen.lock().unwrap().clone();
    assert_eq!(values, vec![50.0, 100.0]);

    sub.unsubscribe();
    cell.set(7.0);
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[test]
fn independent_engines_do_not_share_clocks() {
    let a = AnimationEngine::new();
    let b = AnimationEngine::new();

    let ca = a.create_value(0.0);
    let cb = b.create_value(0.0);
    a.timing(&ca, 100.0, config(1000.0));
    b.timing(&cb, 100.0, config(1000.0));

    a.advance(500.0);
    assert!((ca.get() - 50.0).abs() < 1e-4);
    assert_eq!(cb.get(), 0.0);

    b.advance(1000.0);
    assert!((cb.get() - 100.0).abs() < 1e-4);
}
