//! Animation engine and tick scheduling
//!
//! An [`AnimationEngine`] owns every running animation and timeline. The host
//! drives it cooperatively: call [`AnimationEngine::tick`] once per frame (or
//! [`AnimationEngine::advance`] with an explicit delta for deterministic
//! embedding) while it reports work remaining. The engine never spawns
//! threads or polls while idle; an optional frame-request callback fires on
//! each idle-to-active transition so the host knows to resume ticking.

use std::sync::{Arc, Mutex, Weak};
use std::time::Instant;

use slotmap::{new_key_type, SlotMap};

use crate::bridge::{BridgedAnimation, NativeAnimationBackend};
use crate::decay::{DecayConfig, DecayMotion};
use crate::error::Result;
use crate::group::{self, ParallelGroup, SequenceGroup, StaggerConfig};
use crate::keyframe::KeyframeEffect;
use crate::spring::{SpringConfig, SpringMotion};
use crate::timeline::{Timeline, TimelineConfig, TimelineEntryId, TimelinePosition};
use crate::tween::{
    AnimationConfig, CompleteCallback, PlaybackState, TrackKeyframe, Tween, UpdateCallback,
};
use crate::value::AnimatedValue;

new_key_type! {
    /// Stable key for an animation registered with an engine
    pub struct AnimationId;

    /// Stable key for a timeline registered with an engine
    pub struct TimelineId;
}

type FrameCallback = Arc<dyn Fn() + Send + Sync>;

/// Registry entries are individually locked so a tick can update them with
/// the registry lock released, letting callbacks call back into the engine.
type SharedAnimation = Arc<Mutex<AnimationKind>>;
type SharedTimeline = Arc<Mutex<Timeline>>;

/// Every animation an engine can hold
///
/// The set is closed on purpose: the per-tick update matches exhaustively, so
/// adding a kind forces every dispatch site to handle it.
pub enum AnimationKind {
    Tween(Tween),
    Spring(SpringMotion),
    Decay(DecayMotion),
    Sequence(SequenceGroup),
    Parallel(ParallelGroup),
    Bridged(BridgedAnimation),
}

impl AnimationKind {
    pub fn play(&mut self) {
        match self {
            AnimationKind::Tween(tween) => tween.play(),
            AnimationKind::Spring(spring) => spring.play(),
            AnimationKind::Decay(decay) => decay.play(),
            AnimationKind::Sequence(group) => group.play(),
            AnimationKind::Parallel(group) => group.play(),
            AnimationKind::Bridged(bridged) => bridged.play(),
        }
    }

    pub fn pause(&mut self) {
        match self {
            AnimationKind::Tween(tween) => tween.pause(),
            AnimationKind::Spring(spring) => spring.pause(),
            AnimationKind::Decay(decay) => decay.pause(),
            AnimationKind::Sequence(group) => group.pause(),
            AnimationKind::Parallel(group) => group.pause(),
            AnimationKind::Bridged(bridged) => bridged.pause(),
        }
    }

    pub fn stop(&mut self) {
        match self {
            AnimationKind::Tween(tween) => tween.stop(),
            AnimationKind::Spring(spring) => spring.stop(),
            AnimationKind::Decay(decay) => decay.stop(),
            AnimationKind::Sequence(group) => group.stop(),
            AnimationKind::Parallel(group) => group.stop(),
            AnimationKind::Bridged(bridged) => bridged.stop(),
        }
    }

    /// Advance by `dt_ms`. Bridged animations keep their own clock and are
    /// only polled for completion here.
    pub fn update(&mut self, dt_ms: f32) {
        match self {
            AnimationKind::Tween(tween) => tween.update(dt_ms),
            AnimationKind::Spring(spring) => spring.update(dt_ms),
            AnimationKind::Decay(decay) => decay.update(dt_ms),
            AnimationKind::Sequence(group) => group.update(dt_ms),
            AnimationKind::Parallel(group) => group.update(dt_ms),
            AnimationKind::Bridged(bridged) => {
                bridged.poll();
            }
        }
    }

    /// Reverse in place where the kind supports it
    pub fn reverse(&mut self) {
        match self {
            AnimationKind::Tween(tween) => tween.reverse(),
            AnimationKind::Bridged(bridged) => bridged.reverse(),
            _ => {}
        }
    }

    /// Seek to a normalized progress where the kind supports it
    pub fn seek(&mut self, progress: f32) {
        match self {
            AnimationKind::Tween(tween) => tween.seek(progress),
            AnimationKind::Bridged(bridged) => bridged.seek(progress),
            _ => {}
        }
    }

    pub fn state(&self) -> PlaybackState {
        match self {
            AnimationKind::Tween(tween) => tween.state(),
            AnimationKind::Spring(spring) => spring.state(),
            AnimationKind::Decay(decay) => decay.state(),
            AnimationKind::Sequence(group) => group.state(),
            AnimationKind::Parallel(group) => group.state(),
            AnimationKind::Bridged(bridged) => bridged.state(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == PlaybackState::Finished
    }

    /// Current scalar value, for the kinds that have one
    pub fn value(&self) -> Option<f32> {
        match self {
            AnimationKind::Tween(tween) => Some(tween.value()),
            AnimationKind::Spring(spring) => Some(spring.value()),
            AnimationKind::Decay(decay) => Some(decay.value()),
            AnimationKind::Sequence(_) | AnimationKind::Parallel(_) => None,
            AnimationKind::Bridged(_) => None,
        }
    }

    pub fn progress(&self) -> Option<f32> {
        match self {
            AnimationKind::Tween(tween) => Some(tween.progress()),
            AnimationKind::Spring(spring) => Some(spring.progress()),
            AnimationKind::Decay(decay) => Some(decay.progress()),
            AnimationKind::Sequence(_) | AnimationKind::Parallel(_) => None,
            AnimationKind::Bridged(bridged) => Some(bridged.progress()),
        }
    }

    pub fn push_on_complete(&mut self, callback: CompleteCallback) {
        match self {
            AnimationKind::Tween(tween) => tween.push_on_complete(callback),
            AnimationKind::Spring(spring) => spring.push_on_complete(callback),
            AnimationKind::Decay(decay) => decay.push_on_complete(callback),
            AnimationKind::Sequence(group) => group.push_on_complete(callback),
            AnimationKind::Parallel(group) => group.push_on_complete(callback),
            AnimationKind::Bridged(bridged) => bridged.push_on_complete(callback),
        }
    }

    fn set_on_update(&mut self, callback: UpdateCallback) {
        match self {
            AnimationKind::Tween(tween) => tween.set_on_update(callback),
            AnimationKind::Spring(spring) => spring.set_on_update(callback),
            AnimationKind::Decay(decay) => decay.set_on_update(callback),
            // Groups and bridged animations have no scalar stream to observe
            _ => {}
        }
    }

    /// Whether this entry obliges the engine to keep ticking. Bridged
    /// animations run on the backend's clock and never do.
    fn keeps_engine_active(&self) -> bool {
        match self {
            AnimationKind::Bridged(_) => false,
            _ => self.state() == PlaybackState::Running,
        }
    }
}

struct EngineInner {
    animations: SlotMap<AnimationId, SharedAnimation>,
    timelines: SlotMap<TimelineId, SharedTimeline>,
    last_tick: Option<Instant>,
    /// True while anything obliges further ticks
    active: bool,
    frame_callback: Option<FrameCallback>,
}

/// The owning side of an animation engine
///
/// Hosts typically keep the engine in their app state and hand
/// [`EngineHandle`]s to UI code. Multiple engines are fully independent.
pub struct AnimationEngine {
    inner: Arc<Mutex<EngineInner>>,
}

impl AnimationEngine {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EngineInner {
                animations: SlotMap::with_key(),
                timelines: SlotMap::with_key(),
                last_tick: None,
                active: false,
                frame_callback: None,
            })),
        }
    }

    /// Set the callback fired whenever the engine transitions from idle to
    /// active (a new registration or a replay). The callback runs outside
    /// the engine lock.
    pub fn set_frame_callback<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.lock().unwrap().frame_callback = Some(Arc::new(callback));
    }

    /// Weak handle for UI code; operations on it become no-ops once the
    /// engine is dropped.
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether another tick is required. False means the host may stop its
    /// frame loop until the frame callback fires.
    pub fn needs_tick(&self) -> bool {
        self.inner.lock().unwrap().active
    }

    /// Advance using wall-clock time since the previous tick. The first tick
    /// after idle uses a zero delta so no idle time is attributed.
    pub fn tick(&self) -> bool {
        let now = Instant::now();
        let dt_ms = {
            let mut inner = self.inner.lock().unwrap();
            let dt = match inner.last_tick {
                Some(prev) => now.duration_since(prev).as_secs_f32() * 1000.0,
                None => 0.0,
            };
            inner.last_tick = Some(now);
            dt
        };
        self.advance_by(dt_ms)
    }

    /// Advance by an explicit delta. Deterministic variant of [`tick`] for
    /// embedders and tests.
    ///
    /// [`tick`]: AnimationEngine::tick
    pub fn advance(&self, dt_ms: f32) -> bool {
        self.advance_by(dt_ms)
    }

    /// Advance every entry, retire finished animations, recompute the active
    /// flag. Entries are ticked with the registry lock released so their
    /// callbacks may register follow-up animations or drive handles.
    fn advance_by(&self, dt_ms: f32) -> bool {
        let (animations, timelines) = {
            let inner = self.inner.lock().unwrap();
            let animations: Vec<(AnimationId, SharedAnimation)> = inner
                .animations
                .iter()
                .map(|(id, animation)| (id, Arc::clone(animation)))
                .collect();
            let timelines: Vec<SharedTimeline> =
                inner.timelines.values().map(Arc::clone).collect();
            (animations, timelines)
        };

        let mut finished = Vec::new();
        for (id, animation) in &animations {
            let mut kind = animation.lock().unwrap();
            kind.update(dt_ms);
            if kind.is_finished() {
                finished.push(*id);
            }
        }
        for timeline in &timelines {
            timeline.lock().unwrap().update(dt_ms);
        }

        // Finished animations leave the registry in the same tick they
        // finish. Timelines persist so their handles can seek and replay.
        // A callback may have replayed an entry, so re-check before retiring.
        let mut inner = self.inner.lock().unwrap();
        for id in finished {
            let retire = inner
                .animations
                .get(id)
                .is_some_and(|animation| animation.lock().unwrap().is_finished());
            if retire {
                inner.animations.remove(id);
                tracing::trace!(?id, "animation retired");
            }
        }

        let active = inner
            .animations
            .values()
            .any(|animation| animation.lock().unwrap().keeps_engine_active())
            || inner
                .timelines
                .values()
                .any(|timeline| timeline.lock().unwrap().is_playing());
        inner.active = active;
        if !active {
            inner.last_tick = None;
            tracing::debug!("engine idle");
        }
        active
    }

    fn snapshot(&self) -> (Vec<SharedAnimation>, Vec<SharedTimeline>) {
        let inner = self.inner.lock().unwrap();
        (
            inner.animations.values().map(Arc::clone).collect(),
            inner.timelines.values().map(Arc::clone).collect(),
        )
    }

    /// Register and start a from -> to tween
    pub fn animate(&self, from: f32, to: f32, config: AnimationConfig) -> AnimationHandle {
        register(&self.inner, AnimationKind::Tween(Tween::new(from, to, config)))
    }

    /// Register and start a spring from one value to another
    pub fn spring(&self, from: f32, to: f32, config: SpringConfig) -> AnimationHandle {
        register(
            &self.inner,
            AnimationKind::Spring(SpringMotion::new(from, to, config)),
        )
    }

    /// Register and start a momentum decay from a value
    pub fn decay(&self, from: f32, config: DecayConfig) -> AnimationHandle {
        register(&self.inner, AnimationKind::Decay(DecayMotion::new(from, config)))
    }

    /// Create a value cell. Purely a convenience; cells are engine-independent.
    pub fn create_value(&self, initial: f32) -> AnimatedValue {
        AnimatedValue::new(initial)
    }

    /// Animate a value cell to a target with a tween; every tick writes the
    /// sampled value into the cell.
    pub fn timing(&self, value: &AnimatedValue, to: f32, config: AnimationConfig) -> AnimationHandle {
        let mut kind = AnimationKind::Tween(Tween::new(value.get(), to, config));
        let cell = value.clone();
        kind.set_on_update(Box::new(move |_, sampled| cell.set(sampled)));
        register(&self.inner, kind)
    }

    /// Animate a value cell to a target with spring physics
    pub fn spring_value(
        &self,
        value: &AnimatedValue,
        to: f32,
        config: SpringConfig,
    ) -> AnimationHandle {
        let mut kind = AnimationKind::Spring(SpringMotion::new(value.get(), to, config));
        let cell = value.clone();
        kind.set_on_update(Box::new(move |_, sampled| cell.set(sampled)));
        register(&self.inner, kind)
    }

    /// Register and start a sequence of animations
    pub fn sequence(&self, children: Vec<AnimationKind>) -> AnimationHandle {
        register(&self.inner, AnimationKind::Sequence(SequenceGroup::new(children)))
    }

    /// Register and start a set of animations running together
    pub fn parallel(&self, children: Vec<AnimationKind>) -> AnimationHandle {
        register(&self.inner, AnimationKind::Parallel(ParallelGroup::new(children)))
    }

    /// Register and start a staggered keyframe animation over value cells
    pub fn stagger(
        &self,
        targets: &[AnimatedValue],
        keyframes: Vec<TrackKeyframe>,
        config: AnimationConfig,
        stagger_config: StaggerConfig,
    ) -> Result<AnimationHandle> {
        let parallel = group::stagger(targets, keyframes, config, stagger_config)?;
        Ok(register(&self.inner, AnimationKind::Parallel(parallel)))
    }

    /// Delegate a keyframe effect to a native backend and start it. The
    /// animation is tracked for completion but runs on the backend's clock,
    /// so it never obliges the engine to tick.
    pub fn animate_keyframes(
        &self,
        backend: Box<dyn NativeAnimationBackend>,
        effect: &KeyframeEffect,
    ) -> AnimationHandle {
        register(
            &self.inner,
            AnimationKind::Bridged(BridgedAnimation::new(backend, effect)),
        )
    }

    /// Create an empty timeline. Timelines start paused; play them through
    /// the returned handle.
    pub fn create_timeline(&self, config: TimelineConfig) -> TimelineHandle {
        let id = self
            .inner
            .lock()
            .unwrap()
            .timelines
            .insert(Arc::new(Mutex::new(Timeline::new(config))));
        TimelineHandle {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Stop every animation and timeline without firing completions
    pub fn stop_all(&self) {
        let (animations, timelines) = self.snapshot();
        for animation in animations {
            animation.lock().unwrap().stop();
        }
        for timeline in timelines {
            timeline.lock().unwrap().stop();
        }
        let mut inner = self.inner.lock().unwrap();
        inner.active = false;
        inner.last_tick = None;
        tracing::debug!("all animations stopped");
    }

    /// Pause every running animation and timeline
    pub fn pause_all(&self) {
        let (animations, timelines) = self.snapshot();
        for animation in animations {
            animation.lock().unwrap().pause();
        }
        for timeline in timelines {
            timeline.lock().unwrap().pause();
        }
        self.inner.lock().unwrap().active = false;
    }

    /// Resume everything paused by [`pause_all`]
    ///
    /// [`pause_all`]: AnimationEngine::pause_all
    pub fn resume_all(&self) {
        let (animations, timelines) = self.snapshot();
        for animation in animations {
            let mut kind = animation.lock().unwrap();
            if kind.state() == PlaybackState::Paused {
                kind.play();
            }
        }
        for timeline in timelines {
            timeline.lock().unwrap().resume();
        }
        let callback = wake(&mut self.inner.lock().unwrap());
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Mark the engine active; returns the frame callback to fire (outside the
/// lock) if this was an idle-to-active transition.
fn wake(inner: &mut EngineInner) -> Option<FrameCallback> {
    if inner.active {
        None
    } else {
        inner.active = true;
        inner.frame_callback.clone()
    }
}

fn register(inner: &Arc<Mutex<EngineInner>>, mut kind: AnimationKind) -> AnimationHandle {
    kind.play();
    let off_loop = matches!(kind, AnimationKind::Bridged(_));
    let animation = Arc::new(Mutex::new(kind));
    let (id, callback) = {
        let mut guard = inner.lock().unwrap();
        let id = guard.animations.insert(animation);
        let callback = if off_loop { None } else { wake(&mut guard) };
        (id, callback)
    };
    tracing::debug!(?id, "animation registered");
    if let Some(callback) = callback {
        callback();
    }
    AnimationHandle {
        inner: Arc::downgrade(inner),
        id,
    }
}

/// Cloneable weak reference to an engine
///
/// Registration through a handle returns `None` once the engine is gone.
#[derive(Clone)]
pub struct EngineHandle {
    inner: Weak<Mutex<EngineInner>>,
}

impl EngineHandle {
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn animate(&self, from: f32, to: f32, config: AnimationConfig) -> Option<AnimationHandle> {
        let inner = self.inner.upgrade()?;
        Some(register(&inner, AnimationKind::Tween(Tween::new(from, to, config))))
    }

    pub fn spring(&self, from: f32, to: f32, config: SpringConfig) -> Option<AnimationHandle> {
        let inner = self.inner.upgrade()?;
        Some(register(
            &inner,
            AnimationKind::Spring(SpringMotion::new(from, to, config)),
        ))
    }

    pub fn decay(&self, from: f32, config: DecayConfig) -> Option<AnimationHandle> {
        let inner = self.inner.upgrade()?;
        Some(register(&inner, AnimationKind::Decay(DecayMotion::new(from, config))))
    }

    pub fn timing(
        &self,
        value: &AnimatedValue,
        to: f32,
        config: AnimationConfig,
    ) -> Option<AnimationHandle> {
        let inner = self.inner.upgrade()?;
        let mut kind = AnimationKind::Tween(Tween::new(value.get(), to, config));
        let cell = value.clone();
        kind.set_on_update(Box::new(move |_, sampled| cell.set(sampled)));
        Some(register(&inner, kind))
    }

    pub fn spring_value(
        &self,
        value: &AnimatedValue,
        to: f32,
        config: SpringConfig,
    ) -> Option<AnimationHandle> {
        let inner = self.inner.upgrade()?;
        let mut kind = AnimationKind::Spring(SpringMotion::new(value.get(), to, config));
        let cell = value.clone();
        kind.set_on_update(Box::new(move |_, sampled| cell.set(sampled)));
        Some(register(&inner, kind))
    }

    pub fn sequence(&self, children: Vec<AnimationKind>) -> Option<AnimationHandle> {
        let inner = self.inner.upgrade()?;
        Some(register(&inner, AnimationKind::Sequence(SequenceGroup::new(children))))
    }

    pub fn parallel(&self, children: Vec<AnimationKind>) -> Option<AnimationHandle> {
        let inner = self.inner.upgrade()?;
        Some(register(&inner, AnimationKind::Parallel(ParallelGroup::new(children))))
    }
}

/// Control handle for one registered animation
///
/// Finished animations are retired from the registry, after which every
/// operation on the handle is a no-op returning `None`/`false`.
#[derive(Clone)]
pub struct AnimationHandle {
    inner: Weak<Mutex<EngineInner>>,
    id: AnimationId,
}

impl AnimationHandle {
    /// Whether the animation is still registered
    pub fn is_alive(&self) -> bool {
        match self.inner.upgrade() {
            Some(inner) => inner.lock().unwrap().animations.contains_key(self.id),
            None => false,
        }
    }

    /// Clone out the entry's own lock so operations on it do not hold the
    /// registry lock.
    fn shared(&self) -> Option<SharedAnimation> {
        let inner = self.inner.upgrade()?;
        let guard = inner.lock().unwrap();
        guard.animations.get(self.id).map(Arc::clone)
    }

    fn with<R>(&self, f: impl FnOnce(&mut AnimationKind) -> R) -> Option<R> {
        let animation = self.shared()?;
        let mut kind = animation.lock().unwrap();
        Some(f(&mut kind))
    }

    pub fn play(&self) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let shared = {
            let guard = inner.lock().unwrap();
            guard.animations.get(self.id).map(Arc::clone)
        };
        let Some(animation) = shared else {
            return false;
        };
        let active = {
            let mut kind = animation.lock().unwrap();
            kind.play();
            kind.keeps_engine_active()
        };
        let callback = if active {
            wake(&mut inner.lock().unwrap())
        } else {
            None
        };
        if let Some(callback) = callback {
            callback();
        }
        true
    }

    pub fn pause(&self) -> bool {
        self.with(AnimationKind::pause).is_some()
    }

    pub fn stop(&self) -> bool {
        self.with(AnimationKind::stop).is_some()
    }

    pub fn reverse(&self) -> bool {
        self.with(AnimationKind::reverse).is_some()
    }

    pub fn seek(&self, progress: f32) -> bool {
        self.with(|kind| kind.seek(progress)).is_some()
    }

    pub fn state(&self) -> Option<PlaybackState> {
        self.with(|kind| kind.state())
    }

    pub fn value(&self) -> Option<f32> {
        self.with(|kind| kind.value()).flatten()
    }

    pub fn progress(&self) -> Option<f32> {
        self.with(|kind| kind.progress()).flatten()
    }

    /// Add a completion callback; fires exactly once per completion
    pub fn on_complete<F>(&self, callback: F) -> bool
    where
        F: FnMut() + Send + 'static,
    {
        self.with(|kind| kind.push_on_complete(Box::new(callback)))
            .is_some()
    }
}

/// Control handle for one timeline
///
/// Timelines persist after finishing so they can be sought and replayed;
/// operations are no-ops only once the engine itself is gone.
#[derive(Clone)]
pub struct TimelineHandle {
    inner: Weak<Mutex<EngineInner>>,
    id: TimelineId,
}

impl TimelineHandle {
    pub fn is_alive(&self) -> bool {
        match self.inner.upgrade() {
            Some(inner) => inner.lock().unwrap().timelines.contains_key(self.id),
            None => false,
        }
    }

    fn shared(&self) -> Option<SharedTimeline> {
        let inner = self.inner.upgrade()?;
        let guard = inner.lock().unwrap();
        guard.timelines.get(self.id).map(Arc::clone)
    }

    fn with<R>(&self, f: impl FnOnce(&mut Timeline) -> R) -> Option<R> {
        let timeline = self.shared()?;
        let mut guard = timeline.lock().unwrap();
        Some(f(&mut guard))
    }

    /// Add a tween at a position; returns its entry id for value queries
    pub fn add(&self, tween: Tween, position: TimelinePosition) -> Option<TimelineEntryId> {
        self.with(|timeline| timeline.add(tween, position))
    }

    pub fn play(&self) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let shared = {
            let guard = inner.lock().unwrap();
            guard.timelines.get(self.id).map(Arc::clone)
        };
        let Some(timeline) = shared else {
            return false;
        };
        timeline.lock().unwrap().play();
        let callback = wake(&mut inner.lock().unwrap());
        if let Some(callback) = callback {
            callback();
        }
        true
    }

    pub fn pause(&self) -> bool {
        self.with(Timeline::pause).is_some()
    }

    pub fn resume(&self) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let shared = {
            let guard = inner.lock().unwrap();
            guard.timelines.get(self.id).map(Arc::clone)
        };
        let Some(timeline) = shared else {
            return false;
        };
        timeline.lock().unwrap().resume();
        let callback = wake(&mut inner.lock().unwrap());
        if let Some(callback) = callback {
            callback();
        }
        true
    }

    pub fn stop(&self) -> bool {
        self.with(Timeline::stop).is_some()
    }

    pub fn seek(&self, time_ms: f32) -> bool {
        self.with(|timeline| timeline.seek(time_ms)).is_some()
    }

    pub fn set_playback_rate(&self, rate: f32) -> bool {
        self.with(|timeline| timeline.set_playback_rate(rate))
            .is_some()
    }

    pub fn state(&self) -> Option<PlaybackState> {
        self.with(|timeline| timeline.state())
    }

    pub fn current_time(&self) -> Option<f32> {
        self.with(|timeline| timeline.current_time())
    }

    pub fn total_duration_ms(&self) -> Option<f32> {
        self.with(|timeline| timeline.total_duration_ms())
    }

    pub fn on_complete<F>(&self, callback: F) -> bool
    where
        F: FnMut() + Send + 'static,
    {
        self.with(|timeline| timeline.on_complete(callback))
            .is_some()
    }

    /// Current value of one entry's tween
    pub fn value(&self, entry: TimelineEntryId) -> Option<f32> {
        self.with(|timeline| timeline.value(entry)).flatten()
    }

    /// Current progress of one entry's tween
    pub fn progress(&self, entry: TimelineEntryId) -> Option<f32> {
        self.with(|timeline| timeline.progress(entry)).flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn config(duration_ms: f32) -> AnimationConfig {
        AnimationConfig::new(duration_ms).unwrap()
    }

    #[test]
    fn test_registration_starts_and_ticks_drive_it() {
        let engine = AnimationEngine::new();
        let handle = engine.animate(0.0, 100.0, config(1000.0));

        assert!(engine.needs_tick());
        assert_eq!(handle.state(), Some(PlaybackState::Running));

        engine.advance(500.0);
        assert!((handle.value().unwrap() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_finished_animation_retires_same_tick() {
        let engine = AnimationEngine::new();
        let handle = engine.animate(0.0, 100.0, config(100.0));

        let still_running = engine.advance(100.0);
        assert!(!still_running);
        assert!(!handle.is_alive());
        assert!(handle.value().is_none());
    }

    #[test]
    fn test_idle_invariant_and_frame_callback() {
        let engine = AnimationEngine::new();
        let wakes = Arc::new(AtomicU32::new(0));
        let w = Arc::clone(&wakes);
        engine.set_frame_callback(move || {
            w.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!engine.needs_tick());

        let _a = engine.animate(0.0, 1.0, config(100.0));
        assert_eq!(wakes.load(Ordering::SeqCst), 1);

        // A second registration while already active does not re-fire
        let _b = engine.animate(0.0, 1.0, config(100.0));
        assert_eq!(wakes.load(Ordering::SeqCst), 1);

        engine.advance(100.0);
        assert!(!engine.needs_tick());

        // Back to idle, so the next registration fires again
        let _c = engine.animate(0.0, 1.0, config(100.0));
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_timing_drives_value_cell() {
        let engine = AnimationEngine::new();
        let cell = engine.create_value(0.0);
        let _handle = engine.timing(&cell, 100.0, config(1000.0));

        engine.advance(250.0);
        assert!((cell.get() - 25.0).abs() < 1e-4);

        engine.advance(750.0);
        assert!((cell.get() - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_spring_value_settles_cell() {
        let engine = AnimationEngine::new();
        let cell = engine.create_value(0.0);
        let _handle = engine.spring_value(&cell, 50.0, SpringConfig::stiff());

        let mut ticks = 0;
        while engine.advance(16.0) {
            ticks += 1;
            assert!(ticks < 600);
        }
        assert_eq!(cell.get(), 50.0);
    }

    #[test]
    fn test_handle_ops_are_noops_after_engine_drop() {
        let engine = AnimationEngine::new();
        let handle = engine.animate(0.0, 100.0, config(1000.0));
        let engine_handle = engine.handle();
        drop(engine);

        assert!(!handle.is_alive());
        assert!(!handle.play());
        assert!(handle.value().is_none());
        assert!(!engine_handle.is_alive());
        assert!(engine_handle.animate(0.0, 1.0, config(100.0)).is_none());
    }

    #[test]
    fn test_engine_handle_registers() {
        let engine = AnimationEngine::new();
        let engine_handle = engine.handle();

        let handle = engine_handle.animate(0.0, 100.0, config(1000.0)).unwrap();
        engine.advance(500.0);
        assert!((handle.value().unwrap() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_pause_all_and_resume_all() {
        let engine = AnimationEngine::new();
        let handle = engine.animate(0.0, 100.0, config(1000.0));

        engine.advance(200.0);
        engine.pause_all();
        assert!(!engine.needs_tick());

        engine.advance(500.0);
        assert!((handle.value().unwrap() - 20.0).abs() < 1e-4);

        engine.resume_all();
        assert!(engine.needs_tick());
        engine.advance(300.0);
        assert!((handle.value().unwrap() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_stop_all_resets_without_completion() {
        let engine = AnimationEngine::new();
        let fired = Arc::new(AtomicU32::new(0));
        let handle = engine.animate(0.0, 100.0, config(1000.0));
        let f = Arc::clone(&fired);
        handle.on_complete(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        engine.advance(500.0);
        engine.stop_all();

        assert!(!engine.needs_tick());
        assert_eq!(handle.state(), Some(PlaybackState::Idle));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_engines_are_independent() {
        let a = AnimationEngine::new();
        let b = AnimationEngine::new();

        let ha = a.animate(0.0, 100.0, config(1000.0));
        let hb = b.animate(0.0, 100.0, config(1000.0));

        a.advance(500.0);
        assert!((ha.value().unwrap() - 50.0).abs() < 1e-4);
        assert_eq!(hb.value().unwrap(), 0.0);
    }

    #[test]
    fn test_completion_callback_registers_followup() {
        let engine = AnimationEngine::new();
        let engine_handle = engine.handle();

        let followup: Arc<Mutex<Option<AnimationHandle>>> = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&followup);
        let first = engine.animate(0.0, 1.0, config(50.0));
        first.on_complete(move || {
            // Chaining the next animation from inside a completion callback
            // must not deadlock the tick
            *slot.lock().unwrap() = engine_handle.animate(1.0, 2.0, config(50.0));
        });

        engine.advance(50.0);

        let second = followup.lock().unwrap().take().unwrap();
        assert!(!first.is_alive());
        assert!(second.is_alive());
        assert!(engine.needs_tick());

        engine.advance(50.0);
        assert!(!second.is_alive());
        assert!(!engine.needs_tick());
    }

    #[test]
    fn test_infinite_animation_keeps_engine_active() {
        let engine = AnimationEngine::new();
        let _handle = engine.animate(0.0, 100.0, config(100.0).infinite());

        for _ in 0..10 {
            assert!(engine.advance(100.0));
        }
        assert!(engine.needs_tick());
    }
}
