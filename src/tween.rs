//! Interpolation-based animation instances
//!
//! A [`Tween`] tracks one interpolation's progress against an
//! [`AnimationConfig`] (duration, delay, easing, iteration/direction/fill
//! policy). Unconsumed delay is modeled as negative elapsed time, so a single
//! `update(dt)` path covers the whole lifecycle.

use crate::easing::Easing;
use crate::error::{AnimationError, Result};

/// Callback invoked on every tick with `(progress, value)`
pub type UpdateCallback = Box<dyn FnMut(f32, f32) + Send>;

/// Callback invoked when an animation completes
pub type CompleteCallback = Box<dyn FnMut() + Send>;

/// Lifecycle state shared by every animation kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Running,
    Paused,
    Finished,
}

/// How many times an animation repeats
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IterationCount {
    Finite(u32),
    Infinite,
}

impl Default for IterationCount {
    fn default() -> Self {
        IterationCount::Finite(1)
    }
}

/// Playback direction across iterations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Play forward (from -> to) every iteration
    #[default]
    Normal,
    /// Play backward (to -> from) every iteration
    Reverse,
    /// Alternate starting forward
    Alternate,
    /// Alternate starting backward
    AlternateReverse,
}

/// Whether the start/end value persists outside the active interval
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillMode {
    /// Reset to the initial value after the animation completes
    None,
    /// Hold the final value after the animation completes
    #[default]
    Forwards,
    /// Apply the initial value during the delay period
    Backwards,
    /// Both forwards and backwards fill
    Both,
}

/// Immutable timing configuration for a [`Tween`]
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    pub duration_ms: f32,
    pub delay_ms: f32,
    pub easing: Easing,
    pub iterations: IterationCount,
    pub direction: Direction,
    pub fill: FillMode,
}

impl AnimationConfig {
    /// Create a config with the given duration. Rejects non-positive
    /// durations rather than producing an animation that can never progress.
    pub fn new(duration_ms: f32) -> Result<Self> {
        if !(duration_ms > 0.0) {
            return Err(AnimationError::InvalidDuration(duration_ms));
        }
        Ok(Self {
            duration_ms,
            delay_ms: 0.0,
            easing: Easing::Linear,
            iterations: IterationCount::Finite(1),
            direction: Direction::Normal,
            fill: FillMode::Forwards,
        })
    }

    pub fn delay(mut self, delay_ms: f32) -> Result<Self> {
        if delay_ms < 0.0 {
            return Err(AnimationError::InvalidDelay(delay_ms));
        }
        self.delay_ms = delay_ms;
        Ok(self)
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn iterations(mut self, count: u32) -> Result<Self> {
        if count == 0 {
            return Err(AnimationError::InvalidIterations);
        }
        self.iterations = IterationCount::Finite(count);
        Ok(self)
    }

    pub fn infinite(mut self) -> Self {
        self.iterations = IterationCount::Infinite;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn fill(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    /// Total active duration including delay. An infinite animation reports
    /// a single iteration (used for timeline duration estimates).
    pub fn total_duration_ms(&self) -> f32 {
        let iterations = match self.iterations {
            IterationCount::Finite(n) => n as f32,
            IterationCount::Infinite => 1.0,
        };
        self.delay_ms + self.duration_ms * iterations
    }
}

/// A single point in a keyframe track
#[derive(Clone, Copy, Debug)]
pub struct TrackKeyframe {
    /// Normalized time position (0.0 to 1.0)
    pub offset: f32,
    /// Value at this keyframe
    pub value: f32,
    /// Easing used when transitioning TO this keyframe
    pub easing: Easing,
}

impl TrackKeyframe {
    pub fn new(offset: f32, value: f32, easing: Easing) -> Self {
        Self {
            offset,
            value,
            easing,
        }
    }

    pub fn linear(offset: f32, value: f32) -> Self {
        Self::new(offset, value, Easing::Linear)
    }
}

/// What a tween interpolates over
#[derive(Clone, Debug)]
enum Track {
    /// Straight from -> to interpolation shaped by the config easing
    Range { from: f32, to: f32 },
    /// Multi-point track; each keyframe carries its own easing
    Keyframes(Vec<TrackKeyframe>),
}

/// An interpolation animation instance
pub struct Tween {
    track: Track,
    config: AnimationConfig,
    state: PlaybackState,
    /// Elapsed active time in ms; negative while delay is unconsumed
    elapsed_ms: f32,
    /// Time progress of the current iteration, always in [0, 1]
    progress: f32,
    iteration: u32,
    /// Whether the current iteration renders to -> from
    backward: bool,
    completed_fired: bool,
    on_update: Option<UpdateCallback>,
    on_complete: Vec<CompleteCallback>,
}

impl Tween {
    /// Create a from -> to tween
    pub fn new(from: f32, to: f32, config: AnimationConfig) -> Self {
        let backward = starts_backward(config.direction);
        let delay = config.delay_ms;
        Self {
            track: Track::Range { from, to },
            config,
            state: PlaybackState::Idle,
            elapsed_ms: -delay,
            progress: 0.0,
            iteration: 0,
            backward,
            completed_fired: false,
            on_update: None,
            on_complete: Vec::new(),
        }
    }

    /// Create a tween over a keyframe track. Keyframes are sorted by offset;
    /// each keyframe's own easing shapes the segment leading to it, so the
    /// config easing is not applied on top.
    pub fn keyframes(points: Vec<TrackKeyframe>, config: AnimationConfig) -> Result<Self> {
        if points.len() < 2 {
            return Err(AnimationError::TooFewKeyframes(points.len()));
        }
        for point in &points {
            if !(0.0..=1.0).contains(&point.offset) {
                return Err(AnimationError::InvalidKeyframeOffset(point.offset));
            }
        }
        let mut points = points;
        points.sort_by(|a, b| {
            a.offset
                .partial_cmp(&b.offset)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let backward = starts_backward(config.direction);
        let delay = config.delay_ms;
        Ok(Self {
            track: Track::Keyframes(points),
            config,
            state: PlaybackState::Idle,
            elapsed_ms: -delay,
            progress: 0.0,
            iteration: 0,
            backward,
            completed_fired: false,
            on_update: None,
            on_complete: Vec::new(),
        })
    }

    /// Set the per-tick update callback
    pub fn on_update<F>(mut self, callback: F) -> Self
    where
        F: FnMut(f32, f32) + Send + 'static,
    {
        self.on_update = Some(Box::new(callback));
        self
    }

    /// Add a completion callback; each fires exactly once per completion
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_complete.push(Box::new(callback));
        self
    }

    pub fn set_on_update(&mut self, callback: UpdateCallback) {
        self.on_update = Some(callback);
    }

    pub fn push_on_complete(&mut self, callback: CompleteCallback) {
        self.on_complete.push(callback);
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Total duration including delay (one iteration if infinite)
    pub fn total_duration_ms(&self) -> f32 {
        self.config.total_duration_ms()
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Finished
    }

    /// Start or resume playback. Idempotent while running; a finished tween
    /// restarts from scratch (elapsed, progress, and iteration reset).
    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Running => {}
            PlaybackState::Paused => self.state = PlaybackState::Running,
            PlaybackState::Idle => {
                self.elapsed_ms = -self.config.delay_ms;
                self.state = PlaybackState::Running;
            }
            PlaybackState::Finished => {
                self.reset();
                self.state = PlaybackState::Running;
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Running {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop playback and return to idle with elapsed zeroed. Completion
    /// callbacks of a stopped-but-unfinished tween never fire.
    pub fn stop(&mut self) {
        self.reset();
        self.elapsed_ms = 0.0;
        self.state = PlaybackState::Idle;
    }

    fn reset(&mut self) {
        self.elapsed_ms = -self.config.delay_ms;
        self.progress = 0.0;
        self.iteration = 0;
        self.backward = starts_backward(self.config.direction);
        self.completed_fired = false;
    }

    /// Reverse playback in place.
    ///
    /// Flips the direction parity of the current iteration and mirrors the
    /// elapsed time, which preserves the instantaneous rendered value exactly
    /// for every easing. A reverse during the delay phase mirrors against the
    /// active interval only (the remaining delay is discarded).
    pub fn reverse(&mut self) {
        self.backward = !self.backward;
        let active = self.elapsed_ms.clamp(0.0, self.config.duration_ms);
        self.elapsed_ms = self.config.duration_ms - active;
        self.progress = (self.elapsed_ms / self.config.duration_ms).clamp(0.0, 1.0);
        if self.state == PlaybackState::Finished {
            self.state = PlaybackState::Running;
            self.completed_fired = false;
        }
    }

    /// Position the tween as if `elapsed_ms` of active time (past the delay)
    /// had played, recomputing the iteration index and direction parity, and
    /// re-notify immediately. Does not change the lifecycle state.
    pub fn seek_elapsed(&mut self, elapsed_ms: f32) {
        let duration = self.config.duration_ms;
        let elapsed = elapsed_ms.max(0.0);
        let (iteration, in_iteration) = match self.config.iterations {
            IterationCount::Finite(n) => {
                let total = duration * n as f32;
                if elapsed >= total {
                    (n - 1, duration)
                } else {
                    ((elapsed / duration) as u32, elapsed % duration)
                }
            }
            IterationCount::Infinite => ((elapsed / duration) as u32, elapsed % duration),
        };

        self.iteration = iteration;
        let mut backward = starts_backward(self.config.direction);
        if matches!(
            self.config.direction,
            Direction::Alternate | Direction::AlternateReverse
        ) && iteration % 2 == 1
        {
            backward = !backward;
        }
        self.backward = backward;

        self.elapsed_ms = in_iteration;
        self.progress = (in_iteration / duration).clamp(0.0, 1.0);
        let value = self.sample(self.progress);
        self.notify(self.progress, value);
    }

    /// Jump to a progress position (clamped to [0, 1]) and re-notify
    /// immediately. Does not change the lifecycle state.
    pub fn seek(&mut self, progress: f32) {
        let progress = progress.clamp(0.0, 1.0);
        self.elapsed_ms = progress * self.config.duration_ms;
        self.progress = progress;
        let value = self.sample(progress);
        self.notify(progress, value);
    }

    /// Current rendered value under the fill policy
    pub fn value(&self) -> f32 {
        match self.state {
            PlaybackState::Idle => self.fill_value_before(),
            PlaybackState::Finished => self.fill_value_after(),
            _ => {
                if self.elapsed_ms < 0.0 {
                    self.fill_value_before()
                } else {
                    self.sample(self.progress)
                }
            }
        }
    }

    /// Advance by `dt_ms`, recompute progress, apply easing, and notify.
    pub fn update(&mut self, dt_ms: f32) {
        if self.state != PlaybackState::Running || dt_ms <= 0.0 {
            return;
        }

        self.elapsed_ms += dt_ms;

        // Delay phase: progress pins at 0; backwards fill renders the start
        if self.elapsed_ms < 0.0 {
            self.progress = 0.0;
            if matches!(self.config.fill, FillMode::Backwards | FillMode::Both) {
                let value = self.sample(0.0);
                self.notify(0.0, value);
            }
            return;
        }

        let duration = self.config.duration_ms;

        // Consume whole iterations, carrying the remainder forward
        while self.elapsed_ms >= duration {
            let more = match self.config.iterations {
                IterationCount::Infinite => true,
                IterationCount::Finite(n) => self.iteration + 1 < n,
            };
            if more {
                self.iteration += 1;
                self.elapsed_ms -= duration;
                if matches!(
                    self.config.direction,
                    Direction::Alternate | Direction::AlternateReverse
                ) {
                    self.backward = !self.backward;
                }
            } else {
                self.progress = 1.0;
                self.state = PlaybackState::Finished;
                let value = self.fill_value_after();
                self.notify(1.0, value);
                self.fire_complete();
                return;
            }
        }

        self.progress = (self.elapsed_ms / duration).clamp(0.0, 1.0);
        let value = self.sample(self.progress);
        self.notify(self.progress, value);
    }

    /// Rendered value at a time progress, honoring the iteration parity
    fn sample(&self, progress: f32) -> f32 {
        let position = if self.backward {
            1.0 - progress
        } else {
            progress
        };
        match &self.track {
            Track::Range { from, to } => {
                let eased = self.config.easing.apply(position);
                from + (to - from) * eased
            }
            Track::Keyframes(points) => sample_keyframes(points, position),
        }
    }

    /// Value at the directed start of the first iteration
    fn initial_value(&self) -> f32 {
        let position = if starts_backward(self.config.direction) {
            1.0
        } else {
            0.0
        };
        match &self.track {
            Track::Range { from, to } => {
                let eased = self.config.easing.apply(position);
                from + (to - from) * eased
            }
            Track::Keyframes(points) => sample_keyframes(points, position),
        }
    }

    fn fill_value_before(&self) -> f32 {
        // Before the active interval both policies render the initial value;
        // fill only controls whether listeners are notified during delay.
        self.initial_value()
    }

    fn fill_value_after(&self) -> f32 {
        match self.config.fill {
            FillMode::Forwards | FillMode::Both => self.sample(1.0),
            FillMode::None | FillMode::Backwards => self.initial_value(),
        }
    }

    fn notify(&mut self, progress: f32, value: f32) {
        if let Some(callback) = &mut self.on_update {
            callback(progress, value);
        }
    }

    fn fire_complete(&mut self) {
        if self.completed_fired {
            return;
        }
        self.completed_fired = true;
        for callback in &mut self.on_complete {
            callback();
        }
    }
}

fn starts_backward(direction: Direction) -> bool {
    matches!(direction, Direction::Reverse | Direction::AlternateReverse)
}

/// Bracket the position between two keyframes and ease the segment
fn sample_keyframes(points: &[TrackKeyframe], position: f32) -> f32 {
    let position = position.clamp(0.0, 1.0);

    let mut prev = &points[0];
    let mut next = &points[0];
    for point in points {
        if point.offset <= position {
            prev = point;
        }
        if point.offset >= position {
            next = point;
            break;
        }
    }

    if (prev.offset - next.offset).abs() < f32::EPSILON {
        return prev.value;
    }

    let local = (position - prev.offset) / (next.offset - prev.offset);
    let eased = next.easing.apply(local);
    prev.value + (next.value - prev.value) * eased
}
