//! Momentum decay animation
//!
//! Models fling and scroll momentum: the value coasts with its initial
//! velocity while an exponential friction factor bleeds the velocity off.
//! The simulation terminates when velocity drops below a fixed threshold,
//! or immediately when the value hits a clamp bound.

use crate::error::{AnimationError, Result};
use crate::tween::{CompleteCallback, PlaybackState, UpdateCallback};

/// Velocity below this magnitude (units per second) terminates the decay
const REST_VELOCITY: f32 = 0.01;

/// Configuration for a momentum decay animation
#[derive(Clone, Copy, Debug)]
pub struct DecayConfig {
    /// Initial velocity in units per second
    pub velocity: f32,
    /// Friction factor applied per normalized 60fps frame, in (0, 1].
    /// Lower values stop sooner; 1.0 never decays.
    pub deceleration: f32,
    /// Optional bounds the value may not coast past
    pub clamp: Option<(f32, f32)>,
}

impl DecayConfig {
    pub fn new(velocity: f32) -> Self {
        Self {
            velocity,
            deceleration: 0.998,
            clamp: None,
        }
    }

    pub fn deceleration(mut self, deceleration: f32) -> Result<Self> {
        if !(deceleration > 0.0 && deceleration <= 1.0) {
            return Err(AnimationError::InvalidDeceleration(deceleration));
        }
        self.deceleration = deceleration;
        Ok(self)
    }

    pub fn clamp(mut self, min: f32, max: f32) -> Result<Self> {
        if min > max {
            return Err(AnimationError::InvalidClamp(min, max));
        }
        self.clamp = Some((min, max));
        Ok(self)
    }
}

/// A momentum decay simulation starting from a value and coasting to rest
pub struct DecayMotion {
    config: DecayConfig,
    position: f32,
    velocity: f32,
    state: PlaybackState,
    initial: f32,
    completed_fired: bool,
    on_update: Option<UpdateCallback>,
    on_complete: Vec<CompleteCallback>,
}

impl DecayMotion {
    pub fn new(from: f32, config: DecayConfig) -> Self {
        Self {
            config,
            position: from,
            velocity: config.velocity,
            state: PlaybackState::Idle,
            initial: from,
            completed_fired: false,
            on_update: None,
            on_complete: Vec::new(),
        }
    }

    pub fn on_update<F>(mut self, callback: F) -> Self
    where
        F: FnMut(f32, f32) + Send + 'static,
    {
        self.on_update = Some(Box::new(callback));
        self
    }

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

    pub fn value(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Decay has no natural endpoint known in advance, so progress is 0.0 by
    /// contract. Observe completion through `state`, not progress.
    pub fn progress(&self) -> f32 {
        0.0
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Finished
    }

    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Running => {}
            PlaybackState::Finished => {
                self.position = self.initial;
                self.velocity = self.config.velocity;
                self.completed_fired = false;
                self.state = PlaybackState::Running;
            }
            _ => self.state = PlaybackState::Running,
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Running {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn stop(&mut self) {
        self.position = self.initial;
        self.velocity = self.config.velocity;
        self.completed_fired = false;
        self.state = PlaybackState::Idle;
    }

    pub fn update(&mut self, dt_ms: f32) {
        if self.state != PlaybackState::Running || dt_ms <= 0.0 {
            return;
        }

        let dt_s = dt_ms / 1000.0;
        // Deceleration is defined per 60fps frame; scale the exponent so
        // variable tick rates decay at the same wall-clock rate.
        self.velocity *= self.config.deceleration.powf(dt_s * 60.0);
        self.position += self.velocity * dt_s;

        let mut hit_bound = false;
        if let Some((min, max)) = self.config.clamp {
            if self.position <= min {
                self.position = min;
                hit_bound = true;
            } else if self.position >= max {
                self.position = max;
                hit_bound = true;
            }
        }

        if hit_bound || self.velocity.abs() < REST_VELOCITY {
            self.velocity = 0.0;
            self.state = PlaybackState::Finished;
            let value = self.position;
            self.notify(0.0, value);
            self.fire_complete();
            tracing::trace!(value, "decay came to rest");
        } else {
            let value = self.position;
            self.notify(0.0, value);
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
