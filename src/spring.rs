//! Spring physics animation
//!
//! A damped harmonic oscillator integrated with semi-implicit Euler. The
//! spring is settled once both displacement and velocity drop below the
//! configured precision simultaneously; on settle the position snaps exactly
//! to the target so no residual drift is rendered.

use crate::error::{AnimationError, Result};
use crate::tween::{CompleteCallback, PlaybackState, UpdateCallback};

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Settle threshold for both displacement and velocity
    pub precision: f32,
}

impl SpringConfig {
    /// Create a new spring configuration. All physical parameters must be
    /// strictly positive; a zero mass would divide the integrator by zero.
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Result<Self> {
        for (name, value) in [("stiffness", stiffness), ("damping", damping), ("mass", mass)] {
            if !(value > 0.0) {
                return Err(AnimationError::InvalidSpringParameter { name, value });
            }
        }
        Ok(Self {
            stiffness,
            damping,
            mass,
            precision: 0.01,
        })
    }

    pub fn precision(mut self, precision: f32) -> Self {
        self.precision = precision.abs().max(f32::EPSILON);
        self
    }

    /// A gentle, slow spring (good for page transitions)
    pub fn gentle() -> Self {
        Self {
            stiffness: 120.0,
            damping: 14.0,
            mass: 1.0,
            precision: 0.01,
        }
    }

    /// A wobbly spring with overshoot (good for playful UI)
    pub fn wobbly() -> Self {
        Self {
            stiffness: 180.0,
            damping: 12.0,
            mass: 1.0,
            precision: 0.01,
        }
    }

    /// A stiff, snappy spring (good for buttons)
    pub fn stiff() -> Self {
        Self {
            stiffness: 400.0,
            damping: 30.0,
            mass: 1.0,
            precision: 0.01,
        }
    }

    /// A fast spring with minimal oscillation (good for small movements)
    pub fn snappy() -> Self {
        Self {
            stiffness: 300.0,
            damping: 24.0,
            mass: 1.0,
            precision: 0.01,
        }
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping()
    }
}

impl Default for SpringConfig {
    /// Near-critically-damped feel: stiffness 100, damping 10, mass 1
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 10.0,
            mass: 1.0,
            precision: 0.01,
        }
    }
}

/// The physics core: position + velocity integrated toward a target
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    position: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            position: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Retarget the spring; velocity carries over so interrupted motion
    /// stays continuous.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    /// Settled iff displacement and velocity are both below precision
    pub fn is_settled(&self) -> bool {
        (self.position - self.target).abs() < self.config.precision
            && self.velocity.abs() < self.config.precision
    }

    /// Advance the simulation by `dt` seconds using semi-implicit Euler:
    /// velocity integrates acceleration first, then position integrates the
    /// new velocity.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        if self.is_settled() {
            self.position = self.target;
            self.velocity = 0.0;
            return;
        }

        let spring_force = -self.config.stiffness * (self.position - self.target);
        let damping_force = -self.config.damping * self.velocity;
        let acceleration = (spring_force + damping_force) / self.config.mass;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;

        if self.is_settled() {
            self.position = self.target;
            self.velocity = 0.0;
        }
    }
}

/// A spring simulation wrapped as a from -> to animation
pub struct SpringMotion {
    spring: Spring,
    from: f32,
    state: PlaybackState,
    completed_fired: bool,
    on_update: Option<UpdateCallback>,
    on_complete: Vec<CompleteCallback>,
}

impl SpringMotion {
    pub fn new(from: f32, to: f32, config: SpringConfig) -> Self {
        let mut spring = Spring::new(config, from);
        spring.set_target(to);
        Self {
            spring,
            from,
            state: PlaybackState::Idle,
            completed_fired: false,
            on_update: None,
            on_complete: Vec::new(),
        }
    }

    /// Seed the simulation with an initial velocity (e.g. from a gesture)
    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.spring.set_velocity(velocity);
        self
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
        self.spring.position()
    }

    pub fn velocity(&self) -> f32 {
        self.spring.velocity()
    }

    /// Normalized displacement consumed so far, clamped to [0, 1]
    pub fn progress(&self) -> f32 {
        let total = self.spring.target() - self.from;
        if total.abs() < f32::EPSILON {
            return if self.state == PlaybackState::Finished {
                1.0
            } else {
                0.0
            };
        }
        ((self.spring.position() - self.from) / total).clamp(0.0, 1.0)
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
                // Restart from the origin
                self.spring.position = self.from;
                self.spring.velocity = 0.0;
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
        self.spring.position = self.from;
        self.spring.velocity = 0.0;
        self.completed_fired = false;
        self.state = PlaybackState::Idle;
    }

    pub fn update(&mut self, dt_ms: f32) {
        if self.state != PlaybackState::Running || dt_ms <= 0.0 {
            return;
        }

        self.spring.step(dt_ms / 1000.0);

        if self.spring.is_settled() {
            // Snap exactly to target; no residual drift
            self.spring.position = self.spring.target();
            self.spring.velocity = 0.0;
            self.state = PlaybackState::Finished;
            let value = self.spring.position();
            self.notify(1.0, value);
            self.fire_complete();
            tracing::trace!(target = value, "spring settled");
        } else {
            let progress = self.progress();
            let value = self.spring.position();
            self.notify(progress, value);
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
