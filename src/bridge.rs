//! Native animation backend bridge
//!
//! Hosts with their own animation machinery (a compositor, a platform view
//! layer) implement [`NativeAnimationBackend`] and receive a normalized
//! keyframe plan to play on their side. A [`BridgedAnimation`] presents the
//! same playback surface as an in-process animation, but its clock lives in
//! the backend: the engine never ticks it, only polls it for completion.

use crate::keyframe::{KeyframeEffect, NormalizedKeyframe};
use crate::tween::{CompleteCallback, PlaybackState};

/// Host-side animation delegate
///
/// `load` is called once with the resolved plan before any playback command.
/// `state` drives retirement: once it reports `Finished` the engine drops the
/// bridged entry.
pub trait NativeAnimationBackend: Send {
    /// Hand the backend the resolved keyframe plan and its duration
    fn load(&mut self, plan: &[NormalizedKeyframe], duration_ms: f32);

    fn play(&mut self);

    fn pause(&mut self);

    /// Abandon playback; the backend decides what the final frame shows
    fn cancel(&mut self);

    fn reverse(&mut self);

    /// Jump to a normalized progress
    fn seek(&mut self, progress: f32);

    fn progress(&self) -> f32;

    fn state(&self) -> PlaybackState;
}

/// An animation whose playback is delegated to a native backend
pub struct BridgedAnimation {
    backend: Box<dyn NativeAnimationBackend>,
    completed_fired: bool,
    on_complete: Vec<CompleteCallback>,
}

impl BridgedAnimation {
    /// Resolve the effect into a plan and load it into the backend
    pub fn new(mut backend: Box<dyn NativeAnimationBackend>, effect: &KeyframeEffect) -> Self {
        let plan = effect.normalized_plan();
        backend.load(&plan, effect.duration_ms());
        Self {
            backend,
            completed_fired: false,
            on_complete: Vec::new(),
        }
    }

    pub fn push_on_complete(&mut self, callback: CompleteCallback) {
        self.on_complete.push(callback);
    }

    pub fn play(&mut self) {
        self.backend.play();
    }

    pub fn pause(&mut self) {
        self.backend.pause();
    }

    pub fn stop(&mut self) {
        self.backend.cancel();
    }

    pub fn reverse(&mut self) {
        self.backend.reverse();
    }

    pub fn seek(&mut self, progress: f32) {
        self.backend.seek(progress.clamp(0.0, 1.0));
    }

    pub fn progress(&self) -> f32 {
        self.backend.progress()
    }

    pub fn state(&self) -> PlaybackState {
        self.backend.state()
    }

    pub fn is_finished(&self) -> bool {
        self.backend.state() == PlaybackState::Finished
    }

    /// Poll the backend for completion; fires callbacks once on the first
    /// poll that observes the finished state
    pub fn poll(&mut self) -> bool {
        if self.is_finished() {
            if !self.completed_fired {
                self.completed_fired = true;
                for callback in &mut self.on_complete {
                    callback();
                }
            }
            true
        } else {
            false
        }
    }
}
