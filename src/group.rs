//! Sequence, parallel, and stagger combinators
//!
//! Groups compose animations of any kind, including other groups, behind the
//! same playback surface as a single animation.

use crate::easing::Easing;
use crate::engine::AnimationKind;
use crate::error::{AnimationError, Result};
use crate::tween::{AnimationConfig, CompleteCallback, PlaybackState, Tween, TrackKeyframe};
use crate::value::AnimatedValue;

/// Runs children one at a time, each starting when the prior one finishes
pub struct SequenceGroup {
    children: Vec<AnimationKind>,
    current: usize,
    state: PlaybackState,
    completed_fired: bool,
    on_complete: Vec<CompleteCallback>,
}

impl SequenceGroup {
    pub fn new(children: Vec<AnimationKind>) -> Self {
        Self {
            children,
            current: 0,
            state: PlaybackState::Idle,
            completed_fired: false,
            on_complete: Vec::new(),
        }
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_complete.push(Box::new(callback));
        self
    }

    pub fn push_on_complete(&mut self, callback: CompleteCallback) {
        self.on_complete.push(callback);
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Finished
    }

    /// Index of the child currently playing
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Running => return,
            PlaybackState::Paused => {
                self.state = PlaybackState::Running;
                if let Some(child) = self.children.get_mut(self.current) {
                    child.play();
                }
                return;
            }
            PlaybackState::Finished => {
                self.current = 0;
                self.completed_fired = false;
                for child in &mut self.children {
                    child.stop();
                }
            }
            PlaybackState::Idle => {}
        }
        if self.children.is_empty() {
            self.state = PlaybackState::Finished;
            self.fire_complete();
            return;
        }
        self.state = PlaybackState::Running;
        self.children[self.current].play();
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Running {
            self.state = PlaybackState::Paused;
            if let Some(child) = self.children.get_mut(self.current) {
                child.pause();
            }
        }
    }

    pub fn stop(&mut self) {
        for child in &mut self.children {
            child.stop();
        }
        self.current = 0;
        self.completed_fired = false;
        self.state = PlaybackState::Idle;
    }

    pub fn update(&mut self, dt_ms: f32) {
        if self.state != PlaybackState::Running || dt_ms <= 0.0 {
            return;
        }

        if let Some(child) = self.children.get_mut(self.current) {
            child.update(dt_ms);
        }

        // A finished child hands off to the next within the same tick
        while self
            .children
            .get(self.current)
            .is_some_and(|child| child.is_finished())
        {
            self.current += 1;
            match self.children.get_mut(self.current) {
                Some(next) => next.play(),
                None => {
                    self.state = PlaybackState::Finished;
                    self.fire_complete();
                    return;
                }
            }
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

/// Runs all children together, finishing once every child has finished
pub struct ParallelGroup {
    children: Vec<AnimationKind>,
    state: PlaybackState,
    completed_fired: bool,
    on_complete: Vec<CompleteCallback>,
}

impl ParallelGroup {
    pub fn new(children: Vec<AnimationKind>) -> Self {
        Self {
            children,
            state: PlaybackState::Idle,
            completed_fired: false,
            on_complete: Vec::new(),
        }
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_complete.push(Box::new(callback));
        self
    }

    pub fn push_on_complete(&mut self, callback: CompleteCallback) {
        self.on_complete.push(callback);
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Finished
    }

    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Running => return,
            PlaybackState::Finished => {
                self.completed_fired = false;
                for child in &mut self.children {
                    child.stop();
                }
            }
            _ => {}
        }
        if self.children.is_empty() {
            self.state = PlaybackState::Finished;
            self.fire_complete();
            return;
        }
        self.state = PlaybackState::Running;
        for child in &mut self.children {
            child.play();
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Running {
            self.state = PlaybackState::Paused;
            for child in &mut self.children {
                child.pause();
            }
        }
    }

    pub fn stop(&mut self) {
        for child in &mut self.children {
            child.stop();
        }
        self.completed_fired = false;
        self.state = PlaybackState::Idle;
    }

    pub fn update(&mut self, dt_ms: f32) {
        if self.state != PlaybackState::Running || dt_ms <= 0.0 {
            return;
        }

        let mut all_finished = true;
        for child in &mut self.children {
            child.update(dt_ms);
            if !child.is_finished() {
                all_finished = false;
            }
        }

        if all_finished {
            self.state = PlaybackState::Finished;
            self.fire_complete();
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

/// Which target the stagger wave radiates from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaggerFrom {
    /// Wave starts at the first target
    #[default]
    First,
    /// Wave starts at the last target
    Last,
    /// Wave radiates outward from the middle
    Center,
    /// Wave radiates inward from both ends
    Edges,
    /// Wave radiates from an explicit target index
    Index(usize),
}

/// Per-target delay distribution for staggered animations
#[derive(Clone, Copy, Debug)]
pub struct StaggerConfig {
    /// Delay step between adjacent wave ranks, in milliseconds
    pub each_ms: f32,
    pub from: StaggerFrom,
    /// Optional curve reshaping the delay distribution over the normalized
    /// wave distance
    pub easing: Option<Easing>,
}

impl StaggerConfig {
    pub fn new(each_ms: f32) -> Result<Self> {
        if each_ms < 0.0 {
            return Err(AnimationError::InvalidStaggerInterval(each_ms));
        }
        Ok(Self {
            each_ms,
            from: StaggerFrom::First,
            easing: None,
        })
    }

    pub fn from(mut self, from: StaggerFrom) -> Self {
        self.from = from;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }
}

/// Compute the extra delay for each of `count` targets
pub fn stagger_delays(count: usize, config: &StaggerConfig) -> Result<Vec<f32>> {
    if let StaggerFrom::Index(origin) = config.from {
        if origin >= count {
            return Err(AnimationError::StaggerIndexOutOfBounds {
                index: origin,
                count,
            });
        }
    }

    let distances: Vec<f32> = (0..count)
        .map(|i| match config.from {
            StaggerFrom::First => i as f32,
            StaggerFrom::Last => (count - 1 - i) as f32,
            StaggerFrom::Center => (i as f32 - (count as f32 - 1.0) / 2.0).abs(),
            StaggerFrom::Edges => (i as f32).min((count - 1 - i) as f32),
            StaggerFrom::Index(origin) => (i as f32 - origin as f32).abs(),
        })
        .collect();

    let max = distances.iter().copied().fold(0.0_f32, f32::max);

    Ok(distances
        .into_iter()
        .map(|dist| match (config.easing, max > 0.0) {
            (Some(easing), true) => easing.apply(dist / max) * config.each_ms * max,
            _ => dist * config.each_ms,
        })
        .collect())
}

/// Build one keyframe tween per target, each driving its `AnimatedValue` and
/// offset by the stagger distribution, wrapped in a parallel group.
pub fn stagger(
    targets: &[AnimatedValue],
    keyframes: Vec<TrackKeyframe>,
    config: AnimationConfig,
    stagger_config: StaggerConfig,
) -> Result<ParallelGroup> {
    let delays = stagger_delays(targets.len(), &stagger_config)?;

    let mut children = Vec::with_capacity(targets.len());
    for (target, extra_delay) in targets.iter().zip(delays) {
        let per_target = config.clone().delay(config.delay_ms + extra_delay)?;
        let cell = target.clone();
        let tween = Tween::keyframes(keyframes.clone(), per_target)?
            .on_update(move |_, value| cell.set(value));
        children.push(AnimationKind::Tween(tween));
    }

    Ok(ParallelGroup::new(children))
}
