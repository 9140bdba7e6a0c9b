//! Kinesis Animation Engine
//!
//! A tick-driven, in-process animation engine. Hosts create an
//! [`AnimationEngine`], register animations against it, and drive it from
//! their own frame loop.
//!
//! # Features
//!
//! - **Easing**: full CSS-style easing families plus parametric cubic bezier
//!   and stepped curves
//! - **Tweens**: duration/delay/iteration/direction/fill timing model with
//!   seek and in-place reverse
//! - **Spring Physics**: semi-implicit Euler springs with velocity carry-over
//! - **Momentum Decay**: fling/scroll coasting with optional bounds
//! - **Reactive Values**: subscribable value cells and read-only derived views
//! - **Timelines**: orchestrate multiple animations with absolute and
//!   relative offsets
//! - **Combinators**: sequence, parallel, and stagger composition
//! - **Platform Bridge**: delegate keyframe effects to a native backend
//!
//! # Example
//!
//! ```
//! use kinesis::{AnimationConfig, AnimationEngine, Easing};
//!
//! let engine = AnimationEngine::new();
//! let opacity = engine.create_value(0.0);
//! let config = AnimationConfig::new(300.0).unwrap().easing(Easing::EaseOutCubic);
//! engine.timing(&opacity, 1.0, config);
//!
//! // Host frame loop
//! while engine.advance(16.0) {}
//! assert_eq!(opacity.get(), 1.0);
//! ```

pub mod bridge;
pub mod decay;
pub mod easing;
pub mod effects;
pub mod engine;
pub mod error;
pub mod group;
pub mod keyframe;
pub mod spring;
pub mod timeline;
pub mod tween;
pub mod value;

pub use bridge::{BridgedAnimation, NativeAnimationBackend};
pub use decay::{DecayConfig, DecayMotion};
pub use easing::{Easing, StepPosition};
pub use engine::{
    AnimationEngine, AnimationHandle, AnimationId, AnimationKind, EngineHandle, TimelineHandle,
    TimelineId,
};
pub use error::{AnimationError, Result};
pub use group::{stagger_delays, ParallelGroup, SequenceGroup, StaggerConfig, StaggerFrom};
pub use keyframe::{KeyframeEffect, KeyframeProperties, NormalizedKeyframe, PropertyKeyframe};
pub use spring::{Spring, SpringConfig, SpringMotion};
pub use timeline::{Timeline, TimelineConfig, TimelineEntryId, TimelinePosition};
pub use tween::{
    AnimationConfig, Direction, FillMode, IterationCount, PlaybackState, TrackKeyframe, Tween,
};
pub use value::{AnimatedValue, Discrete, Extrapolation, Interpolate, InterpolatedValue, Subscription};
