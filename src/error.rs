//! Animation error types

use thiserror::Error;

/// Errors produced when constructing animation configurations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Animation duration must be strictly positive
    #[error("animation duration must be positive, got {0}ms")]
    InvalidDuration(f32),

    /// Delay may not be negative
    #[error("animation delay may not be negative, got {0}ms")]
    InvalidDelay(f32),

    /// A finite iteration count must be at least 1
    #[error("iteration count must be at least 1")]
    InvalidIterations,

    /// Cubic bezier x control points must stay inside the unit interval
    #[error("cubic bezier x control points must be within [0, 1], got ({0}, {1})")]
    InvalidBezier(f32, f32),

    /// Stepped easing needs at least one step
    #[error("stepped easing requires at least 1 step")]
    InvalidStepCount,

    /// Spring parameters must be strictly positive
    #[error("spring {name} must be positive, got {value}")]
    InvalidSpringParameter { name: &'static str, value: f32 },

    /// Decay deceleration must be in (0, 1]
    #[error("deceleration factor must be in (0, 1], got {0}")]
    InvalidDeceleration(f32),

    /// Decay clamp bounds must be ordered min <= max
    #[error("decay clamp bounds are inverted: [{0}, {1}]")]
    InvalidClamp(f32, f32),

    /// Keyframe offsets must lie inside the normalized interval
    #[error("keyframe offset must be within [0, 1], got {0}")]
    InvalidKeyframeOffset(f32),

    /// A keyframe track needs at least two points to interpolate between
    #[error("keyframe track requires at least 2 keyframes, got {0}")]
    TooFewKeyframes(usize),

    /// Interpolation ranges must have matching lengths
    #[error("input range has {input} breakpoints but output range has {output}")]
    RangeLengthMismatch { input: usize, output: usize },

    /// Interpolation ranges need at least two breakpoints
    #[error("interpolation ranges require at least 2 breakpoints, got {0}")]
    RangeTooShort(usize),

    /// The input range must be monotonically non-decreasing
    #[error("input range must be monotonically non-decreasing, violated at index {0}")]
    NonMonotonicRange(usize),

    /// Stagger interval may not be negative
    #[error("stagger interval may not be negative, got {0}ms")]
    InvalidStaggerInterval(f32),

    /// Stagger origin index is out of bounds for the target list
    #[error("stagger origin index {index} is out of bounds for {count} targets")]
    StaggerIndexOutOfBounds { index: usize, count: usize },
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
