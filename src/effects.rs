//! Canned keyframe effects for common entry/exit patterns
//!
//! Each effect builds a [`KeyframeEffect`] ready to hand to a native backend
//! or sample in-process. Durations are caller-provided and validated.

use crate::easing::Easing;
use crate::error::Result;
use crate::keyframe::{KeyframeEffect, KeyframeProperties};

/// Fade in from transparent to opaque
pub fn fade_in(duration_ms: f32) -> Result<KeyframeEffect> {
    KeyframeEffect::new(duration_ms)?
        .keyframe(0.0, KeyframeProperties::opacity(0.0), Easing::Linear)?
        .keyframe(1.0, KeyframeProperties::opacity(1.0), Easing::EaseOutQuad)
}

/// Fade out from opaque to transparent
pub fn fade_out(duration_ms: f32) -> Result<KeyframeEffect> {
    KeyframeEffect::new(duration_ms)?
        .keyframe(0.0, KeyframeProperties::opacity(1.0), Easing::Linear)?
        .keyframe(1.0, KeyframeProperties::opacity(0.0), Easing::EaseInQuad)
}

/// Slide in from the left with fade
pub fn slide_in_left(duration_ms: f32, distance: f32) -> Result<KeyframeEffect> {
    slide_in(duration_ms, -distance, 0.0)
}

/// Slide in from the right with fade
pub fn slide_in_right(duration_ms: f32, distance: f32) -> Result<KeyframeEffect> {
    slide_in(duration_ms, distance, 0.0)
}

/// Slide in from above with fade
pub fn slide_in_up(duration_ms: f32, distance: f32) -> Result<KeyframeEffect> {
    slide_in(duration_ms, 0.0, -distance)
}

/// Slide in from below with fade
pub fn slide_in_down(duration_ms: f32, distance: f32) -> Result<KeyframeEffect> {
    slide_in(duration_ms, 0.0, distance)
}

fn slide_in(duration_ms: f32, x: f32, y: f32) -> Result<KeyframeEffect> {
    KeyframeEffect::new(duration_ms)?
        .keyframe(
            0.0,
            KeyframeProperties::default()
                .with_translate(x, y)
                .with_opacity(0.0),
            Easing::Linear,
        )?
        .keyframe(
            1.0,
            KeyframeProperties::default()
                .with_translate(0.0, 0.0)
                .with_opacity(1.0),
            Easing::EaseOutCubic,
        )
}

/// Slide out to the left with fade
pub fn slide_out_left(duration_ms: f32, distance: f32) -> Result<KeyframeEffect> {
    slide_out(duration_ms, -distance, 0.0)
}

/// Slide out to the right with fade
pub fn slide_out_right(duration_ms: f32, distance: f32) -> Result<KeyframeEffect> {
    slide_out(duration_ms, distance, 0.0)
}

/// Slide out upward with fade
pub fn slide_out_up(duration_ms: f32, distance: f32) -> Result<KeyframeEffect> {
    slide_out(duration_ms, 0.0, -distance)
}

/// Slide out downward with fade
pub fn slide_out_down(duration_ms: f32, distance: f32) -> Result<KeyframeEffect> {
    slide_out(duration_ms, 0.0, distance)
}

fn slide_out(duration_ms: f32, x: f32, y: f32) -> Result<KeyframeEffect> {
    KeyframeEffect::new(duration_ms)?
        .keyframe(
            0.0,
            KeyframeProperties::default()
                .with_translate(0.0, 0.0)
                .with_opacity(1.0),
            Easing::Linear,
        )?
        .keyframe(
            1.0,
            KeyframeProperties::default()
                .with_translate(x, y)
                .with_opacity(0.0),
            Easing::EaseInCubic,
        )
}

/// Scale in from nothing with fade
pub fn scale_in(duration_ms: f32) -> Result<KeyframeEffect> {
    KeyframeEffect::new(duration_ms)?
        .keyframe(
            0.0,
            KeyframeProperties::default().with_scale(0.0).with_opacity(0.0),
            Easing::Linear,
        )?
        .keyframe(
            1.0,
            KeyframeProperties::default().with_scale(1.0).with_opacity(1.0),
            Easing::EaseOutCubic,
        )
}

/// Scale out to nothing with fade
pub fn scale_out(duration_ms: f32) -> Result<KeyframeEffect> {
    KeyframeEffect::new(duration_ms)?
        .keyframe(
            0.0,
            KeyframeProperties::default().with_scale(1.0).with_opacity(1.0),
            Easing::Linear,
        )?
        .keyframe(
            1.0,
            KeyframeProperties::default().with_scale(0.0).with_opacity(0.0),
            Easing::EaseInCubic,
        )
}

/// Bounce in: overshoot to 110% scale before settling at full size
pub fn bounce_in(duration_ms: f32) -> Result<KeyframeEffect> {
    KeyframeEffect::new(duration_ms)?
        .keyframe(
            0.0,
            KeyframeProperties::default().with_scale(0.3).with_opacity(0.0),
            Easing::Linear,
        )?
        .keyframe(
            0.5,
            KeyframeProperties::default().with_scale(1.1).with_opacity(1.0),
            Easing::EaseOutQuad,
        )?
        .keyframe(
            0.75,
            KeyframeProperties::scale(0.95),
            Easing::EaseInOutQuad,
        )?
        .keyframe(1.0, KeyframeProperties::scale(1.0), Easing::EaseInOutQuad)
}

/// Horizontal shake, decaying back to rest
pub fn shake(duration_ms: f32, distance: f32) -> Result<KeyframeEffect> {
    KeyframeEffect::new(duration_ms)?
        .keyframe(0.0, KeyframeProperties::translate(0.0, 0.0), Easing::Linear)?
        .keyframe(
            0.2,
            KeyframeProperties::translate(-distance, 0.0),
            Easing::EaseInOutQuad,
        )?
        .keyframe(
            0.4,
            KeyframeProperties::translate(distance, 0.0),
            Easing::EaseInOutQuad,
        )?
        .keyframe(
            0.6,
            KeyframeProperties::translate(-distance * 0.5, 0.0),
            Easing::EaseInOutQuad,
        )?
        .keyframe(
            0.8,
            KeyframeProperties::translate(distance * 0.5, 0.0),
            Easing::EaseInOutQuad,
        )?
        .keyframe(1.0, KeyframeProperties::translate(0.0, 0.0), Easing::EaseOutQuad)
}

/// Pulse: swell slightly and return
pub fn pulse(duration_ms: f32) -> Result<KeyframeEffect> {
    KeyframeEffect::new(duration_ms)?
        .keyframe(0.0, KeyframeProperties::scale(1.0), Easing::Linear)?
        .keyframe(0.5, KeyframeProperties::scale(1.05), Easing::EaseInOutQuad)?
        .keyframe(1.0, KeyframeProperties::scale(1.0), Easing::EaseInOutQuad)
}
