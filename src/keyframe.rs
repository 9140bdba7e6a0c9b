//! Multi-property keyframe effects
//!
//! Describes an animation over several visual properties at once. Effects can
//! be sampled in-process or normalized into a plain keyframe plan for a
//! native animation backend.

use crate::easing::Easing;
use crate::error::{AnimationError, Result};

/// Properties a keyframe effect can animate
///
/// Unset properties are left untouched by the effect.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyframeProperties {
    /// Opacity (0.0 to 1.0)
    pub opacity: Option<f32>,
    /// Scale X factor
    pub scale_x: Option<f32>,
    /// Scale Y factor
    pub scale_y: Option<f32>,
    /// Translation X in pixels
    pub translate_x: Option<f32>,
    /// Translation Y in pixels
    pub translate_y: Option<f32>,
    /// Rotation in degrees
    pub rotate: Option<f32>,
}

impl KeyframeProperties {
    /// Create properties with only opacity set
    pub fn opacity(value: f32) -> Self {
        Self {
            opacity: Some(value),
            ..Default::default()
        }
    }

    /// Create properties with uniform scale
    pub fn scale(value: f32) -> Self {
        Self {
            scale_x: Some(value),
            scale_y: Some(value),
            ..Default::default()
        }
    }

    /// Create properties with translation
    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            translate_x: Some(x),
            translate_y: Some(y),
            ..Default::default()
        }
    }

    /// Create properties with rotation
    pub fn rotation(degrees: f32) -> Self {
        Self {
            rotate: Some(degrees),
            ..Default::default()
        }
    }

    /// Builder: set opacity
    pub fn with_opacity(mut self, value: f32) -> Self {
        self.opacity = Some(value);
        self
    }

    /// Builder: set uniform scale
    pub fn with_scale(mut self, value: f32) -> Self {
        self.scale_x = Some(value);
        self.scale_y = Some(value);
        self
    }

    /// Builder: set scale x and y separately
    pub fn with_scale_xy(mut self, x: f32, y: f32) -> Self {
        self.scale_x = Some(x);
        self.scale_y = Some(y);
        self
    }

    /// Builder: set translation
    pub fn with_translate(mut self, x: f32, y: f32) -> Self {
        self.translate_x = Some(x);
        self.translate_y = Some(y);
        self
    }

    /// Builder: set rotation
    pub fn with_rotate(mut self, degrees: f32) -> Self {
        self.rotate = Some(degrees);
        self
    }

    /// Interpolate between two property sets; a property present on only one
    /// side holds that side's value
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            opacity: lerp_opt(self.opacity, other.opacity, t),
            scale_x: lerp_opt(self.scale_x, other.scale_x, t),
            scale_y: lerp_opt(self.scale_y, other.scale_y, t),
            translate_x: lerp_opt(self.translate_x, other.translate_x, t),
            translate_y: lerp_opt(self.translate_y, other.translate_y, t),
            rotate: lerp_opt(self.rotate, other.rotate, t),
        }
    }

    /// Get the resolved opacity (defaults to 1.0 if not set)
    pub fn resolved_opacity(&self) -> f32 {
        self.opacity.unwrap_or(1.0)
    }

    /// Get the resolved scale (defaults to 1.0 if not set)
    pub fn resolved_scale(&self) -> (f32, f32) {
        (self.scale_x.unwrap_or(1.0), self.scale_y.unwrap_or(1.0))
    }

    /// Get the resolved translation (defaults to 0.0 if not set)
    pub fn resolved_translate(&self) -> (f32, f32) {
        (
            self.translate_x.unwrap_or(0.0),
            self.translate_y.unwrap_or(0.0),
        )
    }

    /// Get the resolved rotation (defaults to 0.0 if not set)
    pub fn resolved_rotate(&self) -> f32 {
        self.rotate.unwrap_or(0.0)
    }
}

/// Helper to interpolate optional values
fn lerp_opt(a: Option<f32>, b: Option<f32>, t: f32) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + (b - a) * t),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// A keyframe with multiple animated properties
#[derive(Clone, Debug)]
pub struct PropertyKeyframe {
    /// Normalized position (0.0 to 1.0)
    pub offset: f32,
    /// Properties at this keyframe
    pub properties: KeyframeProperties,
    /// Easing applied when transitioning TO this keyframe
    pub easing: Easing,
}

impl PropertyKeyframe {
    pub fn new(offset: f32, properties: KeyframeProperties, easing: Easing) -> Self {
        Self {
            offset,
            properties,
            easing,
        }
    }
}

/// A fully resolved keyframe in a normalized plan
#[derive(Clone, Debug)]
pub struct NormalizedKeyframe {
    /// Normalized position (0.0 to 1.0)
    pub offset: f32,
    /// Eased property values at this offset
    pub properties: KeyframeProperties,
}

/// A multi-property keyframe animation description
///
/// Keyframes stay sorted by offset. Sampling uses the same bracket-and-ease
/// rule as single-value keyframe tracks, per property.
#[derive(Clone, Debug)]
pub struct KeyframeEffect {
    duration_ms: f32,
    keyframes: Vec<PropertyKeyframe>,
}

impl KeyframeEffect {
    pub fn new(duration_ms: f32) -> Result<Self> {
        if !(duration_ms > 0.0) {
            return Err(AnimationError::InvalidDuration(duration_ms));
        }
        Ok(Self {
            duration_ms,
            keyframes: Vec::new(),
        })
    }

    /// Add a keyframe (builder pattern); offsets must stay inside [0, 1]
    pub fn keyframe(
        mut self,
        offset: f32,
        properties: KeyframeProperties,
        easing: Easing,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(AnimationError::InvalidKeyframeOffset(offset));
        }
        self.keyframes
            .push(PropertyKeyframe::new(offset, properties, easing));
        self.keyframes
            .sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Ok(self)
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn keyframes(&self) -> &[PropertyKeyframe] {
        &self.keyframes
    }

    /// Sample the effect at a normalized progress (clamped to [0, 1])
    pub fn sample(&self, progress: f32) -> KeyframeProperties {
        if self.keyframes.is_empty() {
            return KeyframeProperties::default();
        }

        let progress = progress.clamp(0.0, 1.0);

        let mut prev_kf = &self.keyframes[0];
        let mut next_kf = &self.keyframes[0];

        for kf in &self.keyframes {
            if kf.offset <= progress {
                prev_kf = kf;
            }
            if kf.offset >= progress {
                next_kf = kf;
                break;
            }
        }

        if (prev_kf.offset - next_kf.offset).abs() < f32::EPSILON {
            return prev_kf.properties.clone();
        }

        let local = (progress - prev_kf.offset) / (next_kf.offset - prev_kf.offset);
        let eased = next_kf.easing.apply(local);

        prev_kf.properties.lerp(&next_kf.properties, eased)
    }

    /// Resolve the effect into a plain plan a native backend can play: the
    /// union of every keyframe offset, with fully eased property values at
    /// each offset and no easing left to apply.
    pub fn normalized_plan(&self) -> Vec<NormalizedKeyframe> {
        let mut offsets: Vec<f32> = self.keyframes.iter().map(|kf| kf.offset).collect();
        offsets.dedup_by(|a, b| (*a - *b).abs() < f32::EPSILON);

        offsets
            .into_iter()
            .map(|offset| NormalizedKeyframe {
                offset,
                properties: self.sample(offset),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_holds_one_sided_properties() {
        let a = KeyframeProperties::opacity(0.0);
        let b = KeyframeProperties::opacity(1.0).with_translate(100.0, 0.0);
        let mid = a.lerp(&b, 0.5);

        assert_eq!(mid.opacity, Some(0.5));
        // translate only exists on one side, so it holds that side's value
        assert_eq!(mid.translate_x, Some(100.0));
        assert_eq!(mid.rotate, None);
    }

    #[test]
    fn test_effect_rejects_bad_inputs() {
        assert!(KeyframeEffect::new(0.0).is_err());
        let effect = KeyframeEffect::new(300.0).unwrap();
        assert!(effect
            .keyframe(1.5, KeyframeProperties::opacity(1.0), Easing::Linear)
            .is_err());
    }

    #[test]
    fn test_keyframes_sorted_regardless_of_insertion_order() {
        let effect = KeyframeEffect::new(300.0)
            .unwrap()
            .keyframe(1.0, KeyframeProperties::opacity(1.0), Easing::Linear)
            .unwrap()
            .keyframe(0.0, KeyframeProperties::opacity(0.0), Easing::Linear)
            .unwrap()
            .keyframe(0.5, KeyframeProperties::opacity(0.2), Easing::Linear)
            .unwrap();

        let offsets: Vec<f32> = effect.keyframes().iter().map(|kf| kf.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_sample_brackets_and_eases() {
        let effect = KeyframeEffect::new(300.0)
            .unwrap()
            .keyframe(0.0, KeyframeProperties::opacity(0.0), Easing::Linear)
            .unwrap()
            .keyframe(0.5, KeyframeProperties::opacity(1.0), Easing::Linear)
            .unwrap()
            .keyframe(1.0, KeyframeProperties::opacity(0.5), Easing::Linear)
            .unwrap();

        assert_eq!(effect.sample(0.25).opacity, Some(0.5));
        assert_eq!(effect.sample(0.5).opacity, Some(1.0));
        assert_eq!(effect.sample(0.75).opacity, Some(0.75));
        // Out-of-range samples clamp
        assert_eq!(effect.sample(2.0).opacity, Some(0.5));
    }

    #[test]
    fn test_normalized_plan_resolves_easing() {
        let effect = KeyframeEffect::new(200.0)
            .unwrap()
            .keyframe(0.0, KeyframeProperties::scale(0.5), Easing::Linear)
            .unwrap()
            .keyframe(1.0, KeyframeProperties::scale(1.0), Easing::EaseOutCubic)
            .unwrap();

        let plan = effect.normalized_plan();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].offset, 0.0);
        assert_eq!(plan[0].properties.resolved_scale(), (0.5, 0.5));
        assert_eq!(plan[1].offset, 1.0);
        assert_eq!(plan[1].properties.resolved_scale(), (1.0, 1.0));
    }
}
