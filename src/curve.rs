//! Authored easing curves.
//!
//! Every curve maps a normalized time in `[0, 1]` to a value. The argument
//! is clamped before evaluation, so callers can pass `elapsed / duration`
//! without guarding it. Output is not clamped: keyframe curves and
//! [`Easing::BackOut`] may overshoot.

use bevy::math::curve::{Curve, EaseFunction};
use bevy::math::FloatExt;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Named easing shapes, backed by Bevy's [`EaseFunction`].
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    SineIn,
    SineOut,
    SineInOut,
    /// Ease out with a short overshoot past 1.
    BackOut,
}

impl Easing {
    fn function(self) -> EaseFunction {
        match self {
            Self::QuadraticIn => EaseFunction::QuadraticIn,
            Self::QuadraticOut => EaseFunction::QuadraticOut,
            Self::QuadraticInOut => EaseFunction::QuadraticInOut,
            Self::CubicIn => EaseFunction::CubicIn,
            Self::CubicOut => EaseFunction::CubicOut,
            Self::CubicInOut => EaseFunction::CubicInOut,
            Self::SineIn => EaseFunction::SineIn,
            Self::SineOut => EaseFunction::SineOut,
            Self::SineInOut => EaseFunction::SineInOut,
            Self::BackOut => EaseFunction::BackOut,
        }
    }
}

/// A single keyframe of a [`MotionCurve::Keyframes`] curve.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// A curve evaluated at normalized time.
#[derive(Reflect, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum MotionCurve {
    /// `f(t) = t`.
    #[default]
    Linear,
    /// The same value everywhere.
    Constant(f32),
    /// A named easing shape.
    Ease(Easing),
    /// Piecewise-linear keyframes, sorted by time. Held flat outside the
    /// first and last key.
    Keyframes(Vec<CurveKey>),
}

impl MotionCurve {
    /// Shorthand for [`MotionCurve::Ease`].
    pub fn ease(easing: Easing) -> Self {
        Self::Ease(easing)
    }

    /// Evaluate the curve. `t` is clamped to `[0, 1]`; NaN is treated as 0.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::Constant(value) => *value,
            Self::Ease(easing) => easing.function().sample_clamped(t),
            Self::Keyframes(keys) => sample_keys(keys, t),
        }
    }

    /// Check that the curve can be evaluated.
    pub(crate) fn check(&self) -> Result<(), &'static str> {
        match self {
            Self::Constant(value) if !value.is_finite() => Err("constant value is not finite"),
            Self::Keyframes(keys) => {
                if keys.is_empty() {
                    return Err("needs at least one keyframe");
                }
                if keys
                    .iter()
                    .any(|key| !key.time.is_finite() || !key.value.is_finite())
                {
                    return Err("keyframes must be finite");
                }
                if keys.windows(2).any(|pair| pair[1].time <= pair[0].time) {
                    return Err("keyframe times must be strictly increasing");
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn sample_keys(keys: &[CurveKey], t: f32) -> f32 {
    let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
        return 0.0;
    };
    if t <= first.time {
        return first.value;
    }
    if t >= last.time {
        return last.value;
    }
    keys.windows(2)
        .find(|pair| t <= pair[1].time)
        .map(|pair| {
            let span = pair[1].time - pair[0].time;
            let local = (t - pair[0].time) / span;
            pair[0].value.lerp(pair[1].value, local)
        })
        .unwrap_or(last.value)
}
