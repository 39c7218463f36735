//! Configuration errors.
//!
//! The solver has no per-tick error channel. Anything that would feed a
//! zero or negative divisor, a NaN, or a malformed curve into the tick path
//! is rejected here when the configuration is built or loaded.

use thiserror::Error;

/// Why a [`MotionConfig`](crate::config::MotionConfig) was rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A duration used as a divisor is zero or negative.
    #[error("`{field}` must be a positive duration, got {value}")]
    NonPositiveDuration { field: &'static str, value: f32 },

    /// A timing or magnitude that may be zero is negative.
    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    /// NaN or infinity.
    #[error("`{field}` must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    /// A ratio outside its allowed interval.
    #[error("`{field}` must lie within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    /// A keyframe curve that cannot be evaluated.
    #[error("curve `{field}` is invalid: {reason}")]
    InvalidCurve {
        field: &'static str,
        reason: &'static str,
    },

    /// The wall probe ring has no rays.
    #[error("wall probe needs at least one ray")]
    NoWallRays,

    /// The configuration file could not be read.
    #[error("failed to read motion config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The configuration file is not valid RON for [`MotionConfig`](crate::config::MotionConfig).
    #[error("failed to parse motion config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = ConfigError::NonPositiveDuration {
            field: "jump.duration",
            value: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "`jump.duration` must be a positive duration, got 0"
        );

        let err = ConfigError::OutOfRange {
            field: "ground_slam.flat_ratio",
            value: 1.5,
            min: 0.0,
            max: 1.0,
        };
        assert!(err.to_string().contains("ground_slam.flat_ratio"));
    }
}
