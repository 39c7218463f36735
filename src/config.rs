//! Motion configuration.
//!
//! The configuration is an immutable parameter block supplied once when a
//! character is built. It is grouped by sub-system and validated up front:
//! any duration the solver divides by must be positive, every value must be
//! finite, and keyframe curves must be well formed.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::curve::{Easing, MotionCurve};
use crate::error::ConfigError;
use crate::intent::PlayerInputs;
use crate::state::MotionState;

/// Configuration for horizontal intent blending.
#[derive(Reflect, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Base horizontal speed (units/second).
    pub speed: f32,

    /// Time to blend from the previous direction to a new one (seconds).
    pub smoothing_duration: f32,

    /// Easing of the direction blend.
    pub smoothing_curve: MotionCurve,

    /// Time to reach full speed from rest (seconds).
    pub acceleration_duration: f32,

    /// Speed multiplier over the acceleration phase.
    pub acceleration_curve: MotionCurve,

    /// Time to blend to rest once input stops (seconds).
    pub deceleration_duration: f32,

    /// Easing of the blend to rest.
    pub deceleration_curve: MotionCurve,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 8.0,
            smoothing_duration: 0.12,
            smoothing_curve: MotionCurve::ease(Easing::QuadraticOut),
            acceleration_duration: 0.15,
            acceleration_curve: MotionCurve::ease(Easing::QuadraticOut),
            deceleration_duration: 0.1,
            deceleration_curve: MotionCurve::ease(Easing::QuadraticOut),
        }
    }
}

/// Configuration for the curve-driven jump.
#[derive(Reflect, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Apex height of a full jump (units).
    pub height: f32,

    /// Time from takeoff to apex (seconds).
    pub duration: f32,

    /// Height over the ascent, as a fraction of `height`.
    pub height_curve: MotionCurve,

    /// Grace window after leaving stable ground (seconds).
    pub coyote_time: f32,

    /// How long a press stays eligible before it can fire (seconds).
    pub buffer_time: f32,

    /// Length of the release easing at full falloff (seconds).
    pub end_duration: f32,

    /// How far the release easing carries toward the projected height.
    pub end_multiplier: f32,

    /// Falloff factor, sampled at `1 - jump_timer / duration` on release.
    pub end_falloff_curve: MotionCurve,

    /// Easing from the release height to the end height.
    pub end_curve: MotionCurve,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            height: 2.2,
            duration: 0.4,
            height_curve: MotionCurve::ease(Easing::QuadraticOut),
            coyote_time: 0.1,
            buffer_time: 0.15,
            end_duration: 0.15,
            end_multiplier: 1.0,
            end_falloff_curve: MotionCurve::Linear,
            end_curve: MotionCurve::ease(Easing::SineOut),
        }
    }
}

/// Configuration for the dash.
#[derive(Reflect, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Distance covered by a full dash (units).
    pub distance: f32,

    /// Time to cover `distance` (seconds).
    pub duration: f32,

    /// Time from dash start until another dash may start (seconds).
    pub cooldown: f32,

    /// How long a press stays eligible (seconds, exclusive).
    pub buffer: f32,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            distance: 6.0,
            duration: 0.18,
            cooldown: 0.6,
            buffer: 0.1,
        }
    }
}

impl DashConfig {
    /// Speed of the dash while it runs.
    pub fn speed(&self) -> f32 {
        self.distance / self.duration
    }
}

/// Configuration for wall detection, wall slide and wall jump.
#[derive(Reflect, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    /// Number of horizontal rays in the probe ring.
    pub ray_count: u32,

    /// Probe reach beyond the capsule radius (units).
    pub ray_distance: f32,

    /// Probe height as a fraction of capsule height.
    pub probe_height: f32,

    /// Fixed downward speed while sliding (units/second).
    pub slide_speed: f32,

    /// Kick-off speed along the wall normal on a wall jump (units/second).
    pub jump_speed: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            ray_count: 8,
            ray_distance: 0.25,
            probe_height: 0.75,
            slide_speed: 2.5,
            jump_speed: 9.0,
        }
    }
}

/// Configuration for the ground slam.
#[derive(Reflect, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundSlamConfig {
    /// Slam speed per unit of distance to the ground.
    pub force: f32,

    /// Slam speed independent of distance.
    pub flat_force: f32,

    /// Blend between the distance-proportional (0) and flat (1) speed.
    pub flat_ratio: f32,

    /// Reach of the downward ground probe (units).
    pub probe_distance: f32,
}

impl Default for GroundSlamConfig {
    fn default() -> Self {
        Self {
            force: 4.0,
            flat_force: 40.0,
            flat_ratio: 0.5,
            probe_distance: 1000.0,
        }
    }
}

impl GroundSlamConfig {
    /// Vertical slam velocity for a given distance to the ground.
    pub fn slam_velocity(&self, distance_to_ground: f32) -> f32 {
        let proportional = -distance_to_ground * self.force;
        let flat = -self.flat_force;
        proportional + (flat - proportional) * self.flat_ratio
    }
}

/// Configuration for decay of additional velocity.
#[derive(Reflect, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Drag on stable ground (1/second).
    pub ground: f32,

    /// Drag in the air (1/second).
    pub air: f32,

    /// Horizontal speed under which additional velocity snaps to zero.
    pub min_speed: f32,

    /// How strongly opposing movement intent eats into additional velocity.
    pub counter_strength: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            ground: 8.0,
            air: 1.5,
            min_speed: 0.05,
            counter_strength: 1.0,
        }
    }
}

impl DragConfig {
    /// Multiplicative decay for one tick.
    pub fn factor(&self, grounded: bool, delta: f32) -> f32 {
        let drag = if grounded { self.ground } else { self.air };
        (1.0 - drag * delta).max(0.0)
    }
}

/// Full parameter block for one character's motion solver.
#[derive(Component, Reflect, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct MotionConfig {
    pub movement: MovementConfig,
    pub jump: JumpConfig,
    pub dash: DashConfig,
    pub wall: WallConfig,
    pub ground_slam: GroundSlamConfig,
    pub drag: DragConfig,
    /// Free-fall acceleration along world up (negative pulls down).
    pub gravity: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            movement: MovementConfig::default(),
            jump: JumpConfig::default(),
            dash: DashConfig::default(),
            wall: WallConfig::default(),
            ground_slam: GroundSlamConfig::default(),
            drag: DragConfig::default(),
            gravity: -30.0,
        }
    }
}

impl MotionConfig {
    /// Parse a RON document and validate it.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    /// Check every value the solver relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let movement = &self.movement;
        non_negative("movement.speed", movement.speed)?;
        positive("movement.smoothing_duration", movement.smoothing_duration)?;
        positive("movement.acceleration_duration", movement.acceleration_duration)?;
        positive("movement.deceleration_duration", movement.deceleration_duration)?;
        curve("movement.smoothing_curve", &movement.smoothing_curve)?;
        curve("movement.acceleration_curve", &movement.acceleration_curve)?;
        curve("movement.deceleration_curve", &movement.deceleration_curve)?;

        let jump = &self.jump;
        non_negative("jump.height", jump.height)?;
        positive("jump.duration", jump.duration)?;
        non_negative("jump.coyote_time", jump.coyote_time)?;
        non_negative("jump.buffer_time", jump.buffer_time)?;
        non_negative("jump.end_duration", jump.end_duration)?;
        non_negative("jump.end_multiplier", jump.end_multiplier)?;
        curve("jump.height_curve", &jump.height_curve)?;
        curve("jump.end_falloff_curve", &jump.end_falloff_curve)?;
        curve("jump.end_curve", &jump.end_curve)?;

        let dash = &self.dash;
        non_negative("dash.distance", dash.distance)?;
        positive("dash.duration", dash.duration)?;
        non_negative("dash.cooldown", dash.cooldown)?;
        // The buffer check is strict, so a zero buffer could never fire.
        positive("dash.buffer", dash.buffer)?;

        let wall = &self.wall;
        if wall.ray_count == 0 {
            return Err(ConfigError::NoWallRays);
        }
        non_negative("wall.ray_distance", wall.ray_distance)?;
        ratio("wall.probe_height", wall.probe_height)?;
        non_negative("wall.slide_speed", wall.slide_speed)?;
        non_negative("wall.jump_speed", wall.jump_speed)?;

        let slam = &self.ground_slam;
        non_negative("ground_slam.force", slam.force)?;
        non_negative("ground_slam.flat_force", slam.flat_force)?;
        ratio("ground_slam.flat_ratio", slam.flat_ratio)?;
        positive("ground_slam.probe_distance", slam.probe_distance)?;

        let drag = &self.drag;
        non_negative("drag.ground", drag.ground)?;
        non_negative("drag.air", drag.air)?;
        non_negative("drag.min_speed", drag.min_speed)?;
        non_negative("drag.counter_strength", drag.counter_strength)?;

        finite("gravity", self.gravity)
    }

    /// Validate and build the components for a solver-driven character.
    ///
    /// Spawn the result together with the backend's own components.
    pub fn into_bundle(self) -> Result<(MotionState, PlayerInputs, MotionConfig), ConfigError> {
        self.validate()?;
        Ok((MotionState::new(&self), PlayerInputs::default(), self))
    }

    /// Builder: set base horizontal speed.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.movement.speed = speed;
        self
    }

    /// Builder: set jump apex height and ascent duration.
    pub fn with_jump(mut self, height: f32, duration: f32) -> Self {
        self.jump.height = height;
        self.jump.duration = duration;
        self
    }

    /// Builder: set coyote time.
    pub fn with_coyote_time(mut self, time: f32) -> Self {
        self.jump.coyote_time = time;
        self
    }

    /// Builder: set jump buffer time.
    pub fn with_jump_buffer_time(mut self, time: f32) -> Self {
        self.jump.buffer_time = time;
        self
    }

    /// Builder: set dash distance and duration.
    pub fn with_dash(mut self, distance: f32, duration: f32) -> Self {
        self.dash.distance = distance;
        self.dash.duration = duration;
        self
    }

    /// Builder: set dash cooldown.
    pub fn with_dash_cooldown(mut self, cooldown: f32) -> Self {
        self.dash.cooldown = cooldown;
        self
    }

    /// Builder: set gravity.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveDuration { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn ratio(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}

fn curve(field: &'static str, curve: &MotionCurve) -> Result<(), ConfigError> {
    curve
        .check()
        .map_err(|reason| ConfigError::InvalidCurve { field, reason })
}
