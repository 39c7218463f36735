//! Horizontal intent blending.
//!
//! Every change of the raw move vector restarts the blend from the current
//! blended value, so direction changes never snap.

use bevy::prelude::*;

use crate::config::MovementConfig;
use crate::state::{tick_capped, HorizontalState};

/// Map a planar `(strafe, forward)` vector into world space under `yaw`.
///
/// Forward is `-Z`, right is `+X`.
pub fn planar_to_world(yaw: Quat, planar: Vec2) -> Vec3 {
    yaw * Vec3::new(planar.x, 0.0, -planar.y)
}

impl HorizontalState {
    /// Advance the blend by one tick and return the planar intent velocity.
    pub(crate) fn update(&mut self, config: &MovementConfig, movement: Vec2, delta: f32) -> Vec2 {
        if self.move_input.update(movement).changed() {
            self.from_move_input = self.target_move_input;
            self.elapsed_since_move_change = 0.0;
        }

        if movement != Vec2::ZERO {
            self.idle_time = 0.0;
            tick_capped(
                &mut self.movement_time,
                delta,
                config.acceleration_duration,
            );
            tick_capped(
                &mut self.elapsed_since_move_change,
                delta,
                config.smoothing_duration,
            );

            let blend = config
                .smoothing_curve
                .evaluate(self.elapsed_since_move_change / config.smoothing_duration);
            self.target_move_input = self
                .from_move_input
                .lerp(movement.normalize_or_zero(), blend);

            self.target_speed = config.speed
                * config
                    .acceleration_curve
                    .evaluate(self.movement_time / config.acceleration_duration);
        } else {
            self.movement_time = 0.0;
            tick_capped(&mut self.idle_time, delta, config.deceleration_duration);

            let blend = config
                .deceleration_curve
                .evaluate(self.idle_time / config.deceleration_duration);
            self.target_move_input = self.from_move_input.lerp(Vec2::ZERO, blend);
        }

        self.target_move_input * self.target_speed
    }
}
