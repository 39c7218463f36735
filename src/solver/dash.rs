//! Dash: buffered trigger, wall-aware direction and a linear position arc.

use bevy::prelude::*;

use crate::config::MotionConfig;
use crate::state::{tick_capped, DashState};

/// Rotation of the view: character yaw, then look pitch in degrees.
pub fn view_rotation(yaw: Quat, look_pitch: f32) -> Quat {
    yaw * Quat::from_rotation_x(look_pitch.to_radians())
}

/// Pick the dash direction.
///
/// Against a wall the view decides: looking along the wall normal dashes
/// forward, looking into the wall dashes back out along the view, and
/// anything in between kicks straight off the wall. Away from walls the raw
/// move input is aimed by the view, defaulting to forward.
pub fn resolve_dash_direction(
    yaw: Quat,
    look_pitch: f32,
    movement: Vec2,
    wall_normal: Option<Vec3>,
) -> Vec3 {
    let view = view_rotation(yaw, look_pitch);
    let forward = view * Vec3::NEG_Z;

    if let Some(normal) = wall_normal {
        let alignment = forward.dot(normal);
        return if alignment > 0.5 {
            forward
        } else if alignment < -0.5 {
            -forward
        } else {
            normal
        };
    }

    let local = Vec3::new(movement.x, 0.0, -movement.y).normalize_or_zero();
    if local == Vec3::ZERO {
        forward
    } else {
        view * local
    }
}

impl DashState {
    pub(crate) fn tick_timers(&mut self, config: &MotionConfig, pressed: bool, delta: f32) {
        if pressed {
            self.buffer_timer = 0.0;
        } else {
            tick_capped(&mut self.buffer_timer, delta, Self::buffer_expired(config));
        }
        self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
    }

    pub(crate) fn can_trigger(&self, config: &MotionConfig) -> bool {
        !self.dashing
            && self.can_dash
            && self.cooldown_timer <= 0.0
            && self.buffer_timer < config.dash.buffer
    }

    pub(crate) fn start(&mut self, config: &MotionConfig, position: Vec3, direction: Vec3) {
        self.dashing = true;
        self.can_dash = false;
        self.dash_timer = 0.0;
        self.start_position = position;
        self.direction = direction;
        self.cooldown_timer = config.dash.cooldown;
        self.buffer_timer = Self::buffer_expired(config);
    }

    /// Advance the dash. Returns the position for this tick and whether the
    /// dash has covered its full distance.
    pub(crate) fn advance(&mut self, config: &MotionConfig, delta: f32) -> (Vec3, bool) {
        self.dash_timer += delta;
        let t = (self.dash_timer / config.dash.duration).min(1.0);
        let target = self.start_position + self.direction * config.dash.distance * t;
        (target, self.dash_timer >= config.dash.duration)
    }

    /// Stop dashing and return the velocity to carry into movement.
    pub(crate) fn finish(&mut self, config: &MotionConfig) -> Vec3 {
        self.dashing = false;
        self.direction * config.dash.speed()
    }

    /// Re-arm once in contact with something and the dash wish is released.
    pub(crate) fn rearm(&mut self, in_contact: bool, wish_dashing: bool) {
        if (in_contact || self.dashing) && !wish_dashing {
            self.can_dash = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn no_wall_uses_move_input() {
        let direction = resolve_dash_direction(Quat::IDENTITY, 0.0, Vec2::X, None);
        assert!(approx(direction, Vec3::X));

        let direction = resolve_dash_direction(Quat::IDENTITY, 0.0, Vec2::new(0.0, -1.0), None);
        assert!(approx(direction, Vec3::Z));
    }

    #[test]
    fn no_input_dashes_forward_along_view() {
        let direction = resolve_dash_direction(Quat::IDENTITY, 0.0, Vec2::ZERO, None);
        assert!(approx(direction, Vec3::NEG_Z));

        let direction = resolve_dash_direction(Quat::IDENTITY, 90.0, Vec2::ZERO, None);
        assert!(approx(direction, Vec3::Y));
    }

    #[test]
    fn pitch_tilts_forward_input() {
        let direction = resolve_dash_direction(Quat::IDENTITY, 45.0, Vec2::Y, None);
        assert!(direction.y > 0.0);
        assert!(direction.z < 0.0);
        assert!((direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn wall_facing_rules() {
        // Yaw that turns view forward to +X
        let yaw = Quat::from_rotation_y(-FRAC_PI_2);

        let into_wall = resolve_dash_direction(yaw, 0.0, Vec2::ZERO, Some(Vec3::NEG_X));
        assert!(approx(into_wall, Vec3::NEG_X));

        let along_normal = resolve_dash_direction(yaw, 0.0, Vec2::ZERO, Some(Vec3::X));
        assert!(approx(along_normal, Vec3::X));

        let sideways = resolve_dash_direction(yaw, 0.0, Vec2::Y, Some(Vec3::Z));
        assert!(approx(sideways, Vec3::Z));
    }

    #[test]
    fn cooldown_blocks_trigger() {
        let config = MotionConfig::default();
        let mut dash = DashState::new(&config);
        dash.tick_timers(&config, true, 1.0 / 60.0);
        assert!(dash.can_trigger(&config));

        dash.start(&config, Vec3::ZERO, Vec3::X);
        dash.finish(&config);
        dash.can_dash = true;
        dash.tick_timers(&config, true, 1.0 / 60.0);
        assert!(dash.cooldown_timer > 0.0);
        assert!(!dash.can_trigger(&config));
    }

    #[test]
    fn advance_covers_distance_linearly() {
        let config = MotionConfig::default().with_dash(6.0, 0.2);
        let mut dash = DashState::new(&config);
        dash.start(&config, Vec3::new(1.0, 2.0, 3.0), Vec3::X);

        let (halfway, done) = dash.advance(&config, 0.1);
        assert!(!done);
        assert!(approx(halfway, Vec3::new(4.0, 2.0, 3.0)));

        let (end, done) = dash.advance(&config, 0.1);
        assert!(done);
        assert!(approx(end, Vec3::new(7.0, 2.0, 3.0)));

        let carried = dash.finish(&config);
        assert!(approx(carried, Vec3::X * 30.0));
    }

    #[test]
    fn rearm_needs_release_and_contact() {
        let config = MotionConfig::default();
        let mut dash = DashState::new(&config);
        dash.can_dash = false;

        dash.rearm(false, false);
        assert!(!dash.can_dash);
        dash.rearm(true, true);
        assert!(!dash.can_dash);
        dash.rearm(true, false);
        assert!(dash.can_dash);
    }
}
