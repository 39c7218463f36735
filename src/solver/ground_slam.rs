//! Ground slam trigger and probe.

use bevy::prelude::*;

use crate::backend::CharacterMotor;
use crate::config::GroundSlamConfig;
use crate::state::GroundSlamState;

/// Distance from the capsule base down to stable ground, if any is in reach.
///
/// The ray starts one radius above the base so it cannot begin inside the
/// ground the capsule is resting on.
pub(crate) fn probe_ground<M: CharacterMotor + ?Sized>(
    config: &GroundSlamConfig,
    motor: &M,
    position: Vec3,
) -> Option<f32> {
    let lift = motor.capsule_dimensions().radius;
    let origin = position + Vec3::Y * lift;
    motor
        .cast_ray(
            origin,
            Vec3::NEG_Y,
            config.probe_distance + lift,
            motor.stable_ground_layers(),
        )
        .map(|hit| (hit.distance - lift).max(0.0))
}

impl GroundSlamState {
    /// Re-arm the latch once the wish is released.
    pub(crate) fn rearm(&mut self, wish: bool) {
        if !wish {
            self.can_slam = true;
        }
    }

    pub(crate) fn can_trigger(&self, wish: bool, grounded: bool) -> bool {
        wish && self.can_slam && !grounded && !self.slamming
    }

    pub(crate) fn start(&mut self, slam_speed: f32) {
        self.slamming = true;
        self.can_slam = false;
        self.slam_speed = slam_speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_needs_release() {
        let mut slam = GroundSlamState::default();
        assert!(slam.can_trigger(true, false));

        slam.start(-20.0);
        assert!(!slam.can_trigger(true, false));

        slam.slamming = false;
        slam.rearm(true);
        assert!(!slam.can_trigger(true, false));

        slam.rearm(false);
        assert!(slam.can_trigger(true, false));
    }

    #[test]
    fn never_triggers_on_ground() {
        let slam = GroundSlamState::default();
        assert!(!slam.can_trigger(true, true));
        assert!(!slam.can_trigger(false, false));
    }
}
