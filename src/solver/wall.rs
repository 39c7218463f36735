//! Wall probe ring and wall slide.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::backend::CharacterMotor;
use crate::collision::CollisionData;
use crate::config::{MotionConfig, WallConfig};

use super::horizontal::planar_to_world;

/// Cast the horizontal probe ring and return the first hit.
///
/// Rays start at `probe_height` of the capsule and are spread evenly around
/// the character's yaw, starting at forward.
pub(crate) fn probe_walls<M: CharacterMotor + ?Sized>(
    config: &WallConfig,
    motor: &M,
    position: Vec3,
    yaw: Quat,
) -> Option<CollisionData> {
    let capsule = motor.capsule_dimensions();
    let origin = position + Vec3::Y * capsule.height * config.probe_height;
    let max_distance = config.ray_distance + capsule.radius;
    let layers = motor.stable_ground_layers();

    (0..config.ray_count).find_map(|index| {
        let angle = TAU * index as f32 / config.ray_count as f32;
        let direction = yaw * Quat::from_rotation_y(angle) * Vec3::NEG_Z;
        motor.cast_ray(origin, direction, max_distance, layers)
    })
}

/// Horizontal velocity while sliding: raw input, no blending.
pub(crate) fn slide_horizontal(config: &MotionConfig, yaw: Quat, movement: Vec2) -> Vec3 {
    planar_to_world(yaw, movement.normalize_or_zero()) * config.movement.speed
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::collision::{CapsuleDimensions, LayerMask};

    /// Records every ray and hits anything cast toward +X.
    struct RingMotor {
        rays: RefCell<Vec<(Vec3, Vec3, f32)>>,
    }

    impl CharacterMotor for RingMotor {
        fn is_ground_stable(&self) -> bool {
            false
        }

        fn force_airborne(&mut self, _duration: Option<f32>) {}

        fn capsule_dimensions(&self) -> CapsuleDimensions {
            CapsuleDimensions::new(2.0, 0.5)
        }

        fn stable_ground_layers(&self) -> LayerMask {
            LayerMask::ALL
        }

        fn cast_ray(
            &self,
            origin: Vec3,
            direction: Vec3,
            max_distance: f32,
            _layers: LayerMask,
        ) -> Option<CollisionData> {
            self.rays.borrow_mut().push((origin, direction, max_distance));
            (direction.x > 0.9).then(|| {
                CollisionData::new(0.6, Vec3::NEG_X, origin + direction * 0.6, None)
            })
        }

        fn position(&self) -> Vec3 {
            Vec3::ZERO
        }

        fn rotation(&self) -> Quat {
            Quat::IDENTITY
        }
    }

    #[test]
    fn ring_origin_and_reach() {
        let motor = RingMotor {
            rays: RefCell::new(Vec::new()),
        };
        let config = WallConfig {
            ray_count: 4,
            ray_distance: 0.3,
            probe_height: 0.75,
            ..Default::default()
        };

        let hit = probe_walls(&config, &motor, Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY);
        let hit = hit.expect("ray toward +X should hit");
        assert_eq!(hit.normal, Vec3::NEG_X);

        let rays = motor.rays.borrow();
        // Forward, left, back, right: the fourth ray hits and stops the ring
        assert_eq!(rays.len(), 4);
        for (origin, direction, max_distance) in rays.iter() {
            assert!((*origin - Vec3::new(1.0, 1.5, 0.0)).length() < 1e-5);
            assert!(direction.y.abs() < 1e-5);
            assert!((max_distance - 0.8).abs() < 1e-5);
        }
        assert!((rays[0].1 - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn first_hit_stops_the_ring() {
        let motor = RingMotor {
            rays: RefCell::new(Vec::new()),
        };
        let config = WallConfig {
            ray_count: 8,
            ..Default::default()
        };
        // Yaw so that the first ray already points at +X
        let yaw = Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2);

        assert!(probe_walls(&config, &motor, Vec3::ZERO, yaw).is_some());
        assert_eq!(motor.rays.borrow().len(), 1);
    }

    #[test]
    fn slide_uses_raw_direction() {
        let config = MotionConfig::default().with_speed(5.0);
        let velocity = slide_horizontal(&config, Quat::IDENTITY, Vec2::new(0.3, 0.0));
        assert!((velocity - Vec3::X * 5.0).length() < 1e-5);
    }
}
