//! Physics query results and host shape data.

use bevy::prelude::*;

/// Information about a raycast hit or a sweep contact.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionData {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Normal of the surface at the hit point.
    pub normal: Vec3,
    /// World position of the hit point.
    pub point: Vec3,
    /// Entity that was hit, if the host knows it.
    pub entity: Option<Entity>,
}

impl CollisionData {
    /// Create a collision result.
    pub fn new(distance: f32, normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }

    /// The normal flattened onto the horizontal plane.
    pub fn planar_normal(&self) -> Vec3 {
        self.normal.with_y(0.0).normalize_or_zero()
    }
}

/// Capsule shape of the character, as reported by the host.
///
/// The character position is the capsule base.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct CapsuleDimensions {
    /// Total height, base to top.
    pub height: f32,
    pub radius: f32,
}

impl Default for CapsuleDimensions {
    fn default() -> Self {
        Self {
            height: 2.0,
            radius: 0.5,
        }
    }
}

impl CapsuleDimensions {
    pub fn new(height: f32, radius: f32) -> Self {
        Self { height, radius }
    }
}

/// Collision layer bitmask used to filter raycasts.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    /// Whether any of `layers` are in this mask.
    pub fn contains(self, layers: u32) -> bool {
        self.0 & layers != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}
