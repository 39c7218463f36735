//! Host motor abstraction.
//!
//! The solver never moves anything itself. A host motor owns the capsule,
//! reports grounding, answers raycasts, applies position overrides and sweeps
//! the capsule along the velocity the solver returns.
//!
//! Two shapes of the same contract are provided:
//! - [`CharacterMotor`]: one object per character, used by [`MotionSolver`](crate::solver::MotionSolver).
//! - [`MotorBackend`]: static functions over a Bevy [`World`], used by
//!   [`MotionControllerPlugin`](crate::MotionControllerPlugin). [`WorldMotor`]
//!   adapts one into the other for a single entity.

use std::marker::PhantomData;

use bevy::prelude::*;

use crate::collision::{CapsuleDimensions, CollisionData, LayerMask};

/// Per-character host motor queries consumed by the solver.
pub trait CharacterMotor {
    /// Whether the capsule rests on walkable ground.
    fn is_ground_stable(&self) -> bool;

    /// Detach from the ground, optionally for a fixed time.
    fn force_airborne(&mut self, duration: Option<f32>);

    fn capsule_dimensions(&self) -> CapsuleDimensions;

    /// Layers that count as stable ground. Used to filter the solver's probes.
    fn stable_ground_layers(&self) -> LayerMask;

    /// Cast a ray and return the closest hit.
    ///
    /// A miss is `None`, never an error. The character's own collider must
    /// not be reported.
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<CollisionData>;

    /// Capsule base position.
    fn position(&self) -> Vec3;

    /// Look yaw of the character.
    fn rotation(&self) -> Quat;
}

/// Trait for Bevy physics backend implementations.
///
/// Implement this to drive [`MotionControllerPlugin`](crate::MotionControllerPlugin)
/// with a physics engine. The backend's own plugin is expected to sweep the
/// capsule in [`MotionSet::Motor`](crate::MotionSet::Motor) and report
/// contacts as [`MotorHit`](crate::MotorHit) events.
pub trait MotorBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    fn is_ground_stable(world: &World, entity: Entity) -> bool;

    fn force_airborne(world: &mut World, entity: Entity, duration: Option<f32>);

    fn capsule_dimensions(world: &World, entity: Entity) -> CapsuleDimensions;

    fn stable_ground_layers(_world: &World, _entity: Entity) -> LayerMask {
        LayerMask::ALL
    }

    /// Cast a ray, skipping `exclude_entity`.
    fn cast_ray(
        world: &World,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
        exclude_entity: Entity,
    ) -> Option<CollisionData>;

    /// Capsule base position.
    fn get_position(world: &World, entity: Entity) -> Vec3;

    /// Move the capsule directly, bypassing velocity integration.
    fn set_position(world: &mut World, entity: Entity, position: Vec3);

    /// Look yaw of an entity.
    fn get_rotation(world: &World, entity: Entity) -> Quat;

    fn get_velocity(world: &World, entity: Entity) -> Vec3;

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3);

    /// Get the fixed timestep delta time.
    ///
    /// Falls back to 60 Hz when the fixed clock has not advanced, e.g. when a
    /// test runs `FixedUpdate` by hand.
    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&d| d > 0.0)
            .unwrap_or(1.0 / 60.0)
    }
}

/// Empty plugin for backends that don't need additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}

/// A [`CharacterMotor`] view of one entity through a [`MotorBackend`].
pub struct WorldMotor<'w, B: MotorBackend> {
    world: &'w mut World,
    entity: Entity,
    _backend: PhantomData<B>,
}

impl<'w, B: MotorBackend> WorldMotor<'w, B> {
    pub fn new(world: &'w mut World, entity: Entity) -> Self {
        Self {
            world,
            entity,
            _backend: PhantomData,
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }
}

impl<B: MotorBackend> CharacterMotor for WorldMotor<'_, B> {
    fn is_ground_stable(&self) -> bool {
        B::is_ground_stable(self.world, self.entity)
    }

    fn force_airborne(&mut self, duration: Option<f32>) {
        B::force_airborne(self.world, self.entity, duration);
    }

    fn capsule_dimensions(&self) -> CapsuleDimensions {
        B::capsule_dimensions(self.world, self.entity)
    }

    fn stable_ground_layers(&self) -> LayerMask {
        B::stable_ground_layers(self.world, self.entity)
    }

    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<CollisionData> {
        B::cast_ray(
            self.world,
            origin,
            direction,
            max_distance,
            layers,
            self.entity,
        )
    }

    fn position(&self) -> Vec3 {
        B::get_position(self.world, self.entity)
    }

    fn rotation(&self) -> Quat {
        B::get_rotation(self.world, self.entity)
    }
}
