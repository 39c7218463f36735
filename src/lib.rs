//! # `motion_controller`
//!
//! A kinematic player motion solver with a physics backend abstraction.
//!
//! This crate turns per-tick player intent into position overrides and
//! velocities for a host-driven kinematic capsule:
//! - Curve-driven jumps with coyote time, input buffering and a release easing
//! - Dashes aimed by the view, aware of wall contact
//! - Wall detection with wall slide and wall jump
//! - Ground slam
//! - Blended horizontal acceleration and deceleration
//! - Decaying additional velocity for impulses
//!
//! ## Architecture
//!
//! The solver never moves anything itself. Each fixed tick:
//! 1. **Pre-update** runs the state machine and may override position
//! 2. **Velocity update** composes the tick's velocity
//! 3. The host motor sweeps the capsule and reports contacts
//! 4. **After update** decays additional velocity
//!
//! Hosts outside the ECS use [`MotionSolver`](solver::MotionSolver) with a
//! [`CharacterMotor`](backend::CharacterMotor). Bevy hosts add
//! [`MotionControllerPlugin`] with a [`MotorBackend`](backend::MotorBackend).
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use motion_controller::prelude::*;
//!
//! let config = MotionConfig::default()
//!     .with_speed(9.0)
//!     .with_jump(2.5, 0.45);
//!
//! // Spawn these together with the backend's own components
//! let bundle = config.into_bundle().expect("valid motion config");
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod collision;
pub mod config;
pub mod curve;
pub mod edge;
pub mod error;
pub mod intent;
pub mod solver;
pub mod state;
pub mod systems;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::{CharacterMotor, MotorBackend, NoOpBackendPlugin, WorldMotor};
    pub use crate::collision::{CapsuleDimensions, CollisionData, LayerMask};
    pub use crate::config::{
        DashConfig, DragConfig, GroundSlamConfig, JumpConfig, MotionConfig, MovementConfig,
        WallConfig,
    };
    pub use crate::curve::{CurveKey, Easing, MotionCurve};
    pub use crate::error::ConfigError;
    pub use crate::intent::{InputSource, PlayerInputs};
    pub use crate::solver::{MotionSolver, PreUpdateOutcome};
    pub use crate::state::{Dashing, GroundSlamming, Jumping, MotionState, WallSliding};
    pub use crate::{HitKind, MotionControllerPlugin, MotionSet, MotorHit};
}

/// Ordered phases of one motion tick, chained in `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionSet {
    /// State machine and position overrides.
    PreUpdate,
    /// Velocity composition.
    VelocityUpdate,
    /// The backend sweeps capsules here and writes [`MotorHit`] events.
    Motor,
    /// Contacts are fed back into the solver.
    Collisions,
    /// Additional-velocity drag and marker sync.
    AfterUpdate,
}

/// Which sweep callback a contact belongs to.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// The capsule landed on or slid along stable ground.
    Ground,
    /// The capsule was blocked while moving.
    Movement,
}

/// A contact reported by the backend during its sweep.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MotorHit {
    pub entity: Entity,
    pub kind: HitKind,
    pub normal: Vec3,
    pub point: Vec3,
}

impl MotorHit {
    pub fn ground(entity: Entity, normal: Vec3, point: Vec3) -> Self {
        Self {
            entity,
            kind: HitKind::Ground,
            normal,
            point,
        }
    }

    pub fn movement(entity: Entity, normal: Vec3, point: Vec3) -> Self {
        Self {
            entity,
            kind: HitKind::Movement,
            normal,
            point,
        }
    }
}

/// Main plugin for the motion controller.
///
/// This plugin is generic over a backend `B` which owns the capsule and
/// answers the solver's queries.
///
/// # Type Parameters
/// - `B`: The motor backend implementation
///
/// # Examples
///
/// ```rust,ignore
/// use bevy::prelude::*;
/// use motion_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(MotionControllerPlugin::<MyBackend>::default())
///     .run();
/// ```
pub struct MotionControllerPlugin<B: backend::MotorBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::MotorBackend> Default for MotionControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::MotorBackend> Plugin for MotionControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::MotionConfig>();
        app.register_type::<state::MotionState>();
        app.register_type::<intent::PlayerInputs>();
        app.register_type::<state::Jumping>();
        app.register_type::<state::Dashing>();
        app.register_type::<state::GroundSlamming>();
        app.register_type::<state::WallSliding>();
        app.register_type::<HitKind>();

        app.add_event::<MotorHit>();

        // Add the backend plugin
        app.add_plugins(B::plugin());

        app.configure_sets(
            FixedUpdate,
            (
                MotionSet::PreUpdate,
                MotionSet::VelocityUpdate,
                MotionSet::Motor,
                MotionSet::Collisions,
                MotionSet::AfterUpdate,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::run_pre_update::<B>.in_set(MotionSet::PreUpdate),
                systems::run_velocity_update::<B>.in_set(MotionSet::VelocityUpdate),
                systems::apply_motor_hits.in_set(MotionSet::Collisions),
                (systems::run_after_update::<B>, systems::sync_state_markers)
                    .chain()
                    .in_set(MotionSet::AfterUpdate),
            ),
        );
    }
}
