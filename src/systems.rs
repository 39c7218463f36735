//! Bevy systems driving [`MotionState`] through a [`MotorBackend`].
//!
//! Each solver phase runs as an exclusive system: the state and config of
//! every character are copied out, the phase runs against a [`WorldMotor`]
//! for that entity, and the updated state is written back.

use bevy::prelude::*;

use crate::backend::{MotorBackend, WorldMotor};
use crate::config::MotionConfig;
use crate::intent::PlayerInputs;
use crate::state::{Dashing, GroundSlamming, Jumping, MotionState, WallSliding};
use crate::{HitKind, MotorHit};

type Character = (Entity, MotionConfig, MotionState);

fn collect_characters(world: &mut World) -> Vec<Character> {
    world
        .query::<(Entity, &MotionConfig, &MotionState)>()
        .iter(world)
        .map(|(e, config, state)| (e, config.clone(), state.clone()))
        .collect()
}

fn write_back(world: &mut World, entity: Entity, state: MotionState) {
    if let Some(mut current) = world.get_mut::<MotionState>(entity) {
        *current = state;
    }
}

/// Run the pre-update phase and apply position overrides.
pub fn run_pre_update<B: MotorBackend>(world: &mut World) {
    let dt = B::get_fixed_timestep(world);

    // Snapshot every character first; the motor needs the world mutably
    for (entity, config, mut state) in collect_characters(world) {
        // Characters without an input component stand still
        let inputs = world
            .get::<PlayerInputs>(entity)
            .copied()
            .unwrap_or_default();

        let outcome = {
            let mut motor = WorldMotor::<B>::new(world, entity);
            state.pre_update(&config, &mut motor, inputs, dt)
        };

        // Teleport before the backend sweeps
        if let Some(position) = outcome.override_position {
            B::set_position(world, entity, position);
        }
        write_back(world, entity, state);
    }
}

/// Run the velocity phase and hand the result to the backend.
pub fn run_velocity_update<B: MotorBackend>(world: &mut World) {
    let dt = B::get_fixed_timestep(world);

    for (entity, config, mut state) in collect_characters(world) {
        // Last tick's velocity seeds free fall when leaving the ground
        let current = B::get_velocity(world, entity);
        let velocity = {
            let motor = WorldMotor::<B>::new(world, entity);
            state.velocity_update(&config, &motor, dt, current)
        };

        // The backend integrates this in its sweep
        B::set_velocity(world, entity, velocity);
        write_back(world, entity, state);
    }
}

/// Feed contacts reported by the backend's sweep into the solver.
pub fn apply_motor_hits(mut hits: EventReader<MotorHit>, mut q_states: Query<&mut MotionState>) {
    for hit in hits.read() {
        // Hits for despawned or unmanaged entities are dropped
        let Ok(mut state) = q_states.get_mut(hit.entity) else {
            continue;
        };
        match hit.kind {
            HitKind::Ground => state.on_ground_hit(hit.normal, hit.point),
            HitKind::Movement => state.on_movement_hit(hit.normal, hit.point),
        }
    }
}

/// Decay additional velocity.
pub fn run_after_update<B: MotorBackend>(world: &mut World) {
    let dt = B::get_fixed_timestep(world);

    for (mut state, config) in world
        .query::<(&mut MotionState, &MotionConfig)>()
        .iter_mut(world)
    {
        state.after_update(config, dt);
    }
}

/// Mirror solver flags onto marker components.
pub fn sync_state_markers(
    mut commands: Commands,
    q_states: Query<(
        Entity,
        &MotionState,
        Has<Jumping>,
        Has<Dashing>,
        Has<GroundSlamming>,
        Option<&WallSliding>,
    )>,
) {
    for (entity, state, has_jumping, has_dashing, has_slamming, wall_sliding) in &q_states {
        // Jump marker covers the ascent and the release easing
        let jumping = state.jump.is_active();
        if jumping && !has_jumping {
            commands.entity(entity).insert(Jumping);
        } else if !jumping && has_jumping {
            commands.entity(entity).remove::<Jumping>();
        }

        if state.dash.dashing && !has_dashing {
            commands.entity(entity).insert(Dashing);
        } else if !state.dash.dashing && has_dashing {
            commands.entity(entity).remove::<Dashing>();
        }

        if state.ground_slam.slamming && !has_slamming {
            commands.entity(entity).insert(GroundSlamming);
        } else if !state.ground_slam.slamming && has_slamming {
            commands.entity(entity).remove::<GroundSlamming>();
        }

        // Re-insert when the wall normal changes
        let normal = state
            .wall
            .normal()
            .filter(|_| state.is_wall_sliding());
        match (normal, wall_sliding) {
            (Some(normal), Some(current)) if current.normal == normal => {}
            (Some(normal), _) => {
                commands.entity(entity).insert(WallSliding::new(normal));
            }
            (None, Some(_)) => {
                commands.entity(entity).remove::<WallSliding>();
            }
            (None, None) => {}
        }
    }
}
