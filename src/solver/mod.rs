//! The motion solver.
//!
//! A host drives each character through four ordered steps per tick:
//!
//! 1. [`MotionState::pre_update`]: input snapshot, edge detection, timers,
//!    wall probe, ground slam, dash and jump. Returns the position override
//!    for the tick, if any.
//! 2. [`MotionState::velocity_update`]: compose this tick's velocity.
//! 3. The host sweeps the capsule and reports contacts through
//!    [`MotionState::on_ground_hit`] and [`MotionState::on_movement_hit`].
//! 4. [`MotionState::after_update`]: decay additional velocity.
//!
//! When several motions are flagged at once, vertical motion follows a fixed
//! precedence: dash, then jump ascent or release easing, then ground slam,
//! then wall slide, then free fall.

mod dash;
mod drag;
mod ground_slam;
mod horizontal;
mod jump;
mod wall;

use bevy::prelude::*;

use crate::backend::CharacterMotor;
use crate::config::MotionConfig;
use crate::error::ConfigError;
use crate::intent::{InputSource, PlayerInputs};
use crate::state::{JumpState, MotionState};

pub use dash::{resolve_dash_direction, view_rotation};
pub use horizontal::planar_to_world;
pub use jump::{jump_height_at, release_falloff};

/// Result of a pre-update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PreUpdateOutcome {
    /// Where the host must place the capsule before its sweep, bypassing
    /// velocity integration for this tick.
    pub override_position: Option<Vec3>,
}

impl MotionState {
    /// Run the state machine for one tick.
    pub fn pre_update<M: CharacterMotor + ?Sized>(
        &mut self,
        config: &MotionConfig,
        motor: &mut M,
        inputs: PlayerInputs,
        delta: f32,
    ) -> PreUpdateOutcome {
        // Snapshot inputs and derive presses
        self.inputs = inputs;
        let jump_edge = self.jump.wish.update(inputs.wish_jumping);
        let dash_edge = self.dash.wish.update(inputs.wish_dashing);
        self.grounded = motor.is_ground_stable();

        let yaw = motor.rotation();
        let mut position = motor.position();
        let mut override_position = None;
        // Ground level the running jump is measured from
        let mut anchor_y = position.y - self.jump.current_jump_height;

        // Wall probe; first contact interrupts jump and dash
        self.update_walls(config, &*motor, position, yaw);

        // Coyote holds while supported by ground, a wall or a dash
        let hold_coyote = self.grounded || self.dash.dashing || self.wall.walled;
        self.jump
            .tick_timers(config, jump_edge.rising(), hold_coyote, delta);
        self.dash.tick_timers(config, dash_edge.rising(), delta);

        self.update_ground_slam(config, &*motor, position);

        // Dash start
        if self.dash.can_trigger(config) {
            let direction = resolve_dash_direction(
                yaw,
                inputs.look_pitch,
                inputs.movement,
                self.wall.normal(),
            );
            debug!("Dash started toward {direction:?}");
            self.dash.start(config, position, direction);
            self.jump.cancel();
            self.ground_slam.slamming = false;
        }

        if self.dash.dashing {
            // A jump press after the first dash tick cuts the dash short
            if jump_edge.rising() && self.dash.dash_timer > 0.0 {
                debug!("Dash cut short by jump");
                self.finish_dash(config);
            } else {
                let (target, finished) = self.dash.advance(config, delta);
                position = target;
                override_position = Some(target);

                self.jump.coyote_timer = 0.0;
                self.jump.cancel();
                self.ground_slam.slamming = false;

                if finished {
                    debug!("Dash finished at {target:?}");
                    self.finish_dash(config);
                }
            }
        }

        // Jump start, including coyote and wall jumps
        if !self.dash.dashing && self.jump.can_trigger(&config.jump, self.grounded) {
            let from_ground = self.grounded;
            motor.force_airborne(None);
            self.grounded = false;

            self.jump.start(config, from_ground);
            self.ground_slam.slamming = false;
            anchor_y = position.y;

            if let Some(normal) = self.wall.normal() {
                debug!("Wall jump off {normal:?}");
                self.extra.additional += normal * config.wall.jump_speed;
            } else {
                debug!("Jump started, from ground: {from_ground}");
            }
        }

        // Early release switches to the release easing
        if self.jump.jumping && !inputs.wish_jumping {
            self.jump.release(&config.jump);
            debug!(
                "Jump released at {:.3}, easing to {:.3}",
                self.jump.release_height, self.jump.end_jump_height
            );
        }

        // Ascent or release easing drives the height directly
        if let Some(height) = self.jump.advance(&config.jump, delta) {
            position.y = anchor_y + height;
            override_position = Some(position);
        }

        self.dash
            .rearm(self.grounded || self.wall.walled, inputs.wish_dashing);

        trace!(
            "pre_update: grounded={} walled={} jumping={} ending={} dashing={} slamming={}",
            self.grounded,
            self.wall.walled,
            self.jump.jumping,
            self.jump.ending_jump,
            self.dash.dashing,
            self.ground_slam.slamming
        );

        PreUpdateOutcome { override_position }
    }

    /// Compose this tick's linear velocity.
    pub fn velocity_update<M: CharacterMotor + ?Sized>(
        &mut self,
        config: &MotionConfig,
        motor: &M,
        delta: f32,
        current_velocity: Vec3,
    ) -> Vec3 {
        self.grounded = motor.is_ground_stable();
        let left_ground = self.ground.update(self.grounded).falling();
        let yaw = motor.rotation();

        // Blended intent; opposing intent eats into additional velocity
        let planar = self
            .horizontal
            .update(&config.movement, self.inputs.movement, delta);
        let mut horizontal = planar_to_world(yaw, planar);
        self.extra.counter(&config.drag, horizontal, delta);

        // The dash moves by position override only
        if self.dash.dashing {
            return Vec3::ZERO;
        }

        if self.ground_slam.slamming && self.grounded {
            debug!("Ground slam landed");
            self.ground_slam.slamming = false;
        }

        // Vertical precedence: jump, slam, wall slide, ground, free fall
        let vertical = if self.jump.is_active() {
            self.extra.vertical_fall_speed = 0.0;
            0.0
        } else if self.ground_slam.slamming {
            self.ground_slam.slam_speed
        } else if self.wall.walled && !self.grounded {
            horizontal = wall::slide_horizontal(config, yaw, self.inputs.movement);
            self.extra.vertical_fall_speed = -config.wall.slide_speed;
            -config.wall.slide_speed
        } else if self.grounded {
            self.extra.vertical_fall_speed = 0.0;
            0.0
        } else {
            if left_ground {
                self.extra.vertical_fall_speed = current_velocity.y.min(0.0);
            }
            self.extra.vertical_fall_speed += config.gravity * delta;
            self.extra.vertical_fall_speed
        };

        horizontal + Vec3::Y * vertical + self.extra.additional
    }

    /// The host's sweep touched stable ground.
    pub fn on_ground_hit(&mut self, normal: Vec3, point: Vec3) {
        trace!("Ground hit at {point:?}, normal {normal:?}");
        if !self.jump.is_active() {
            self.extra.vertical_fall_speed = 0.0;
        }
    }

    /// The host's sweep was blocked while moving.
    pub fn on_movement_hit(&mut self, normal: Vec3, point: Vec3) {
        if normal.y < 0.0 && self.jump.is_active() {
            debug!("Jump blocked by ceiling at {point:?}");
            self.jump.cancel();
        }
        if self.dash.dashing && normal.dot(self.dash.direction) < -0.9 {
            debug!("Dash blocked at {point:?}");
            self.dash.dashing = false;
        }
    }

    /// Decay additional velocity.
    pub fn after_update(&mut self, config: &MotionConfig, delta: f32) {
        self.extra.apply_drag(&config.drag, self.grounded, delta);
    }

    fn update_walls<M: CharacterMotor + ?Sized>(
        &mut self,
        config: &MotionConfig,
        motor: &M,
        position: Vec3,
        yaw: Quat,
    ) {
        let liftoff = self.jump.jumping && self.jump.jumping_from_ground;
        let eligible = !self.grounded && !self.ground_slam.slamming && !liftoff;

        let hit = if eligible {
            wall::probe_walls(&config.wall, motor, position, yaw)
        } else {
            None
        };
        self.wall.walled = hit.is_some();
        self.wall.hit = hit;

        if self.wall.edge.update(self.wall.walled).rising() {
            debug!("Wall contact, normal {:?}", self.wall.normal());
            self.jump.cancel();
            self.dash.dashing = false;
        }
    }

    fn update_ground_slam<M: CharacterMotor + ?Sized>(
        &mut self,
        config: &MotionConfig,
        motor: &M,
        position: Vec3,
    ) {
        let wish = self.inputs.wish_ground_slam;
        self.ground_slam.rearm(wish);
        if !self.ground_slam.can_trigger(wish, self.grounded) {
            return;
        }

        let Some(distance) = ground_slam::probe_ground(&config.ground_slam, motor, position)
        else {
            return;
        };

        let speed = config.ground_slam.slam_velocity(distance);
        debug!("Ground slam from {distance:.2} above ground at {speed:.2}");
        self.ground_slam.start(speed);
        self.jump.cancel();
        self.jump.buffer_timer = JumpState::buffer_expired(config);
        self.dash.dashing = false;
    }

    fn finish_dash(&mut self, config: &MotionConfig) {
        self.extra.additional += self.dash.finish(config);
    }
}

/// A character's solver for hosts outside the ECS.
///
/// Owns a validated configuration and the state it drives.
///
/// # Example
///
/// ```rust,ignore
/// let mut solver = MotionSolver::new(MotionConfig::default())?;
///
/// // Every fixed tick:
/// let outcome = solver.pre_update(&mut motor, &mut inputs, dt);
/// if let Some(position) = outcome.override_position {
///     motor.teleport(position);
/// }
/// let velocity = solver.velocity_update(&motor, dt, motor.velocity());
/// motor.sweep(velocity, &mut solver);
/// solver.after_update(dt);
/// ```
#[derive(Debug, Clone)]
pub struct MotionSolver {
    config: MotionConfig,
    state: MotionState,
}

impl MotionSolver {
    /// Validate `config` and build a fresh solver.
    pub fn new(config: MotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = MotionState::new(&config);
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Pull this tick's inputs and run the state machine.
    pub fn pre_update<M, I>(&mut self, motor: &mut M, input: &mut I, delta: f32) -> PreUpdateOutcome
    where
        M: CharacterMotor + ?Sized,
        I: InputSource + ?Sized,
    {
        let inputs = input.current_inputs();
        self.state.pre_update(&self.config, motor, inputs, delta)
    }

    pub fn velocity_update<M: CharacterMotor + ?Sized>(
        &mut self,
        motor: &M,
        delta: f32,
        current_velocity: Vec3,
    ) -> Vec3 {
        self.state
            .velocity_update(&self.config, motor, delta, current_velocity)
    }

    pub fn on_ground_hit(&mut self, normal: Vec3, point: Vec3) {
        self.state.on_ground_hit(normal, point);
    }

    pub fn on_movement_hit(&mut self, normal: Vec3, point: Vec3) {
        self.state.on_movement_hit(normal, point);
    }

    pub fn after_update(&mut self, delta: f32) {
        self.state.after_update(&self.config, delta);
    }
}
