//! Per-character motion state and state marker components.
//!
//! [`MotionState`] is the single mutable state bag a character owns. It is
//! split by sub-system; the transitions that read and write each part live
//! in [`crate::solver`]. Marker components mirror the interesting flags so
//! game code can query them without reaching into the state.

use bevy::prelude::*;

use crate::collision::CollisionData;
use crate::config::MotionConfig;
use crate::edge::EdgeDetector;
use crate::intent::PlayerInputs;

/// Headroom past a buffer window at which its timer stops counting.
///
/// Buffered requests stay ineligible once past the window, so counting
/// further only grows the float.
pub const TIMER_SATURATION: f32 = 1.0;

/// Advance `timer` by `delta`, never past `cap`.
pub(crate) fn tick_capped(timer: &mut f32, delta: f32, cap: f32) {
    *timer = (*timer + delta).min(cap);
}

/// Horizontal intent blend.
///
/// Reads: `inputs.movement`. Writes: every field.
#[derive(Reflect, Debug, Clone, Default, PartialEq)]
pub struct HorizontalState {
    /// Raw move input seen last tick.
    pub move_input: EdgeDetector<Vec2>,
    /// Blended direction when the raw input last changed.
    pub from_move_input: Vec2,
    /// Current blended direction.
    pub target_move_input: Vec2,
    pub elapsed_since_move_change: f32,
    pub movement_time: f32,
    pub idle_time: f32,
    pub target_speed: f32,
}

/// Jump, coyote time and jump buffering.
#[derive(Reflect, Debug, Clone, PartialEq)]
pub struct JumpState {
    pub jumping: bool,
    pub ending_jump: bool,
    pub jump_timer: f32,
    /// Height above the ascent anchor applied last tick.
    pub current_jump_height: f32,
    pub jump_end_timer: f32,
    /// Height at the moment the jump was released.
    pub release_height: f32,
    pub end_jump_height: f32,
    pub jump_end_falloff: f32,
    pub coyote_timer: f32,
    pub buffer_timer: f32,
    pub wish: EdgeDetector<bool>,
    /// Whether the running jump started on stable ground.
    pub jumping_from_ground: bool,
}

impl JumpState {
    pub(crate) fn new(config: &MotionConfig) -> Self {
        Self {
            jumping: false,
            ending_jump: false,
            jump_timer: 0.0,
            current_jump_height: 0.0,
            jump_end_timer: 0.0,
            release_height: 0.0,
            end_jump_height: 0.0,
            jump_end_falloff: 0.0,
            coyote_timer: config.jump.coyote_time,
            buffer_timer: Self::buffer_expired(config),
            wish: EdgeDetector::new(false),
            jumping_from_ground: false,
        }
    }

    /// Value of an expired jump buffer.
    pub fn buffer_expired(config: &MotionConfig) -> f32 {
        config.jump.buffer_time + TIMER_SATURATION
    }

    /// Whether the ascent or the release easing drives vertical position.
    pub fn is_active(&self) -> bool {
        self.jumping || self.ending_jump
    }

    /// Stop both the ascent and the release easing.
    pub fn cancel(&mut self) {
        self.jumping = false;
        self.ending_jump = false;
        self.current_jump_height = 0.0;
    }
}

/// Dash.
#[derive(Reflect, Debug, Clone, PartialEq)]
pub struct DashState {
    pub dashing: bool,
    pub can_dash: bool,
    pub dash_timer: f32,
    pub start_position: Vec3,
    pub direction: Vec3,
    /// Counts down from the configured cooldown to zero.
    pub cooldown_timer: f32,
    pub buffer_timer: f32,
    pub wish: EdgeDetector<bool>,
}

impl DashState {
    pub(crate) fn new(config: &MotionConfig) -> Self {
        Self {
            dashing: false,
            can_dash: true,
            dash_timer: 0.0,
            start_position: Vec3::ZERO,
            direction: Vec3::ZERO,
            cooldown_timer: 0.0,
            buffer_timer: Self::buffer_expired(config),
            wish: EdgeDetector::new(false),
        }
    }

    /// Value of an expired dash buffer.
    pub fn buffer_expired(config: &MotionConfig) -> f32 {
        config.dash.buffer + TIMER_SATURATION
    }
}

/// Ground slam.
#[derive(Reflect, Debug, Clone, PartialEq)]
pub struct GroundSlamState {
    pub slamming: bool,
    /// One-shot latch, re-armed when the slam wish is released.
    pub can_slam: bool,
    /// Vertical velocity applied while slamming.
    pub slam_speed: f32,
}

impl Default for GroundSlamState {
    fn default() -> Self {
        Self {
            slamming: false,
            can_slam: true,
            slam_speed: 0.0,
        }
    }
}

/// Wall contact from the horizontal probe ring.
#[derive(Reflect, Debug, Clone, Default, PartialEq)]
pub struct WallState {
    pub walled: bool,
    /// First hit of the probe ring this tick.
    pub hit: Option<CollisionData>,
    pub edge: EdgeDetector<bool>,
}

impl WallState {
    /// Horizontal wall normal, if touching a wall.
    pub fn normal(&self) -> Option<Vec3> {
        self.hit
            .filter(|_| self.walled)
            .map(|hit| hit.planar_normal())
            .filter(|normal| *normal != Vec3::ZERO)
    }
}

/// Velocity layered on top of intentional movement.
#[derive(Reflect, Debug, Clone, Default, PartialEq)]
pub struct ExtraVelocity {
    /// Impulses from dash release and wall jumps, decayed by drag.
    pub additional: Vec3,
    /// Free-fall accumulator, reset on ground contact.
    pub vertical_fall_speed: f32,
}

/// All movement state for one character.
///
/// Created once when the character is built and mutated only by the
/// solver's per-tick callbacks.
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
pub struct MotionState {
    pub horizontal: HorizontalState,
    pub jump: JumpState,
    pub dash: DashState,
    pub ground_slam: GroundSlamState,
    pub wall: WallState,
    pub extra: ExtraVelocity,
    /// Stable-ground status as last reported by the motor.
    pub grounded: bool,
    /// Stable-ground status seen by the previous velocity update.
    pub ground: EdgeDetector<bool>,
    /// Inputs captured by the last pre-update.
    pub inputs: PlayerInputs,
}

impl MotionState {
    /// Fresh state with every buffer expired and no motion in progress.
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            horizontal: HorizontalState::default(),
            jump: JumpState::new(config),
            dash: DashState::new(config),
            ground_slam: GroundSlamState::default(),
            wall: WallState::default(),
            extra: ExtraVelocity::default(),
            grounded: false,
            ground: EdgeDetector::new(false),
            inputs: PlayerInputs::default(),
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.jumping
    }

    pub fn is_ending_jump(&self) -> bool {
        self.jump.ending_jump
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.dashing
    }

    pub fn is_ground_slamming(&self) -> bool {
        self.ground_slam.slamming
    }

    pub fn is_walled(&self) -> bool {
        self.wall.walled
    }

    /// Wall sliding is being walled while no higher-precedence motion runs.
    pub fn is_wall_sliding(&self) -> bool {
        self.wall.walled
            && !self.grounded
            && !self.dash.dashing
            && !self.jump.is_active()
            && !self.ground_slam.slamming
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::new(&MotionConfig::default())
    }
}

/// Marker: the jump ascent or its release easing is running.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Jumping;

/// Marker: a dash is running.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Dashing;

/// Marker: a ground slam is running.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct GroundSlamming;

/// Marker: sliding down a wall.
///
/// Contains the horizontal normal of the wall.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct WallSliding {
    pub normal: Vec3,
}

impl Default for WallSliding {
    fn default() -> Self {
        Self { normal: Vec3::X }
    }
}

impl WallSliding {
    pub fn new(normal: Vec3) -> Self {
        Self { normal }
    }
}
