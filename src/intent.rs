//! Player input snapshot.
//!
//! Inputs are levels sampled once per tick. Whatever produces them (keyboard,
//! gamepad, AI, a network relay) writes a fresh [`PlayerInputs`] each tick;
//! the solver derives presses and releases itself.

use bevy::prelude::*;

/// One tick's worth of player intent.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use motion_controller::prelude::*;
///
/// let mut inputs = PlayerInputs::new();
/// inputs.set_move(Vec2::new(0.0, 2.0));
/// assert_eq!(inputs.movement, Vec2::new(0.0, 1.0));
/// assert!(inputs.is_moving());
///
/// inputs.set_jumping(true);
/// assert!(inputs.wish_jumping);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct PlayerInputs {
    /// Raw axis input, each component in `[-1, 1]`.
    ///
    /// `x` is strafe (positive right), `y` is forward.
    pub movement: Vec2,
    pub wish_jumping: bool,
    pub wish_dashing: bool,
    pub wish_ground_slam: bool,
    /// Vertical look angle in degrees. Positive looks up.
    ///
    /// Only used to aim the dash.
    pub look_pitch: f32,
}

impl PlayerInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the move vector, clamping each component to `[-1, 1]`.
    pub fn set_move(&mut self, movement: Vec2) {
        self.movement = movement.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    pub fn set_jumping(&mut self, wish: bool) {
        self.wish_jumping = wish;
    }

    pub fn set_dashing(&mut self, wish: bool) {
        self.wish_dashing = wish;
    }

    pub fn set_ground_slam(&mut self, wish: bool) {
        self.wish_ground_slam = wish;
    }

    pub fn set_look_pitch(&mut self, degrees: f32) {
        self.look_pitch = degrees;
    }

    /// Builder: set the move vector.
    pub fn with_move(mut self, movement: Vec2) -> Self {
        self.set_move(movement);
        self
    }

    /// Builder: hold or release jump.
    pub fn with_jump(mut self, wish: bool) -> Self {
        self.wish_jumping = wish;
        self
    }

    /// Builder: hold or release dash.
    pub fn with_dash(mut self, wish: bool) -> Self {
        self.wish_dashing = wish;
        self
    }

    /// Builder: hold or release ground slam.
    pub fn with_ground_slam(mut self, wish: bool) -> Self {
        self.wish_ground_slam = wish;
        self
    }

    /// Builder: set look pitch in degrees.
    pub fn with_look_pitch(mut self, degrees: f32) -> Self {
        self.look_pitch = degrees;
        self
    }

    /// Whether there is any raw move input.
    pub fn is_moving(&self) -> bool {
        self.movement != Vec2::ZERO
    }

    /// Release every wish and zero the move vector. Pitch is kept.
    pub fn clear(&mut self) {
        *self = Self {
            look_pitch: self.look_pitch,
            ..Self::default()
        };
    }
}

/// Anything that can produce the current tick's inputs.
///
/// Called once at the start of every pre-update.
pub trait InputSource {
    fn current_inputs(&mut self) -> PlayerInputs;
}

impl InputSource for PlayerInputs {
    fn current_inputs(&mut self) -> PlayerInputs {
        *self
    }
}

impl<F: FnMut() -> PlayerInputs> InputSource for F {
    fn current_inputs(&mut self) -> PlayerInputs {
        self()
    }
}
