//! Curve-driven jump, coyote time and jump buffering.
//!
//! The ascent does not integrate velocity. Each tick the height above the
//! jump anchor is read off the authored curve and applied as a position
//! override, so the arc is identical at any tick rate.

use bevy::math::FloatExt;
use bevy::prelude::*;

use crate::config::{JumpConfig, MotionConfig};
use crate::state::{tick_capped, JumpState};

/// Height above the anchor after `jump_timer` seconds of ascent.
pub fn jump_height_at(config: &JumpConfig, jump_timer: f32) -> f32 {
    config
        .height_curve
        .evaluate(jump_timer.min(config.duration) / config.duration)
        * config.height
}

/// Release falloff for a jump let go after `jump_timer` seconds.
///
/// Releasing right after takeoff samples the falloff curve at 1, releasing
/// at the apex samples it at 0.
pub fn release_falloff(config: &JumpConfig, jump_timer: f32) -> f32 {
    config
        .end_falloff_curve
        .evaluate(1.0 - jump_timer / config.duration)
}

impl JumpState {
    pub(crate) fn tick_timers(
        &mut self,
        config: &MotionConfig,
        pressed: bool,
        hold_coyote: bool,
        delta: f32,
    ) {
        if hold_coyote {
            self.coyote_timer = 0.0;
        } else {
            tick_capped(&mut self.coyote_timer, delta, config.jump.coyote_time);
        }

        if pressed {
            self.buffer_timer = 0.0;
        } else {
            tick_capped(&mut self.buffer_timer, delta, Self::buffer_expired(config));
        }
    }

    /// A buffered request inside the coyote window (or on stable ground).
    pub(crate) fn can_trigger(&self, config: &JumpConfig, grounded: bool) -> bool {
        let coyote = grounded || self.coyote_timer < config.coyote_time;
        coyote && self.buffer_timer <= config.buffer_time
    }

    pub(crate) fn start(&mut self, config: &MotionConfig, from_ground: bool) {
        self.jumping = true;
        self.ending_jump = false;
        self.jump_timer = 0.0;
        self.current_jump_height = 0.0;
        self.coyote_timer = config.jump.coyote_time;
        self.buffer_timer = Self::buffer_expired(config);
        self.jumping_from_ground = from_ground;
    }

    /// Stop the ascent and set up the release easing.
    pub(crate) fn release(&mut self, config: &JumpConfig) {
        self.jumping = false;

        let falloff = release_falloff(config, self.jump_timer);
        let projected = jump_height_at(config, self.jump_timer + config.end_duration);

        self.jump_end_falloff = falloff;
        self.release_height = self.current_jump_height;
        self.end_jump_height = self
            .current_jump_height
            .lerp(projected, config.end_multiplier * falloff);
        self.jump_end_timer = 0.0;

        if config.end_duration * falloff > 0.0 {
            self.ending_jump = true;
        } else {
            self.current_jump_height = 0.0;
        }
    }

    /// Advance the ascent or the release easing.
    ///
    /// Returns the height above the anchor to apply this tick, or `None`
    /// when neither is running.
    pub(crate) fn advance(&mut self, config: &JumpConfig, delta: f32) -> Option<f32> {
        if self.jumping {
            self.jump_timer += delta;
            self.current_jump_height = jump_height_at(config, self.jump_timer);
            let height = self.current_jump_height;

            if self.jump_timer >= config.duration {
                debug!("Jump reached apex at {height:.3}");
                self.jumping = false;
                self.current_jump_height = 0.0;
            }
            return Some(height);
        }

        if self.ending_jump {
            let span = config.end_duration * self.jump_end_falloff;
            self.jump_end_timer += delta;

            let t = (self.jump_end_timer / span).min(1.0);
            self.current_jump_height = self
                .release_height
                .lerp(self.end_jump_height, config.end_curve.evaluate(t));
            let height = self.current_jump_height;

            if self.jump_end_timer >= span {
                trace!("Jump release easing finished at {height:.3}");
                self.ending_jump = false;
                self.current_jump_height = 0.0;
            }
            return Some(height);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Easing, MotionCurve};

    fn config() -> MotionConfig {
        let mut config = MotionConfig::default();
        config.jump.height = 2.0;
        config.jump.duration = 0.4;
        config.jump.end_duration = 0.2;
        config.jump.end_multiplier = 1.0;
        config.jump.height_curve = MotionCurve::Linear;
        config.jump.end_falloff_curve = MotionCurve::Linear;
        config.jump.end_curve = MotionCurve::Linear;
        config
    }

    #[test]
    fn height_is_clamped_to_duration() {
        let config = config();
        assert_eq!(jump_height_at(&config.jump, 0.0), 0.0);
        assert!((jump_height_at(&config.jump, 0.2) - 1.0).abs() < 1e-5);
        assert_eq!(jump_height_at(&config.jump, 0.4), 2.0);
        assert_eq!(jump_height_at(&config.jump, 5.0), 2.0);
    }

    #[test]
    fn falloff_endpoints() {
        let mut config = config();
        config.jump.end_falloff_curve = MotionCurve::ease(Easing::QuadraticIn);
        let curve = config.jump.end_falloff_curve.clone();

        assert_eq!(release_falloff(&config.jump, 0.0), curve.evaluate(1.0));
        assert_eq!(
            release_falloff(&config.jump, config.jump.duration),
            curve.evaluate(0.0)
        );
    }

    #[test]
    fn buffer_resets_on_press_and_saturates() {
        let config = config();
        let mut jump = JumpState::new(&config);

        jump.tick_timers(&config, true, true, 0.1);
        assert_eq!(jump.buffer_timer, 0.0);
        assert_eq!(jump.coyote_timer, 0.0);

        for _ in 0..1000 {
            jump.tick_timers(&config, false, false, 0.1);
        }
        assert_eq!(jump.buffer_timer, JumpState::buffer_expired(&config));
        assert_eq!(jump.coyote_timer, config.jump.coyote_time);
    }

    #[test]
    fn trigger_consumes_buffer_and_coyote() {
        let config = config();
        let mut jump = JumpState::new(&config);
        jump.tick_timers(&config, true, true, 1.0 / 60.0);
        assert!(jump.can_trigger(&config.jump, true));

        jump.start(&config, true);
        assert!(jump.jumping);
        assert!(jump.jumping_from_ground);
        assert!(!jump.can_trigger(&config.jump, true));
        assert!(!jump.can_trigger(&config.jump, false));
    }

    #[test]
    fn ascent_ends_at_full_height() {
        let config = config();
        let mut jump = JumpState::new(&config);
        jump.start(&config, true);

        let mut last = 0.0;
        while jump.jumping {
            last = jump.advance(&config.jump, 0.05).unwrap();
        }
        assert_eq!(last, 2.0);
        assert!(!jump.ending_jump);
        assert_eq!(jump.advance(&config.jump, 0.05), None);
    }

    #[test]
    fn early_release_eases_toward_projection() {
        let config = config();
        let mut jump = JumpState::new(&config);
        jump.start(&config, true);
        // 0.1 s of ascent: height 0.5
        jump.advance(&config.jump, 0.1);

        jump.release(&config.jump);
        assert!(!jump.jumping);
        assert!(jump.ending_jump);
        assert!((jump.jump_end_falloff - 0.75).abs() < 1e-5);
        assert!((jump.release_height - 0.5).abs() < 1e-5);
        // Projected height at 0.3 s is 1.5, blended 75% of the way
        assert!((jump.end_jump_height - 1.25).abs() < 1e-5);

        let span = config.jump.end_duration * jump.jump_end_falloff;
        let mut height = 0.0;
        let mut elapsed = 0.0;
        while jump.ending_jump {
            height = jump.advance(&config.jump, 0.01).unwrap();
            elapsed += 0.01;
            assert!(!jump.jumping);
        }
        assert!((height - 1.25).abs() < 1e-4);
        assert!(elapsed >= span - 1e-4);
        assert_eq!(jump.current_jump_height, 0.0);
    }

    #[test]
    fn zero_falloff_skips_easing() {
        let mut config = config();
        config.jump.end_falloff_curve = MotionCurve::Constant(0.0);
        let mut jump = JumpState::new(&config);
        jump.start(&config, true);
        jump.advance(&config.jump, 0.1);

        jump.release(&config.jump);
        assert!(!jump.jumping);
        assert!(!jump.ending_jump);
    }
}
