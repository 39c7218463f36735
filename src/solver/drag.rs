//! Decay of additional velocity.

use bevy::prelude::*;

use crate::config::DragConfig;
use crate::state::ExtraVelocity;

impl ExtraVelocity {
    /// Let opposing movement intent eat into residual horizontal momentum.
    pub(crate) fn counter(&mut self, config: &DragConfig, intent: Vec3, delta: f32) {
        let residual = self.additional.with_y(0.0);
        if residual == Vec3::ZERO || intent.dot(residual) >= 0.0 {
            return;
        }
        self.additional += intent.with_y(0.0) * config.counter_strength * delta;
    }

    /// Multiplicative drag, snapping to rest under `min_speed`.
    pub(crate) fn apply_drag(&mut self, config: &DragConfig, grounded: bool, delta: f32) {
        self.additional *= config.factor(grounded, delta);
        if self.additional.with_y(0.0).length() < config.min_speed {
            self.additional = Vec3::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn decays_faster_on_ground() {
        let config = DragConfig::default();
        let mut ground = ExtraVelocity {
            additional: Vec3::X * 10.0,
            ..Default::default()
        };
        let mut air = ground.clone();

        ground.apply_drag(&config, true, DT);
        air.apply_drag(&config, false, DT);
        assert!(ground.additional.x < air.additional.x);
        assert!(air.additional.x < 10.0);
    }

    #[test]
    fn snaps_to_zero_below_threshold() {
        let config = DragConfig::default();
        let mut extra = ExtraVelocity {
            additional: Vec3::new(config.min_speed * 0.5, 3.0, 0.0),
            ..Default::default()
        };
        extra.apply_drag(&config, false, DT);
        assert_eq!(extra.additional, Vec3::ZERO);
    }

    #[test]
    fn never_reverses_under_huge_delta() {
        let config = DragConfig::default();
        let mut extra = ExtraVelocity {
            additional: Vec3::X * 10.0,
            ..Default::default()
        };
        extra.apply_drag(&config, true, 10.0);
        assert_eq!(extra.additional, Vec3::ZERO);
    }

    #[test]
    fn opposing_intent_counters_momentum() {
        let config = DragConfig::default();
        let mut extra = ExtraVelocity {
            additional: Vec3::X * 10.0,
            ..Default::default()
        };

        extra.counter(&config, Vec3::NEG_X * 6.0, 0.5);
        assert!((extra.additional.x - 7.0).abs() < 1e-5);

        // Same direction leaves it alone
        extra.counter(&config, Vec3::X * 6.0, 0.5);
        assert!((extra.additional.x - 7.0).abs() < 1e-5);
    }
}
