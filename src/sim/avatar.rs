//! Player avatar and bounded movement

use serde::{Deserialize, Serialize};

use crate::Position;
use crate::config::SimConfig;

/// Held direction keys for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInput {
    pub left: bool,
    pub right: bool,
    /// Away from the camera (-z)
    pub forward: bool,
    /// Toward the camera (+z)
    pub back: bool,
}

impl MoveInput {
    pub fn is_idle(&self) -> bool {
        !(self.left || self.right || self.forward || self.back)
    }
}

/// The player's sphere
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub position: Position,
    pub radius: f32,
}

impl Avatar {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            position: config.avatar_start,
            radius: config.avatar_radius,
        }
    }

    /// Return to the start position
    pub fn reset(&mut self, config: &SimConfig) {
        self.position = config.avatar_start;
        self.radius = config.avatar_radius;
    }

    /// Move under held directions.
    ///
    /// Each direction is applied on its own and only if the resulting
    /// coordinate stays inside the bound for that axis. Opposing keys are
    /// not cancelled; each is checked against the position updated so far.
    pub fn apply_input(&mut self, dt: f32, input: &MoveInput, config: &SimConfig) {
        if input.is_idle() {
            return;
        }

        let step = config.avatar_speed * dt;
        let pos = &mut self.position;

        if input.right && pos.x + step <= config.lateral_bound {
            pos.x += step;
        }
        if input.left && pos.x - step >= -config.lateral_bound {
            pos.x -= step;
        }
        if input.forward && pos.z - step >= -config.forward_bound {
            pos.z -= step;
        }
        if input.back && pos.z + step <= config.backward_bound {
            pos.z += step;
        }

        debug_assert!(self.position.is_finite(), "avatar position became non-finite");
    }

    /// Whether the avatar sits inside its movement bounds
    pub fn in_bounds(&self, config: &SimConfig) -> bool {
        let p = self.position;
        p.x.abs() <= config.lateral_bound
            && p.z >= -config.forward_bound
            && p.z <= config.backward_bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use proptest::prelude::*;

    fn input(left: bool, right: bool, forward: bool, back: bool) -> MoveInput {
        MoveInput {
            left,
            right,
            forward,
            back,
        }
    }

    #[test]
    fn test_no_input_no_movement() {
        let config = SimConfig::default();
        let mut avatar = Avatar::new(&config);
        avatar.apply_input(0.5, &MoveInput::default(), &config);
        assert_eq!(avatar.position, config.avatar_start);
    }

    #[test]
    fn test_moves_by_speed_times_dt() {
        let config = SimConfig::default();
        let mut avatar = Avatar::new(&config);
        avatar.apply_input(0.5, &input(false, true, true, false), &config);
        assert!((avatar.position.x - 3.5).abs() < 1e-5);
        assert!((avatar.position.z - 6.5).abs() < 1e-5);
    }

    #[test]
    fn test_rejects_step_past_bound() {
        let config = SimConfig::default();
        let mut avatar = Avatar::new(&config);
        // Start sits on the backward bound, any back step would leave it
        avatar.apply_input(0.1, &input(false, false, false, true), &config);
        assert_eq!(avatar.position.z, config.backward_bound);

        avatar.position.x = 9.9;
        avatar.apply_input(0.1, &input(false, true, false, false), &config);
        assert!((avatar.position.x - 9.9).abs() < 1e-6);
    }

    #[test]
    fn test_opposing_directions_apply_independently() {
        let config = SimConfig::default();
        let mut avatar = Avatar::new(&config);
        avatar.position.x = 0.0;
        avatar.apply_input(0.2, &input(true, true, false, false), &config);
        assert!(avatar.position.x.abs() < 1e-6);

        // Right is blocked at the edge, left still applies
        avatar.position.x = 9.5;
        avatar.apply_input(0.2, &input(true, true, false, false), &config);
        assert!((avatar.position.x - 8.1).abs() < 1e-5);
    }

    #[test]
    fn test_reset_returns_to_start() {
        let config = SimConfig::default();
        let mut avatar = Avatar::new(&config);
        avatar.apply_input(1.0, &input(true, false, true, false), &config);
        assert_ne!(avatar.position, config.avatar_start);
        avatar.reset(&config);
        assert_eq!(avatar.position, config.avatar_start);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "non-finite")]
    fn test_nan_position_panics_in_debug() {
        let config = SimConfig::default();
        let mut avatar = Avatar::new(&config);
        avatar.position.x = f32::NAN;
        avatar.apply_input(0.1, &input(false, true, false, false), &config);
    }

    proptest! {
        #[test]
        fn prop_avatar_stays_in_bounds(
            steps in prop::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), 0.0f32..0.5),
                1..200,
            )
        ) {
            let config = SimConfig::default();
            let mut avatar = Avatar::new(&config);
            for (l, r, f, b, dt) in steps {
                avatar.apply_input(dt, &input(l, r, f, b), &config);
                prop_assert!(avatar.in_bounds(&config), "left bounds at {}", avatar.position);
            }
        }

        #[test]
        fn prop_idle_input_never_moves(x in -10.0f32..10.0, z in 0.0f32..10.0, dt in 0.0f32..1.0) {
            let config = SimConfig::default();
            let mut avatar = Avatar::new(&config);
            avatar.position = Vec3::new(x, 0.0, z);
            avatar.apply_input(dt, &MoveInput::default(), &config);
            prop_assert_eq!(avatar.position, Vec3::new(x, 0.0, z));
        }
    }
}
