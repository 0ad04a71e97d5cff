//! Vertical Integrator
//!
//! Updates `vertical_velocity` from the ground transition, in priority
//! order:
//!
//! 1. Landing edge: snap to `-init_fall_speed` (overrides a same-step jump
//!    under the default [`LandingPolicy`]).
//! 2. Airborne: accelerate down by `gravity * dt`, then clamp at
//!    `-fall_speed_limit`. Upward speed is never clamped.
//! 3. Grounded without an edge: unchanged.
//!
//! `was_grounded_last_step` is overwritten with the new classification on
//! every call, so each edge fires exactly once.

use crate::game::config::{LandingPolicy, LocomotionConfig};
use crate::game::state::LocomotionState;

/// What the integrator did this step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VerticalTransition {
    /// Landing edge; velocity snapped
    Landed {
        /// Vertical velocity before the snap
        impact_velocity: f32,
        /// A jump from this step was discarded by the snap
        overrode_jump: bool,
    },
    /// Landing edge with a same-step jump kept (`KeepSameStepJump`)
    JumpKeptOnLanding,
    /// Airborne; gravity applied
    Airborne {
        /// First airborne step after being grounded
        left_ground: bool,
        /// Terminal fall speed reached
        clamped: bool,
    },
    /// Grounded, no edge
    Grounded,
}

impl VerticalTransition {
    /// True when the animation driver should clear the airborne flag.
    pub fn clears_airborne(&self) -> bool {
        matches!(self, Self::Landed { .. })
    }
}

/// Integrate vertical velocity for one step.
///
/// `jumped_this_step` is true when a jump impulse was applied by input
/// drained at the start of this step; it only matters for the landing
/// policy.
pub fn integrate_vertical(
    state: &mut LocomotionState,
    is_grounded: bool,
    dt: f32,
    config: &LocomotionConfig,
    jumped_this_step: bool,
) -> VerticalTransition {
    let was_grounded = state.was_grounded_last_step;
    state.is_grounded = is_grounded;

    let transition = if is_grounded && !was_grounded {
        if jumped_this_step && config.landing_policy == LandingPolicy::KeepSameStepJump {
            VerticalTransition::JumpKeptOnLanding
        } else {
            let impact_velocity = state.vertical_velocity;
            state.vertical_velocity = -config.init_fall_speed;
            VerticalTransition::Landed {
                impact_velocity,
                overrode_jump: jumped_this_step,
            }
        }
    } else if !is_grounded {
        state.vertical_velocity -= config.gravity * dt;

        let clamped = state.vertical_velocity < -config.fall_speed_limit;
        if clamped {
            state.vertical_velocity = -config.fall_speed_limit;
        }

        VerticalTransition::Airborne {
            left_ground: was_grounded,
            clamped,
        }
    } else {
        VerticalTransition::Grounded
    };

    state.was_grounded_last_step = is_grounded;
    transition
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn airborne_state(velocity: f32) -> LocomotionState {
        LocomotionState {
            vertical_velocity: velocity,
            ..Default::default()
        }
    }

    #[test]
    fn test_landing_snap_is_exact() {
        let config = LocomotionConfig { init_fall_speed: 2.0, ..Default::default() };
        for prior in [-10.0, -0.5, 0.0, 3.0, 123.0] {
            let mut state = airborne_state(prior);
            let t = integrate_vertical(&mut state, true, 0.02, &config, false);
            assert_eq!(state.vertical_velocity, -2.0);
            assert_eq!(t, VerticalTransition::Landed { impact_velocity: prior, overrode_jump: false });
            assert!(state.was_grounded_last_step);
        }
    }

    #[test]
    fn test_landing_edge_fires_once() {
        let config = LocomotionConfig::default();
        let mut state = airborne_state(-5.0);

        assert!(matches!(
            integrate_vertical(&mut state, true, 0.02, &config, false),
            VerticalTransition::Landed { .. }
        ));

        // Something else moves velocity while grounded; no second snap
        state.vertical_velocity = 5.0;
        assert_eq!(
            integrate_vertical(&mut state, true, 0.02, &config, false),
            VerticalTransition::Grounded
        );
        assert_eq!(state.vertical_velocity, 5.0);
    }

    #[test]
    fn test_airborne_gravity() {
        let config = LocomotionConfig { gravity: 15.0, ..Default::default() };
        let mut state = airborne_state(5.0);
        integrate_vertical(&mut state, false, 0.1, &config, false);
        assert!((state.vertical_velocity - 3.5).abs() < 1e-6);
    }

    #[test]
    fn test_upward_velocity_not_clamped() {
        let config = LocomotionConfig { fall_speed_limit: 10.0, ..Default::default() };
        let mut state = airborne_state(50.0);
        let t = integrate_vertical(&mut state, false, 0.02, &config, false);
        assert!(state.vertical_velocity > 49.0);
        assert_eq!(t, VerticalTransition::Airborne { left_ground: false, clamped: false });
    }

    #[test]
    fn test_fall_clamp_converges_exactly() {
        let config = LocomotionConfig {
            gravity: 15.0,
            fall_speed_limit: 10.0,
            ..Default::default()
        };
        let mut state = airborne_state(0.0);
        let mut clamped_once = false;
        for _ in 0..200 {
            let t = integrate_vertical(&mut state, false, 0.02, &config, false);
            assert!(state.vertical_velocity >= -10.0);
            if let VerticalTransition::Airborne { clamped: true, .. } = t {
                clamped_once = true;
            }
        }
        assert!(clamped_once);
        assert_eq!(state.vertical_velocity, -10.0);
    }

    #[test]
    fn test_unlimited_fall_speed() {
        let config = LocomotionConfig { fall_speed_limit: f32::INFINITY, ..Default::default() };
        let mut state = airborne_state(0.0);
        for _ in 0..1000 {
            integrate_vertical(&mut state, false, 0.02, &config, false);
        }
        assert!(state.vertical_velocity < -100.0);
    }

    #[test]
    fn test_left_ground_flag() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState {
            is_grounded: true,
            was_grounded_last_step: true,
            ..Default::default()
        };
        assert_eq!(
            integrate_vertical(&mut state, false, 0.02, &config, false),
            VerticalTransition::Airborne { left_ground: true, clamped: false }
        );
        assert_eq!(
            integrate_vertical(&mut state, false, 0.02, &config, false),
            VerticalTransition::Airborne { left_ground: false, clamped: false }
        );
    }

    #[test]
    fn test_same_step_jump_overridden_by_default() {
        let config = LocomotionConfig::default();
        let mut state = airborne_state(config.jump_force);
        let t = integrate_vertical(&mut state, true, 0.02, &config, true);
        assert_eq!(state.vertical_velocity, -config.init_fall_speed);
        assert_eq!(t, VerticalTransition::Landed { impact_velocity: config.jump_force, overrode_jump: true });
        assert!(t.clears_airborne());
    }

    #[test]
    fn test_same_step_jump_kept_when_configured() {
        let config = LocomotionConfig {
            landing_policy: LandingPolicy::KeepSameStepJump,
            ..Default::default()
        };
        let mut state = airborne_state(config.jump_force);
        let t = integrate_vertical(&mut state, true, 0.02, &config, true);
        assert_eq!(t, VerticalTransition::JumpKeptOnLanding);
        assert!(!t.clears_airborne());
        assert_eq!(state.vertical_velocity, config.jump_force);
        assert!(state.was_grounded_last_step);
    }

    proptest! {
        #[test]
        fn prop_fall_never_below_limit(
            start in -50.0f32..50.0,
            gravity in 0.0f32..100.0,
            limit in 0.0f32..40.0,
            dt in 0.001f32..0.1,
            steps in 1usize..300,
        ) {
            let config = LocomotionConfig { gravity, fall_speed_limit: limit, ..Default::default() };
            let mut state = airborne_state(start);
            for _ in 0..steps {
                integrate_vertical(&mut state, false, dt, &config, false);
                prop_assert!(state.vertical_velocity >= -limit);
            }
        }
    }
}
