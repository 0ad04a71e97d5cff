//! Locomotion State
//!
//! Everything the controller carries from one step to the next. Owned by
//! exactly one controller; nothing else writes to it.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::core::vec3::Vec3;
use crate::core::hash::{StateHash, compute_state_hash};

// =============================================================================
// ACTOR PHASE
// =============================================================================

/// Lifecycle phase of an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActorPhase {
    /// Built, not yet spawned
    #[default]
    Unspawned,
    /// Spawned and stepping
    Active,
    /// Despawned; terminal
    Despawned,
}

// =============================================================================
// LOCOMOTION STATE
// =============================================================================

/// Per-actor locomotion state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocomotionState {
    /// Last reported move axes
    pub move_input: Vec2,
    /// Signed vertical speed, up is positive
    pub vertical_velocity: f32,
    /// Angular smoother state (degrees per second)
    pub turn_velocity: f32,
    /// Ground classification for the current step
    pub is_grounded: bool,
    /// Ground classification of the previous step
    pub was_grounded_last_step: bool,
    /// Facing yaw in degrees, kept in `[0, 360)`
    pub yaw: f32,
    /// Completed steps
    pub step: u64,
}

impl LocomotionState {
    /// Fresh state for a newly spawned actor facing `yaw`.
    pub fn spawned(yaw: f32) -> Self {
        Self {
            yaw: crate::core::angle::normalize_degrees(yaw),
            ..Self::default()
        }
    }

    /// True when `is_grounded` flipped on this step.
    #[inline]
    pub fn landing_edge(&self) -> bool {
        self.is_grounded && !self.was_grounded_last_step
    }

    /// True while the stick is deflected.
    #[inline]
    pub fn has_move_input(&self) -> bool {
        !self.move_input.is_zero()
    }

    /// Hash of the state plus the actor's position.
    pub fn compute_hash(&self, position: Vec3) -> StateHash {
        compute_state_hash(self.step, |h| {
            h.update_vec3(position);
            h.update_vec2(self.move_input);
            h.update_f32(self.vertical_velocity);
            h.update_f32(self.turn_velocity);
            h.update_bool(self.is_grounded);
            h.update_bool(self.was_grounded_last_step);
            h.update_f32(self.yaw);
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
