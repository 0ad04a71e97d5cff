//! Locomotion Events
//!
//! Observable things that happened during a step, in the order they
//! happened. Purely informational; nothing reads them back.

use serde::{Serialize, Deserialize};

/// Event data.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LocomotionEventData {
    /// Grounded after being airborne; vertical velocity snapped
    Landed {
        /// Vertical velocity before the snap
        impact_velocity: f32,
        /// True if a jump drained this step was overridden by the snap
        overrode_jump: bool,
    },

    /// Ground probe stopped hitting
    LeftGround,

    /// Jump impulse applied
    Jumped {
        /// Edge-triggered press
        edge: bool,
        /// Vertical velocity set
        velocity: f32,
    },

    /// Edge jump received while airborne; ignored
    JumpIgnored,

    /// Speed scalar sent to the animation driver
    SpeedReported {
        /// Reported value
        speed: f32,
    },

    /// Fall speed hit the terminal limit this step
    FallClamped {
        /// Clamped vertical velocity
        velocity: f32,
    },

    /// Input event discarded because input is disabled
    InputDiscarded,
}

/// A locomotion event stamped with its step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocomotionEvent {
    /// Step during which it happened
    pub step: u64,
    /// Event data
    pub data: LocomotionEventData,
}

impl LocomotionEvent {
    /// Create a new event.
    pub fn new(step: u64, data: LocomotionEventData) -> Self {
        Self { step, data }
    }

    /// True for landing events.
    pub fn is_landing(&self) -> bool {
        matches!(self.data, LocomotionEventData::Landed { .. })
    }

    /// True for applied jumps.
    pub fn is_jump(&self) -> bool {
        matches!(self.data, LocomotionEventData::Jumped { .. })
    }
}

// =============================================================================
// TESTS
// =============================================================================
