//! Input Replay
//!
//! Re-drives a freshly built controller from an [`InputRecording`] and
//! reports the final state hash. Identical recording, config and world
//! give an identical hash.
//!
//! The recording must have been started before the original actor's
//! first step; events are re-delivered ahead of the step they were
//! drained in.

use tracing::{info, warn};

use crate::core::hash::StateHash;
use crate::core::vec3::Vec3;
use crate::game::collision::{AnimationDriver, GroundQuery, MovementExecutor, Viewpoint};
use crate::game::controller::{Actor, LocomotionController};
use crate::game::error::Result;
use crate::game::events::LocomotionEvent;
use crate::game::input::InputRecording;

/// Result of a replay.
#[derive(Clone, Debug)]
pub struct ReplayOutcome {
    /// Steps run
    pub steps: u64,
    /// Hash of the final state
    pub final_hash: StateHash,
    /// Actor position after the last step
    pub final_position: Vec3,
    /// Every event from every step
    pub events: Vec<LocomotionEvent>,
}

impl ReplayOutcome {
    /// True when the final hash equals `expected`.
    pub fn matches(&self, expected: &StateHash) -> bool {
        &self.final_hash == expected
    }
}

/// Spawn `controller` and run it through `recording`.
///
/// `controller` must be freshly built (unspawned).
pub fn replay_recording<G, M, A, V>(
    controller: &mut LocomotionController<G, M, A, V>,
    recording: &InputRecording,
) -> Result<ReplayOutcome>
where
    G: GroundQuery,
    M: MovementExecutor,
    A: AnimationDriver,
    V: Viewpoint,
{
    controller.on_spawn()?;

    let mut events = Vec::new();
    for step in 0..recording.step_count {
        for event in recording.events_at(step) {
            controller.on_input_event(event)?;
        }
        let report = controller.on_step(recording.fixed_dt)?;
        events.extend(report.events);
    }

    let final_hash = controller.compute_hash();
    info!(
        "Replayed {} steps ({} inputs), final hash {}",
        recording.step_count,
        recording.len(),
        hex::encode(&final_hash[..8])
    );

    Ok(ReplayOutcome {
        steps: recording.step_count,
        final_hash,
        final_position: controller.position(),
        events,
    })
}

/// Replay and compare against `expected`, logging a mismatch.
pub fn verify_recording<G, M, A, V>(
    controller: &mut LocomotionController<G, M, A, V>,
    recording: &InputRecording,
    expected: &StateHash,
) -> Result<bool>
where
    G: GroundQuery,
    M: MovementExecutor,
    A: AnimationDriver,
    V: Viewpoint,
{
    let outcome = replay_recording(controller, recording)?;
    let ok = outcome.matches(expected);
    if !ok {
        warn!(
            "Replay diverged: expected {}, got {}",
            hex::encode(expected),
            hex::encode(outcome.final_hash)
        );
    }
    Ok(ok)
}

// =============================================================================
// TESTS
// =============================================================================
