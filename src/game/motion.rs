//! Horizontal Mover & Orienter
//!
//! Turns stick input plus vertical velocity into a camera-relative
//! displacement, hands it to the movement executor, and eases the actor's
//! yaw toward the stick direction.
//!
//! ## Angle Mapping
//!
//! ```text
//!   stick (x, y)        target yaw (camera yaw 0)
//!   ( 0,  1) forward  ->   0
//!   ( 1,  0) right    ->  90
//!   ( 0, -1) back     -> 180
//!   (-1,  0) left     -> 270 (== -90)
//! ```
//!
//! `target = -atan2(y, x) * RAD_TO_DEG + 90 + camera_yaw`

use crate::core::angle::{normalize_degrees, smooth_damp_angle, RAD_TO_DEG};
use crate::core::vec2::Vec2;
use crate::core::vec3::Vec3;
use crate::game::collision::{AnimationDriver, MoveOutcome, MovementExecutor};
use crate::game::config::LocomotionConfig;
use crate::game::state::LocomotionState;

/// What the mover did this step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionOutput {
    /// Displacement submitted to the executor
    pub displacement: Vec3,
    /// Executor's answer
    pub outcome: MoveOutcome,
    /// Speed reported to the animation driver, if any
    pub reported_speed: Option<f32>,
    /// Target yaw, when there was stick input
    pub target_yaw: Option<f32>,
}

/// World-space velocity for this step, before scaling by `dt`.
///
/// Horizontal from the stick, vertical from `vertical_velocity`, then
/// yawed by the camera.
pub fn camera_relative_velocity(
    move_input: Vec2,
    vertical_velocity: f32,
    camera_yaw: f32,
    move_speed: f32,
) -> Vec3 {
    Vec3::new(
        move_input.x * move_speed,
        vertical_velocity,
        move_input.y * move_speed,
    )
    .rotate_yaw(camera_yaw)
}

/// Animation speed scalar for stick input: `|x| + |y|`.
///
/// The Manhattan sum, not the Euclidean length: a full
/// diagonal reports 2.0.
#[inline]
pub fn locomotion_speed(move_input: Vec2) -> f32 {
    move_input.manhattan_length()
}

/// Facing yaw (degrees) the stick asks for, relative to the camera.
#[inline]
pub fn target_yaw(move_input: Vec2, camera_yaw: f32) -> f32 {
    -move_input.y.atan2(move_input.x) * RAD_TO_DEG + 90.0 + camera_yaw
}

/// Move the actor and ease its facing toward the stick direction.
///
/// With zero stick input only the displacement is submitted; yaw, turn
/// velocity and the reported speed are left alone.
pub fn move_and_orient<M, A>(
    state: &mut LocomotionState,
    camera_yaw: f32,
    dt: f32,
    config: &LocomotionConfig,
    executor: &mut M,
    animator: &mut A,
) -> MotionOutput
where
    M: MovementExecutor + ?Sized,
    A: AnimationDriver + ?Sized,
{
    let velocity = camera_relative_velocity(
        state.move_input,
        state.vertical_velocity,
        camera_yaw,
        config.move_speed,
    );
    let displacement = velocity * dt;
    let outcome = executor.request_displacement(displacement);

    let mut output = MotionOutput {
        displacement,
        outcome,
        reported_speed: None,
        target_yaw: None,
    };

    if !state.has_move_input() {
        return output;
    }

    if state.is_grounded {
        let speed = locomotion_speed(state.move_input);
        animator.set_speed(speed);
        output.reported_speed = Some(speed);
    }

    let target = target_yaw(state.move_input, camera_yaw);
    let yaw = smooth_damp_angle(
        state.yaw,
        target,
        &mut state.turn_velocity,
        config.turn_smooth_time,
        dt,
    );
    state.yaw = normalize_degrees(yaw);
    output.target_yaw = Some(target);

    output
}

// =============================================================================
// TESTS
// =============================================================================
