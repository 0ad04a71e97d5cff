//! Locomotion Demo
//!
//! Runs a scripted session against a headless world, then replays the
//! recorded input and checks the final state hash.
//!
//! Usage: `locomotion-demo [config.json]`. Log level via `RUST_LOG`.

use std::rc::Rc;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use locomotion::{
    TICK_RATE, VERSION,
    Actor, DriverConfig, InputRecording, FixedStepDriver, InputEvent, LocomotionConfig, LocomotionController, Vec3,
    game::{
        animation::AnimatorParameters,
        collision::LayerMask,
        events::LocomotionEventData,
        replay::replay_recording,
        world::{Aabb, FixedViewpoint, KinematicBody, StaticWorld},
    },
};

const GROUND: LayerMask = LayerMask::layer(0);
const WALLS: LayerMask = LayerMask::layer(1);

type DemoController = LocomotionController<Arc<StaticWorld>, KinematicBody, AnimatorParameters, Rc<FixedViewpoint>>;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Kinematic Locomotion v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let config = match std::env::args().nth(1) {
        Some(path) => LocomotionConfig::from_json_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        None => LocomotionConfig::default(),
    };
    info!("Config:\n{}", config.to_json_pretty()?);

    demo_session(config)
}

fn demo_world() -> Arc<StaticWorld> {
    Arc::new(
        StaticWorld::new()
            .with_floor(0.0, 40.0, GROUND)
            // ledge to walk off
            .with_box(Aabb::new(Vec3::new(-4.0, 0.0, 6.0), Vec3::new(4.0, 1.5, 14.0)), GROUND)
            .with_box(Aabb::new(Vec3::new(8.0, 0.0, -20.0), Vec3::new(9.0, 4.0, 20.0)), WALLS),
    )
}

fn build_controller(config: &LocomotionConfig, driver: &DriverConfig, camera: Rc<FixedViewpoint>) -> anyhow::Result<DemoController> {
    let world = demo_world();
    let controller = LocomotionController::builder(config.clone())
        .ground(world.clone())
        .executor(KinematicBody::new(world, Vec3::new(0.0, 3.0, 0.0), 0.3, 1.8).with_solid_mask(GROUND.with(WALLS)))
        .animator(AnimatorParameters::new())
        .viewpoint(camera)
        .queue_capacity(driver.input_queue_capacity)
        .build()?;
    Ok(controller)
}

/// Scripted input delivered before `frame`.
fn scripted_input(frame: u32) -> Vec<InputEvent> {
    match frame {
        30 => vec![InputEvent::movement(0.0, 1.0)],
        90 => vec![InputEvent::jump_pressed()],
        95 => vec![InputEvent::jump_pressed()],
        150 => vec![InputEvent::movement(1.0, 1.0)],
        240 => vec![InputEvent::movement(-0.5, -0.5)],
        300 => vec![InputEvent::MoveCanceled],
        330 => vec![InputEvent::Jump { edge: false }],
        _ => Vec::new(),
    }
}

/// Demo function to run and verify a session.
fn demo_session(config: LocomotionConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo Session ===");

    let driver_config = DriverConfig::default();
    let camera = Rc::new(FixedViewpoint::new(30.0));
    let mut controller = build_controller(&config, &driver_config, camera.clone())?;
    let mut driver = FixedStepDriver::new(driver_config.clone())?;

    controller.on_spawn()?;
    controller.start_recording(driver_config.fixed_dt);

    // Uneven frame times, like a real render loop
    let frame_times = [1.0 / 60.0, 1.0 / 30.0, 1.0 / 144.0, 1.0 / 60.0];
    let mut total_events = 0;
    let mut swing_step = 0;

    for frame in 0..400u32 {
        if frame == 200 {
            camera.set_yaw(120.0);
            swing_step = controller.state().step;
            info!("Step {}: camera yaw -> 120", swing_step);
        }
        for event in scripted_input(frame) {
            controller.on_input_event(event)?;
        }

        let frame_time = frame_times[frame as usize % frame_times.len()];
        for report in driver.advance(frame_time, &mut controller)? {
            total_events += report.events.len();
            for event in &report.events {
                match event.data {
                    LocomotionEventData::Landed { impact_velocity, overrode_jump } => {
                        info!("Step {}: landed at {} (impact {:.2}, jump overridden: {})",
                              event.step, controller.position(), impact_velocity, overrode_jump);
                    }
                    LocomotionEventData::Jumped { edge, .. } => {
                        info!("Step {}: jump (edge: {})", event.step, edge);
                    }
                    LocomotionEventData::JumpIgnored => {
                        info!("Step {}: airborne edge jump ignored", event.step);
                    }
                    LocomotionEventData::LeftGround => {
                        info!("Step {}: left ground", event.step);
                    }
                    _ => {}
                }
            }
        }
    }

    // Print final results
    info!("=== Session Results ===");
    let state = controller.state();
    info!("Steps: {} (dropped {})", state.step, driver.dropped_steps());
    info!("Position: {}", controller.position());
    info!("Yaw: {:.2}, grounded: {}", state.yaw, state.is_grounded);
    info!("Animator speed: {:.2}, airborne: {}", controller.animator().speed(), controller.animator().airborne());
    info!("Total events: {}", total_events);

    let hash = controller.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    let recording = controller
        .take_recording()
        .context("recording was not started")?;
    let bytes = recording.to_bytes()?;
    info!("Recording: {} inputs over {} steps, {} bytes", recording.len(), recording.step_count, bytes.len());
    controller.on_despawn();

    // Verify determinism by replaying. The camera swing is not part of the
    // recording, so replay it at the same step.
    info!("=== Verifying Determinism ===");
    let replay_camera = Rc::new(FixedViewpoint::new(30.0));
    let mut replay = build_controller(&config, &driver_config, replay_camera.clone())?;

    let decoded = InputRecording::from_bytes(&bytes)?;
    let (head, tail) = split_recording(&decoded, swing_step);
    replay_recording(&mut replay, &head)?;
    replay_camera.set_yaw(120.0);
    let outcome = continue_replay(&mut replay, &tail)?;

    info!("Replay State Hash: {}", hex::encode(outcome));
    if hash == outcome {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        info!("DETERMINISM FAILURE: Hashes differ!");
    }
    Ok(())
}

/// Split a recording at `step` into two recordings covering `[0, step)`
/// and `[step, end)`, the second renumbered from 0.
fn split_recording(
    recording: &InputRecording,
    step: u64,
) -> (InputRecording, InputRecording) {
    let mut head = InputRecording::new(recording.fixed_dt);
    let mut tail = InputRecording::new(recording.fixed_dt);
    for entry in recording.entries() {
        if entry.step < step {
            head.record(entry.step, entry.event);
        } else {
            tail.record(entry.step - step, entry.event);
        }
    }
    head.finalize(step.min(recording.step_count));
    tail.finalize(recording.step_count.saturating_sub(step));
    (head, tail)
}

/// Drive an already spawned controller through `recording`.
fn continue_replay(controller: &mut DemoController, recording: &InputRecording) -> anyhow::Result<[u8; 32]> {
    for step in 0..recording.step_count {
        for event in recording.events_at(step) {
            controller.on_input_event(event)?;
        }
        controller.on_step(recording.fixed_dt)?;
    }
    Ok(controller.compute_hash())
}
