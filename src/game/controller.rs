//! Locomotion Controller
//!
//! One actor's locomotion. Each fixed step runs, in this order:
//!
//! ```text
//!   0. drain input queue      (move axes, move release, jump)
//!   1. ground probe           (pre-movement position)
//!   2. vertical integration   (landing snap / gravity / clamp)
//!   3. move & orient          (camera-relative displacement, eased yaw)
//! ```
//!
//! Input never mutates state between steps; it waits in the queue until
//! step 0 of the next `on_step`. The controller is driven through the
//! [`Actor`] lifecycle by an external loop (see `driver`).
//!
//! ## Jump Guard Quirk
//!
//! An edge-triggered jump is ignored while airborne, but a level-triggered
//! (held) jump is always applied.

use tracing::{debug, info, trace, warn};

use crate::core::hash::StateHash;
use crate::core::vec2::Vec2;
use crate::core::vec3::Vec3;
use crate::game::collision::{AnimationDriver, GroundQuery, MoveOutcome, MovementExecutor, Viewpoint};
use crate::game::config::LocomotionConfig;
use crate::game::error::{LocomotionError, Result};
use crate::game::events::{LocomotionEvent, LocomotionEventData};
use crate::game::ground::{probe_ground, ProbeGizmo};
use crate::game::input::{InputEvent, InputQueue, InputRecording, DEFAULT_QUEUE_CAPACITY};
use crate::game::motion::move_and_orient;
use crate::game::state::{ActorPhase, LocomotionState};
use crate::game::vertical::{integrate_vertical, VerticalTransition};

// =============================================================================
// ACTOR LIFECYCLE
// =============================================================================

/// Explicit lifecycle driven by an external loop.
pub trait Actor {
    /// Bring the actor into the world. Enables input.
    fn on_spawn(&mut self) -> Result<()>;

    /// Advance one fixed step of `dt` seconds.
    fn on_step(&mut self, dt: f32) -> Result<StepReport>;

    /// Deliver an input event; applied at the start of the next step.
    fn on_input_event(&mut self, event: InputEvent) -> Result<()>;

    /// Remove the actor. Pending input is dropped. Idempotent.
    fn on_despawn(&mut self);
}

// =============================================================================
// STEP REPORT
// =============================================================================

/// Everything observable about one step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    /// Index of the step (0-based)
    pub step: u64,
    /// Ground probe result
    pub grounded: bool,
    /// Vertical integrator transition
    pub transition: VerticalTransition,
    /// Vertical velocity after integration
    pub vertical_velocity: f32,
    /// Displacement submitted to the executor
    pub displacement: Vec3,
    /// Executor's answer
    pub outcome: MoveOutcome,
    /// Facing yaw after the step
    pub yaw: f32,
    /// Ground probe debug segment
    pub gizmo: ProbeGizmo,
    /// Events in the order they happened
    pub events: Vec<LocomotionEvent>,
}

impl StepReport {
    /// True if the actor landed this step.
    pub fn landed(&self) -> bool {
        self.events.iter().any(LocomotionEvent::is_landing)
    }

    /// True if a jump was applied this step.
    pub fn jumped(&self) -> bool {
        self.events.iter().any(LocomotionEvent::is_jump)
    }

    /// Last speed reported to the animation driver this step.
    pub fn reported_speed(&self) -> Option<f32> {
        self.events.iter().rev().find_map(|e| match e.data {
            LocomotionEventData::SpeedReported { speed } => Some(speed),
            _ => None,
        })
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builds a [`LocomotionController`]; every collaborator is required.
pub struct LocomotionBuilder<G, M, A, V> {
    config: LocomotionConfig,
    ground: Option<G>,
    executor: Option<M>,
    animator: Option<A>,
    viewpoint: Option<V>,
    queue_capacity: usize,
    initial_yaw: f32,
}

impl<G, M, A, V> LocomotionBuilder<G, M, A, V>
where
    G: GroundQuery,
    M: MovementExecutor,
    A: AnimationDriver,
    V: Viewpoint,
{
    /// Start a builder with `config`.
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            ground: None,
            executor: None,
            animator: None,
            viewpoint: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            initial_yaw: 0.0,
        }
    }

    /// Ground ray query.
    pub fn ground(mut self, ground: G) -> Self {
        self.ground = Some(ground);
        self
    }

    /// Movement executor (owns the actor's position).
    pub fn executor(mut self, executor: M) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Animation driver.
    pub fn animator(mut self, animator: A) -> Self {
        self.animator = Some(animator);
        self
    }

    /// Observation viewpoint.
    pub fn viewpoint(mut self, viewpoint: V) -> Self {
        self.viewpoint = Some(viewpoint);
        self
    }

    /// Input queue capacity.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Facing yaw at spawn (degrees).
    pub fn initial_yaw(mut self, yaw: f32) -> Self {
        self.initial_yaw = yaw;
        self
    }

    /// Validate the config and assemble the controller.
    pub fn build(self) -> Result<LocomotionController<G, M, A, V>> {
        self.config.validate()?;
        if !self.initial_yaw.is_finite() {
            return Err(LocomotionError::InvalidConfig {
                field: "initial_yaw",
                reason: format!("must be finite (got {})", self.initial_yaw),
            });
        }

        let viewpoint = self.viewpoint.ok_or(LocomotionError::MissingCollaborator("viewpoint"))?;
        let executor = self.executor.ok_or(LocomotionError::MissingCollaborator("movement executor"))?;
        let ground = self.ground.ok_or(LocomotionError::MissingCollaborator("ground query"))?;
        let animator = self.animator.ok_or(LocomotionError::MissingCollaborator("animation driver"))?;

        Ok(LocomotionController {
            config: self.config,
            state: LocomotionState::spawned(self.initial_yaw),
            phase: ActorPhase::Unspawned,
            queue: InputQueue::new(self.queue_capacity),
            input_enabled: false,
            discarded: 0,
            recording: None,
            ground,
            executor,
            animator,
            viewpoint,
        })
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Kinematic locomotion for one actor.
pub struct LocomotionController<G, M, A, V> {
    config: LocomotionConfig,
    state: LocomotionState,
    phase: ActorPhase,
    queue: InputQueue,
    input_enabled: bool,
    /// Events discarded while input was disabled, reported next step
    discarded: u32,
    recording: Option<InputRecording>,
    ground: G,
    executor: M,
    animator: A,
    viewpoint: V,
}

impl<G, M, A, V> LocomotionController<G, M, A, V>
where
    G: GroundQuery,
    M: MovementExecutor,
    A: AnimationDriver,
    V: Viewpoint,
{
    /// Shorthand for [`LocomotionBuilder::new`].
    pub fn builder(config: LocomotionConfig) -> LocomotionBuilder<G, M, A, V> {
        LocomotionBuilder::new(config)
    }

    /// Configuration.
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> ActorPhase {
        self.phase
    }

    /// Actor position, as reported by the executor.
    pub fn position(&self) -> Vec3 {
        self.executor.position()
    }

    /// Facing yaw in degrees.
    pub fn yaw(&self) -> f32 {
        self.state.yaw
    }

    /// Ground query.
    pub fn ground(&self) -> &G {
        &self.ground
    }

    /// Movement executor.
    pub fn executor(&self) -> &M {
        &self.executor
    }

    /// Mutable movement executor (teleports, etc).
    pub fn executor_mut(&mut self) -> &mut M {
        &mut self.executor
    }

    /// Animation driver.
    pub fn animator(&self) -> &A {
        &self.animator
    }

    /// Viewpoint.
    pub fn viewpoint(&self) -> &V {
        &self.viewpoint
    }

    /// Whether input events are accepted.
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Enable or disable input. Disabling drops pending input.
    pub fn set_input_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.queue.clear();
        }
        self.input_enabled = enabled;
    }

    /// Events waiting for the next step.
    pub fn pending_inputs(&self) -> usize {
        self.queue.len()
    }

    /// Start recording drained input for replay.
    pub fn start_recording(&mut self, fixed_dt: f32) {
        self.recording = Some(InputRecording::new(fixed_dt));
    }

    /// Stop recording and return what was captured.
    pub fn take_recording(&mut self) -> Option<InputRecording> {
        let mut recording = self.recording.take()?;
        recording.finalize(self.state.step);
        Some(recording)
    }

    /// Hash of state and position.
    pub fn compute_hash(&self) -> StateHash {
        self.state.compute_hash(self.executor.position())
    }

    fn ensure_active(&self) -> Result<()> {
        match self.phase {
            ActorPhase::Active => Ok(()),
            ActorPhase::Unspawned => Err(LocomotionError::NotSpawned),
            ActorPhase::Despawned => Err(LocomotionError::Despawned),
        }
    }

    /// Drain queued input into state. Returns whether a jump was applied.
    fn drain_input(&mut self, step: u64, events: &mut Vec<LocomotionEvent>) -> bool {
        let Self { queue, state, config, animator, recording, discarded, .. } = self;

        if *discarded > 0 {
            for _ in 0..*discarded {
                events.push(LocomotionEvent::new(step, LocomotionEventData::InputDiscarded));
            }
            *discarded = 0;
        }

        let mut jumped = false;
        for event in queue.drain() {
            if let Some(rec) = recording.as_mut() {
                rec.record(step, event);
            }
            if let Some(data) = apply_input_event(state, config, animator, event) {
                jumped |= matches!(data, LocomotionEventData::Jumped { .. });
                events.push(LocomotionEvent::new(step, data));
            }
        }
        jumped
    }
}

/// Apply one input event to state. `is_grounded` still holds the previous
/// step's classification here.
fn apply_input_event<A: AnimationDriver + ?Sized>(
    state: &mut LocomotionState,
    config: &LocomotionConfig,
    animator: &mut A,
    event: InputEvent,
) -> Option<LocomotionEventData> {
    match event {
        InputEvent::Move(axes) => {
            state.move_input = axes;
            None
        }
        InputEvent::MoveCanceled => {
            state.move_input = Vec2::ZERO;
            animator.set_speed(0.0);
            Some(LocomotionEventData::SpeedReported { speed: 0.0 })
        }
        InputEvent::Jump { edge } => {
            if edge && !state.is_grounded {
                debug!("Edge jump ignored while airborne (vy={:.3})", state.vertical_velocity);
                return Some(LocomotionEventData::JumpIgnored);
            }
            state.vertical_velocity = config.jump_force;
            animator.set_airborne(true);
            debug!("Jump: edge={} vy={:.3}", edge, config.jump_force);
            Some(LocomotionEventData::Jumped { edge, velocity: config.jump_force })
        }
    }
}

impl<G, M, A, V> Actor for LocomotionController<G, M, A, V>
where
    G: GroundQuery,
    M: MovementExecutor,
    A: AnimationDriver,
    V: Viewpoint,
{
    fn on_spawn(&mut self) -> Result<()> {
        match self.phase {
            ActorPhase::Unspawned => {}
            ActorPhase::Active => return Err(LocomotionError::AlreadySpawned),
            ActorPhase::Despawned => return Err(LocomotionError::Despawned),
        }

        self.phase = ActorPhase::Active;
        self.input_enabled = true;
        info!("Actor spawned at {} facing {:.1}", self.executor.position(), self.state.yaw);
        Ok(())
    }

    fn on_step(&mut self, dt: f32) -> Result<StepReport> {
        self.ensure_active()?;
        if !dt.is_finite() || dt < 0.0 {
            return Err(LocomotionError::InvalidTimeStep(dt));
        }

        let step = self.state.step;
        let mut events = Vec::new();

        // 0. Input
        let jumped = self.drain_input(step, &mut events);

        // 1. Ground probe
        let probe = probe_ground(&self.ground, self.executor.position(), &self.config);

        // 2. Vertical integration
        let velocity_before = self.state.vertical_velocity;
        let transition = integrate_vertical(&mut self.state, probe.grounded, dt, &self.config, jumped);
        match transition {
            VerticalTransition::Landed { impact_velocity, overrode_jump } => {
                self.animator.set_airborne(false);
                debug!(
                    "Landed at step {}: impact vy={:.3}, jump overridden={}",
                    step, impact_velocity, overrode_jump
                );
                events.push(LocomotionEvent::new(step, LocomotionEventData::Landed {
                    impact_velocity,
                    overrode_jump,
                }));
            }
            VerticalTransition::JumpKeptOnLanding => {
                debug!("Landing edge at step {} kept same-step jump", step);
            }
            VerticalTransition::Airborne { left_ground, clamped } => {
                if left_ground {
                    debug!("Left ground at step {}", step);
                    events.push(LocomotionEvent::new(step, LocomotionEventData::LeftGround));
                }
                if clamped && velocity_before > -self.config.fall_speed_limit {
                    events.push(LocomotionEvent::new(step, LocomotionEventData::FallClamped {
                        velocity: self.state.vertical_velocity,
                    }));
                }
            }
            VerticalTransition::Grounded => {}
        }

        // 3. Move & orient
        let camera_yaw = self.viewpoint.yaw();
        let motion = move_and_orient(
            &mut self.state,
            camera_yaw,
            dt,
            &self.config,
            &mut self.executor,
            &mut self.animator,
        );
        if let Some(speed) = motion.reported_speed {
            events.push(LocomotionEvent::new(step, LocomotionEventData::SpeedReported { speed }));
        }

        self.state.step += 1;

        trace!(
            "Step {}: grounded={} vy={:.3} d={} yaw={:.2}",
            step, probe.grounded, self.state.vertical_velocity, motion.displacement, self.state.yaw
        );
        #[cfg(feature = "debug-tracing")]
        trace!("Step {} probe {:?}", step, probe.gizmo);

        Ok(StepReport {
            step,
            grounded: probe.grounded,
            transition,
            vertical_velocity: self.state.vertical_velocity,
            displacement: motion.displacement,
            outcome: motion.outcome,
            yaw: self.state.yaw,
            gizmo: probe.gizmo,
            events,
        })
    }

    fn on_input_event(&mut self, event: InputEvent) -> Result<()> {
        self.ensure_active()?;

        if let InputEvent::Move(axes) = event {
            if !axes.is_finite() {
                warn!("Rejecting non-finite move input {:?}", axes);
                return Err(LocomotionError::InvalidInput(format!("non-finite move axes {:?}", axes)));
            }
        }

        if !self.input_enabled {
            trace!("Input disabled, discarding {:?}", event);
            self.discarded += 1;
            return Ok(());
        }

        self.queue.push(event)
    }

    fn on_despawn(&mut self) {
        if self.phase == ActorPhase::Despawned {
            return;
        }
        self.queue.clear();
        self.input_enabled = false;
        self.phase = ActorPhase::Despawned;
        info!("Actor despawned after {} steps", self.state.step);
    }
}

// =============================================================================
// TESTS
// =============================================================================
