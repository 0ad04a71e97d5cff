//! Fixed-Step Driver
//!
//! Turns variable frame times into whole fixed steps for an [`Actor`].
//! Leftover time carries over in an accumulator; when a frame would need
//! more than `max_steps_per_frame` steps the remaining backlog is dropped
//! rather than letting the simulation spiral.

use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use crate::game::controller::{Actor, StepReport};
use crate::game::error::{LocomotionError, Result};
use crate::game::input::DEFAULT_QUEUE_CAPACITY;

/// Default fixed step (50 Hz).
pub const DEFAULT_FIXED_DT: f32 = 0.02;

/// Default cap on steps run for one frame.
pub const DEFAULT_MAX_STEPS_PER_FRAME: u32 = 8;

/// Timing and queueing knobs for the step loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Seconds per step
    pub fixed_dt: f32,
    /// Steps run per `advance` before the backlog is dropped
    pub max_steps_per_frame: u32,
    /// Capacity of each actor's input queue
    pub input_queue_capacity: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            fixed_dt: DEFAULT_FIXED_DT,
            max_steps_per_frame: DEFAULT_MAX_STEPS_PER_FRAME,
            input_queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl DriverConfig {
    /// Check every field is in range.
    pub fn validate(&self) -> Result<()> {
        if !self.fixed_dt.is_finite() || self.fixed_dt <= 0.0 {
            return Err(LocomotionError::InvalidConfig {
                field: "fixed_dt",
                reason: format!("must be finite and > 0 (got {})", self.fixed_dt),
            });
        }
        if self.max_steps_per_frame == 0 {
            return Err(LocomotionError::InvalidConfig {
                field: "max_steps_per_frame",
                reason: "must be >= 1".into(),
            });
        }
        if self.input_queue_capacity == 0 {
            return Err(LocomotionError::InvalidConfig {
                field: "input_queue_capacity",
                reason: "must be >= 1".into(),
            });
        }
        Ok(())
    }

    /// Step rate in Hz.
    pub fn tick_rate(&self) -> f32 {
        1.0 / self.fixed_dt
    }
}

/// Accumulator-based fixed-step loop.
#[derive(Clone, Debug)]
pub struct FixedStepDriver {
    config: DriverConfig,
    accumulator: f32,
    steps: u64,
    dropped_steps: u64,
}

impl FixedStepDriver {
    /// Create a driver; fails on an invalid config.
    pub fn new(config: DriverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            accumulator: 0.0,
            steps: 0,
            dropped_steps: 0,
        })
    }

    /// Configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Steps run so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Steps skipped because a frame fell too far behind.
    pub fn dropped_steps(&self) -> u64 {
        self.dropped_steps
    }

    /// Fraction of a step waiting in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.config.fixed_dt
    }

    /// Run exactly one step.
    pub fn step<A: Actor + ?Sized>(&mut self, actor: &mut A) -> Result<StepReport> {
        let report = actor.on_step(self.config.fixed_dt)?;
        self.steps += 1;
        Ok(report)
    }

    /// Run exactly `count` steps.
    pub fn run_steps<A: Actor + ?Sized>(&mut self, actor: &mut A, count: u32) -> Result<Vec<StepReport>> {
        let mut reports = Vec::with_capacity(count as usize);
        for _ in 0..count {
            reports.push(self.step(actor)?);
        }
        Ok(reports)
    }

    /// Feed `frame_time` seconds and run every whole step that fits.
    pub fn advance<A: Actor + ?Sized>(&mut self, frame_time: f32, actor: &mut A) -> Result<Vec<StepReport>> {
        if !frame_time.is_finite() || frame_time < 0.0 {
            return Err(LocomotionError::InvalidTimeStep(frame_time));
        }

        let dt = self.config.fixed_dt;
        self.accumulator += frame_time;

        let mut reports = Vec::new();
        while self.accumulator >= dt && (reports.len() as u32) < self.config.max_steps_per_frame {
            reports.push(self.step(actor)?);
            self.accumulator -= dt;
        }

        if self.accumulator >= dt {
            let behind = (self.accumulator / dt).floor();
            self.accumulator -= behind * dt;
            self.dropped_steps += behind as u64;
            warn!(
                "Frame of {:.3}s needed more than {} steps, dropped {} steps",
                frame_time, self.config.max_steps_per_frame, behind as u64
            );
        }

        debug!("Advanced {:.4}s: {} steps, alpha {:.2}", frame_time, reports.len(), self.alpha());
        Ok(reports)
    }
}

// =============================================================================
// TESTS
// =============================================================================
