//! Input Events, Queueing and Recording
//!
//! Input never touches locomotion state directly. The input source pushes
//! [`InputEvent`]s into a bounded [`InputQueue`]; the controller drains the
//! queue in arrival order at the start of each step, before the ground
//! probe. That makes the ordering between input and simulation explicit.
//!
//! [`InputRecording`] captures `(step, event)` pairs for replay.

use std::collections::VecDeque;
use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::core::vec2::Vec2;
use crate::core::hash::{StateHash, StateHasher};
use crate::game::error::{LocomotionError, Result};

/// Default queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

// =============================================================================
// INPUT EVENTS
// =============================================================================

/// One input signal from the input source.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Move axes changed (x = right, y = forward)
    Move(Vec2),
    /// Move input released
    MoveCanceled,
    /// Jump trigger.
    ///
    /// `edge` is true for a press-this-step edge. A non-edge (held / level)
    /// jump is never blocked while airborne.
    Jump {
        /// Edge-triggered press
        edge: bool,
    },
}

impl InputEvent {
    /// Edge-triggered jump press.
    pub const fn jump_pressed() -> Self {
        Self::Jump { edge: true }
    }

    /// Move axes event.
    pub const fn movement(x: f32, y: f32) -> Self {
        Self::Move(Vec2::new(x, y))
    }

    /// True for events that only replace the move axes.
    #[inline]
    pub fn is_axis_update(&self) -> bool {
        matches!(self, Self::Move(_) | Self::MoveCanceled)
    }

    fn hash_into(&self, hasher: &mut StateHasher) {
        match self {
            Self::Move(v) => {
                hasher.update_u8(0);
                hasher.update_vec2(*v);
            }
            Self::MoveCanceled => hasher.update_u8(1),
            Self::Jump { edge } => {
                hasher.update_u8(2);
                hasher.update_bool(*edge);
            }
        }
    }
}

// =============================================================================
// INPUT QUEUE
// =============================================================================

/// Bounded FIFO of pending input events.
///
/// When full, a trailing axis update is replaced by a newer one (only the
/// latest axis value matters). Anything else is rejected.
#[derive(Clone, Debug)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
    capacity: usize,
    coalesced: u64,
}

impl InputQueue {
    /// Create a queue holding at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            coalesced: 0,
        }
    }

    /// Enqueue an event.
    pub fn push(&mut self, event: InputEvent) -> Result<()> {
        if self.events.len() < self.capacity {
            self.events.push_back(event);
            return Ok(());
        }

        if event.is_axis_update() {
            if let Some(last) = self.events.back_mut() {
                if last.is_axis_update() {
                    *last = event;
                    self.coalesced += 1;
                    return Ok(());
                }
            }
        }

        warn!("Input queue full ({}), dropping {:?}", self.capacity, event);
        Err(LocomotionError::InputQueueFull { capacity: self.capacity })
    }

    /// Take all pending events in arrival order.
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, InputEvent> {
        self.events.drain(..)
    }

    /// Drop all pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Pending event count.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// No pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Maximum pending events.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Axis updates merged into a full queue so far.
    pub fn coalesced_count(&self) -> u64 {
        self.coalesced
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

// =============================================================================
// INPUT RECORDING
// =============================================================================

/// An input event stamped with the step it was delivered before.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedInput {
    /// Step index the event was drained in
    pub step: u64,
    /// The event
    pub event: InputEvent,
}

/// Complete input recording for one actor.
///
/// Events are stored in delivery order; steps never decrease.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRecording {
    /// Fixed step delta the recording was made with
    pub fixed_dt: f32,
    /// Number of steps covered
    pub step_count: u64,
    entries: Vec<RecordedInput>,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new(fixed_dt: f32) -> Self {
        Self {
            fixed_dt,
            step_count: 0,
            entries: Vec::with_capacity(256),
        }
    }

    /// Record an event delivered before `step`.
    ///
    /// Out-of-order steps are clamped forward to keep the log monotonic.
    pub fn record(&mut self, step: u64, event: InputEvent) {
        let floor = self.entries.last().map_or(0, |e| e.step);
        self.entries.push(RecordedInput { step: step.max(floor), event });
    }

    /// Mark `count` steps as covered.
    pub fn finalize(&mut self, step_count: u64) {
        self.step_count = step_count;
    }

    /// All recorded entries.
    pub fn entries(&self) -> &[RecordedInput] {
        &self.entries
    }

    /// Events delivered before `step`.
    pub fn events_at(&self, step: u64) -> impl Iterator<Item = InputEvent> + '_ {
        let start = self.entries.partition_point(|e| e.step < step);
        self.entries[start..]
            .iter()
            .take_while(move |e| e.step == step)
            .map(|e| e.event)
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No events recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from [`to_bytes`](Self::to_bytes) output.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(data)?)
    }

    /// Content hash of the recording.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_recording();
        hasher.update_f32(self.fixed_dt);
        hasher.update_u64(self.step_count);
        for entry in &self.entries {
            hasher.update_u64(entry.step);
            entry.event.hash_into(&mut hasher);
        }
        hasher.finalize()
    }
}

// =============================================================================
// TESTS
// =============================================================================
