//! # Kinematic Locomotion
//!
//! Fixed-step character locomotion for a kinematic (non-physics) actor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   KINEMATIC LOCOMOTION                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Math primitives                           │
//! │  ├── vec2.rs     - 2D stick vector                           │
//! │  ├── vec3.rs     - 3D vector, yaw rotation                   │
//! │  ├── angle.rs    - Degrees, SmoothDamp, SmoothDampAngle      │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - Locomotion                                │
//! │  ├── input.rs    - Input events, queue, recording            │
//! │  ├── ground.rs   - Ground ray probe                          │
//! │  ├── vertical.rs - Landing snap, gravity, fall clamp         │
//! │  ├── motion.rs   - Camera-relative move, smoothed turn       │
//! │  ├── controller.rs - Actor lifecycle, step order             │
//! │  ├── driver.rs   - Fixed-step accumulator                    │
//! │  ├── replay.rs   - Recording re-drive                        │
//! │  └── world.rs    - Headless reference collaborators          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Step Order
//!
//! 1. Drain queued input
//! 2. Probe the ground from the pre-movement position
//! 3. Integrate vertical velocity
//! 4. Move camera-relative, then ease the facing yaw
//!
//! ## Determinism
//!
//! The step is a pure function of state, queued input, `dt` and the
//! collaborators' answers. Replaying a recording against the same world
//! reproduces the final state hash bit for bit on the same platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::vec2::Vec2;
pub use core::vec3::Vec3;
pub use game::config::{LandingPolicy, LocomotionConfig};
pub use game::controller::{Actor, LocomotionBuilder, LocomotionController, StepReport};
pub use game::driver::{DriverConfig, FixedStepDriver};
pub use game::error::{LocomotionError, Result};
pub use game::input::{InputEvent, InputRecording};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default step rate (Hz)
pub const TICK_RATE: u32 = 50;
