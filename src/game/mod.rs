//! Locomotion Module
//!
//! Per-step character locomotion and the collaborators it talks to.
//!
//! ## Module Structure
//!
//! - `collision`: Collaborator traits (ground query, executor, animator, viewpoint)
//! - `config`: Tuning parameters and JSON loading
//! - `input`: Input events, bounded queue, recordings
//! - `state`: Per-actor locomotion state
//! - `ground`: Downward ground probe
//! - `vertical`: Landing snap, gravity, fall clamp
//! - `motion`: Camera-relative movement and smoothed turning
//! - `controller`: Actor lifecycle and step orchestration
//! - `driver`: Fixed-step accumulator loop
//! - `replay`: Deterministic re-drive from a recording
//! - `world`: Headless reference collaborators
//! - `animation`: Named animator parameters
//! - `events`: Observable step events
//! - `error`: Error type

pub mod error;
pub mod config;
pub mod collision;
pub mod input;
pub mod state;
pub mod events;
pub mod ground;
pub mod vertical;
pub mod motion;
pub mod controller;
pub mod driver;
pub mod replay;
pub mod world;
pub mod animation;

// Re-export key types
pub use error::{LocomotionError, Result};
pub use config::{LandingPolicy, LocomotionConfig};
pub use collision::{AnimationDriver, GroundQuery, LayerMask, MoveOutcome, MovementExecutor, Ray, RayHit, Viewpoint};
pub use input::{InputEvent, InputQueue, InputRecording};
pub use state::{ActorPhase, LocomotionState};
pub use events::{LocomotionEvent, LocomotionEventData};
pub use controller::{Actor, LocomotionBuilder, LocomotionController, StepReport};
pub use driver::{DriverConfig, FixedStepDriver};
pub use vertical::VerticalTransition;
pub use world::{Aabb, FixedViewpoint, KinematicBody, StaticWorld};
pub use animation::AnimatorParameters;
