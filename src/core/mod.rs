//! Core math primitives.
//!
//! Self-contained vector, angle and hashing helpers. Nothing in here knows
//! about locomotion; the `game` module builds on top of it.

pub mod vec2;
pub mod vec3;
pub mod angle;
pub mod hash;

// Re-export core types
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use angle::{delta_angle, normalize_degrees, smooth_damp, smooth_damp_angle, RAD_TO_DEG, DEG_TO_RAD};
pub use hash::{StateHash, StateHasher, compute_state_hash};
