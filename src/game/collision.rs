//! Collaborator Contracts
//!
//! The narrow seams between the controller and the world around it.
//! Everything the controller needs from outside goes through one of these
//! traits, which keeps the core testable with plain mocks.
//!
//! ```text
//!   Viewpoint ──yaw──▶ ┌────────────┐ ──displacement──▶ MovementExecutor
//!                      │ Controller │
//!   GroundQuery ◀─ray─ └────────────┘ ──speed/airborne─▶ AnimationDriver
//! ```

use std::rc::Rc;
use std::sync::Arc;
use serde::{Serialize, Deserialize};

use crate::core::vec3::Vec3;

// =============================================================================
// LAYERS
// =============================================================================

/// Bitmask of collision layers (32 layers).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Matches nothing
    pub const NONE: Self = Self(0);

    /// Matches every layer
    pub const ALL: Self = Self(u32::MAX);

    /// Mask containing a single layer (0-31).
    #[inline]
    pub const fn layer(index: u8) -> Self {
        Self(1u32 << (index as u32 & 31))
    }

    /// Union of two masks.
    #[inline]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True when the masks share at least one layer.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

// =============================================================================
// RAY QUERY
// =============================================================================

/// Half-line with a unit direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Start point
    pub origin: Vec3,
    /// Direction (normalized on construction)
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; `direction` is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a successful ray query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
}

/// Ray query against solid world geometry.
pub trait GroundQuery {
    /// First hit within `max_distance` on geometry matching `mask`.
    fn raycast(&self, ray: Ray, max_distance: f32, mask: LayerMask) -> Option<RayHit>;
}

impl<T: GroundQuery + ?Sized> GroundQuery for Arc<T> {
    fn raycast(&self, ray: Ray, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        (**self).raycast(ray, max_distance, mask)
    }
}

impl<T: GroundQuery + ?Sized> GroundQuery for Rc<T> {
    fn raycast(&self, ray: Ray, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        (**self).raycast(ray, max_distance, mask)
    }
}

// =============================================================================
// MOVEMENT EXECUTOR
// =============================================================================

/// What the executor actually did with a requested displacement.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MoveOutcome {
    /// Displacement that was requested
    pub requested: Vec3,
    /// Displacement that was applied after collision response
    pub applied: Vec3,
    /// Whether the body was blocked below (resting on something)
    pub blocked_below: bool,
}

impl MoveOutcome {
    /// Outcome for an unobstructed move.
    pub fn unobstructed(displacement: Vec3) -> Self {
        Self {
            requested: displacement,
            applied: displacement,
            blocked_below: false,
        }
    }

    /// True when collision response changed the displacement.
    pub fn was_blocked(&self) -> bool {
        self.requested != self.applied
    }
}

/// Collision-constrained translation of the actor's body.
pub trait MovementExecutor {
    /// Current world position of the actor (feet).
    fn position(&self) -> Vec3;

    /// Move by `displacement`, resolving collisions internally.
    fn request_displacement(&mut self, displacement: Vec3) -> MoveOutcome;
}

// =============================================================================
// ANIMATION / VIEWPOINT
// =============================================================================

/// Receives derived animation signals. Never feeds back into locomotion.
pub trait AnimationDriver {
    /// Locomotion speed scalar.
    fn set_speed(&mut self, speed: f32);

    /// Airborne flag.
    fn set_airborne(&mut self, airborne: bool);
}

/// Read-only observation viewpoint.
pub trait Viewpoint {
    /// Camera yaw in degrees.
    fn yaw(&self) -> f32;
}

impl<T: Viewpoint + ?Sized> Viewpoint for Rc<T> {
    fn yaw(&self) -> f32 {
        (**self).yaw()
    }
}

impl<T: Viewpoint + ?Sized> Viewpoint for Arc<T> {
    fn yaw(&self) -> f32 {
        (**self).yaw()
    }
}

// =============================================================================
// TESTS
// =============================================================================
