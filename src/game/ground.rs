//! Ground Sensor
//!
//! One downward ray per step from slightly above the actor's feet.
//! Grounded iff the ray hits masked geometry within `ray_length`.

use serde::{Serialize, Deserialize};

use crate::core::vec3::Vec3;
use crate::game::collision::{GroundQuery, Ray, RayHit};
use crate::game::config::LocomotionConfig;

/// Debug colour of the probe ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GizmoColor {
    /// Grounded
    Green,
    /// Airborne
    Red,
}

/// Line segment describing the probe, for debug overlays.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbeGizmo {
    /// Ray origin
    pub origin: Vec3,
    /// Ray end at full length
    pub end: Vec3,
    /// Colour by result
    pub color: GizmoColor,
}

/// Result of one ground probe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundProbe {
    /// Ground classification
    pub grounded: bool,
    /// Hit, if any
    pub hit: Option<RayHit>,
    /// Debug segment
    pub gizmo: ProbeGizmo,
}

/// Probe origin for an actor at `position`.
#[inline]
pub fn probe_origin(position: Vec3, config: &LocomotionConfig) -> Vec3 {
    position + Vec3::UP * config.ray_offset
}

/// Cast the ground probe from the pre-movement `position`.
pub fn probe_ground<Q: GroundQuery + ?Sized>(
    query: &Q,
    position: Vec3,
    config: &LocomotionConfig,
) -> GroundProbe {
    let origin = probe_origin(position, config);
    let ray = Ray::new(origin, Vec3::DOWN);
    let hit = query.raycast(ray, config.ray_length, config.ground_mask);
    let grounded = hit.is_some();

    GroundProbe {
        grounded,
        hit,
        gizmo: ProbeGizmo {
            origin,
            end: ray.point_at(config.ray_length),
            color: if grounded { GizmoColor::Green } else { GizmoColor::Red },
        },
    }
}

// =============================================================================
// TESTS
// =============================================================================
