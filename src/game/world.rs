//! Reference World
//!
//! Minimal engine-free collaborators so the controller can run headless:
//!
//! - [`StaticWorld`]: layered axis-aligned boxes with a ray query
//! - [`KinematicBody`]: box-shaped executor that sweeps one axis at a time
//!   and stops flush against solid geometry
//! - [`FixedViewpoint`]: camera yaw that can be changed from outside

use std::cell::Cell;
use std::sync::Arc;

use crate::core::vec3::Vec3;
use crate::game::collision::{
    GroundQuery, LayerMask, MoveOutcome, MovementExecutor, Ray, RayHit, Viewpoint,
};

/// Gap kept between a body and the surface it is stopped against.
pub const CONTACT_SKIN: f32 = 1e-4;

// =============================================================================
// AABB
// =============================================================================

/// Axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Box from two corners (any order).
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    /// Box from center and full size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// Strict overlap test (touching faces do not overlap).
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x
            && self.min.y < other.max.y && self.max.y > other.min.y
            && self.min.z < other.max.z && self.max.z > other.min.z
    }

    /// Ray entry distance within `max_distance` (slab method).
    ///
    /// A ray starting inside the box hits at distance 0.
    pub fn ray_distance(&self, ray: &Ray, max_distance: f32) -> Option<f32> {
        let dir = ray.direction;
        let inv = |d: f32| if d.abs() > 1e-6 { 1.0 / d } else { f32::MAX };
        let inv_dir = Vec3::new(inv(dir.x), inv(dir.y), inv(dir.z));

        let t1 = (self.min.x - ray.origin.x) * inv_dir.x;
        let t2 = (self.max.x - ray.origin.x) * inv_dir.x;
        let t3 = (self.min.y - ray.origin.y) * inv_dir.y;
        let t4 = (self.max.y - ray.origin.y) * inv_dir.y;
        let t5 = (self.min.z - ray.origin.z) * inv_dir.z;
        let t6 = (self.max.z - ray.origin.z) * inv_dir.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        if tmax < 0.0 || tmin > tmax {
            return None;
        }
        let t = tmin.max(0.0);
        (t <= max_distance).then_some(t)
    }
}

// =============================================================================
// STATIC WORLD
// =============================================================================

/// A solid box on one or more layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    /// Bounds
    pub bounds: Aabb,
    /// Layers this collider is on
    pub layers: LayerMask,
}

/// Immutable level geometry.
#[derive(Clone, Debug, Default)]
pub struct StaticWorld {
    colliders: Vec<Collider>,
}

impl StaticWorld {
    /// Empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a box; builder style.
    pub fn with_box(mut self, bounds: Aabb, layers: LayerMask) -> Self {
        self.colliders.push(Collider { bounds, layers });
        self
    }

    /// Add a flat slab whose top face sits at `top`.
    pub fn with_floor(self, top: f32, half_extent: f32, layers: LayerMask) -> Self {
        self.with_box(
            Aabb::new(
                Vec3::new(-half_extent, top - 1.0, -half_extent),
                Vec3::new(half_extent, top, half_extent),
            ),
            layers,
        )
    }

    /// All colliders.
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Colliders on `mask` overlapping `bounds`.
    pub fn overlapping<'a>(&'a self, bounds: &'a Aabb, mask: LayerMask) -> impl Iterator<Item = &'a Collider> + 'a {
        self.colliders
            .iter()
            .filter(move |c| c.layers.intersects(mask) && c.bounds.overlaps(bounds))
    }
}

impl GroundQuery for StaticWorld {
    fn raycast(&self, ray: Ray, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        self.colliders
            .iter()
            .filter(|c| c.layers.intersects(mask))
            .filter_map(|c| c.bounds.ray_distance(&ray, max_distance))
            .min_by(|a, b| a.total_cmp(b))
            .map(|distance| RayHit {
                distance,
                point: ray.point_at(distance),
            })
    }
}

// =============================================================================
// KINEMATIC BODY
// =============================================================================

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    fn get(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    #[inline]
    fn set(self, v: &mut Vec3, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
            Axis::Z => v.z = value,
        }
    }
}

/// Box-shaped body moved by displacement requests.
///
/// `position` is the center of the box's bottom face (the feet).
#[derive(Clone, Debug)]
pub struct KinematicBody {
    world: Arc<StaticWorld>,
    position: Vec3,
    half_width: f32,
    height: f32,
    solid_mask: LayerMask,
}

impl KinematicBody {
    /// Create a body of `half_width` x `height` at `position`.
    pub fn new(world: Arc<StaticWorld>, position: Vec3, half_width: f32, height: f32) -> Self {
        Self {
            world,
            position,
            half_width,
            height,
            solid_mask: LayerMask::ALL,
        }
    }

    /// Only collide with `mask`.
    pub fn with_solid_mask(mut self, mask: LayerMask) -> Self {
        self.solid_mask = mask;
        self
    }

    /// Teleport without collision.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Body bounds with feet at `feet`.
    pub fn bounds_at(&self, feet: Vec3) -> Aabb {
        Aabb {
            min: Vec3::new(feet.x - self.half_width, feet.y, feet.z - self.half_width),
            max: Vec3::new(feet.x + self.half_width, feet.y + self.height, feet.z + self.half_width),
        }
    }

    /// Move along one axis, stopping flush against the first obstacle.
    /// Returns true if something blocked the move.
    fn sweep_axis(&self, position: &mut Vec3, axis: Axis, delta: f32) -> bool {
        if delta == 0.0 {
            return false;
        }

        let start = axis.get(*position);
        let mut target = *position;
        axis.set(&mut target, start + delta);

        let start_bounds = self.bounds_at(*position);
        let bounds = self.bounds_at(target);
        let swept = Aabb::new(start_bounds.min.min(bounds.min), start_bounds.max.max(bounds.max));
        let offset_min = axis.get(bounds.min) - axis.get(target);
        let offset_max = axis.get(bounds.max) - axis.get(target);

        let mut end = start + delta;
        let mut blocked = false;
        for collider in self.world.overlapping(&swept, self.solid_mask) {
            // Already penetrating: let the body move out
            if collider.bounds.overlaps(&start_bounds) {
                continue;
            }
            let limit = if delta > 0.0 {
                (axis.get(collider.bounds.min) - offset_max - CONTACT_SKIN).max(start)
            } else {
                (axis.get(collider.bounds.max) - offset_min + CONTACT_SKIN).min(start)
            };
            if (delta > 0.0 && limit < end) || (delta < 0.0 && limit > end) {
                end = limit;
                blocked = true;
            }
        }

        axis.set(position, end);
        blocked
    }
}

impl MovementExecutor for KinematicBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn request_displacement(&mut self, displacement: Vec3) -> MoveOutcome {
        let start = self.position;
        let mut position = start;

        let blocked_below = self.sweep_axis(&mut position, Axis::Y, displacement.y) && displacement.y < 0.0;
        self.sweep_axis(&mut position, Axis::X, displacement.x);
        self.sweep_axis(&mut position, Axis::Z, displacement.z);

        self.position = position;
        MoveOutcome {
            requested: displacement,
            applied: position - start,
            blocked_below,
        }
    }
}

// =============================================================================
// VIEWPOINT
// =============================================================================

/// Camera yaw set from outside; share it through `Rc`.
#[derive(Debug, Default)]
pub struct FixedViewpoint {
    yaw: Cell<f32>,
}

impl FixedViewpoint {
    /// Viewpoint at `yaw` degrees.
    pub fn new(yaw: f32) -> Self {
        Self { yaw: Cell::new(yaw) }
    }

    /// Change the yaw.
    pub fn set_yaw(&self, yaw: f32) {
        self.yaw.set(yaw);
    }
}

impl Viewpoint for FixedViewpoint {
    fn yaw(&self) -> f32 {
        self.yaw.get()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: LayerMask = LayerMask::layer(3);
    const WALL: LayerMask = LayerMask::layer(4);

    fn level() -> Arc<StaticWorld> {
        Arc::new(
            StaticWorld::new()
                .with_floor(0.0, 50.0, GROUND)
                .with_box(
                    Aabb::new(Vec3::new(2.0, 0.0, -5.0), Vec3::new(3.0, 3.0, 5.0)),
                    WALL,
                ),
        )
    }

    #[test]
    fn test_aabb_ray_distance() {
        let b = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 0.0, 1.0));
        let down = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::DOWN);
        assert_eq!(b.ray_distance(&down, 1.0), Some(0.5));
        assert_eq!(b.ray_distance(&down, 0.4), None);

        let up = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::UP);
        assert_eq!(b.ray_distance(&up, 10.0), None);

        let inside = Ray::new(Vec3::new(0.0, -0.5, 0.0), Vec3::DOWN);
        assert_eq!(b.ray_distance(&inside, 1.0), Some(0.0));

        let beside = Ray::new(Vec3::new(5.0, 0.5, 0.0), Vec3::DOWN);
        assert_eq!(b.ray_distance(&beside, 10.0), None);
    }

    #[test]
    fn test_world_raycast_mask_and_nearest() {
        let world = StaticWorld::new()
            .with_floor(0.0, 10.0, GROUND)
            .with_floor(-2.0, 10.0, WALL);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::DOWN);

        let hit = world.raycast(ray, 10.0, LayerMask::ALL).unwrap();
        assert_eq!(hit.distance, 1.0);
        assert_eq!(hit.point, Vec3::ZERO);

        let hit = world.raycast(ray, 10.0, WALL).unwrap();
        assert_eq!(hit.distance, 3.0);

        assert!(world.raycast(ray, 10.0, LayerMask::layer(9)).is_none());
    }

    #[test]
    fn test_body_lands_flush_on_floor() {
        let mut body = KinematicBody::new(level(), Vec3::new(0.0, 0.5, 0.0), 0.25, 1.8);
        let outcome = body.request_displacement(Vec3::new(0.0, -2.0, 0.0));

        assert!(outcome.blocked_below);
        assert!(outcome.was_blocked());
        assert!((body.position().y - CONTACT_SKIN).abs() < 1e-6);
    }

    #[test]
    fn test_body_free_fall_is_unobstructed() {
        let mut body = KinematicBody::new(level(), Vec3::new(0.0, 5.0, 0.0), 0.25, 1.8);
        let outcome = body.request_displacement(Vec3::new(0.0, -1.0, 0.0));
        assert!(!outcome.blocked_below);
        assert!(!outcome.was_blocked());
        assert_eq!(body.position(), Vec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn test_body_stops_at_wall_but_slides_along() {
        let mut body = KinematicBody::new(level(), Vec3::new(0.0, 0.01, 0.0), 0.25, 1.8);
        let outcome = body.request_displacement(Vec3::new(5.0, 0.0, 1.0));

        let p = body.position();
        assert!((p.x - (2.0 - 0.25 - CONTACT_SKIN)).abs() < 1e-5, "x = {}", p.x);
        assert!((p.z - 1.0).abs() < 1e-6, "z should slide freely");
        assert!(outcome.was_blocked());
        assert!(!outcome.blocked_below);
    }

    #[test]
    fn test_body_ignores_layers_outside_solid_mask() {
        let mut body = KinematicBody::new(level(), Vec3::new(0.0, 0.01, 0.0), 0.25, 1.8)
            .with_solid_mask(GROUND);
        body.request_displacement(Vec3::new(5.0, 0.0, 0.0));
        assert!((body.position().x - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_viewpoint_shared_yaw() {
        let view = std::rc::Rc::new(FixedViewpoint::new(30.0));
        let handle = view.clone();
        handle.set_yaw(120.0);
        assert_eq!(view.yaw(), 120.0);
    }
}
