//! Ray queries against a collision world.
//!
//! Contact labeling only needs one question answered: does a short ray hit
//! anything on the selected layers? [`CollisionQuery`] is that seam. Engine
//! integrations implement it over their physics scene; [`CollisionWorld`] is
//! a small analytic implementation (planes, boxes, spheres) for offline use
//! and tests. Any `Fn(&Ray, f64, LayerMask) -> bool` closure is also a
//! query.
//!
//! # Example
//!
//! ```
//! use motion_contact::{Collider, CollisionQuery, CollisionWorld, LayerMask, Ray};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut world = CollisionWorld::new();
//! world.add(Collider::ground(0.0, 8));
//!
//! let ray = Ray::new(Point3::new(0.0, 0.15, 0.0), -Vector3::y());
//! assert!(world.raycast(&ray, 0.2, LayerMask::layer(8)));
//! assert!(!world.raycast(&ray, 0.1, LayerMask::layer(8)));
//! assert!(!world.raycast(&ray, 0.2, LayerMask::layer(0)));
//! ```

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::layer::LayerMask;

/// A ray defined by an origin point and a direction vector.
///
/// The direction does not need to be normalized, but must be non-zero.
/// Queries measure distances along the normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin of the ray.
    pub origin: Point3<f64>,
    /// The direction of the ray (not necessarily normalized).
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Creates a new ray with the given origin and direction.
    #[must_use]
    pub const fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    /// Returns the point along the ray at parameter `t`.
    ///
    /// The point is computed as `origin + t * direction`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// Returns a copy with a unit-length direction, or `None` if the
    /// direction is zero or not finite.
    #[must_use]
    pub fn normalized(&self) -> Option<Self> {
        let norm = self.direction.norm();
        if !norm.is_finite() || norm < f64::EPSILON {
            return None;
        }
        Some(Self {
            origin: self.origin,
            direction: self.direction / norm,
        })
    }
}

/// Answers "does this ray hit anything on these layers within this distance".
///
/// Implementations must be synchronous and must not mutate the scene. The
/// `Sync` bound lets contact sampling cast rays for many frames in parallel.
pub trait CollisionQuery: Sync {
    /// Returns true if `ray` hits a collider on a layer in `mask` within
    /// `max_distance` (measured along the normalized direction).
    fn raycast(&self, ray: &Ray, max_distance: f64, mask: LayerMask) -> bool;
}

impl<F> CollisionQuery for F
where
    F: Fn(&Ray, f64, LayerMask) -> bool + Sync,
{
    fn raycast(&self, ray: &Ray, max_distance: f64, mask: LayerMask) -> bool {
        self(ray, max_distance, mask)
    }
}

/// Collision geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Infinite plane through `point` with the given normal. Two-sided.
    Plane {
        /// Any point on the plane.
        point: Point3<f64>,
        /// Plane normal (not necessarily normalized).
        normal: Vector3<f64>,
    },
    /// Solid axis-aligned box.
    Aabb {
        /// Minimum corner.
        min: Point3<f64>,
        /// Maximum corner.
        max: Point3<f64>,
    },
    /// Solid sphere.
    Sphere {
        /// Center of the sphere.
        center: Point3<f64>,
        /// Radius of the sphere.
        radius: f64,
    },
}

impl Shape {
    /// Creates an AABB; corners may be given in any order.
    #[must_use]
    pub fn aabb(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self::Aabb {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Distance along a unit-direction ray to the first intersection.
    ///
    /// A ray starting inside a solid shape hits at distance 0.
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        match *self {
            Self::Plane { point, normal } => intersect_plane(ray, &point, &normal),
            Self::Aabb { min, max } => intersect_aabb(ray, &min, &max),
            Self::Sphere { center, radius } => intersect_sphere(ray, &center, radius),
        }
    }
}

fn intersect_plane(ray: &Ray, point: &Point3<f64>, normal: &Vector3<f64>) -> Option<f64> {
    let offset = normal.dot(&(point - ray.origin));
    let denom = normal.dot(&ray.direction);
    if denom.abs() < f64::EPSILON {
        // Parallel: only a ray lying in the plane touches it.
        return (offset.abs() < f64::EPSILON).then_some(0.0);
    }
    let t = offset / denom;
    (t >= 0.0).then_some(t)
}

fn intersect_aabb(ray: &Ray, min: &Point3<f64>, max: &Point3<f64>) -> Option<f64> {
    let mut t_enter = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        if dir.abs() < f64::EPSILON {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let t1 = (min[axis] - origin) / dir;
        let t2 = (max[axis] - origin) / dir;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }

    if t_exit < t_enter || t_exit < 0.0 {
        return None;
    }
    Some(t_enter.max(0.0))
}

fn intersect_sphere(ray: &Ray, center: &Point3<f64>, radius: f64) -> Option<f64> {
    let oc = ray.origin - center;
    let c = radius.mul_add(-radius, oc.norm_squared());
    if c <= 0.0 {
        return Some(0.0);
    }
    let b = oc.dot(&ray.direction);
    let disc = b.mul_add(b, -c);
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// A shape on a collision layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// The geometry.
    pub shape: Shape,
    /// Layer index in `0..32`.
    pub layer: u8,
}

impl Collider {
    /// Creates a collider.
    #[must_use]
    pub const fn new(shape: Shape, layer: u8) -> Self {
        Self { shape, layer }
    }

    /// Horizontal ground plane at height `y` (Y up).
    #[must_use]
    pub fn ground(y: f64, layer: u8) -> Self {
        Self::new(
            Shape::Plane {
                point: Point3::new(0.0, y, 0.0),
                normal: Vector3::y(),
            },
            layer,
        )
    }
}

/// Nearest hit reported by [`CollisionWorld::cast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Index of the collider in the world.
    pub collider: usize,
    /// Distance along the normalized ray.
    pub distance: f64,
    /// World-space hit point.
    pub point: Point3<f64>,
}

/// A flat list of layered colliders.
///
/// Boxes and spheres are solid: a ray whose origin lies inside one hits it at
/// distance 0. Planes are two-sided. Physics engines that skip colliders
/// containing the ray origin will report fewer contacts for a sensor buried
/// in a box or sphere; wrap such an engine in a [`CollisionQuery`] to keep
/// its behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionWorld {
    colliders: Vec<Collider>,
}

impl CollisionWorld {
    /// Creates an empty world.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            colliders: Vec::new(),
        }
    }

    /// Adds a collider and returns its index.
    pub fn add(&mut self, collider: Collider) -> usize {
        self.colliders.push(collider);
        self.colliders.len() - 1
    }

    /// Builder-style [`add`](Self::add).
    #[must_use]
    pub fn with(mut self, collider: Collider) -> Self {
        self.colliders.push(collider);
        self
    }

    /// All colliders.
    #[must_use]
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Number of colliders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Returns true if the world has no colliders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Nearest hit on a layer in `mask` within `max_distance`.
    #[must_use]
    pub fn cast(&self, ray: &Ray, max_distance: f64, mask: LayerMask) -> Option<RayHit> {
        let ray = ray.normalized()?;
        self.colliders
            .iter()
            .enumerate()
            .filter(|(_, c)| mask.contains_layer(c.layer))
            .filter_map(|(i, c)| c.shape.intersect(&ray).map(|t| (i, t)))
            .filter(|&(_, t)| t <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(collider, distance)| RayHit {
                collider,
                distance,
                point: ray.point_at(distance),
            })
    }
}

impl CollisionQuery for CollisionWorld {
    fn raycast(&self, ray: &Ray, max_distance: f64, mask: LayerMask) -> bool {
        self.cast(ray, max_distance, mask).is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ray_point_at() {
        let ray = Ray::new(Point3::origin(), Vector3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(ray.point_at(3.0).x, 6.0);
    }

    #[test]
    fn ray_normalized() {
        let ray = Ray::new(Point3::origin(), Vector3::new(3.0, 4.0, 0.0));
        let unit = ray.normalized().unwrap();
        assert_relative_eq!(unit.direction.norm(), 1.0);
        assert!(Ray::new(Point3::origin(), Vector3::zeros()).normalized().is_none());
    }

    #[test]
    fn plane_hit_from_either_side() {
        let ground = Collider::ground(0.0, 0).shape;
        let down = Ray::new(Point3::new(0.0, 2.0, 0.0), -Vector3::y());
        let up = Ray::new(Point3::new(0.0, -2.0, 0.0), Vector3::y());
        assert_relative_eq!(ground.intersect(&down).unwrap(), 2.0);
        assert_relative_eq!(ground.intersect(&up).unwrap(), 2.0);
    }

    #[test]
    fn plane_behind_ray_misses() {
        let ground = Collider::ground(0.0, 0).shape;
        let up = Ray::new(Point3::new(0.0, 1.0, 0.0), Vector3::y());
        assert!(ground.intersect(&up).is_none());
    }

    #[test]
    fn aabb_hit_and_inside() {
        let shape = Shape::aabb(Point3::new(1.0, 1.0, 1.0), Point3::new(-1.0, -1.0, -1.0));
        let outside = Ray::new(Point3::new(-5.0, 0.0, 0.0), Vector3::x());
        assert_relative_eq!(shape.intersect(&outside).unwrap(), 4.0);

        let inside = Ray::new(Point3::origin(), Vector3::x());
        assert_eq!(shape.intersect(&inside), Some(0.0));

        let miss = Ray::new(Point3::new(-5.0, 3.0, 0.0), Vector3::x());
        assert!(shape.intersect(&miss).is_none());
    }

    #[test]
    fn sphere_hit_and_miss() {
        let shape = Shape::Sphere {
            center: Point3::new(0.0, 0.0, 5.0),
            radius: 1.0,
        };
        let hit = Ray::new(Point3::origin(), Vector3::z());
        assert_relative_eq!(shape.intersect(&hit).unwrap(), 4.0);

        let behind = Ray::new(Point3::origin(), -Vector3::z());
        assert!(shape.intersect(&behind).is_none());

        let inside = Ray::new(Point3::new(0.0, 0.0, 5.5), Vector3::x());
        assert_eq!(shape.intersect(&inside), Some(0.0));
    }

    #[test]
    fn world_respects_mask_and_distance() {
        let world = CollisionWorld::new()
            .with(Collider::ground(0.0, 3))
            .with(Collider::new(
                Shape::Sphere {
                    center: Point3::new(0.0, 0.5, 0.0),
                    radius: 0.25,
                },
                4,
            ));

        let ray = Ray::new(Point3::new(0.0, 2.0, 0.0), Vector3::new(0.0, -10.0, 0.0));

        let hit = world.cast(&ray, 10.0, LayerMask::ALL).unwrap();
        assert_eq!(hit.collider, 1);
        assert_relative_eq!(hit.distance, 1.25);
        assert_relative_eq!(hit.point.y, 0.75);

        let hit = world.cast(&ray, 10.0, LayerMask::layer(3)).unwrap();
        assert_eq!(hit.collider, 0);

        assert!(!world.raycast(&ray, 1.0, LayerMask::ALL));
        assert!(!world.raycast(&ray, 10.0, LayerMask::NONE));
    }

    #[test]
    fn world_reports_origin_inside_solid() {
        let world = CollisionWorld::new().with(Collider::new(
            Shape::aabb(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0)),
            0,
        ));
        let buried = Ray::new(Point3::origin(), -Vector3::y());
        let hit = world.cast(&buried, 0.1, LayerMask::ALL).unwrap();
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.point, Point3::origin());
    }

    #[test]
    fn closure_is_a_query() {
        let always = |_: &Ray, _: f64, mask: LayerMask| !mask.is_empty();
        let ray = Ray::new(Point3::origin(), Vector3::x());
        assert!(always.raycast(&ray, 1.0, LayerMask::ALL));
        assert!(!always.raycast(&ray, 1.0, LayerMask::NONE));
    }
}
