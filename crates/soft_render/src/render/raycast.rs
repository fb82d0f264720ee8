//! Ray/triangle intersection
//!
//! Brute-force nearest-hit search over an unordered triangle list: every
//! triangle's supporting plane is intersected, hits behind the origin are
//! dropped, and the survivors are kept only if they pass a same-side
//! containment test against all three edges.

use crate::foundation::math::Vec3;

use super::scene::Triangle;

/// Below this |normal . direction| the ray counts as parallel to the plane
pub const PARALLEL_EPSILON: f32 = 1.0e-6;

/// Slack allowed on the containment test so shared edges are not missed
pub const CONTAINMENT_EPSILON: f32 = 1.0e-6;

/// A ray for casting into the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray
    pub origin: Vec3,
    /// Direction of the ray (normalized on construction)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Closest intersection found by [`cast_ray`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Index of the hit triangle in the scene list
    pub triangle: usize,
    /// Ray parameter of the hit
    pub distance: f32,
    /// Intersection point
    pub point: Vec3,
    /// Unit face normal of the hit triangle
    pub normal: Vec3,
}

/// Ray parameter where the ray meets the plane through `point_on_plane` with
/// normal `normal`.
///
/// `None` when the ray runs parallel to the plane or the plane lies behind
/// (or exactly at) the origin.
pub fn intersect_plane(ray: &Ray, point_on_plane: &Vec3, normal: &Vec3) -> Option<f32> {
    let denom = normal.dot(&ray.direction);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = normal.dot(&(point_on_plane - ray.origin)) / denom;
    (t > 0.0).then_some(t)
}

/// Same-side test: `point` (assumed on the triangle's plane) lies inside or on
/// the boundary of the triangle with face normal `normal`
pub fn point_in_triangle(vertices: &[Vec3; 3], normal: &Vec3, point: &Vec3) -> bool {
    (0..3).all(|i| {
        let a = vertices[i];
        let b = vertices[(i + 1) % 3];
        (b - a).cross(&(point - a)).dot(normal) >= -CONTAINMENT_EPSILON
    })
}

/// Nearest triangle hit by `ray`, or `None` when nothing qualifies.
///
/// Ties keep the first triangle encountered. Degenerate (zero-area)
/// triangles are skipped.
pub fn cast_ray(ray: &Ray, triangles: &[Triangle]) -> Option<RayHit> {
    let mut best: Option<RayHit> = None;

    for (index, triangle) in triangles.iter().enumerate() {
        let Some(normal) = triangle.face_normal() else {
            continue;
        };
        let Some(t) = intersect_plane(ray, &triangle.positions[0], &normal) else {
            continue;
        };
        if best.is_some_and(|hit| t >= hit.distance) {
            continue;
        }

        let point = ray.point_at(t);
        if point_in_triangle(&triangle.positions, &normal, &point) {
            best = Some(RayHit {
                triangle: index,
                distance: t,
                point,
                normal,
            });
        }
    }

    best
}
