use glam::Vec3;

use super::ray::Ray;

/// Result of triangle intersection test
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    pub t: f32,       // Distance along ray
    pub u: f32,       // Barycentric coordinate u
    pub v: f32,       // Barycentric coordinate v
    pub normal: Vec3, // Geometric normal, counter-clockwise winding
}

/// Möller-Trumbore ray-triangle intersection.
/// With `cull_backface` set, triangles seen from behind (clockwise from the
/// ray's point of view) are rejected.
pub fn intersect_triangle(
    ray: &Ray,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    cull_backface: bool,
) -> Option<TriangleHit> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Parallel to the plane, or facing away when culling
    if a.abs() < EPSILON || (cull_backface && a < 0.0) {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    if t < EPSILON {
        return None;
    }

    let normal = edge1.cross(edge2).normalize_or_zero();

    Some(TriangleHit { t, u, v, normal })
}
