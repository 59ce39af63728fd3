//! Ray/primitive intersection tests.
//!
//! Both tests return the ray parameter `t` of the hit, or `None` on a miss.
//! Roots closer than [`HIT_EPSILON`] are ignored so a ray leaving a surface does not
//! immediately hit the surface it started on.

use glint_math::{Ray, Vec3};

/// Smallest ray parameter accepted as a hit.
pub const HIT_EPSILON: f32 = 1e-3;

/// Intersect a ray with a sphere by solving `|o + t*d - c|^2 = r^2`.
///
/// With two roots the smaller acceptable one wins, so a ray starting inside the
/// sphere reports the exit point.
pub fn intersect_sphere(center: Vec3, radius: f32, ray: &Ray) -> Option<f32> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    if discriminant == 0.0 {
        // Tangent ray
        let t = -b / (2.0 * a);
        return (t >= HIT_EPSILON).then_some(t);
    }

    let sqrtd = discriminant.sqrt();
    let near = (-b - sqrtd) / (2.0 * a);
    let far = (-b + sqrtd) / (2.0 * a);

    match (near >= HIT_EPSILON, far >= HIT_EPSILON) {
        (true, true) => Some(near.min(far)),
        (true, false) => Some(near),
        (false, true) => Some(far),
        (false, false) => None,
    }
}

/// Intersect a ray with a single-sided triangle.
///
/// The ray is intersected with the supporting plane, then the hit point is kept
/// only if the cross products against all three edges agree in sign. Rays that
/// approach the back face (the side the face normal points away from) miss.
pub fn intersect_triangle(a: Vec3, b: Vec3, c: Vec3, ray: &Ray) -> Option<f32> {
    let n = (b - a).cross(c - a);
    let denom = ray.direction.dot(n);

    // Parallel to the plane, or a degenerate (collinear) triangle
    if denom == 0.0 {
        return None;
    }

    let t = (a - ray.origin).dot(n) / denom;
    if t < HIT_EPSILON || n.dot(-ray.direction) < 0.0 {
        return None;
    }

    let p = ray.at(t);
    let v1 = (a - p).cross(b - p);
    let v2 = (b - p).cross(c - p);
    let v3 = (c - p).cross(a - p);

    if v1.dot(v2) >= 0.0 && v2.dot(v3) >= 0.0 && v3.dot(v1) >= 0.0 {
        Some(t)
    } else {
        None
    }
}

/// Outward unit normal of a sphere at a surface point.
#[inline]
pub fn sphere_normal(center: Vec3, point: Vec3) -> Vec3 {
    (point - center).normalize_or_zero()
}

/// Unit face normal of a triangle, following the `(b - a) x (c - a)` winding.
#[inline]
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}
