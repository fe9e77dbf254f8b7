//! Ray-sphere intersection.

use crate::Ray;
use glint_core::Sphere;
use glint_math::{Interval, Vec3};
use std::f32::consts::{PI, TAU};

/// Minimum admissible hit distance; keeps bounced rays off their own surface.
pub const HIT_EPSILON: f32 = 0.001;

/// True if `t` lies in `[ray_t.min, ray_t.max)`.
///
/// The open upper end makes an exactly equal later hit lose to an earlier one.
#[inline]
pub fn admissible(t: f32, ray_t: Interval) -> bool {
    ray_t.min <= t && t < ray_t.max
}

/// Distance to the nearest admissible intersection of `ray` with `sphere`.
///
/// Solves `|o + t·d - c|² = r²`. The smaller root is preferred; when it is
/// inadmissible (behind the origin or closer than the epsilon) the larger
/// root is tried, which is how rays leaving the inside of a sphere find
/// their exit point.
pub fn hit_distance(sphere: &Sphere, ray: &Ray, ray_t: Interval) -> Option<f32> {
    let oc = ray.origin() - sphere.center;
    let d = ray.direction();

    let a = d.length_squared();
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * oc.dot(d);
    let c = oc.length_squared() - sphere.radius * sphere.radius;

    // Tangent rays count as misses
    let discriminant = b * b - 4.0 * a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    let near = (-b - sqrtd) / (2.0 * a);
    if admissible(near, ray_t) {
        return Some(near);
    }

    let far = (-b + sqrtd) / (2.0 * a);
    if admissible(far, ray_t) {
        return Some(far);
    }

    None
}

/// Longitude/latitude mapping of a unit normal.
///
/// u comes from `atan2(n.x, n.z)` and lies in [0, 1); v comes from
/// `asin(n.y)` and lies in [0, 1] with the equator at 0.5.
pub fn sphere_uv(normal: Vec3) -> (f32, f32) {
    let mut u = normal.x.atan2(normal.z) / TAU;
    if u < 0.0 {
        u += 1.0;
    }
    if u >= 1.0 {
        u = 0.0;
    }

    let v = normal.y.clamp(-1.0, 1.0).asin() / PI + 0.5;
    (u, v)
}
