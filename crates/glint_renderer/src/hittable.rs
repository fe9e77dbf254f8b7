//! Hittable trait and HitRecord for ray-scene intersection.

use crate::sphere::{hit_distance, sphere_uv, HIT_EPSILON};
use crate::Ray;
use glint_core::{Material, Scene};
use glint_math::{Interval, Vec3};

/// Record of a ray-sphere intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection, `origin + t * direction`
    pub p: Vec3,
    /// Outward unit surface normal
    pub normal: Vec3,
    /// Copy of the hit sphere's material
    pub material: Material,
    /// Longitude/latitude texture coordinates
    pub u: f32,
    pub v: f32,
    /// Index of the hit sphere
    pub index: usize,
}

impl HitRecord {
    /// Distance reported for "no hit" at the kernel boundary.
    pub const NO_HIT: f32 = -1.0;

    /// Whether the ray arrived from outside the surface.
    #[inline]
    pub fn front_face(&self, ray: &Ray) -> bool {
        ray.direction().dot(self.normal) < 0.0
    }

    /// The normal flipped to oppose the incoming ray.
    #[inline]
    pub fn facing_normal(&self, ray: &Ray) -> Vec3 {
        if self.front_face(ray) {
            self.normal
        } else {
            -self.normal
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest hit with t in `[ray_t.min, ray_t.max)`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;

    /// Nearest hit at least [`HIT_EPSILON`] along the ray.
    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        self.hit(ray, Interval::from_min(HIT_EPSILON))
    }

    /// Hit distance, or [`HitRecord::NO_HIT`] when nothing is hit.
    fn hit_distance(&self, ray: &Ray) -> f32 {
        self.intersect(ray).map_or(HitRecord::NO_HIT, |rec| rec.t)
    }
}

/// Brute-force intersection against every sphere in index order.
impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<(usize, f32)> = None;
        let mut closest_so_far = ray_t.max;

        for (index, sphere) in self.spheres().iter().enumerate() {
            let interval = Interval::new(ray_t.min, closest_so_far);
            if let Some(t) = hit_distance(sphere, ray, interval) {
                closest_so_far = t;
                closest = Some((index, t));
            }
        }

        let (index, t) = closest?;
        let sphere = &self.spheres()[index];
        let p = ray.at(t);
        let normal = (p - sphere.center).try_normalize().unwrap_or(Vec3::Y);
        let (u, v) = sphere_uv(normal);

        Some(HitRecord {
            t,
            p,
            normal,
            material: self.materials()[index],
            u,
            v,
            index,
        })
    }
}
