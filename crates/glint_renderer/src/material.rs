//! Surface scattering for each material kind.

use crate::hittable::HitRecord;
use crate::sampler::{stream, Sampler};
use crate::Ray;
use glint_core::{FrameConfig, MaterialKind};
use glint_math::{Color, Vec3};
use std::f32::consts::{PI, TAU};

/// Checkerboard frequency in UV space.
pub const CHECKER_FREQUENCY: f32 = 25.0;

/// Outcome of a ray hitting a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScatterEvent {
    /// The path continues along `ray`, tinted by `attenuation`.
    Scattered { ray: Ray, attenuation: Color },
    /// The path ends on an emitter.
    Emitted(Color),
}

impl ScatterEvent {
    /// Color multiplier applied to the path throughput.
    pub fn color(&self) -> Color {
        match *self {
            ScatterEvent::Scattered { attenuation, .. } => attenuation,
            ScatterEvent::Emitted(emission) => emission,
        }
    }

    /// Outgoing ray, if the path continues.
    pub fn ray(&self) -> Option<Ray> {
        match *self {
            ScatterEvent::Scattered { ray, .. } => Some(ray),
            ScatterEvent::Emitted(_) => None,
        }
    }

    /// True if the path ends here.
    pub fn terminates(&self) -> bool {
        matches!(self, ScatterEvent::Emitted(_))
    }
}

/// Scatter `ray_in` at `rec` according to the hit material.
///
/// Roughness, refractive index and light intensity are global per frame and
/// come from `config`. All randomness is drawn from `sampler`.
pub fn scatter(ray_in: &Ray, rec: &HitRecord, config: &FrameConfig, sampler: &Sampler) -> ScatterEvent {
    let albedo = rec.material.color;

    match rec.material.kind {
        MaterialKind::Lambert => ScatterEvent::Scattered {
            ray: diffuse(ray_in, rec, sampler),
            attenuation: albedo,
        },
        MaterialKind::LambertCheckerboard => ScatterEvent::Scattered {
            ray: diffuse(ray_in, rec, sampler),
            attenuation: albedo * checker(rec.u, rec.v),
        },
        MaterialKind::Metal => ScatterEvent::Scattered {
            ray: metal(ray_in, rec, config.metal_roughness, sampler),
            attenuation: albedo,
        },
        MaterialKind::Dielectric => ScatterEvent::Scattered {
            ray: dielectric(ray_in, rec, config.refractive_index, sampler),
            attenuation: albedo,
        },
        MaterialKind::Light => ScatterEvent::Emitted(albedo * config.sphere_lights_intensity),
    }
}

/// Two-tone checkerboard factor: 1 on light squares, 0 on dark ones.
pub fn checker(u: f32, v: f32) -> f32 {
    let s = (u * TAU * CHECKER_FREQUENCY).sin() * (v * PI * CHECKER_FREQUENCY).sin();
    if s > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Diffuse bounce: unit-ball sample offset along the normal.
fn diffuse(ray_in: &Ray, rec: &HitRecord, sampler: &Sampler) -> Ray {
    let normal = rec.facing_normal(ray_in);
    // Catch degenerate scatter direction
    let direction = (sampler.unit_ball() + normal).try_normalize().unwrap_or(normal);
    Ray::new(rec.p, direction)
}

/// Mirror reflection blurred by a roughness-scaled unit-ball sample.
fn metal(ray_in: &Ray, rec: &HitRecord, roughness: f32, sampler: &Sampler) -> Ray {
    let normal = rec.facing_normal(ray_in);
    let reflected = reflect(ray_in.direction().normalize(), normal);
    let direction = if roughness > 0.0 {
        (reflected + roughness * sampler.unit_ball())
            .try_normalize()
            .unwrap_or(reflected)
    } else {
        reflected
    };
    Ray::new(rec.p, direction)
}

/// Fresnel-weighted choice between reflection and refraction.
fn dielectric(ray_in: &Ray, rec: &HitRecord, refractive_index: f32, sampler: &Sampler) -> Ray {
    let unit_direction = ray_in.direction().normalize();

    // Exiting the sphere: flip the normal and invert the index ratio
    let (normal, ratio) = if unit_direction.dot(rec.normal) > 0.0 {
        (-rec.normal, refractive_index)
    } else {
        (rec.normal, 1.0 / refractive_index)
    };

    let cos_theta = (-unit_direction).dot(normal).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    let direction = if sampler.draw(stream::FRESNEL) < reflectance(cos_theta, ratio) {
        reflect(unit_direction, normal)
    } else if ratio * sin_theta >= 1.0 {
        // Total internal reflection
        reflect(unit_direction, normal)
    } else {
        refract(unit_direction, normal, cos_theta, ratio)
    };

    Ray::new(rec.p, direction)
}

/// Schlick's approximation for reflectance.
pub fn reflectance(cosine: f32, ratio: f32) -> f32 {
    let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
///
/// The caller must have ruled out total internal reflection.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, cos_theta: f32, ratio: f32) -> Vec3 {
    let r_out_perp = ratio * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    (r_out_perp + r_out_parallel).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::wang_hash;
    use glint_core::Material;

    fn record(material: Material, p: Vec3, normal: Vec3) -> HitRecord {
        HitRecord {
            t: 1.0,
            p,
            normal,
            material,
            u: 0.0,
            v: 0.5,
            index: 0,
        }
    }

    fn samplers(n: u32) -> impl Iterator<Item = Sampler> {
        (0..n).map(|i| Sampler::new(wang_hash(i.wrapping_mul(7919))))
    }

    #[test]
    fn test_checker_alternates_every_half_period() {
        let v = 0.02;
        let mut previous = checker(0.01, v);
        assert_eq!(previous, 1.0);

        for k in 1..20 {
            let u = 0.01 + k as f32 / 50.0;
            let s = checker(u, v);
            assert!(s == 0.0 || s == 1.0);
            assert_ne!(s, previous, "no alternation at u = {}", u);
            previous = s;
        }
    }

    #[test]
    fn test_checker_scales_albedo() {
        let config = FrameConfig::default();
        let mut rec = record(Material::checkerboard(Color::splat(0.2)), Vec3::Y, Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y);
        let sampler = Sampler::new(11);

        rec.u = 0.01;
        rec.v = 0.02;
        assert_eq!(scatter(&ray, &rec, &config, &sampler).color(), Color::splat(0.2));

        rec.u = 0.03;
        assert_eq!(scatter(&ray, &rec, &config, &sampler).color(), Color::ZERO);
    }

    #[test]
    fn test_lambert_scatters_into_upper_hemisphere() {
        let config = FrameConfig::default();
        let albedo = Color::new(0.1, 0.2, 0.3);
        let rec = record(Material::lambert(albedo), Vec3::Y, Vec3::Y);
        let ray = Ray::new(Vec3::new(0.3, 2.0, 0.0), Vec3::new(-0.3, -1.0, 0.0));

        for sampler in samplers(256) {
            let event = scatter(&ray, &rec, &config, &sampler);
            let out = event.ray().unwrap();

            assert_eq!(event.color(), albedo);
            assert_eq!(out.origin(), rec.p);
            assert!((out.direction().length() - 1.0).abs() < 1e-4);
            assert!(out.direction().dot(Vec3::Y) >= -1e-5);
        }
    }

    #[test]
    fn test_smooth_metal_is_mirror() {
        let config = FrameConfig {
            metal_roughness: 0.0,
            ..FrameConfig::default()
        };
        let rec = record(Material::metal(Color::splat(0.9)), Vec3::ZERO, Vec3::Y);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));

        let event = scatter(&ray, &rec, &config, &Sampler::new(5));
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();

        assert!((event.ray().unwrap().direction() - expected).length() < 1e-5);
        assert_eq!(event.color(), Color::splat(0.9));
        assert!(!event.terminates());
    }

    #[test]
    fn test_rough_metal_spreads() {
        let config = FrameConfig {
            metal_roughness: 0.5,
            ..FrameConfig::default()
        };
        let rec = record(Material::metal(Color::splat(0.9)), Vec3::ZERO, Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);

        let mut spread = false;
        for sampler in samplers(64) {
            let dir = scatter(&ray, &rec, &config, &sampler).ray().unwrap().direction();
            assert!((dir.length() - 1.0).abs() < 1e-4);
            // Within the roughness cone around the mirror direction
            assert!(dir.dot(Vec3::Y) >= (1.0 - 0.5f32.powi(2)).sqrt() - 1e-4);
            spread |= dir.dot(Vec3::Y) < 0.999;
        }
        assert!(spread);
    }

    #[test]
    fn test_light_terminates() {
        let config = FrameConfig {
            sphere_lights_intensity: 2.0,
            ..FrameConfig::default()
        };
        let rec = record(Material::light(Color::new(1.0, 2.0, 3.0)), Vec3::ZERO, Vec3::Y);
        let ray = Ray::new(Vec3::Y, Vec3::NEG_Y);

        let event = scatter(&ray, &rec, &config, &Sampler::new(1));
        assert!(event.terminates());
        assert!(event.ray().is_none());
        assert_eq!(event.color(), Color::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let config = FrameConfig {
            refractive_index: 1.5,
            ..FrameConfig::default()
        };
        // Inside a unit sphere, hitting its +X side at sin(incidence) = 0.9 > 1/1.5
        let rec = record(Material::dielectric(Color::ONE), Vec3::X, Vec3::X);
        let direction = Vec3::new((1.0f32 - 0.81).sqrt(), 0.9, 0.0);
        let ray = Ray::new(Vec3::X - direction, direction);
        let mirrored = Vec3::new(-direction.x, direction.y, 0.0);

        for sampler in samplers(512) {
            let out = scatter(&ray, &rec, &config, &sampler).ray().unwrap().direction();
            assert!((out - mirrored).length() < 1e-4, "refracted: {:?}", out);
        }
    }

    #[test]
    fn test_dielectric_normal_incidence_mostly_transmits() {
        let config = FrameConfig {
            refractive_index: 1.5,
            ..FrameConfig::default()
        };
        let rec = record(Material::dielectric(Color::ONE), Vec3::Z, Vec3::Z);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        let n = 4000;
        let mut reflected = 0;
        for sampler in samplers(n) {
            let out = scatter(&ray, &rec, &config, &sampler).ray().unwrap().direction();
            if out.z > 0.0 {
                assert!((out - Vec3::Z).length() < 1e-4);
                reflected += 1;
            } else {
                // Straight through at normal incidence
                assert!((out - Vec3::NEG_Z).length() < 1e-4);
            }
        }
        // Schlick r0 = 0.04
        let fraction = reflected as f32 / n as f32;
        assert!(fraction > 0.02 && fraction < 0.06, "reflected fraction {}", fraction);
    }

    #[test]
    fn test_refraction_bends_towards_normal() {
        let n = Vec3::Y;
        let incoming = Vec3::new(1.0, -1.0, 0.0).normalize();
        let cos_theta = (-incoming).dot(n);
        let out = refract(incoming, n, cos_theta, 1.0 / 1.5);

        assert!((out.length() - 1.0).abs() < 1e-5);
        // Snell: sin_out = sin_in / 1.5
        let sin_in = incoming.x;
        assert!((out.x - sin_in / 1.5).abs() < 1e-5);
        assert!(out.y < 0.0);
    }

    #[test]
    fn test_schlick() {
        assert!((reflectance(1.0, 1.0 / 1.5) - 0.04).abs() < 1e-5);
        assert!((reflectance(0.0, 1.0 / 1.5) - 1.0).abs() < 1e-5);
        assert!(reflectance(0.5, 1.5) > reflectance(0.9, 1.5));
    }
}
