//! Path integrator.
//!
//! Implements iterative Monte Carlo path tracing:
//! - Throughput starts white and is tinted by every scatter event
//! - A miss sees the ambient environment and ends the path
//! - A light hit ends the path with its emission
//! - Paths still bouncing after [`MAX_BOUNCES`] keep their throughput

use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::material::{scatter, ScatterEvent};
use crate::sampler::Sampler;
use crate::tonemap::tone_map;
use crate::Ray;
use glint_core::FrameConfig;
use glint_math::Color;

/// Maximum number of surface interactions along one path.
pub const MAX_BOUNCES: u32 = 10;

/// Camera samples averaged per pixel per frame.
pub const SAMPLES_PER_PIXEL: u32 = 32;

/// Why a path stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Escaped to the ambient environment
    Miss,
    /// Hit an emitter
    Light,
    /// Ran out of bounces without terminating
    MaxDepth,
}

/// Result of tracing one path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub color: Color,
    pub termination: Termination,
    /// Surface interactions before the path ended
    pub bounces: u32,
}

/// Trace one path starting at `ray`.
///
/// Each bounce draws from `sampler.for_bounce(depth)`, so the whole path is
/// a pure function of the starting sampler.
pub fn trace_path(ray: &Ray, world: &dyn Hittable, config: &FrameConfig, sampler: &Sampler) -> PathSample {
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for depth in 0..MAX_BOUNCES {
        let rec = match world.intersect(&ray) {
            Some(rec) => rec,
            None => {
                return PathSample {
                    color: throughput * config.ambient_light_intensity,
                    termination: Termination::Miss,
                    bounces: depth,
                };
            }
        };

        match scatter(&ray, &rec, config, &sampler.for_bounce(depth)) {
            ScatterEvent::Emitted(emission) => {
                return PathSample {
                    color: throughput * emission,
                    termination: Termination::Light,
                    bounces: depth + 1,
                };
            }
            ScatterEvent::Scattered { ray: next, attenuation } => {
                throughput *= attenuation;
                ray = next;
            }
        }
    }

    // Unterminated paths are returned as-is rather than zeroed
    PathSample {
        color: throughput,
        termination: Termination::MaxDepth,
        bounces: MAX_BOUNCES,
    }
}

/// Compute the HDR color seen by a ray.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, config: &FrameConfig, sampler: &Sampler) -> Color {
    trace_path(ray, world, config, sampler).color
}

/// Mean HDR radiance of [`SAMPLES_PER_PIXEL`] independent paths through pixel (x, y).
pub fn render_pixel(camera: &Camera, world: &dyn Hittable, x: u32, y: u32, config: &FrameConfig) -> Color {
    let mut pixel_color = Color::ZERO;

    for sample in 0..SAMPLES_PER_PIXEL {
        let sampler = camera.sampler(x, y, sample);
        let ray = camera.get_ray_with(x, y, &sampler);
        pixel_color += ray_color(&ray, world, config, &sampler);
    }

    pixel_color / SAMPLES_PER_PIXEL as f32
}

/// Tone-mapped estimate of pixel (x, y) for this frame.
pub fn shade_pixel(camera: &Camera, world: &dyn Hittable, x: u32, y: u32, config: &FrameConfig) -> Color {
    tone_map(render_pixel(camera, world, x, y, config))
}
