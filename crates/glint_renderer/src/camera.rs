//! Camera ray generation with depth of field.

use crate::sampler::{stream, Sampler};
use crate::Ray;
use glint_core::FrameConfig;
use glint_math::{Vec3, ViewBasis};
use std::f32::consts::TAU;

/// Per-frame camera built from a [`FrameConfig`].
///
/// The camera sits at `camera_position` looking at the world origin. Rays
/// aim at a focal plane `dof_focal_plane` units in front of the camera and
/// start from a point on a lens ring of radius `dof_radius`; a zero radius
/// gives a pinhole camera.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    position: Vec3,
    basis: ViewBasis,
    image_width: u32,
    image_height: u32,
    /// Vertical NDC scale (height / width)
    aspect_correction: f32,
    step: u32,
    dof_radius: f32,
    dof_focal_plane: f32,
}

impl Camera {
    /// Build the camera for one frame.
    pub fn new(config: &FrameConfig) -> Self {
        let image_width = config.image_width.max(1);
        let image_height = config.image_height.max(1);

        Self {
            position: config.camera_position,
            basis: ViewBasis::looking_at_origin(config.camera_position),
            image_width,
            image_height,
            aspect_correction: image_height as f32 / image_width as f32,
            step: config.step,
            dof_radius: config.dof_radius,
            dof_focal_plane: config.dof_focal_plane,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn basis(&self) -> &ViewBasis {
        &self.basis
    }

    /// Sampler for one camera sample of pixel (x, y) in this frame.
    #[inline]
    pub fn sampler(&self, x: u32, y: u32, sample: u32) -> Sampler {
        Sampler::for_pixel(x, y, self.image_width, sample, self.step)
    }

    /// Generate the ray for sample `sample` of pixel (x, y).
    pub fn get_ray(&self, x: u32, y: u32, sample: u32) -> Ray {
        self.get_ray_with(x, y, &self.sampler(x, y, sample))
    }

    /// Generate a ray for pixel (x, y) using the given sampler.
    pub fn get_ray_with(&self, x: u32, y: u32, sampler: &Sampler) -> Ray {
        let jitter_x = sampler.draw(stream::JITTER_X) - 0.5;
        let jitter_y = sampler.draw(stream::JITTER_Y) - 0.5;

        // Pixel rows grow downwards, NDC y grows upwards
        let ndc_x = 2.0 * (x as f32 + 0.5 + jitter_x) / self.image_width as f32 - 1.0;
        let ndc_y = (1.0 - 2.0 * (y as f32 + 0.5 + jitter_y) / self.image_height as f32) * self.aspect_correction;
        let view_dir = Vec3::new(ndc_x, ndc_y, -1.0);

        let lens_angle = sampler.draw(stream::LENS_ANGLE) * TAU;
        let (sin_a, cos_a) = lens_angle.sin_cos();
        let lens_offset = Vec3::new(cos_a, sin_a, 0.0) * self.dof_radius;

        let origin = self.position + self.basis.to_world(lens_offset);
        let target = self.position + self.basis.to_world(view_dir * self.dof_focal_plane);

        // A focal plane at the lens collapses target onto origin
        let direction = (target - origin)
            .try_normalize()
            .unwrap_or_else(|| self.basis.to_world(view_dir).normalize());

        Ray::new(origin, direction)
    }
}
