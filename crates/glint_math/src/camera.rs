use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_4, PI};

/// Smallest polar angle the orbit may reach; keeps the view off the Y axis.
pub const MIN_POLAR: f32 = 0.02;

/// Closest the orbit may get to the origin.
pub const MIN_RADIUS: f32 = 0.1;

/// Orbit camera parameters around the world origin.
///
/// The host owns these and recomputes the camera position once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Orbit {
    /// Rotation around +Y in radians
    pub azimuth: f32,
    /// Angle down from +Y in radians
    pub polar: f32,
    /// Distance from the origin
    pub radius: f32,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            polar: FRAC_PI_4,
            radius: 10.0,
        }
    }
}

impl Orbit {
    /// Create a new orbit.
    pub fn new(azimuth: f32, polar: f32, radius: f32) -> Self {
        Self {
            azimuth,
            polar: polar.clamp(MIN_POLAR, PI),
            radius: radius.max(MIN_RADIUS),
        }
    }

    /// Camera position from spherical coordinates.
    pub fn position(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_pol, cos_pol) = self.polar.sin_cos();
        Vec3::new(sin_az * sin_pol, cos_pol, cos_az * sin_pol) * self.radius
    }

    /// Rotate the orbit. Polar is clamped so the view never aligns with Y.
    pub fn rotate(&mut self, d_azimuth: f32, d_polar: f32) {
        self.azimuth += d_azimuth;
        self.polar = (self.polar + d_polar).clamp(MIN_POLAR, PI);
    }

    /// Move towards (positive delta) or away from the origin.
    pub fn zoom(&mut self, delta: f32) {
        self.radius = (self.radius - delta).max(MIN_RADIUS);
    }
}

/// Orthonormal camera basis for a camera looking at the world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBasis {
    pub right: Vec3,
    pub up: Vec3,
    /// Direction the camera looks along (view-space -Z)
    pub forward: Vec3,
}

impl ViewBasis {
    /// Build the basis for a camera at `position` looking at the origin
    /// with world-up `(0, 1, 0)`.
    pub fn looking_at_origin(position: Vec3) -> Self {
        let forward = (-position).try_normalize().unwrap_or(Vec3::NEG_Z);
        let right = forward
            .cross(Vec3::Y)
            .try_normalize()
            // Looking straight up or down: any horizontal right vector works
            .unwrap_or(Vec3::X);
        let up = right.cross(forward);

        Self { right, up, forward }
    }

    /// View-to-world rotation matrix (columns: right, up, back).
    pub fn matrix(&self) -> Mat3 {
        Mat3::from_cols(self.right, self.up, -self.forward)
    }

    /// Transform a view-space vector into world space.
    #[inline]
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.right * v.x + self.up * v.y - self.forward * v.z
    }
}
