//! Render settings and per-frame configuration snapshots.
//!
//! [`RenderSettings`] is what the host edits (sliders, settings file).
//! [`FrameConfig`] is the immutable block the kernel reads for one dispatch.

use std::fs;
use std::path::Path;

use glint_math::{Interval, Orbit, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::LayoutOptions;

/// Errors that can occur while loading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Tile size {tile} does not evenly divide resolution {width}x{height}")]
    TileSize { tile: u32, width: u32, height: u32 },

    #[error("Setting '{0}' is not a finite number")]
    NonFinite(&'static str),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Slider range for the ambient light intensity.
pub const AMBIENT_RANGE: Interval = Interval::new(0.0, 20.0);
/// Slider range for the sphere light multiplier.
pub const LIGHTS_RANGE: Interval = Interval::new(0.0, 20.0);
/// Slider range for metal roughness.
pub const ROUGHNESS_RANGE: Interval = Interval::new(0.0, 1.0);
/// Slider range for the dielectric refractive index.
pub const REFRACTIVE_INDEX_RANGE: Interval = Interval::new(0.5, 2.0);
/// Slider range for the depth-of-field aperture radius.
pub const DOF_RADIUS_RANGE: Interval = Interval::new(0.0, 0.2);
/// Slider range for the depth-of-field focal distance.
pub const DOF_FOCAL_RANGE: Interval = Interval::new(0.0, 20.0);

/// Host-side render settings.
///
/// Any change to a field other than `orbit` starts a new render epoch; an
/// `orbit` change moves the camera, which resets accumulation on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Dispatch tile edge in pixels; must divide width and height
    pub tile_size: u32,

    pub ambient_light_intensity: f32,
    pub sphere_lights_intensity: f32,
    pub metal_roughness: f32,
    pub refractive_index: f32,
    pub dof_radius: f32,
    pub dof_focal_plane: f32,

    /// Initial camera orbit
    pub orbit: Orbit,
    /// Scene generation options
    pub layout: LayoutOptions,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            tile_size: 32,
            ambient_light_intensity: 15.0,
            sphere_lights_intensity: 1.0,
            metal_roughness: 0.0,
            refractive_index: 1.5,
            dof_radius: 0.0,
            dof_focal_plane: 8.0,
            orbit: Orbit::default(),
            layout: LayoutOptions::default(),
        }
    }
}

impl RenderSettings {
    /// Load and validate settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Parse and validate settings from a JSON string.
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let settings: RenderSettings = serde_json::from_str(text)?;
        settings.validated()
    }

    /// Serialize settings as pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write settings as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        fs::write(path.as_ref(), self.to_json()?)?;
        Ok(())
    }

    /// Check structural constraints and clamp tunables into their slider ranges.
    pub fn validated(mut self) -> ConfigResult<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        if self.tile_size == 0 || self.width % self.tile_size != 0 || self.height % self.tile_size != 0 {
            return Err(ConfigError::TileSize {
                tile: self.tile_size,
                width: self.width,
                height: self.height,
            });
        }

        let orbit = self.orbit;
        clamp_tunable("ambient_light_intensity", &mut self.ambient_light_intensity, AMBIENT_RANGE)?;
        clamp_tunable("sphere_lights_intensity", &mut self.sphere_lights_intensity, LIGHTS_RANGE)?;
        clamp_tunable("metal_roughness", &mut self.metal_roughness, ROUGHNESS_RANGE)?;
        clamp_tunable("refractive_index", &mut self.refractive_index, REFRACTIVE_INDEX_RANGE)?;
        clamp_tunable("dof_radius", &mut self.dof_radius, DOF_RADIUS_RANGE)?;
        clamp_tunable("dof_focal_plane", &mut self.dof_focal_plane, DOF_FOCAL_RANGE)?;

        if !(orbit.azimuth.is_finite() && orbit.polar.is_finite() && orbit.radius.is_finite()) {
            return Err(ConfigError::NonFinite("orbit"));
        }
        self.orbit = Orbit::new(orbit.azimuth, orbit.polar, orbit.radius);

        Ok(self)
    }

    /// True if switching from `self` to `other` changes anything besides the orbit.
    pub fn requires_reset(&self, other: &RenderSettings) -> bool {
        let RenderSettings {
            width,
            height,
            tile_size,
            ambient_light_intensity,
            sphere_lights_intensity,
            metal_roughness,
            refractive_index,
            dof_radius,
            dof_focal_plane,
            orbit: _,
            layout,
        } = self;

        *width != other.width
            || *height != other.height
            || *tile_size != other.tile_size
            || *ambient_light_intensity != other.ambient_light_intensity
            || *sphere_lights_intensity != other.sphere_lights_intensity
            || *metal_roughness != other.metal_roughness
            || *refractive_index != other.refractive_index
            || *dof_radius != other.dof_radius
            || *dof_focal_plane != other.dof_focal_plane
            || *layout != other.layout
    }

    /// True if switching from `self` to `other` moves the camera.
    pub fn camera_moved(&self, other: &RenderSettings) -> bool {
        self.orbit != other.orbit
    }

    /// True if switching from `self` to `other` requires a new scene layout.
    pub fn requires_new_scene(&self, other: &RenderSettings) -> bool {
        self.layout != other.layout
    }

    /// True if the output buffer has to be reallocated.
    pub fn resolution_changed(&self, other: &RenderSettings) -> bool {
        self.width != other.width || self.height != other.height
    }
}

fn clamp_tunable(name: &'static str, value: &mut f32, range: Interval) -> ConfigResult<()> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite(name));
    }
    if !range.contains(*value) {
        let clamped = range.clamp(*value);
        log::warn!(
            "{} = {} is outside [{}, {}], clamping to {}",
            name,
            value,
            range.min,
            range.max,
            clamped
        );
        *value = clamped;
    }
    Ok(())
}

/// Immutable configuration block read by every kernel invocation of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameConfig {
    pub camera_position: Vec3,
    /// Frame counter for this dispatch; 1 on the first frame of an epoch
    pub step: u32,
    pub image_width: u32,
    pub image_height: u32,
    pub ambient_light_intensity: f32,
    pub sphere_lights_intensity: f32,
    pub metal_roughness: f32,
    pub refractive_index: f32,
    pub dof_radius: f32,
    pub dof_focal_plane: f32,
}

impl FrameConfig {
    /// Snapshot the settings for one frame.
    pub fn new(settings: &RenderSettings, camera_position: Vec3, step: u32) -> Self {
        Self {
            camera_position,
            step: step.max(1),
            image_width: settings.width,
            image_height: settings.height,
            ambient_light_intensity: settings.ambient_light_intensity,
            sphere_lights_intensity: settings.sphere_lights_intensity,
            metal_roughness: settings.metal_roughness,
            refractive_index: settings.refractive_index,
            dof_radius: settings.dof_radius,
            dof_focal_plane: settings.dof_focal_plane,
        }
    }

    /// Same configuration with a different step.
    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step.max(1);
        self
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.image_width as f32 / self.image_height as f32
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        let settings = RenderSettings::default();
        Self::new(&settings, settings.orbit.position(), 1)
    }
}
