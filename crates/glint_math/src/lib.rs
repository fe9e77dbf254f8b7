// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod camera;
mod color;
mod interval;
mod ray;

pub use camera::{Orbit, ViewBasis, MIN_POLAR, MIN_RADIUS};
pub use color::{hsv_to_rgb, luminance, Color, LUMINANCE_WEIGHTS};
pub use interval::Interval;
pub use ray::Ray;
