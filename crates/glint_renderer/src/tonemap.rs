//! Tone mapping and display conversion.

use glint_math::{luminance, Color};

/// Luminance-based Reinhard operator: `c / (L(c) + 1)`.
///
/// Hue is preserved and black stays black. Bright saturated colors may
/// still exceed 1 in one channel; display conversion clamps them.
#[inline]
pub fn tone_map(color: Color) -> Color {
    color / (luminance(color) + 1.0)
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a tone-mapped color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * clamp_01(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * clamp_01(linear_to_gamma(color.z))) as u8;
    [r, g, b, 255]
}
