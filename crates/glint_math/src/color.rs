//! Color helpers shared by the renderer and the scene layout.

use crate::Vec3;

/// RGB color (linear, unbounded for emitters).
pub type Color = Vec3;

/// Rec. 709 luminance weights.
pub const LUMINANCE_WEIGHTS: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// Perceptual luminance of a linear RGB color.
#[inline]
pub fn luminance(color: Color) -> f32 {
    color.dot(LUMINANCE_WEIGHTS)
}

/// Convert HSV to RGB.
///
/// `hue` is in degrees (wrapped into [0, 360)), `saturation` and `value` in [0, 1].
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Color {
    let h = hue.rem_euclid(360.0) / 60.0;
    let chroma = value * saturation;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let m = value - chroma;

    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    Color::new(r + m, g + m, b + m)
}
