//! Progressive frame accumulation.
//!
//! The output buffer holds the running mean of every frame rendered since
//! the last reset. Frame `k` (1-based) blends as `new / k + old * (k - 1) / k`,
//! so the first frame of an epoch discards whatever the buffer held.

use crate::tonemap::color_to_rgba;
use glint_math::Color;

/// Blend a frame's pixel into the running mean at step `step`.
#[inline]
pub fn accumulate(new: Color, old: Color, step: u32) -> Color {
    let k = step.max(1) as f32;
    new / k + old * ((k - 1.0) / k)
}

/// Persistent RGBA32F output image.
///
/// Pixels are stored row-major with alpha fixed at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulationBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl AccumulationBuffer {
    /// Create a new buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the RGB value at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        let [r, g, b, _] = self.pixels[self.index(x, y)];
        Color::new(r, g, b)
    }

    /// Set the pixel at (x, y) with alpha 1.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = [color.x, color.y, color.z, 1.0];
    }

    /// Raw RGBA texels, row-major.
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Texel data as bytes, e.g. for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Texel data as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Gamma-encoded 8-bit RGBA for display or saving.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for &[r, g, b, _] in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(Color::new(r, g, b)));
        }
        bytes
    }
}
