//! Tile-based frame dispatch.
//!
//! Divides the image into tiles that are rendered independently and in
//! parallel using rayon. Tiles read the previous frame from the shared
//! buffer, return their blended pixels, and are written back once every
//! tile has finished. Tile membership has no effect on the result.

use crate::accumulator::{accumulate, AccumulationBuffer};
use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::renderer::shade_pixel;
use glint_core::FrameConfig;
use glint_math::Color;
use rayon::prelude::*;

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 32;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of the tile's top-left corner
    pub x: u32,
    /// Y coordinate of the tile's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Index of this tile in row-major order
    pub index: usize,
}

impl Tile {
    /// Create a new tile.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Blended pixels of one tile, row-major within the tile.
#[derive(Debug, Clone)]
pub struct TileResult {
    pub tile: Tile,
    pub pixels: Vec<Color>,
}

impl TileResult {
    /// Create a new tile result.
    pub fn new(tile: Tile, pixels: Vec<Color>) -> Self {
        Self { tile, pixels }
    }
}

/// Cover a `width` x `height` image with tiles in row-major order.
///
/// Edge tiles are cropped when the tile size does not divide the image.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    let tile_size = tile_size.max(1);
    let mut tiles = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let tw = tile_size.min(width - x);
            let th = tile_size.min(height - y);
            tiles.push(Tile::new(x, y, tw, th, tiles.len()));
            x += tile_size;
        }
        y += tile_size;
    }

    tiles
}

/// Shade every pixel of `tile` and blend it with the previous frame.
pub fn render_tile(
    tile: &Tile,
    camera: &Camera,
    world: &dyn Hittable,
    config: &FrameConfig,
    previous: &AccumulationBuffer,
) -> TileResult {
    let mut pixels = Vec::with_capacity(tile.pixel_count() as usize);

    for local_y in 0..tile.height {
        for local_x in 0..tile.width {
            let x = tile.x + local_x;
            let y = tile.y + local_y;
            let color = shade_pixel(camera, world, x, y, config);
            pixels.push(accumulate(color, previous.get(x, y), config.step));
        }
    }

    TileResult::new(*tile, pixels)
}

/// Render one frame into `buffer`.
///
/// `config.step` must be the 1-based frame index of the current epoch; the
/// buffer must match the configured resolution.
pub fn render_frame(world: &dyn Hittable, config: &FrameConfig, buffer: &mut AccumulationBuffer, tile_size: u32) {
    debug_assert_eq!(
        (buffer.width(), buffer.height()),
        (config.image_width, config.image_height)
    );

    let camera = Camera::new(config);
    let tiles = generate_tiles(buffer.width(), buffer.height(), tile_size);

    let previous: &AccumulationBuffer = buffer;
    let results: Vec<TileResult> = tiles
        .par_iter()
        .map(|tile| render_tile(tile, &camera, world, config, previous))
        .collect();

    for result in results {
        let tile = result.tile;
        for (i, color) in result.pixels.into_iter().enumerate() {
            let i = i as u32;
            buffer.set(tile.x + i % tile.width, tile.y + i / tile.width, color);
        }
    }

    log::trace!("Frame {} dispatched as {} tiles", config.step, tiles.len());
}
