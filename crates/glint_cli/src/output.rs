//! Writing the accumulation buffer to image files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glint_renderer::AccumulationBuffer;
use image::codecs::hdr::HdrEncoder;
use image::{DynamicImage, ImageBuffer, Rgb, Rgba32FImage, RgbaImage};

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// True if `path` names a floating-point image format.
pub fn is_float_format(path: &Path) -> bool {
    matches!(extension(path).as_deref(), Some("exr") | Some("hdr"))
}

/// Write the buffer to `path`, picking the pixel format from the extension.
///
/// `.exr` and `.hdr` get the raw 32-bit float values; anything else is
/// gamma encoded to 8 bits.
pub fn write_image(buffer: &AccumulationBuffer, path: &Path) -> Result<()> {
    let (width, height) = (buffer.width(), buffer.height());

    if extension(path).as_deref() == Some("hdr") {
        write_hdr(buffer, path).with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Wrote {}x{} image to {}", width, height, path.display());
        return Ok(());
    }

    let image = if is_float_format(path) {
        let pixels: Rgba32FImage = ImageBuffer::from_raw(width, height, buffer.as_floats().to_vec())
            .context("Buffer size does not match its resolution")?;
        DynamicImage::ImageRgba32F(pixels)
    } else {
        let pixels: RgbaImage = ImageBuffer::from_raw(width, height, buffer.to_rgba8())
            .context("Buffer size does not match its resolution")?;
        DynamicImage::ImageRgba8(pixels)
    };

    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!("Wrote {}x{} image to {}", width, height, path.display());
    Ok(())
}

/// Radiance RGBE output. `DynamicImage::save` has no encoder for it.
fn write_hdr(buffer: &AccumulationBuffer, path: &Path) -> Result<()> {
    // RGBE has no alpha channel
    let pixels: Vec<Rgb<f32>> = buffer.pixels().iter().map(|&[r, g, b, _]| Rgb([r, g, b])).collect();

    let mut writer = BufWriter::new(File::create(path)?);
    HdrEncoder::new(&mut writer).encode(&pixels, buffer.width() as usize, buffer.height() as usize)?;
    writer.flush()?;
    Ok(())
}

/// Path for the snapshot taken after `frame`: `render.png` -> `render_0016.png`.
pub fn snapshot_path(output: &Path, frame: u32) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "glint".to_string());

    let name = match output.extension() {
        Some(ext) => format!("{}_{:04}.{}", stem, frame, ext.to_string_lossy()),
        None => format!("{}_{:04}", stem, frame),
    };
    output.with_file_name(name)
}
