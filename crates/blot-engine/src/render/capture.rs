//! Raster capture: premultiplied pixel buffers to encoded images.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};

/// Converts premultiplied RGBA8 to a straight-alpha image.
pub(crate) fn to_rgba_image(width: u32, height: u32, premul: &[u8]) -> Result<RgbaImage> {
    let expected = width as usize * height as usize * 4;
    anyhow::ensure!(
        premul.len() == expected,
        "pixel buffer is {} bytes, expected {expected} for {width}x{height}",
        premul.len()
    );

    let mut straight = premul.to_vec();
    for px in straight.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 {
            px[..3].fill(0);
        } else if a < 255 {
            for c in &mut px[..3] {
                *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
            }
        }
    }

    RgbaImage::from_raw(width, height, straight).context("building image from pixel buffer")
}

/// Writes the raster to `path`, picking the encoder from the extension.
///
/// Formats without alpha (JPEG) get the color channels only.
pub(crate) fn write_file(path: &Path, width: u32, height: u32, premul: &[u8]) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("unsupported image extension: {}", path.display()))?;
    let image = DynamicImage::ImageRgba8(to_rgba_image(width, height, premul)?);

    let image = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(image.to_rgb8())
    } else {
        image
    };

    image
        .save_with_format(path, format)
        .with_context(|| format!("writing {}", path.display()))?;
    log::debug!("saved {width}x{height} raster to {}", path.display());
    Ok(())
}

/// PNG-encodes the raster.
pub(crate) fn encode_png(width: u32, height: u32, premul: &[u8]) -> Result<Vec<u8>> {
    let image = to_rgba_image(width, height, premul)?;
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("encoding PNG")?;
    Ok(bytes)
}
