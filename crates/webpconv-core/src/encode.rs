//! Re-encoding of the raster surface into the selected output format.
//!
//! JPEG output honours the quality factor and has no alpha channel, so
//! translucent pixels are composited onto black first (what an opaque
//! canvas export produces). PNG output is lossless RGBA and ignores
//! quality.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::types::{ConvertError, Encoding, OutputFormat, Quality};

/// Encode `surface` as `format` at `quality`.
///
/// # Errors
///
/// Returns [`ConvertError::Encode`] if the underlying encoder fails.
pub fn encode(
    surface: &RgbaImage,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>, ConvertError> {
    let result = match format.encoding() {
        Encoding::Jpeg => encode_jpeg(surface, quality),
        Encoding::Png => encode_png(surface),
    };
    result.map_err(|e| ConvertError::Encode {
        format,
        message: e.to_string(),
    })
}

fn encode_jpeg(surface: &RgbaImage, quality: Quality) -> Result<Vec<u8>, image::ImageError> {
    let rgb = flatten_onto_black(surface);
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.encoder_quality());
    encoder.write_image(
        &rgb,
        surface.width(),
        surface.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buffer.into_inner())
}

fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new(&mut buffer);
    encoder.write_image(
        surface.as_raw(),
        surface.width(),
        surface.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(buffer)
}

/// Drop the alpha channel, scaling each colour channel by its alpha.
fn flatten_onto_black(surface: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(surface.as_raw().len() / 4 * 3);
    for p in surface.pixels() {
        let [r, g, b, a] = p.0;
        for c in [r, g, b] {
            let v = (u16::from(c) * u16::from(a) + 127) / 255;
            #[expect(clippy::cast_possible_truncation)]
            rgb.push(v as u8);
        }
    }
    rgb
}
