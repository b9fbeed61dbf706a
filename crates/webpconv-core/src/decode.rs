//! Source image decoding.
//!
//! Accepts raw image bytes and produces a [`DynamicImage`] bitmap. The
//! acquisition filter only advertises WebP; decoding attempts whatever
//! bytes it is given (WebP, PNG, JPEG, BMP).

use image::DynamicImage;

use crate::types::ConvertError;

/// Decode raw image bytes into a bitmap.
///
/// # Errors
///
/// Returns [`ConvertError::EmptyInput`] if `bytes` is empty.
/// Returns [`ConvertError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ConvertError> {
    if bytes.is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    image::load_from_memory(bytes).map_err(ConvertError::ImageDecode)
}

/// Guess the media type of encoded image bytes from their magic number.
///
/// Used only to label the displayable representation; falls back to
/// `application/octet-stream` for anything unrecognized.
#[must_use]
pub fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::WebP) => "image/webp",
        Ok(image::ImageFormat::Png) => "image/png",
        Ok(image::ImageFormat::Jpeg) => "image/jpeg",
        Ok(image::ImageFormat::Bmp) => "image/bmp",
        _ => "application/octet-stream",
    }
}
