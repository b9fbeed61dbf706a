//! webpconv-core: WebP to JPEG/PNG conversion (sans-IO).
//!
//! Converts an encoded source image into a new encoding through:
//! decode -> raster surface allocation -> draw -> re-encode.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. All browser/filesystem
//! interaction lives in `webpconv-io` and the front-end binaries.

pub mod decode;
pub mod display;
pub mod encode;
pub mod export;
pub mod pipeline;
pub mod state;
pub mod types;

pub use export::{EXPORT_BASE_NAME, export_filename};
pub use pipeline::{Decoded, Drawn, Pending, Surface};
pub use state::{AcquireTicket, ConvertRequest, ConvertTicket, ConverterState};
pub use types::{
    ConversionSettings, ConvertError, ConvertedImage, Dimensions, Download, Encoding,
    OutputFormat, Quality, SourceImage,
};

/// Run the full conversion flow.
///
/// Takes raw image bytes (WebP, or anything else the decoder accepts)
/// and the settings to encode with, and produces a [`ConvertedImage`]
/// tagged with those settings.
///
/// # Steps
///
/// 1. Decode the source into a bitmap
/// 2. Allocate a raster surface of the bitmap's exact size
/// 3. Draw the bitmap onto the surface at the origin
/// 4. Re-encode the surface in the selected format and quality
///
/// # Errors
///
/// Returns [`ConvertError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`ConvertError::ImageDecode`] if the image cannot be decoded.
/// Returns [`ConvertError::InvalidDimensions`] for zero-area images.
/// Returns [`ConvertError::Encode`] if the encoder fails.
pub fn convert(
    image_bytes: &[u8],
    settings: &ConversionSettings,
) -> Result<ConvertedImage, ConvertError> {
    Pending::new(image_bytes.to_vec(), *settings)
        .decode()?
        .allocate_surface()?
        .draw()
        .encode()
}
