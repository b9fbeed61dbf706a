//! Stage-by-stage conversion: decode, allocate a raster surface, draw,
//! re-encode.
//!
//! Each stage method consumes `self` and returns the next state (or
//! `Result` for fallible stages), so a later step can never run before
//! the one it depends on:
//!
//! ```rust
//! # use webpconv_core::{ConversionSettings, ConvertError, Pending};
//! # fn run(webp: Vec<u8>) -> Result<(), ConvertError> {
//! let converted = Pending::new(webp, ConversionSettings::default())
//!     .decode()?
//!     .allocate_surface()?
//!     .draw()
//!     .encode()?;
//! # Ok(())
//! # }
//! ```
//!
//! The raster surface is allocated fresh for every conversion and
//! dropped when [`Drawn::encode`] returns.

use image::{DynamicImage, RgbaImage};

use crate::types::{ConversionSettings, ConvertError, ConvertedImage, Dimensions};

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Conversion state before any work has happened.
#[must_use = "conversion stages are consumed by advancing; call .decode() to continue"]
pub struct Pending {
    settings: ConversionSettings,
    source: Vec<u8>,
}

impl Pending {
    /// Capture the source bytes and the settings active at invocation.
    pub const fn new(source: Vec<u8>, settings: ConversionSettings) -> Self {
        Self { settings, source }
    }

    /// The raw source image bytes.
    #[must_use]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Decode the source into a bitmap and advance to [`Decoded`].
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::EmptyInput`] if the source bytes are
    /// empty. Returns [`ConvertError::ImageDecode`] if the image
    /// format is unrecognized or the data is corrupt.
    pub fn decode(self) -> Result<Decoded, ConvertError> {
        let bitmap = crate::decode::decode(&self.source)?;
        log::debug!(
            "decoded {} source bytes into {}x{} bitmap",
            self.source.len(),
            bitmap.width(),
            bitmap.height(),
        );
        Ok(Decoded {
            settings: self.settings,
            bitmap,
        })
    }
}

// ───────────────────────── Stage 1: Decoded ──────────────────────────

/// Conversion state after decoding.
#[must_use = "conversion stages are consumed by advancing; call .allocate_surface() to continue"]
pub struct Decoded {
    settings: ConversionSettings,
    bitmap: DynamicImage,
}

impl Decoded {
    /// The decoded bitmap.
    #[must_use]
    pub const fn bitmap(&self) -> &DynamicImage {
        &self.bitmap
    }

    /// Native bitmap size.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.bitmap.width(),
            height: self.bitmap.height(),
        }
    }

    /// Allocate a blank raster surface of the bitmap's exact size.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidDimensions`] if the bitmap has
    /// zero width or height.
    pub fn allocate_surface(self) -> Result<Surface, ConvertError> {
        let Dimensions { width, height } = self.dimensions();
        if width == 0 || height == 0 {
            return Err(ConvertError::InvalidDimensions { width, height });
        }
        Ok(Surface {
            settings: self.settings,
            bitmap: self.bitmap,
            surface: RgbaImage::new(width, height),
        })
    }
}

// ───────────────────────── Stage 2: Surface ──────────────────────────

/// A blank raster surface sized to the bitmap, not yet drawn on.
#[must_use = "conversion stages are consumed by advancing; call .draw() to continue"]
pub struct Surface {
    settings: ConversionSettings,
    bitmap: DynamicImage,
    surface: RgbaImage,
}

impl Surface {
    /// The blank surface (fully transparent).
    #[must_use]
    pub const fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Draw the bitmap onto the surface once, at the origin.
    pub fn draw(self) -> Drawn {
        let Self {
            settings,
            bitmap,
            mut surface,
        } = self;
        image::imageops::replace(&mut surface, &bitmap.into_rgba8(), 0, 0);
        Drawn { settings, surface }
    }
}

// ───────────────────────── Stage 3: Drawn ────────────────────────────

/// The surface holding the bitmap's pixels, ready to re-encode.
#[must_use = "conversion stages are consumed by advancing; call .encode() to continue"]
pub struct Drawn {
    settings: ConversionSettings,
    surface: RgbaImage,
}

impl Drawn {
    /// The drawn surface.
    #[must_use]
    pub const fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Re-encode the surface with the captured settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Encode`] if the encoder fails.
    pub fn encode(self) -> Result<ConvertedImage, ConvertError> {
        let ConversionSettings { format, quality } = self.settings;
        let bytes = crate::encode::encode(&self.surface, format, quality)?;
        log::debug!(
            "encoded {}x{} surface as {format} (quality factor {:.2}): {} bytes",
            self.surface.width(),
            self.surface.height(),
            quality.factor(),
            bytes.len(),
        );
        Ok(ConvertedImage {
            format,
            quality,
            dimensions: Dimensions {
                width: self.surface.width(),
                height: self.surface.height(),
            },
            bytes,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{OutputFormat, Quality};

    fn png_with_alpha(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, _| {
            if x % 2 == 0 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 128])
            }
        });
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn surface_matches_bitmap_size_and_starts_blank() {
        let surface = Pending::new(png_with_alpha(7, 3), ConversionSettings::default())
            .decode()
            .unwrap()
            .allocate_surface()
            .unwrap();
        assert_eq!(surface.surface().dimensions(), (7, 3));
        assert!(surface.surface().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn draw_copies_every_pixel() {
        let source = png_with_alpha(6, 4);
        let expected = image::load_from_memory(&source).unwrap().to_rgba8();
        let drawn = Pending::new(source, ConversionSettings::default())
            .decode()
            .unwrap()
            .allocate_surface()
            .unwrap()
            .draw();
        assert_eq!(drawn.surface(), &expected);
    }

    #[test]
    fn encode_tags_output_with_captured_settings() {
        let settings = ConversionSettings {
            format: OutputFormat::Jpg,
            quality: Quality::new(40).unwrap(),
        };
        let converted = Pending::new(png_with_alpha(5, 5), settings)
            .decode()
            .unwrap()
            .allocate_surface()
            .unwrap()
            .draw()
            .encode()
            .unwrap();
        assert_eq!(converted.settings(), settings);
        assert_eq!(
            converted.dimensions,
            Dimensions {
                width: 5,
                height: 5
            }
        );
    }

    #[test]
    fn decode_failure_stops_before_surface() {
        let result = Pending::new(b"garbage".to_vec(), ConversionSettings::default()).decode();
        assert!(matches!(result, Err(ConvertError::ImageDecode(_))));
    }
}
