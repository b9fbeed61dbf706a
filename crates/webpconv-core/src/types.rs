//! Shared types for the webpconv conversion flow.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// User-selectable output format.
///
/// `Jpeg` and `Jpg` are presentational aliases: both produce the same
/// JPEG encoding and differ only in the token used for the exported
/// file extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JPEG encoding, exported with the `.jpeg` extension.
    #[default]
    Jpeg,
    /// JPEG encoding, exported with the `.jpg` extension.
    Jpg,
    /// Lossless PNG encoding.
    Png,
}

/// The encoder actually invoked for an [`OutputFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    /// Lossy JPEG; honours the quality factor.
    Jpeg,
    /// Lossless PNG; quality is accepted and ignored.
    Png,
}

impl OutputFormat {
    /// All formats in the order they are offered to the user.
    pub const ALL: [Self; 3] = [Self::Jpeg, Self::Jpg, Self::Png];

    /// The literal format token, used verbatim as the export extension.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Jpg => "jpg",
            Self::Png => "png",
        }
    }

    /// Display label for the format picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Jpg => "JPG",
            Self::Png => "PNG",
        }
    }

    /// The underlying encoder for this format.
    #[must_use]
    pub const fn encoding(self) -> Encoding {
        match self {
            Self::Jpeg | Self::Jpg => Encoding::Jpeg,
            Self::Png => Encoding::Png,
        }
    }

    /// MIME type of the encoded output.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self.encoding() {
            Encoding::Jpeg => "image/jpeg",
            Encoding::Png => "image/png",
        }
    }

    /// Whether the quality setting has any effect on the output.
    #[must_use]
    pub const fn supports_quality(self) -> bool {
        matches!(self.encoding(), Encoding::Jpeg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.token().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConvertError::UnknownFormat(s.to_owned()))
    }
}

/// Output quality on the user-facing 1–100 scale.
///
/// Invariant: the wrapped value is always within
/// [`MIN`](Self::MIN)..=[`MAX`](Self::MAX).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    /// Lowest selectable quality.
    pub const MIN: Self = Self(1);

    /// Highest selectable quality.
    pub const MAX: Self = Self(100);

    /// Quality used when nothing has been selected yet.
    pub const DEFAULT: Self = Self(92);

    /// Create a quality value, rejecting anything outside 1..=100.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidQuality`] for out-of-range values.
    pub fn new(value: u8) -> Result<Self, ConvertError> {
        if value < Self::MIN.0 || value > Self::MAX.0 {
            return Err(ConvertError::InvalidQuality(value));
        }
        Ok(Self(value))
    }

    /// Create a quality value, clamping into 1..=100 the way a range
    /// input does.
    #[must_use]
    pub fn saturating(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));
        // Clamped into 1..=100 above.
        Self(u8::try_from(clamped).unwrap_or(Self::DEFAULT.0))
    }

    /// The raw 1–100 value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The encoder's fractional quality factor (`value / 100`).
    #[must_use]
    pub fn factor(self) -> f32 {
        f32::from(self.0) / 100.0
    }

    /// Integer quality handed to the JPEG encoder, derived from
    /// [`factor`](Self::factor).
    #[must_use]
    pub fn encoder_quality(self) -> u8 {
        let scaled = (self.factor() * 100.0).round();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let scaled = scaled as u8;
        scaled.clamp(Self::MIN.0, Self::MAX.0)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Quality {
    type Error = ConvertError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> Self {
        q.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output format and quality chosen by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSettings {
    /// Selected output format.
    pub format: OutputFormat,
    /// Selected output quality.
    pub quality: Quality,
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A user-supplied input image awaiting conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImage {
    /// Original filename, when the acquisition path provides one.
    pub name: Option<String>,
    /// The full encoded file contents.
    pub bytes: Vec<u8>,
}

impl SourceImage {
    /// Wrap raw file bytes.
    #[must_use]
    pub const fn new(name: Option<String>, bytes: Vec<u8>) -> Self {
        Self { name, bytes }
    }

    /// Self-contained `data:` URL suitable for an `<img src>`.
    #[must_use]
    pub fn display_url(&self) -> String {
        crate::display::data_url(crate::decode::sniff_mime_type(&self.bytes), &self.bytes)
    }
}

/// The tagged output of one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedImage {
    /// Format active when the conversion was invoked.
    pub format: OutputFormat,
    /// Quality active when the conversion was invoked.
    pub quality: Quality,
    /// Pixel dimensions of the raster surface.
    pub dimensions: Dimensions,
    /// Encoded output bytes.
    pub bytes: Vec<u8>,
}

impl ConvertedImage {
    /// The settings this image was produced under.
    #[must_use]
    pub const fn settings(&self) -> ConversionSettings {
        ConversionSettings {
            format: self.format,
            quality: self.quality,
        }
    }

    /// Self-contained `data:` URL suitable for an `<img src>`.
    #[must_use]
    pub fn display_url(&self) -> String {
        crate::display::data_url(self.format.mime_type(), &self.bytes)
    }
}

/// A prepared client-side save: what to write and under which name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Destination filename, e.g. `converted-image.png`.
    pub filename: String,
    /// MIME type of `bytes`.
    pub mime_type: &'static str,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Errors that can occur while converting an image.
///
/// Uses custom `Serialize`/`Deserialize` because `image::ImageError`
/// does not implement serde traits. Image errors are carried as their
/// `Display` string.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[source] image::ImageError),

    /// The decoded image has no pixels, so no raster surface can be made.
    #[error("cannot allocate a {width}x{height} raster surface")]
    InvalidDimensions {
        /// Decoded width.
        width: u32,
        /// Decoded height.
        height: u32,
    },

    /// The encoder rejected the raster surface.
    #[error("failed to encode {format}: {message}")]
    Encode {
        /// Target format.
        format: OutputFormat,
        /// Encoder error message.
        message: String,
    },

    /// Quality outside 1..=100.
    #[error("quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    /// Unrecognized format token.
    #[error("unknown output format {0:?} (expected jpeg, jpg, or png)")]
    UnknownFormat(String),
}

/// Serde-compatible proxy for `ConvertError`.
#[derive(Serialize, Deserialize)]
enum ConvertErrorProxy {
    EmptyInput,
    ImageDecode(String),
    InvalidDimensions { width: u32, height: u32 },
    Encode { format: OutputFormat, message: String },
    InvalidQuality(u8),
    UnknownFormat(String),
}

impl Serialize for ConvertError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let proxy = match self {
            Self::EmptyInput => ConvertErrorProxy::EmptyInput,
            Self::ImageDecode(e) => ConvertErrorProxy::ImageDecode(e.to_string()),
            Self::InvalidDimensions { width, height } => ConvertErrorProxy::InvalidDimensions {
                width: *width,
                height: *height,
            },
            Self::Encode { format, message } => ConvertErrorProxy::Encode {
                format: *format,
                message: message.clone(),
            },
            Self::InvalidQuality(q) => ConvertErrorProxy::InvalidQuality(*q),
            Self::UnknownFormat(s) => ConvertErrorProxy::UnknownFormat(s.clone()),
        };
        proxy.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConvertError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = ConvertErrorProxy::deserialize(deserializer)?;
        Ok(match proxy {
            ConvertErrorProxy::EmptyInput => Self::EmptyInput,
            // The typed image error cannot be rebuilt; keep its message.
            ConvertErrorProxy::ImageDecode(msg) => {
                Self::ImageDecode(image::ImageError::IoError(std::io::Error::other(msg)))
            }
            ConvertErrorProxy::InvalidDimensions { width, height } => {
                Self::InvalidDimensions { width, height }
            }
            ConvertErrorProxy::Encode { format, message } => Self::Encode { format, message },
            ConvertErrorProxy::InvalidQuality(q) => Self::InvalidQuality(q),
            ConvertErrorProxy::UnknownFormat(s) => Self::UnknownFormat(s),
        })
    }
}
