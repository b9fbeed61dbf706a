//! Export naming and download preparation.

use crate::types::{ConvertedImage, Download, OutputFormat};

/// Fixed base name of every exported file.
pub const EXPORT_BASE_NAME: &str = "converted-image";

/// Filename for an export in `format`: the base name plus the literal
/// format token (`jpeg` and `jpg` are kept distinct).
#[must_use]
pub fn export_filename(format: OutputFormat) -> String {
    format!("{EXPORT_BASE_NAME}.{}", format.token())
}

/// Prepare a save of `converted` under its synthesized filename.
#[must_use]
pub fn prepare_download(converted: &ConvertedImage) -> Download {
    Download {
        filename: export_filename(converted.format),
        mime_type: converted.format.mime_type(),
        bytes: converted.bytes.clone(),
    }
}
