//! webpconv-io: Browser I/O and Dioxus component library.
//!
//! Handles file acquisition, Blob downloads, and console logging, and
//! provides the UI components for the webpconv web application.

pub mod components;
pub mod download;
pub mod logging;

pub use components::{ActionPanel, FileUpload, ImagePreview, SettingsPanel};
