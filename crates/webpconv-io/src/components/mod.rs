//! Dioxus UI components for webpconv.
//!
//! Provides the upload drop zone, the format/quality settings panel,
//! image previews, and the convert/download action panel.

mod actions;
mod preview;
mod settings;
mod upload;

pub use actions::ActionPanel;
pub use preview::ImagePreview;
pub use settings::SettingsPanel;
pub use upload::FileUpload;
