//! File upload component with drag-and-drop and file picker.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use webpconv_core::{AcquireTicket, SourceImage};

/// Acceptance filter for the file picker. Advisory only: whatever the
/// user drops is still handed to the decoder.
const ACCEPT: &str = ".webp,image/webp";

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Whether a drag gesture is currently over the drop zone.
    dragging: bool,
    /// Name of the currently loaded source, if any.
    loaded: Option<String>,
    /// Called when a drag gesture enters (`true`) or leaves (`false`).
    on_drag_hover: EventHandler<bool>,
    /// Called before reading a file; returns the ticket to complete with.
    on_acquire_start: Callback<(), AcquireTicket>,
    /// Called once the read finishes. `None` means the read failed.
    on_acquired: EventHandler<(AcquireTicket, Option<SourceImage>)>,
}

/// A drag-and-drop zone with a file picker button.
///
/// Only the first file of a gesture is used. Read failures are logged
/// and reported as `None`; nothing is shown to the user.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    // Shared by the file-picker (`handle_files`) and drag-and-drop
    // (`handle_drop`) paths.
    let process_files = move |files: Vec<FileData>| async move {
        let Some(file) = files.first() else {
            return;
        };
        let ticket = props.on_acquire_start.call(());
        let name = file.name();
        let image = match file.read_bytes().await {
            Ok(bytes) => Some(SourceImage::new(Some(name), bytes.to_vec())),
            Err(e) => {
                log::warn!("failed to read {name}: {e}");
                None
            }
        };
        props.on_acquired.call((ticket, image));
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        props.on_drag_hover.call(false);
        process_files(evt.files()).await;
    };

    let zone_class = if props.dragging {
        "drop-zone drop-zone--active"
    } else {
        "drop-zone"
    };

    rsx! {
        div {
            class: "{zone_class}",
            ondragenter: move |evt| {
                evt.prevent_default();
                props.on_drag_hover.call(true);
            },
            ondragover: move |evt| {
                evt.prevent_default();
                if !props.dragging {
                    props.on_drag_hover.call(true);
                }
            },
            ondragleave: move |_| {
                props.on_drag_hover.call(false);
            },
            ondrop: handle_drop,

            if let Some(ref name) = props.loaded {
                p { class: "drop-zone__loaded", "Loaded: {name}" }
            }

            p { class: "drop-zone__hint", "Drop a WebP image here or " }

            label { class: "button button--primary",
                input {
                    r#type: "file",
                    accept: ACCEPT,
                    class: "hidden",
                    onchange: handle_files,
                }
                "Choose File"
            }
        }
    }
}
