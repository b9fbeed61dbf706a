//! Image preview for the source and converted images.

use dioxus::prelude::*;

/// Props for the [`ImagePreview`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ImagePreviewProps {
    /// Heading shown above the image.
    title: String,
    /// Displayable representation (a `data:` URL).
    src: String,
    /// Caption under the image, e.g. dimensions and size.
    caption: String,
}

/// Renders one image scaled to fit its column, aspect ratio preserved.
#[component]
pub fn ImagePreview(props: ImagePreviewProps) -> Element {
    rsx! {
        figure { class: "preview",
            h3 { class: "preview__title", "{props.title}" }
            img {
                class: "preview__image",
                src: "{props.src}",
                alt: "{props.title}",
            }
            figcaption { class: "preview__caption", "{props.caption}" }
        }
    }
}
