//! Convert and download buttons.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdDownload, LdRefreshCw};

/// Props for the [`ActionPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ActionPanelProps {
    /// A source image is loaded; enables Convert.
    has_source: bool,
    /// A conversion is in flight.
    busy: bool,
    /// A converted image exists; enables Download.
    has_converted: bool,
    /// The converted image no longer matches the current settings.
    stale: bool,
    /// Message from the last failed conversion.
    failure: Option<String>,
    /// Fired when Convert is clicked.
    on_convert: EventHandler<()>,
    /// Fired when Download is clicked.
    on_download: EventHandler<()>,
}

/// Convert / Download buttons with the busy and stale indicators.
#[component]
pub fn ActionPanel(props: ActionPanelProps) -> Element {
    let can_convert = props.has_source && !props.busy;
    let convert_label = if props.busy { "Converting..." } else { "Convert" };

    let convert_class = if can_convert {
        "button button--primary"
    } else {
        "button button--disabled"
    };
    let download_class = if props.has_converted {
        "button button--primary"
    } else {
        "button button--disabled"
    };

    rsx! {
        div { class: "actions",
            div { class: "actions__buttons",
                button {
                    class: "{convert_class}",
                    disabled: !can_convert,
                    onclick: move |_| props.on_convert.call(()),
                    Icon { width: 16, height: 16, icon: LdRefreshCw }
                    span { "{convert_label}" }
                }
                button {
                    class: "{download_class}",
                    disabled: !props.has_converted,
                    onclick: move |_| props.on_download.call(()),
                    Icon { width: 16, height: 16, icon: LdDownload }
                    span { "Download" }
                }
            }

            if props.stale {
                p { class: "actions__hint",
                    "Settings changed since the last conversion. Convert again to apply them."
                }
            }

            if let Some(ref err) = props.failure {
                p { class: "actions__error", "{err}" }
            }
        }
    }
}
