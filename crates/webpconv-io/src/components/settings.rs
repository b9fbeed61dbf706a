//! Output format and quality controls.

use dioxus::prelude::*;
use webpconv_core::{ConversionSettings, OutputFormat, Quality};

/// Props for the [`SettingsPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct SettingsPanelProps {
    /// Current settings (read-only).
    settings: ConversionSettings,
    /// Callback fired when either setting changes.
    on_change: EventHandler<ConversionSettings>,
}

/// Format picker and quality slider.
///
/// The slider range is 1..=100, so out-of-range qualities cannot be
/// entered. It stays enabled for PNG, where it has no effect, and a hint
/// says so.
#[component]
pub fn SettingsPanel(props: SettingsPanelProps) -> Element {
    let settings = props.settings;
    let on_change = props.on_change;

    let options: Vec<(&str, &str)> = OutputFormat::ALL
        .iter()
        .map(|f| (f.token(), f.label()))
        .collect();

    rsx! {
        div { class: "settings",
            {render_select(
                "output_format",
                "Output Format",
                &options,
                settings.format.token(),
                move |token: String| match token.parse::<OutputFormat>() {
                    Ok(format) => on_change.call(ConversionSettings { format, ..settings }),
                    Err(e) => log::warn!("format select: {e}"),
                },
            )}
            {render_slider(
                "quality",
                "Quality",
                if settings.format.supports_quality() {
                    ""
                } else {
                    "PNG is lossless; quality has no effect."
                },
                settings.quality,
                move |quality: Quality| on_change.call(ConversionSettings { quality, ..settings }),
            )}
        }
    }
}

/// Render the 1..=100 quality slider with its current value.
fn render_slider(
    id: &str,
    label: &str,
    description: &str,
    value: Quality,
    on_input: impl Fn(Quality) + 'static,
) -> Element {
    let id = id.to_string();
    let label = label.to_string();
    let description = description.to_string();
    let min = Quality::MIN.get();
    let max = Quality::MAX.get();

    rsx! {
        div { class: "field",
            div { class: "field__header",
                label { r#for: "{id}", class: "field__label", "{label}" }
                span { class: "field__value", "{value}" }
            }
            if !description.is_empty() {
                p { class: "field__description", "{description}" }
            }
            input {
                r#type: "range",
                id: "{id}",
                min: "{min}",
                max: "{max}",
                step: "1",
                value: "{value}",
                oninput: move |e| {
                    match e.value().parse::<i64>() {
                        Ok(v) => on_input(Quality::saturating(v)),
                        Err(err) => {
                            log::warn!("slider parse failure: {err:?} from {:?}", e.value());
                        }
                    }
                },
            }
        }
    }
}

/// Render a labeled `<select>`.
fn render_select(
    id: &str,
    label: &str,
    options: &[(&str, &str)],
    selected: &str,
    on_change: impl Fn(String) + 'static,
) -> Element {
    let id = id.to_string();
    let label = label.to_string();
    let options: Vec<(String, String)> = options
        .iter()
        .map(|(v, l)| ((*v).to_string(), (*l).to_string()))
        .collect();
    let selected = selected.to_string();

    rsx! {
        div { class: "field",
            label { r#for: "{id}", class: "field__label", "{label}" }
            select {
                id: "{id}",
                class: "field__select",
                value: "{selected}",
                onchange: move |e| {
                    on_change(e.value());
                },

                for (value, display) in options.iter() {
                    option {
                        value: "{value}",
                        selected: value == &selected,
                        "{display}"
                    }
                }
            }
        }
    }
}
