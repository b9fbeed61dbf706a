use dioxus::prelude::*;
use webpconv_core::{
    AcquireTicket, ConversionSettings, ConvertedImage, ConverterState, SourceImage,
};
use webpconv_io::{ActionPanel, FileUpload, ImagePreview, SettingsPanel};

fn main() {
    webpconv_io::logging::init(log::LevelFilter::Info);
    dioxus::launch(app);
}

/// Root application component.
///
/// Owns the single [`ConverterState`] signal and wires the upload,
/// settings, preview, and action components to its transitions.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Application state ---
    let mut state = use_signal(ConverterState::default);

    // Displayable representations, rebuilt only when the images change.
    let source_url = use_memo(move || state.read().source().map(SourceImage::display_url));
    let converted_url = use_memo(move || state.read().converted().map(ConvertedImage::display_url));

    // --- Acquisition handlers ---
    let on_drag_hover = move |hovering: bool| {
        state.write().set_drag_hover(hovering);
    };

    let on_acquire_start = move |()| state.write().begin_acquire();

    let on_acquired = move |(ticket, image): (AcquireTicket, Option<SourceImage>)| {
        state.write().complete_acquire(ticket, image);
    };

    // --- Settings handler ---
    let on_settings_change = move |settings: ConversionSettings| {
        state.write().set_settings(settings);
    };

    // --- Convert handler ---
    // Spawns an async task so the busy indicator renders before the
    // synchronous decode/encode work blocks the thread.
    let on_convert = move |()| {
        let Some(request) = state.write().begin_convert() else {
            return;
        };

        spawn(async move {
            // Yield to the browser event loop so it can paint the
            // "Converting..." state before we block on the encoder.
            gloo_timers::future::TimeoutFuture::new(0).await;

            let ticket = request.ticket;
            let outcome = request.run();

            // A newer acquisition or conversion makes this result stale;
            // the state discards it.
            state.write().complete_convert(ticket, outcome);
        });
    };

    // --- Download handler ---
    let on_download = move |()| {
        let Some(download) = state.read().export() else {
            return;
        };
        if let Err(e) = webpconv_io::download::save(&download) {
            log::error!("download failed: {e}");
        }
    };

    // --- Derived view data ---
    let snapshot = state.read();
    let settings = snapshot.settings();
    let dragging = snapshot.is_drag_hover();
    let busy = snapshot.is_busy();
    let stale = snapshot.is_stale();
    let failure = snapshot.last_failure().map(str::to_owned);
    let loaded = snapshot
        .source()
        .map(|s| s.name.clone().unwrap_or_else(|| "image".to_owned()));
    let source_caption = snapshot
        .source()
        .map(|s| format!("{} bytes", s.bytes.len()))
        .unwrap_or_default();
    let converted_caption = snapshot
        .converted()
        .map(|c| {
            format!(
                "{} · {} · {} bytes",
                c.format.label(),
                c.dimensions,
                c.bytes.len()
            )
        })
        .unwrap_or_default();
    let has_source = snapshot.source().is_some();
    let has_converted = snapshot.converted().is_some();
    drop(snapshot);

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/main.css") }

        div { class: "app",
            header { class: "app__header",
                h1 { "webpconv" }
                p { "Convert WebP images to JPEG or PNG in your browser. Nothing is uploaded." }
            }

            div { class: "app__body",
                // Left column: previews
                div { class: "app__previews",
                    if let Some(src) = source_url() {
                        ImagePreview {
                            title: "Original".to_string(),
                            src,
                            caption: source_caption,
                        }
                        if let Some(converted) = converted_url() {
                            ImagePreview {
                                title: "Converted".to_string(),
                                src: converted,
                                caption: converted_caption,
                            }
                        }
                    } else {
                        p { class: "app__placeholder", "Choose a WebP image to get started" }
                    }
                }

                // Right sidebar: settings + actions
                div { class: "app__sidebar",
                    SettingsPanel {
                        settings,
                        on_change: on_settings_change,
                    }
                    ActionPanel {
                        has_source,
                        busy,
                        has_converted,
                        stale,
                        failure,
                        on_convert,
                        on_download,
                    }
                }
            }

            FileUpload {
                dragging,
                loaded,
                on_drag_hover,
                on_acquire_start,
                on_acquired,
            }
        }
    }
}
