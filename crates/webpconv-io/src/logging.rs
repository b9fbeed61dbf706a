//! `log` backend that writes to the browser console.
//!
//! Records at `error` and `warn` go to `console.error` / `console.warn`,
//! `info` to `console.info`, and `debug`/`trace` to `console.debug`.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

/// Console logger; install it once with [`init`].
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger with the given maximum level.
///
/// Calling this more than once keeps the first logger and only updates
/// the level.
pub fn init(level: LevelFilter) {
    // Errs only when a logger is already installed.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
