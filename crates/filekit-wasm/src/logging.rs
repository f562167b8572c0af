//! Browser console logger.
//!
//! Routes `log` records from the core crate to `console.error`,
//! `console.warn`, `console.info` and `console.debug`.

use std::str::FromStr;

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use web_sys::console;

static LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&message),
            Level::Warn => console::warn_1(&message),
            Level::Info => console::info_1(&message),
            Level::Debug | Level::Trace => console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Later calls only change the level.
pub(crate) fn install(level: LevelFilter) {
    // set_logger fails once a logger is installed; the level still applies.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    LevelFilter::from_str(level.trim()).ok()
}

/// Set the log level: `off`, `error`, `warn`, `info`, `debug` or `trace`.
///
/// Search probes are logged at `debug`; pipeline summaries at `info`.
///
/// # Example
///
/// ```typescript
/// init_logging('debug');
/// ```
#[wasm_bindgen]
pub fn init_logging(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {:?}", level)))?;
    install(filter);
    Ok(())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_init_logging_sets_level() {
        init_logging("trace").unwrap();
        assert_eq!(log::max_level(), LevelFilter::Trace);
        log::debug!("console logger installed");

        init_logging("info").unwrap();
        assert_eq!(log::max_level(), LevelFilter::Info);
    }

    #[wasm_bindgen_test]
    fn test_init_logging_rejects_unknown_level() {
        assert!(init_logging("loud").is_err());
    }
}
