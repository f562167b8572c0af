//! Filekit WASM - WebAssembly bindings for Filekit
//!
//! This crate provides WASM bindings to expose the filekit-core compression
//! functionality to the browser tools.
//!
//! # Module Structure
//!
//! - `compress` - Image compression and upload checks
//! - `raster` - Raster PDF building and target-size search over rendered pages
//! - `search` - Target-size search driven by a JavaScript encoder
//! - `naming` - Download names and size formatting
//! - `logging` - `log` output to the browser console
//! - `types` - Conversions between JavaScript values and core types
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image, compressed_file_name } from '@filekit/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_image(bytes, file.type, {
//!   mode: { mode: 'quality', quality: 0.7 },
//! });
//! const name = compressed_file_name(file.name, result.extension);
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod logging;
mod naming;
mod raster;
mod search;
mod types;

// Re-export public types
pub use compress::{check_input, check_pdf_target, compress_image, JsCompressedImage};
pub use logging::init_logging;
pub use naming::{compressed_file_name, compressed_pdf_name, format_file_size, sanitize_file_name};
pub use raster::{JsRasterResult, RasterDocument};
pub use search::{search_with_encoder, JsCancellationToken, JsSearchResult};

/// Initialize the WASM module (called automatically on load)
///
/// Installs the panic hook and the console logger at `info` level.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logging::install(log::LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    filekit_core::VERSION.to_string()
}
