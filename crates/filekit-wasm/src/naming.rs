//! Download naming and size formatting bindings.

use filekit_core::{compress, naming};
use wasm_bindgen::prelude::*;

/// Name for a compressed download, e.g. `photo.jpg` → `photo-compressed.jpg`.
///
/// Pass `extension` when the output format differs from the original.
#[wasm_bindgen]
pub fn compressed_file_name(original: &str, extension: Option<String>) -> String {
    naming::compressed_file_name(original, extension.as_deref())
}

/// Name for a compressed PDF, e.g. `Report.PDF` → `Report-compressed.pdf`.
#[wasm_bindgen]
pub fn compressed_pdf_name(original: &str) -> String {
    naming::compressed_pdf_name(original)
}

/// Replace characters outside `[A-Za-z0-9-_. ]` with `_`.
#[wasm_bindgen]
pub fn sanitize_file_name(name: &str) -> String {
    naming::sanitize_file_name(name)
}

/// Format a byte count as `0 Bytes`, `1.5 KB`, `10 MB`, ...
///
/// Negative or non-finite input is treated as 0.
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    let bytes = if bytes.is_finite() && bytes > 0.0 {
        bytes as u64
    } else {
        0
    };
    compress::format_file_size(bytes)
}
