//! Conversions between JavaScript values and core types.
//!
//! JavaScript numbers arrive as `f64`, options as plain objects, and canvas
//! pixels as RGBA. The helpers here turn them into what the core expects and
//! turn core errors back into `JsValue` strings.

use std::fmt::Display;

use filekit_core::decode::{pixel_buffer_len, DecodedImage};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

/// Convert any displayable error into a JavaScript error string.
pub(crate) fn to_js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Deserialize an options object, using the default when it is
/// `undefined` or `null`.
pub(crate) fn options_from_js<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid options: {}", e)))
}

/// Validate a byte count passed as a JavaScript number.
///
/// Fractions are truncated; negative, NaN and infinite values are rejected.
pub(crate) fn parse_byte_count(value: f64) -> Result<u64, String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("Invalid byte count: {}", value));
    }
    Ok(value.trunc() as u64)
}

/// Build an RGB surface from canvas `ImageData` (RGBA, row-major).
///
/// Alpha is discarded.
pub(crate) fn surface_from_rgba(
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<DecodedImage, String> {
    let expected = pixel_buffer_len(width, height, 4)
        .ok_or_else(|| format!("Invalid dimensions: {}x{} is too large", width, height))?;
    if rgba.len() != expected {
        return Err(format!(
            "Invalid RGBA data: expected {} bytes for {}x{}, got {}",
            expected,
            width,
            height,
            rgba.len()
        ));
    }

    let pixels = rgba
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    DecodedImage::from_pixels(width, height, pixels).map_err(|e| e.to_string())
}
