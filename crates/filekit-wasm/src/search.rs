//! Target-size search driven by a JavaScript encoder.
//!
//! Lets browser code reuse the search with any encoder it already has, such
//! as `canvas.toBlob`. The encoder is called once per probe with
//! `(quality, scale)` and must return (or resolve to) a `Blob`,
//! `ArrayBuffer` or `Uint8Array`. That value is handed back untouched as the
//! result payload.
//!
//! # Example
//!
//! ```typescript
//! import { search_with_encoder, CancellationToken } from '@filekit/wasm';
//!
//! const token = new CancellationToken();
//! const result = await search_with_encoder(
//!   (quality, scale) => new Promise((resolve) => canvas.toBlob(resolve, 'image/jpeg', quality)),
//!   200 * 1024,
//!   { preset: 'image' },
//!   token,
//! );
//! const blob = result.payload;
//! ```

use filekit_core::search::{
    search_async, CancellationToken, EncodeResult, Probe, SearchError, SearchOptions,
    SearchOutcome, SearchOverrides,
};
use js_sys::{ArrayBuffer, Function, Promise, Reflect, Uint8Array};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

use crate::types::{options_from_js, parse_byte_count};

/// A cancellation flag shared between JavaScript and a running search.
///
/// Setting it stops the search before its next probe; the search promise
/// then rejects.
#[wasm_bindgen(js_name = CancellationToken)]
#[derive(Default)]
pub struct JsCancellationToken {
    inner: CancellationToken,
}

#[wasm_bindgen(js_class = CancellationToken)]
impl JsCancellationToken {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsCancellationToken {
        JsCancellationToken::default()
    }

    pub fn cancel(&self) {
        self.inner.cancel();
    }

    #[wasm_bindgen(getter)]
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }
}

/// Which defaults a JavaScript-driven search starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Preset {
    #[default]
    Image,
    Raster,
}

/// Search settings accepted from JavaScript: a preset plus overrides.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
struct SearchConfig {
    preset: Preset,
    #[serde(flatten)]
    overrides: SearchOverrides,
}

impl SearchConfig {
    fn resolve(&self) -> SearchOptions {
        let base = match self.preset {
            Preset::Image => SearchOptions::image(),
            Preset::Raster => SearchOptions::raster(),
        };
        self.overrides.apply_to(base)
    }
}

/// The result a JavaScript-driven search settled on.
#[wasm_bindgen]
pub struct JsSearchResult {
    payload: JsValue,
    size_bytes: u64,
    quality: f32,
    scale: f32,
    probes: u32,
    within_target: bool,
}

impl JsSearchResult {
    fn from_outcome(outcome: SearchOutcome<JsValue>) -> Self {
        Self {
            within_target: outcome.within_target(),
            size_bytes: outcome.result.size_bytes,
            quality: outcome.probe.quality,
            scale: outcome.probe.scale,
            probes: outcome.probes,
            payload: outcome.into_payload(),
        }
    }
}

#[wasm_bindgen]
impl JsSearchResult {
    /// The value the encoder returned for the chosen probe.
    #[wasm_bindgen(getter)]
    pub fn payload(&self) -> JsValue {
        self.payload.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn size_bytes(&self) -> f64 {
        self.size_bytes as f64
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[wasm_bindgen(getter)]
    pub fn probes(&self) -> u32 {
        self.probes
    }

    #[wasm_bindgen(getter)]
    pub fn within_target(&self) -> bool {
        self.within_target
    }
}

/// Run a target-size search with a JavaScript encoder.
///
/// # Arguments
///
/// * `encoder` - `(quality, scale) => Blob | ArrayBuffer | Uint8Array`, or a
///   Promise of one
/// * `target_bytes` - Byte budget, must be positive
/// * `options` - `{ preset: 'image' | 'raster', ...overrides }`; `undefined`
///   uses the image preset
/// * `cancel` - Token checked before every probe
///
/// # Returns
///
/// A Promise resolving to a `JsSearchResult`. It rejects with the encoder's
/// own error if the encoder throws or rejects, and with a message for an
/// invalid target, invalid options or cancellation.
#[wasm_bindgen]
pub fn search_with_encoder(
    encoder: Function,
    target_bytes: f64,
    options: JsValue,
    cancel: &JsCancellationToken,
) -> Result<Promise, JsValue> {
    let target_bytes = parse_byte_count(target_bytes).map_err(|e| JsValue::from_str(&e))?;
    let config: SearchConfig = options_from_js(options)?;
    let options = config.resolve();
    let token = cancel.inner.clone();

    Ok(future_to_promise(async move {
        let outcome = search_async(
            |probe| call_encoder(&encoder, probe),
            target_bytes,
            options,
            Some(&token),
        )
        .await
        .map_err(search_error_to_js)?;

        Ok(JsSearchResult::from_outcome(outcome).into())
    }))
}

async fn call_encoder(encoder: &Function, probe: Probe) -> Result<EncodeResult<JsValue>, JsValue> {
    let returned = encoder.call2(
        &JsValue::NULL,
        &JsValue::from_f64(probe.quality as f64),
        &JsValue::from_f64(probe.scale as f64),
    )?;

    let payload = match returned.dyn_into::<Promise>() {
        Ok(promise) => JsFuture::from(promise).await?,
        Err(value) => value,
    };

    let size_bytes = payload_size(&payload)?;
    Ok(EncodeResult::new(size_bytes, payload))
}

fn payload_size(payload: &JsValue) -> Result<u64, JsValue> {
    if let Some(array) = payload.dyn_ref::<Uint8Array>() {
        return Ok(array.length() as u64);
    }
    if let Some(buffer) = payload.dyn_ref::<ArrayBuffer>() {
        return Ok(buffer.byte_length() as u64);
    }

    // Blob and anything else exposing a numeric `size`
    if payload.is_object() {
        let size = Reflect::get(payload, &JsValue::from_str("size"))?;
        if let Some(size) = size.as_f64() {
            return parse_byte_count(size).map_err(|e| JsValue::from_str(&e));
        }
    }

    Err(JsValue::from_str(
        "Encoder must return a Blob, ArrayBuffer or Uint8Array",
    ))
}

/// Encoder errors pass through as thrown; other failures become messages.
fn search_error_to_js(err: SearchError<JsValue>) -> JsValue {
    match err {
        SearchError::Encoder(e) => e,
        other => JsValue::from_str(&other.map_encoder(|_| String::new()).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filekit_core::search::SearchStrategy;

    #[test]
    fn test_config_resolves_presets() {
        let config = SearchConfig::default();
        assert_eq!(config.resolve(), SearchOptions::image());

        let config = SearchConfig {
            preset: Preset::Raster,
            overrides: SearchOverrides::default(),
        };
        assert_eq!(config.resolve(), SearchOptions::raster());
    }

    #[test]
    fn test_config_applies_overrides() {
        let config = SearchConfig {
            preset: Preset::Raster,
            overrides: SearchOverrides {
                max_iterations: Some(4),
                max_scale_passes: Some(2),
                ..Default::default()
            },
        };
        let options = config.resolve();
        assert_eq!(options.max_iterations, 4);
        match options.strategy {
            SearchStrategy::ScaleAugmented(schedule) => assert_eq!(schedule.max_passes, 2),
            SearchStrategy::SingleParameter => panic!("raster preset should scale"),
        }
    }

    #[test]
    fn test_cancellation_token_wraps_core_token() {
        let token = JsCancellationToken::new();
        let shared = token.inner.clone();
        assert!(!token.is_cancelled());

        token.cancel();
        assert!(token.is_cancelled());
        assert!(shared.is_cancelled());
    }
}
