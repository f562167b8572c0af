//! Image compression WASM bindings.
//!
//! This module exposes the filekit-core image pipeline to JavaScript.
//!
//! # Functions
//!
//! - [`compress_image`] - Compress an uploaded image at a fixed quality or to a target size
//! - [`check_input`] - Classify an upload as `"image"` or `"pdf"` and enforce size limits
//! - [`check_pdf_target`] - Reject PDF target sizes below 20 KB
//!
//! # Example
//!
//! ```typescript
//! import { compress_image } from '@filekit/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_image(bytes, file.type, {
//!   mode: { mode: 'targetSize', targetBytes: 200 * 1024 },
//!   format: 'auto',
//! });
//! const blob = new Blob([result.bytes()], { type: result.mime_type });
//! ```

use filekit_core::compress::{self, CompressedImage, ImageCompressOptions, InputKind};
use wasm_bindgen::prelude::*;

use crate::types::{options_from_js, parse_byte_count, to_js_error};

/// Result of [`compress_image`].
#[wasm_bindgen]
pub struct JsCompressedImage {
    inner: CompressedImage,
}

#[wasm_bindgen]
impl JsCompressedImage {
    /// Encoded output bytes as a `Uint8Array` (copied out of WASM memory).
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.format.mime_type().to_string()
    }

    /// Extension matching the output format, without the dot.
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.inner.format.extension().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.inner.quality
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn probes(&self) -> u32 {
        self.inner.probes
    }

    /// False when the target size could not be reached; the output is then
    /// the smallest one produced.
    #[wasm_bindgen(getter)]
    pub fn within_target(&self) -> bool {
        self.inner.within_target
    }

    #[wasm_bindgen(getter)]
    pub fn original_bytes(&self) -> f64 {
        self.inner.report.original_bytes as f64
    }

    #[wasm_bindgen(getter)]
    pub fn compressed_bytes(&self) -> f64 {
        self.inner.report.compressed_bytes as f64
    }

    #[wasm_bindgen(getter)]
    pub fn savings_percent(&self) -> f64 {
        self.inner.report.savings_percent()
    }

    /// Human-readable summary, e.g. `2.4 MB → 310.5 KB (87.4% saved)`.
    #[wasm_bindgen(getter)]
    pub fn summary(&self) -> String {
        self.inner.report.summary()
    }
}

/// Compress an uploaded image.
///
/// # Arguments
///
/// * `bytes` - The uploaded file bytes (JPEG, PNG or WebP)
/// * `mime` - The upload's MIME type (`file.type`); must be `image/*` when given
/// * `options` - `{ mode, format, search }` as accepted by
///   `ImageCompressOptions`; `undefined` compresses at quality 0.8 in the
///   source format
///
/// # Errors
///
/// Returns an error if the upload is not an image, exceeds 10 MB, cannot be
/// decoded, or the options are invalid.
#[wasm_bindgen]
pub fn compress_image(
    bytes: &[u8],
    mime: Option<String>,
    options: JsValue,
) -> Result<JsCompressedImage, JsValue> {
    let options: ImageCompressOptions = options_from_js(options)?;
    compress::compress_image(bytes, mime.as_deref(), &options, None)
        .map(|inner| JsCompressedImage { inner })
        .map_err(to_js_error)
}

/// Classify an upload and enforce its size limit.
///
/// Returns `"pdf"` for `application/pdf` or a `.pdf` name (max 50 MB) and
/// `"image"` for `image/*` types (max 10 MB).
#[wasm_bindgen]
pub fn check_input(file_name: &str, mime: &str, size_bytes: f64) -> Result<String, JsValue> {
    let size_bytes = parse_byte_count(size_bytes).map_err(|e| JsValue::from_str(&e))?;
    compress::check_input(file_name, mime, size_bytes)
        .map(|kind| kind_name(kind).to_string())
        .map_err(to_js_error)
}

/// Reject PDF target sizes below 20 KB.
#[wasm_bindgen]
pub fn check_pdf_target(target_bytes: f64) -> Result<(), JsValue> {
    let target_bytes = parse_byte_count(target_bytes).map_err(|e| JsValue::from_str(&e))?;
    compress::check_pdf_target(target_bytes).map_err(to_js_error)
}

fn kind_name(kind: InputKind) -> &'static str {
    match kind {
        InputKind::Image => "image",
        InputKind::Pdf => "pdf",
    }
}

/// Tests for compress bindings.
///
/// Note: Functions returning `Result<T, JsValue>` only work on wasm32 targets.
/// The underlying pipeline is tested in `filekit_core::compress`.
#[cfg(test)]
mod tests {
    use super::*;
    use filekit_core::decode::DecodedImage;
    use filekit_core::encode::encode_jpeg;

    fn jpeg_upload() -> Vec<u8> {
        let pixels: Vec<u8> = (0..32 * 32 * 3).map(|i| (i * 13 % 256) as u8).collect();
        encode_jpeg(&DecodedImage::new(32, 32, pixels), 0.9).unwrap()
    }

    #[test]
    fn test_compressed_image_getters() {
        let upload = jpeg_upload();
        let inner = compress::compress_image(
            &upload,
            Some("image/jpeg"),
            &ImageCompressOptions::default(),
            None,
        )
        .unwrap();
        let result = JsCompressedImage { inner };

        assert_eq!(result.mime_type(), "image/jpeg");
        assert_eq!(result.extension(), "jpg");
        assert_eq!((result.width(), result.height()), (32, 32));
        assert_eq!(result.original_bytes(), upload.len() as f64);
        assert_eq!(result.compressed_bytes(), result.bytes().len() as f64);
        assert!(result.within_target());
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(kind_name(InputKind::Image), "image");
        assert_eq!(kind_name(InputKind::Pdf), "pdf");
    }
}

/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use filekit_core::decode::DecodedImage;
    use filekit_core::encode::encode_jpeg;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn jpeg_upload() -> Vec<u8> {
        let pixels: Vec<u8> = (0..64 * 64 * 3).map(|i| (i * 29 % 256) as u8).collect();
        encode_jpeg(&DecodedImage::new(64, 64, pixels), 0.95).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_compress_image_default_options() {
        let result = compress_image(&jpeg_upload(), Some("image/jpeg".into()), JsValue::UNDEFINED);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().quality(), 0.8);
    }

    #[wasm_bindgen_test]
    fn test_compress_image_target_size_options() {
        let options = js_sys::JSON::parse(
            r#"{"mode":{"mode":"targetSize","targetBytes":1},"format":"jpeg","search":{"maxIterations":4}}"#,
        )
        .unwrap();
        let result = compress_image(&jpeg_upload(), None, options).unwrap();
        assert!(!result.within_target());
        assert!(result.probes() <= 4);
    }

    #[wasm_bindgen_test]
    fn test_compress_image_rejects_bad_options() {
        let options = js_sys::JSON::parse(r#"{"format":"gif"}"#).unwrap();
        assert!(compress_image(&jpeg_upload(), None, options).is_err());
    }

    #[wasm_bindgen_test]
    fn test_check_input() {
        assert_eq!(check_input("a.pdf", "", 1000.0).unwrap(), "pdf");
        assert_eq!(check_input("a.png", "image/png", 1000.0).unwrap(), "image");
        assert!(check_input("a.png", "image/png", 11.0 * 1024.0 * 1024.0).is_err());
        assert!(check_input("a.txt", "text/plain", 10.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_check_pdf_target() {
        assert!(check_pdf_target(20480.0).is_ok());
        assert!(check_pdf_target(1024.0).is_err());
        assert!(check_pdf_target(-5.0).is_err());
    }
}
