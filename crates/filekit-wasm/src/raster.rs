//! Raster PDF WASM bindings.
//!
//! The browser renders each PDF page to a canvas at scale 1.0 (for example
//! with pdf.js) and hands the `ImageData` to a [`RasterDocument`]. The
//! document then builds a JPEG-only PDF at a given quality and scale, or
//! searches quality and scale for the best fit under a target size.
//!
//! # Example
//!
//! ```typescript
//! import { RasterDocument } from '@filekit/wasm';
//!
//! const doc = new RasterDocument();
//! for (let n = 1; n <= pdf.numPages; n++) {
//!   const page = await pdf.getPage(n);
//!   const viewport = page.getViewport({ scale: 1 });
//!   // ...render into canvas...
//!   const data = ctx.getImageData(0, 0, canvas.width, canvas.height);
//!   doc.add_page_rgba(data.width, data.height, data.data);
//! }
//! const result = doc.compress_to_target(300 * 1024, undefined);
//! const blob = new Blob([result.bytes()], { type: 'application/pdf' });
//! ```

use filekit_core::decode::DecodedImage;
use filekit_core::raster;
use filekit_core::search::{SearchOutcome, SearchOverrides};
use wasm_bindgen::prelude::*;

use crate::types::{options_from_js, parse_byte_count, surface_from_rgba, to_js_error};

/// Page bitmaps waiting to be rasterized into a PDF.
#[wasm_bindgen]
#[derive(Default)]
pub struct RasterDocument {
    pages: Vec<DecodedImage>,
}

#[wasm_bindgen]
impl RasterDocument {
    #[wasm_bindgen(constructor)]
    pub fn new() -> RasterDocument {
        RasterDocument::default()
    }

    /// Add a page from canvas `ImageData` (RGBA). One pixel maps to one
    /// PDF point.
    pub fn add_page_rgba(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<(), JsValue> {
        let page = surface_from_rgba(width, height, rgba).map_err(|e| JsValue::from_str(&e))?;
        self.pages.push(page);
        Ok(())
    }

    /// Add a page from RGB pixel data (3 bytes per pixel, row-major order).
    pub fn add_page_rgb(&mut self, width: u32, height: u32, rgb: Vec<u8>) -> Result<(), JsValue> {
        let page = DecodedImage::from_pixels(width, height, rgb).map_err(to_js_error)?;
        self.pages.push(page);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Build the PDF at a fixed JPEG quality (0-1) and scale.
    pub fn build_pdf(&self, quality: f32, scale: f32) -> Result<Vec<u8>, JsValue> {
        raster::build_raster_pdf(&self.pages, quality, scale).map_err(to_js_error)
    }

    /// Search quality and scale for the largest PDF that fits `target_bytes`.
    ///
    /// `options` may override the search settings (`maxIterations`,
    /// `qualityBounds`, `scaleDecayFactor`, `minScale`, `maxScalePasses`, ...).
    /// Targets below 20 KB are rejected. If nothing fits, the smallest PDF
    /// produced is returned with `within_target` false.
    pub fn compress_to_target(
        &self,
        target_bytes: f64,
        options: JsValue,
    ) -> Result<JsRasterResult, JsValue> {
        let target_bytes = parse_byte_count(target_bytes).map_err(|e| JsValue::from_str(&e))?;
        let overrides: SearchOverrides = options_from_js(options)?;
        raster::compress_pages_to_target(&self.pages, target_bytes, &overrides, None)
            .map(JsRasterResult::from_outcome)
            .map_err(to_js_error)
    }
}

/// Result of [`RasterDocument::compress_to_target`].
#[wasm_bindgen]
pub struct JsRasterResult {
    bytes: Vec<u8>,
    quality: f32,
    scale: f32,
    probes: u32,
    within_target: bool,
}

impl JsRasterResult {
    fn from_outcome(outcome: SearchOutcome<Vec<u8>>) -> Self {
        Self {
            within_target: outcome.within_target(),
            quality: outcome.probe.quality,
            scale: outcome.probe.scale,
            probes: outcome.probes,
            bytes: outcome.into_payload(),
        }
    }
}

#[wasm_bindgen]
impl JsRasterResult {
    /// PDF bytes as a `Uint8Array`.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn size_bytes(&self) -> f64 {
        self.bytes.len() as f64
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


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_add_page_and_build() {
        let mut doc = RasterDocument::new();
        doc.add_page_rgba(2, 2, &[255u8; 16]).unwrap();
        doc.add_page_rgb(2, 1, vec![0u8; 6]).unwrap();
        assert_eq!(doc.page_count(), 2);

        let pdf = doc.build_pdf(0.8, 1.0).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }

    #[wasm_bindgen_test]
    fn test_add_page_rejects_bad_buffer() {
        let mut doc = RasterDocument::new();
        assert!(doc.add_page_rgba(4, 4, &[0u8; 10]).is_err());
        assert!(doc.add_page_rgb(4, 4, vec![0u8; 10]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_add_page_rejects_wrapping_dimensions() {
        let mut doc = RasterDocument::new();
        assert!(doc.add_page_rgba(65536, 65536, &[]).is_err());
        assert!(doc.add_page_rgb(65536, 65536, vec![]).is_err());
        assert_eq!(doc.page_count(), 0);
    }

    #[wasm_bindgen_test]
    fn test_build_empty_document_fails() {
        assert!(RasterDocument::new().build_pdf(0.8, 1.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_compress_to_target_with_overrides() {
        let mut doc = RasterDocument::new();
        doc.add_page_rgba(32, 32, &[128u8; 32 * 32 * 4]).unwrap();

        let options = js_sys::JSON::parse(r#"{"maxIterations":3,"maxScalePasses":2}"#).unwrap();
        let result = doc.compress_to_target(64.0 * 1024.0, options).unwrap();
        assert!(result.probes() <= 6);
        assert!(result.within_target());
    }

    #[wasm_bindgen_test]
    fn test_compress_to_target_minimum() {
        let mut doc = RasterDocument::new();
        doc.add_page_rgba(2, 2, &[0u8; 16]).unwrap();
        assert!(doc.compress_to_target(1024.0, JsValue::UNDEFINED).is_err());
    }
}
