//! Raster PDF compression.
//!
//! Pages are supplied as bitmaps rendered at scale 1.0 (one pixel per PDF
//! point), typically by a browser-side PDF renderer. A raster PDF re-encodes
//! every page as a JPEG at some quality and scale and wraps the results in a
//! new document. [`compress_pages_to_target`] searches quality and scale
//! together until the document fits a byte budget.
//!
//! Page media boxes always keep the scale-1.0 dimensions, so lowering the
//! scale lowers resolution without shrinking the printed page.

mod pdf;

use thiserror::Error;

use crate::compress::{check_pdf_target, CompressError};
use crate::decode::{scale_by, DecodeError, DecodedImage, FilterType};
use crate::encode::{encode_jpeg, EncodeError};
use crate::search::{
    search, CancellationToken, EncodeResult, OptionsError, SearchError, SearchOptions,
    SearchOutcome, SearchOverrides,
};

use pdf::{write_pdf, PageImage};

/// Errors from building or searching raster PDFs.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("document has no pages")]
    NoPages,

    #[error("quality must be within [0, 1], got {0}")]
    InvalidQuality(f32),

    #[error(transparent)]
    Input(#[from] CompressError),

    #[error("invalid search options: {0}")]
    InvalidOptions(#[from] OptionsError),

    #[error("compression cancelled after {probes} probe(s)")]
    Cancelled { probes: u32 },

    #[error("failed to scale page: {0}")]
    Scale(#[from] DecodeError),

    #[error("failed to encode page: {0}")]
    Encode(#[from] EncodeError),

    #[error("failed to write PDF: {0}")]
    Pdf(String),
}

impl From<SearchError<RasterError>> for RasterError {
    fn from(err: SearchError<RasterError>) -> Self {
        match err {
            SearchError::InvalidTarget => RasterError::Input(CompressError::InvalidTarget),
            SearchError::InvalidOptions(e) => RasterError::InvalidOptions(e),
            SearchError::Cancelled { probes } => RasterError::Cancelled { probes },
            SearchError::NoResult => RasterError::Input(CompressError::NoResult),
            SearchError::Encoder(e) => e,
        }
    }
}

/// Build a PDF with one JPEG page per bitmap.
///
/// Each bitmap is downscaled by `scale` (dimensions floored, at least one
/// pixel) and encoded at `quality`.
pub fn build_raster_pdf(
    pages: &[DecodedImage],
    quality: f32,
    scale: f32,
) -> Result<Vec<u8>, RasterError> {
    if pages.is_empty() {
        return Err(RasterError::NoPages);
    }
    if !(0.0..=1.0).contains(&quality) {
        return Err(RasterError::InvalidQuality(quality));
    }

    let mut scaled = ScaledPages::new(pages);
    encode_pages(pages, scaled.at(scale)?, quality)
}

/// Encode already-scaled pages. Media boxes come from `originals`.
fn encode_pages(
    originals: &[DecodedImage],
    scaled: &[DecodedImage],
    quality: f32,
) -> Result<Vec<u8>, RasterError> {
    let mut encoded = Vec::with_capacity(scaled.len());
    for (page, scaled) in originals.iter().zip(scaled) {
        encoded.push(PageImage {
            jpeg: encode_jpeg(scaled, quality)?,
            pixel_width: scaled.width,
            pixel_height: scaled.height,
            page_width: page.width,
            page_height: page.height,
        });
    }

    write_pdf(encoded)
}

/// Pages resampled at the most recent scale.
///
/// The search holds the scale fixed for a whole pass, so only the JPEG
/// encode has to be redone between probes of one pass.
struct ScaledPages<'a> {
    source: &'a [DecodedImage],
    scale: Option<f32>,
    pages: Vec<DecodedImage>,
    resamples: u32,
}

impl<'a> ScaledPages<'a> {
    fn new(source: &'a [DecodedImage]) -> Self {
        Self {
            source,
            scale: None,
            pages: Vec::new(),
            resamples: 0,
        }
    }

    fn at(&mut self, scale: f32) -> Result<&[DecodedImage], RasterError> {
        if self.scale != Some(scale) {
            self.pages = self
                .source
                .iter()
                .map(|page| scale_by(page, scale, FilterType::Bilinear))
                .collect::<Result<_, _>>()?;
            self.scale = Some(scale);
            self.resamples += 1;
        }
        Ok(&self.pages)
    }
}

/// Find the raster PDF that comes closest to `target_bytes` without
/// exceeding it.
///
/// Runs a scale-augmented search with [`SearchOptions::raster`] defaults,
/// adjusted by `overrides`. Targets under
/// [`MIN_PDF_TARGET_BYTES`](crate::compress::MIN_PDF_TARGET_BYTES) are
/// rejected. When no combination fits, the smallest document produced is
/// returned and [`SearchOutcome::within_target`] is false.
pub fn compress_pages_to_target(
    pages: &[DecodedImage],
    target_bytes: u64,
    overrides: &SearchOverrides,
    cancel: Option<&CancellationToken>,
) -> Result<SearchOutcome<Vec<u8>>, RasterError> {
    if pages.is_empty() {
        return Err(RasterError::NoPages);
    }
    check_pdf_target(target_bytes)?;

    log::info!(
        "rasterizing {} page(s) to fit {} bytes",
        pages.len(),
        target_bytes
    );

    let options = overrides.apply_to(SearchOptions::raster());
    let mut scaled = ScaledPages::new(pages);
    let outcome = search(
        |probe| {
            let at_scale = scaled.at(probe.scale)?;
            encode_pages(pages, at_scale, probe.quality).map(EncodeResult::from_bytes)
        },
        target_bytes,
        options,
        cancel,
    )?;

    log::info!(
        "raster PDF settled at {} bytes (quality {:.3}, scale {:.3}, {} probe(s), {} resample(s))",
        outcome.result.size_bytes,
        outcome.probe.quality,
        outcome.probe.scale,
        outcome.probes,
        scaled.resamples
    );

    Ok(outcome)
}
