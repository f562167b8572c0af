//! Image compression pipeline.
//!
//! Decodes an upload, then re-encodes it either at a fixed quality or at the
//! quality a target-size search settles on. The output keeps the source
//! dimensions; only the encoder quality (and optionally the format) changes.
//!
//! # Examples
//!
//! ```ignore
//! use filekit_core::compress::{compress_image, CompressionMode, ImageCompressOptions};
//!
//! let options = ImageCompressOptions {
//!     mode: CompressionMode::TargetSize { target_bytes: 200 * 1024 },
//!     ..Default::default()
//! };
//! let out = compress_image(&bytes, Some("image/jpeg"), &options, None)?;
//! println!("{}", out.report.summary());
//! ```

mod input;
pub mod report;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{decode_image, detect_format, DecodeError, DecodedImage};
use crate::encode::{encode_image, EncodeError, OutputFormat};
use crate::search::{
    search, CancellationToken, EncodeResult, OptionsError, SearchError, SearchOptions,
    SearchOverrides,
};

pub use input::{
    check_input, check_pdf_target, check_size, is_image, is_pdf, InputKind, MAX_IMAGE_BYTES,
    MAX_PDF_BYTES, MIN_PDF_TARGET_BYTES,
};
pub use report::{format_file_size, CompressionReport};

/// Errors from the compression pipelines.
#[derive(Debug, Error)]
pub enum CompressError {
    #[error("unsupported file type: {0:?}")]
    UnsupportedType(String),

    #[error("file is {size_bytes} bytes, limit is {limit_bytes}")]
    TooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("target size {target_bytes} bytes is below the minimum of {min_bytes}")]
    TargetTooSmall { target_bytes: u64, min_bytes: u64 },

    #[error("quality must be within [0, 1], got {0}")]
    InvalidQuality(f32),

    #[error("target size must be a positive number of bytes")]
    InvalidTarget,

    #[error("invalid search options: {0}")]
    InvalidOptions(#[from] OptionsError),

    #[error("compression cancelled after {probes} probe(s)")]
    Cancelled { probes: u32 },

    #[error("search finished without an encoder result")]
    NoResult,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl From<SearchError<EncodeError>> for CompressError {
    fn from(err: SearchError<EncodeError>) -> Self {
        match err {
            SearchError::InvalidTarget => CompressError::InvalidTarget,
            SearchError::InvalidOptions(e) => CompressError::InvalidOptions(e),
            SearchError::Cancelled { probes } => CompressError::Cancelled { probes },
            SearchError::NoResult => CompressError::NoResult,
            SearchError::Encoder(e) => CompressError::Encode(e),
        }
    }
}

/// How the encoder quality is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum CompressionMode {
    /// Encode once at a fixed quality in `[0, 1]`.
    Quality { quality: f32 },
    /// Search for the highest quality that fits `target_bytes`.
    TargetSize {
        #[serde(rename = "targetBytes")]
        target_bytes: u64,
    },
}

impl Default for CompressionMode {
    fn default() -> Self {
        CompressionMode::Quality { quality: 0.8 }
    }
}

/// Output format selection. `Auto` keeps the source format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatChoice {
    #[default]
    Auto,
    Jpeg,
    Png,
    Webp,
}

impl FormatChoice {
    /// Resolve against the source format. An unknown source under `Auto`
    /// falls back to PNG, as a canvas encoder does.
    pub fn resolve(self, source: Option<OutputFormat>) -> OutputFormat {
        match self {
            FormatChoice::Auto => source.unwrap_or(OutputFormat::Png),
            FormatChoice::Jpeg => OutputFormat::Jpeg,
            FormatChoice::Png => OutputFormat::Png,
            FormatChoice::Webp => OutputFormat::Webp,
        }
    }
}

/// Options for [`compress_image`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageCompressOptions {
    pub mode: CompressionMode,
    pub format: FormatChoice,
    /// Applied over [`SearchOptions::image`] in target-size mode.
    pub search: SearchOverrides,
}

/// A compressed image and how it was produced.
#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    /// Quality the output was encoded at.
    pub quality: f32,
    pub width: u32,
    pub height: u32,
    /// Encoder calls made (1 in quality mode).
    pub probes: u32,
    /// False when a target-size search could not reach the target.
    pub within_target: bool,
    pub report: CompressionReport,
}

/// Compress an uploaded image.
///
/// `mime` is the upload's declared type; when given it must be `image/*`.
/// The source format for [`FormatChoice::Auto`] comes from `mime`, falling
/// back to sniffing the bytes.
pub fn compress_image(
    bytes: &[u8],
    mime: Option<&str>,
    options: &ImageCompressOptions,
    cancel: Option<&CancellationToken>,
) -> Result<CompressedImage, CompressError> {
    if let Some(mime) = mime {
        if !is_image(mime) {
            return Err(CompressError::UnsupportedType(mime.to_string()));
        }
    }
    check_size(InputKind::Image, bytes.len() as u64)?;

    let source = mime
        .and_then(OutputFormat::from_mime)
        .or_else(|| detect_format(bytes).and_then(OutputFormat::from_image_format));
    let format = options.format.resolve(source);

    let image = decode_image(bytes)?;
    log::info!(
        "compressing {}x{} image ({} bytes) to {}",
        image.width,
        image.height,
        bytes.len(),
        format.mime_type()
    );

    let (encoded, quality, probes, within_target) = match options.mode {
        CompressionMode::Quality { quality } => {
            if !(0.0..=1.0).contains(&quality) {
                return Err(CompressError::InvalidQuality(quality));
            }
            (encode_image(&image, format, quality)?, quality, 1, true)
        }
        CompressionMode::TargetSize { target_bytes } => {
            encode_to_target(&image, format, target_bytes, &options.search, cancel)?
        }
    };

    let report = CompressionReport::new(bytes.len() as u64, encoded.len() as u64);
    log::info!("image compressed: {}", report.summary());

    Ok(CompressedImage {
        bytes: encoded,
        format,
        quality,
        width: image.width,
        height: image.height,
        probes,
        within_target,
        report,
    })
}

fn encode_to_target(
    image: &DecodedImage,
    format: OutputFormat,
    target_bytes: u64,
    overrides: &SearchOverrides,
    cancel: Option<&CancellationToken>,
) -> Result<(Vec<u8>, f32, u32, bool), CompressError> {
    let options = overrides.apply_to(SearchOptions::image());

    // PNG does not change with quality, so one probe answers.
    if !format.honors_quality() {
        options.validate()?;
        if target_bytes == 0 {
            return Err(CompressError::InvalidTarget);
        }
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(CompressError::Cancelled { probes: 0 });
        }
        let quality = options
            .initial_quality
            .unwrap_or_else(|| options.quality_bounds.midpoint());
        let encoded = encode_image(image, format, quality)?;
        let within_target = encoded.len() as u64 <= target_bytes;
        return Ok((encoded, quality, 1, within_target));
    }

    let outcome = search(
        |probe| encode_image(image, format, probe.quality).map(EncodeResult::from_bytes),
        target_bytes,
        options,
        cancel,
    )?;

    let quality = outcome.probe.quality;
    let probes = outcome.probes;
    let within_target = outcome.within_target();
    Ok((outcome.into_payload(), quality, probes, within_target))
}
