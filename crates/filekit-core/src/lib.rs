//! Filekit Core - target-size file compression
//!
//! This crate provides the compression kernel behind Filekit's browser tools:
//! a bounded binary search that finds the encoder quality (and, for rasterized
//! PDFs, the scale) whose output best fits a byte budget, plus the decode,
//! encode and raster-PDF collaborators the tools drive it with.

pub mod compress;
pub mod decode;
pub mod encode;
pub mod naming;
pub mod raster;
pub mod search;

pub use compress::{
    compress_image, CompressError, CompressedImage, CompressionMode, CompressionReport,
    FormatChoice, ImageCompressOptions,
};
pub use decode::{DecodeError, DecodedImage};
pub use encode::{EncodeError, OutputFormat};
pub use naming::{compressed_file_name, compressed_pdf_name, sanitize_file_name};
pub use raster::{build_raster_pdf, compress_pages_to_target, RasterError};
pub use search::{
    search, search_async, CancellationToken, EncodeResult, Probe, SearchError, SearchOptions,
    SearchOutcome, SearchOverrides,
};

/// Crate version, as reported to the browser.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
