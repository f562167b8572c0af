//! Image encoding for Filekit.
//!
//! This module provides functionality for:
//! - Encoding surfaces to JPEG with a `[0, 1]` quality
//! - Encoding surfaces to lossy WebP with the same quality scale
//! - Dispatching by output format (PNG is lossless and ignores quality)
//!
//! Every encoder here is deterministic for a given surface and quality,
//! which the target-size search depends on.
//!
//! # Examples
//!
//! ```ignore
//! use filekit_core::decode::DecodedImage;
//! use filekit_core::encode::{encode_image, OutputFormat};
//!
//! let image = DecodedImage::new(100, 100, vec![128u8; 100 * 100 * 3]);
//! let jpeg = encode_image(&image, OutputFormat::Jpeg, 0.8).unwrap();
//! println!("Encoded {} bytes", jpeg.len());
//! ```

mod format;
mod jpeg;
mod webp;

use thiserror::Error;

use crate::decode::{pixel_buffer_len, DecodedImage};

pub use format::{encode_image, OutputFormat};
pub use jpeg::{encode_jpeg, jpeg_quality};
pub use self::webp::{encode_webp, webp_quality};

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero, or the buffer size overflows
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying codec failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Check a surface before handing it to a codec.
pub(crate) fn check_surface(image: &DecodedImage) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = pixel_buffer_len(image.width, image.height, 3).ok_or(
        EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        },
    )?;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    Ok(())
}
