//! JPEG encoding.
//!
//! This module provides JPEG encoding using the `image` crate's JPEG encoder.
//! Quality is expressed the way canvas encoders take it: a float in `[0, 1]`.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::{check_surface, EncodeError};
use crate::decode::DecodedImage;

/// Encode an RGB surface to JPEG bytes.
///
/// # Arguments
///
/// * `image` - The surface to encode
/// * `quality` - Encoder quality in `[0, 1]`; values outside are clamped
///
/// # Returns
///
/// JPEG-encoded bytes on success, or an error if encoding fails.
pub fn encode_jpeg(image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
    check_surface(image)?;

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality));
    encoder
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

/// Map a `[0, 1]` quality onto the encoder's 1-100 scale.
///
/// NaN maps to the lowest quality.
pub fn jpeg_quality(quality: f32) -> u8 {
    if quality.is_nan() {
        return 1;
    }
    ((quality.clamp(0.0, 1.0) * 100.0).round() as u8).max(1)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
