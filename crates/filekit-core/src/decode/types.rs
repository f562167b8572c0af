//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not in a format we can decode.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// Width or height of a requested surface is zero.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Resize scale is not a positive, finite number.
    #[error("Invalid scale factor: {0}")]
    InvalidScale(f32),
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal + rotate 270 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal + rotate 90 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A drawable surface: RGB pixels the encoders render from.
///
/// This is what a browser canvas holds after `drawImage`: the decoded,
/// orientation-corrected image (or a rendered document page).
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            Some(pixels.len()),
            pixel_buffer_len(width, height, 3),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Build a surface from caller-supplied pixels, checking the buffer length.
    ///
    /// Use this at trust boundaries (pixels handed over from JavaScript) where
    /// [`DecodedImage::new`]'s debug assertion is not enough.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidDimensions { width, height });
        }
        let expected = pixel_buffer_len(width, height, 3)
            .ok_or(DecodeError::InvalidDimensions { width, height })?;
        if pixels.len() != expected {
            return Err(DecodeError::CorruptedFile(format!(
                "expected {} bytes of RGB data for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

/// Byte length of a `width` x `height` buffer with `channels` bytes per
/// pixel, or `None` if it does not fit in `usize` (32 bits on wasm32).
pub fn pixel_buffer_len(width: u32, height: u32, channels: usize) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)?
        .checked_mul(channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(8), Orientation::Rotate270CW);
        assert_eq!(Orientation::from(0), Orientation::Normal);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_from_pixels_accepts_matching_buffer() {
        let img = DecodedImage::from_pixels(4, 2, vec![0u8; 4 * 2 * 3]).unwrap();
        assert_eq!(img.width, 4);
        assert_eq!(img.height, 2);
        assert_eq!(img.byte_size(), 24);
        assert!(!img.is_empty());
    }

    #[test]
    fn test_from_pixels_rejects_short_buffer() {
        let result = DecodedImage::from_pixels(4, 2, vec![0u8; 10]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_pixel_buffer_len() {
        assert_eq!(pixel_buffer_len(4, 2, 3), Some(24));
        assert_eq!(pixel_buffer_len(4, 2, 4), Some(32));
        assert_eq!(pixel_buffer_len(u32::MAX, u32::MAX, 3), None);
    }

    #[test]
    fn test_from_pixels_rejects_overflowing_dimensions() {
        let result = DecodedImage::from_pixels(u32::MAX, u32::MAX, vec![]);
        assert!(matches!(
            result,
            Err(DecodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_from_pixels_rejects_zero_dimensions() {
        let result = DecodedImage::from_pixels(0, 2, vec![]);
        assert!(matches!(
            result,
            Err(DecodeError::InvalidDimensions {
                width: 0,
                height: 2
            })
        ));
    }

    #[test]
    fn test_rgb_image_round_trip() {
        let img = DecodedImage::new(2, 1, vec![255, 0, 0, 0, 0, 255]);
        let rgb = img.to_rgb_image().unwrap();
        assert_eq!(rgb.get_pixel(1, 0).0, [0, 0, 255]);
        assert_eq!(DecodedImage::from_rgb_image(rgb), img);
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::InvalidScale(-1.0);
        assert_eq!(err.to_string(), "Invalid scale factor: -1");

        let err = DecodeError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }
}
