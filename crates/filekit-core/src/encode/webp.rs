//! Lossy WebP encoding.
//!
//! The `image` crate only writes lossless WebP, which ignores quality and
//! often comes out larger than the upload. Canvas encoders write lossy WebP
//! for `image/webp`, so this goes through libwebp instead.

use webp::Encoder;

use super::{check_surface, EncodeError};
use crate::decode::DecodedImage;

/// Encode an RGB surface to lossy WebP bytes.
///
/// `quality` is in `[0, 1]`; values outside are clamped and NaN is treated
/// as the lowest quality.
pub fn encode_webp(image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
    check_surface(image)?;

    let encoded = Encoder::from_rgb(&image.pixels, image.width, image.height)
        .encode_simple(false, webp_quality(quality))
        .map_err(|e| EncodeError::EncodingFailed(format!("{e:?}")))?;

    Ok(encoded.to_vec())
}

/// Map a `[0, 1]` quality onto libwebp's 0-100 scale.
pub fn webp_quality(quality: f32) -> f32 {
    if quality.is_nan() {
        return 0.0;
    }
    quality.clamp(0.0, 1.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy(width: u32, height: u32) -> DecodedImage {
        let mut state = 0x2545_f491u32;
        let pixels = (0..width * height * 3)
            .map(|i| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                // Smooth ramp plus noise so quality has something to discard
                ((i % 251) as u8).wrapping_add((state >> 27) as u8)
            })
            .collect();
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_encode_webp_container() {
        let webp = encode_webp(&noisy(32, 24), 0.8).unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
        // VP8 chunk, not VP8L
        assert_eq!(&webp[12..16], b"VP8 ");
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let img = noisy(96, 64);
        let low = encode_webp(&img, 0.05).unwrap();
        let high = encode_webp(&img, 1.0).unwrap();
        assert!(low.len() < high.len(), "low={} high={}", low.len(), high.len());
    }

    #[test]
    fn test_output_decodes_at_source_size() {
        let webp = encode_webp(&noisy(40, 30), 0.6).unwrap();
        let decoded = image::load_from_memory(&webp).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }

    #[test]
    fn test_webp_quality_mapping() {
        assert_eq!(webp_quality(0.0), 0.0);
        assert_eq!(webp_quality(0.5), 50.0);
        assert_eq!(webp_quality(1.0), 100.0);
        assert_eq!(webp_quality(-2.0), 0.0);
        assert_eq!(webp_quality(9.0), 100.0);
        assert_eq!(webp_quality(f32::NAN), 0.0);
    }

    #[test]
    fn test_rejects_bad_surface() {
        let img = DecodedImage {
            width: 4,
            height: 4,
            pixels: vec![0u8; 7],
        };
        assert!(matches!(
            encode_webp(&img, 0.5),
            Err(EncodeError::InvalidPixelData { .. })
        ));
    }
}
