//! Surface resizing for rasterization scale.
//!
//! All functions return new `DecodedImage` instances without modifying the input.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is zero.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Scale an image by `factor`, the way a page is rendered at a viewport scale.
///
/// Each dimension becomes `floor(dimension * factor)`, never less than one
/// pixel.
///
/// # Errors
///
/// Returns `DecodeError::InvalidScale` unless `factor` is positive and finite.
pub fn scale_by(
    image: &DecodedImage,
    factor: f32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    let (width, height) = scaled_dimensions(image.width, image.height, factor)?;
    resize(image, width, height, filter)
}

/// Dimensions of a `width` x `height` surface rendered at `factor`.
pub fn scaled_dimensions(width: u32, height: u32, factor: f32) -> Result<(u32, u32), DecodeError> {
    if !(factor > 0.0 && factor.is_finite()) {
        return Err(DecodeError::InvalidScale(factor));
    }

    let scale = |dimension: u32| ((dimension as f64 * factor as f64).floor() as u32).max(1);
    Ok((scale(width), scale(height)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> DecodedImage {
        // Create a simple gradient image for testing
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8); // R
                pixels.push(((y * 255) / height.max(1)) as u8); // G
                pixels.push(128); // B
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_resize_basic() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 50, 25, FilterType::Bilinear).unwrap();

        assert_eq!(resized.width, 50);
        assert_eq!(resized.height, 25);
        assert_eq!(resized.pixels.len(), 50 * 25 * 3);
    }

    #[test]
    fn test_resize_same_dimensions_is_identity() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 100, 50, FilterType::Bilinear).unwrap();
        assert_eq!(resized, img);
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let img = create_test_image(100, 50);

        assert!(matches!(
            resize(&img, 0, 50, FilterType::Bilinear),
            Err(DecodeError::InvalidDimensions { .. })
        ));
        assert!(resize(&img, 50, 0, FilterType::Bilinear).is_err());
    }

    #[test]
    fn test_scale_by_floors_dimensions() {
        let img = create_test_image(101, 51);
        let scaled = scale_by(&img, 0.8, FilterType::Bilinear).unwrap();

        // 101 * 0.8 = 80.8, 51 * 0.8 = 40.8
        assert_eq!((scaled.width, scaled.height), (80, 40));
    }

    #[test]
    fn test_scale_by_one_keeps_image() {
        let img = create_test_image(30, 20);
        let scaled = scale_by(&img, 1.0, FilterType::Lanczos3).unwrap();
        assert_eq!(scaled, img);
    }

    #[test]
    fn test_scaled_dimensions_never_below_one() {
        assert_eq!(scaled_dimensions(3, 2, 0.1).unwrap(), (1, 1));
    }

    #[test]
    fn test_scaled_dimensions_rejects_bad_factor() {
        assert!(matches!(
            scaled_dimensions(10, 10, 0.0),
            Err(DecodeError::InvalidScale(_))
        ));
        assert!(scaled_dimensions(10, 10, -0.5).is_err());
        assert!(scaled_dimensions(10, 10, f32::NAN).is_err());
        assert!(scaled_dimensions(10, 10, f32::INFINITY).is_err());
    }

    #[test]
    fn test_all_filter_types() {
        let img = create_test_image(100, 50);

        for filter in [
            FilterType::Nearest,
            FilterType::Bilinear,
            FilterType::Lanczos3,
        ] {
            let resized = scale_by(&img, 0.5, filter).unwrap();
            assert_eq!(resized.width, 50);
            assert_eq!(resized.height, 25);
        }
    }
}
