//! Image decoding for Filekit.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG and WebP uploads into RGB surfaces
//! - EXIF orientation correction (matching what a browser canvas draws)
//! - Resizing surfaces for rasterization scale
//!
//! # Examples
//!
//! ```ignore
//! use filekit_core::decode::{decode_image, scale_by, FilterType};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! let half = scale_by(&image, 0.5, FilterType::Bilinear).unwrap();
//! println!("{}x{} -> {}x{}", image.width, image.height, half.width, half.height);
//! ```

mod load;
mod resize;
mod types;

pub use load::{decode_image, detect_format, get_orientation};
pub use resize::{resize, scale_by, scaled_dimensions};
pub use types::{pixel_buffer_len, DecodeError, DecodedImage, FilterType, Orientation};
