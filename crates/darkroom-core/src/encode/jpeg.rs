//! JPEG encoding for export.
//!
//! Uses the `image` crate's baseline JPEG encoder. Alpha is discarded before
//! encoding since JPEG has no transparency.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use crate::bitmap::{Bitmap, CHANNELS};

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Map a 0-1 quality to the encoder's 1-100 scale.
///
/// Out-of-range and NaN inputs clamp to the nearest valid setting.
pub fn quality_to_jpeg(quality: f32) -> u8 {
    ((quality * 100.0).round() as i32).clamp(1, 100) as u8
}

/// Encode an RGBA bitmap to JPEG bytes.
///
/// # Arguments
///
/// * `image` - Rendered bitmap; alpha is dropped
/// * `quality` - JPEG quality from 0 to 1 (exports default to 0.95)
///
/// # Returns
///
/// JPEG-encoded bytes on success, or an error if encoding fails.
pub fn encode_jpeg(image: &Bitmap, quality: f32) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = image.pixel_count() * CHANNELS;
    if image.pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: image.pixels.len(),
        });
    }

    let rgb = image.to_rgb_bytes();
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality_to_jpeg(quality));

    encoder
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
