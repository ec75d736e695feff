//! Percentage-based cropping.
//!
//! Crop parameters are insets from each edge, as percentages of the rotated
//! bounding box. They are independent of pixel dimensions, so the same edit
//! applies to the preview buffer and the full-resolution export.
//!
//! # Example
//!
//! ```ignore
//! // Keep the middle 60% horizontally and 80% vertically
//! let crop = CropParams::insets(10.0, 10.0, 20.0, 20.0);
//! let rect = crop_rect(100, 100, &crop)?; // 60x80 at (20, 10)
//! let cropped = apply_crop(&image, rect);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bitmap::{Bitmap, CHANNELS};
use crate::params::CropParams;

/// Errors for crop parameters that cannot produce a rectangle.
#[derive(Debug, Error, PartialEq)]
pub enum CropError {
    /// An inset or the rotation is NaN or infinite
    #[error("Crop values must be finite")]
    NonFinite,

    /// An inset is below zero
    #[error("Crop insets must not be negative")]
    NegativeInset,

    /// left + right leaves no width
    #[error("Horizontal insets sum to {0}%, must be below 100%")]
    NoWidth(f64),

    /// top + bottom leaves no height
    #[error("Vertical insets sum to {0}%, must be below 100%")]
    NoHeight(f64),

    /// The insets round away every pixel of the image
    #[error("Crop of {width}x{height} image is empty")]
    EmptyRegion { width: u32, height: u32 },
}

/// A pixel-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Rectangle covering a whole image.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Check that crop parameters describe a non-degenerate region.
pub fn validate_crop(crop: &CropParams) -> Result<(), CropError> {
    let values = [crop.top, crop.bottom, crop.left, crop.right, crop.rotation];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(CropError::NonFinite);
    }
    if crop.top < 0.0 || crop.bottom < 0.0 || crop.left < 0.0 || crop.right < 0.0 {
        return Err(CropError::NegativeInset);
    }
    let horizontal = crop.left + crop.right;
    if horizontal >= 100.0 {
        return Err(CropError::NoWidth(horizontal));
    }
    let vertical = crop.top + crop.bottom;
    if vertical >= 100.0 {
        return Err(CropError::NoHeight(vertical));
    }
    Ok(())
}

/// Derive the pixel rectangle kept by `crop` inside a `width` x `height`
/// (already rotated) buffer.
pub fn crop_rect(width: u32, height: u32, crop: &CropParams) -> Result<PixelRect, CropError> {
    validate_crop(crop)?;

    let w = width as f64;
    let h = height as f64;

    // Each edge is rounded on its own so neither strays more than half a pixel
    let x = ((crop.left / 100.0 * w).round() as u32).min(width);
    let y = ((crop.top / 100.0 * h).round() as u32).min(height);
    let x_end = (((100.0 - crop.right) / 100.0 * w).round() as u32).min(width);
    let y_end = (((100.0 - crop.bottom) / 100.0 * h).round() as u32).min(height);
    let rect_w = x_end.saturating_sub(x);
    let rect_h = y_end.saturating_sub(y);

    if rect_w == 0 || rect_h == 0 {
        return Err(CropError::EmptyRegion { width, height });
    }

    Ok(PixelRect {
        x,
        y,
        width: rect_w,
        height: rect_h,
    })
}

/// Copy a sub-rectangle out of a bitmap.
///
/// The rectangle must lie inside the bitmap (as produced by [`crop_rect`]).
pub fn apply_crop(image: &Bitmap, rect: PixelRect) -> Bitmap {
    debug_assert!(
        rect.x + rect.width <= image.width && rect.y + rect.height <= image.height,
        "Crop rectangle {:?} exceeds {}x{} image",
        rect,
        image.width,
        image.height
    );

    if rect == PixelRect::full(image.width, image.height) {
        return image.clone();
    }

    let row_bytes = rect.width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * rect.height as usize);

    // Copy pixel data row by row
    for y in rect.y..rect.y + rect.height {
        let start = (y as usize * image.width as usize + rect.x as usize) * CHANNELS;
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    Bitmap::new(rect.width, rect.height, output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
