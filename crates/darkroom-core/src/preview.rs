//! Preview buffer generation.
//!
//! Interactive edits render against a downscaled copy of the source so the
//! pipeline stays responsive; exports use the full-resolution source.

use image::imageops::FilterType;
use thiserror::Error;

use crate::bitmap::Bitmap;
use crate::transform::InterpolationFilter;

#[derive(Debug, Error, PartialEq)]
pub enum PreviewError {
    #[error("Maximum preview edge must be non-zero")]
    ZeroMaxEdge,

    #[error("Pixel buffer does not match {width}x{height}")]
    InvalidPixelData { width: u32, height: u32 },
}

fn image_filter(filter: InterpolationFilter) -> FilterType {
    match filter {
        InterpolationFilter::Bilinear => FilterType::Triangle,
        InterpolationFilter::Lanczos3 => FilterType::Lanczos3,
    }
}

/// Dimensions that fit within `max_edge` while preserving aspect ratio.
pub fn fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }

    let ratio = width as f64 / height as f64;
    if width >= height {
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), max_edge)
    }
}

/// Downscale `image` so its longest edge is at most `max_edge`.
///
/// Images that already fit are returned unchanged; nothing is upscaled.
pub fn resize_to_fit(
    image: &Bitmap,
    max_edge: u32,
    filter: InterpolationFilter,
) -> Result<Bitmap, PreviewError> {
    if max_edge == 0 {
        return Err(PreviewError::ZeroMaxEdge);
    }

    let (width, height) = fit_dimensions(image.width, image.height, max_edge);
    if (width, height) == (image.width, image.height) {
        return Ok(image.clone());
    }

    let rgba = image.to_rgba_image().ok_or(PreviewError::InvalidPixelData {
        width: image.width,
        height: image.height,
    })?;
    let resized = image::imageops::resize(&rgba, width, height, image_filter(filter));

    log::debug!(
        "preview resized {}x{} -> {}x{}",
        image.width,
        image.height,
        width,
        height
    );
    Ok(Bitmap::from_rgba_image(resized))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> Bitmap {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(128);
                pixels.push(255);
            }
        }
        Bitmap::new(width, height, pixels)
    }

    #[test]
    fn test_resize_to_fit_landscape() {
        let img = create_test_image(3000, 2000);
        let resized = resize_to_fit(&img, 1400, InterpolationFilter::Bilinear).unwrap();
        assert_eq!((resized.width, resized.height), (1400, 933));
        assert_eq!(resized.pixels.len(), 1400 * 933 * 4);
    }

    #[test]
    fn test_resize_to_fit_portrait() {
        let img = create_test_image(400, 600);
        let resized = resize_to_fit(&img, 300, InterpolationFilter::Lanczos3).unwrap();
        assert_eq!((resized.width, resized.height), (200, 300));
    }

    #[test]
    fn test_small_image_untouched() {
        let img = create_test_image(100, 50);
        let resized = resize_to_fit(&img, 1400, InterpolationFilter::Bilinear).unwrap();
        assert_eq!(resized, img);
    }

    #[test]
    fn test_alpha_survives_resize() {
        let img = Bitmap::filled(200, 100, [10, 20, 30, 77]);
        let resized = resize_to_fit(&img, 50, InterpolationFilter::Bilinear).unwrap();
        assert_eq!(resized.pixel(10, 10), [10, 20, 30, 77]);
    }

    #[test]
    fn test_zero_max_edge_error() {
        let img = create_test_image(10, 10);
        assert_eq!(
            resize_to_fit(&img, 0, InterpolationFilter::Bilinear),
            Err(PreviewError::ZeroMaxEdge)
        );
    }

    #[test]
    fn test_mismatched_buffer_error() {
        let img = Bitmap {
            width: 100,
            height: 100,
            pixels: vec![0; 12],
        };
        assert!(matches!(
            resize_to_fit(&img, 10, InterpolationFilter::Bilinear),
            Err(PreviewError::InvalidPixelData { .. })
        ));
    }

    #[test]
    fn test_fit_dimensions() {
        assert_eq!(fit_dimensions(6000, 4000, 2560), (2560, 1707));
        assert_eq!(fit_dimensions(4000, 6000, 2560), (1707, 2560));
        assert_eq!(fit_dimensions(4000, 4000, 256), (256, 256));
        assert_eq!(fit_dimensions(0, 0, 256), (0, 0));
        assert_eq!(fit_dimensions(10000, 1, 100), (100, 1));
    }
}
