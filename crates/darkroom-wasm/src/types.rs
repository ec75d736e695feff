//! WASM-compatible wrapper types for bitmaps and rectangles.
//!
//! The host hands over RGBA bytes straight from a canvas `ImageData`, so
//! the buffer layout matches the core [`Bitmap`] one to one.

use darkroom_core::bitmap::CHANNELS;
use darkroom_core::transform::PixelRect;
use darkroom_core::{Bitmap, InterpolationFilter};
use wasm_bindgen::prelude::*;

/// An RGBA bitmap living in WASM memory.
///
/// # Memory Management
///
/// `pixels()` copies the data into a JavaScript `Uint8Array`. Keep bitmaps
/// on the WASM side between calls and only extract pixels for display.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsBitmap {
    inner: Bitmap,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Wrap RGBA pixel data (4 bytes per pixel, row-major).
    ///
    /// # Errors
    /// Returns an error if the buffer length is not `width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsBitmap, JsValue> {
        Self::from_parts(width, height, pixels).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer releases it otherwise.
    pub fn free(self) {}
}

impl JsBitmap {
    pub(crate) fn from_parts(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, String> {
        let expected = width as usize * height as usize * CHANNELS;
        if pixels.len() != expected {
            return Err(format!(
                "Invalid pixel data: expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                pixels.len()
            ));
        }
        Ok(Self {
            inner: Bitmap::new(width, height, pixels),
        })
    }

    pub(crate) fn as_bitmap(&self) -> &Bitmap {
        &self.inner
    }
}

impl From<Bitmap> for JsBitmap {
    fn from(inner: Bitmap) -> Self {
        Self { inner }
    }
}

/// A pixel rectangle, e.g. the crop overlay of a full render.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsPixelRect {
    inner: PixelRect,
}

#[wasm_bindgen]
impl JsPixelRect {
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u32 {
        self.inner.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u32 {
        self.inner.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }
}

impl From<PixelRect> for JsPixelRect {
    fn from(inner: PixelRect) -> Self {
        Self { inner }
    }
}

/// Map the host's `use_lanczos` flag to a resampling filter.
pub(crate) fn filter_from_flag(use_lanczos: bool) -> InterpolationFilter {
    if use_lanczos {
        InterpolationFilter::Lanczos3
    } else {
        InterpolationFilter::Bilinear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_bitmap_creation() {
        let img = JsBitmap::from_parts(100, 50, vec![0u8; 100 * 50 * 4]).unwrap();
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20_000);
    }

    #[test]
    fn test_js_bitmap_rejects_rgb_buffer() {
        let err = JsBitmap::from_parts(2, 1, vec![0u8; 6]).unwrap_err();
        assert!(err.contains("expected 8 bytes"));
    }

    #[test]
    fn test_js_bitmap_pixels_round_trip() {
        let pixels = vec![255u8, 128, 64, 255, 32, 16, 8, 0];
        let img = JsBitmap::from_parts(2, 1, pixels.clone()).unwrap();
        assert_eq!(img.pixels(), pixels);
        assert_eq!(img.as_bitmap().pixel(1, 0), [32, 16, 8, 0]);
    }

    #[test]
    fn test_pixel_rect_getters() {
        let rect = JsPixelRect::from(PixelRect {
            x: 1,
            y: 2,
            width: 3,
            height: 4,
        });
        assert_eq!((rect.x(), rect.y(), rect.width(), rect.height()), (1, 2, 3, 4));
    }

    #[test]
    fn test_filter_from_flag() {
        assert_eq!(filter_from_flag(true), InterpolationFilter::Lanczos3);
        assert_eq!(filter_from_flag(false), InterpolationFilter::Bilinear);
    }
}
