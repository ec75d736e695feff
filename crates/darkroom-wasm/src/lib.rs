//! Darkroom WASM - WebAssembly bindings for Darkroom
//!
//! This crate exposes darkroom-core to the browser host.
//!
//! # Module Structure
//!
//! - `types` - `JsBitmap` and `JsPixelRect` wrappers
//! - `render` - `JsRenderer`, the cached rotate/crop/develop path
//! - `curve` - editable point curve and its LUT
//! - `transform` - rotation bounds, safe crop, crop overlay drags
//! - `histogram` - histogram panel data
//! - `encode` - JPEG export
//! - `export` - batch export with progress callbacks
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsBitmap, JsRenderer } from '@darkroom/wasm';
//!
//! await init();
//!
//! const data = ctx.getImageData(0, 0, w, h);
//! const source = new JsBitmap(w, h, new Uint8Array(data.data.buffer));
//! const renderer = new JsRenderer(source);
//! const out = renderer.render(params, false);
//! ```

use darkroom_core::RenderConfig;
use wasm_bindgen::prelude::*;

mod curve;
mod encode;
mod export;
mod histogram;
mod render;
mod transform;
mod types;

pub use curve::{JsToneCurve, JsToneCurveLut};
pub use encode::encode_jpeg;
pub use export::JsExportBatch;
pub use histogram::{compute_histogram, JsHistogram};
pub use render::{JsRenderOutput, JsRenderer};
pub use transform::{apply_rotation, compute_safe_crop, drag_crop, rotated_bounds};
pub use types::{JsBitmap, JsPixelRect};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) finds the logger already set
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Downscale a source bitmap for interactive editing.
///
/// # Arguments
/// * `max_edge` - Longest edge of the preview; defaults to the render
///   config's `maxPreviewDimension` (1400)
#[wasm_bindgen]
pub fn resize_to_fit(image: &JsBitmap, max_edge: Option<u32>) -> Result<JsBitmap, JsValue> {
    let config = RenderConfig::default();
    darkroom_core::preview::resize_to_fit(
        image.as_bitmap(),
        max_edge.unwrap_or(config.max_preview_dimension),
        config.preview_filter,
    )
    .map(Into::into)
    .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_resize_to_fit() {
        let img = JsBitmap::from_parts(300, 150, vec![50u8; 300 * 150 * 4]).unwrap();
        let preview = resize_to_fit(&img, Some(100)).unwrap();
        assert_eq!((preview.width(), preview.height()), (100, 50));
    }

    #[test]
    fn test_resize_to_fit_defaults_to_preview_dimension() {
        let img = JsBitmap::from_parts(2800, 700, vec![50u8; 2800 * 700 * 4]).unwrap();
        let preview = resize_to_fit(&img, None).unwrap();
        assert_eq!((preview.width(), preview.height()), (1400, 350));
    }
}
