//! JPEG encoding bindings.
//!
//! # Example
//!
//! ```typescript
//! const out = renderer.render_export(params);
//! const jpegBytes = encode_jpeg(out, 0.95);
//! saveAs(new Blob([jpegBytes], { type: 'image/jpeg' }), name);
//! ```

use darkroom_core::encode;
use wasm_bindgen::prelude::*;

use crate::types::JsBitmap;

/// Encode a bitmap to JPEG bytes.
///
/// # Arguments
/// * `image` - Rendered RGBA bitmap; alpha is dropped
/// * `quality` - 0 to 1, clamped (exports use 0.95)
///
/// # Errors
/// Returns an error for empty bitmaps or if encoding fails internally.
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsBitmap, quality: f32) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(image.as_bitmap(), quality).map_err(|e| JsValue::from_str(&e.to_string()))
}
