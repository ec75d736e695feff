//! Geometry bindings: rotation bounds, safe crop and crop overlay drags.
//!
//! Crop values cross the boundary as the `crop` object of the edit document
//! (`{top, bottom, left, right, rotation}`, percentages and degrees).

use darkroom_core::transform::{compute_rotated_bounds, compute_safe_crop as core_safe_crop};
use darkroom_core::{drag_crop as core_drag, CropHandle, CropParams};
use wasm_bindgen::prelude::*;

use crate::types::{filter_from_flag, JsBitmap};

/// Dimensions `[width, height]` of an image after rotation.
#[wasm_bindgen]
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> Vec<u32> {
    let (w, h) = compute_rotated_bounds(width, height, angle_degrees);
    vec![w, h]
}

/// Rotate a bitmap into its rotated bounding box.
///
/// # Arguments
/// * `use_lanczos` - Use Lanczos3 (export quality) instead of bilinear
#[wasm_bindgen]
pub fn apply_rotation(image: &JsBitmap, angle_degrees: f64, use_lanczos: bool) -> JsBitmap {
    darkroom_core::apply_rotation(image.as_bitmap(), angle_degrees, filter_from_flag(use_lanczos))
        .into()
}

/// Crop that removes the empty corners left by rotating.
///
/// Returns a full crop object with the given rotation, ready to store.
#[wasm_bindgen]
pub fn compute_safe_crop(width: u32, height: u32, angle_degrees: f64) -> Result<JsValue, JsValue> {
    let crop = safe_crop_params(width, height, angle_degrees);
    serde_wasm_bindgen::to_value(&crop).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resolve a crop overlay drag.
///
/// # Arguments
/// * `start` - Crop object at the start of the drag
/// * `handle` - `"move"`, `"top-left"`, `"top"`, ... `"bottom-right"`
/// * `dx`, `dy` - Pointer travel in percent of the displayed image
/// * `aspect_locked` - Keep the crop's aspect ratio on corner drags
#[wasm_bindgen]
pub fn drag_crop(
    start: JsValue,
    handle: &str,
    dx: f64,
    dy: f64,
    aspect_locked: bool,
) -> Result<JsValue, JsValue> {
    let start: CropParams = serde_wasm_bindgen::from_value(start)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop: {}", e)))?;
    let handle = parse_handle(handle)?;
    let next = core_drag(&start, handle, dx, dy, aspect_locked);
    serde_wasm_bindgen::to_value(&next).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn safe_crop_params(width: u32, height: u32, angle_degrees: f64) -> CropParams {
    core_safe_crop(width, height, angle_degrees).to_crop_params(angle_degrees)
}

fn parse_handle(name: &str) -> Result<CropHandle, JsValue> {
    serde_wasm_bindgen::from_value(JsValue::from_str(name))
        .map_err(|e| JsValue::from_str(&format!("Unknown crop handle {:?}: {}", name, e)))
}
