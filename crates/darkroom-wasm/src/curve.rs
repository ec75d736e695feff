//! Point curve bindings.
//!
//! `JsToneCurve` is the editable control-point list behind the curve panel;
//! every edit keeps the points ordered with anchored endpoints.
//! `JsToneCurveLut` is the sampled 256-entry table, exposed for drawing and
//! debugging.
//!
//! # Example (TypeScript)
//! ```typescript
//! const curve = new JsToneCurve();
//! const idx = curve.insert_point(0.25, 0.15); // darken shadows
//! curve.move_point(idx, 0.3, 0.2);
//! params.curvePoints = curve.points();
//! ```

use darkroom_core::curve::{evaluate_curve, CurveError};
use darkroom_core::{CurvePoint, ToneCurve, ToneCurveLut};
use wasm_bindgen::prelude::*;

fn curve_err(e: CurveError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Editable point curve.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct JsToneCurve {
    inner: ToneCurve,
}

#[wasm_bindgen]
impl JsToneCurve {
    /// The identity curve.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsToneCurve {
        JsToneCurve::default()
    }

    /// Build from an array of `{x, y}` objects.
    pub fn from_points(points: JsValue) -> Result<JsToneCurve, JsValue> {
        let points: Vec<CurvePoint> = serde_wasm_bindgen::from_value(points)
            .map_err(|e| JsValue::from_str(&format!("Invalid curve points: {}", e)))?;
        ToneCurve::from_points(points)
            .map(|inner| JsToneCurve { inner })
            .map_err(curve_err)
    }

    /// The control points as an array of `{x, y}` objects.
    pub fn points(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.points)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn point_count(&self) -> usize {
        self.inner.points.len()
    }

    pub fn is_linear(&self) -> bool {
        self.inner.is_linear()
    }

    /// Add an interior point; returns its index.
    pub fn insert_point(&mut self, x: f32, y: f32) -> Result<usize, JsValue> {
        self.inner.insert_point(x, y).map_err(curve_err)
    }

    pub fn move_point(&mut self, index: usize, x: f32, y: f32) -> Result<(), JsValue> {
        self.inner.move_point(index, x, y).map_err(curve_err)
    }

    pub fn remove_point(&mut self, index: usize) -> Result<(), JsValue> {
        self.inner.remove_point(index).map(|_| ()).map_err(curve_err)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Curve output at `x`, for drawing.
    pub fn evaluate(&self, x: f32) -> f32 {
        evaluate_curve(&self.inner, x)
    }

    /// Sample the curve into a LUT.
    pub fn to_lut(&self) -> JsToneCurveLut {
        JsToneCurveLut {
            inner: ToneCurveLut::from_curve(&self.inner),
        }
    }
}

/// Sampled 256-entry tone curve table.
#[wasm_bindgen]
pub struct JsToneCurveLut {
    inner: ToneCurveLut,
}

#[wasm_bindgen]
impl JsToneCurveLut {
    /// Create a LUT from an array of `{x, y}` control points.
    ///
    /// # Errors
    /// Returns an error if the points cannot be deserialized or are not a
    /// valid curve (unordered, unanchored endpoints, fewer than two).
    #[wasm_bindgen(constructor)]
    pub fn new(points: JsValue) -> Result<JsToneCurveLut, JsValue> {
        Ok(JsToneCurve::from_points(points)?.to_lut())
    }

    /// Identity (no-op) LUT.
    pub fn identity() -> JsToneCurveLut {
        JsToneCurveLut {
            inner: ToneCurveLut::identity(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.inner.is_identity()
    }

    /// Raw table (256 bytes): `lut[i]` is the output for input `i`.
    pub fn get_lut(&self) -> Vec<u8> {
        self.inner.lut.to_vec()
    }
}
