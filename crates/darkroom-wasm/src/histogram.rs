//! Histogram bindings.

use darkroom_core::histogram::{compute_histogram as compute_histogram_core, Histogram};
use wasm_bindgen::prelude::*;

use crate::types::JsBitmap;

/// Histogram result accessible from JavaScript.
///
/// 256-bin counts for red, green, blue and luminance plus clipping flags.
#[wasm_bindgen]
pub struct JsHistogram {
    inner: Histogram,
}

#[wasm_bindgen]
impl JsHistogram {
    pub fn red(&self) -> Vec<u32> {
        self.inner.red.to_vec()
    }

    pub fn green(&self) -> Vec<u32> {
        self.inner.green.to_vec()
    }

    pub fn blue(&self) -> Vec<u32> {
        self.inner.blue.to_vec()
    }

    pub fn luminance(&self) -> Vec<u32> {
        self.inner.luminance.to_vec()
    }

    /// Largest RGB bin, for normalizing the display.
    #[wasm_bindgen(getter)]
    pub fn max_value(&self) -> u32 {
        self.inner.max_value()
    }

    #[wasm_bindgen(getter)]
    pub fn has_highlight_clipping(&self) -> bool {
        self.inner.has_highlight_clipping()
    }

    #[wasm_bindgen(getter)]
    pub fn has_shadow_clipping(&self) -> bool {
        self.inner.has_shadow_clipping()
    }
}

/// Compute the histogram of a rendered bitmap.
///
/// # Example (TypeScript)
/// ```typescript
/// const hist = compute_histogram(out.bitmap());
/// drawHistogram(hist.red(), hist.green(), hist.blue(), hist.max_value);
/// ```
#[wasm_bindgen]
pub fn compute_histogram(image: &JsBitmap) -> JsHistogram {
    JsHistogram {
        inner: compute_histogram_core(image.as_bitmap()),
    }
}
