//! Renderer bindings.
//!
//! A `JsRenderer` holds one photo's source bitmap together with its rotation
//! and curve caches. Edit parameters cross the boundary as the plain JSON
//! document the host stores (camelCase keys, missing fields defaulted).
//!
//! # Example (TypeScript)
//! ```typescript
//! const renderer = new JsRenderer(previewBitmap);
//!
//! // Slider change: rotation cache is reused
//! const out = renderer.render(params, isCropMode);
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(out.bitmap().pixels()), out.bitmap().width), 0, 0);
//! if (out.overlay) drawCropRect(out.overlay);
//! ```

use darkroom_core::{
    EditParameters, PreviewError, RenderConfig, RenderError, RenderMode, RenderOutput,
    RenderQuality, Renderer,
};
use wasm_bindgen::prelude::*;

use crate::types::{JsBitmap, JsPixelRect};

/// Result of a render: the developed bitmap and, in crop mode, the overlay.
#[wasm_bindgen]
pub struct JsRenderOutput {
    bitmap: JsBitmap,
    overlay: Option<JsPixelRect>,
}

#[wasm_bindgen]
impl JsRenderOutput {
    /// The developed bitmap (copied handle).
    pub fn bitmap(&self) -> JsBitmap {
        self.bitmap.clone()
    }

    /// Crop rectangle within the bitmap; only set for crop-mode renders.
    #[wasm_bindgen(getter)]
    pub fn overlay(&self) -> Option<JsPixelRect> {
        self.overlay
    }
}

impl From<RenderOutput> for JsRenderOutput {
    fn from(output: RenderOutput) -> Self {
        Self {
            bitmap: output.bitmap.into(),
            overlay: output.overlay.map(Into::into),
        }
    }
}

/// Stateful renderer for one photo.
#[wasm_bindgen]
pub struct JsRenderer {
    inner: Renderer,
}

#[wasm_bindgen]
impl JsRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new(source: &JsBitmap) -> JsRenderer {
        JsRenderer {
            inner: Renderer::new(source.as_bitmap().clone()),
        }
    }

    /// Create a renderer with a custom `RenderConfig` document.
    pub fn with_config(source: &JsBitmap, config: JsValue) -> Result<JsRenderer, JsValue> {
        let config = parse_config(config)?;
        Ok(JsRenderer {
            inner: Renderer::with_config(source.as_bitmap().clone(), config),
        })
    }

    /// Create a renderer over a copy of `source` downscaled to the config's
    /// `maxPreviewDimension`. Pass `undefined` for the default config.
    pub fn for_preview(source: &JsBitmap, config: JsValue) -> Result<JsRenderer, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            RenderConfig::default()
        } else {
            parse_config(config)?
        };
        Self::preview_with(source, config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Swap in a new source (e.g. a different photo). Clears the rotation cache.
    pub fn set_source(&mut self, source: &JsBitmap) {
        self.inner.set_source(source.as_bitmap().clone());
    }

    /// Render a preview.
    ///
    /// # Arguments
    /// * `params` - EditParameters document
    /// * `crop_mode` - Render the whole rotated image and return the crop as an overlay
    pub fn render(&mut self, params: JsValue, crop_mode: bool) -> Result<JsRenderOutput, JsValue> {
        let params = parse_params(params)?;
        let mode = if crop_mode {
            RenderMode::Full
        } else {
            RenderMode::Cropped
        };
        self.render_with(&params, mode, RenderQuality::Preview)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Render at export quality, cropped.
    pub fn render_export(&mut self, params: JsValue) -> Result<JsBitmap, JsValue> {
        let params = parse_params(params)?;
        self.render_with(&params, RenderMode::Cropped, RenderQuality::Export)
            .map(|out| out.bitmap)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsRenderer {
    pub(crate) fn preview_with(
        source: &JsBitmap,
        config: RenderConfig,
    ) -> Result<JsRenderer, PreviewError> {
        Renderer::for_preview(source.as_bitmap(), config).map(|inner| JsRenderer { inner })
    }

    pub(crate) fn render_with(
        &mut self,
        params: &EditParameters,
        mode: RenderMode,
        quality: RenderQuality,
    ) -> Result<JsRenderOutput, RenderError> {
        self.inner.render(params, mode, quality).map(Into::into)
    }
}

fn parse_config(config: JsValue) -> Result<RenderConfig, JsValue> {
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid render config: {}", e)))
}

pub(crate) fn parse_params(params: JsValue) -> Result<EditParameters, JsValue> {
    serde_wasm_bindgen::from_value(params)
        .map_err(|e| JsValue::from_str(&format!("Invalid edit parameters: {}", e)))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_render_from_js_document() {
        let src = JsBitmap::new(4, 4, vec![128u8; 64]).unwrap();
        let mut renderer = JsRenderer::new(&src);
        let params = serde_wasm_bindgen::to_value(&EditParameters::default()).unwrap();
        let out = renderer.render(params, false).unwrap();
        assert_eq!(out.bitmap().pixels(), src.pixels());
    }

    #[wasm_bindgen_test]
    fn test_invalid_document_rejected() {
        let mut renderer = JsRenderer::new(&JsBitmap::new(1, 1, vec![0u8; 4]).unwrap());
        assert!(renderer.render(JsValue::from_str("nope"), false).is_err());
    }
}
