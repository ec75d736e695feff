//! Batch export bindings.
//!
//! The host queues photos into a `JsExportBatch` and runs it with
//! callbacks. Runs synchronously; call it from a Web Worker so the page
//! stays responsive.
//!
//! # Example (TypeScript)
//! ```typescript
//! const batch = new JsExportBatch();
//! for (const photo of edited) batch.add(photo.name, photo.bitmap, photo.params);
//! const summary = batch.run(
//!   (done, total) => postMessage({ done, total }),
//!   (index, name, jpeg) => zip.file(name, jpeg),
//!   (index, name, error) => console.warn(name, error),
//! );
//! ```

use darkroom_core::export::{export_batch, ExportError, ExportItem, ExportSink, ExportSummary};
use darkroom_core::RenderConfig;
use js_sys::{Function, Uint8Array};
use wasm_bindgen::prelude::*;

use crate::render::parse_params;
use crate::types::JsBitmap;

/// Photos queued for export.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsExportBatch {
    items: Vec<ExportItem>,
    config: RenderConfig,
}

#[wasm_bindgen]
impl JsExportBatch {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsExportBatch {
        JsExportBatch::default()
    }

    /// Override export settings with a `RenderConfig` document.
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        self.config = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid render config: {}", e)))?;
        Ok(())
    }

    /// Queue a full-resolution source with its edit document.
    pub fn add(&mut self, name: String, source: &JsBitmap, params: JsValue) -> Result<(), JsValue> {
        let params = parse_params(params)?;
        self.items.push(ExportItem {
            name,
            source: source.as_bitmap().clone(),
            params,
        });
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn queued(&self) -> usize {
        self.items.len()
    }

    /// Export every queued photo and empty the queue.
    ///
    /// # Arguments
    /// * `on_progress` - `(done, total)` after each photo
    /// * `on_exported` - `(index, name, jpegBytes)` for each success
    /// * `on_skipped` - `(index, name, message)` for each failure
    ///
    /// # Returns
    /// `{exported, skipped}` counts.
    pub fn run(
        &mut self,
        on_progress: &Function,
        on_exported: &Function,
        on_skipped: &Function,
    ) -> JsValue {
        let mut sink = CallbackSink {
            on_progress,
            on_exported,
            on_skipped,
        };
        let summary = export_batch(std::mem::take(&mut self.items), &self.config, &mut sink);
        summary_to_js(summary)
    }
}

struct CallbackSink<'a> {
    on_progress: &'a Function,
    on_exported: &'a Function,
    on_skipped: &'a Function,
}

impl ExportSink for CallbackSink<'_> {
    fn on_exported(&mut self, index: usize, name: &str, jpeg: Vec<u8>) {
        let bytes = Uint8Array::from(jpeg.as_slice());
        if let Err(e) = self.on_exported.call3(
            &JsValue::NULL,
            &JsValue::from(index as u32),
            &JsValue::from_str(name),
            &bytes,
        ) {
            log::error!("on_exported callback threw: {:?}", e);
        }
    }

    fn on_skipped(&mut self, index: usize, name: &str, error: &ExportError) {
        if let Err(e) = self.on_skipped.call3(
            &JsValue::NULL,
            &JsValue::from(index as u32),
            &JsValue::from_str(name),
            &JsValue::from_str(&error.to_string()),
        ) {
            log::error!("on_skipped callback threw: {:?}", e);
        }
    }

    fn on_progress(&mut self, done: usize, total: usize) {
        if let Err(e) = self.on_progress.call2(
            &JsValue::NULL,
            &JsValue::from(done as u32),
            &JsValue::from(total as u32),
        ) {
            log::error!("on_progress callback threw: {:?}", e);
        }
    }
}

fn summary_to_js(summary: ExportSummary) -> JsValue {
    let obj = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&obj, &"exported".into(), &(summary.exported as u32).into());
    let _ = js_sys::Reflect::set(&obj, &"skipped".into(), &(summary.skipped as u32).into());
    obj.into()
}
