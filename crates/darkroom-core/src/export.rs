//! Sequential batch export.
//!
//! Each photo is rendered from its full-resolution source, cropped, and
//! encoded to JPEG. Progress goes to an [`ExportSink`], which also gets a
//! chance to yield to the host between images so a UI thread is not
//! starved. A photo that fails to render or encode is reported and skipped;
//! the rest of the batch still runs.

use thiserror::Error;

use crate::bitmap::Bitmap;
use crate::config::RenderConfig;
use crate::encode::{encode_jpeg, EncodeError};
use crate::params::EditParameters;
use crate::render::{RenderError, RenderMode, RenderQuality, Renderer};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error("Encode failed: {0}")]
    Encode(#[from] EncodeError),
}

/// One photo queued for export.
#[derive(Debug, Clone)]
pub struct ExportItem {
    /// Host-side name, passed back to the sink untouched
    pub name: String,
    /// Full-resolution source
    pub source: Bitmap,
    pub params: EditParameters,
}

/// Receives the results of a batch export.
pub trait ExportSink {
    /// A photo finished encoding.
    fn on_exported(&mut self, index: usize, name: &str, jpeg: Vec<u8>);

    /// A photo failed and was skipped.
    fn on_skipped(&mut self, _index: usize, _name: &str, _error: &ExportError) {}

    /// `done` of `total` photos have been processed (exported or skipped).
    fn on_progress(&mut self, _done: usize, _total: usize) {}

    /// Voluntary yield point between photos.
    fn yield_now(&mut self) {}
}

/// Counts from a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub exported: usize,
    pub skipped: usize,
}

/// Render and encode one photo at export quality.
pub fn export_one(
    source: Bitmap,
    params: &EditParameters,
    config: &RenderConfig,
) -> Result<Vec<u8>, ExportError> {
    let mut renderer = Renderer::with_config(source, config.clone());
    let output = renderer.render(params, RenderMode::Cropped, RenderQuality::Export)?;
    Ok(encode_jpeg(&output.bitmap, config.export_quality)?)
}

/// Export `items` in order.
pub fn export_batch<S: ExportSink + ?Sized>(
    items: Vec<ExportItem>,
    config: &RenderConfig,
    sink: &mut S,
) -> ExportSummary {
    let total = items.len();
    let mut summary = ExportSummary::default();
    log::info!("export started: {} photos", total);

    for (index, item) in items.into_iter().enumerate() {
        let ExportItem {
            name,
            source,
            params,
        } = item;

        match export_one(source, &params, config) {
            Ok(jpeg) => {
                log::debug!("exported {} ({} bytes)", name, jpeg.len());
                summary.exported += 1;
                sink.on_exported(index, &name, jpeg);
            }
            Err(e) => {
                log::warn!("skipping {}: {}", name, e);
                summary.skipped += 1;
                sink.on_skipped(index, &name, &e);
            }
        }

        let done = index + 1;
        sink.on_progress(done, total);
        if config.yield_every > 0 && done % config.yield_every == 0 && done < total {
            sink.yield_now();
        }
    }

    log::info!(
        "export finished: {} exported, {} skipped",
        summary.exported,
        summary.skipped
    );
    summary
}
