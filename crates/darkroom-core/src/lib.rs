//! Darkroom Core - photo development library
//!
//! This crate turns a decoded RGBA bitmap plus a set of edit parameters into
//! a developed bitmap: rotation, cropping, the tonal and color pipeline,
//! the point curve, plus histogram, preview scaling, JPEG encoding and
//! batch export around it.

pub mod bitmap;
pub mod color;
pub mod config;
pub mod curve;
pub mod encode;
pub mod export;
pub mod histogram;
pub mod luminance;
pub mod params;
pub mod pipeline;
pub mod preview;
pub mod render;
pub mod transform;

pub use bitmap::Bitmap;
pub use config::RenderConfig;
pub use curve::{evaluate_curve, CurveError, ToneCurveLut};
pub use encode::{encode_jpeg, EncodeError};
pub use export::{export_batch, export_one, ExportError, ExportItem, ExportSink, ExportSummary};
pub use histogram::{compute_histogram, Histogram};
pub use params::{
    ColorGradePair, ColorGrading, CropParams, CurvePoint, EditParameters, HslAdjustment,
    HslChannels, Profile, ToneCurve,
};
pub use pipeline::apply_pipeline;
pub use preview::{resize_to_fit, PreviewError};
pub use render::{RenderError, RenderMode, RenderOutput, RenderQuality, Renderer};
pub use transform::{
    apply_crop, apply_rotation, compute_rotated_bounds, compute_safe_crop, crop_rect, drag_crop,
    validate_crop, CropError, CropHandle, CropInsets, InterpolationFilter, PixelRect,
};
