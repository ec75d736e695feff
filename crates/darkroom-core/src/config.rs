//! Render settings shared by the preview and export paths.

use serde::{Deserialize, Serialize};

use crate::transform::InterpolationFilter;

/// Longest edge of the interactive preview buffer.
pub const DEFAULT_MAX_PREVIEW_DIMENSION: u32 = 1400;

/// JPEG quality (0-1) used for exports.
pub const DEFAULT_EXPORT_QUALITY: f32 = 0.95;

/// Tunables for rendering and export.
///
/// Missing fields take their defaults, so hosts only send what they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Longest edge of the preview buffer in pixels
    pub max_preview_dimension: u32,
    /// JPEG quality for exports, 0 to 1
    pub export_quality: f32,
    /// Rotation resampling while editing
    pub preview_filter: InterpolationFilter,
    /// Rotation resampling at export time
    pub export_filter: InterpolationFilter,
    /// Yield to the host after this many exported images (0 never yields)
    pub yield_every: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_preview_dimension: DEFAULT_MAX_PREVIEW_DIMENSION,
            export_quality: DEFAULT_EXPORT_QUALITY,
            preview_filter: InterpolationFilter::Bilinear,
            export_filter: InterpolationFilter::Lanczos3,
            yield_every: 1,
        }
    }
}
