//! Render orchestration: rotate, crop, develop.
//!
//! A [`Renderer`] owns one source bitmap and turns it into a developed
//! bitmap for a given [`EditParameters`]:
//!
//! 1. Rotate the source into its rotated bounding box
//! 2. Validate the crop and derive its pixel rectangle
//! 3. Extract the rectangle (or keep everything for the crop overlay)
//! 4. Build or reuse the point curve LUT
//! 5. Run the pixel pipeline once
//!
//! The rotated buffer is cached and only rebuilt when the angle, the
//! resampling filter or the source changes. The curve LUT is cached by its
//! control points. Slider changes therefore skip straight to step 2.

use thiserror::Error;

use crate::bitmap::Bitmap;
use crate::config::RenderConfig;
use crate::curve::ToneCurveLut;
use crate::params::{EditParameters, ToneCurve};
use crate::pipeline::apply_pipeline;
use crate::preview::{resize_to_fit, PreviewError};
use crate::transform::{
    apply_crop, apply_rotation, crop_rect, is_no_rotation, validate_crop, CropError,
    InterpolationFilter, PixelRect,
};

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("Source bitmap is empty")]
    EmptySource,

    #[error("Invalid crop: {0}")]
    InvalidCrop(#[from] CropError),
}

/// Whether the crop is applied to the pixels or only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Physically crop the rotated image.
    #[default]
    Cropped,
    /// Develop the whole rotated image and return the crop as an overlay
    /// rectangle. Used while the crop tool is open.
    Full,
}

/// Selects the rotation resampling filter from [`RenderConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderQuality {
    #[default]
    Preview,
    Export,
}

/// A developed bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub bitmap: Bitmap,
    /// Crop rectangle within `bitmap`, set in [`RenderMode::Full`]
    pub overlay: Option<PixelRect>,
}

#[derive(Debug)]
struct RotationCache {
    angle: f64,
    filter: InterpolationFilter,
    rotated: Bitmap,
}

#[derive(Debug)]
struct LutCache {
    curve: ToneCurve,
    lut: ToneCurveLut,
}

/// Renders one source bitmap under changing edit parameters.
#[derive(Debug)]
pub struct Renderer {
    source: Bitmap,
    config: RenderConfig,
    rotation: Option<RotationCache>,
    lut: Option<LutCache>,
}

impl Renderer {
    pub fn new(source: Bitmap) -> Self {
        Self::with_config(source, RenderConfig::default())
    }

    pub fn with_config(source: Bitmap, config: RenderConfig) -> Self {
        Self {
            source,
            config,
            rotation: None,
            lut: None,
        }
    }

    /// Renderer over a preview-sized copy of `source`, downscaled to
    /// `config.max_preview_dimension` with the preview filter.
    pub fn for_preview(source: &Bitmap, config: RenderConfig) -> Result<Self, PreviewError> {
        let preview = resize_to_fit(source, config.max_preview_dimension, config.preview_filter)?;
        Ok(Self::with_config(preview, config))
    }

    pub fn source(&self) -> &Bitmap {
        &self.source
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replace the source image. Drops the rotation cache.
    pub fn set_source(&mut self, source: Bitmap) {
        self.source = source;
        self.rotation = None;
    }

    /// Replace the configuration. Drops the rotation cache since the
    /// resampling filters may have changed.
    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
        self.rotation = None;
    }

    /// Dimensions of the source after rotating by `angle_degrees`.
    pub fn rotated_dimensions(&self, angle_degrees: f64) -> (u32, u32) {
        crate::transform::compute_rotated_bounds(
            self.source.width,
            self.source.height,
            angle_degrees,
        )
    }

    /// Develop the source with `params`.
    pub fn render(
        &mut self,
        params: &EditParameters,
        mode: RenderMode,
        quality: RenderQuality,
    ) -> Result<RenderOutput, RenderError> {
        if self.source.is_empty() {
            return Err(RenderError::EmptySource);
        }

        validate_crop(&params.crop).inspect_err(|e| {
            log::warn!("crop rejected, skipping render: {}", e);
        })?;

        let filter = match quality {
            RenderQuality::Preview => self.config.preview_filter,
            RenderQuality::Export => self.config.export_filter,
        };
        let lut = self.curve_lut(&params.curve_points);
        let rotated = self.rotated(params.crop.rotation, filter);

        let rect = crop_rect(rotated.width, rotated.height, &params.crop)?;

        let (mut working, overlay) = match mode {
            RenderMode::Cropped => (apply_crop(rotated, rect), None),
            RenderMode::Full => (rotated.clone(), Some(rect)),
        };

        log::debug!(
            "developing {}x{} ({:?}, {:?})",
            working.width,
            working.height,
            mode,
            quality
        );
        apply_pipeline(&mut working, params, &lut);

        Ok(RenderOutput {
            bitmap: working,
            overlay,
        })
    }

    /// The source rotated by `angle`, rebuilt only when the key changes.
    fn rotated(&mut self, angle: f64, filter: InterpolationFilter) -> &Bitmap {
        if is_no_rotation(angle) {
            return &self.source;
        }

        let hit = self
            .rotation
            .as_ref()
            .is_some_and(|c| c.angle == angle && c.filter == filter);
        if hit {
            log::debug!("rotation cache hit ({} deg)", angle);
        } else {
            log::debug!("rotation cache miss ({} deg, {:?})", angle, filter);
            self.rotation = Some(RotationCache {
                angle,
                filter,
                rotated: apply_rotation(&self.source, angle, filter),
            });
        }

        match &self.rotation {
            Some(cache) => &cache.rotated,
            None => &self.source,
        }
    }

    fn curve_lut(&mut self, curve: &ToneCurve) -> ToneCurveLut {
        match &self.lut {
            Some(cache) if cache.curve == *curve => {
                log::debug!("curve LUT cache hit");
                cache.lut.clone()
            }
            _ => {
                log::debug!("curve LUT cache miss ({} points)", curve.points.len());
                let lut = ToneCurveLut::from_curve(curve);
                self.lut = Some(LutCache {
                    curve: curve.clone(),
                    lut: lut.clone(),
                });
                lut
            }
        }
    }

    #[cfg(test)]
    fn has_rotation_cache(&self) -> bool {
        self.rotation.is_some()
    }
}
