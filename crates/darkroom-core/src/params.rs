//! Edit parameter data model.
//!
//! [`EditParameters`] is the complete, serializable description of one
//! photo's non-destructive edit. The host creates it with defaults, replaces
//! it wholesale on every user action and hands it by reference to each
//! render. Nothing in the render path mutates it.
//!
//! The serde shape uses camelCase keys so stored documents and presets load
//! directly. Fields missing from a document take their default value.

use serde::{Deserialize, Serialize};

use crate::color::HueBand;

/// Camera-style look profile.
///
/// Each profile carries a fixed multiplier that the exposure stage applies
/// as a flat channel scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Profile {
    #[default]
    #[serde(rename = "adobe-color", alias = "standard")]
    Standard,
    #[serde(rename = "vivid")]
    Vivid,
    #[serde(rename = "portrait")]
    Portrait,
    #[serde(rename = "landscape")]
    Landscape,
}

impl Profile {
    /// The profile's fixed saturation multiplier.
    pub fn saturation_multiplier(self) -> f32 {
        match self {
            Profile::Standard => 1.0,
            Profile::Vivid => 1.25,
            Profile::Portrait => 0.95,
            Profile::Landscape => 1.1,
        }
    }
}

/// Tone curve control point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Input value (0.0 to 1.0)
    pub x: f32,
    /// Output value (0.0 to 1.0)
    pub y: f32,
}

impl CurvePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Point curve defined by draggable control points.
///
/// Points are kept sorted by strictly increasing x with endpoints at x=0 and
/// x=1. The editing methods in [`crate::curve`] maintain that ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToneCurve {
    /// Control points for the curve (sorted by x)
    pub points: Vec<CurvePoint>,
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self {
            // Linear curve by default
            points: vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(1.0, 1.0)],
        }
    }
}

impl ToneCurve {
    /// Create a new linear tone curve
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the curve is the default two-point line (no adjustment)
    pub fn is_linear(&self) -> bool {
        if self.points.len() != 2 {
            return false;
        }
        let first = &self.points[0];
        let last = &self.points[1];
        first.x.abs() < f32::EPSILON
            && first.y.abs() < f32::EPSILON
            && (last.x - 1.0).abs() < f32::EPSILON
            && (last.y - 1.0).abs() < f32::EPSILON
    }
}

/// Hue, saturation and luminance offsets for one hue band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HslAdjustment {
    /// Hue shift in degrees
    pub hue: f32,
    /// Saturation scale in percent (-100 to 100)
    pub saturation: f32,
    /// Luminance scale in percent (-100 to 100)
    pub luminance: f32,
}

impl HslAdjustment {
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-band colour mixer settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HslChannels {
    pub red: HslAdjustment,
    pub orange: HslAdjustment,
    pub yellow: HslAdjustment,
    pub green: HslAdjustment,
    pub aqua: HslAdjustment,
    pub blue: HslAdjustment,
    pub purple: HslAdjustment,
    pub magenta: HslAdjustment,
}

impl HslChannels {
    /// Adjustment for one band.
    pub fn get(&self, band: HueBand) -> &HslAdjustment {
        match band {
            HueBand::Red => &self.red,
            HueBand::Orange => &self.orange,
            HueBand::Yellow => &self.yellow,
            HueBand::Green => &self.green,
            HueBand::Aqua => &self.aqua,
            HueBand::Blue => &self.blue,
            HueBand::Purple => &self.purple,
            HueBand::Magenta => &self.magenta,
        }
    }

    /// Mutable adjustment for one band.
    pub fn get_mut(&mut self, band: HueBand) -> &mut HslAdjustment {
        match band {
            HueBand::Red => &mut self.red,
            HueBand::Orange => &mut self.orange,
            HueBand::Yellow => &mut self.yellow,
            HueBand::Green => &mut self.green,
            HueBand::Aqua => &mut self.aqua,
            HueBand::Blue => &mut self.blue,
            HueBand::Purple => &mut self.purple,
            HueBand::Magenta => &mut self.magenta,
        }
    }

    /// All eight adjustments, indexed by [`HueBand::index`].
    pub fn to_table(&self) -> [HslAdjustment; 8] {
        HueBand::ALL.map(|band| *self.get(band))
    }
}

/// Target hue and strength for one tonal range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorGradePair {
    /// Target hue in degrees (0-360)
    pub hue: f32,
    /// Strength (0-100)
    pub saturation: f32,
}

/// Split-toning style colour grading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorGrading {
    pub shadows: ColorGradePair,
    pub midtones: ColorGradePair,
    pub highlights: ColorGradePair,
    /// Stored with the document but not consumed by the pipeline.
    pub blending: f32,
    /// Shifts the shadow/highlight split point (-100 to 100)
    pub balance: f32,
}

impl Default for ColorGrading {
    fn default() -> Self {
        Self {
            shadows: ColorGradePair::default(),
            midtones: ColorGradePair::default(),
            highlights: ColorGradePair::default(),
            blending: 50.0,
            balance: 0.0,
        }
    }
}

impl ColorGrading {
    /// True when any tonal range has a positive strength.
    pub fn is_active(&self) -> bool {
        self.shadows.saturation > 0.0
            || self.midtones.saturation > 0.0
            || self.highlights.saturation > 0.0
    }
}

/// Crop insets and rotation.
///
/// Insets are percentages (0-100) of the rotated bounding box, measured in
/// from each edge. Valid crops satisfy `left + right < 100` and
/// `top + bottom < 100`; see [`crate::transform::validate_crop`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropParams {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    /// Rotation in degrees (positive = counter-clockwise)
    pub rotation: f64,
}

impl CropParams {
    /// Insets only, no rotation.
    pub fn insets(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
            rotation: 0.0,
        }
    }

    /// True when no inset is applied.
    pub fn is_uncropped(&self) -> bool {
        self.top == 0.0 && self.bottom == 0.0 && self.left == 0.0 && self.right == 0.0
    }

    /// Width of the kept region as a percentage of the rotated box.
    pub fn width_percent(&self) -> f64 {
        100.0 - (self.left + self.right)
    }

    /// Height of the kept region as a percentage of the rotated box.
    pub fn height_percent(&self) -> f64 {
        100.0 - (self.top + self.bottom)
    }
}

/// Complete edit for one photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditParameters {
    pub profile: Profile,
    /// Exposure adjustment in stops
    pub exposure: f32,
    /// Contrast (-100 to 100)
    pub contrast: f32,
    /// Highlights (-100 to 100)
    pub highlights: f32,
    /// Shadows (-100 to 100)
    pub shadows: f32,
    /// Whites (-100 to 100)
    pub whites: f32,
    /// Blacks (-100 to 100)
    pub blacks: f32,
    /// White balance temperature (-100 to 100)
    pub temperature: f32,
    /// White balance tint (-100 to 100)
    pub tint: f32,
    /// Stored with the document but not consumed by the pipeline.
    pub texture: f32,
    /// Clarity (-100 to 100)
    pub clarity: f32,
    /// Dehaze (-100 to 100)
    pub dehaze: f32,
    /// Vibrance (-100 to 100)
    pub vibrance: f32,
    /// Saturation multiplier (0 to 2, 1 = neutral)
    pub saturation: f32,

    pub curve_highlights: f32,
    pub curve_lights: f32,
    pub curve_darks: f32,
    pub curve_shadows: f32,

    pub curve_points: ToneCurve,
    pub hsl: HslChannels,
    pub color_grading: ColorGrading,
    /// Vignette strength (0 to 1)
    pub vignette: f32,
    pub crop: CropParams,
}

impl Default for EditParameters {
    fn default() -> Self {
        Self {
            profile: Profile::Standard,
            exposure: 0.0,
            contrast: 0.0,
            highlights: 0.0,
            shadows: 0.0,
            whites: 0.0,
            blacks: 0.0,
            temperature: 0.0,
            tint: 0.0,
            texture: 0.0,
            clarity: 0.0,
            dehaze: 0.0,
            vibrance: 0.0,
            saturation: 1.0,
            curve_highlights: 0.0,
            curve_lights: 0.0,
            curve_darks: 0.0,
            curve_shadows: 0.0,
            curve_points: ToneCurve::default(),
            hsl: HslChannels::default(),
            color_grading: ColorGrading::default(),
            vignette: 0.0,
            crop: CropParams::default(),
        }
    }
}

impl EditParameters {
    /// Create parameters with default (neutral) values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// True when the edit would change the rendered photo.
    ///
    /// Reserved fields (`texture`, `blending`) do not count.
    pub fn is_edited(&self) -> bool {
        let neutral = Self {
            texture: self.texture,
            color_grading: ColorGrading {
                blending: self.color_grading.blending,
                ..ColorGrading::default()
            },
            ..Self::default()
        };
        *self != neutral
    }
}
