//! The per-pixel development pipeline.
//!
//! Converts a (rotated, cropped) RGBA bitmap into the graded result. The
//! stage order is fixed and determines the look of every edit:
//!
//! 1. Exposure (times the profile multiplier)
//! 2. White balance
//! 3. Luminance-masked tone blend (shadows, highlights, whites, blacks)
//! 4. Dehaze
//! 5. Clarity
//! 6. Parametric tone curve
//! 7. Contrast
//! 8. Point curve LUT
//! 9. Color grading
//! 10. HSL mixer (vibrance, saturation, per-band shifts)
//! 11. Vignette
//!
//! Channels are carried as `f32` on the 0-255 scale and are only clamped
//! where a stage needs it. The final value is rounded and clamped to `u8`;
//! alpha is never touched.
//!
//! Every pixel depends only on itself, the parameters and the image size,
//! so rows can be processed in any order. With the `parallel` feature rows
//! are spread across the rayon pool.

use crate::bitmap::{Bitmap, CHANNELS};
use crate::color::{hsl_to_rgb, rgb_to_hsl, HueBand};
use crate::curve::ToneCurveLut;
use crate::luminance::{calculate_luminance, normalized_luminance};
use crate::params::{ColorGradePair, EditParameters, HslAdjustment};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Blend strength of each color grading range at full saturation.
const GRADING_STRENGTH: f32 = 0.3;

/// One color grading range with its target color resolved.
#[derive(Debug, Clone, Copy)]
struct GradeTarget {
    rgb: [f32; 3],
    /// `GRADING_STRENGTH * saturation / 100`
    amount: f32,
}

impl GradeTarget {
    fn resolve(pair: &ColorGradePair) -> Self {
        let (r, g, b) = hsl_to_rgb(pair.hue / 360.0, 1.0, 0.5);
        Self {
            rgb: [r, g, b],
            amount: GRADING_STRENGTH * pair.saturation.max(0.0) / 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Grading {
    shadows: GradeTarget,
    midtones: GradeTarget,
    highlights: GradeTarget,
    /// Luminance where shadows hand over to highlights
    split: f32,
}

impl Grading {
    /// Shadow, midtone and highlight masks for a luminance.
    #[inline]
    fn masks(&self, lum: f32) -> (f32, f32, f32) {
        let shadow = if self.split <= 0.0 {
            0.0
        } else {
            (1.0 - lum / self.split).clamp(0.0, 1.0)
        };
        let highlight = if self.split >= 1.0 {
            0.0
        } else {
            ((lum - self.split) / (1.0 - self.split)).clamp(0.0, 1.0)
        };
        let midtone = (1.0 - shadow - highlight).max(0.0);
        (shadow, midtone, highlight)
    }
}

#[derive(Debug, Clone, Copy)]
struct Vignette {
    strength: f32,
    center_x: f32,
    center_y: f32,
    max_dist: f32,
}

impl Vignette {
    #[inline]
    fn factor(&self, x: u32, y: u32) -> f32 {
        let dx = x as f32 - self.center_x;
        let dy = y as f32 - self.center_y;
        let dist = (dx * dx + dy * dy).sqrt() / self.max_dist;
        (1.0 - dist * dist * self.strength).max(0.0)
    }
}

/// Per-render constants hoisted out of the pixel loop.
#[derive(Debug, Clone)]
pub struct PreparedParams {
    exposure_mul: f32,
    temperature: f32,
    tint: f32,
    shadows: f32,
    highlights: f32,
    whites: f32,
    blacks: f32,
    /// `dehaze / 100`, `None` when zero
    dehaze: Option<f32>,
    /// `clarity / 200`, `None` when zero
    clarity: Option<f32>,
    curve_weights: [f32; 4],
    contrast_factor: f32,
    vibrance: f32,
    saturation: f32,
    hsl: [HslAdjustment; 8],
    grading: Option<Grading>,
    vignette: Option<Vignette>,
}

impl PreparedParams {
    /// Resolve everything that does not vary per pixel.
    pub fn new(params: &EditParameters, width: u32, height: u32) -> Self {
        let contrast = params.contrast;
        let contrast_factor = (259.0 * (contrast + 255.0)) / (255.0 * (259.0 - contrast));

        let grading = params.color_grading.is_active().then(|| {
            let cg = &params.color_grading;
            Grading {
                shadows: GradeTarget::resolve(&cg.shadows),
                midtones: GradeTarget::resolve(&cg.midtones),
                highlights: GradeTarget::resolve(&cg.highlights),
                split: (0.5 - cg.balance / 100.0).clamp(0.0, 1.0),
            }
        });

        let vignette = (params.vignette > 0.0).then(|| {
            let center_x = width as f32 / 2.0;
            let center_y = height as f32 / 2.0;
            Vignette {
                strength: params.vignette,
                center_x,
                center_y,
                max_dist: (center_x * center_x + center_y * center_y).sqrt().max(f32::EPSILON),
            }
        });

        Self {
            exposure_mul: 2.0_f32.powf(params.exposure) * params.profile.saturation_multiplier(),
            temperature: params.temperature,
            tint: params.tint,
            shadows: params.shadows,
            highlights: params.highlights,
            whites: params.whites,
            blacks: params.blacks,
            dehaze: (params.dehaze != 0.0).then_some(params.dehaze / 100.0),
            clarity: (params.clarity != 0.0).then_some(params.clarity / 200.0),
            curve_weights: [
                params.curve_shadows,
                params.curve_darks,
                params.curve_lights,
                params.curve_highlights,
            ],
            contrast_factor,
            vibrance: params.vibrance / 100.0,
            saturation: params.saturation,
            hsl: params.hsl.to_table(),
            grading,
            vignette,
        }
    }

    /// Run stages 1-11 on one pixel. `lut` is `None` for the identity curve.
    #[inline]
    fn develop(&self, rgb: [f32; 3], x: u32, y: u32, lut: Option<&ToneCurveLut>) -> [f32; 3] {
        let [mut r, mut g, mut b] = rgb;

        // 1. Exposure and profile
        r *= self.exposure_mul;
        g *= self.exposure_mul;
        b *= self.exposure_mul;

        // 2. White balance
        r += self.temperature - self.tint * 0.5;
        g += self.tint;
        b -= self.temperature + self.tint * 0.5;

        // 3. Tone regions
        let lum = normalized_luminance(r, g, b);
        let shadow_w = (1.0 - lum.sqrt() * 2.0).max(0.0);
        let highlight_w = lum * lum;
        let white_w = highlight_w * highlight_w;
        let black_w = (1.0 - lum.powf(0.2)).max(0.0);
        let tone = self.shadows * shadow_w * 0.5
            + self.highlights * highlight_w * 0.5
            + self.whites * white_w * 0.8
            + self.blacks * black_w * 0.8;
        r += tone;
        g += tone;
        b += tone;

        // 4. Dehaze
        if let Some(dh) = self.dehaze {
            let pivot = 128.0 * dh;
            let scale = 1.0 - dh.abs() * 0.4;
            r = (r - pivot) / scale + pivot;
            g = (g - pivot) / scale + pivot;
            b = (b - pivot) / scale + pivot;
        }

        // 5. Clarity, weighted toward the midtones of the stage 3 luminance
        if let Some(cl) = self.clarity {
            let mid_w = 1.0 - (lum - 0.5).abs() * 2.0;
            let factor = 1.0 + cl * mid_w;
            r = (r - 128.0) * factor + 128.0;
            g = (g - 128.0) * factor + 128.0;
            b = (b - 128.0) * factor + 128.0;
        }

        // 6. Parametric curve
        let [c_shadows, c_darks, c_lights, c_highlights] = self.curve_weights;
        let curve = c_shadows * (1.0 - lum * 4.0).max(0.0)
            + c_darks * (1.0 - (lum - 0.25).abs() * 4.0).max(0.0)
            + c_lights * (1.0 - (lum - 0.75).abs() * 4.0).max(0.0)
            + c_highlights * (lum * 4.0 - 3.0).max(0.0);
        r += curve;
        g += curve;
        b += curve;

        // 7. Contrast
        r = self.contrast_factor * (r - 128.0) + 128.0;
        g = self.contrast_factor * (g - 128.0) + 128.0;
        b = self.contrast_factor * (b - 128.0) + 128.0;

        // 8. Point curve
        if let Some(lut) = lut {
            r = lut.lookup(r);
            g = lut.lookup(g);
            b = lut.lookup(b);
        }

        // 9. Color grading
        if let Some(grading) = &self.grading {
            let graded_lum = (calculate_luminance(r, g, b) / 255.0).clamp(0.0, 1.0);
            let (shadow_m, mid_m, highlight_m) = grading.masks(graded_lum);
            for (target, mask) in [
                (&grading.shadows, shadow_m),
                (&grading.midtones, mid_m),
                (&grading.highlights, highlight_m),
            ] {
                let t = target.amount * mask;
                if t > 0.0 {
                    r += (target.rgb[0] - r) * t;
                    g += (target.rgb[1] - g) * t;
                    b += (target.rgb[2] - b) * t;
                }
            }
        }

        // 10. HSL mixer
        let (mut h, mut s, mut l) =
            rgb_to_hsl(r.clamp(0.0, 255.0), g.clamp(0.0, 255.0), b.clamp(0.0, 255.0));
        if self.vibrance != 0.0 {
            s *= 1.0 + self.vibrance * (1.0 - s);
        }
        s *= self.saturation;
        let band = &self.hsl[HueBand::from_degrees(h * 360.0).index()];
        h = (h + band.hue / 360.0).rem_euclid(1.0);
        s = (s * (1.0 + band.saturation / 100.0)).clamp(0.0, 1.0);
        l = (l * (1.0 + band.luminance / 100.0)).clamp(0.0, 1.0);
        (r, g, b) = hsl_to_rgb(h, s, l);

        // 11. Vignette
        if let Some(vignette) = &self.vignette {
            let factor = vignette.factor(x, y);
            r *= factor;
            g *= factor;
            b *= factor;
        }

        [r, g, b]
    }

    fn develop_row(&self, row: &mut [u8], y: u32, lut: Option<&ToneCurveLut>) {
        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let input = [px[0] as f32, px[1] as f32, px[2] as f32];
            let [r, g, b] = self.develop(input, x as u32, y, lut);
            px[0] = to_u8(r);
            px[1] = to_u8(g);
            px[2] = to_u8(b);
        }
    }
}

#[inline]
fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Develop `image` in place.
///
/// # Arguments
///
/// * `image` - Cropped working bitmap
/// * `params` - The edit to apply
/// * `lut` - Point curve LUT built from `params.curve_points`
pub fn apply_pipeline(image: &mut Bitmap, params: &EditParameters, lut: &ToneCurveLut) {
    if image.is_empty() {
        return;
    }
    debug_assert_eq!(image.pixels.len(), image.pixel_count() * CHANNELS);

    let prepared = PreparedParams::new(params, image.width, image.height);
    let lut = (!lut.is_identity()).then_some(lut);
    let row_bytes = image.width as usize * CHANNELS;

    #[cfg(feature = "parallel")]
    image
        .pixels
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| prepared.develop_row(row, y as u32, lut));

    #[cfg(not(feature = "parallel"))]
    for (y, row) in image.pixels.chunks_mut(row_bytes).enumerate() {
        prepared.develop_row(row, y as u32, lut);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{CurvePoint, Profile, ToneCurve};

    fn develop(image: &Bitmap, params: &EditParameters) -> Bitmap {
        let mut out = image.clone();
        let lut = ToneCurveLut::from_curve(&params.curve_points);
        apply_pipeline(&mut out, params, &lut);
        out
    }

    /// A bitmap containing a spread of colors and an alpha ramp.
    fn sample_image() -> Bitmap {
        let (w, h) = (16u32, 16u32);
        let mut pixels = Vec::with_capacity((w * h * 4) as usize);
        for y in 0..h {
            for x in 0..w {
                pixels.extend_from_slice(&[
                    (x * 16) as u8,
                    (y * 16) as u8,
                    ((x + y) * 8) as u8,
                    (x * y) as u8,
                ]);
            }
        }
        Bitmap::new(w, h, pixels)
    }

    #[test]
    fn test_default_params_are_identity() {
        let img = sample_image();
        assert_eq!(develop(&img, &EditParameters::default()), img);
    }

    #[test]
    fn test_exposure_plus_one_on_mid_gray_clips_to_white() {
        let img = Bitmap::filled(2, 2, [128, 128, 128, 255]);
        let mut params = EditParameters::default();
        params.exposure = 1.0;
        let out = develop(&img, &params);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(out.pixel(x, y), [255, 255, 255, 255]);
            }
        }
    }

    #[test]
    fn test_alpha_untouched() {
        let img = sample_image();
        let mut params = EditParameters::default();
        params.exposure = 0.7;
        params.contrast = 30.0;
        params.vignette = 0.8;
        params.saturation = 0.2;
        let out = develop(&img, &params);
        for (a, b) in img.pixels.chunks_exact(4).zip(out.pixels.chunks_exact(4)) {
            assert_eq!(a[3], b[3]);
        }
    }

    #[test]
    fn test_zero_saturation_is_gray() {
        let img = sample_image();
        let mut params = EditParameters::default();
        params.saturation = 0.0;
        let out = develop(&img, &params);
        for px in out.pixels.chunks_exact(4) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn test_vignette_center_unchanged_corner_darkened() {
        let img = Bitmap::filled(11, 11, [200, 200, 200, 255]);
        let mut params = EditParameters::default();
        params.vignette = 1.0;
        let out = develop(&img, &params);

        // Centre of an 11px image is at 5.5, so (5, 5) sits just off it
        assert!(out.pixel(5, 5)[0] >= 195);
        let corner = out.pixel(0, 0)[0];
        assert!(corner < 40, "corner {}", corner);
    }

    #[test]
    fn test_vignette_factor_reaches_zero_at_max_distance() {
        let vignette = Vignette {
            strength: 1.0,
            center_x: 5.0,
            center_y: 5.0,
            max_dist: (50.0f32).sqrt(),
        };
        assert_eq!(vignette.factor(5, 5), 1.0);
        assert!(vignette.factor(0, 0).abs() < 1e-6);
        assert!(vignette.factor(10, 10).abs() < 1e-6);
    }

    #[test]
    fn test_profile_scales_channels() {
        let img = Bitmap::filled(1, 1, [100, 100, 100, 255]);
        let mut params = EditParameters::default();
        params.profile = Profile::Vivid;
        assert_eq!(develop(&img, &params).pixel(0, 0)[0], 125);
        params.profile = Profile::Portrait;
        assert_eq!(develop(&img, &params).pixel(0, 0)[0], 95);
    }

    #[test]
    fn test_temperature_warms() {
        let img = Bitmap::filled(1, 1, [100, 100, 100, 255]);
        let mut params = EditParameters::default();
        params.temperature = 20.0;
        let [r, g, b, _] = develop(&img, &params).pixel(0, 0);
        assert!(r > g && g > b, "{} {} {}", r, g, b);
    }

    #[test]
    fn test_tint_raises_green_and_splits_magenta() {
        let img = Bitmap::filled(1, 1, [100, 100, 100, 255]);
        let mut params = EditParameters::default();
        params.tint = 20.0;
        let [r, g, b, _] = develop(&img, &params).pixel(0, 0);
        // G gains the full tint, R and B each lose half of it
        assert!((g as i32 - 120).abs() <= 1, "green {}", g);
        assert!((r as i32 - 90).abs() <= 1, "red {}", r);
        assert!((b as i32 - 90).abs() <= 1, "blue {}", b);
    }

    #[test]
    fn test_contrast_pushes_away_from_midpoint() {
        let img = Bitmap::new(2, 1, vec![60, 60, 60, 255, 200, 200, 200, 255]);
        let mut params = EditParameters::default();
        params.contrast = 50.0;
        let out = develop(&img, &params);
        assert!(out.pixel(0, 0)[0] < 60);
        assert!(out.pixel(1, 0)[0] > 200);
    }

    #[test]
    fn test_shadows_lift_dark_pixels_only() {
        let img = Bitmap::new(2, 1, vec![20, 20, 20, 255, 230, 230, 230, 255]);
        let mut params = EditParameters::default();
        params.shadows = 60.0;
        let out = develop(&img, &params);
        assert!(out.pixel(0, 0)[0] > 20);
        assert_eq!(out.pixel(1, 0)[0], 230);
    }

    #[test]
    fn test_dehaze_expands_around_pivot() {
        let img = Bitmap::filled(1, 1, [200, 200, 200, 255]);
        let mut params = EditParameters::default();
        params.dehaze = 50.0;
        // (200 - 64) / 0.8 + 64 = 234
        assert_eq!(develop(&img, &params).pixel(0, 0)[0], 234);
    }

    #[test]
    fn test_clarity_leaves_extremes_alone() {
        let img = Bitmap::new(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]);
        let mut params = EditParameters::default();
        params.clarity = 100.0;
        let out = develop(&img, &params);
        assert_eq!(out.pixel(0, 0)[0], 0);
        assert_eq!(out.pixel(1, 0)[0], 255);
    }

    #[test]
    fn test_parametric_highlights_only_touch_bright_pixels() {
        let img = Bitmap::new(2, 1, vec![100, 100, 100, 255, 240, 240, 240, 255]);
        let mut params = EditParameters::default();
        params.curve_highlights = -40.0;
        let out = develop(&img, &params);
        assert_eq!(out.pixel(0, 0)[0], 100);
        assert!(out.pixel(1, 0)[0] < 240);
    }

    #[test]
    fn test_point_curve_applied() {
        let img = Bitmap::filled(1, 1, [128, 128, 128, 255]);
        let mut params = EditParameters::default();
        params.curve_points = ToneCurve {
            points: vec![
                CurvePoint::new(0.0, 0.0),
                CurvePoint::new(0.5, 0.75),
                CurvePoint::new(1.0, 1.0),
            ],
        };
        let out = develop(&img, &params);
        assert!(out.pixel(0, 0)[0] > 180);
    }

    #[test]
    fn test_hsl_band_hue_shift() {
        // Pure red sits in the red band
        let img = Bitmap::filled(1, 1, [255, 0, 0, 255]);
        let mut params = EditParameters::default();
        params.hsl.red.hue = 120.0;
        let [r, g, b, _] = develop(&img, &params).pixel(0, 0);
        assert_eq!((r, g, b), (0, 255, 0));
    }

    #[test]
    fn test_hsl_band_only_affects_its_band() {
        let img = Bitmap::filled(1, 1, [0, 0, 255, 255]);
        let mut params = EditParameters::default();
        params.hsl.red.saturation = -100.0;
        assert_eq!(develop(&img, &params), img);
    }

    #[test]
    fn test_vibrance_boosts_muted_colors_more() {
        let img = Bitmap::new(2, 1, vec![140, 120, 120, 255, 255, 0, 0, 255]);
        let mut params = EditParameters::default();
        params.vibrance = 50.0;
        let out = develop(&img, &params);
        // Muted pixel gains saturation, fully saturated one cannot
        let [r, g, _, _] = out.pixel(0, 0);
        assert!(r as i32 - g as i32 > 20);
        assert_eq!(out.pixel(1, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_color_grading_tints_shadows() {
        let img = Bitmap::filled(1, 1, [30, 30, 30, 255]);
        let mut params = EditParameters::default();
        params.color_grading.shadows.hue = 240.0;
        params.color_grading.shadows.saturation = 100.0;
        let [r, _, b, _] = develop(&img, &params).pixel(0, 0);
        assert!(b > r, "blue {} red {}", b, r);
    }

    /// Blue shadows and orange highlights at full strength.
    fn split_tone(balance: f32) -> EditParameters {
        let mut params = EditParameters::default();
        params.color_grading.shadows.hue = 240.0;
        params.color_grading.shadows.saturation = 100.0;
        params.color_grading.highlights.hue = 30.0;
        params.color_grading.highlights.saturation = 100.0;
        params.color_grading.balance = balance;
        params
    }

    #[test]
    fn test_balance_moves_split_point() {
        let img = Bitmap::filled(1, 1, [128, 128, 128, 255]);

        // Mid-grey sits on the split: neither tint reaches it
        let [r, _, b, _] = develop(&img, &split_tone(0.0)).pixel(0, 0);
        assert!((r as i32 - b as i32).abs() <= 2, "neutral r {} b {}", r, b);

        // Positive balance lowers the split, so mid-grey takes the highlight tint
        let [r, _, b, _] = develop(&img, &split_tone(40.0)).pixel(0, 0);
        assert!(r as i32 - b as i32 > 20, "warm r {} b {}", r, b);

        // Negative balance raises it, so mid-grey takes the shadow tint
        let [r, _, b, _] = develop(&img, &split_tone(-40.0)).pixel(0, 0);
        assert!(b as i32 - r as i32 > 20, "cool r {} b {}", r, b);
    }

    #[test]
    fn test_color_grading_tints_midtones() {
        let img = Bitmap::filled(1, 1, [128, 128, 128, 255]);
        let mut params = EditParameters::default();
        params.color_grading.midtones.hue = 120.0;
        params.color_grading.midtones.saturation = 100.0;
        let [r, g, b, _] = develop(&img, &params).pixel(0, 0);
        // 0.3 of the way to pure green
        assert!((g as i32 - 166).abs() <= 2, "green {}", g);
        assert!((r as i32 - b as i32).abs() <= 1);
        assert!(g as i32 - r as i32 > 60);
    }

    #[test]
    fn test_color_grading_highlights_skip_dark_pixels() {
        let img = Bitmap::new(2, 1, vec![230, 230, 230, 255, 30, 30, 30, 255]);
        let mut params = EditParameters::default();
        params.color_grading.highlights.hue = 0.0;
        params.color_grading.highlights.saturation = 100.0;
        let out = develop(&img, &params);
        let [r, g, b, _] = out.pixel(0, 0);
        assert!(r as i32 - g as i32 > 40, "red {} green {}", r, g);
        assert!((g as i32 - b as i32).abs() <= 1);
        assert_eq!(out.pixel(1, 0), [30, 30, 30, 255]);
    }

    #[test]
    fn test_color_grading_inactive_without_saturation() {
        let img = sample_image();
        let mut params = EditParameters::default();
        params.color_grading.midtones.hue = 90.0;
        params.color_grading.balance = 40.0;
        assert_eq!(develop(&img, &params), img);
    }

    #[test]
    fn test_grading_masks_partition() {
        let grading = Grading {
            shadows: GradeTarget::resolve(&ColorGradePair::default()),
            midtones: GradeTarget::resolve(&ColorGradePair::default()),
            highlights: GradeTarget::resolve(&ColorGradePair::default()),
            split: 0.5,
        };
        assert_eq!(grading.masks(0.0), (1.0, 0.0, 0.0));
        assert_eq!(grading.masks(0.5), (0.0, 1.0, 0.0));
        assert_eq!(grading.masks(1.0), (0.0, 0.0, 1.0));
        let (s, m, h) = grading.masks(0.25);
        assert!((s + m + h - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_grading_split_extremes() {
        let mut grading = Grading {
            shadows: GradeTarget::resolve(&ColorGradePair::default()),
            midtones: GradeTarget::resolve(&ColorGradePair::default()),
            highlights: GradeTarget::resolve(&ColorGradePair::default()),
            split: 0.0,
        };
        assert_eq!(grading.masks(0.0).0, 0.0);
        grading.split = 1.0;
        assert_eq!(grading.masks(1.0).2, 0.0);
    }

    #[test]
    fn test_empty_image() {
        let mut img = Bitmap::new(0, 0, Vec::new());
        apply_pipeline(&mut img, &EditParameters::default(), &ToneCurveLut::identity());
        assert!(img.is_empty());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
