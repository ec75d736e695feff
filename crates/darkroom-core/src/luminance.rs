//! Luminance calculation utilities.
//!
//! The pixel pipeline masks its tonal stages with ITU-R BT.709 luminance.
//! The histogram panel uses the cheaper Rec.601 weights.

/// ITU-R BT.709 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f32 = 0.0722;

/// Calculate BT.709 luminance from working channel values (nominally 0-255).
///
/// The inputs may lie outside [0, 255]; the result is not clamped.
#[inline]
pub fn calculate_luminance(r: f32, g: f32, b: f32) -> f32 {
    LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b
}

/// BT.709 luminance of working channel values, normalized and clamped to [0, 1].
#[inline]
pub fn normalized_luminance(r: f32, g: f32, b: f32) -> f32 {
    (calculate_luminance(r, g, b) / 255.0).clamp(0.0, 1.0)
}

/// Rec.601 luminance of u8 RGB values, rounded to a histogram bin (0-255).
#[inline]
pub fn rec601_luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    lum.clamp(0.0, 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_sum_to_one() {
        let sum = LUMINANCE_R + LUMINANCE_G + LUMINANCE_B;
        assert!((sum - 1.0).abs() < 1e-6, "Coefficients should sum to 1.0");
    }

    #[test]
    fn test_normalized_luminance_extremes() {
        assert!(normalized_luminance(0.0, 0.0, 0.0).abs() < f32::EPSILON);
        assert!((normalized_luminance(255.0, 255.0, 255.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalized_luminance_clamps() {
        assert_eq!(normalized_luminance(600.0, 600.0, 600.0), 1.0);
        assert_eq!(normalized_luminance(-50.0, -50.0, -50.0), 0.0);
    }

    #[test]
    fn test_gray_preserves_value() {
        for v in [0u8, 64, 128, 192, 255] {
            let lum = calculate_luminance(v as f32, v as f32, v as f32);
            assert!((lum - v as f32).abs() < 0.01);
            assert!((rec601_luminance_u8(v, v, v) as i32 - v as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_pure_green_weights() {
        let lum = calculate_luminance(0.0, 255.0, 0.0);
        // 0.7152 * 255 ≈ 182.38
        assert!((lum - 182.38).abs() < 0.01);
        // 0.587 * 255 ≈ 149.7
        assert_eq!(rec601_luminance_u8(0, 255, 0), 150);
    }
}
