//! Image rotation with bilinear and Lanczos3 interpolation.
//!
//! The source is drawn into a freshly sized buffer, rotated about its
//! centre. The buffer is the rotated bounding box, so nothing is clipped;
//! the corners the rotation exposes stay fully transparent.
//!
//! - **Bilinear**: Fast interpolation suitable for preview rendering
//! - **Lanczos3**: High-quality interpolation suitable for export
//!
//! # Algorithm
//!
//! The rotation uses inverse mapping: for each pixel in the output image,
//! we calculate which source pixel(s) contribute to it and interpolate
//! their values.
//!
//! Coordinates are taken at pixel centres, so quarter and half turns land
//! exactly on source pixels:
//!
//! ```text
//! dx = dst_x + 0.5 - dst_cx
//! dy = dst_y + 0.5 - dst_cy
//! src_x = dx * cos(θ) - dy * sin(θ) + src_cx - 0.5
//! src_y = dx * sin(θ) + dy * cos(θ) + src_cy - 0.5
//! ```
//!
//! Samples up to [`EDGE_BAND`] pixels past the outermost pixel centres repeat
//! the edge pixel, which keeps the border of the rotated image (and every
//! pixel of the safe crop) opaque. Anything further out is transparent.

use serde::{Deserialize, Serialize};

use crate::bitmap::{Bitmap, CHANNELS};

/// Interpolation filter for rotation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation - good for preview rendering.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation - good for export.
    Lanczos3,
}

/// Angles closer than this to zero are treated as no rotation.
const ANGLE_EPSILON: f64 = 0.001;

/// Distance (in pixels) past the outermost pixel centres that still samples
/// the edge pixel. Covers the half pixel each rounded bound and crop edge
/// can add.
pub(crate) const EDGE_BAND: f64 = 1.0;

/// True when the angle is a whole number of turns.
pub(crate) fn is_no_rotation(angle_degrees: f64) -> bool {
    let a = (angle_degrees % 360.0).abs();
    a < ANGLE_EPSILON || (360.0 - a) < ANGLE_EPSILON
}

/// Exact (unrounded) size of the rotated bounding box.
///
/// `|w·cosθ| + |h·sinθ|` by `|w·sinθ| + |h·cosθ|`.
pub fn rotated_extent(width: f64, height: f64, angle_degrees: f64) -> (f64, f64) {
    if is_no_rotation(angle_degrees) {
        return (width, height);
    }
    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();
    (width * cos + height * sin, width * sin + height * cos)
}

/// Compute the pixel dimensions of the bounding box for a rotated image.
///
/// # Arguments
///
/// * `width` - Original image width
/// * `height` - Original image height
/// * `angle_degrees` - Rotation angle in degrees (positive = counter-clockwise)
///
/// # Returns
///
/// Tuple of (new_width, new_height); never zero.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    if is_no_rotation(angle_degrees) {
        return (width, height);
    }

    // Exact quarter and half turns
    let abs_angle = (angle_degrees % 360.0).abs();
    if (abs_angle - 90.0).abs() < ANGLE_EPSILON || (abs_angle - 270.0).abs() < ANGLE_EPSILON {
        return (height, width);
    }
    if (abs_angle - 180.0).abs() < ANGLE_EPSILON {
        return (width, height);
    }

    let (w, h) = rotated_extent(width as f64, height as f64, angle_degrees);
    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

/// Rotate a bitmap about its centre into its rotated bounding box.
///
/// # Arguments
///
/// * `image` - Source bitmap to rotate
/// * `angle_degrees` - Rotation angle in degrees (positive = counter-clockwise)
/// * `filter` - Interpolation method (Bilinear for preview, Lanczos3 for export)
pub fn apply_rotation(image: &Bitmap, angle_degrees: f64, filter: InterpolationFilter) -> Bitmap {
    if is_no_rotation(angle_degrees) || image.is_empty() {
        return image.clone();
    }

    let (src_w, src_h) = (image.width as f64, image.height as f64);
    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, angle_degrees);

    // Inverse map with +θ: in y-down pixel space that turns the output by -θ,
    // i.e. counter-clockwise on screen
    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = Bitmap::transparent(dst_w, dst_h);

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            let src_x = dx * cos - dy * sin + src_cx - 0.5;
            let src_y = dx * sin + dy * cos + src_cy - 0.5;

            let pixel = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y),
                InterpolationFilter::Lanczos3 => sample_lanczos3(image, src_x, src_y),
            };

            let dst_idx = (dst_y as usize * dst_w as usize + dst_x as usize) * CHANNELS;
            output.pixels[dst_idx..dst_idx + CHANNELS].copy_from_slice(&pixel);
        }
    }

    output
}

#[inline]
fn get_pixel_f64(image: &Bitmap, px: usize, py: usize) -> [f64; 4] {
    let idx = (py * image.width as usize + px) * CHANNELS;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
        image.pixels[idx + 3] as f64,
    ]
}

/// Sample a pixel using bilinear interpolation over the 4 nearest pixels.
///
/// `x`, `y` are in pixel-centre coordinates. Points within [`EDGE_BAND`] of
/// the outermost centres clamp to the edge; points further out are fully
/// transparent.
fn sample_bilinear(image: &Bitmap, x: f64, y: f64) -> [u8; 4] {
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;

    if x < -EDGE_BAND || x > max_x + EDGE_BAND || y < -EDGE_BAND || y > max_y + EDGE_BAND {
        return [0, 0, 0, 0];
    }
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(image.width as usize - 1);
    let y1 = (y0 + 1).min(image.height as usize - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 4];
    for i in 0..CHANNELS {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Sample a pixel using Lanczos3 interpolation over a 6x6 neighbourhood.
///
/// Falls back to bilinear within the kernel radius of the border.
fn sample_lanczos3(image: &Bitmap, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as i64, image.height as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            let dx = x - px as f64;
            let dy = y - py as f64;
            let weight = lanczos_weight(dx, 3.0) * lanczos_weight(dy, 3.0);

            let pixel = get_pixel_f64(image, px as usize, py as usize);
            for c in 0..CHANNELS {
                sum[c] += pixel[c] * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 4];
    if weight_sum > 0.0 {
        for c in 0..CHANNELS {
            result[c] = (sum[c] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
