//! Auto safe crop for rotated images.
//!
//! Rotating a rectangle inside its bounding box leaves empty wedges in the
//! four corners. The safe crop is the largest rectangle with the original
//! aspect ratio, centred in the bounding box, that touches none of them.
//! It is expressed as the four inset percentages [`CropParams`] uses, so the
//! host can apply it directly when the user changes the rotation.

use crate::params::CropParams;

use super::rotation::{is_no_rotation, rotated_extent};

/// Insets (percent of the rotated bounding box) that remove the empty corners.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CropInsets {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl CropInsets {
    /// Crop parameters carrying these insets and the rotation they were computed for.
    pub fn to_crop_params(self, rotation: f64) -> CropParams {
        CropParams {
            top: self.top,
            bottom: self.bottom,
            left: self.left,
            right: self.right,
            rotation,
        }
    }
}

/// Uniform scale that fits an original-aspect rectangle inside the rotated image.
fn safe_scale(width: f64, height: f64, sin: f64, cos: f64) -> f64 {
    if width >= height {
        height / (width * sin + height * cos)
    } else {
        width / (width * cos + height * sin)
    }
}

/// Compute the auto safe crop for an image of the given size rotated by
/// `angle_degrees`.
///
/// A rotation of zero (or a whole turn) returns all-zero insets.
pub fn compute_safe_crop(width: u32, height: u32, angle_degrees: f64) -> CropInsets {
    if is_no_rotation(angle_degrees) || width == 0 || height == 0 {
        return CropInsets::default();
    }

    let (w, h) = (width as f64, height as f64);
    let angle_rad = angle_degrees.to_radians();
    let sin = angle_rad.sin().abs();
    let cos = angle_rad.cos().abs();

    let (box_w, box_h) = rotated_extent(w, h, angle_degrees);
    let scale = safe_scale(w, h, sin, cos);

    let inset_x = ((box_w - w * scale) / 2.0 / box_w * 100.0).clamp(0.0, 50.0);
    let inset_y = ((box_h - h * scale) / 2.0 / box_h * 100.0).clamp(0.0, 50.0);

    CropInsets {
        top: inset_y,
        bottom: inset_y,
        left: inset_x,
        right: inset_x,
    }
}
