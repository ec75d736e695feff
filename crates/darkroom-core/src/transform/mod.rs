//! Geometric transforms: rotation, cropping and the crop overlay.
//!
//! Transforms run before any tonal work, so the adjustment pipeline only
//! ever sees the pixels that end up in the output.
//!
//! # Transform Order
//!
//! 1. Rotation into the rotated bounding box
//! 2. Crop (skipped when rendering the full image under the crop overlay)
//! 3. Adjustment pipeline
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = counter-clockwise
//! - Crop insets are percentages (0 to 100) of the rotated bounding box
//! - Origin is top-left corner

mod crop;
mod drag;
mod rotation;
mod safe_crop;

pub use crop::{apply_crop, crop_rect, validate_crop, CropError, PixelRect};
pub use drag::{drag_crop, CropHandle, MIN_CROP_EXTENT};
pub use rotation::{apply_rotation, compute_rotated_bounds, rotated_extent, InterpolationFilter};
pub use safe_crop::{compute_safe_crop, CropInsets};

pub(crate) use rotation::is_no_rotation;
