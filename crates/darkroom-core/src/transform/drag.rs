//! Crop overlay drag resolution.
//!
//! While the crop tool is active the host shows the full rotated image with
//! the crop rectangle drawn over it. Dragging the rectangle or one of its
//! eight handles produces new [`CropParams`]. Pointer deltas arrive as
//! percentages of the displayed image so the result is resolution independent.
//!
//! Every side keeps at least [`MIN_CROP_EXTENT`] percent of extent, so the
//! output always passes [`super::validate_crop`].

use serde::{Deserialize, Serialize};

use crate::params::CropParams;

/// Smallest width/height (percent) a drag may leave.
pub const MIN_CROP_EXTENT: f64 = 1.0;

/// The part of the crop overlay being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CropHandle {
    /// The rectangle body: translate without resizing.
    Move,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Left,
    Right,
    Top,
    Bottom,
}

impl CropHandle {
    fn moves_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    fn moves_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    fn moves_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }
}

/// Resolve a drag gesture against the crop it started from.
///
/// * `start` - Crop at the moment the drag began
/// * `handle` - What is being dragged
/// * `dx`, `dy` - Pointer travel since the drag began, in percent of the displayed image
/// * `aspect_locked` - Keep the starting width/height ratio on corner drags
pub fn drag_crop(
    start: &CropParams,
    handle: CropHandle,
    dx: f64,
    dy: f64,
    aspect_locked: bool,
) -> CropParams {
    let mut next = *start;

    if handle == CropHandle::Move {
        // Limit travel so the rectangle keeps its size at the image edges
        let dx = dx.clamp(-start.left, start.right);
        let dy = dy.clamp(-start.top, start.bottom);
        next.left = start.left + dx;
        next.right = start.right - dx;
        next.top = start.top + dy;
        next.bottom = start.bottom - dy;
        return next;
    }

    let (mut dx, mut dy) = (dx, dy);
    if aspect_locked && handle.is_corner() {
        let ratio = start.width_percent() / start.height_percent();
        // TopRight and BottomLeft grow one axis while the pointer moves against the other
        let sign = if matches!(handle, CropHandle::TopRight | CropHandle::BottomLeft) {
            -1.0
        } else {
            1.0
        };
        if dx.abs() > dy.abs() {
            dy = sign * dx / ratio;
        } else {
            dx = sign * dy * ratio;
        }
    }

    if handle.moves_left() {
        next.left = clamp_side(start.left + dx, next.right);
    }
    if handle.moves_right() {
        next.right = clamp_side(start.right - dx, next.left);
    }
    if handle.moves_top() {
        next.top = clamp_side(start.top + dy, next.bottom);
    }
    if handle.moves_bottom() {
        next.bottom = clamp_side(start.bottom - dy, next.top);
    }

    next
}

/// Clamp one inset so it and the opposite inset leave the minimum extent.
#[inline]
fn clamp_side(value: f64, opposite: f64) -> f64 {
    value.max(0.0).min(100.0 - opposite - MIN_CROP_EXTENT)
}
