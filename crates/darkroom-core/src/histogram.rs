//! Channel and luminance histograms of a rendered bitmap.
//!
//! Feeds the histogram panel and its clipping warnings. Alpha is ignored.

use serde::Serialize;

use crate::bitmap::{Bitmap, CHANNELS};
use crate::luminance::rec601_luminance_u8;

/// 256-bin counts for R, G, B and luminance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    #[serde(with = "bins")]
    pub red: [u32; 256],
    #[serde(with = "bins")]
    pub green: [u32; 256],
    #[serde(with = "bins")]
    pub blue: [u32; 256],
    #[serde(with = "bins")]
    pub luminance: [u32; 256],
}

/// serde only derives arrays up to 32 elements.
mod bins {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bins: &[u32; 256], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(bins.iter())
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            red: [0; 256],
            green: [0; 256],
            blue: [0; 256],
            luminance: [0; 256],
        }
    }
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest R, G or B bin, for normalizing the display.
    pub fn max_value(&self) -> u32 {
        self.red
            .iter()
            .chain(self.green.iter())
            .chain(self.blue.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Any channel has pixels at 255.
    pub fn has_highlight_clipping(&self) -> bool {
        self.red[255] > 0 || self.green[255] > 0 || self.blue[255] > 0
    }

    /// Any channel has pixels at 0.
    pub fn has_shadow_clipping(&self) -> bool {
        self.red[0] > 0 || self.green[0] > 0 || self.blue[0] > 0
    }
}

/// Compute the histogram of an RGBA bitmap.
///
/// Luminance uses the Rec.601 weights (0.299, 0.587, 0.114).
pub fn compute_histogram(image: &Bitmap) -> Histogram {
    let mut hist = Histogram::new();

    for px in image.pixels.chunks_exact(CHANNELS) {
        hist.red[px[0] as usize] += 1;
        hist.green[px[1] as usize] += 1;
        hist.blue[px[2] as usize] += 1;
        hist.luminance[rec601_luminance_u8(px[0], px[1], px[2]) as usize] += 1;
    }

    hist
}
