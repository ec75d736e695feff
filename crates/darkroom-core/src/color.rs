//! RGB <-> HSL conversion and hue band classification.
//!
//! These are inner-loop primitives of the pixel pipeline: they take and
//! return plain tuples so no call allocates.

use serde::{Deserialize, Serialize};

/// Convert RGB (0-255) to HSL (each 0-1).
///
/// Hue wraps at 1.0. Greys (max == min) report hue and saturation 0.
#[inline]
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let r = r / 255.0;
    let g = g / 255.0;
    let b = b / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h / 6.0, s, l)
}

/// Convert HSL (each 0-1) to RGB (0-255).
///
/// Hue is taken modulo 1, so shifted hues outside [0, 1) are accepted.
#[inline]
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        let v = l * 255.0;
        return (v, v, v);
    }

    let h = h.rem_euclid(1.0);
    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    (
        hue_to_channel(p, q, h + 1.0 / 3.0) * 255.0,
        hue_to_channel(p, q, h) * 255.0,
        hue_to_channel(p, q, h - 1.0 / 3.0) * 255.0,
    )
}

#[inline]
fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// One of the eight fixed hue bands of the HSL colour mixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HueBand {
    Red,
    Orange,
    Yellow,
    Green,
    Aqua,
    Blue,
    Purple,
    Magenta,
}

/// Exclusive upper bounds (degrees) of each band, in ascending order.
/// Hues at or above the last bound wrap back to red.
const BAND_THRESHOLDS: [(f32, HueBand); 8] = [
    (20.0, HueBand::Red),
    (45.0, HueBand::Orange),
    (75.0, HueBand::Yellow),
    (160.0, HueBand::Green),
    (200.0, HueBand::Aqua),
    (260.0, HueBand::Blue),
    (310.0, HueBand::Purple),
    (345.0, HueBand::Magenta),
];

impl HueBand {
    /// All bands in hue order.
    pub const ALL: [HueBand; 8] = [
        HueBand::Red,
        HueBand::Orange,
        HueBand::Yellow,
        HueBand::Green,
        HueBand::Aqua,
        HueBand::Blue,
        HueBand::Purple,
        HueBand::Magenta,
    ];

    /// Classify a hue given in degrees (0-360).
    #[inline]
    pub fn from_degrees(degrees: f32) -> HueBand {
        for &(upper, band) in BAND_THRESHOLDS.iter() {
            if degrees < upper {
                return band;
            }
        }
        HueBand::Red
    }

    /// Position of this band in [`HueBand::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}
