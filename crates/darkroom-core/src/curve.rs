//! Point curve interpolation and LUT generation using monotonic cubic hermite splines.
//!
//! This module implements the Fritsch-Carlson algorithm for monotonic spline interpolation,
//! which guarantees the curve passes through every control point without overshooting
//! its neighbours (no solarization artifacts).
//!
//! Control points must be sorted by strictly increasing x with endpoints at 0 and 1.
//! The editing methods on [`ToneCurve`] keep that invariant so the interpolator never
//! has to check it.

use thiserror::Error;

use crate::{CurvePoint, ToneCurve};

/// Smallest horizontal gap kept between neighbouring control points.
pub const MIN_POINT_GAP: f32 = 0.01;

/// Errors raised while editing curve control points.
#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    #[error("Curve needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("Curve endpoints must sit at x=0 and x=1")]
    EndpointsNotAnchored,

    #[error("Curve point x values must be strictly increasing (index {0})")]
    Unordered(usize),

    #[error("Curve point values must be finite and within [0, 1] (index {0})")]
    OutOfRange(usize),

    #[error("No curve point at index {0}")]
    NoSuchPoint(usize),

    #[error("Endpoints cannot be removed")]
    EndpointRemoval,

    #[error("A point already exists too close to x={0}")]
    Crowded(f32),
}

// ============================================================================
// LUT Type
// ============================================================================

/// Pre-computed 256-entry lookup table for efficient curve application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneCurveLut {
    /// LUT values: lut[input] = output
    pub lut: [u8; 256],
}

impl ToneCurveLut {
    /// Generate LUT from a tone curve.
    pub fn from_curve(curve: &ToneCurve) -> Self {
        // Fast path for linear curve
        if curve.is_linear() {
            return Self::identity();
        }

        let tangents = compute_monotonic_tangents(&curve.points);
        let mut lut = [0u8; 256];

        for (i, lut_value) in lut.iter_mut().enumerate() {
            let x = i as f32 / 255.0;
            let y = evaluate_with_tangents(&curve.points, &tangents, x);
            *lut_value = (y * 255.0).clamp(0.0, 255.0).round() as u8;
        }

        Self { lut }
    }

    /// Create identity LUT (no change).
    pub fn identity() -> Self {
        let mut lut = [0u8; 256];
        for (i, lut_value) in lut.iter_mut().enumerate() {
            *lut_value = i as u8;
        }
        Self { lut }
    }

    /// Check if this LUT is identity.
    pub fn is_identity(&self) -> bool {
        self.lut.iter().enumerate().all(|(i, &v)| v == i as u8)
    }

    /// Map a working channel value through the table.
    ///
    /// The value is clamped to [0, 255] and rounded before lookup.
    #[inline]
    pub fn lookup(&self, value: f32) -> f32 {
        self.lut[value.clamp(0.0, 255.0).round() as usize] as f32
    }
}

impl Default for ToneCurveLut {
    fn default() -> Self {
        Self::identity()
    }
}

// ============================================================================
// Monotonic Cubic Hermite Spline (Fritsch-Carlson)
// ============================================================================

/// Compute monotonic tangents using Fritsch-Carlson algorithm.
fn compute_monotonic_tangents(points: &[CurvePoint]) -> Vec<f32> {
    let n = points.len();
    if n < 2 {
        return vec![0.0; n];
    }

    // Compute secants (slopes between adjacent points)
    let mut h: Vec<f32> = Vec::with_capacity(n - 1);
    let mut delta: Vec<f32> = Vec::with_capacity(n - 1);

    for i in 0..n - 1 {
        h.push(points[i + 1].x - points[i].x);
        delta.push(if h[i].abs() < f32::EPSILON {
            0.0
        } else {
            (points[i + 1].y - points[i].y) / h[i]
        });
    }

    let mut m: Vec<f32> = vec![0.0; n];

    // Interior points: weighted harmonic mean, flat at local extrema
    for i in 1..n - 1 {
        if delta[i - 1].signum() != delta[i].signum()
            || delta[i - 1].abs() < f32::EPSILON
            || delta[i].abs() < f32::EPSILON
        {
            m[i] = 0.0;
        } else {
            let w1 = 2.0 * h[i] + h[i - 1];
            let w2 = h[i] + 2.0 * h[i - 1];
            m[i] = (w1 + w2) / (w1 / delta[i - 1] + w2 / delta[i]);
        }
    }

    // Endpoint tangents
    m[0] = delta[0];
    m[n - 1] = delta[n - 2];

    // Enforce monotonicity constraints
    for i in 0..n - 1 {
        if delta[i].abs() < f32::EPSILON {
            m[i] = 0.0;
            m[i + 1] = 0.0;
        } else {
            let alpha = m[i] / delta[i];
            let beta = m[i + 1] / delta[i];

            if alpha > 3.0 {
                m[i] = 3.0 * delta[i];
            }
            if beta > 3.0 {
                m[i + 1] = 3.0 * delta[i];
            }
        }
    }

    m
}

/// Evaluate curve at x with pre-computed tangents.
fn evaluate_with_tangents(points: &[CurvePoint], tangents: &[f32], x: f32) -> f32 {
    let n = points.len();

    if n == 0 {
        return x;
    }
    if n == 1 {
        return points[0].y;
    }

    // Outside the defined span the boundary y holds
    let x = x.clamp(points[0].x, points[n - 1].x);

    let i = find_interval(points, x);

    let p0 = &points[i];
    let p1 = &points[i + 1];

    let h = p1.x - p0.x;
    if h.abs() < f32::EPSILON {
        return p0.y;
    }

    let t = (x - p0.x) / h;
    let t2 = t * t;
    let t3 = t2 * t;

    // Hermite basis functions
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    let y = h00 * p0.y + h10 * h * tangents[i] + h01 * p1.y + h11 * h * tangents[i + 1];

    y.clamp(0.0, 1.0)
}

/// Binary search for interval containing x.
fn find_interval(points: &[CurvePoint], x: f32) -> usize {
    let n = points.len();
    if n <= 2 {
        return 0;
    }

    let mut low = 0;
    let mut high = n - 2;

    while low < high {
        let mid = (low + high).div_ceil(2);
        if points[mid].x <= x {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    low
}

// ============================================================================
// Public Curve Evaluation (for UI preview)
// ============================================================================

/// Evaluate tone curve at a given x value.
/// Used for drawing the curve in the UI.
pub fn evaluate_curve(curve: &ToneCurve, x: f32) -> f32 {
    let tangents = compute_monotonic_tangents(&curve.points);
    evaluate_with_tangents(&curve.points, &tangents, x)
}

// ============================================================================
// Control Point Editing
// ============================================================================

impl ToneCurve {
    /// Build a curve from points, checking the ordering invariant.
    pub fn from_points(points: Vec<CurvePoint>) -> Result<Self, CurveError> {
        let curve = Self { points };
        curve.validate()?;
        Ok(curve)
    }

    /// Check the control point invariant.
    pub fn validate(&self) -> Result<(), CurveError> {
        let n = self.points.len();
        if n < 2 {
            return Err(CurveError::TooFewPoints(n));
        }
        for (i, p) in self.points.iter().enumerate() {
            if !p.x.is_finite() || !p.y.is_finite() || !(0.0..=1.0).contains(&p.y) {
                return Err(CurveError::OutOfRange(i));
            }
        }
        if self.points[0].x != 0.0 || self.points[n - 1].x != 1.0 {
            return Err(CurveError::EndpointsNotAnchored);
        }
        for i in 1..n {
            if self.points[i].x <= self.points[i - 1].x {
                return Err(CurveError::Unordered(i));
            }
        }
        Ok(())
    }

    /// Insert a new interior point, keeping x order. Returns its index.
    ///
    /// `y` is clamped to [0, 1]. Points closer than [`MIN_POINT_GAP`] to an
    /// existing point are rejected.
    pub fn insert_point(&mut self, x: f32, y: f32) -> Result<usize, CurveError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(CurveError::OutOfRange(self.points.len()));
        }
        if x < MIN_POINT_GAP
            || x > 1.0 - MIN_POINT_GAP
            || self
                .points
                .iter()
                .any(|p| (p.x - x).abs() < MIN_POINT_GAP)
        {
            return Err(CurveError::Crowded(x));
        }

        let index = self.points.partition_point(|p| p.x < x);
        self.points
            .insert(index, CurvePoint::new(x, y.clamp(0.0, 1.0)));
        Ok(index)
    }

    /// Move a point. Endpoints keep their x; interior points stay strictly
    /// between their neighbours. Both coordinates are clamped, never rejected.
    pub fn move_point(&mut self, index: usize, x: f32, y: f32) -> Result<(), CurveError> {
        let n = self.points.len();
        if index >= n {
            return Err(CurveError::NoSuchPoint(index));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(CurveError::OutOfRange(index));
        }

        let new_x = if index == 0 || index == n - 1 {
            self.points[index].x
        } else {
            let lo = self.points[index - 1].x + MIN_POINT_GAP;
            let hi = self.points[index + 1].x - MIN_POINT_GAP;
            if lo > hi {
                self.points[index].x
            } else {
                x.clamp(lo, hi)
            }
        };

        self.points[index] = CurvePoint::new(new_x, y.clamp(0.0, 1.0));
        Ok(())
    }

    /// Remove an interior point.
    pub fn remove_point(&mut self, index: usize) -> Result<CurvePoint, CurveError> {
        let n = self.points.len();
        if index >= n {
            return Err(CurveError::NoSuchPoint(index));
        }
        if index == 0 || index == n - 1 {
            return Err(CurveError::EndpointRemoval);
        }
        Ok(self.points.remove(index))
    }

    /// Restore the identity line.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn s_curve() -> ToneCurve {
        ToneCurve {
            points: vec![
                CurvePoint::new(0.0, 0.0),
                CurvePoint::new(0.25, 0.15),
                CurvePoint::new(0.75, 0.85),
                CurvePoint::new(1.0, 1.0),
            ],
        }
    }

    #[test]
    fn test_identity_lut() {
        let lut = ToneCurveLut::identity();
        assert!(lut.is_identity());
        for i in 0..256 {
            assert_eq!(lut.lut[i], i as u8);
        }
    }

    #[test]
    fn test_linear_curve_produces_identity_lut() {
        let lut = ToneCurveLut::from_curve(&ToneCurve::default());
        assert!(lut.is_identity());
    }

    #[test]
    fn test_collinear_three_point_curve_is_identity() {
        let curve = ToneCurve {
            points: vec![
                CurvePoint::new(0.0, 0.0),
                CurvePoint::new(0.5, 0.5),
                CurvePoint::new(1.0, 1.0),
            ],
        };
        let lut = ToneCurveLut::from_curve(&curve);
        for i in 0..256 {
            assert!(
                (lut.lut[i] as i32 - i as i32).abs() <= 1,
                "LUT mismatch at {}: got {}",
                i,
                lut.lut[i]
            );
        }
    }

    #[test]
    fn test_s_curve_increases_contrast() {
        let lut = ToneCurveLut::from_curve(&s_curve());
        assert!(lut.lut[64] < 64, "Shadows not darkened");
        assert!(lut.lut[192] > 192, "Highlights not brightened");
    }

    #[test]
    fn test_monotonicity() {
        let curve = s_curve();
        let mut prev_y = -1.0;
        for i in 0..=100 {
            let x = i as f32 / 100.0;
            let y = evaluate_curve(&curve, x);
            assert!(
                y >= prev_y - f32::EPSILON,
                "Monotonicity violated at x={}: y={} < prev_y={}",
                x,
                y,
                prev_y
            );
            prev_y = y;
        }
    }

    #[test]
    fn test_passes_through_control_points() {
        let curve = s_curve();
        for p in &curve.points {
            let y = evaluate_curve(&curve, p.x);
            assert!((y - p.y).abs() < 1e-5, "Missed ({}, {}): got {}", p.x, p.y, y);
        }
    }

    #[test]
    fn test_local_extremum_has_no_overshoot() {
        // Peak in the middle: tangent there is flat so the curve never exceeds it
        let curve = ToneCurve {
            points: vec![
                CurvePoint::new(0.0, 0.2),
                CurvePoint::new(0.5, 0.8),
                CurvePoint::new(1.0, 0.3),
            ],
        };
        for i in 0..=200 {
            let y = evaluate_curve(&curve, i as f32 / 200.0);
            assert!(y <= 0.8 + 1e-5, "Overshoot: {}", y);
        }
    }

    #[test]
    fn test_steep_curve_no_overshoot() {
        let curve = ToneCurve {
            points: vec![
                CurvePoint::new(0.0, 0.0),
                CurvePoint::new(0.1, 0.9),
                CurvePoint::new(1.0, 1.0),
            ],
        };

        for i in 0..=100 {
            let x = i as f32 / 100.0;
            let y = evaluate_curve(&curve, x);
            assert!((0.0..=1.0).contains(&y), "Overshoot at x={}: y={}", x, y);
        }
    }

    #[test]
    fn test_lut_from_inverted_curve() {
        let curve = ToneCurve {
            points: vec![CurvePoint::new(0.0, 1.0), CurvePoint::new(1.0, 0.0)],
        };
        let lut = ToneCurveLut::from_curve(&curve);
        assert_eq!(lut.lut[0], 255);
        assert_eq!(lut.lut[255], 0);
    }

    #[test]
    fn test_query_outside_span_clamps() {
        let curve = ToneCurve {
            points: vec![CurvePoint::new(0.0, 0.1), CurvePoint::new(1.0, 0.9)],
        };
        assert!((evaluate_curve(&curve, -0.5) - 0.1).abs() < 1e-6);
        assert!((evaluate_curve(&curve, 1.5) - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_lookup_clamps_and_rounds() {
        let lut = ToneCurveLut::from_curve(&s_curve());
        assert_eq!(lut.lookup(-20.0), lut.lut[0] as f32);
        assert_eq!(lut.lookup(300.0), lut.lut[255] as f32);
        assert_eq!(lut.lookup(63.6), lut.lut[64] as f32);
    }

    #[test]
    fn test_insert_point_keeps_order() {
        let mut curve = ToneCurve::new();
        assert_eq!(curve.insert_point(0.6, 0.7), Ok(1));
        assert_eq!(curve.insert_point(0.3, 0.2), Ok(1));
        assert_eq!(curve.points[2].x, 0.6);
        assert!(curve.validate().is_ok());
    }

    #[test]
    fn test_insert_point_rejects_crowding() {
        let mut curve = ToneCurve::new();
        curve.insert_point(0.5, 0.5).unwrap();
        assert_eq!(curve.insert_point(0.505, 0.6), Err(CurveError::Crowded(0.505)));
        assert!(curve.insert_point(0.0, 0.3).is_err());
        assert!(curve.insert_point(1.0, 0.3).is_err());
    }

    #[test]
    fn test_insert_point_clamps_y() {
        let mut curve = ToneCurve::new();
        let i = curve.insert_point(0.4, 1.7).unwrap();
        assert_eq!(curve.points[i].y, 1.0);
    }

    #[test]
    fn test_move_point_stays_between_neighbours() {
        let mut curve = ToneCurve::new();
        curve.insert_point(0.3, 0.3).unwrap();
        curve.insert_point(0.6, 0.6).unwrap();

        curve.move_point(1, 0.9, 0.4).unwrap();
        assert!((curve.points[1].x - (0.6 - MIN_POINT_GAP)).abs() < 1e-6);
        assert!(curve.validate().is_ok());
    }

    #[test]
    fn test_move_endpoint_locks_x() {
        let mut curve = ToneCurve::new();
        curve.move_point(0, 0.4, 0.2).unwrap();
        assert_eq!(curve.points[0], CurvePoint::new(0.0, 0.2));
        curve.move_point(1, 0.4, -3.0).unwrap();
        assert_eq!(curve.points[1], CurvePoint::new(1.0, 0.0));
    }

    #[test]
    fn test_remove_point() {
        let mut curve = ToneCurve::new();
        curve.insert_point(0.5, 0.8).unwrap();
        assert_eq!(curve.remove_point(0), Err(CurveError::EndpointRemoval));
        assert_eq!(curve.remove_point(2), Err(CurveError::EndpointRemoval));
        assert_eq!(curve.remove_point(7), Err(CurveError::NoSuchPoint(7)));
        assert_eq!(curve.remove_point(1), Ok(CurvePoint::new(0.5, 0.8)));
        assert!(curve.is_linear());
    }

    #[test]
    fn test_reset() {
        let mut curve = s_curve();
        curve.reset();
        assert!(curve.is_linear());
    }

    #[test]
    fn test_validate_rejects_bad_curves() {
        let one = ToneCurve {
            points: vec![CurvePoint::new(0.0, 0.0)],
        };
        assert_eq!(one.validate(), Err(CurveError::TooFewPoints(1)));

        let floating = ToneCurve {
            points: vec![CurvePoint::new(0.1, 0.0), CurvePoint::new(1.0, 1.0)],
        };
        assert_eq!(floating.validate(), Err(CurveError::EndpointsNotAnchored));

        let unordered = ToneCurve::from_points(vec![
            CurvePoint::new(0.0, 0.0),
            CurvePoint::new(0.6, 0.5),
            CurvePoint::new(0.4, 0.5),
            CurvePoint::new(1.0, 1.0),
        ]);
        assert_eq!(unordered, Err(CurveError::Unordered(2)));
    }
}
