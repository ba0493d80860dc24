//! NURBS curve support.
//!
//! The pipeline delegates every spline operation to a curve satisfying a
//! small contract: evaluate `C(t)`/`C'(t)`, intersect against another curve
//! via subdivision and Newton refinement, build from knots/control
//! points/weights, and fit through a point sequence. [`NurbsCurve`] is a
//! direct, dependency-free implementation of that contract (de Boor
//! evaluation over a clamped knot vector) so the rest of the engine can
//! treat ellipses and splines uniformly wherever a parametric curve is
//! needed.

use camgeo_core::{BoundingBox, Point};
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, GeometryResult};

/// A non-uniform rational B-spline curve in the plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurbsCurve {
    pub degree: usize,
    pub control_points: Vec<Point>,
    pub weights: Vec<f64>,
    /// Clamped, non-decreasing knot vector of length
    /// `control_points.len() + degree + 1`.
    pub knots: Vec<f64>,
}

impl NurbsCurve {
    pub fn validate(&self) -> GeometryResult<()> {
        if self.degree < 1 {
            return Err(GeometryError::InvalidSplineDegree(self.degree));
        }
        let expected_knots = self.control_points.len() + self.degree + 1;
        if self.knots.len() != expected_knots || self.control_points.len() != self.weights.len() {
            return Err(GeometryError::InconsistentSplineDefinition {
                control_points: self.control_points.len(),
                degree: self.degree,
                knots: self.knots.len(),
            });
        }
        if self.knots.windows(2).any(|w| w[1] < w[0] - 1e-12) {
            return Err(GeometryError::NonMonotonicKnots);
        }
        Ok(())
    }

    fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.knots.len() - self.degree - 1])
    }

    /// Maps a global parameter in [0, 1] to the curve's native knot domain.
    fn to_knot_param(&self, t: f64) -> f64 {
        let (lo, hi) = self.domain();
        lo + t.clamp(0.0, 1.0) * (hi - lo)
    }

    fn find_span(&self, u: f64) -> usize {
        let n = self.control_points.len() - 1;
        let (_, hi) = self.domain();
        if u >= hi {
            return n;
        }
        let mut low = self.degree;
        let mut high = n + 1;
        while high - low > 1 {
            let mid = (low + high) / 2;
            if u < self.knots[mid] {
                high = mid;
            } else {
                low = mid;
            }
        }
        low
    }

    fn basis_funcs(&self, span: usize, u: f64) -> Vec<f64> {
        let p = self.degree;
        let mut left = vec![0.0; p + 1];
        let mut right = vec![0.0; p + 1];
        let mut n = vec![1.0; p + 1];
        for j in 1..=p {
            left[j] = u - self.knots[span + 1 - j];
            right[j] = self.knots[span + j] - u;
            let mut saved = 0.0;
            for r in 0..j {
                let denom = right[r + 1] + left[j - r];
                let temp = if denom.abs() < 1e-15 { 0.0 } else { n[r] / denom };
                n[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            n[j] = saved;
        }
        n
    }

    /// Rational de Boor evaluation at global parameter `t` in [0, 1].
    pub fn evaluate(&self, t: f64) -> Point {
        let u = self.to_knot_param(t);
        let span = self.find_span(u);
        let basis = self.basis_funcs(span, u);
        let p = self.degree;
        let mut numerator = Point::ZERO;
        let mut denominator = 0.0;
        for j in 0..=p {
            let idx = span - p + j;
            let w = self.weights[idx];
            numerator = numerator + self.control_points[idx] * (basis[j] * w);
            denominator += basis[j] * w;
        }
        if denominator.abs() < 1e-15 {
            self.control_points[span.min(self.control_points.len() - 1)]
        } else {
            numerator * (1.0 / denominator)
        }
    }

    /// Numeric derivative at global parameter `t`, central-differenced
    /// except at the domain boundary.
    pub fn derivative(&self, t: f64) -> Point {
        let h = 1e-6;
        let t0 = (t - h).max(0.0);
        let t1 = (t + h).min(1.0);
        let span = t1 - t0;
        if span < 1e-12 {
            return Point::ZERO;
        }
        (self.evaluate(t1) - self.evaluate(t0)) * (1.0 / span)
    }

    pub fn reversed(&self) -> Self {
        let (lo, hi) = self.domain();
        let mirrored: Vec<f64> = self
            .knots
            .iter()
            .rev()
            .map(|&k| lo + hi - k)
            .collect();
        Self {
            degree: self.degree,
            control_points: self.control_points.iter().rev().copied().collect(),
            weights: self.weights.iter().rev().copied().collect(),
            knots: mirrored,
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        // The control polygon's hull bounds the curve itself (the convex
        // hull property of B-splines); using the hull directly is tighter
        // to compute than sampling and never excludes curve points.
        BoundingBox::from_points(self.control_points.iter().copied())
            .unwrap_or(BoundingBox::from_point(Point::ZERO))
    }

    /// Builds a clamped, uniform-weight curve of the given degree that
    /// interpolates `points` approximately, by using the points directly as
    /// control points with a clamped uniform knot vector. This is a
    /// least-effort fit adequate for offset-refit use (C10), where the
    /// input points are already a dense, near-uniform parametric sampling
    /// of the curve being refit.
    pub fn fit_through(points: &[Point], degree: usize) -> GeometryResult<Self> {
        if points.len() < degree + 1 {
            return Err(GeometryError::InconsistentSplineDefinition {
                control_points: points.len(),
                degree,
                knots: 0,
            });
        }
        let n = points.len();
        let weights = vec![1.0; n];
        let mut knots = Vec::with_capacity(n + degree + 1);
        knots.extend(std::iter::repeat(0.0).take(degree + 1));
        let interior = n - degree - 1;
        for i in 1..=interior {
            knots.push(i as f64 / (interior + 1) as f64);
        }
        knots.extend(std::iter::repeat(1.0).take(degree + 1));
        let curve = Self {
            degree,
            control_points: points.to_vec(),
            weights,
            knots,
        };
        curve.validate()?;
        Ok(curve)
    }

    /// Root-mean-square distance between `points` and this curve sampled at
    /// the same parametric positions, used to judge offset refit quality.
    pub fn fit_error(&self, points: &[Point]) -> f64 {
        if points.is_empty() {
            return 0.0;
        }
        let n = points.len() - 1;
        let sum_sq: f64 = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let t = if n == 0 { 0.0 } else { i as f64 / n as f64 };
                self.evaluate(t).distance_squared_to(p)
            })
            .sum();
        (sum_sq / points.len() as f64).sqrt()
    }
}

/// Curve-curve intersection via uniform subdivision followed by Newton
/// refinement on each candidate bracket. Works for any pair of evaluable
/// curves, which is why NURBS and full/partial ellipses both route through
/// it once lifted to a common `Fn(f64) -> Point` sampling interface.
pub fn intersect_sampled_curves<A, B>(
    a: &A,
    b: &B,
    samples: usize,
    tolerance: f64,
) -> Vec<(f64, f64, Point)>
where
    A: Fn(f64) -> Point,
    B: Fn(f64) -> Point,
{
    let mut hits = Vec::new();
    let a_pts: Vec<Point> = (0..=samples).map(|i| a(i as f64 / samples as f64)).collect();
    let b_pts: Vec<Point> = (0..=samples).map(|i| b(i as f64 / samples as f64)).collect();

    for i in 0..samples {
        for j in 0..samples {
            if let Some((ta, tb, p)) = refine_bracket(
                &a, &b, i as f64 / samples as f64, (i + 1) as f64 / samples as f64,
                j as f64 / samples as f64, (j + 1) as f64 / samples as f64,
                a_pts[i], a_pts[i + 1], b_pts[j], b_pts[j + 1], tolerance,
            ) {
                if !hits.iter().any(|&(ea, eb, _): &(f64, f64, Point)| {
                    (ea - ta).abs() < tolerance && (eb - tb).abs() < tolerance
                }) {
                    hits.push((ta, tb, p));
                }
            }
        }
    }
    hits
}

#[allow(clippy::too_many_arguments)]
fn refine_bracket<A, B>(
    a: &A,
    b: &B,
    a0: f64,
    a1: f64,
    b0: f64,
    b1: f64,
    pa0: Point,
    pa1: Point,
    pb0: Point,
    pb1: Point,
    tolerance: f64,
) -> Option<(f64, f64, Point)>
where
    A: Fn(f64) -> Point,
    B: Fn(f64) -> Point,
{
    if !segments_bbox_overlap(pa0, pa1, pb0, pb1) {
        return None;
    }
    let mut ta = (a0 + a1) / 2.0;
    let mut tb = (b0 + b1) / 2.0;
    for _ in 0..25 {
        let pa = a(ta);
        let pb = b(tb);
        let diff = pa - pb;
        if diff.length() < tolerance {
            return Some((ta.clamp(0.0, 1.0), tb.clamp(0.0, 1.0), pa));
        }
        let h = 1e-6;
        let da = (a((ta + h).min(1.0)) - a((ta - h).max(0.0))) * (1.0 / (2.0 * h));
        let db = (b((tb + h).min(1.0)) - b((tb - h).max(0.0))) * (1.0 / (2.0 * h));
        // Solve the 2x2 linear system [da, -db] * [dta, dtb]^T = -diff.
        let m00 = da.x;
        let m01 = -db.x;
        let m10 = da.y;
        let m11 = -db.y;
        let det = m00 * m11 - m01 * m10;
        if det.abs() < 1e-14 {
            break;
        }
        let rhs_x = -diff.x;
        let rhs_y = -diff.y;
        let dta = (rhs_x * m11 - m01 * rhs_y) / det;
        let dtb = (m00 * rhs_y - rhs_x * m10) / det;
        ta = (ta + dta).clamp(0.0, 1.0);
        tb = (tb + dtb).clamp(0.0, 1.0);
    }
    let final_diff = a(ta) - b(tb);
    if final_diff.length() < tolerance.max(1e-6) {
        Some((ta, tb, a(ta)))
    } else {
        None
    }
}

fn segments_bbox_overlap(a0: Point, a1: Point, b0: Point, b1: Point) -> bool {
    let a_min_x = a0.x.min(a1.x);
    let a_max_x = a0.x.max(a1.x);
    let a_min_y = a0.y.min(a1.y);
    let a_max_y = a0.y.max(a1.y);
    let b_min_x = b0.x.min(b1.x);
    let b_max_x = b0.x.max(b1.x);
    let b_min_y = b0.y.min(b1.y);
    let b_max_y = b0.y.max(b1.y);
    a_min_x <= b_max_x && a_max_x >= b_min_x && a_min_y <= b_max_y && a_max_y >= b_min_y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_line_curve() -> NurbsCurve {
        NurbsCurve {
            degree: 1,
            control_points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            weights: vec![1.0, 1.0],
            knots: vec![0.0, 0.0, 1.0, 1.0],
        }
    }

    #[test]
    fn linear_curve_evaluates_endpoints() {
        let c = straight_line_curve();
        assert!(c.evaluate(0.0).distance_to(&Point::new(0.0, 0.0)) < 1e-9);
        assert!(c.evaluate(1.0).distance_to(&Point::new(10.0, 0.0)) < 1e-9);
        assert!(c.evaluate(0.5).distance_to(&Point::new(5.0, 0.0)) < 1e-9);
    }

    #[test]
    fn reversed_curve_swaps_endpoints() {
        let c = straight_line_curve();
        let r = c.reversed();
        assert!(r.evaluate(0.0).distance_to(&c.evaluate(1.0)) < 1e-9);
        assert!(r.evaluate(1.0).distance_to(&c.evaluate(0.0)) < 1e-9);
    }

    #[test]
    fn validate_rejects_mismatched_knot_count() {
        let mut c = straight_line_curve();
        c.knots.pop();
        assert!(c.validate().is_err());
    }

    #[test]
    fn fit_through_interpolates_sampled_points() {
        let points: Vec<Point> = (0..=10).map(|i| Point::new(i as f64, (i as f64).sin())).collect();
        let curve = NurbsCurve::fit_through(&points, 3).unwrap();
        assert!(curve.fit_error(&points) < 0.5);
    }

    #[test]
    fn crossing_lines_intersect_near_expected_point() {
        let a = |t: f64| Point::new(t * 10.0, 0.0);
        let b = |t: f64| Point::new(5.0, t * 10.0 - 5.0);
        let hits = intersect_sampled_curves(&a, &b, 20, 1e-6);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].2.distance_to(&Point::new(5.0, 0.0)) < 1e-6);
    }
}
