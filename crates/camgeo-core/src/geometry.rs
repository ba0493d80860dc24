//! Core 2D geometry types, kernel-agnostic.
//!
//! These are the vocabulary types shared by every pipeline stage: a 2D
//! point/vector and an axis-aligned bounding box. The engine deliberately
//! does not depend on a general-purpose linear algebra crate — the pipeline
//! only ever needs 2D dot/cross/length/normalize, so those are implemented
//! directly here, the same way the upstream workspace hand-rolls its own
//! `Vec3`/`Vec2` rather than pulling one in.

use serde::{Deserialize, Serialize};

/// A 2D point or vector. Used interchangeably as a position and as a
/// displacement; callers are expected to know which they mean from context,
/// matching how primitives are defined in terms of points and offsets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The z-component of the 3D cross product of the two vectors, i.e. the
    /// signed area of the parallelogram they span.
    pub fn cross(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }

    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        let d = *self - *other;
        d.dot(&d)
    }

    /// Unit vector in the same direction, or the zero vector if this vector
    /// is too short to normalize reliably.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 1e-10 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            *self
        }
    }

    /// This vector rotated 90 degrees counter-clockwise.
    pub fn perpendicular_ccw(&self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.distance_squared_to(other) <= tolerance * tolerance
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// An axis-aligned bounding box in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// The degenerate box containing only `p`.
    pub fn from_point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::from_point(first);
        for p in iter {
            bounds = bounds.including(p);
        }
        Some(bounds)
    }

    /// A box extended, if necessary, to also contain `p`.
    pub fn including(&self, p: Point) -> Self {
        Self {
            min: Point::new(self.min.x.min(p.x), self.min.y.min(p.y)),
            max: Point::new(self.max.x.max(p.x), self.max.y.max(p.y)),
        }
    }

    /// The smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        p.x >= self.min.x - tolerance
            && p.x <= self.max.x + tolerance
            && p.y >= self.min.y - tolerance
            && p.y <= self.max.y + tolerance
    }

    /// Whether `self` lies strictly inside `other`, used as the fast-reject
    /// step of planar containment testing.
    pub fn strictly_inside(&self, other: &Self) -> bool {
        self.min.x > other.min.x
            && self.min.y > other.min.y
            && self.max.x < other.max.x
            && self.max.y < other.max.y
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn translated(&self, delta: Point) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==== Point ====

    #[test]
    fn dot_and_cross_match_known_values() {
        let a = Point::new(1.0, 0.0);
        let b = Point::new(0.0, 1.0);
        assert!((a.dot(&b) - 0.0).abs() < 1e-10);
        assert!((a.cross(&b) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn normalize_produces_unit_length() {
        let v = Point::new(3.0, 4.0).normalize();
        assert!((v.length() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn normalize_of_near_zero_vector_returns_input() {
        let v = Point::new(1e-12, 0.0);
        assert_eq!(v.normalize(), v);
    }

    #[test]
    fn perpendicular_ccw_rotates_ninety_degrees() {
        let v = Point::new(1.0, 0.0).perpendicular_ccw();
        assert!((v.x - 0.0).abs() < 1e-10);
        assert!((v.y - 1.0).abs() < 1e-10);
    }

    // ==== BoundingBox ====

    #[test]
    fn from_points_covers_every_input() {
        let pts = vec![Point::new(1.0, 5.0), Point::new(-2.0, 3.0), Point::new(4.0, -1.0)];
        let bb = BoundingBox::from_points(pts).unwrap();
        assert_eq!(bb.min, Point::new(-2.0, -1.0));
        assert_eq!(bb.max, Point::new(4.0, 5.0));
    }

    #[test]
    fn strictly_inside_rejects_touching_boxes() {
        let outer = BoundingBox::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let touching = BoundingBox::new(Point::new(0.0, 0.0), Point::new(5.0, 5.0));
        assert!(!touching.strictly_inside(&outer));
        let inside = BoundingBox::new(Point::new(1.0, 1.0), Point::new(5.0, 5.0));
        assert!(inside.strictly_inside(&outer));
    }

    #[test]
    fn translated_shifts_both_corners() {
        let bb = BoundingBox::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let shifted = bb.translated(Point::new(2.0, 3.0));
        assert_eq!(shifted.min, Point::new(2.0, 3.0));
        assert_eq!(shifted.max, Point::new(3.0, 4.0));
    }
}
