//! Tests for geometry types

use camgeo_core::{BoundingBox, Point};

// ============================================================
// Point Tests
// ============================================================

#[test]
fn point_new() {
    let p = Point::new(1.0, 2.0);
    assert_eq!(p.x, 1.0);
    assert_eq!(p.y, 2.0);
}

#[test]
fn point_zero() {
    assert_eq!(Point::ZERO, Point::new(0.0, 0.0));
}

#[test]
fn point_dot_product() {
    let v1 = Point::new(1.0, 2.0);
    let v2 = Point::new(4.0, 5.0);
    assert!((v1.dot(&v2) - 14.0).abs() < 1e-10);
}

#[test]
fn point_cross_product_is_signed_area() {
    let x = Point::new(1.0, 0.0);
    let y = Point::new(0.0, 1.0);
    assert!((x.cross(&y) - 1.0).abs() < 1e-10);
    assert!((y.cross(&x) - (-1.0)).abs() < 1e-10);
}

#[test]
fn point_length() {
    let v = Point::new(3.0, 4.0);
    assert!((v.length() - 5.0).abs() < 1e-10);
}

#[test]
fn point_normalize() {
    let v = Point::new(3.0, 4.0);
    let n = v.normalize();
    assert!((n.length() - 1.0).abs() < 1e-10);
    assert!((n.x - 0.6).abs() < 1e-10);
    assert!((n.y - 0.8).abs() < 1e-10);
}

#[test]
fn point_normalize_zero_returns_self() {
    assert_eq!(Point::ZERO.normalize(), Point::ZERO);
}

#[test]
fn point_distance_to() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(3.0, 4.0);
    assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
}

#[test]
fn point_approx_eq_respects_tolerance() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(0.04, 0.0);
    assert!(a.approx_eq(&b, 0.05));
    assert!(!a.approx_eq(&b, 0.03));
}

// ============================================================
// BoundingBox Tests
// ============================================================

#[test]
fn bounding_box_center() {
    let bbox = BoundingBox::new(Point::new(0.0, 0.0), Point::new(10.0, 20.0));
    let center = bbox.center();
    assert!((center.x - 5.0).abs() < 1e-10);
    assert!((center.y - 10.0).abs() < 1e-10);
}

#[test]
fn bounding_box_width_and_height() {
    let bbox = BoundingBox::new(Point::new(5.0, 10.0), Point::new(15.0, 30.0));
    assert!((bbox.width() - 10.0).abs() < 1e-10);
    assert!((bbox.height() - 20.0).abs() < 1e-10);
}

#[test]
fn bounding_box_union_covers_both_inputs() {
    let a = BoundingBox::new(Point::new(0.0, 0.0), Point::new(5.0, 5.0));
    let b = BoundingBox::new(Point::new(3.0, -2.0), Point::new(8.0, 1.0));
    let u = a.union(&b);
    assert_eq!(u.min, Point::new(0.0, -2.0));
    assert_eq!(u.max, Point::new(8.0, 5.0));
}

#[test]
fn bounding_box_intersects_detects_overlap() {
    let a = BoundingBox::new(Point::new(0.0, 0.0), Point::new(5.0, 5.0));
    let b = BoundingBox::new(Point::new(4.0, 4.0), Point::new(10.0, 10.0));
    let c = BoundingBox::new(Point::new(6.0, 6.0), Point::new(10.0, 10.0));
    assert!(a.intersects(&b));
    assert!(!a.intersects(&c));
}

#[test]
fn bounding_box_contains_point_with_tolerance() {
    let bbox = BoundingBox::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
    assert!(bbox.contains_point(Point::new(10.02, 5.0), 0.05));
    assert!(!bbox.contains_point(Point::new(10.2, 5.0), 0.05));
}
