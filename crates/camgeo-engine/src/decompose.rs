//! Decompose polylines (C3): explode a polyline into independent Line and
//! Arc shapes, converting each bulge into an arc via the standard
//! chord/included-angle construction.

use camgeo_core::{Point, ShapeId};

use crate::error::GeometryResult;
use crate::primitive::{polyline_segment_primitive, Primitive};
use crate::shape::Shape;

/// Converts a single bulge segment (`from` -> `to`, bulge `b`) into an Arc
/// primitive, or a Line if the bulge is negligible.
///
/// `theta = 4*atan(|b|)` is the included angle; `R = chord / (2*sin(theta/2))`
/// is the radius; the center lies on the perpendicular bisector of the
/// chord at distance `sqrt(R^2 - (chord/2)^2)`, offset to the left of the
/// chord direction for positive bulge and to the right for negative bulge.
pub fn bulge_to_arc(from: Point, to: Point, bulge: f64) -> GeometryResult<Primitive> {
    if bulge.abs() < 1e-9 {
        return Primitive::line(from, to);
    }
    let chord_vec = to - from;
    let chord = chord_vec.length();
    let theta = 4.0 * bulge.abs().atan();
    let radius = chord / (2.0 * (theta / 2.0).sin());
    let half_chord = chord / 2.0;
    let height = (radius * radius - half_chord * half_chord).max(0.0).sqrt();

    let chord_dir = chord_vec.normalize();
    let midpoint = from + chord_vec * 0.5;
    // Perpendicular to the left of the chord direction for positive bulge.
    let perp = chord_dir.perpendicular_ccw();
    let side = if bulge > 0.0 { 1.0 } else { -1.0 };
    let center = midpoint + perp * (height * side);

    let start_angle = (from - center).angle();
    let end_angle = (to - center).angle();
    let clockwise = bulge < 0.0;

    let arc = Primitive::arc(center, radius, start_angle, end_angle, clockwise);
    match arc {
        Ok(a) => {
            // Validate: derived center must be equidistant (within
            // tolerance) from both endpoints; otherwise fall back to a
            // straight line and let the caller note the degradation.
            let tol = (1e-3_f64).max(1e-3 * radius);
            if (center.distance_to(&from) - radius).abs() <= tol
                && (center.distance_to(&to) - radius).abs() <= tol
            {
                Ok(a)
            } else {
                Primitive::line(from, to)
            }
        }
        Err(_) => Primitive::line(from, to),
    }
}

/// Explodes every polyline in `shapes` into its constituent Line/Arc
/// shapes, leaving non-polyline shapes untouched. Each emitted shape
/// receives a fresh id and inherits the source shape's layer.
pub fn decompose_polylines(shapes: &[Shape]) -> Vec<Shape> {
    let mut out = Vec::with_capacity(shapes.len());
    for shape in shapes {
        match &shape.primitive {
            Primitive::Polyline { vertices, closed } => {
                let n = vertices.len();
                let segment_count = if *closed { n } else { n - 1 };
                for i in 0..segment_count {
                    if let Ok(seg) = polyline_segment_primitive(vertices, *closed, i) {
                        out.push(Shape::new(ShapeId::new(), seg, shape.layer.clone()));
                    }
                }
            }
            _ => out.push(shape.clone()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bulge_yields_a_line() {
        let p = bulge_to_arc(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 0.0).unwrap();
        assert!(matches!(p, Primitive::Line { .. }));
    }

    #[test]
    fn bulge_one_yields_a_semicircle() {
        let p = bulge_to_arc(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 1.0).unwrap();
        match p {
            Primitive::Arc { radius, center, .. } => {
                assert!((radius - 5.0).abs() < 1e-6);
                assert!(center.distance_to(&Point::new(5.0, 0.0)) < 1e-6);
            }
            _ => panic!("expected arc"),
        }
    }

    #[test]
    fn negative_bulge_is_clockwise() {
        let p = bulge_to_arc(Point::new(0.0, 0.0), Point::new(10.0, 0.0), -0.5).unwrap();
        match p {
            Primitive::Arc { clockwise, .. } => assert!(clockwise),
            _ => panic!("expected arc"),
        }
    }

    #[test]
    fn decompose_closed_two_vertex_polyline_yields_two_segments() {
        use crate::primitive::PolylineVertex;
        let vertices = vec![
            PolylineVertex::line(Point::new(0.0, 0.0)),
            PolylineVertex::line(Point::new(10.0, 0.0)),
        ];
        let poly = Primitive::polyline(vertices, true).unwrap();
        let shape = Shape::new(ShapeId::new(), poly, None);
        let exploded = decompose_polylines(&[shape]);
        assert_eq!(exploded.len(), 2);
    }
}
