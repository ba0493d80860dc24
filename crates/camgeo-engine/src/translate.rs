//! Translate-to-positive (C2): shift a whole drawing by a single vector so
//! its bounding box minimum lands at or past the origin.

use camgeo_core::{BoundingBox, Point};

use crate::primitive::Primitive;
use crate::shape::Shape;

/// Translates every shape in `shapes` by the vector needed to bring the
/// global bounding box minimum to (0, 0) (a no-op if it's already there).
/// Angles, radii, sweep directions, bulges, weights and knots are all
/// preserved; only positional data moves.
pub fn translate_to_positive(shapes: &[Shape]) -> Vec<Shape> {
    let Some(global) = global_bounds(shapes) else {
        return Vec::new();
    };
    let delta = Point::new((-global.min.x).max(0.0), (-global.min.y).max(0.0));
    if delta.x == 0.0 && delta.y == 0.0 {
        return shapes.to_vec();
    }
    shapes.iter().map(|s| translate_shape(s, delta)).collect()
}

fn global_bounds(shapes: &[Shape]) -> Option<BoundingBox> {
    shapes
        .iter()
        .map(|s| s.primitive.bounding_box())
        .reduce(|a, b| a.union(&b))
}

fn translate_shape(shape: &Shape, delta: Point) -> Shape {
    let translated = match &shape.primitive {
        Primitive::Line { start, end } => Primitive::Line {
            start: *start + delta,
            end: *end + delta,
        },
        Primitive::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        } => Primitive::Arc {
            center: *center + delta,
            radius: *radius,
            start_angle: *start_angle,
            end_angle: *end_angle,
            clockwise: *clockwise,
        },
        Primitive::Circle { center, radius } => Primitive::Circle {
            center: *center + delta,
            radius: *radius,
        },
        Primitive::Polyline { vertices, closed } => Primitive::Polyline {
            vertices: vertices
                .iter()
                .map(|v| crate::primitive::PolylineVertex::new(v.point + delta, v.bulge))
                .collect(),
            closed: *closed,
        },
        Primitive::Ellipse {
            center,
            major_axis_endpoint,
            minor_to_major_ratio,
            start_param,
            end_param,
        } => Primitive::Ellipse {
            center: *center + delta,
            // The major axis endpoint is a vector from the center, not an
            // absolute position, so translation does not touch it.
            major_axis_endpoint: *major_axis_endpoint,
            minor_to_major_ratio: *minor_to_major_ratio,
            start_param: *start_param,
            end_param: *end_param,
        },
        Primitive::Spline { curve } => {
            let mut translated = curve.clone();
            for cp in &mut translated.control_points {
                *cp = *cp + delta;
            }
            Primitive::Spline { curve: translated }
        }
    };
    Shape::new(shape.id, translated, shape.layer.clone())
}
