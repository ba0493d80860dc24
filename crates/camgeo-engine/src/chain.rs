//! The [`Chain`] type: an ordered sequence of [`Shape`]s produced by chain
//! detection and reordered by chain normalization.

use camgeo_core::ChainId;
use serde::{Deserialize, Serialize};

use crate::shape::Shape;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    pub id: ChainId,
    pub shapes: Vec<Shape>,
}

impl Chain {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self {
            id: ChainId::new(),
            shapes,
        }
    }

    /// Closed iff it's a single inherently-closed primitive, or the first
    /// shape's start meets the last shape's end within `tolerance`.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        match self.shapes.as_slice() {
            [] => false,
            [single] => {
                single.primitive.is_inherently_closed()
                    || single
                        .primitive
                        .start_point()
                        .approx_eq(&single.primitive.end_point(), tolerance)
            }
            [first, .., last] => first
                .primitive
                .start_point()
                .approx_eq(&last.primitive.end_point(), tolerance),
        }
    }

    /// Walkable iff every adjacent pair meets end-to-start within
    /// `tolerance`.
    pub fn is_walkable(&self, tolerance: f64) -> bool {
        self.shapes.windows(2).all(|w| {
            w[0].primitive
                .end_point()
                .approx_eq(&w[1].primitive.start_point(), tolerance)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camgeo_core::{Point, ShapeId};
    use crate::primitive::Primitive;

    fn line_shape(start: Point, end: Point) -> Shape {
        Shape::new(ShapeId::new(), Primitive::line(start, end).unwrap(), None)
    }

    #[test]
    fn single_open_shape_is_not_closed() {
        let chain = Chain::new(vec![line_shape(Point::new(0.0, 0.0), Point::new(10.0, 0.0))]);
        assert!(!chain.is_closed(0.01));
    }

    #[test]
    fn chain_closing_back_to_start_is_closed() {
        let chain = Chain::new(vec![
            line_shape(Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
            line_shape(Point::new(10.0, 0.0), Point::new(10.0, 10.0)),
            line_shape(Point::new(10.0, 10.0), Point::new(0.0, 10.0)),
            line_shape(Point::new(0.0, 10.0), Point::new(0.0, 0.0)),
        ]);
        assert!(chain.is_closed(0.01));
        assert!(chain.is_walkable(0.01));
    }

    #[test]
    fn gap_breaks_walkability() {
        let chain = Chain::new(vec![
            line_shape(Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
            line_shape(Point::new(10.1, 0.0), Point::new(20.0, 0.0)),
        ]);
        assert!(!chain.is_walkable(0.01));
    }
}
