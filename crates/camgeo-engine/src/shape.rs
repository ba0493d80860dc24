//! A [`Primitive`] plus identity and optional layer. Identity survives
//! reorderings and reversals; offset operations mint fresh ids and record a
//! back-reference to the shape they were derived from instead of reusing
//! the source id.

use camgeo_core::ShapeId;
use serde::{Deserialize, Serialize};

use crate::primitive::Primitive;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub primitive: Primitive,
    pub layer: Option<String>,
}

impl Shape {
    pub fn new(id: ShapeId, primitive: Primitive, layer: Option<String>) -> Self {
        Self { id, primitive, layer }
    }

    /// A copy of this shape with its primitive reversed. Identity survives
    /// reversal, so the id is preserved.
    pub fn reversed(&self) -> Self {
        Self {
            id: self.id,
            primitive: self.primitive.reverse(),
            layer: self.layer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camgeo_core::Point;
    use pretty_assertions::assert_eq;

    #[test]
    fn shape_round_trips_through_json() {
        let shape = Shape::new(
            ShapeId::new(),
            Primitive::line(Point::new(0.0, 0.0), Point::new(10.0, 5.0)).unwrap(),
            Some("outline".to_string()),
        );
        let encoded = serde_json::to_string(&shape).unwrap();
        let decoded: Shape = serde_json::from_str(&encoded).unwrap();
        assert_eq!(shape, decoded);
    }
}
