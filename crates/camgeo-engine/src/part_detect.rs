//! Part detection (C6): classify chains as open or closed, build the
//! planar containment DAG over closed chains, and assign shell/hole roles
//! by odd/even depth.

use camgeo_core::{ChainId, DiagnosticKind, Point, PipelineDiagnostic};
use indexmap::IndexMap;

use crate::chain::Chain;
use crate::config::PartDetectionOptions;
use crate::part::Part;

pub struct PartDetectionResult {
    pub parts: Vec<Part>,
    pub diagnostics: Vec<PipelineDiagnostic>,
}

impl PartDetectionResult {
    /// Indexes parts by their shell chain id, preserving detection order,
    /// for callers (e.g. the cut-order and offset stages) that need to go
    /// from "this chain is a shell" to its [`Part`] without a linear scan.
    pub fn parts_by_shell(&self) -> IndexMap<ChainId, &Part> {
        self.parts.iter().map(|p| (p.shell, p)).collect()
    }
}

pub fn detect_parts(chains: &[Chain], options: &PartDetectionOptions) -> PartDetectionResult {
    let closure_tolerance = 0.01;
    let closed_idx: Vec<usize> = (0..chains.len())
        .filter(|&i| chains[i].is_closed(closure_tolerance))
        .collect();
    let open_idx: Vec<usize> = (0..chains.len())
        .filter(|&i| !chains[i].is_closed(closure_tolerance))
        .collect();

    let boundaries: Vec<Vec<Point>> = closed_idx
        .iter()
        .map(|&i| tessellate_chain(&chains[i], options))
        .collect();
    let boxes: Vec<camgeo_core::BoundingBox> = boundaries
        .iter()
        .map(|pts| camgeo_core::BoundingBox::from_points(pts.iter().copied()).unwrap())
        .collect();

    // containment[i] = indices (into closed_idx) of chains that directly
    // contain closed_idx[i], before reducing to the immediate parent.
    let n = closed_idx.len();
    let mut contains_matrix = vec![vec![false; n]; n];
    for a in 0..n {
        for b in 0..n {
            if a == b {
                continue;
            }
            if boxes[a].strictly_inside(&boxes[b]) && polygon_strictly_inside(&boundaries[a], &boundaries[b]) {
                contains_matrix[b][a] = true; // b contains a
            }
        }
    }

    // Depth = number of ancestors containing this chain.
    let depth: Vec<usize> = (0..n)
        .map(|i| (0..n).filter(|&j| contains_matrix[j][i]).count())
        .collect();

    // Immediate parent = the containing chain with the greatest depth
    // (closest enclosing ancestor).
    let mut immediate_parent: Vec<Option<usize>> = vec![None; n];
    for i in 0..n {
        let mut best: Option<(usize, usize)> = None; // (index, depth)
        for j in 0..n {
            if contains_matrix[j][i] {
                if best.map(|(_, d)| depth[j] > d).unwrap_or(true) {
                    best = Some((j, depth[j]));
                }
            }
        }
        immediate_parent[i] = best.map(|(j, _)| j);
    }

    let mut parts = Vec::new();
    for i in 0..n {
        if depth[i] % 2 == 0 {
            // shell: gather immediate children at odd depth whose
            // immediate parent is this chain.
            let holes: Vec<ChainId> = (0..n)
                .filter(|&j| immediate_parent[j] == Some(i))
                .map(|j| chains[closed_idx[j]].id)
                .collect();
            parts.push(Part::new(chains[closed_idx[i]].id, holes));
        }
    }

    let mut diagnostics = Vec::new();
    for &oi in &open_idx {
        let open_box = chains[oi]
            .shapes
            .iter()
            .map(|s| s.primitive.bounding_box())
            .reduce(|a, b| a.union(&b));
        if let Some(open_box) = open_box {
            if boxes.iter().any(|b| b.intersects(&open_box)) {
                diagnostics.push(PipelineDiagnostic::new(
                    chains[oi].id,
                    DiagnosticKind::OverlappingBoundary,
                    "open chain's bounding box intersects a closed chain's bounding box".to_string(),
                ));
            }
        }
    }

    PartDetectionResult { parts, diagnostics }
}

fn tessellate_chain(chain: &Chain, options: &PartDetectionOptions) -> Vec<Point> {
    if !options.enable_tessellation {
        let bb = chain
            .shapes
            .iter()
            .map(|s| s.primitive.bounding_box())
            .reduce(|a, b| a.union(&b))
            .unwrap();
        return vec![
            bb.min,
            Point::new(bb.max.x, bb.min.y),
            bb.max,
            Point::new(bb.min.x, bb.max.y),
        ];
    }
    let mut points = Vec::new();
    for shape in &chain.shapes {
        let samples = match &shape.primitive {
            crate::primitive::Primitive::Circle { .. } => options.circle_tessellation_points as usize,
            crate::primitive::Primitive::Arc { .. } => options.min_arc_tessellation_points as usize,
            _ => options.min_arc_tessellation_points.max(2) as usize,
        };
        points.extend(shape.primitive.sample(samples.max(2)));
    }
    points
}

/// Winding-number-free ray casting point-in-polygon test, exposed for reuse
/// by [`crate::primitive::Primitive::contains`].
pub fn point_in_polygon(polygon: &[Point], point: Point) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_intersect = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn polygon_strictly_inside(inner: &[Point], outer: &[Point]) -> bool {
    inner.iter().all(|&p| point_in_polygon(outer, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camgeo_core::ShapeId;
    use crate::primitive::Primitive;
    use crate::shape::Shape;

    fn rect_chain(min: Point, max: Point) -> Chain {
        let corners = [
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
        ];
        let shapes = (0..4)
            .map(|i| {
                Shape::new(
                    ShapeId::new(),
                    Primitive::line(corners[i], corners[(i + 1) % 4]).unwrap(),
                    None,
                )
            })
            .collect();
        Chain::new(shapes)
    }

    #[test]
    fn rectangle_with_hole_forms_one_part() {
        let outer = rect_chain(Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        let inner = rect_chain(Point::new(5.0, 5.0), Point::new(15.0, 15.0));
        let result = detect_parts(&[outer, inner], &PartDetectionOptions::default());
        assert_eq!(result.parts.len(), 1);
        assert_eq!(result.parts[0].holes.len(), 1);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn nested_squares_form_two_parts() {
        let s40 = rect_chain(Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        let s30 = rect_chain(Point::new(5.0, 5.0), Point::new(35.0, 35.0));
        let s20 = rect_chain(Point::new(10.0, 10.0), Point::new(30.0, 30.0));
        let s10 = rect_chain(Point::new(15.0, 15.0), Point::new(25.0, 25.0));
        let result = detect_parts(
            &[s40, s30, s20, s10],
            &PartDetectionOptions::default(),
        );
        assert_eq!(result.parts.len(), 2);
        for part in &result.parts {
            assert_eq!(part.holes.len(), 1);
        }
    }

    #[test]
    fn parts_by_shell_indexes_by_shell_chain_id() {
        let outer = rect_chain(Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        let inner = rect_chain(Point::new(5.0, 5.0), Point::new(15.0, 15.0));
        let outer_id = outer.id;
        let result = detect_parts(&[outer, inner], &PartDetectionOptions::default());
        let by_shell = result.parts_by_shell();
        assert!(by_shell.contains_key(&outer_id));
    }

    #[test]
    fn point_in_polygon_detects_interior_and_exterior() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(&square, Point::new(5.0, 5.0)));
        assert!(!point_in_polygon(&square, Point::new(15.0, 5.0)));
    }
}
