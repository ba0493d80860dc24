//! Chain detection (C4): group loose shapes into chains by endpoint
//! proximity, via union-find over the adjacency relation.

use crate::chain::Chain;
use crate::config::ChainDetectionOptions;
use crate::shape::Shape;
use crate::unionfind::UnionFind;

/// Partitions `shapes` into chains such that two shapes sharing a
/// component have at least one endpoint within `options.tolerance` of each
/// other, transitively. Always produces a full partition — isolated shapes
/// become singleton chains, and circles (inherently closed) remain
/// singletons since their start and end point coincide by construction and
/// never chain onward to another shape through that shared point alone.
pub fn detect_chains(shapes: &[Shape], options: &ChainDetectionOptions) -> Vec<Chain> {
    let n = shapes.len();
    let mut uf = UnionFind::new(n);
    let tolerance_sq = options.tolerance * options.tolerance;

    let endpoints: Vec<(camgeo_core::Point, camgeo_core::Point)> = shapes
        .iter()
        .map(|s| (s.primitive.start_point(), s.primitive.end_point()))
        .collect();

    for i in 0..n {
        for j in (i + 1)..n {
            let (si, ei) = endpoints[i];
            let (sj, ej) = endpoints[j];
            let connected = si.distance_squared_to(&sj) <= tolerance_sq
                || si.distance_squared_to(&ej) <= tolerance_sq
                || ei.distance_squared_to(&sj) <= tolerance_sq
                || ei.distance_squared_to(&ej) <= tolerance_sq;
            if connected {
                uf.union(i, j);
            }
        }
    }

    uf.components()
        .into_iter()
        .map(|indices| Chain::new(indices.into_iter().map(|i| shapes[i].clone()).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camgeo_core::{Point, ShapeId};
    use crate::primitive::Primitive;

    fn line_shape(start: Point, end: Point) -> Shape {
        Shape::new(ShapeId::new(), Primitive::line(start, end).unwrap(), None)
    }

    // Scenario 1 from the testable-properties catalog: lines touching
    // within tolerance merge; outside tolerance they stay separate.
    #[test]
    fn lines_within_tolerance_merge_into_one_chain() {
        let l1 = line_shape(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let l2 = line_shape(Point::new(10.04, 0.0), Point::new(20.0, 0.0));
        let chains = detect_chains(&[l1, l2], &ChainDetectionOptions { tolerance: 0.05 });
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].shapes.len(), 2);
    }

    #[test]
    fn lines_outside_tolerance_stay_separate() {
        let l1 = line_shape(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let l2 = line_shape(Point::new(10.04, 0.0), Point::new(20.0, 0.0));
        let chains = detect_chains(&[l1, l2], &ChainDetectionOptions { tolerance: 0.03 });
        assert_eq!(chains.len(), 2);
    }

    #[test]
    fn zero_tolerance_still_merges_bit_exact_endpoints() {
        let l1 = line_shape(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let l2 = line_shape(Point::new(10.0, 0.0), Point::new(20.0, 0.0));
        let chains = detect_chains(&[l1, l2], &ChainDetectionOptions { tolerance: 0.0 });
        assert_eq!(chains.len(), 1);
    }

    #[test]
    fn isolated_shape_becomes_singleton_chain() {
        let l1 = line_shape(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let l2 = line_shape(Point::new(100.0, 100.0), Point::new(110.0, 110.0));
        let chains = detect_chains(&[l1, l2], &ChainDetectionOptions::default());
        assert_eq!(chains.len(), 2);
    }

    #[test]
    fn three_shapes_chain_transitively() {
        let l1 = line_shape(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let l2 = line_shape(Point::new(10.0, 0.0), Point::new(10.0, 10.0));
        let l3 = line_shape(Point::new(10.0, 10.0), Point::new(0.0, 10.0));
        let chains = detect_chains(&[l1, l2, l3], &ChainDetectionOptions::default());
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].shapes.len(), 3);
    }
}
