//! End-to-end tests exercising several pipeline stages together.

use camgeo_core::{Point, ShapeId};
use camgeo_engine::config::{
    ChainDetectionOptions, ChainNormalizationOptions, ChainOffsetOptions, PartDetectionOptions,
};
use camgeo_engine::{
    chain_detect::detect_chains, chain_normalize::normalize_chain, chain_offset::offset_chain,
    part_detect::detect_parts, primitive::Primitive, shape::Shape, translate_to_positive,
};

fn line_shape(start: Point, end: Point) -> Shape {
    Shape::new(ShapeId::new(), Primitive::line(start, end).unwrap(), None)
}

#[test]
fn loose_lines_form_a_closed_walkable_part_with_a_hole() {
    // Outer boundary given out of order and with one segment reversed.
    let outer = vec![
        line_shape(Point::new(20.0, 0.0), Point::new(0.0, 0.0)), // reversed
        line_shape(Point::new(20.0, 20.0), Point::new(20.0, 0.0)),
        line_shape(Point::new(0.0, 0.0), Point::new(0.0, 20.0)),
        line_shape(Point::new(0.0, 20.0), Point::new(20.0, 20.0)),
    ];
    let inner = vec![
        line_shape(Point::new(5.0, 5.0), Point::new(15.0, 5.0)),
        line_shape(Point::new(15.0, 5.0), Point::new(15.0, 15.0)),
        line_shape(Point::new(15.0, 15.0), Point::new(5.0, 15.0)),
        line_shape(Point::new(5.0, 15.0), Point::new(5.0, 5.0)),
    ];

    let mut all = outer;
    all.extend(inner);

    let translated = translate_to_positive(&all);
    let raw_chains = detect_chains(&translated, &ChainDetectionOptions::default());
    assert_eq!(raw_chains.len(), 2);

    let normalize_options = ChainNormalizationOptions::default();
    let normalized: Vec<_> = raw_chains
        .iter()
        .map(|c| normalize_chain(c, &normalize_options))
        .collect();
    for result in &normalized {
        assert!(result.chain.is_walkable(0.01));
        assert!(result.chain.is_closed(0.01));
    }

    let chains: Vec<_> = normalized.into_iter().map(|r| r.chain).collect();
    let part_result = detect_parts(&chains, &PartDetectionOptions::default());
    assert_eq!(part_result.parts.len(), 1);
    assert_eq!(part_result.parts[0].holes.len(), 1);
    assert!(part_result.diagnostics.is_empty());
}

#[test]
fn offsetting_a_rectangle_chain_keeps_it_walkable() {
    let chain_shapes = vec![
        line_shape(Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
        line_shape(Point::new(10.0, 0.0), Point::new(10.0, 10.0)),
        line_shape(Point::new(10.0, 10.0), Point::new(0.0, 10.0)),
        line_shape(Point::new(0.0, 10.0), Point::new(0.0, 0.0)),
    ];
    let chains = detect_chains(&chain_shapes, &ChainDetectionOptions::default());
    assert_eq!(chains.len(), 1);
    let normalized = normalize_chain(&chains[0], &ChainNormalizationOptions::default());
    assert!(normalized.chain.is_closed(0.01));

    let result = offset_chain(&normalized.chain, 1.0, &ChainOffsetOptions::default());
    let inner = result.inner.expect("inner offset should succeed for a simple rectangle");
    let outer = result.outer.expect("outer offset should succeed for a simple rectangle");
    assert_eq!(inner.shapes.len(), 4);
    assert_eq!(outer.shapes.len(), 4);
    assert_eq!(result.segments_dropped, 0);
}

#[test]
fn gap_fill_joins_a_short_line_to_an_adjoining_arc() {
    // A line falling 2 units short of an arc that continues its path;
    // chain detection should not merge them (gap exceeds detection
    // tolerance), but the fill kernel closes it on request.
    let line = Primitive::line(Point::new(0.0, 0.0), Point::new(8.0, 0.0)).unwrap();
    let arc = Primitive::arc(
        Point::new(12.0, 5.0),
        5.0,
        std::f64::consts::PI,
        std::f64::consts::PI * 1.5,
        false,
    )
    .unwrap();

    let result = camgeo_engine::fill_gap(&line, &arc, &camgeo_engine::config::FillOptions::default());
    assert!(result.success);
}
