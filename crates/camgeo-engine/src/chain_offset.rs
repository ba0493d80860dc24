//! Chain offset orchestration (C11): offset every shape in a chain by a
//! constant distance and stitch the resulting joints back together,
//! snapping, filling, or dropping as needed.
//!
//! A closed chain has an inside and an outside, so offsetting it produces
//! up to two results: an inner chain (shrinking toward the enclosed area)
//! and an outer chain (growing away from it). An open chain has no
//! enclosed area to be inside or outside of, so it produces just one.

use camgeo_core::{ChainId, DiagnosticKind, OffsetChainId, PipelineDiagnostic, ShapeId};
use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::config::{ChainOffsetOptions, FillOptions};
use crate::fill::fill_gap;
use crate::offset::offset_primitive;
use crate::shape::Shape;

/// Records how one joint in an offset chain was closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapFill {
    /// Index of the joint, between `shapes[joint_index]` and
    /// `shapes[joint_index + 1]` (wrapping to `0` for a closed chain's last
    /// joint).
    pub joint_index: usize,
    pub gap_size: f64,
    pub method: String,
}

/// A chain's shapes after offsetting, with provenance for every joint that
/// needed more than a plain abutment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetChain {
    pub id: OffsetChainId,
    pub original_chain_id: ChainId,
    pub distance: f64,
    pub shapes: Vec<Shape>,
    pub gap_fills: Vec<GapFill>,
}

impl OffsetChain {
    fn new(original_chain_id: ChainId, distance: f64, shapes: Vec<Shape>, gap_fills: Vec<GapFill>) -> Self {
        Self {
            id: OffsetChainId::new(),
            original_chain_id,
            distance,
            shapes,
            gap_fills,
        }
    }
}

/// Result of offsetting one chain. `inner`/`outer` hold up to two
/// [`OffsetChain`]s for a closed chain (one if an offset direction
/// collapsed entirely); an open chain only ever populates `inner`, since
/// there's no enclosed area to distinguish a second side from.
pub struct ChainOffsetResult {
    pub inner: Option<OffsetChain>,
    pub outer: Option<OffsetChain>,
    pub diagnostics: Vec<PipelineDiagnostic>,
    pub gaps_filled: usize,
    pub segments_dropped: usize,
}

/// Offsets `chain` by `distance`. For a closed chain, `distance`'s
/// magnitude is used on both sides (inner and outer); the sign only
/// matters for an open chain, where it selects the single side produced.
///
/// Per joint, in order: (1) if the independently offset shapes already meet
/// within `options.snap_threshold`, snap them together with no provenance
/// entry; (2) otherwise try [`fill_gap`] to extend one side to meet the
/// other; (3) if that fails too, drop the shorter of the two joint-adjacent
/// shapes and retry the joint against the next surviving neighbor.
pub fn offset_chain(chain: &Chain, distance: f64, options: &ChainOffsetOptions) -> ChainOffsetResult {
    let closed = chain.is_closed(options.tolerance);

    if !closed {
        let side = offset_one_side(chain, distance, options);
        return ChainOffsetResult {
            inner: side.chain,
            outer: None,
            diagnostics: side.diagnostics,
            gaps_filled: side.gaps_filled,
            segments_dropped: side.segments_dropped,
        };
    }

    let magnitude = distance.abs();
    let positive = offset_one_side(chain, magnitude, options);
    let negative = offset_one_side(chain, -magnitude, options);

    let mut diagnostics = positive.diagnostics;
    diagnostics.extend(negative.diagnostics);
    let gaps_filled = positive.gaps_filled + negative.gaps_filled;
    let segments_dropped = positive.segments_dropped + negative.segments_dropped;

    // The side enclosing the smaller area is the inner chain; the sign
    // convention alone (see `offset_primitive`) only predicts this reliably
    // for a consistently-wound boundary, so the two candidates are compared
    // directly instead of trusted by sign.
    let (inner, outer) = match (positive.chain, negative.chain) {
        (Some(p), Some(n)) => {
            if boundary_area(&p.shapes) <= boundary_area(&n.shapes) {
                (Some(p), Some(n))
            } else {
                (Some(n), Some(p))
            }
        }
        (Some(p), None) => (Some(p), None),
        (None, Some(n)) => (Some(n), None),
        (None, None) => (None, None),
    };

    ChainOffsetResult { inner, outer, diagnostics, gaps_filled, segments_dropped }
}

/// Rough area of the axis-aligned bounding box enclosing `shapes`, used only
/// to compare which of two offset chains is the smaller (inner) one.
fn boundary_area(shapes: &[Shape]) -> f64 {
    shapes
        .iter()
        .map(|s| s.primitive.bounding_box())
        .reduce(|a, b| a.union(&b))
        .map(|bb| (bb.max.x - bb.min.x) * (bb.max.y - bb.min.y))
        .unwrap_or(0.0)
}

struct OffsetSide {
    chain: Option<OffsetChain>,
    diagnostics: Vec<PipelineDiagnostic>,
    gaps_filled: usize,
    segments_dropped: usize,
}

fn offset_one_side(chain: &Chain, distance: f64, options: &ChainOffsetOptions) -> OffsetSide {
    let mut diagnostics = Vec::new();
    let mut offset_shapes = Vec::with_capacity(chain.shapes.len());

    for shape in &chain.shapes {
        match offset_primitive(&shape.primitive, distance) {
            Some(primitive) => offset_shapes.push(Shape::new(ShapeId::new(), primitive, shape.layer.clone())),
            None => {
                diagnostics.push(PipelineDiagnostic::new(
                    chain.id,
                    DiagnosticKind::OffsetCollapse,
                    format!("shape {} collapsed at offset distance {distance}", shape.id),
                ));
            }
        }
    }

    if offset_shapes.is_empty() {
        return OffsetSide { chain: None, diagnostics, gaps_filled: 0, segments_dropped: 0 };
    }

    let closed = chain.is_closed(options.tolerance);
    let fill_options = FillOptions {
        tolerance: options.tolerance,
        max_extension: options.max_extension,
        direction: crate::config::ExtendDirection::Auto,
    };

    let mut gap_fills = Vec::new();
    let mut gaps_filled = 0;
    let mut segments_dropped = 0;

    let mut j = 0usize;
    let max_iterations = (offset_shapes.len() + 1) * 4;
    let mut iterations = 0usize;

    while offset_shapes.len() >= 2 && iterations < max_iterations {
        iterations += 1;
        if j >= offset_shapes.len() {
            j = 0;
        }
        let at_final_open_joint = !closed && j + 1 == offset_shapes.len();
        if at_final_open_joint {
            break;
        }
        let next = (j + 1) % offset_shapes.len();

        let gap = offset_shapes[j]
            .primitive
            .end_point()
            .distance_to(&offset_shapes[next].primitive.start_point());

        if gap <= options.snap_threshold {
            j += 1;
            continue;
        }

        let result = fill_gap(&offset_shapes[j].primitive, &offset_shapes[next].primitive, &fill_options);
        if result.success {
            if let Some(extended) = result.extended_shape {
                if result.extended_is_a {
                    offset_shapes[j].primitive = extended;
                } else {
                    offset_shapes[next].primitive = extended;
                }
                gap_fills.push(GapFill {
                    joint_index: j,
                    gap_size: gap,
                    method: format!("{:?}", result.method.unwrap()),
                });
                gaps_filled += 1;
            } else if let Some(bridge) = result.bridge {
                let bridge_shape = Shape::new(ShapeId::new(), bridge, None);
                offset_shapes.insert(next, bridge_shape);
                gap_fills.push(GapFill {
                    joint_index: j,
                    gap_size: gap,
                    method: "LinearBridge".to_string(),
                });
                gaps_filled += 1;
            }
            j += 1;
            continue;
        }

        if offset_shapes.len() <= 2 {
            // Nothing left to drop without collapsing the chain entirely;
            // record the break and move past it.
            diagnostics.push(PipelineDiagnostic::new(
                chain.id,
                DiagnosticKind::NoSolution,
                format!("joint {j} could not be closed (gap {gap}): {:?}", result.errors),
            ));
            segments_dropped += 1;
            j += 1;
            continue;
        }

        let drop_idx = if offset_shapes[j].primitive.approx_length() <= offset_shapes[next].primitive.approx_length() {
            j
        } else {
            next
        };
        diagnostics.push(PipelineDiagnostic::new(
            chain.id,
            DiagnosticKind::NoSolution,
            format!(
                "joint {j} could not be closed (gap {gap}), dropping shorter shape {} and retrying: {:?}",
                offset_shapes[drop_idx].id, result.errors
            ),
        ));
        offset_shapes.remove(drop_idx);
        segments_dropped += 1;

        let len = offset_shapes.len();
        j = if drop_idx == 0 {
            len - 1
        } else if j >= drop_idx {
            j - 1
        } else {
            j
        };
        j = j.min(len.saturating_sub(1));
    }

    let offset_chain = OffsetChain::new(chain.id, distance, offset_shapes, gap_fills);
    OffsetSide { chain: Some(offset_chain), diagnostics, gaps_filled, segments_dropped }
}
