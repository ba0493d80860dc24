//! Chain normalization (C5): reorder and orient the shapes within a chain
//! into a walkable sequence via a greedy directed walk, restarting from a
//! different head on failure up to a configured attempt limit.

use camgeo_core::{ChainId, DiagnosticKind, PipelineDiagnostic};

use crate::chain::Chain;
use crate::config::ChainNormalizationOptions;
use crate::shape::Shape;

/// The result of normalizing one chain: the (possibly reordered/reversed)
/// chain plus any diagnostics raised along the way. The chain is always
/// returned, even on failure — best-effort order, per the no-abort
/// propagation policy.
pub struct NormalizeResult {
    pub chain: Chain,
    pub diagnostics: Vec<PipelineDiagnostic>,
}

pub fn normalize_chain(chain: &Chain, options: &ChainNormalizationOptions) -> NormalizeResult {
    let tol = options.traversal_tolerance;
    let shapes = &chain.shapes;
    if shapes.len() <= 1 {
        return NormalizeResult {
            chain: Chain {
                id: chain.id,
                shapes: shapes.clone(),
            },
            diagnostics: Vec::new(),
        };
    }

    let mut diagnostics = diagnose_coincident_pairs(chain.id, shapes, tol);

    for head in 0..shapes.len().min(options.max_traversal_attempts as usize) {
        if let Some(walked) = attempt_walk(shapes, head, tol) {
            return NormalizeResult {
                chain: Chain {
                    id: chain.id,
                    shapes: walked,
                },
                diagnostics,
            };
        }
    }

    diagnostics.push(PipelineDiagnostic::new(
        chain.id,
        DiagnosticKind::BrokenTraversal,
        format!(
            "could not build a walkable ordering within {} attempts",
            options.max_traversal_attempts
        ),
    ));
    NormalizeResult {
        chain: Chain {
            id: chain.id,
            shapes: shapes.clone(),
        },
        diagnostics,
    }
}

fn diagnose_coincident_pairs(
    chain_id: ChainId,
    shapes: &[Shape],
    tol: f64,
) -> Vec<PipelineDiagnostic> {
    let mut diagnostics = Vec::new();
    for i in 0..shapes.len() {
        for j in (i + 1)..shapes.len() {
            let si = shapes[i].primitive.start_point();
            let ei = shapes[i].primitive.end_point();
            let sj = shapes[j].primitive.start_point();
            let ej = shapes[j].primitive.end_point();
            if si.approx_eq(&sj, tol) {
                diagnostics.push(PipelineDiagnostic::new(
                    chain_id,
                    DiagnosticKind::CoincidentStartpoints,
                    format!("shapes {} and {} share a start point", shapes[i].id, shapes[j].id),
                ));
            }
            if ei.approx_eq(&ej, tol) {
                diagnostics.push(PipelineDiagnostic::new(
                    chain_id,
                    DiagnosticKind::CoincidentEndpoints,
                    format!("shapes {} and {} share an end point", shapes[i].id, shapes[j].id),
                ));
            }
        }
    }
    diagnostics
}

/// Attempts a single greedy walk starting at `shapes[head]`. Returns the
/// ordered, correctly oriented sequence if every shape was placed, or
/// `None` if the walk got stuck before exhausting the input.
fn attempt_walk(shapes: &[Shape], head: usize, tol: f64) -> Option<Vec<Shape>> {
    let mut remaining: Vec<Shape> = shapes.to_vec();
    let first = remaining.remove(head);
    let mut ordered = vec![first];

    while !remaining.is_empty() {
        let tail = ordered.last().unwrap().primitive.end_point();
        let mut best: Option<(usize, Shape, f64)> = None;

        for (idx, candidate) in remaining.iter().enumerate() {
            let start = candidate.primitive.start_point();
            let end = candidate.primitive.end_point();
            let (oriented, other_end) = if tail.approx_eq(&start, tol) {
                (candidate.clone(), end)
            } else if tail.approx_eq(&end, tol) {
                (candidate.reversed(), start)
            } else {
                continue;
            };
            // Prefer the candidate whose far endpoint is furthest from the
            // tail, to keep forward progress on branching graphs.
            let progress = tail.distance_squared_to(&other_end);
            if best.as_ref().map(|(_, _, p)| progress > *p).unwrap_or(true) {
                best = Some((idx, oriented, progress));
            }
        }

        match best {
            Some((idx, oriented, _)) => {
                remaining.remove(idx);
                ordered.push(oriented);
            }
            None => return None,
        }
    }

    Some(ordered)
}
