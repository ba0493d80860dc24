//! Cut-order optimizer (C12): sequence a set of parts for cutting, holes
//! before their own shell, chosen by greedy nearest-neighbor travel from
//! the current machine position.
//!
//! Cutting a shell before its holes would sever the material the hole's
//! cut still needs to sit on, so that ordering constraint is never relaxed
//! even when it costs extra travel.

use camgeo_core::{ChainId, Point};

use crate::chain::Chain;
use crate::part::Part;

/// One scheduled cut: a chain id and the point the machine will be at when
/// it starts cutting it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledCut {
    pub chain_id: ChainId,
    pub entry_point: Point,
}

/// Orders every part's holes followed by its shell, and orders parts
/// themselves, by repeatedly picking the cheapest next entry point from
/// wherever the machine currently sits.
///
/// `entry_point` resolves a chain to the point a cutter would approach it
/// from (typically the chain's first shape's start point); callers own that
/// policy since it may depend on lead-in geometry this module doesn't see.
pub fn optimize_cut_order(
    parts: &[Part],
    chains: &[Chain],
    start: Point,
    entry_point: impl Fn(ChainId) -> Point,
) -> Vec<ScheduledCut> {
    let _ = chains;
    let mut units: Vec<Vec<ChainId>> = parts
        .iter()
        .map(|part| {
            let mut unit = part.holes.clone();
            unit.push(part.shell);
            unit
        })
        .collect();

    let mut schedule = Vec::new();
    let mut position = start;

    while !units.is_empty() {
        // Each unit is consumed front-to-back (holes before shell), so the
        // unit's next cut is always its first remaining chain.
        let best_unit_idx = units
            .iter()
            .enumerate()
            .map(|(i, unit)| (i, position.distance_squared_to(&entry_point(unit[0]))))
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        let chain_id = units[best_unit_idx].remove(0);
        let point = entry_point(chain_id);
        schedule.push(ScheduledCut {
            chain_id,
            entry_point: point,
        });
        position = point;

        if units[best_unit_idx].is_empty() {
            units.remove(best_unit_idx);
        }
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use camgeo_core::ShapeId;
    use crate::primitive::Primitive;
    use crate::shape::Shape;
    use std::collections::HashMap;

    fn rect_chain(min: Point, max: Point) -> Chain {
        let corners = [min, Point::new(max.x, min.y), max, Point::new(min.x, max.y)];
        let shapes = (0..4)
            .map(|i| Shape::new(ShapeId::new(), Primitive::line(corners[i], corners[(i + 1) % 4]).unwrap(), None))
            .collect();
        Chain::new(shapes)
    }

    #[test]
    fn holes_are_scheduled_before_their_shell() {
        let shell = rect_chain(Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        let hole = rect_chain(Point::new(5.0, 5.0), Point::new(15.0, 15.0));
        let part = Part::new(shell.id, vec![hole.id]);
        let chains = vec![shell.clone(), hole.clone()];

        let mut entries = HashMap::new();
        entries.insert(shell.id, shell.shapes[0].primitive.start_point());
        entries.insert(hole.id, hole.shapes[0].primitive.start_point());

        let schedule = optimize_cut_order(&[part], &chains, Point::ZERO, |id| entries[&id]);
        let shell_pos = schedule.iter().position(|c| c.chain_id == shell.id).unwrap();
        let hole_pos = schedule.iter().position(|c| c.chain_id == hole.id).unwrap();
        assert!(hole_pos < shell_pos);
    }

    #[test]
    fn nearer_part_is_cut_first() {
        let near_shell = rect_chain(Point::new(0.0, 0.0), Point::new(5.0, 5.0));
        let far_shell = rect_chain(Point::new(100.0, 100.0), Point::new(105.0, 105.0));
        let near_part = Part::new(near_shell.id, vec![]);
        let far_part = Part::new(far_shell.id, vec![]);
        let chains = vec![near_shell.clone(), far_shell.clone()];

        let mut entries = HashMap::new();
        entries.insert(near_shell.id, near_shell.shapes[0].primitive.start_point());
        entries.insert(far_shell.id, far_shell.shapes[0].primitive.start_point());

        let schedule = optimize_cut_order(&[far_part, near_part], &chains, Point::ZERO, |id| entries[&id]);
        assert_eq!(schedule[0].chain_id, near_shell.id);
    }
}
