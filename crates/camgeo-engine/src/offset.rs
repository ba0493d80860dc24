//! Offset kernel (C10): move a single primitive a constant distance along
//! its outward normal.
//!
//! Sign convention: positive `distance` offsets to the left of the
//! primitive's own parametric travel direction (the direction returned by
//! [`Primitive::tangent_at`] at increasing `t`). For a counter-clockwise arc
//! that means positive distance shrinks the radius (offsetting toward the
//! center); for a clockwise arc it grows it.

use camgeo_core::Point;
use rayon::prelude::*;

use crate::intersect::intersect_with_extensions;
use crate::nurbs::NurbsCurve;
use crate::primitive::{Primitive, PolylineVertex};

/// Offsets a single, non-composite primitive. Returns `None` if the offset
/// distance collapses the primitive (e.g. an arc/circle radius going
/// non-positive); callers surface this as [`camgeo_core::DiagnosticKind::OffsetCollapse`].
pub fn offset_primitive(primitive: &Primitive, distance: f64) -> Option<Primitive> {
    if distance == 0.0 {
        return Some(primitive.clone());
    }
    match primitive {
        Primitive::Line { start, end } => {
            let tangent = (*end - *start).normalize();
            let normal = tangent.perpendicular_ccw();
            Primitive::line(*start + normal * distance, *end + normal * distance).ok()
        }
        Primitive::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        } => {
            let sign = if *clockwise { -1.0 } else { 1.0 };
            let new_radius = radius - sign * distance;
            if new_radius <= 1e-9 {
                return None;
            }
            Primitive::arc(*center, new_radius, *start_angle, *end_angle, *clockwise).ok()
        }
        Primitive::Circle { center, radius } => {
            let new_radius = radius - distance;
            if new_radius <= 1e-9 {
                return None;
            }
            Primitive::circle(*center, new_radius).ok()
        }
        Primitive::Polyline { vertices, closed } => offset_polyline(vertices, *closed, distance),
        Primitive::Ellipse { .. } => offset_by_resampling(primitive, distance, 3),
        Primitive::Spline { curve } => offset_by_resampling(primitive, distance, curve.degree),
    }
}

/// Offsets every segment of a polyline independently, then stitches
/// consecutive offset segments together at each joint by intersecting them
/// (extending either side if they no longer meet directly). For closed
/// polylines, loops introduced by self-intersection at sharp inward corners
/// are dropped rather than left in the output, per the no-self-intersection
/// invariant on offset chains.
fn offset_polyline(vertices: &[PolylineVertex], closed: bool, distance: f64) -> Option<Primitive> {
    let n = vertices.len();
    let segment_count = if closed { n } else { n - 1 };
    let mut offset_segments = Vec::with_capacity(segment_count);
    for i in 0..segment_count {
        let seg = crate::primitive::polyline_segment_primitive(vertices, closed, i).ok()?;
        offset_segments.push(offset_primitive(&seg, distance)?);
    }

    let joint_count = if closed { segment_count } else { segment_count - 1 };
    let mut stitched_points: Vec<Point> = Vec::new();
    stitched_points.push(offset_segments[0].start_point());

    for j in 0..joint_count {
        let a = &offset_segments[j];
        let b = &offset_segments[(j + 1) % offset_segments.len()];
        let joint = stitch_joint(a, b, distance.abs().max(0.01));
        stitched_points.push(joint);
    }

    if !closed {
        stitched_points.push(offset_segments.last().unwrap().end_point());
    }

    let vertices: Vec<PolylineVertex> = stitched_points.into_iter().map(PolylineVertex::line).collect();
    let result = Primitive::polyline(vertices, closed).ok()?;
    if closed && has_self_intersection(&result) {
        return None;
    }
    Some(result)
}

/// Finds the meeting point of two consecutive offset segments, extending
/// either side (or both) if they no longer intersect directly at a sharp
/// corner.
fn stitch_joint(a: &Primitive, b: &Primitive, extension_length: f64) -> Point {
    let direct_gap = a.end_point().distance_to(&b.start_point());
    if direct_gap < 1e-9 {
        return a.end_point();
    }
    let hits = intersect_with_extensions(a, b, 1e-6, extension_length.max(direct_gap * 2.0));
    hits.into_iter()
        .min_by(|h1, h2| {
            let d1 = h1.point.distance_to(&a.end_point());
            let d2 = h2.point.distance_to(&a.end_point());
            d1.partial_cmp(&d2).unwrap()
        })
        .map(|h| h.point)
        .unwrap_or_else(|| {
            let p1 = a.end_point();
            let p2 = b.start_point();
            p1 + (p2 - p1) * 0.5
        })
}

fn has_self_intersection(polyline: &Primitive) -> bool {
    let Primitive::Polyline { vertices, closed } = polyline else {
        return false;
    };
    let n = vertices.len();
    let segment_count = if *closed { n } else { n - 1 };
    for i in 0..segment_count {
        for j in (i + 2)..segment_count {
            if *closed && i == 0 && j == segment_count - 1 {
                continue; // adjacent through the wraparound joint
            }
            let Ok(si) = crate::primitive::polyline_segment_primitive(vertices, *closed, i) else { continue };
            let Ok(sj) = crate::primitive::polyline_segment_primitive(vertices, *closed, j) else { continue };
            if !crate::intersect::intersect(&si, &sj, 1e-6).is_empty() {
                return true;
            }
        }
    }
    false
}

/// Offsets every primitive in `primitives` independently, in parallel. Each
/// shape's offset is self-contained (no cross-shape state), which is what
/// makes farming this out across cores safe; stitching consecutive shapes
/// back together at joints still happens sequentially in `chain_offset`.
pub fn offset_many(primitives: &[Primitive], distance: f64) -> Vec<Option<Primitive>> {
    primitives.par_iter().map(|p| offset_primitive(p, distance)).collect()
}

/// Offsets a curved primitive (ellipse/spline) by densely sampling it,
/// moving each sample along its local outward normal, and refitting a NURBS
/// curve through the moved points. Used whenever no closed-form offset
/// exists for the primitive kind.
fn offset_by_resampling(primitive: &Primitive, distance: f64, degree: usize) -> Option<Primitive> {
    let samples = 64;
    let mut points = Vec::with_capacity(samples + 1);
    for i in 0..=samples {
        let t = i as f64 / samples as f64;
        let p = primitive.sample(samples)[i];
        let tangent = primitive.tangent_at(t).ok()?;
        let normal = tangent.perpendicular_ccw();
        points.push(p + normal * distance);
    }
    let fit_degree = degree.clamp(1, 3);
    let curve = NurbsCurve::fit_through(&points, fit_degree).ok()?;
    Some(Primitive::Spline { curve })
}
