//! Intersection kernel (C7): pairwise intersection between any two
//! primitives, with an extension-aware variant that retries against
//! virtually extended copies when the strict search comes up empty.

use camgeo_core::Point;
use rayon::prelude::*;

use crate::extend::create_extended;
use crate::nurbs::intersect_sampled_curves;
use crate::primitive::Primitive;

/// One intersection hit. `param1`/`param2` follow each primitive's own
/// parameterization convention (§4.7): [0, 1] for Line/Arc/Spline,
/// segment-local for Polyline, one full revolution in [0, 1) for
/// Circle/full Ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: Point,
    pub param1: f64,
    pub param2: f64,
    pub on_extension: bool,
}

/// Strict (non-extension-aware) intersection between any two primitives.
pub fn intersect(a: &Primitive, b: &Primitive, tolerance: f64) -> Vec<Intersection> {
    use Primitive::*;
    match (a, b) {
        (Line { .. }, Line { .. }) => intersect_line_line(a, b, tolerance),
        (Line { .. }, Arc { .. }) => intersect_line_arc(a, b, tolerance),
        (Arc { .. }, Line { .. }) => swap(intersect_line_arc(b, a, tolerance)),
        (Line { .. }, Circle { .. }) => intersect_line_circle(a, b, tolerance),
        (Circle { .. }, Line { .. }) => swap(intersect_line_circle(b, a, tolerance)),
        (Arc { .. }, Arc { .. }) => intersect_arc_arc(a, b, tolerance),
        (Arc { .. }, Circle { .. }) | (Circle { .. }, Arc { .. }) | (Circle { .. }, Circle { .. }) => {
            intersect_arc_arc(&lift_to_arc(a), &lift_to_arc(b), tolerance)
        }
        (Polyline { .. }, _) => intersect_polyline_other(a, b, tolerance),
        (_, Polyline { .. }) => swap(intersect_polyline_other(b, a, tolerance)),
        _ => intersect_numeric(a, b, tolerance),
    }
}

/// Extension-aware intersection: if the strict search is empty, retries
/// extending `a` only, `b` only, and both, tagging hits `on_extension`.
/// Duplicate hits across the three retries (within `tolerance` of each
/// other) are deduplicated, keeping the first found in
/// extend-A / extend-B / extend-both order (see DESIGN.md Open Question 1).
pub fn intersect_with_extensions(
    a: &Primitive,
    b: &Primitive,
    tolerance: f64,
    extension_length: f64,
) -> Vec<Intersection> {
    let direct = intersect(a, b, tolerance);
    if !direct.is_empty() {
        return direct;
    }

    let extended_a = create_extended(a, extension_length);
    let extended_b = create_extended(b, extension_length);

    let mut hits = Vec::new();
    for candidate in [
        intersect(&extended_a, b, tolerance),
        intersect(a, &extended_b, tolerance),
        intersect(&extended_a, &extended_b, tolerance),
    ] {
        for mut hit in candidate {
            hit.on_extension = true;
            if !hits
                .iter()
                .any(|h: &Intersection| h.point.distance_to(&hit.point) < tolerance)
            {
                hits.push(hit);
            }
        }
    }
    hits
}

fn swap(hits: Vec<Intersection>) -> Vec<Intersection> {
    hits.into_iter()
        .map(|h| Intersection {
            param1: h.param2,
            param2: h.param1,
            ..h
        })
        .collect()
}

fn lift_to_arc(p: &Primitive) -> Primitive {
    match p {
        Primitive::Circle { center, radius } => Primitive::Arc {
            center: *center,
            radius: *radius,
            start_angle: 0.0,
            end_angle: std::f64::consts::TAU,
            clockwise: false,
        },
        other => other.clone(),
    }
}

fn intersect_line_line(a: &Primitive, b: &Primitive, tolerance: f64) -> Vec<Intersection> {
    let (Primitive::Line { start: p1, end: p2 }, Primitive::Line { start: p3, end: p4 }) = (a, b) else {
        return Vec::new();
    };
    let r = *p2 - *p1;
    let s = *p4 - *p3;
    let denom = r.cross(&s);
    if denom.abs() < 1e-12 {
        return Vec::new(); // parallel or coincident; overlap is a caller concern
    }
    let qp = *p3 - *p1;
    let t = qp.cross(&s) / denom;
    let u = qp.cross(&r) / denom;
    if t >= -tolerance / r.length().max(1e-12)
        && t <= 1.0 + tolerance / r.length().max(1e-12)
        && u >= -tolerance / s.length().max(1e-12)
        && u <= 1.0 + tolerance / s.length().max(1e-12)
    {
        vec![Intersection {
            point: *p1 + r * t,
            param1: t,
            param2: u,
            on_extension: false,
        }]
    } else {
        Vec::new()
    }
}

fn intersect_line_arc(a: &Primitive, b: &Primitive, tolerance: f64) -> Vec<Intersection> {
    let (Primitive::Line { start, end }, Primitive::Arc { center, radius, .. }) = (a, b) else {
        return Vec::new();
    };
    let d = *end - *start;
    let f = *start - *center;
    let a_coef = d.dot(&d);
    let b_coef = 2.0 * f.dot(&d);
    let c_coef = f.dot(&f) - radius * radius;
    let disc = b_coef * b_coef - 4.0 * a_coef * c_coef;
    if disc < 0.0 {
        return Vec::new();
    }
    let sqrt_disc = disc.sqrt();
    let line_len = d.length().max(1e-12);
    let mut hits = Vec::new();
    for t in [(-b_coef - sqrt_disc) / (2.0 * a_coef), (-b_coef + sqrt_disc) / (2.0 * a_coef)] {
        if t >= -tolerance / line_len && t <= 1.0 + tolerance / line_len {
            let point = *start + d * t;
            if let Some(param2) = arc_param_for_point(b, point, tolerance) {
                hits.push(Intersection {
                    point,
                    param1: t,
                    param2,
                    on_extension: false,
                });
            }
        }
    }
    hits
}

fn intersect_line_circle(a: &Primitive, b: &Primitive, tolerance: f64) -> Vec<Intersection> {
    let Primitive::Circle { center, radius } = b else {
        return Vec::new();
    };
    let full_arc = Primitive::Arc {
        center: *center,
        radius: *radius,
        start_angle: 0.0,
        end_angle: std::f64::consts::TAU,
        clockwise: false,
    };
    intersect_line_arc(a, &full_arc, tolerance)
}

fn intersect_arc_arc(a: &Primitive, b: &Primitive, tolerance: f64) -> Vec<Intersection> {
    let (
        Primitive::Arc { center: c1, radius: r1, .. },
        Primitive::Arc { center: c2, radius: r2, .. },
    ) = (a, b)
    else {
        return Vec::new();
    };
    let d = c1.distance_to(c2);
    if d < 1e-12 || d > r1 + r2 + tolerance || d < (r1 - r2).abs() - tolerance {
        return Vec::new();
    }
    let d = d.max((r1 - r2).abs()).min(r1 + r2);
    let a_dist = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h_sq = (r1 * r1 - a_dist * a_dist).max(0.0);
    let h = h_sq.sqrt();
    let dir = (*c2 - *c1).normalize();
    let mid = *c1 + dir * a_dist;
    let perp = dir.perpendicular_ccw();

    let candidates = if h < 1e-9 {
        vec![mid]
    } else {
        vec![mid + perp * h, mid - perp * h]
    };

    let mut hits = Vec::new();
    for point in candidates {
        let p1 = arc_param_for_point(a, point, tolerance);
        let p2 = arc_param_for_point(b, point, tolerance);
        if let (Some(param1), Some(param2)) = (p1, p2) {
            if !hits.iter().any(|h: &Intersection| h.point.distance_to(&point) < tolerance) {
                hits.push(Intersection {
                    point,
                    param1,
                    param2,
                    on_extension: false,
                });
            }
        }
    }
    hits
}

/// Returns the Arc/Circle parameter in [0, 1] for `point` if it lies within
/// the swept interval (within `tolerance` radians' worth of arc length).
fn arc_param_for_point(primitive: &Primitive, point: Point, tolerance: f64) -> Option<f64> {
    match primitive {
        Primitive::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        } => {
            let angle = (point - *center).angle();
            let sweep = {
                let tau = std::f64::consts::TAU;
                let diff = if *clockwise {
                    start_angle - end_angle
                } else {
                    end_angle - start_angle
                };
                let wrapped = diff.rem_euclid(tau);
                if wrapped.abs() < 1e-12 {
                    tau
                } else {
                    wrapped
                }
            };
            let from_start = {
                let tau = std::f64::consts::TAU;
                if *clockwise {
                    (start_angle - angle).rem_euclid(tau)
                } else {
                    (angle - start_angle).rem_euclid(tau)
                }
            };
            let angular_tol = tolerance / radius.max(1e-9);
            if from_start <= sweep + angular_tol {
                Some((from_start / sweep).clamp(0.0, 1.0))
            } else {
                None
            }
        }
        Primitive::Circle { .. } => {
            Some(0.0) // caller only needs presence; circle params are handled by lift_to_arc elsewhere
        }
        _ => None,
    }
}

fn intersect_polyline_other(poly: &Primitive, other: &Primitive, tolerance: f64) -> Vec<Intersection> {
    let Primitive::Polyline { vertices, closed } = poly else {
        return Vec::new();
    };
    let n = vertices.len();
    let segment_count = if *closed { n } else { n - 1 };
    let mut hits = Vec::new();
    for i in 0..segment_count {
        if let Ok(segment) = crate::primitive::polyline_segment_primitive(vertices, *closed, i) {
            for hit in intersect(&segment, other, tolerance) {
                let global_param = (i as f64 + hit.param1) / segment_count as f64;
                hits.push(Intersection {
                    param1: global_param,
                    ..hit
                });
            }
        }
    }
    hits
}

fn intersect_numeric(a: &Primitive, b: &Primitive, tolerance: f64) -> Vec<Intersection> {
    let fa = |t: f64| sample_at_param(a, t);
    let fb = |t: f64| sample_at_param(b, t);
    intersect_sampled_curves(&fa, &fb, 64, tolerance.max(1e-6))
        .into_iter()
        .map(|(t1, t2, point)| Intersection {
            point,
            param1: t1,
            param2: t2,
            on_extension: false,
        })
        .collect()
}

fn sample_at_param(p: &Primitive, t: f64) -> Point {
    p.sample(200)[(t.clamp(0.0, 1.0) * 200.0).round() as usize]
}

/// Intersects every pair in `primitives` against each other, in parallel.
/// The O(n^2) pair count is exactly the case the chain detection and part
/// detection stages already accept for tessellation; farming the work out
/// across cores keeps a busy drawing's intersection pass from dominating
/// the pipeline's wall-clock time.
pub fn pairwise_intersections(primitives: &[Primitive], tolerance: f64) -> Vec<(usize, usize, Intersection)> {
    let n = primitives.len();
    (0..n)
        .into_par_iter()
        .flat_map(|i| {
            ((i + 1)..n)
                .into_par_iter()
                .flat_map(move |j| {
                    intersect(&primitives[i], &primitives[j], tolerance)
                        .into_par_iter()
                        .map(move |hit| (i, j, hit))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_lines_intersect_once() {
        let a = Primitive::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        let b = Primitive::line(Point::new(5.0, -5.0), Point::new(5.0, 5.0)).unwrap();
        let hits = intersect(&a, &b, 1e-6);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].point.distance_to(&Point::new(5.0, 0.0)) < 1e-6);
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let a = Primitive::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        let b = Primitive::line(Point::new(0.0, 5.0), Point::new(10.0, 5.0)).unwrap();
        assert!(intersect(&a, &b, 1e-6).is_empty());
    }

    #[test]
    fn line_through_circle_hits_twice() {
        let line = Primitive::line(Point::new(-10.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        let circle = Primitive::circle(Point::ZERO, 5.0).unwrap();
        let hits = intersect(&line, &circle, 1e-6);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn pairwise_intersections_finds_all_crossings_in_a_star() {
        let a = Primitive::line(Point::new(-10.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        let b = Primitive::line(Point::new(0.0, -10.0), Point::new(0.0, 10.0)).unwrap();
        let c = Primitive::line(Point::new(-10.0, -10.0), Point::new(10.0, 10.0)).unwrap();
        let hits = pairwise_intersections(&[a, b, c], 1e-6);
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn disjoint_shapes_find_solution_only_with_extensions() {
        let line = Primitive::line(Point::new(0.0, 0.0), Point::new(8.0, 0.0)).unwrap();
        let arc = Primitive::arc(Point::new(15.0, 5.0), 5.0, std::f64::consts::PI, std::f64::consts::FRAC_PI_2 * 3.0, false).unwrap();
        assert!(intersect(&line, &arc, 1e-6).is_empty());
        let hits = intersect_with_extensions(&line, &arc, 1e-6, 20.0);
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|h| h.on_extension));
    }
}
