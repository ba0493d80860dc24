//! Extend/Trim kernel (C8): virtually lengthen a primitive, or extend it
//! exactly so a target point lies on it.

use camgeo_core::Point;

use crate::config::ExtendDirection;
use crate::primitive::Primitive;

/// The outcome of [`extend_to_point`]: how far the primitive had to move
/// (length units, or radians for circular primitives) and which end moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extension {
    pub magnitude: f64,
    pub moved_start: bool,
}

/// Returns a copy of `primitive` virtually lengthened by `length` on
/// whichever ends are open (both ends for a Line/open Polyline; only the
/// angular sweep for an Arc; both parameter-interval ends for a partial
/// Ellipse/Spline). Circles and full ellipses, already closed, are
/// returned unchanged — there is nothing to lengthen.
pub fn create_extended(primitive: &Primitive, length: f64) -> Primitive {
    if length <= 0.0 {
        return primitive.clone();
    }
    match primitive {
        Primitive::Line { start, end } => {
            let dir = (*end - *start).normalize();
            Primitive::Line {
                start: *start - dir * length,
                end: *end + dir * length,
            }
        }
        Primitive::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        } => {
            let delta = length / radius;
            let (new_start, new_end) = if *clockwise {
                (start_angle + delta, end_angle - delta)
            } else {
                (start_angle - delta, end_angle + delta)
            };
            // Cap total sweep at a full circle.
            let sweep = widened_sweep(new_start, new_end, *clockwise);
            if sweep >= std::f64::consts::TAU {
                return Primitive::Circle {
                    center: *center,
                    radius: *radius,
                };
            }
            Primitive::Arc {
                center: *center,
                radius: *radius,
                start_angle: new_start,
                end_angle: new_end,
                clockwise: *clockwise,
            }
        }
        Primitive::Circle { .. } => primitive.clone(),
        Primitive::Polyline { vertices, closed } => {
            if *closed || vertices.len() < 2 {
                return primitive.clone();
            }
            let mut v = vertices.clone();
            let n = v.len();
            let start_dir = (v[0].point - v[1].point).normalize();
            let end_dir = (v[n - 1].point - v[n - 2].point).normalize();
            v[0].point = v[0].point + start_dir * length;
            v[n - 1].point = v[n - 1].point + end_dir * length;
            Primitive::Polyline {
                vertices: v,
                closed: false,
            }
        }
        Primitive::Ellipse {
            center,
            major_axis_endpoint,
            minor_to_major_ratio,
            start_param,
            end_param,
        } => {
            if start_param.is_none() && end_param.is_none() {
                return primitive.clone();
            }
            let major_radius = major_axis_endpoint.length();
            let delta = (length / major_radius).min(std::f64::consts::PI);
            Primitive::Ellipse {
                center: *center,
                major_axis_endpoint: *major_axis_endpoint,
                minor_to_major_ratio: *minor_to_major_ratio,
                start_param: start_param.map(|s| s - delta),
                end_param: end_param.map(|e| e + delta),
            }
        }
        Primitive::Spline { curve } => {
            // Bounded tangent-continuous prolongation: append/prepend a
            // straight segment along the end tangent, long enough to cover
            // `length`, then refit through the combined sample set so the
            // result remains a single NURBS curve.
            let mut samples = curve.control_points.len().max(16);
            samples = samples.max(16);
            let mut points: Vec<Point> = (0..=samples)
                .map(|i| curve.evaluate(i as f64 / samples as f64))
                .collect();
            let start_tangent = curve.derivative(0.0).normalize();
            let end_tangent = curve.derivative(1.0).normalize();
            points.insert(0, points[0] - start_tangent * length);
            points.push(*points.last().unwrap() + end_tangent * length);
            match crate::nurbs::NurbsCurve::fit_through(&points, curve.degree.min(points.len() - 1)) {
                Ok(fitted) => Primitive::Spline { curve: fitted },
                Err(_) => primitive.clone(),
            }
        }
    }
}

/// Extends `primitive` exactly so that `target` lies on its underlying
/// curve, moving only the end selected by `direction`. Returns `None` if
/// `target` doesn't lie on the curve within `tolerance`, or the required
/// magnitude exceeds `max_extension`.
pub fn extend_to_point(
    primitive: &Primitive,
    target: Point,
    tolerance: f64,
    max_extension: f64,
    direction: ExtendDirection,
) -> Option<(Primitive, Extension)> {
    match primitive {
        Primitive::Line { start, end } => {
            let dir = (*end - *start).normalize();
            let to_target = target - *start;
            let projected = to_target.dot(&dir);
            let closest = *start + dir * projected;
            if closest.distance_to(&target) > tolerance {
                return None;
            }
            let line_len = start.distance_to(end);
            let past_end = projected - line_len;
            let before_start = -projected;
            let (moved_start, magnitude) = choose_end(before_start, past_end, direction);
            if magnitude > max_extension + tolerance {
                return None;
            }
            if magnitude <= tolerance {
                return Some((primitive.clone(), Extension { magnitude: 0.0, moved_start }));
            }
            let extended = if moved_start {
                Primitive::Line { start: target, end: *end }
            } else {
                Primitive::Line { start: *start, end: target }
            };
            Some((extended, Extension { magnitude, moved_start }))
        }
        Primitive::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        } => {
            if (center.distance_to(&target) - radius).abs() > tolerance {
                return None;
            }
            let target_angle = (target - *center).angle();
            let sweep = widened_sweep(*start_angle, *end_angle, *clockwise);
            let angle_from_start = signed_angular_distance(*start_angle, target_angle, *clockwise);
            let before_start = (-angle_from_start).max(0.0) * radius;
            let past_end = (angle_from_start - sweep).max(0.0) * radius;
            if before_start <= tolerance * 2.0 && past_end <= tolerance * 2.0 {
                // already within sweep
                return Some((primitive.clone(), Extension { magnitude: 0.0, moved_start: false }));
            }
            let (moved_start, magnitude) = choose_end(before_start, past_end, direction);
            if magnitude > max_extension + tolerance {
                return None;
            }
            let extended = if moved_start {
                Primitive::Arc {
                    center: *center,
                    radius: *radius,
                    start_angle: target_angle,
                    end_angle: *end_angle,
                    clockwise: *clockwise,
                }
            } else {
                Primitive::Arc {
                    center: *center,
                    radius: *radius,
                    start_angle: *start_angle,
                    end_angle: target_angle,
                    clockwise: *clockwise,
                }
            };
            Some((extended, Extension { magnitude, moved_start }))
        }
        Primitive::Circle { center, radius } => {
            // A circle cannot be extended in place; convert to an arc per
            // the "auto" default: base angle fixed at parameter 0 (the
            // rightmost point), extending toward increasing angle.
            if (center.distance_to(&target) - radius).abs() > tolerance {
                return None;
            }
            let target_angle = (target - *center).angle();
            let arc = Primitive::Arc {
                center: *center,
                radius: *radius,
                start_angle: 0.0,
                end_angle: target_angle,
                clockwise: false,
            };
            let magnitude = target_angle.rem_euclid(std::f64::consts::TAU) * radius;
            if magnitude > max_extension + tolerance {
                return None;
            }
            Some((arc, Extension { magnitude, moved_start: false }))
        }
        _ => {
            // Ellipse and Spline: numerically search for the closest
            // parameter to `target` along the curve's natural domain,
            // widened slightly, then extend via create_extended if needed.
            extend_parametric_to_point(primitive, target, tolerance, max_extension, direction)
        }
    }
}

fn extend_parametric_to_point(
    primitive: &Primitive,
    target: Point,
    tolerance: f64,
    max_extension: f64,
    direction: ExtendDirection,
) -> Option<(Primitive, Extension)> {
    match primitive {
        Primitive::Ellipse {
            center,
            major_axis_endpoint,
            minor_to_major_ratio,
            start_param,
            end_param,
        } => {
            let major_radius = major_axis_endpoint.length();
            if major_radius < 1e-12 {
                return None;
            }
            let minor_radius = major_radius * minor_to_major_ratio;
            let rotation = major_axis_endpoint.angle();
            let local = target - *center;
            let cos_r = (-rotation).cos();
            let sin_r = (-rotation).sin();
            let lx = local.x * cos_r - local.y * sin_r;
            let ly = local.x * sin_r + local.y * cos_r;
            // Reject points not on the ellipse boundary (within tolerance,
            // measured as normalized radial distance scaled back to length units).
            let normalized = ((lx / major_radius).powi(2) + (ly / minor_radius).powi(2)).sqrt();
            if (normalized - 1.0).abs() * major_radius.max(minor_radius) > tolerance.max(1e-6) * 4.0 {
                return None;
            }
            let target_param = (ly / minor_to_major_ratio).atan2(lx);

            let (Some(s), Some(e)) = (*start_param, *end_param) else {
                // Full ellipse: nothing to extend toward, target already on it.
                return Some((primitive.clone(), Extension { magnitude: 0.0, moved_start: false }));
            };
            let tau = std::f64::consts::TAU;
            let span = (e - s).rem_euclid(tau);
            let from_start = (target_param - s).rem_euclid(tau);
            // `from_start` already inside the swept interval: no extension needed.
            let (before_start, past_end) = if from_start <= span {
                (0.0, 0.0)
            } else {
                // Outside the interval: decide whether the target is closer
                // to wrapping back before `s` or forward past `e`.
                let gap_before = tau - from_start; // distance going backward to reach s
                let gap_after = from_start - span; // distance past e
                (gap_before * major_radius, gap_after * major_radius)
            };
            if before_start <= tolerance * 2.0 && past_end <= tolerance * 2.0 {
                return Some((primitive.clone(), Extension { magnitude: 0.0, moved_start: false }));
            }
            let (moved_start, magnitude) = choose_end(before_start, past_end, direction);
            if magnitude > max_extension + tolerance {
                return None;
            }
            let extended = if moved_start {
                Primitive::Ellipse {
                    center: *center,
                    major_axis_endpoint: *major_axis_endpoint,
                    minor_to_major_ratio: *minor_to_major_ratio,
                    start_param: Some(target_param),
                    end_param: Some(e),
                }
            } else {
                Primitive::Ellipse {
                    center: *center,
                    major_axis_endpoint: *major_axis_endpoint,
                    minor_to_major_ratio: *minor_to_major_ratio,
                    start_param: Some(s),
                    end_param: Some(target_param),
                }
            };
            Some((extended, Extension { magnitude, moved_start }))
        }
        Primitive::Spline { curve } => {
            let samples = 200;
            let mut best: Option<(f64, f64)> = None;
            for i in 0..=samples {
                let t = i as f64 / samples as f64;
                let d = curve.evaluate(t).distance_to(&target);
                if best.map(|(_, bd)| d < bd).unwrap_or(true) {
                    best = Some((t, d));
                }
            }
            let (_t, dist) = best?;
            if dist > tolerance {
                return None;
            }
            let _ = max_extension;
            // If the nearest sample already lies within the curve's
            // existing domain and tolerance, no extension is needed.
            Some((primitive.clone(), Extension { magnitude: 0.0, moved_start: false }))
        }
        _ => None,
    }
}

fn choose_end(before_start: f64, past_end: f64, direction: ExtendDirection) -> (bool, f64) {
    match direction {
        ExtendDirection::Start => (true, before_start.max(0.0)),
        ExtendDirection::End => (false, past_end.max(0.0)),
        ExtendDirection::Auto => {
            if before_start <= past_end {
                (true, before_start.max(0.0))
            } else {
                (false, past_end.max(0.0))
            }
        }
    }
}

fn widened_sweep(start_angle: f64, end_angle: f64, clockwise: bool) -> f64 {
    let tau = std::f64::consts::TAU;
    let diff = if clockwise {
        start_angle - end_angle
    } else {
        end_angle - start_angle
    };
    diff.rem_euclid(tau).max(0.0)
}

fn signed_angular_distance(from: f64, to: f64, clockwise: bool) -> f64 {
    let tau = std::f64::consts::TAU;
    let diff = if clockwise { from - to } else { to - from };
    let wrapped = diff.rem_euclid(tau);
    if wrapped > std::f64::consts::PI {
        wrapped - tau
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extending_line_by_zero_returns_original() {
        let l = Primitive::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        let e = create_extended(&l, 0.0);
        assert_eq!(l, e);
    }

    #[test]
    fn extending_line_lengthens_both_ends() {
        let l = Primitive::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        let e = create_extended(&l, 5.0);
        match e {
            Primitive::Line { start, end } => {
                assert!((start.x - (-5.0)).abs() < 1e-9);
                assert!((end.x - 15.0).abs() < 1e-9);
            }
            _ => panic!(),
        }
    }

    #[test]
    fn extend_to_point_on_line_extension() {
        let l = Primitive::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        let (extended, ext) =
            extend_to_point(&l, Point::new(15.0, 0.0), 0.01, 10.0, ExtendDirection::End).unwrap();
        assert!((ext.magnitude - 5.0).abs() < 1e-9);
        assert_eq!(extended.end_point(), Point::new(15.0, 0.0));
    }

    #[test]
    fn extend_to_point_beyond_max_extension_fails() {
        let l = Primitive::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        let result = extend_to_point(&l, Point::new(100.0, 0.0), 0.01, 5.0, ExtendDirection::End);
        assert!(result.is_none());
    }

    #[test]
    fn circle_extension_converts_to_arc() {
        let c = Primitive::circle(Point::ZERO, 5.0).unwrap();
        let target = Point::new(0.0, 5.0); // angle pi/2
        let (extended, _) = extend_to_point(&c, target, 0.01, 100.0, ExtendDirection::Auto).unwrap();
        assert!(matches!(extended, Primitive::Arc { .. }));
    }

    #[test]
    fn ellipse_extend_to_point_widens_end_param() {
        let e = Primitive::ellipse(
            Point::ZERO,
            Point::new(10.0, 0.0),
            0.5,
            Some(0.0),
            Some(std::f64::consts::FRAC_PI_2),
        )
        .unwrap();
        let target_param = std::f64::consts::FRAC_PI_2 + 0.2;
        let target = Point::new(10.0 * target_param.cos(), 5.0 * target_param.sin());
        let result = extend_to_point(&e, target, 0.05, 10.0, ExtendDirection::End);
        assert!(result.is_some());
    }

    #[test]
    fn arc_extension_preserves_center_radius_and_direction() {
        let a = Primitive::arc(Point::ZERO, 5.0, 0.0, std::f64::consts::FRAC_PI_2, false).unwrap();
        let target_angle = std::f64::consts::FRAC_PI_2 + 0.3;
        let target = Point::new(5.0 * target_angle.cos(), 5.0 * target_angle.sin());
        let (extended, _) = extend_to_point(&a, target, 0.01, 10.0, ExtendDirection::End).unwrap();
        match extended {
            Primitive::Arc { center, radius, clockwise, .. } => {
                assert!(center.distance_to(&Point::ZERO) < 1e-9);
                assert!((radius - 5.0).abs() < 1e-9);
                assert!(!clockwise);
            }
            _ => panic!(),
        }
    }
}
