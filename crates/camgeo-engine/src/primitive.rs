//! The primitive algebra (C1): a tagged union over the planar curve kinds
//! the pipeline understands, plus the operation surface every later stage
//! relies on (endpoints, tangent, bounding box, reversal, sampling,
//! containment).
//!
//! Validated construction mirrors the upstream workspace's factory pattern
//! of validating arguments before building a value (there, before handing
//! them to the geometry kernel; here, before accepting them into the
//! algebra at all) so that a malformed primitive can never enter the
//! pipeline.

use camgeo_core::Point;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, GeometryResult};
use crate::nurbs::NurbsCurve;

const DEGENERATE_TOLERANCE: f64 = 1e-9;

/// One vertex of a [`Primitive::Polyline`]. `bulge` is `tan(theta/4)` of the
/// arc swept from this vertex to the next one; `0.0` means a straight
/// segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolylineVertex {
    pub point: Point,
    pub bulge: f64,
}

impl PolylineVertex {
    pub fn new(point: Point, bulge: f64) -> Self {
        Self { point, bulge }
    }

    pub fn line(point: Point) -> Self {
        Self { point, bulge: 0.0 }
    }
}

/// The tagged union of planar primitives the pipeline reasons about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Line {
        start: Point,
        end: Point,
    },
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    Polyline {
        vertices: Vec<PolylineVertex>,
        closed: bool,
    },
    Ellipse {
        center: Point,
        /// Vector from center to the major-axis endpoint; its length is the
        /// major radius and its angle is the ellipse's rotation.
        major_axis_endpoint: Point,
        minor_to_major_ratio: f64,
        /// `None` means a full ellipse.
        start_param: Option<f64>,
        end_param: Option<f64>,
    },
    Spline {
        curve: NurbsCurve,
    },
}

impl Primitive {
    pub fn line(start: Point, end: Point) -> GeometryResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            let bad = if start.is_finite() { end } else { start };
            return Err(GeometryError::NonFiniteCoordinate(bad.x));
        }
        if start.distance_to(&end) < DEGENERATE_TOLERANCE {
            return Err(GeometryError::ZeroLengthLine(start.x, start.y));
        }
        Ok(Primitive::Line { start, end })
    }

    pub fn arc(
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
    ) -> GeometryResult<Self> {
        if radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        let sweep = angular_sweep(start_angle, end_angle, clockwise);
        if !(sweep > DEGENERATE_TOLERANCE && sweep <= std::f64::consts::TAU + 1e-9) {
            return Err(GeometryError::InvalidArcSweep(sweep));
        }
        Ok(Primitive::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        })
    }

    pub fn circle(center: Point, radius: f64) -> GeometryResult<Self> {
        if radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Primitive::Circle { center, radius })
    }

    pub fn polyline(vertices: Vec<PolylineVertex>, closed: bool) -> GeometryResult<Self> {
        if vertices.len() < 2 {
            return Err(GeometryError::InsufficientVertices(vertices.len()));
        }
        for v in &vertices {
            if v.bulge.abs() > 1.0 + 1e-9 {
                return Err(GeometryError::InvalidBulge(v.bulge));
            }
        }
        Ok(Primitive::Polyline { vertices, closed })
    }

    pub fn ellipse(
        center: Point,
        major_axis_endpoint: Point,
        minor_to_major_ratio: f64,
        start_param: Option<f64>,
        end_param: Option<f64>,
    ) -> GeometryResult<Self> {
        if major_axis_endpoint.length() < DEGENERATE_TOLERANCE {
            return Err(GeometryError::NonPositiveRadius(0.0));
        }
        if !(minor_to_major_ratio > 0.0 && minor_to_major_ratio <= 1.0) {
            return Err(GeometryError::InvalidAxisRatio(minor_to_major_ratio));
        }
        Ok(Primitive::Ellipse {
            center,
            major_axis_endpoint,
            minor_to_major_ratio,
            start_param,
            end_param,
        })
    }

    pub fn spline(curve: NurbsCurve) -> GeometryResult<Self> {
        curve.validate()?;
        Ok(Primitive::Spline { curve })
    }

    /// The point at the start of the primitive's natural parameterization.
    pub fn start_point(&self) -> Point {
        match self {
            Primitive::Line { start, .. } => *start,
            Primitive::Arc {
                center,
                radius,
                start_angle,
                ..
            } => point_on_circle(*center, *radius, *start_angle),
            Primitive::Circle { center, radius } => point_on_circle(*center, *radius, 0.0),
            Primitive::Polyline { vertices, .. } => vertices[0].point,
            Primitive::Ellipse {
                center,
                major_axis_endpoint,
                minor_to_major_ratio,
                start_param,
                ..
            } => point_on_ellipse(
                *center,
                *major_axis_endpoint,
                *minor_to_major_ratio,
                start_param.unwrap_or(0.0),
            ),
            Primitive::Spline { curve } => curve.evaluate(0.0),
        }
    }

    /// The point at the end of the primitive's natural parameterization.
    pub fn end_point(&self) -> Point {
        match self {
            Primitive::Line { end, .. } => *end,
            Primitive::Arc {
                center,
                radius,
                end_angle,
                ..
            } => point_on_circle(*center, *radius, *end_angle),
            Primitive::Circle { center, radius } => point_on_circle(*center, *radius, 0.0),
            Primitive::Polyline { vertices, closed } => {
                if *closed {
                    vertices[0].point
                } else {
                    vertices[vertices.len() - 1].point
                }
            }
            Primitive::Ellipse {
                center,
                major_axis_endpoint,
                minor_to_major_ratio,
                end_param,
                ..
            } => point_on_ellipse(
                *center,
                *major_axis_endpoint,
                *minor_to_major_ratio,
                end_param.unwrap_or(std::f64::consts::TAU),
            ),
            Primitive::Spline { curve } => curve.evaluate(1.0),
        }
    }

    /// Whether this primitive is inherently closed (Circle, or a full
    /// Ellipse, or a Polyline explicitly marked closed).
    pub fn is_inherently_closed(&self) -> bool {
        match self {
            Primitive::Circle { .. } => true,
            Primitive::Ellipse {
                start_param,
                end_param,
                ..
            } => start_param.is_none() && end_param.is_none(),
            Primitive::Polyline { closed, .. } => *closed,
            _ => false,
        }
    }

    /// Unit tangent at parameter `t` in [0, 1].
    pub fn tangent_at(&self, t: f64) -> GeometryResult<Point> {
        match self {
            Primitive::Line { start, end } => Ok((*end - *start).normalize()),
            Primitive::Arc {
                radius,
                start_angle,
                clockwise,
                ..
            } => {
                let _ = radius;
                let theta = angle_at_param(*start_angle, self.sweep_angle(), *clockwise, t);
                let dir = if *clockwise { -1.0 } else { 1.0 };
                Ok(Point::new(-theta.sin(), theta.cos()) * dir)
            }
            Primitive::Circle { .. } => {
                let theta = std::f64::consts::TAU * t;
                Ok(Point::new(-theta.sin(), theta.cos()))
            }
            Primitive::Polyline { vertices, closed } => {
                let (seg, local_t) = polyline_param_to_segment(vertices.len(), *closed, t);
                let seg_primitive = polyline_segment_primitive(vertices, *closed, seg)?;
                seg_primitive.tangent_at(local_t)
            }
            Primitive::Ellipse { .. } => {
                let h = 1e-6;
                let t0 = (t - h).max(0.0);
                let t1 = (t + h).min(1.0);
                let p0 = self.sample_at(t0)?;
                let p1 = self.sample_at(t1)?;
                Ok((p1 - p0).normalize())
            }
            Primitive::Spline { curve } => Ok(curve.derivative(t).normalize()),
        }
    }

    /// Axis-aligned bounding box, including interior sweep extrema for arcs.
    pub fn bounding_box(&self) -> camgeo_core::BoundingBox {
        use camgeo_core::BoundingBox;
        match self {
            Primitive::Line { start, end } => BoundingBox::from_point(*start).including(*end),
            Primitive::Circle { center, radius } => BoundingBox::new(
                Point::new(center.x - radius, center.y - radius),
                Point::new(center.x + radius, center.y + radius),
            ),
            Primitive::Arc {
                center,
                radius,
                start_angle,
                clockwise,
                ..
            } => {
                let sweep = self.sweep_angle();
                let mut bb = BoundingBox::from_point(self.start_point()).including(self.end_point());
                // The axis extrema (0, pi/2, pi, 3pi/2) lie on the arc's
                // bounding box only if they fall within the swept interval.
                for k in 0..4 {
                    let extreme_angle = k as f64 * std::f64::consts::FRAC_PI_2;
                    if angle_within_sweep(*start_angle, sweep, *clockwise, extreme_angle) {
                        bb = bb.including(point_on_circle(*center, *radius, extreme_angle));
                    }
                }
                bb
            }
            Primitive::Polyline { vertices, closed } => {
                let mut bb = BoundingBox::from_point(vertices[0].point);
                let n = vertices.len();
                let count = if *closed { n } else { n - 1 };
                for i in 0..count {
                    if let Ok(seg) = polyline_segment_primitive(vertices, *closed, i) {
                        bb = bb.union(&seg.bounding_box());
                    }
                }
                bb
            }
            Primitive::Ellipse { .. } => {
                // Sample densely; acceptable since ellipses are not hot-path
                // geometry for bounding box purposes (only used for fast
                // containment rejection, which tolerates a slightly loose box).
                let samples = self.sample(64);
                BoundingBox::from_points(samples).unwrap_or(BoundingBox::from_point(self.start_point()))
            }
            Primitive::Spline { curve } => curve.bounding_box(),
        }
    }

    /// The primitive traversing the same point set in the opposite
    /// direction.
    pub fn reverse(&self) -> Self {
        match self {
            Primitive::Line { start, end } => Primitive::Line {
                start: *end,
                end: *start,
            },
            Primitive::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                clockwise,
            } => Primitive::Arc {
                center: *center,
                radius: *radius,
                start_angle: *end_angle,
                end_angle: *start_angle,
                clockwise: !clockwise,
            },
            Primitive::Circle { center, radius } => Primitive::Circle {
                center: *center,
                radius: *radius,
            },
            Primitive::Polyline { vertices, closed } => {
                let n = vertices.len();
                let mut reversed = Vec::with_capacity(n);
                // Reversing a polyline reverses vertex order and negates
                // each bulge, shifting it by one position so the bulge
                // still belongs to the segment following its vertex.
                for i in 0..n {
                    let src = n - 1 - i;
                    let bulge_src = if *closed {
                        vertices[(src + n - 1) % n].bulge
                    } else if src == 0 {
                        0.0
                    } else {
                        vertices[src - 1].bulge
                    };
                    reversed.push(PolylineVertex::new(vertices[src].point, -bulge_src));
                }
                Primitive::Polyline {
                    vertices: reversed,
                    closed: *closed,
                }
            }
            Primitive::Ellipse {
                center,
                major_axis_endpoint,
                minor_to_major_ratio,
                start_param,
                end_param,
            } => Primitive::Ellipse {
                center: *center,
                major_axis_endpoint: *major_axis_endpoint,
                minor_to_major_ratio: *minor_to_major_ratio,
                start_param: *end_param,
                end_param: *start_param,
            },
            Primitive::Spline { curve } => Primitive::Spline {
                curve: curve.reversed(),
            },
        }
    }

    /// `n + 1` points at evenly spaced parameters in [0, 1].
    pub fn sample(&self, n: usize) -> Vec<Point> {
        (0..=n)
            .map(|i| i as f64 / n as f64)
            .map(|t| self.sample_at(t).unwrap_or_else(|_| self.start_point()))
            .collect()
    }

    /// Polyline-approximated arc length, summing the chord lengths between
    /// 32 evenly spaced samples. Exact for lines, close enough for
    /// comparing which of two curves is "shorter" elsewhere in the engine.
    pub fn approx_length(&self) -> f64 {
        let points = self.sample(32);
        points.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
    }

    fn sample_at(&self, t: f64) -> GeometryResult<Point> {
        match self {
            Primitive::Line { start, end } => Ok(*start + (*end - *start) * t),
            Primitive::Arc {
                center,
                radius,
                start_angle,
                clockwise,
                ..
            } => {
                let theta = angle_at_param(*start_angle, self.sweep_angle(), *clockwise, t);
                Ok(point_on_circle(*center, *radius, theta))
            }
            Primitive::Circle { center, radius } => {
                Ok(point_on_circle(*center, *radius, std::f64::consts::TAU * t))
            }
            Primitive::Polyline { vertices, closed } => {
                let (seg, local_t) = polyline_param_to_segment(vertices.len(), *closed, t);
                Ok(polyline_segment_primitive(vertices, *closed, seg)?.sample_at(local_t)?)
            }
            Primitive::Ellipse {
                center,
                major_axis_endpoint,
                minor_to_major_ratio,
                start_param,
                end_param,
            } => {
                let s = start_param.unwrap_or(0.0);
                let e = end_param.unwrap_or(std::f64::consts::TAU);
                let span = if e >= s { e - s } else { e + std::f64::consts::TAU - s };
                let param = s + span * t;
                Ok(point_on_ellipse(
                    *center,
                    *major_axis_endpoint,
                    *minor_to_major_ratio,
                    param,
                ))
            }
            Primitive::Spline { curve } => Ok(curve.evaluate(t)),
        }
    }

    /// Whether `point` lies inside the closed region this primitive
    /// encloses. Only meaningful for inherently closed primitives.
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Primitive::Circle { center, radius } => center.distance_to(&point) <= radius + tolerance,
            _ => crate::part_detect::point_in_polygon(&self.sample(256), point),
        }
    }

    /// Total angular sweep of an Arc, accounting for `clockwise` direction
    /// and wraparound. Panics (via unwrap at call sites) only for non-Arc
    /// variants, which never call this helper.
    fn sweep_angle(&self) -> f64 {
        match self {
            Primitive::Arc {
                start_angle,
                end_angle,
                clockwise,
                ..
            } => angular_sweep(*start_angle, *end_angle, *clockwise),
            _ => std::f64::consts::TAU,
        }
    }
}

fn point_on_circle(center: Point, radius: f64, angle: f64) -> Point {
    center + Point::new(angle.cos(), angle.sin()) * radius
}

fn point_on_ellipse(
    center: Point,
    major_axis_endpoint: Point,
    minor_to_major_ratio: f64,
    param: f64,
) -> Point {
    let major_radius = major_axis_endpoint.length();
    let rotation = major_axis_endpoint.angle();
    let minor_radius = major_radius * minor_to_major_ratio;
    let local = Point::new(major_radius * param.cos(), minor_radius * param.sin());
    let (c, s) = (rotation.cos(), rotation.sin());
    center + Point::new(local.x * c - local.y * s, local.x * s + local.y * c)
}

/// Total sweep of an arc going from `start_angle` to `end_angle` in the
/// direction implied by `clockwise`, always returned positive in (0, 2*pi].
fn angular_sweep(start_angle: f64, end_angle: f64, clockwise: bool) -> f64 {
    let tau = std::f64::consts::TAU;
    let diff = if clockwise {
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
}

/// The absolute angle reached after sweeping `t` of the way from
/// `start_angle` through `sweep` radians in the given direction.
fn angle_at_param(start_angle: f64, sweep: f64, clockwise: bool, t: f64) -> f64 {
    let delta = sweep * t;
    if clockwise {
        start_angle - delta
    } else {
        start_angle + delta
    }
}

/// Whether `angle` lies within the arc's swept interval (inclusive).
fn angle_within_sweep(start_angle: f64, sweep: f64, clockwise: bool, angle: f64) -> bool {
    let tau = std::f64::consts::TAU;
    let diff = if clockwise {
        (start_angle - angle).rem_euclid(tau)
    } else {
        (angle - start_angle).rem_euclid(tau)
    };
    diff <= sweep + 1e-9
}

/// Maps a polyline-global parameter in [0, 1] to (segment index, local
/// parameter in [0, 1]), per the convention
/// `param = (segmentIndex + localT) / segmentCount`.
fn polyline_param_to_segment(vertex_count: usize, closed: bool, t: f64) -> (usize, f64) {
    let segment_count = if closed { vertex_count } else { vertex_count - 1 };
    let scaled = (t * segment_count as f64).clamp(0.0, segment_count as f64);
    let seg = (scaled.floor() as usize).min(segment_count - 1);
    let local_t = scaled - seg as f64;
    (seg, local_t)
}

/// Builds the Line or Arc primitive representing polyline segment `index`
/// (from `vertices[index]` to the next vertex, wrapping if closed), per the
/// bulge-to-arc construction of C3.
pub(crate) fn polyline_segment_primitive(
    vertices: &[PolylineVertex],
    closed: bool,
    index: usize,
) -> GeometryResult<Primitive> {
    let n = vertices.len();
    let next = if closed { (index + 1) % n } else { index + 1 };
    let from = vertices[index];
    let to = vertices[next].point;
    if from.bulge.abs() < 1e-9 {
        Primitive::line(from.point, to)
    } else {
        crate::decompose::bulge_to_arc(from.point, to, from.bulge)
    }
}
