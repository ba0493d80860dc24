//! Error types for camgeo-engine.
//!
//! Only construction-time invariant failures (`GeometryError`) are modeled
//! as a `thiserror` enum with a `Result` alias. Recoverable per-operation
//! failures (no intersection found, extension out of bounds, traversal
//! conflicts) are reported as values on the operation's own result type or
//! as a [`camgeo_core::PipelineDiagnostic`], never as an error — a single
//! malformed chain must not abort the rest of the pipeline.

use thiserror::Error;

/// Result type for primitive construction.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Failures detected when constructing or validating a [`crate::Primitive`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("line has zero length: start and end coincide at ({0}, {1})")]
    ZeroLengthLine(f64, f64),

    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    #[error("coordinate is not finite: {0}")]
    NonFiniteCoordinate(f64),

    #[error("arc sweep is empty or exceeds a full turn: {0} radians")]
    InvalidArcSweep(f64),

    #[error("polyline bulge {0} is out of the valid (-1, 1] range for an arc segment shorter than a full turn")]
    InvalidBulge(f64),

    #[error("polyline requires at least 2 vertices, got {0}")]
    InsufficientVertices(usize),

    #[error("ellipse minor-to-major ratio must be in (0, 1], got {0}")]
    InvalidAxisRatio(f64),

    #[error("spline degree must be at least 1, got {0}")]
    InvalidSplineDegree(usize),

    #[error("spline control point count ({control_points}) inconsistent with degree {degree} and knot count {knots}")]
    InconsistentSplineDefinition {
        control_points: usize,
        degree: usize,
        knots: usize,
    },

    #[error("spline knot vector is not non-decreasing")]
    NonMonotonicKnots,
}
