//! Configuration module for camgeo-engine.
//!
//! Centralizes the tolerance values and tunables for every pipeline stage.
//! Each stage takes its own small `Copy` options struct with a `Default`
//! impl carrying the stage's documented default; there is no global
//! configuration singleton, because the pipeline holds no global state (an
//! offset computed with one set of options must never be contaminated by
//! another invocation's options running concurrently).
//!
//! # Example
//!
//! ```rust
//! use camgeo_engine::config::{ChainDetectionOptions, PartDetectionOptions};
//!
//! let detect = ChainDetectionOptions::default();
//! println!("default chain tolerance: {}", detect.tolerance);
//!
//! let parts = PartDetectionOptions {
//!     circle_tessellation_points: 128,
//!     ..Default::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// CHAIN DETECTION (C4)
// =============================================================================

/// Options for grouping loose primitives into chains by endpoint proximity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainDetectionOptions {
    /// Maximum distance between two endpoints for them to be considered
    /// connected.
    pub tolerance: f64,
}

impl Default for ChainDetectionOptions {
    fn default() -> Self {
        Self { tolerance: 0.05 }
    }
}

// =============================================================================
// CHAIN NORMALIZATION (C5)
// =============================================================================

/// Options for ordering and orienting shapes within a chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainNormalizationOptions {
    /// Maximum distance between a candidate shape's endpoint and the
    /// current tail for the walk to extend through it.
    pub traversal_tolerance: f64,
    /// Number of times the greedy walk may restart from a different head
    /// before the chain is flagged as unresolved.
    pub max_traversal_attempts: u32,
}

impl Default for ChainNormalizationOptions {
    fn default() -> Self {
        Self {
            traversal_tolerance: 0.01,
            max_traversal_attempts: 5,
        }
    }
}

// =============================================================================
// PART DETECTION (C6)
// =============================================================================

/// Options controlling the tessellation density used by planar containment
/// testing, and the precision of derived comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartDetectionOptions {
    /// Samples used to approximate a full circle's boundary. Must be >= 8.
    pub circle_tessellation_points: u32,
    /// Minimum samples used per arc, regardless of its span. Must be >= 4.
    pub min_arc_tessellation_points: u32,
    /// Target angular spacing between arc samples, in radians. Must be > 0.
    pub arc_tessellation_density: f64,
    /// Decimal places retained when comparing tessellated coordinates.
    /// Must be in [1, 6].
    pub decimal_precision: u32,
    /// Whether curved primitives are tessellated at all before containment
    /// testing; disabling this falls back to bounding-box-only containment.
    pub enable_tessellation: bool,
}

impl Default for PartDetectionOptions {
    fn default() -> Self {
        Self {
            circle_tessellation_points: 64,
            min_arc_tessellation_points: 16,
            arc_tessellation_density: std::f64::consts::PI / 32.0,
            decimal_precision: 4,
            enable_tessellation: true,
        }
    }
}

impl PartDetectionOptions {
    /// Returns the options unchanged if every field is within its documented
    /// range, or a description of the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        if self.circle_tessellation_points < 8 {
            return Err("circle_tessellation_points must be >= 8".into());
        }
        if self.min_arc_tessellation_points < 4 {
            return Err("min_arc_tessellation_points must be >= 4".into());
        }
        if self.arc_tessellation_density <= 0.0 {
            return Err("arc_tessellation_density must be > 0".into());
        }
        if !(1..=6).contains(&self.decimal_precision) {
            return Err("decimal_precision must be in [1, 6]".into());
        }
        Ok(())
    }
}

// =============================================================================
// EXTENSION DIRECTION (shared by C8/C9/C11)
// =============================================================================

/// Which end of a primitive an extension or fill operation is allowed to
/// move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtendDirection {
    Start,
    End,
    /// Extend whichever end keeps the post-extension parameter closer to
    /// the [0, 1] range of the curve.
    Auto,
}

impl Default for ExtendDirection {
    fn default() -> Self {
        ExtendDirection::Auto
    }
}

// =============================================================================
// FILL / EXTEND (C8, C9)
// =============================================================================

/// Options shared by the extend/trim kernel and the fill kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillOptions {
    /// How close a target point must lie to a primitive's underlying curve
    /// to be considered "on" it.
    pub tolerance: f64,
    /// The largest extension magnitude (length units, or radians for
    /// circular primitives) a single extension may introduce.
    pub max_extension: f64,
    /// Which end of the primitive is allowed to move.
    pub direction: ExtendDirection,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            max_extension: 10.0,
            direction: ExtendDirection::Auto,
        }
    }
}

// =============================================================================
// CHAIN OFFSET ORCHESTRATION (C11)
// =============================================================================

/// Options for offsetting a whole chain and stitching the joints back
/// together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainOffsetOptions {
    /// Tolerance used for joint-distance comparisons and offset refit
    /// quality checks.
    pub tolerance: f64,
    /// The largest extension magnitude a single gap fill may introduce.
    pub max_extension: f64,
    /// Joints whose endpoints already lie within this distance are snapped
    /// together rather than routed through the fill kernel.
    pub snap_threshold: f64,
}

impl Default for ChainOffsetOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            max_extension: 10.0,
            snap_threshold: 0.1,
        }
    }
}

// =============================================================================
// SHARED TOLERANCE / TESSELLATION CONSTANTS
// =============================================================================

/// Bare numeric defaults referenced throughout the pipeline, for callers
/// that want a constant rather than constructing a whole options struct.
pub mod tolerances {
    /// Default chain detection endpoint-proximity tolerance.
    pub const CHAIN_DETECTION: f64 = 0.05;

    /// Default chain normalization traversal tolerance.
    pub const TRAVERSAL: f64 = 0.01;

    /// Default closed-chain closure tolerance, shared with traversal
    /// tolerance unless a caller overrides it explicitly.
    pub const CLOSURE: f64 = 0.01;

    /// Default tolerance below which a primitive is treated as degenerate
    /// (zero length / zero sweep).
    pub const DEGENERATE: f64 = 1e-7;

    /// Default intersection numeric tolerance (NURBS subdivision/Newton
    /// convergence threshold).
    pub const INTERSECTION: f64 = 1e-9;

    /// Default offset/fill tolerance.
    pub const OFFSET: f64 = 0.01;
}

/// Bare tessellation defaults, mirroring [`PartDetectionOptions::default`].
pub mod tessellation {
    pub const CIRCLE_POINTS: u32 = 64;
    pub const MIN_ARC_POINTS: u32 = 16;
    pub const ARC_DENSITY_RADIANS: f64 = std::f64::consts::PI / 32.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_detection_defaults_match_spec() {
        assert_eq!(ChainDetectionOptions::default().tolerance, 0.05);
    }

    #[test]
    fn chain_normalization_defaults_match_spec() {
        let opts = ChainNormalizationOptions::default();
        assert_eq!(opts.traversal_tolerance, 0.01);
        assert_eq!(opts.max_traversal_attempts, 5);
    }

    #[test]
    fn part_detection_defaults_are_valid() {
        assert!(PartDetectionOptions::default().validate().is_ok());
    }

    #[test]
    fn part_detection_rejects_too_few_circle_points() {
        let opts = PartDetectionOptions {
            circle_tessellation_points: 4,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn extend_direction_defaults_to_auto() {
        assert_eq!(ExtendDirection::default(), ExtendDirection::Auto);
    }
}
