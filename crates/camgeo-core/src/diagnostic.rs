//! Shared diagnostic vocabulary.
//!
//! Geometric failures that a pipeline stage can recover from locally are
//! reported as values rather than propagated as errors, so that one bad
//! chain never aborts a whole run. `PipelineDiagnostic` is the common shape
//! every stage appends to its output.

use serde::{Deserialize, Serialize};

use crate::ChainId;

/// The machine-readable kind of a diagnostic. Mirrors the abstract failure
/// taxonomy every stage reports against: two traversal-ordering conflicts
/// that chain normalization can hit, plus the recoverable failure modes of
/// part detection, offsetting, and gap filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Two shapes share a start point at non-adjacent positions in a chain;
    /// at least one needs reversal before the chain can be walked.
    CoincidentStartpoints,
    /// Two shapes share an end point at non-adjacent positions in a chain.
    CoincidentEndpoints,
    /// Chain normalization could not build a walkable ordering within the
    /// configured number of traversal attempts.
    BrokenTraversal,
    /// An open chain's bounding box intersects a closed chain's bounding box.
    OverlappingBoundary,
    /// An inset offset collapsed a curve to zero or negative extent.
    OffsetCollapse,
    /// An intersection or extension search found no valid result within the
    /// configured tolerance/extension bounds.
    NoSolution,
}

/// A single diagnostic emitted by a pipeline stage. Diagnostics accumulate
/// in the output of the stage that detected them; they never abort a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostic {
    pub chain_id: ChainId,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl PipelineDiagnostic {
    pub fn new(chain_id: ChainId, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            chain_id,
            kind,
            message: message.into(),
        }
    }
}
