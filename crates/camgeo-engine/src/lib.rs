//! camgeo-engine - a 2D CAM geometric reasoning engine
//!
//! Turns loose, unordered planar primitives from a DXF/DWG-style import
//! into the structures a CAM post-processor needs: closed chains grouped
//! into parts with their holes, offset toolpaths with gaps closed across
//! joints, and a cut order that never severs a part from the holes still
//! waiting to be cut out of it.
//!
//! # Pipeline
//!
//! ```text
//! shapes -> translate_to_positive -> decompose_polylines -> detect_chains
//!        -> normalize_chain (per chain) -> detect_parts
//!        -> offset_chain (per chain, per distance) -> optimize_cut_order
//! ```
//!
//! Every stage is pure and synchronous: the same input and options always
//! produce the same output, and a stage never aborts the whole pipeline on
//! a single bad chain — it reports a [`camgeo_core::PipelineDiagnostic`]
//! instead and keeps going with its best-effort result.
//!
//! # Example
//!
//! ```no_run
//! use camgeo_engine::{config::ChainDetectionOptions, chain_detect::detect_chains};
//!
//! # fn shapes() -> Vec<camgeo_engine::shape::Shape> { vec![] }
//! let shapes = shapes();
//! let chains = detect_chains(&shapes, &ChainDetectionOptions::default());
//! println!("found {} chains", chains.len());
//! ```

pub mod chain;
pub mod chain_detect;
pub mod chain_normalize;
pub mod chain_offset;
pub mod config;
mod decompose;
pub mod error;
pub mod extend;
pub mod fill;
pub mod intersect;
mod nurbs;
pub mod offset;
pub mod part;
pub mod part_detect;
pub mod primitive;
pub mod cutorder;
pub mod shape;
pub mod translate;
mod unionfind;

pub use chain::Chain;
pub use chain_detect::detect_chains;
pub use chain_normalize::{normalize_chain, NormalizeResult};
pub use chain_offset::{offset_chain, ChainOffsetResult, GapFill, OffsetChain};
pub use config::{
    ChainDetectionOptions, ChainNormalizationOptions, ChainOffsetOptions, ExtendDirection,
    FillOptions, PartDetectionOptions,
};
pub use cutorder::{optimize_cut_order, ScheduledCut};
pub use decompose::decompose_polylines;
pub use error::{GeometryError, GeometryResult};
pub use extend::{create_extended, extend_to_point, Extension};
pub use fill::{fill_gap, FillMethod, FillResult};
pub use intersect::{intersect, intersect_with_extensions, pairwise_intersections, Intersection};
pub use nurbs::NurbsCurve;
pub use offset::{offset_many, offset_primitive};
pub use part::Part;
pub use part_detect::{detect_parts, point_in_polygon, PartDetectionResult};
pub use primitive::{Primitive, PolylineVertex};
pub use shape::Shape;
pub use translate::translate_to_positive;
