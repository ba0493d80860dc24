//! Entity identifier types shared across the pipeline.
//!
//! Every stage of the pipeline refers to its inputs and outputs by opaque id
//! rather than by pointer or index, so that later stages can hold stable
//! back-references (e.g. an offset chain pointing at the chain it was
//! derived from) without borrowing the original value.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new, randomly generated id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id!(ShapeId, "Identifies a [`Shape`](crate::Shape) within a pipeline invocation.");
entity_id!(ChainId, "Identifies a chain produced by chain detection or normalization.");
entity_id!(PartId, "Identifies a part (shell + holes) produced by part detection.");
entity_id!(
    OffsetChainId,
    "Identifies a chain produced by offsetting another chain."
);
