//! The [`Part`] type: a closed chain designated as a shell together with
//! its immediate holes.

use camgeo_core::{ChainId, PartId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub shell: ChainId,
    pub holes: Vec<ChainId>,
}

impl Part {
    pub fn new(shell: ChainId, holes: Vec<ChainId>) -> Self {
        Self {
            id: PartId::new(),
            shell,
            holes,
        }
    }
}
