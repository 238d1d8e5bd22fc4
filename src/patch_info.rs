use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{constants::PatchIndex, geom::Box2I};

/// A rectangular sub-region of a tract's pixel grid.
///
/// The inner boxes of all patches of a tract tile the tract bounding box exactly.
/// The outer box is the inner box grown by the patch border and clipped to the tract,
/// so neighbouring outer boxes overlap but never leave the tract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatchInfo {
    index: PatchIndex,
    inner_bbox: Box2I,
    outer_bbox: Box2I,
}

impl PatchInfo {
    pub fn new(index: PatchIndex, inner_bbox: Box2I, outer_bbox: Box2I) -> Self {
        PatchInfo {
            index,
            inner_bbox,
            outer_bbox,
        }
    }

    /// Patch index `(x, y)`; patch `(0, 0)` sits at the minimum corner of the tract.
    pub fn index(&self) -> PatchIndex {
        self.index
    }

    pub fn inner_bbox(&self) -> Box2I {
        self.inner_bbox
    }

    pub fn outer_bbox(&self) -> Box2I {
        self.outer_bbox
    }
}

impl fmt::Display for PatchInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatchInfo(index={},{})", self.index[0], self.index[1])
    }
}
