//! Linear tract id ↔ (ring, position in ring) conversions.
//!
//! Two numberings exist and neither may change, since tract ids are persisted:
//!
//! - [`IndexingVersion::V1`] is the plain cumulative numbering. Ring `r` owns ids
//!   `offset(r) + 1 ..= offset(r) + count(r)`.
//! - [`IndexingVersion::V0`] reproduces the historical decoder, which tested ring
//!   exhaustion with `>` instead of `>=`. Ring 0 gets one id too many (its last id
//!   repeats the center of its first), position 0 of every later ring is shifted onto
//!   the last id of the previous ring, and position 0 of the last ring is never
//!   decoded at all. The total number of tracts is unchanged.
//!
//! The version is picked once, when the map is built; queries go through the selected
//! [`RingIndexing`] without branching on it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    constants::TractId,
    rings::layout::{RingLayout, RingNum},
    skymap_errors::SkyMapError,
};

/// Tract numbering scheme of a [`crate::rings::RingsSkyMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndexingVersion {
    /// Historical numbering, kept to read ids written by older software.
    V0,
    #[default]
    V1,
}

impl IndexingVersion {
    pub fn number(&self) -> u32 {
        match self {
            IndexingVersion::V0 => 0,
            IndexingVersion::V1 => 1,
        }
    }

    pub(crate) fn indexing(&self) -> &'static dyn RingIndexing {
        match self {
            IndexingVersion::V0 => &LegacyIndexing,
            IndexingVersion::V1 => &CumulativeIndexing,
        }
    }
}

impl TryFrom<u32> for IndexingVersion {
    type Error = SkyMapError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(IndexingVersion::V0),
            1 => Ok(IndexingVersion::V1),
            other => Err(SkyMapError::InvalidConfig(format!(
                "unknown rings sky map version {other}, expected 0 or 1"
            ))),
        }
    }
}

impl fmt::Display for IndexingVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Conversion between linear tract ids and ring positions.
pub(crate) trait RingIndexing: fmt::Debug + Send + Sync {
    /// Whether the decoder moves past a ring once the remainder exceeds (`>`) or
    /// reaches (`>=`) its tract count.
    fn ring_exhausted(&self, remainder: usize, count: usize) -> bool;

    /// Ring whose ids hold position `tract_num` of `ring`.
    fn encode_ring(&self, ring: usize, tract_num: usize) -> usize;

    /// Decode `index` into `(ring, tract_num)`; the caps decode to `(-1, 0)` and
    /// `(num_rings, 0)`.
    fn decode(&self, layout: &RingLayout, index: TractId) -> Result<(RingNum, usize), SkyMapError> {
        let num_tracts = layout.num_tracts();
        if index >= num_tracts {
            return Err(SkyMapError::TractIndexOutOfRange { index, num_tracts });
        }
        if index == 0 {
            return Ok((-1, 0));
        }
        if index == num_tracts - 1 {
            return Ok((layout.num_rings() as RingNum, 0));
        }

        let counts = layout.counts();
        let mut remainder = index - 1;
        let mut ring = 0;
        while ring < counts.len() && self.ring_exhausted(remainder, counts[ring]) {
            remainder -= counts[ring];
            ring += 1;
        }
        Ok((ring as RingNum, remainder))
    }

    /// Linear id for position `tract_num` of ring `ring` (both in range).
    fn encode(&self, layout: &RingLayout, ring: usize, tract_num: usize) -> TractId {
        let id_ring = self.encode_ring(ring, tract_num);
        layout.linear_index(id_ring, tract_num)
    }
}

#[derive(Debug)]
struct CumulativeIndexing;

impl RingIndexing for CumulativeIndexing {
    fn ring_exhausted(&self, remainder: usize, count: usize) -> bool {
        remainder >= count
    }

    fn encode_ring(&self, ring: usize, _tract_num: usize) -> usize {
        ring
    }
}

#[derive(Debug)]
struct LegacyIndexing;

impl RingIndexing for LegacyIndexing {
    fn ring_exhausted(&self, remainder: usize, count: usize) -> bool {
        remainder > count
    }

    /// Position 0 of a ring above the first lives on the ids of the following ring.
    fn encode_ring(&self, ring: usize, tract_num: usize) -> usize {
        if tract_num == 0 && ring != 0 {
            ring + 1
        } else {
            ring
        }
    }
}
