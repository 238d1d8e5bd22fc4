//! # Ring tessellation of the sky
//!
//! [`RingsSkyMap`] divides the sphere into `num_rings` bands of constant declination
//! width plus two polar caps. Each ring holds an integral number of tracts spaced
//! evenly in right ascension, starting at `ra_start`.
//!
//! ```text
//!  id 0                      south cap       (ring -1)
//!  ids 1 ..= count[0]        ring 0
//!  ...
//!  id num_tracts - 1         north cap       (ring num_rings)
//! ```
//!
//! ## Queries
//!
//! Both point queries resolve the ring and the position in the ring by arithmetic
//! instead of comparing tract centers:
//!
//! - [`find_tract`](SkyMap::find_tract) rounds to the nearest ring position. Ties are
//!   broken by the rounding, not by distance.
//! - [`find_all_tracts`](SkyMap::find_all_tracts) tests the 3×3 neighbourhood of ring
//!   positions around that result, plus both caps. This is complete only as long as the
//!   tract overlap stays below the width of a ring and of a tract; the map does not
//!   check it.
//!
//! ## Versions
//!
//! Ids are persisted, so the map is built with an explicit [`IndexingVersion`]. See
//! [`indexing`] for how the historical `V0` numbering differs from `V1`.
//!
//! ## Example
//!
//! ```rust
//! use skytract::{config::SkyMapConfig, geom::SkyPoint, rings::{IndexingVersion, RingsSkyMap}, skymap::SkyMap};
//!
//! let config = SkyMapConfig::builder().num_rings(3).build().unwrap();
//! let map = RingsSkyMap::new(config, IndexingVersion::V1).unwrap();
//! assert_eq!(map.num_tracts(), 26);
//!
//! let north_pole = SkyPoint::from_degrees(0.0, 90.0);
//! assert_eq!(map.find_tract(&north_pole).unwrap().id(), 25);
//! ```

pub mod indexing;
pub mod layout;

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use smallvec::SmallVec;
use tracing::debug;

use crate::{
    caching::{TractCache, TractGenerator},
    config::SkyMapConfig,
    constants::{Radian, TractId, RADEG, RADSEC},
    geom::SkyPoint,
    skymap::{SkyMap, TractList},
    skymap_errors::SkyMapError,
    tract_info::{TractBuilder, TractInfo},
    wcs::WcsFactory,
};

pub use indexing::IndexingVersion;
pub use layout::{RingLayout, RingNum};

use indexing::RingIndexing;

/// Sky map made of declination rings and two polar caps.
#[derive(Debug)]
pub struct RingsSkyMap {
    config: SkyMapConfig,
    version: IndexingVersion,
    indexing: &'static dyn RingIndexing,
    layout: RingLayout,
    ra_start: Radian,
    tract_overlap: Radian,
    builder: TractBuilder,
    cache: TractCache,
}

impl RingsSkyMap {
    /// Build a ring sky map.
    ///
    /// Tracts are not built here; each one is generated the first time it is requested.
    ///
    /// Arguments
    /// -----------------
    /// * `config`: the map configuration, validated again here.
    /// * `version`: the tract numbering; use [`IndexingVersion::V0`] only to read ids
    ///   persisted with the historical numbering.
    ///
    /// Return
    /// ----------
    /// * The map, or the first configuration error found.
    ///
    /// See also
    /// ------------
    /// * [`SkyMapConfig::validate`] – Configuration rules.
    /// * [`RingLayout::new`] – Ring sizing.
    pub fn new(config: SkyMapConfig, version: IndexingVersion) -> Result<Self, SkyMapError> {
        config.validate()?;

        let wcs_factory = WcsFactory::new(config.pixel_scale * RADSEC, &config.projection)?;
        let builder = TractBuilder::new(wcs_factory, config.num_patches, config.patch_border);
        let layout = RingLayout::new(config.num_rings);
        let cache = TractCache::new(layout.num_tracts());

        debug!(
            num_rings = config.num_rings,
            num_tracts = layout.num_tracts(),
            version = version.number(),
            projection = %config.projection,
            "rings sky map constructed"
        );

        Ok(RingsSkyMap {
            ra_start: config.ra_start * RADEG,
            tract_overlap: config.tract_overlap * RADEG,
            indexing: version.indexing(),
            config,
            version,
            layout,
            builder,
            cache,
        })
    }

    pub fn version(&self) -> IndexingVersion {
        self.version
    }

    pub fn layout(&self) -> &RingLayout {
        &self.layout
    }

    /// Declination extent of a ring (radians).
    pub fn ring_size(&self) -> Radian {
        self.layout.ring_size()
    }

    /// Number of tracts in each ring, south to north.
    pub fn ring_tract_counts(&self) -> &[usize] {
        self.layout.counts()
    }

    /// Ring number and position in the ring of tract `index`.
    ///
    /// Ring `-1` is the south cap and ring `num_rings` the north cap; both have
    /// position `0`.
    pub fn ring_indices(&self, index: TractId) -> Result<(RingNum, usize), SkyMapError> {
        self.indexing.decode(&self.layout, index)
    }

    /// Ring whose declination span holds `dec` (radians).
    pub fn dec_to_ring_num(&self, dec: Radian) -> RingNum {
        self.layout.dec_to_ring_num(dec)
    }

    /// Nearest position in `ring` to the right ascension `ra` (radians).
    pub fn ra_to_tract_num(&self, ra: Radian, ring: RingNum) -> usize {
        self.layout.ra_to_tract_num(ra, ring, self.ra_start)
    }

    fn is_ring(&self, ring: RingNum) -> bool {
        (0..self.layout.num_rings() as RingNum).contains(&ring)
    }
}

impl TractGenerator for RingsSkyMap {
    fn generate_tract(&self, index: TractId) -> Result<TractInfo, SkyMapError> {
        let (ring, tract_num) = self.ring_indices(index)?;
        let center = if ring < 0 {
            SkyPoint::new(0.0, -std::f64::consts::FRAC_PI_2)
        } else if !self.is_ring(ring) {
            SkyPoint::new(0.0, std::f64::consts::FRAC_PI_2)
        } else {
            let ring = ring as usize;
            SkyPoint::new(
                self.layout.tract_center_ra(ring, tract_num, self.ra_start),
                self.layout.ring_center_dec(ring),
            )
        };
        self.builder
            .build(index, center, 0.5 * self.ring_size(), self.tract_overlap)
    }
}

impl SkyMap for RingsSkyMap {
    fn type_name(&self) -> &'static str {
        "RingsSkyMap"
    }

    fn config(&self) -> &SkyMapConfig {
        &self.config
    }

    fn cache(&self) -> &TractCache {
        &self.cache
    }

    /// Number of rings (i32, little-endian) then `ra_start` (f64 degrees, little-endian).
    fn update_subclass_hash(&self, state: &mut dyn Hasher) {
        state.write(&(self.config.num_rings as i32).to_le_bytes());
        state.write(&self.config.ra_start.to_le_bytes());
    }

    fn find_tract(&self, coord: &SkyPoint) -> Result<Arc<TractInfo>, SkyMapError> {
        let ring = self.dec_to_ring_num(coord.dec());
        if ring < 0 {
            return self.tract(0);
        }
        if !self.is_ring(ring) {
            return self.tract(self.num_tracts() - 1);
        }
        let tract_num = self.ra_to_tract_num(coord.ra(), ring);
        self.tract(self.indexing.encode(&self.layout, ring as usize, tract_num))
    }

    fn find_all_tracts(&self, coord: &SkyPoint) -> Result<TractList, SkyMapError> {
        let ring = self.dec_to_ring_num(coord.dec());
        let mut candidates: SmallVec<[TractId; 11]> = SmallVec::new();

        for probe in (ring - 1..=ring + 1).filter(|r| self.is_ring(*r)) {
            let count = self.layout.counts()[probe as usize];
            let center_num = self.ra_to_tract_num(coord.ra(), probe);
            for step in [count - 1, 0, 1] {
                let tract_num = (center_num + step) % count;
                let index = self.indexing.encode(&self.layout, probe as usize, tract_num);
                if !candidates.contains(&index) {
                    candidates.push(index);
                }
            }
        }
        for cap in [0, self.num_tracts() - 1] {
            if !candidates.contains(&cap) {
                candidates.push(cap);
            }
        }

        let mut found = TractList::new();
        for index in candidates {
            let tract = self.tract(index)?;
            if tract.contains(coord) {
                found.push(tract);
            }
        }
        Ok(found)
    }
}

impl Hash for RingsSkyMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.update_hash(state);
    }
}

/// Two maps are equal when their configurations are; the numbering version is not
/// part of the comparison.
impl PartialEq for RingsSkyMap {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
    }
}

impl Eq for RingsSkyMap {}

impl fmt::Display for RingsSkyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RingsSkyMap(num_rings={}, num_tracts={}, ra_start={}°, version={})",
            self.config.num_rings,
            self.num_tracts(),
            self.config.ra_start,
            self.version
        )
    }
}
