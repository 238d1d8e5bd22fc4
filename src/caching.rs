//! # Lazy tract arena
//!
//! A tessellation at survey scale holds tens of thousands of tracts, each needing its
//! own transform and bounding box. [`TractCache`] builds a tract only the first time its
//! index is requested and keeps it for the lifetime of the map.
//!
//! ## Concurrency
//!
//! The arena is a boxed slice with one [`OnceCell`] per tract id. Two threads asking for
//! the same missing tract may both run the generator; exactly one result is stored and
//! both observe the same [`Arc`]. Generation is a pure function of the index and the map
//! configuration, so the discarded result is indistinguishable from the kept one.
//!
//! See also
//! ------------
//! * [`TractGenerator`] – Hook the owning map implements to build a tract.
//! * [`crate::skymap::SkyMap`] – Query surface built on top of the arena.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::trace;

use crate::{constants::TractId, skymap_errors::SkyMapError, tract_info::TractInfo};

/// Tessellation-specific construction of a tract from its index.
pub trait TractGenerator {
    /// Build tract `index`; `index` is already known to be in range.
    fn generate_tract(&self, index: TractId) -> Result<TractInfo, SkyMapError>;
}

/// Index-addressed, lazily populated store of tracts.
#[derive(Debug)]
pub struct TractCache {
    slots: Box<[OnceCell<Arc<TractInfo>>]>,
}

impl TractCache {
    /// Create an empty cache with room for `num_tracts` tracts.
    pub fn new(num_tracts: usize) -> Self {
        TractCache {
            slots: (0..num_tracts).map(|_| OnceCell::new()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of tracts generated so far.
    pub fn num_generated(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }

    /// Get tract `index`, generating it with `generator` on first access.
    ///
    /// Arguments
    /// -----------------
    /// * `index`: tract id, must be in `[0, len)`.
    /// * `generator`: builds the tract when the slot is still empty.
    ///
    /// Return
    /// ----------
    /// * The shared tract, [`SkyMapError::TractIndexOutOfRange`] for a bad index, or the
    ///   generator's error (the slot stays empty so a later call retries).
    pub fn get<G>(&self, index: TractId, generator: &G) -> Result<Arc<TractInfo>, SkyMapError>
    where
        G: TractGenerator + ?Sized,
    {
        let slot = self
            .slots
            .get(index)
            .ok_or(SkyMapError::TractIndexOutOfRange {
                index,
                num_tracts: self.slots.len(),
            })?;

        slot.get_or_try_init(|| {
            trace!(tract = index, "generating tract");
            generator.generate_tract(index).map(Arc::new)
        })
        .cloned()
    }
}
