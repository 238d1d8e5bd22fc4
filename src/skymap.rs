//! # Common sky map interface
//!
//! [`SkyMap`] is the query surface shared by tessellations. An implementor provides its
//! configuration, its [`TractCache`] and a [`TractGenerator`]; everything else has a
//! default:
//!
//! - indexed access and ascending-id iteration through the cache,
//! - brute-force [`find_tract`](SkyMap::find_tract) (nearest center) and
//!   [`find_all_tracts`](SkyMap::find_all_tracts) (every containing tract),
//! - tract/patch list queries built on the two above,
//! - a content hash of the configuration.
//!
//! The brute-force queries touch every tract and are only meant for small or irregular
//! tessellations; [`crate::rings::RingsSkyMap`] overrides both with direct index
//! arithmetic.
//!
//! ## Coverage
//!
//! A tessellation that does not cover the whole sky may return a tract from
//! `find_tract` that does not contain the position, and an empty list from
//! `find_all_tracts`. Neither is an error.

use std::{
    collections::hash_map::DefaultHasher,
    hash::Hasher,
    sync::Arc,
};

use ahash::AHashSet;
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    caching::{TractCache, TractGenerator},
    config::SkyMapConfig,
    constants::TractId,
    geom::SkyPoint,
    patch_info::PatchInfo,
    skymap_errors::SkyMapError,
    tract_info::TractInfo,
};

/// Tracts overlapping a single position; rarely more than a handful.
pub type TractList = SmallVec<[Arc<TractInfo>; 4]>;

/// Tracts paired with the patches a region overlaps in each of them.
pub type TractPatchList = Vec<(Arc<TractInfo>, Vec<PatchInfo>)>;

pub trait SkyMap: TractGenerator {
    /// Stable name of the tessellation kind, written first into the content hash.
    fn type_name(&self) -> &'static str;

    fn config(&self) -> &SkyMapConfig;

    fn cache(&self) -> &TractCache;

    /// Write the parameters specific to this tessellation kind into `state`.
    fn update_subclass_hash(&self, state: &mut dyn Hasher);

    fn num_tracts(&self) -> usize {
        self.cache().len()
    }

    /// Return tract `index`, building it on first access.
    ///
    /// Return
    /// ----------
    /// * The shared tract, or [`SkyMapError::TractIndexOutOfRange`] outside `[0, num_tracts)`.
    fn tract(&self, index: TractId) -> Result<Arc<TractInfo>, SkyMapError> {
        self.cache().get(index, self)
    }

    /// Iterate over every tract in ascending id order.
    fn iter(&self) -> Tracts<'_, Self>
    where
        Self: Sized,
    {
        Tracts {
            map: self,
            next: 0,
        }
    }

    /// Find the tract whose center is closest to `coord`.
    ///
    /// The default compares angular separations against every tract center.
    fn find_tract(&self, coord: &SkyPoint) -> Result<Arc<TractInfo>, SkyMapError> {
        let mut best: Option<(f64, Arc<TractInfo>)> = None;
        for index in 0..self.num_tracts() {
            let tract = self.tract(index)?;
            let distance = tract.ctr_coord().separation(coord);
            if best.as_ref().map_or(true, |(d, _)| distance < *d) {
                best = Some((distance, tract));
            }
        }
        best.map(|(_, tract)| tract)
            .ok_or(SkyMapError::TractIndexOutOfRange {
                index: 0,
                num_tracts: 0,
            })
    }

    /// Find every tract whose outer region contains `coord`.
    fn find_all_tracts(&self, coord: &SkyPoint) -> Result<TractList, SkyMapError> {
        let mut found = TractList::new();
        for index in 0..self.num_tracts() {
            let tract = self.tract(index)?;
            if tract.contains(coord) {
                found.push(tract);
            }
        }
        Ok(found)
    }

    /// Find tracts and patches overlapping the region spanned by `coords`.
    ///
    /// Every tract containing at least one of the coordinates is considered, and kept
    /// with its patch list when that list is not empty. Each tract appears at most once.
    /// The patch selection is a bounding box in each tract's pixel frame, so the result
    /// may include patches the region does not actually touch.
    ///
    /// See also
    /// ------------
    /// * [`SkyMap::find_closest_tract_patch_list`] – Same, restricted to the nearest tract per coordinate.
    /// * [`TractInfo::find_patch_list`] – Per-tract patch selection.
    fn find_tract_patch_list(&self, coords: &[SkyPoint]) -> Result<TractPatchList, SkyMapError> {
        let mut seen = AHashSet::new();
        let mut result = TractPatchList::new();
        for coord in coords {
            for tract in self.find_all_tracts(coord)? {
                if !seen.insert(tract.id()) {
                    continue;
                }
                let patches = tract.find_patch_list(coords);
                if !patches.is_empty() {
                    result.push((tract, patches));
                }
            }
        }
        debug!(
            coords = coords.len(),
            tracts = result.len(),
            "tract/patch list resolved"
        );
        Ok(result)
    }

    /// Like [`SkyMap::find_tract_patch_list`], but only the closest tract of each
    /// coordinate is considered.
    fn find_closest_tract_patch_list(
        &self,
        coords: &[SkyPoint],
    ) -> Result<TractPatchList, SkyMapError> {
        let mut seen = AHashSet::new();
        let mut result = TractPatchList::new();
        for coord in coords {
            let tract = self.find_tract(coord)?;
            if !seen.insert(tract.id()) {
                continue;
            }
            let patches = tract.find_patch_list(coords);
            if !patches.is_empty() {
                result.push((tract, patches));
            }
        }
        Ok(result)
    }

    /// Closest tract to `coord` and the patch of that tract whose inner box holds it.
    ///
    /// Return
    /// ----------
    /// * [`SkyMapError::CoordNotInTract`] when the closest tract does not contain `coord`.
    fn find_tract_and_patch(
        &self,
        coord: &SkyPoint,
    ) -> Result<(Arc<TractInfo>, PatchInfo), SkyMapError> {
        let tract = self.find_tract(coord)?;
        let patch = tract.find_patch(coord)?;
        Ok((tract, patch))
    }

    /// Write the map configuration into `state`.
    ///
    /// The layout is the type name, then the patch grid, border, tract overlap, pixel
    /// scale and projection code as little-endian bytes, then
    /// [`update_subclass_hash`](SkyMap::update_subclass_hash).
    fn update_hash(&self, state: &mut dyn Hasher) {
        let config = self.config();
        state.write(self.type_name().as_bytes());
        state.write(&config.num_patches[0].to_le_bytes());
        state.write(&config.num_patches[1].to_le_bytes());
        state.write(&config.patch_border.to_le_bytes());
        state.write(&config.tract_overlap.to_le_bytes());
        state.write(&config.pixel_scale.to_le_bytes());
        state.write(config.projection.to_ascii_uppercase().as_bytes());
        self.update_subclass_hash(state);
    }

    /// 64-bit digest of [`update_hash`](SkyMap::update_hash).
    ///
    /// Computed with `DefaultHasher`, whose algorithm may change between Rust releases:
    /// the value is only stable within one build. Feed [`update_hash`](SkyMap::update_hash)
    /// a fixed hasher to get a digest that can be persisted.
    fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.update_hash(&mut hasher);
        hasher.finish()
    }
}

/// Ascending-id iterator over the tracts of a [`SkyMap`].
#[derive(Debug)]
pub struct Tracts<'a, M> {
    map: &'a M,
    next: TractId,
}

impl<M: SkyMap> Iterator for Tracts<'_, M> {
    type Item = Result<Arc<TractInfo>, SkyMapError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.map.num_tracts() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.map.tract(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.map.num_tracts().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<M: SkyMap> ExactSizeIterator for Tracts<'_, M> {}
