//! # Dense integer ids for (tract, patch, filter)
//!
//! Downstream storage keys coadds by a single integer. [`TractPatchPacker`] packs a
//! tract id, a sequential patch index and optionally a filter into one `u64`:
//!
//! ```text
//! packed = patch + patch_max * tract [+ filter_index * patch_max * tract_max]
//! ```
//!
//! Filter indices follow [`SUPPORTED_FILTERS`]; new filters may only be appended, or
//! existing ids change meaning.

use std::fmt;

use crate::{constants::TractId, skymap::SkyMap, skymap_errors::SkyMapError};

/// Filter names a packer can encode; `None` (no filter) has index 0.
pub const SUPPORTED_FILTERS: [Option<&str>; 18] = [
    None,
    Some("u"),
    Some("g"),
    Some("r"),
    Some("i"),
    Some("z"),
    Some("y"),
    Some("U"),
    Some("B"),
    Some("G"),
    Some("V"),
    Some("R"),
    Some("I"),
    Some("Z"),
    Some("Y"),
    Some("J"),
    Some("H"),
    Some("K"),
];

/// Index of a filter name in [`SUPPORTED_FILTERS`].
pub fn filter_index(name: Option<&str>) -> Result<u64, SkyMapError> {
    SUPPORTED_FILTERS
        .iter()
        .position(|f| *f == name)
        .map(|i| i as u64)
        .ok_or_else(|| SkyMapError::UnsupportedFilter(name.unwrap_or("None").to_string()))
}

/// Unpacked content of an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedTractPatch {
    pub tract: TractId,
    /// Sequential patch index, see [`crate::tract_info::TractInfo::sequential_patch_index`].
    pub patch: usize,
    /// `None` when the packer has no filter, `Some(None)` for the "no filter" entry.
    pub filter: Option<Option<&'static str>>,
}

/// Packs tract, patch and filter into a dense integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TractPatchPacker {
    patch_max: u64,
    tract_patch_max: u64,
    with_filter: bool,
}

impl TractPatchPacker {
    /// Create a packer.
    ///
    /// Arguments
    /// -----------------
    /// * `tract_max`: exclusive upper bound of tract ids.
    /// * `patch_nx_max`, `patch_ny_max`: exclusive upper bounds of patch indices.
    /// * `with_filter`: whether ids also carry a filter.
    pub fn new(
        tract_max: usize,
        patch_nx_max: u32,
        patch_ny_max: u32,
        with_filter: bool,
    ) -> Result<Self, SkyMapError> {
        let patch_max = patch_nx_max as u64 * patch_ny_max as u64;
        let tract_patch_max = patch_max
            .checked_mul(tract_max as u64)
            .filter(|&m| m > 0)
            .ok_or_else(|| {
                SkyMapError::InvalidConfig(format!(
                    "cannot pack {tract_max} tracts of {patch_nx_max}x{patch_ny_max} patches"
                ))
            })?;
        Ok(TractPatchPacker {
            patch_max,
            tract_patch_max,
            with_filter,
        })
    }

    /// Packer sized for every tract and patch of `map`.
    pub fn for_skymap<M: SkyMap + ?Sized>(map: &M, with_filter: bool) -> Result<Self, SkyMapError> {
        let [nx, ny] = map.config().num_patches;
        Self::new(map.num_tracts(), nx, ny, with_filter)
    }

    pub fn with_filter(&self) -> bool {
        self.with_filter
    }

    /// Exclusive upper bound of packed ids.
    pub fn packed_max(&self) -> u64 {
        if self.with_filter {
            self.tract_patch_max * SUPPORTED_FILTERS.len() as u64
        } else {
            self.tract_patch_max
        }
    }

    /// Number of bits needed to hold any packed id.
    pub fn max_bits(&self) -> u32 {
        u64::BITS - self.packed_max().leading_zeros()
    }

    /// Pack a tract id, a sequential patch index and a filter.
    ///
    /// `filter` is ignored when the packer has no filter.
    pub fn pack(
        &self,
        tract: TractId,
        patch: usize,
        filter: Option<&str>,
    ) -> Result<u64, SkyMapError> {
        let tract_max = self.tract_patch_max / self.patch_max;
        if patch as u64 >= self.patch_max || tract as u64 >= tract_max {
            return Err(SkyMapError::InvalidConfig(format!(
                "tract {tract}, patch {patch} exceed packer bounds ({tract_max} tracts, {} patches)",
                self.patch_max
            )));
        }

        let mut packed = patch as u64 + self.patch_max * tract as u64;
        if self.with_filter {
            packed += filter_index(filter)? * self.tract_patch_max;
        }
        Ok(packed)
    }

    /// Inverse of [`TractPatchPacker::pack`].
    pub fn unpack(&self, packed: u64) -> Result<PackedTractPatch, SkyMapError> {
        if packed >= self.packed_max() {
            return Err(SkyMapError::InvalidPackedId(packed));
        }

        let (filter, rest) = if self.with_filter {
            let index = (packed / self.tract_patch_max) as usize;
            (
                Some(SUPPORTED_FILTERS[index]),
                packed % self.tract_patch_max,
            )
        } else {
            (None, packed)
        };

        Ok(PackedTractPatch {
            tract: (rest / self.patch_max) as TractId,
            patch: (rest % self.patch_max) as usize,
            filter,
        })
    }
}

impl fmt::Display for TractPatchPacker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TractPatchPacker(patch_max={}, tract_patch_max={}, with_filter={}, max_bits={})",
            self.patch_max,
            self.tract_patch_max,
            self.with_filter,
            self.max_bits()
        )
    }
}
