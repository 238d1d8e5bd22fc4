use thiserror::Error;

use crate::constants::{Degree, PatchIndex, TractId};

#[derive(Error, Debug)]
pub enum SkyMapError {
    #[error("Invalid projection code {0:?}: must have length 3")]
    InvalidProjectionCode(String),

    #[error("Unsupported projection: {0}")]
    UnsupportedProjection(String),

    #[error("Invalid sky map configuration: {0}")]
    InvalidConfig(String),

    #[error("Tract index {index} is out of range [0, {num_tracts})")]
    TractIndexOutOfRange { index: usize, num_tracts: usize },

    #[error("Patch index {index:?} is out of range for a {num_patches:?} patch grid")]
    PatchIndexOutOfRange {
        index: PatchIndex,
        num_patches: [u32; 2],
    },

    #[error("Coordinate (ra={ra:.6}°, dec={dec:.6}°) is not in tract {tract_id}")]
    CoordNotInTract {
        tract_id: TractId,
        ra: Degree,
        dec: Degree,
    },

    #[error("Sky to pixel projection failed for tract {tract_id} at (ra={ra:.6}°, dec={dec:.6}°)")]
    ProjectionFailed {
        tract_id: TractId,
        ra: Degree,
        dec: Degree,
    },

    #[error("Packed id {0} is out of range for this packer")]
    InvalidPackedId(u64),

    #[error("Filter {0:?} not supported by this id packer")]
    UnsupportedFilter(String),
}

impl PartialEq for SkyMapError {
    fn eq(&self, other: &Self) -> bool {
        use SkyMapError::*;
        match (self, other) {
            (InvalidProjectionCode(a), InvalidProjectionCode(b)) => a == b,
            (UnsupportedProjection(a), UnsupportedProjection(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,
            (
                TractIndexOutOfRange {
                    index: i1,
                    num_tracts: n1,
                },
                TractIndexOutOfRange {
                    index: i2,
                    num_tracts: n2,
                },
            ) => i1 == i2 && n1 == n2,
            (
                PatchIndexOutOfRange {
                    index: i1,
                    num_patches: n1,
                },
                PatchIndexOutOfRange {
                    index: i2,
                    num_patches: n2,
                },
            ) => i1 == i2 && n1 == n2,

            // Coordinates are floats; compare the tract only
            (CoordNotInTract { tract_id: a, .. }, CoordNotInTract { tract_id: b, .. }) => a == b,
            (ProjectionFailed { tract_id: a, .. }, ProjectionFailed { tract_id: b, .. }) => a == b,

            (InvalidPackedId(a), InvalidPackedId(b)) => a == b,
            (UnsupportedFilter(a), UnsupportedFilter(b)) => a == b,

            _ => false,
        }
    }
}
