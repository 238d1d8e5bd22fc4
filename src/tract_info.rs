//! # Tract geometry
//!
//! A [`TractInfo`] describes one cell of a tessellation: its center on the sky, the
//! radius of its inner region, the overlap margin around it, its pixel grid and the
//! patch grid subdividing that pixel grid.
//!
//! ## Building the pixel grid
//!
//! The tract bounding box is derived from the tract's own projection:
//!
//! 1. A provisional transform puts the tract center at pixel `(0, 0)`.
//! 2. The four points at distance `radius + overlap` from the center, toward the east,
//!    north, west and south, are projected; the integer box holding them is the minimum
//!    extent of the tract.
//! 3. Each axis is grown (about its center) to the next multiple of the number of
//!    patches along that axis, so that identical inner patch boxes tile the tract.
//! 4. The box is shifted so its minimum corner is `(0, 0)`, and the final transform's
//!    reference pixel is shifted by the same amount.
//!
//! ## Containment
//!
//! [`TractInfo::contains`] goes through the tract's own transform: a position belongs
//! to the tract when its pixel position falls in the tract bounding box. Accuracy near
//! the border is therefore that of the projection.
//!
//! ## See also
//! ------------
//! * [`crate::patch_info::PatchInfo`] – Inner/outer boxes of a single patch.
//! * [`crate::wcs::TractWcs`] – The sky ↔ pixel transform every query relies on.

use std::fmt;

use itertools::iproduct;

use crate::{
    constants::{PatchIndex, Radian, TractId},
    geom::{pixel_index, Box2D, Box2I, PixelPos, SkyPoint},
    patch_info::PatchInfo,
    skymap_errors::SkyMapError,
    wcs::{TractWcs, WcsFactory},
};

/// Pixel inset applied to the bounding box before computing the vertex list, so the
/// vertices are strictly inside the tract.
const VERTEX_INSET: f64 = 0.001;

/// Everything a tessellation shares between its tracts: the transform factory and the
/// patch grid layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TractBuilder {
    wcs_factory: WcsFactory,
    num_patches: [u32; 2],
    patch_border: u32,
}

impl TractBuilder {
    pub fn new(wcs_factory: WcsFactory, num_patches: [u32; 2], patch_border: u32) -> Self {
        TractBuilder {
            wcs_factory,
            num_patches,
            patch_border,
        }
    }

    pub fn wcs_factory(&self) -> &WcsFactory {
        &self.wcs_factory
    }

    pub fn num_patches(&self) -> [u32; 2] {
        self.num_patches
    }

    pub fn patch_border(&self) -> u32 {
        self.patch_border
    }

    /// Build a tract centered on `center` whose inner region has angular radius
    /// `inner_radius` and whose outer region extends `tract_overlap` further.
    ///
    /// Return
    /// ----------
    /// * The tract, or [`SkyMapError::ProjectionFailed`] when the requested extent is
    ///   outside the domain of the configured projection.
    pub fn build(
        &self,
        id: TractId,
        center: SkyPoint,
        inner_radius: Radian,
        tract_overlap: Radian,
    ) -> Result<TractInfo, SkyMapError> {
        let projection_failed = || SkyMapError::ProjectionFailed {
            tract_id: id,
            ra: center.ra_deg(),
            dec: center.dec_deg(),
        };

        let initial_wcs = self.wcs_factory.make_wcs(PixelPos::origin(), center);

        let mut min_bbox = Box2D::empty();
        let extent = inner_radius + tract_overlap;
        for i in 0..4 {
            let bearing = i as f64 * std::f64::consts::FRAC_PI_2;
            let pixel = initial_wcs
                .sky_to_pixel(&center.offset(bearing, extent))
                .ok_or_else(projection_failed)?;
            min_bbox.include(&pixel);
        }
        let initial_bbox = Box2I::expand_from(&min_bbox);

        // Grow each axis to a whole number of equal patches, keeping the center
        let mut initial_min = initial_bbox.min();
        let mut dimensions = initial_bbox.dimensions();
        let mut patch_inner_dimensions = [0i64; 2];
        for axis in 0..2 {
            let n = self.num_patches[axis] as i64;
            let inner = (dimensions[axis] + n - 1) / n;
            let delta = inner * n - dimensions[axis];
            if delta > 0 {
                dimensions[axis] = inner * n;
                initial_min[axis] -= delta / 2;
            }
            patch_inner_dimensions[axis] = inner;
        }

        let bbox = Box2I::from_min_dimensions([0, 0], dimensions);
        let crpix = PixelPos::new(-initial_min[0] as f64, -initial_min[1] as f64);
        let wcs = self.wcs_factory.make_wcs(crpix, center);

        let inset_bbox = Box2D::from(&bbox).grow(-VERTEX_INSET);
        let mut vertex_list = [center; 4];
        for (vertex, corner) in vertex_list.iter_mut().zip(inset_bbox.corners()) {
            *vertex = wcs.pixel_to_sky(&corner).ok_or_else(projection_failed)?;
        }

        Ok(TractInfo {
            id,
            ctr_coord: center,
            inner_radius,
            tract_overlap,
            bbox,
            num_patches: self.num_patches,
            patch_inner_dimensions,
            patch_border: self.patch_border,
            wcs,
            vertex_list,
        })
    }
}

/// Information about one tract of a tessellation.
#[derive(Debug, Clone, PartialEq)]
pub struct TractInfo {
    id: TractId,
    ctr_coord: SkyPoint,
    inner_radius: Radian,
    tract_overlap: Radian,
    bbox: Box2I,
    num_patches: [u32; 2],
    patch_inner_dimensions: [i64; 2],
    patch_border: u32,
    wcs: TractWcs,
    vertex_list: [SkyPoint; 4],
}

impl TractInfo {
    pub fn id(&self) -> TractId {
        self.id
    }

    /// Sky position of the tract center; also the reference position of its transform.
    pub fn ctr_coord(&self) -> SkyPoint {
        self.ctr_coord
    }

    /// Angular radius of the inner region.
    pub fn inner_radius(&self) -> Radian {
        self.inner_radius
    }

    /// Minimum distance the tract extends beyond its inner region.
    pub fn tract_overlap(&self) -> Radian {
        self.tract_overlap
    }

    pub fn wcs(&self) -> &TractWcs {
        &self.wcs
    }

    /// Pixel bounding box of the tract; its minimum corner is `(0, 0)`.
    pub fn bbox(&self) -> Box2I {
        self.bbox
    }

    pub fn num_patches(&self) -> [u32; 2] {
        self.num_patches
    }

    /// Dimensions of the inner box shared by every patch.
    pub fn patch_inner_dimensions(&self) -> [i64; 2] {
        self.patch_inner_dimensions
    }

    pub fn patch_border(&self) -> u32 {
        self.patch_border
    }

    /// Sky positions of the tract bounding box corners (inset by a thousandth of a pixel).
    pub fn vertex_list(&self) -> &[SkyPoint; 4] {
        &self.vertex_list
    }

    /// Whether `coord` falls in the tract's outer (overlap-inclusive) extent.
    pub fn contains(&self, coord: &SkyPoint) -> bool {
        self.wcs
            .sky_to_pixel(coord)
            .is_some_and(|pixel| self.bbox.contains(pixel_index(&pixel)))
    }

    /// Find the patch whose inner box contains `coord`.
    ///
    /// Return
    /// ----------
    /// * The patch, or [`SkyMapError::CoordNotInTract`] if `coord` is not on this tract.
    pub fn find_patch(&self, coord: &SkyPoint) -> Result<PatchInfo, SkyMapError> {
        let not_in_tract = || SkyMapError::CoordNotInTract {
            tract_id: self.id,
            ra: coord.ra_deg(),
            dec: coord.dec_deg(),
        };

        let pixel = self.wcs.sky_to_pixel(coord).ok_or_else(not_in_tract)?;
        let index = pixel_index(&pixel);
        if !self.bbox.contains(index) {
            return Err(not_in_tract());
        }
        self.patch_info([
            index[0] / self.patch_inner_dimensions[0],
            index[1] / self.patch_inner_dimensions[1],
        ])
    }

    /// Find every patch whose outer box may overlap the region spanned by `coords`.
    ///
    /// The region is approximated by the axis-aligned pixel box holding the projected
    /// coordinates, so the result can include patches the true region does not touch,
    /// but never misses one. Coordinates that cannot be projected are skipped.
    pub fn find_patch_list(&self, coords: &[SkyPoint]) -> Vec<PatchInfo> {
        let mut region = Box2D::empty();
        for coord in coords {
            if let Some(pixel) = self.wcs.sky_to_pixel(coord) {
                region.include(&pixel);
            }
        }

        let bbox = Box2I::expand_from(&region)
            .grow(self.patch_border as i64)
            .clip(&self.bbox);
        if bbox.is_empty() {
            return Vec::new();
        }

        let [inner_x, inner_y] = self.patch_inner_dimensions;
        let (min, max) = (bbox.min(), bbox.max());
        iproduct!(min[0] / inner_x..=max[0] / inner_x, min[1] / inner_y..=max[1] / inner_y)
            .filter_map(|(x, y)| self.patch_info([x, y]).ok())
            .collect()
    }

    /// Return the patch at `index`.
    ///
    /// Return
    /// ----------
    /// * The patch, or [`SkyMapError::PatchIndexOutOfRange`] if `index` is outside the grid.
    pub fn patch_info(&self, index: PatchIndex) -> Result<PatchInfo, SkyMapError> {
        let in_range = (0..self.num_patches[0] as i64).contains(&index[0])
            && (0..self.num_patches[1] as i64).contains(&index[1]);
        if !in_range {
            return Err(SkyMapError::PatchIndexOutOfRange {
                index,
                num_patches: self.num_patches,
            });
        }

        let inner_min = [
            index[0] * self.patch_inner_dimensions[0],
            index[1] * self.patch_inner_dimensions[1],
        ];
        let inner_bbox = Box2I::from_min_dimensions(inner_min, self.patch_inner_dimensions);
        let outer_bbox = inner_bbox
            .grow(self.patch_border as i64)
            .clip(&self.bbox);
        Ok(PatchInfo::new(index, inner_bbox, outer_bbox))
    }

    /// Total number of patches in the tract.
    pub fn num_patches_total(&self) -> usize {
        self.num_patches[0] as usize * self.num_patches[1] as usize
    }

    /// Sequential index of a patch: `nx * y + x`.
    pub fn sequential_patch_index(&self, patch: &PatchInfo) -> usize {
        let [x, y] = patch.index();
        self.num_patches[0] as usize * y as usize + x as usize
    }

    /// Inverse of [`TractInfo::sequential_patch_index`].
    pub fn patch_index_pair(&self, sequential: usize) -> Result<PatchIndex, SkyMapError> {
        let nx = self.num_patches[0] as usize;
        let index = [(sequential % nx) as i64, (sequential / nx) as i64];
        if sequential >= self.num_patches_total() {
            return Err(SkyMapError::PatchIndexOutOfRange {
                index,
                num_patches: self.num_patches,
            });
        }
        Ok(index)
    }

    /// Iterate over all patches in sequential-index order.
    pub fn patches(&self) -> impl Iterator<Item = PatchInfo> + '_ {
        let [nx, ny] = self.num_patches;
        iproduct!(0..ny as i64, 0..nx as i64)
            .filter_map(move |(y, x)| self.patch_info([x, y]).ok())
    }
}

impl fmt::Display for TractInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TractInfo(id={}, ctr_coord={})", self.id, self.ctr_coord)
    }
}
