//! # Sky ↔ pixel transforms for tracts
//!
//! Every tract owns a [`TractWcs`]: a zenithal projection centered on the tract center
//! (`CRVAL`), a reference pixel (`CRPIX`, 0-based) and a diagonal CD matrix built from
//! the nominal pixel scale.
//!
//! ## Conventions
//!
//! ```text
//! CD = | -scale   0    |      intermediate x grows toward the east,
//!      |   0     scale |      so pixel x grows toward decreasing RA
//! ```
//!
//! - Pixel positions are 0-based with pixel centers on integers; [`TractWcs::fits_header`]
//!   converts `CRPIX` to the 1-based FITS convention.
//! - The local `(east, north)` frame of `CRVAL` defines the projection plane axes, see
//!   [`SkyPoint::local_frame`].
//!
//! [`WcsFactory`] holds the parts shared by every tract of a tessellation (pixel scale
//! and projection) so building a tract's transform is a single call.

pub mod projection;

use nalgebra::{Matrix2, Vector2, Vector3};

use crate::{
    constants::{Radian, RADEG},
    geom::{PixelPos, SkyPoint},
    skymap_errors::SkyMapError,
};

pub use projection::Projection;

/// Builds [`TractWcs`] instances sharing a pixel scale and a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct WcsFactory {
    pixel_scale: Radian,
    projection: Projection,
}

impl WcsFactory {
    /// Create a factory.
    ///
    /// Arguments
    /// -----------------
    /// * `pixel_scale`: nominal size of a pixel on the sky, in radians.
    /// * `projection`: 3-letter FITS code, e.g. `"TAN"`, `"STG"`.
    ///
    /// Return
    /// ----------
    /// * The factory, or the projection parsing error.
    pub fn new(pixel_scale: Radian, projection: &str) -> Result<Self, SkyMapError> {
        if !(pixel_scale.is_finite() && pixel_scale > 0.0) {
            return Err(SkyMapError::InvalidConfig(format!(
                "pixel scale must be > 0, got {pixel_scale}"
            )));
        }
        Ok(WcsFactory {
            pixel_scale,
            projection: Projection::from_code(projection)?,
        })
    }

    pub fn pixel_scale(&self) -> Radian {
        self.pixel_scale
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Make a transform with reference pixel `crpix` (0-based) at sky position `crval`.
    pub fn make_wcs(&self, crpix: PixelPos, crval: SkyPoint) -> TractWcs {
        let cd = Matrix2::new(-self.pixel_scale, 0.0, 0.0, self.pixel_scale);
        let cd_inv = Matrix2::new(-1.0 / self.pixel_scale, 0.0, 0.0, 1.0 / self.pixel_scale);
        let (east, north) = crval.local_frame();
        TractWcs {
            crpix,
            crval,
            cd,
            cd_inv,
            projection: self.projection,
            center: crval.to_unit_vector(),
            east,
            north,
        }
    }
}

/// Sky ↔ pixel transform of a single tract.
#[derive(Debug, Clone, PartialEq)]
pub struct TractWcs {
    crpix: PixelPos,
    crval: SkyPoint,
    cd: Matrix2<f64>,
    cd_inv: Matrix2<f64>,
    projection: Projection,
    center: Vector3<f64>,
    east: Vector3<f64>,
    north: Vector3<f64>,
}

impl TractWcs {
    pub fn crpix(&self) -> PixelPos {
        self.crpix
    }

    pub fn crval(&self) -> SkyPoint {
        self.crval
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Nominal pixel scale (radians per pixel) from the CD matrix determinant.
    pub fn pixel_scale(&self) -> Radian {
        self.cd.determinant().abs().sqrt()
    }

    /// Project a sky position to a 0-based pixel position.
    ///
    /// Returns `None` when the point lies outside the projection's domain.
    pub fn sky_to_pixel(&self, coord: &SkyPoint) -> Option<PixelPos> {
        let s = coord.to_unit_vector();
        let x_east = s.dot(&self.east);
        let y_north = s.dot(&self.north);
        let sin_rho = x_east.hypot(y_north);
        let rho = sin_rho.atan2(s.dot(&self.center));

        let radius = self.projection.radius(rho)?;
        let iwc = if sin_rho > 0.0 {
            Vector2::new(x_east, y_north) * (radius / sin_rho)
        } else {
            Vector2::zeros()
        };

        let offset = self.cd_inv * iwc;
        let pixel = PixelPos::new(self.crpix.x + offset.x, self.crpix.y + offset.y);
        (pixel.x.is_finite() && pixel.y.is_finite()).then_some(pixel)
    }

    /// Map a 0-based pixel position back to the sky.
    ///
    /// Returns `None` when the position is outside the projection's valid region.
    pub fn pixel_to_sky(&self, pixel: &PixelPos) -> Option<SkyPoint> {
        let iwc = self.cd * Vector2::new(pixel.x - self.crpix.x, pixel.y - self.crpix.y);
        let radius = iwc.norm();
        if radius == 0.0 {
            return Some(self.crval);
        }
        let rho = self.projection.inverse_radius(radius)?;
        let direction = self.east * (iwc.x / radius) + self.north * (iwc.y / radius);
        let s = self.center * rho.cos() + direction * rho.sin();
        Some(SkyPoint::from_unit_vector(&s))
    }

    /// `CTYPE1`/`CTYPE2` values, e.g. `["RA---STG", "DEC--STG"]`.
    pub fn ctypes(&self) -> [String; 2] {
        let code = self.projection.code();
        [
            format!("{:-<5}{code}", "RA"),
            format!("{:-<5}{code}", "DEC"),
        ]
    }

    /// FITS header cards describing this transform (1-based `CRPIX`, degrees).
    pub fn fits_header(&self) -> Vec<(&'static str, String)> {
        let [ctype1, ctype2] = self.ctypes();
        vec![
            ("CTYPE1", ctype1),
            ("CTYPE2", ctype2),
            ("CRPIX1", (self.crpix.x + 1.0).to_string()),
            ("CRPIX2", (self.crpix.y + 1.0).to_string()),
            ("CRVAL1", self.crval.ra_deg().to_string()),
            ("CRVAL2", self.crval.dec_deg().to_string()),
            ("RADESYS", "ICRS".to_string()),
            ("EQUINOX", "2000".to_string()),
            ("CD1_1", (self.cd[(0, 0)] / RADEG).to_string()),
            ("CD1_2", (self.cd[(0, 1)] / RADEG).to_string()),
            ("CD2_1", (self.cd[(1, 0)] / RADEG).to_string()),
            ("CD2_2", (self.cd[(1, 1)] / RADEG).to_string()),
        ]
    }
}

#[cfg(test)]
mod wcs_test {
    use super::*;
    use crate::constants::RADSEC;
    use approx::assert_abs_diff_eq;

    fn factory(code: &str) -> WcsFactory {
        WcsFactory::new(0.2 * RADSEC, code).unwrap()
    }

    #[test]
    fn test_reference_pixel_maps_to_crval() {
        let crval = SkyPoint::from_degrees(150.0, 2.2);
        let wcs = factory("TAN").make_wcs(PixelPos::new(100.0, 200.0), crval);
        let pix = wcs.sky_to_pixel(&crval).unwrap();
        assert_abs_diff_eq!(pix.x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pix.y, 200.0, epsilon = 1e-9);
        assert_eq!(wcs.pixel_to_sky(&PixelPos::new(100.0, 200.0)), Some(crval));
    }

    #[test]
    fn test_axis_orientation() {
        let crval = SkyPoint::from_degrees(10.0, 0.0);
        let wcs = factory("STG").make_wcs(PixelPos::new(0.0, 0.0), crval);
        let east = wcs.sky_to_pixel(&SkyPoint::from_degrees(10.001, 0.0)).unwrap();
        let north = wcs.sky_to_pixel(&SkyPoint::from_degrees(10.0, 0.001)).unwrap();
        // 0.001° = 3.6" = 18 pixels at 0.2"/pixel
        assert_abs_diff_eq!(east.x, -18.0, epsilon = 1e-4);
        assert_abs_diff_eq!(east.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(north.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(north.y, 18.0, epsilon = 1e-4);
    }

    #[test]
    fn test_pixel_sky_roundtrip() {
        for code in ["TAN", "STG", "SIN", "ARC", "ZEA"] {
            let crval = SkyPoint::from_degrees(359.9, -45.0);
            let wcs = factory(code).make_wcs(PixelPos::new(5000.0, 5000.0), crval);
            for (x, y) in [(0.0, 0.0), (10000.0, 0.0), (2500.5, 9000.25)] {
                let sky = wcs.pixel_to_sky(&PixelPos::new(x, y)).unwrap();
                let back = wcs.sky_to_pixel(&sky).unwrap();
                assert_abs_diff_eq!(back.x, x, epsilon = 1e-6);
                assert_abs_diff_eq!(back.y, y, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_pole_centered_projection() {
        let crval = SkyPoint::from_degrees(0.0, 90.0);
        let wcs = factory("STG").make_wcs(PixelPos::new(0.0, 0.0), crval);
        for ra in [0.0, 90.0, 200.0, 359.0] {
            let sky = SkyPoint::from_degrees(ra, 89.0);
            let pix = wcs.sky_to_pixel(&sky).unwrap();
            let radius_arcsec = pix.x.hypot(pix.y) * 0.2;
            assert_abs_diff_eq!(radius_arcsec, 3600.0, epsilon = 0.5);
            let back = wcs.pixel_to_sky(&pix).unwrap();
            assert_abs_diff_eq!(back.separation(&sky), 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_far_hemisphere_for_tan() {
        let wcs = factory("TAN").make_wcs(PixelPos::new(0.0, 0.0), SkyPoint::from_degrees(0.0, 0.0));
        assert!(wcs.sky_to_pixel(&SkyPoint::from_degrees(180.0, 0.0)).is_none());
        assert!(wcs.sky_to_pixel(&SkyPoint::from_degrees(95.0, 0.0)).is_none());
        assert!(wcs.sky_to_pixel(&SkyPoint::from_degrees(85.0, 0.0)).is_some());
    }

    #[test]
    fn test_fits_header() {
        let wcs = factory("TAN").make_wcs(PixelPos::new(9.0, 19.0), SkyPoint::from_degrees(1.5, -2.5));
        let header = wcs.fits_header();
        assert_eq!(header[0], ("CTYPE1", "RA---TAN".to_string()));
        assert_eq!(header[1], ("CTYPE2", "DEC--TAN".to_string()));
        assert_eq!(header[2], ("CRPIX1", "10".to_string()));
        assert_eq!(header[3], ("CRPIX2", "20".to_string()));
        assert_abs_diff_eq!(wcs.pixel_scale(), 0.2 * RADSEC, epsilon = 1e-18);
    }

    #[test]
    fn test_invalid_factory() {
        assert_eq!(
            WcsFactory::new(1e-6, "TA"),
            Err(SkyMapError::InvalidProjectionCode("TA".into()))
        );
        assert!(WcsFactory::new(0.0, "TAN").is_err());
    }
}
