//! # Positions on the celestial sphere
//!
//! [`SkyPoint`] is an ICRS equatorial position stored as `(ra, dec)` in radians.
//! Right ascension is always normalised into `[0, 2π)`; declination is expected in
//! `[-π/2, π/2]`.
//!
//! Conversions to and from unit vectors go through [`nalgebra::Vector3`], which is also
//! what the projection code works with.
//!
//! ## Local frame
//!
//! Every point carries a local tangent frame `(east, north)`:
//!
//! ```text
//! east  = (-sin α,          cos α,         0)
//! north = (-sin δ · cos α, -sin δ · sin α, cos δ)
//! ```
//!
//! The frame stays well defined at the poles because the right ascension of the point
//! is kept, so a pole with `ra = 0` has `east = +y`.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{wrap_two_pi, Degree, Radian, RADEG};

/// An equatorial (ICRS) position on the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPoint {
    ra: Radian,
    dec: Radian,
}

impl SkyPoint {
    /// Build a point from right ascension and declination in radians.
    ///
    /// The right ascension is wrapped into `[0, 2π)`.
    pub fn new(ra: Radian, dec: Radian) -> Self {
        SkyPoint {
            ra: wrap_two_pi(ra),
            dec,
        }
    }

    /// Build a point from right ascension and declination in degrees.
    pub fn from_degrees(ra: Degree, dec: Degree) -> Self {
        SkyPoint::new(ra * RADEG, dec * RADEG)
    }

    /// Build a point from a cartesian vector (not required to be normalised).
    ///
    /// When the vector is on the polar axis the right ascension is set to 0.
    pub fn from_unit_vector(vec: &Vector3<f64>) -> Self {
        let v = vec.normalize();
        let ra = if v.x.abs() < f64::MIN_POSITIVE && v.y.abs() < f64::MIN_POSITIVE {
            0.0
        } else {
            v.y.atan2(v.x)
        };
        let dec = v.z.clamp(-1.0, 1.0).asin();
        SkyPoint::new(ra, dec)
    }

    pub fn ra(&self) -> Radian {
        self.ra
    }

    pub fn dec(&self) -> Radian {
        self.dec
    }

    pub fn ra_deg(&self) -> Degree {
        self.ra / RADEG
    }

    pub fn dec_deg(&self) -> Degree {
        self.dec / RADEG
    }

    /// Unit vector pointing at this position.
    pub fn to_unit_vector(&self) -> Vector3<f64> {
        let cos_dec = self.dec.cos();
        Vector3::new(
            cos_dec * self.ra.cos(),
            cos_dec * self.ra.sin(),
            self.dec.sin(),
        )
    }

    /// Local `(east, north)` unit vectors of the tangent plane at this point.
    pub fn local_frame(&self) -> (Vector3<f64>, Vector3<f64>) {
        let (sin_ra, cos_ra) = self.ra.sin_cos();
        let (sin_dec, cos_dec) = self.dec.sin_cos();
        let east = Vector3::new(-sin_ra, cos_ra, 0.0);
        let north = Vector3::new(-sin_dec * cos_ra, -sin_dec * sin_ra, cos_dec);
        (east, north)
    }

    /// Great-circle distance to `other`, in radians.
    ///
    /// Uses `atan2(|a × b|, a · b)`, which stays accurate for both tiny and
    /// near-antipodal separations.
    pub fn separation(&self, other: &SkyPoint) -> Radian {
        let a = self.to_unit_vector();
        let b = other.to_unit_vector();
        a.cross(&b).norm().atan2(a.dot(&b))
    }

    /// Move along a great circle by `distance`, starting in direction `bearing`.
    ///
    /// The bearing is measured from east toward north.
    pub fn offset(&self, bearing: Radian, distance: Radian) -> SkyPoint {
        let (east, north) = self.local_frame();
        let direction = east * bearing.cos() + north * bearing.sin();
        let moved = self.to_unit_vector() * distance.cos() + direction * distance.sin();
        SkyPoint::from_unit_vector(&moved)
    }

    /// Return the same point with right ascension normalised into `[0, 2π)`.
    pub fn wrap(&self) -> SkyPoint {
        SkyPoint::new(self.ra, self.dec)
    }
}

impl fmt::Display for SkyPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}°, {:+.6}°)", self.ra_deg(), self.dec_deg())
    }
}
