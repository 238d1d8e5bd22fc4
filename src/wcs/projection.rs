//! Zenithal FITS projections.
//!
//! A zenithal projection maps the angular distance `ρ` of a point from the reference
//! position to a radius `R(ρ)` on the projection plane, keeping the position angle.
//! Radii are expressed in radians, so `R(ρ) ≈ ρ` close to the reference point for every
//! supported projection (Calabretta & Greisen 2002, §5.1).

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::Radian;
use crate::skymap_errors::SkyMapError;

/// FITS-standard projection supported by [`crate::wcs::TractWcs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Projection {
    /// Gnomonic (tangent plane)
    Tan,
    /// Stereographic
    Stg,
    /// Orthographic (slant)
    Sin,
    /// Zenithal equidistant
    Arc,
    /// Zenithal equal-area
    Zea,
}

impl Projection {
    /// Parse a 3-letter FITS projection code such as `"TAN"` or `"STG"`.
    ///
    /// Return
    /// ----------
    /// * [`SkyMapError::InvalidProjectionCode`] if the code is not exactly 3 characters.
    /// * [`SkyMapError::UnsupportedProjection`] for a well-formed code that is not handled.
    pub fn from_code(code: &str) -> Result<Self, SkyMapError> {
        if code.chars().count() != 3 {
            return Err(SkyMapError::InvalidProjectionCode(code.to_string()));
        }
        match code.to_ascii_uppercase().as_str() {
            "TAN" => Ok(Projection::Tan),
            "STG" => Ok(Projection::Stg),
            "SIN" => Ok(Projection::Sin),
            "ARC" => Ok(Projection::Arc),
            "ZEA" => Ok(Projection::Zea),
            _ => Err(SkyMapError::UnsupportedProjection(code.to_string())),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Projection::Tan => "TAN",
            Projection::Stg => "STG",
            Projection::Sin => "SIN",
            Projection::Arc => "ARC",
            Projection::Zea => "ZEA",
        }
    }

    /// Projection-plane radius for a point at angular distance `rho` from the reference.
    ///
    /// Returns `None` outside the projection's domain (e.g. the far hemisphere for `TAN`).
    pub(crate) fn radius(&self, rho: Radian) -> Option<f64> {
        match self {
            Projection::Tan if rho < FRAC_PI_2 => Some(rho.tan()),
            Projection::Stg if rho < PI => Some(2.0 * (0.5 * rho).tan()),
            Projection::Sin if rho <= FRAC_PI_2 => Some(rho.sin()),
            Projection::Arc => Some(rho),
            Projection::Zea => Some(2.0 * (0.5 * rho).sin()),
            _ => None,
        }
    }

    /// Angular distance from the reference for a projection-plane radius `r >= 0`.
    pub(crate) fn inverse_radius(&self, r: f64) -> Option<Radian> {
        match self {
            Projection::Tan => Some(r.atan()),
            Projection::Stg => Some(2.0 * (0.5 * r).atan()),
            Projection::Sin if r <= 1.0 => Some(r.asin()),
            Projection::Arc if r <= PI => Some(r),
            Projection::Zea if r <= 2.0 => Some(2.0 * (0.5 * r).asin()),
            _ => None,
        }
    }
}

impl FromStr for Projection {
    type Err = SkyMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Projection::from_code(s)
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
