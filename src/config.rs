//! # Sky map configuration
//!
//! [`SkyMapConfig`] gathers every parameter a ring tessellation is built from:
//!
//! - the **patch grid** laid over each tract (`num_patches`, `patch_border`),
//! - the **tract geometry** (`tract_overlap`, `pixel_scale`, `projection`),
//! - the **ring layout** (`num_rings`, `ra_start`).
//!
//! A configuration is immutable once a tessellation has been built from it. It can be
//! produced either through [`SkyMapConfig::builder`], which validates on
//! [`build`](SkyMapConfigBuilder::build), or through serde deserialization followed by
//! [`SkyMapConfig::validate`] (done again by [`crate::rings::RingsSkyMap::new`]).
//!
//! ## Example
//!
//! ```rust
//! use skytract::config::SkyMapConfig;
//!
//! let config = SkyMapConfig::builder()
//!     .num_rings(120)
//!     .projection("TAN")
//!     .tract_overlap(1.0 / 60.0)
//!     .pixel_scale(0.168)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.num_rings, 120);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{ArcSec, Degree},
    skymap_errors::SkyMapError,
    wcs::Projection,
};

/// Configuration of a [`crate::rings::RingsSkyMap`].
///
/// Validation rules
/// -----------------
/// * `projection` is a supported 3-letter FITS code.
/// * both `num_patches` entries are `>= 1`.
/// * `tract_overlap >= 0` and `pixel_scale > 0`, both finite.
/// * `num_rings > 0`.
/// * `0 <= ra_start < 360`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyMapConfig {
    /// Number of patches in a tract along x and y.
    pub num_patches: [u32; 2],
    /// Border between the inner and outer box of a patch, in pixels.
    pub patch_border: u32,
    /// Minimum overlap between adjacent tracts, on the sky (degrees).
    pub tract_overlap: Degree,
    /// Nominal pixel scale (arcseconds per pixel).
    pub pixel_scale: ArcSec,
    /// FITS projection code, e.g. `"STG"` or `"TAN"`.
    pub projection: String,
    /// Number of declination rings between the two polar caps.
    pub num_rings: u32,
    /// Right ascension of the first tract center of each ring (degrees).
    pub ra_start: Degree,
}

impl Default for SkyMapConfig {
    fn default() -> Self {
        SkyMapConfig {
            num_patches: [9, 9],
            patch_border: 100,
            tract_overlap: 1.0,
            pixel_scale: 0.333,
            projection: "STG".to_string(),
            num_rings: 120,
            ra_start: 0.0,
        }
    }
}

impl SkyMapConfig {
    /// Create a new [`SkyMapConfigBuilder`] starting from the default values.
    pub fn builder() -> SkyMapConfigBuilder {
        SkyMapConfigBuilder::new()
    }

    /// Check every validation rule, returning the first violation.
    pub fn validate(&self) -> Result<(), SkyMapError> {
        Projection::from_code(&self.projection)?;

        if self.num_patches.contains(&0) {
            return Err(SkyMapError::InvalidConfig(format!(
                "num_patches = {:?} must contain 2 positive ints",
                self.num_patches
            )));
        }
        if !(self.tract_overlap.is_finite() && self.tract_overlap >= 0.0) {
            return Err(SkyMapError::InvalidConfig(format!(
                "tract_overlap = {} must be >= 0",
                self.tract_overlap
            )));
        }
        if !(self.pixel_scale.is_finite() && self.pixel_scale > 0.0) {
            return Err(SkyMapError::InvalidConfig(format!(
                "pixel_scale = {} must be > 0",
                self.pixel_scale
            )));
        }
        if self.num_rings == 0 {
            return Err(SkyMapError::InvalidConfig(
                "num_rings must be > 0".into(),
            ));
        }
        if !(0.0..360.0).contains(&self.ra_start) {
            return Err(SkyMapError::InvalidConfig(format!(
                "ra_start = {} must be in [0, 360)",
                self.ra_start
            )));
        }
        Ok(())
    }
}

/// Builder for [`SkyMapConfig`], with validation.
#[derive(Debug, Clone, Default)]
pub struct SkyMapConfigBuilder {
    config: SkyMapConfig,
}

impl SkyMapConfigBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            config: SkyMapConfig::default(),
        }
    }

    pub fn num_patches(mut self, nx: u32, ny: u32) -> Self {
        self.config.num_patches = [nx, ny];
        self
    }

    pub fn patch_border(mut self, v: u32) -> Self {
        self.config.patch_border = v;
        self
    }

    pub fn tract_overlap(mut self, v: Degree) -> Self {
        self.config.tract_overlap = v;
        self
    }

    pub fn pixel_scale(mut self, v: ArcSec) -> Self {
        self.config.pixel_scale = v;
        self
    }

    pub fn projection(mut self, code: impl Into<String>) -> Self {
        self.config.projection = code.into();
        self
    }

    pub fn num_rings(mut self, v: u32) -> Self {
        self.config.num_rings = v;
        self
    }

    pub fn ra_start(mut self, v: Degree) -> Self {
        self.config.ra_start = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Return
    /// ----------
    /// * `Ok(SkyMapConfig)` if every rule listed on [`SkyMapConfig`] holds.
    /// * `Err(SkyMapError)` describing the first violated rule otherwise.
    pub fn build(self) -> Result<SkyMapConfig, SkyMapError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl fmt::Display for SkyMapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 36;
            writeln!(f, "Sky Map Configuration")?;
            writeln!(f, "---------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.len() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.len())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            line!("num_patches   = {:?}", self.num_patches, "Patches per tract (x, y)")?;
            line!("patch_border  = {} px", self.patch_border, "Patch inner/outer border")?;
            line!("tract_overlap = {:.6}°", self.tract_overlap, "Minimum tract overlap")?;
            line!("pixel_scale   = {:.4}\"", self.pixel_scale, "Nominal pixel scale")?;
            line!("projection    = {}", self.projection, "FITS projection code")?;
            line!("num_rings     = {}", self.num_rings, "Declination rings")?;
            line!("ra_start      = {:.6}°", self.ra_start, "First tract RA per ring")?;
            Ok(())
        } else {
            write!(
                f,
                "SkyMapConfig(num_patches={:?}, patch_border={}, tract_overlap={}°, pixel_scale={}\", projection={}, num_rings={}, ra_start={}°)",
                self.num_patches,
                self.patch_border,
                self.tract_overlap,
                self.pixel_scale,
                self.projection,
                self.num_rings,
                self.ra_start
            )
        }
    }
}
