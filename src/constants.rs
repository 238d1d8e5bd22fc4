//! # Constants and type definitions for skytract
//!
//! This module centralizes the **angular conversion factors** and the **type aliases**
//! used throughout the crate.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians, arcseconds ↔ radians)
//! - Core type aliases for angles expressed in different units
//! - Identifiers used to address tracts and patches
//!
//! Angles are carried as plain `f64` values; the alias in a signature tells which unit
//! the value is expressed in.

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;

/// Stable, persisted tract identifier, dense in `[0, num_tracts)`.
pub type TractId = usize;

/// Patch index within a tract, as `(x, y)`.
pub type PatchIndex = [i64; 2];

/// Wrap an angle into `[0, 2π)`.
///
/// Values that round up to exactly `2π` after the euclidean remainder are folded
/// back to `0` so the result is always strictly below `2π`.
pub fn wrap_two_pi(angle: Radian) -> Radian {
    let wrapped = angle.rem_euclid(DPI);
    if wrapped >= DPI {
        0.0
    } else {
        wrapped
    }
}
