//! # Geometry primitives
//!
//! - [`sky_point`]: equatorial positions on the unit sphere.
//! - [`bbox`]: integer and floating pixel boxes.

pub mod bbox;
pub mod sky_point;

pub use bbox::{pixel_index, Box2D, Box2I, PixelIndex, PixelPos};
pub use sky_point::SkyPoint;
