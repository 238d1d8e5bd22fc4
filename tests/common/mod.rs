#![allow(dead_code)]

use std::sync::LazyLock;

use approx::assert_abs_diff_eq;
use skytract::{
    config::SkyMapConfig,
    constants::TractId,
    geom::SkyPoint,
    rings::{IndexingVersion, RingsSkyMap},
    skymap::TractList,
};

/// Configuration of the Hyper Suprime-Cam survey sky map.
pub fn hsc_config() -> SkyMapConfig {
    SkyMapConfig::builder()
        .num_rings(120)
        .ra_start(0.0)
        .projection("TAN")
        .tract_overlap(1.0 / 60.0)
        .pixel_scale(0.168)
        .build()
        .unwrap()
}

pub static HSC_V0: LazyLock<RingsSkyMap> =
    LazyLock::new(|| RingsSkyMap::new(hsc_config(), IndexingVersion::V0).unwrap());

pub static HSC_V1: LazyLock<RingsSkyMap> =
    LazyLock::new(|| RingsSkyMap::new(hsc_config(), IndexingVersion::V1).unwrap());

/// Default configuration with `num_rings` rings.
pub fn rings_map(num_rings: u32, version: IndexingVersion) -> RingsSkyMap {
    let config = SkyMapConfig::builder().num_rings(num_rings).build().unwrap();
    RingsSkyMap::new(config, version).unwrap()
}

pub fn ids(tracts: &TractList) -> Vec<TractId> {
    tracts.iter().map(|t| t.id()).collect()
}

/// Regular (ra, dec) grid in degrees, poles excluded.
pub fn sky_grid(ra_step: f64, dec_step: f64) -> Vec<SkyPoint> {
    let n_ra = (360.0 / ra_step).round() as usize;
    let n_dec = (180.0 / dec_step).round() as usize;
    (1..n_dec)
        .flat_map(|j| {
            let dec = -90.0 + j as f64 * dec_step;
            (0..n_ra).map(move |i| SkyPoint::from_degrees(i as f64 * ra_step, dec))
        })
        .collect()
}

pub fn assert_sky_close(actual: &SkyPoint, ra: f64, dec: f64, epsilon: f64) {
    assert_abs_diff_eq!(actual.ra_deg(), ra, epsilon = epsilon);
    assert_abs_diff_eq!(actual.dec_deg(), dec, epsilon = epsilon);
}
