pub mod caching;
pub mod config;
pub mod constants;
pub mod geom;
pub mod packers;
pub mod patch_info;
pub mod rings;
pub mod skymap;
pub mod skymap_errors;
pub mod tract_info;
pub mod wcs;

#[cfg(test)]
pub(crate) mod unit_test_global {
    use std::sync::LazyLock;

    use crate::{
        config::SkyMapConfig,
        rings::{IndexingVersion, RingsSkyMap},
    };

    /// 120-ring map with the Hyper Suprime-Cam survey parameters.
    pub(crate) fn hsc_config() -> SkyMapConfig {
        SkyMapConfig::builder()
            .num_rings(120)
            .projection("TAN")
            .tract_overlap(1.0 / 60.0)
            .pixel_scale(0.168)
            .build()
            .unwrap()
    }

    pub(crate) static HSC_V0: LazyLock<RingsSkyMap> =
        LazyLock::new(|| RingsSkyMap::new(hsc_config(), IndexingVersion::V0).unwrap());

    pub(crate) static HSC_V1: LazyLock<RingsSkyMap> =
        LazyLock::new(|| RingsSkyMap::new(hsc_config(), IndexingVersion::V1).unwrap());
}
