//! Print the tracts and patches covering a few sky positions.
//!
//! ```text
//! RUST_LOG=skytract=debug cargo run --example find_tracts
//! ```

use skytract::{
    config::SkyMapConfig,
    geom::SkyPoint,
    rings::{IndexingVersion, RingsSkyMap},
    skymap::SkyMap,
    skymap_errors::SkyMapError,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SkyMapError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = SkyMapConfig::builder()
        .num_rings(120)
        .projection("TAN")
        .tract_overlap(1.0 / 60.0)
        .pixel_scale(0.168)
        .build()?;
    println!("{config:#}");

    let map = RingsSkyMap::new(config, IndexingVersion::V1)?;
    info!(%map, "sky map ready");

    let targets = [
        ("COSMOS", SkyPoint::from_degrees(150.1, 2.2)),
        ("XMM-LSS", SkyPoint::from_degrees(35.7, -4.75)),
        ("North pole", SkyPoint::from_degrees(0.0, 90.0)),
    ];

    for (name, coord) in targets {
        let (tract, patch) = map.find_tract_and_patch(&coord)?;
        println!(
            "{name:<10} {coord}: tract {} patch {},{}",
            tract.id(),
            patch.index()[0],
            patch.index()[1]
        );
        for other in map.find_all_tracts(&coord)? {
            println!("{:>14} overlapping tract {}", "", other.id());
        }
    }

    let region = [
        SkyPoint::from_degrees(149.8, 1.9),
        SkyPoint::from_degrees(150.4, 1.9),
        SkyPoint::from_degrees(150.4, 2.5),
        SkyPoint::from_degrees(149.8, 2.5),
    ];
    for (tract, patches) in map.find_tract_patch_list(&region)? {
        let indices: Vec<String> = patches
            .iter()
            .map(|p| format!("{},{}", p.index()[0], p.index()[1]))
            .collect();
        println!("tract {}: patches {}", tract.id(), indices.join(" "));
    }
    Ok(())
}
