use approx::assert_abs_diff_eq;
use skytract::{
    config::SkyMapConfig,
    constants::{TractId, RADEG},
    geom::SkyPoint,
    rings::{IndexingVersion, RingsSkyMap},
    skymap::SkyMap,
    skymap_errors::SkyMapError,
};

mod common;
use common::{ids, rings_map, sky_grid};

#[test]
fn test_three_ring_layout() {
    let map = rings_map(3, IndexingVersion::V1);
    assert_eq!(map.num_tracts(), 26);
    assert_eq!(map.ring_tract_counts(), &[8, 8, 8]);
    assert_abs_diff_eq!(map.ring_size(), 45.0 * RADEG, epsilon = 1e-15);
    assert_eq!(map.ring_indices(0), Ok((-1, 0)));
    assert_eq!(map.ring_indices(25), Ok((3, 0)));
    assert_eq!(map.ring_indices(9), Ok((1, 0)));
    assert_eq!(
        map.tract(26).unwrap_err(),
        SkyMapError::TractIndexOutOfRange {
            index: 26,
            num_tracts: 26
        }
    );
}

#[test]
fn test_poles() {
    for version in [IndexingVersion::V0, IndexingVersion::V1] {
        let map = rings_map(3, version);
        for ra in [0.0, 123.0, 321.0, 359.9] {
            let north = SkyPoint::from_degrees(ra, 90.0);
            let south = SkyPoint::from_degrees(ra, -90.0);
            assert_eq!(ids(&map.find_all_tracts(&north).unwrap()), vec![25]);
            assert_eq!(ids(&map.find_all_tracts(&south).unwrap()), vec![0]);
            assert_eq!(map.find_tract(&north).unwrap().id(), 25);
            assert_eq!(map.find_tract(&south).unwrap().id(), 0);
        }
    }
}

#[test]
fn test_iteration_order() {
    let map = rings_map(3, IndexingVersion::V1);
    let ids: Vec<TractId> = map.iter().map(|t| t.unwrap().id()).collect();
    assert_eq!(ids, (0..26).collect::<Vec<_>>());
}

#[test]
fn test_find_all_tracts_covers_sky() {
    let map = rings_map(3, IndexingVersion::V1);
    for coord in sky_grid(5.0, 5.0) {
        let found = map.find_all_tracts(&coord).unwrap();
        assert!(!found.is_empty(), "no tract contains {coord}");
        assert!(found.iter().all(|t| t.contains(&coord)));

        // The 3x3 neighbourhood search agrees with testing every tract
        let mut all: Vec<TractId> = map
            .iter()
            .map(|t| t.unwrap())
            .filter(|t| t.contains(&coord))
            .map(|t| t.id())
            .collect();
        let mut probed = ids(&found);
        all.sort_unstable();
        probed.sort_unstable();
        assert_eq!(probed, all, "at {coord}");
    }
}

#[test]
fn test_find_tract_well_inside() {
    let map = rings_map(3, IndexingVersion::V1);
    for tract in map.iter() {
        let tract = tract.unwrap();
        let center = tract.ctr_coord();
        let distance = 0.5 * tract.inner_radius();
        for i in 0..8 {
            let coord = center.offset(i as f64 * 45.0 * RADEG, distance);
            let found = map.find_tract(&coord).unwrap();
            assert_eq!(found.id(), tract.id(), "at {coord}");
            assert!(found.contains(&coord));
        }
    }
}

#[test]
fn test_tract_corners_are_found() {
    let map = rings_map(3, IndexingVersion::V1);
    for tract in map.iter() {
        let tract = tract.unwrap();
        for vertex in tract.vertex_list() {
            let found = ids(&map.find_all_tracts(vertex).unwrap());
            assert!(
                found.contains(&tract.id()),
                "vertex {vertex} of tract {} not found, got {found:?}",
                tract.id()
            );
        }
    }
}

#[test]
fn test_patch_tiling_of_every_tract() {
    let map = rings_map(3, IndexingVersion::V1);
    for tract in map.iter() {
        let tract = tract.unwrap();
        let bbox = tract.bbox();
        let patches: Vec<_> = tract.patches().collect();
        assert_eq!(patches.len(), 81);

        let area: i64 = patches.iter().map(|p| p.inner_bbox().area()).sum();
        assert_eq!(area, bbox.area());
        for patch in &patches {
            assert!(bbox.contains_box(&patch.outer_bbox()));
            assert!(patch.outer_bbox().contains_box(&patch.inner_bbox()));
        }
        for (i, a) in patches.iter().enumerate() {
            for b in &patches[i + 1..] {
                assert!(!a.inner_bbox().overlaps(&b.inner_bbox()));
            }
        }
    }
}

#[test]
fn test_find_tract_and_patch() {
    let map = rings_map(3, IndexingVersion::V1);
    let coord = SkyPoint::from_degrees(91.0, 1.0);
    let (tract, patch) = map.find_tract_and_patch(&coord).unwrap();
    assert_eq!(tract.id(), 11);
    assert_eq!(tract.find_patch(&coord).unwrap(), patch);
    assert!(tract.find_patch_list(&[coord]).contains(&patch));
}

#[test]
fn test_find_tract_patch_list_across_boundary() {
    let map = rings_map(3, IndexingVersion::V1);
    // Small region straddling the boundary between ring 1 tracts 10 and 11
    let coords = [
        SkyPoint::from_degrees(66.8, -0.2),
        SkyPoint::from_degrees(67.4, -0.2),
        SkyPoint::from_degrees(67.4, 0.2),
        SkyPoint::from_degrees(66.8, 0.2),
    ];
    let result = map.find_tract_patch_list(&coords).unwrap();
    let found: Vec<TractId> = result.iter().map(|(t, _)| t.id()).collect();
    assert_eq!(found, vec![10, 11]);
    for (tract, patches) in &result {
        assert!(!patches.is_empty());
        for coord in &coords {
            let home = tract.find_patch(coord).unwrap();
            assert!(patches.contains(&home));
        }
    }

    let closest = map.find_closest_tract_patch_list(&coords).unwrap();
    let found: Vec<TractId> = closest.iter().map(|(t, _)| t.id()).collect();
    assert_eq!(found, vec![10]);
}

#[test]
fn test_ra_start_shifts_centers() {
    let config = SkyMapConfig::builder()
        .num_rings(3)
        .ra_start(10.0)
        .build()
        .unwrap();
    let map = RingsSkyMap::new(config, IndexingVersion::V1).unwrap();
    let tract = map.tract(9).unwrap();
    assert_abs_diff_eq!(tract.ctr_coord().ra_deg(), 10.0, epsilon = 1e-9);
    let tract = map.tract(16).unwrap();
    assert_abs_diff_eq!(tract.ctr_coord().ra_deg(), 325.0, epsilon = 1e-9);
    assert_eq!(
        map.find_tract(&SkyPoint::from_degrees(5.0, 0.0)).unwrap().id(),
        9
    );
}

#[test]
fn test_default_map_total_coverage() {
    let map = RingsSkyMap::new(SkyMapConfig::default(), IndexingVersion::V1).unwrap();
    let poles = [SkyPoint::from_degrees(0.0, -90.0), SkyPoint::from_degrees(0.0, 90.0)];
    for coord in sky_grid(0.5, 0.5).iter().chain(&poles) {
        let tract = map.find_tract(coord).unwrap();
        assert!(tract.contains(coord), "tract {} misses {coord}", tract.id());
        assert!(!map.find_all_tracts(coord).unwrap().is_empty(), "no tract contains {coord}");
    }
}

#[test]
fn test_projection_failure_is_reported() {
    // A 50 deg overlap pushes every tract past the gnomonic horizon
    let config = SkyMapConfig::builder()
        .num_rings(1)
        .projection("TAN")
        .tract_overlap(50.0)
        .build()
        .unwrap();
    let map = RingsSkyMap::new(config, IndexingVersion::V1).unwrap();

    let err = map.tract(0).unwrap_err();
    assert!(matches!(err, SkyMapError::ProjectionFailed { tract_id: 0, .. }), "{err:?}");

    let err = map.find_all_tracts(&SkyPoint::from_degrees(10.0, 0.0)).unwrap_err();
    assert!(matches!(err, SkyMapError::ProjectionFailed { .. }), "{err:?}");

    // Failures are not cached
    assert!(map.tract(0).is_err());
}
