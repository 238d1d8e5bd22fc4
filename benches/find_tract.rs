use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skytract::{
    config::SkyMapConfig,
    geom::SkyPoint,
    rings::{IndexingVersion, RingsSkyMap},
    skymap::SkyMap,
};

/// Uniformly distributed points on the sphere.
fn random_points(rng: &mut StdRng, n: usize) -> Vec<SkyPoint> {
    (0..n)
        .map(|_| {
            let ra = rng.random::<f64>() * std::f64::consts::TAU;
            let dec = (2.0 * rng.random::<f64>() - 1.0).asin();
            SkyPoint::new(ra, dec)
        })
        .collect()
}

fn hsc_map() -> RingsSkyMap {
    let config = SkyMapConfig::builder()
        .num_rings(120)
        .projection("TAN")
        .tract_overlap(1.0 / 60.0)
        .pixel_scale(0.168)
        .build()
        .unwrap();
    RingsSkyMap::new(config, IndexingVersion::V1).unwrap()
}

fn bench_find_tract(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
    let points = random_points(&mut rng, 1_000);
    let map = hsc_map();

    // Warm the cache so the timed section measures lookups only
    for p in &points {
        map.find_all_tracts(p).unwrap();
    }

    c.bench_function("rings/find_tract", |b| {
        b.iter(|| {
            for p in &points {
                black_box(map.find_tract(black_box(p)).unwrap());
            }
        })
    });

    c.bench_function("rings/find_all_tracts", |b| {
        b.iter(|| {
            for p in &points {
                black_box(map.find_all_tracts(black_box(p)).unwrap());
            }
        })
    });
}

fn bench_tract_generation(c: &mut Criterion) {
    c.bench_function("rings/generate_100_tracts_cold", |b| {
        b.iter(|| {
            let map = hsc_map();
            for index in (0..map.num_tracts()).step_by(map.num_tracts() / 100) {
                black_box(map.tract(index).unwrap());
            }
        })
    });
}

criterion_group!(benches, bench_find_tract, bench_tract_generation);
criterion_main!(benches);
