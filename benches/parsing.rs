//! Benchmarking SP3 header parsing & sequential data block walk
extern crate criterion;
use criterion::{criterion_group, criterion_main, Criterion};

use sp3_interp::prelude::{EphemerisReader, SatelliteId};

fn sp3_walk(path: &str, satellite: &SatelliteId) {
    let mut reader = EphemerisReader::from_file(path).unwrap();
    while reader.next_data_block(satellite).unwrap().is_some() {}
}

fn benchmark(c: &mut Criterion) {
    let mut parsing_grp = c.benchmark_group("parsing");

    parsing_grp.bench_function("header", |b| {
        b.iter(|| {
            let _ = EphemerisReader::from_file("test_resources/SP3/dense_orbit.sp3").unwrap();
        })
    });

    // first declared satellite
    let g01 = SatelliteId::new("G01");
    parsing_grp.bench_function("walk/G01", |b| {
        b.iter(|| {
            sp3_walk("test_resources/SP3/dense_orbit.sp3", &g01);
        })
    });

    // last declared satellite
    let g20 = SatelliteId::new("G20");
    parsing_grp.bench_function("walk/G20", |b| {
        b.iter(|| {
            sp3_walk("test_resources/SP3/dense_orbit.sp3", &g20);
        })
    });

    parsing_grp.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
