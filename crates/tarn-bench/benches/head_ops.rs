//! Criterion micro-benchmarks for well-field head evaluation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tarn_bench::head_profile;
use tarn_core::ParallelConfig;
use tarn_wells::head_at_with;

/// Benchmark: 20 wells over a 200×200 raster, serial vs parallel.
fn bench_head_raster(c: &mut Criterion) {
    let (field, xs, ys) = head_profile(42, 20, 200);
    let mut group = c.benchmark_group("head_raster_40k");
    for (label, parallel) in [
        ("serial", ParallelConfig::serial()),
        ("parallel", ParallelConfig::always()),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(label), &parallel, |b, p| {
            b.iter(|| {
                let h = head_at_with(field.wells(), field.transmissivity(), &xs, &ys, p).unwrap();
                black_box(h);
            });
        });
    }
    group.finish();
}

/// Benchmark: single-point evaluation against a large field.
fn bench_head_point_500_wells(c: &mut Criterion) {
    let (field, _, _) = head_profile(7, 500, 1);

    c.bench_function("head_point_500_wells", |b| {
        b.iter(|| black_box(field.head_at_point(black_box(12.5), black_box(-80.0))));
    });
}

criterion_group!(benches, bench_head_raster, bench_head_point_500_wells);
criterion_main!(benches);
