//! Benchmarks for galaxy generation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use galaxy::generator::{generate_with, RngSampler};
use galaxy::GalaxyParams;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for count in [1_000u32, 10_000, 100_000, 200_000] {
        let params = GalaxyParams {
            count,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(count), &params, |b, params| {
            let mut sampler = RngSampler::new(StdRng::seed_from_u64(0));
            b.iter(|| black_box(generate_with(params, &mut sampler)))
        });
    }

    group.finish();
}

fn bench_randomness_power(c: &mut Criterion) {
    let mut group = c.benchmark_group("randomness_power");

    for power in [0.0f32, 2.0, 5.0] {
        let params = GalaxyParams {
            count: 50_000,
            randomness_power: power,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(power), &params, |b, params| {
            let mut sampler = RngSampler::new(StdRng::seed_from_u64(0));
            b.iter(|| black_box(generate_with(params, &mut sampler)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate, bench_randomness_power);
criterion_main!(benches);
