mod common;

use std::hint::black_box;

use asteroid_spawner::prelude::{draw, exponential, PopulationRecord};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn draw_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling/draw");

    for &n in &[1usize, 8, 64, 256, 1024] {
        let registry = common::registry(n, n as f64, 1.0);
        group.throughput(common::elements_throughput(n));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
            b.iter(|| {
                let pick = draw(&registry, &mut rng);
                black_box(pick.map(|p| p.name().len()).ok());
            });
        });
    }

    {
        let registry =
            common::registry(256, 256.0, 0.0).with_population(PopulationRecord::new("bad", -1.0));
        group.bench_function("rejected/256", |b| {
            let mut rng = StdRng::seed_from_u64(0xFEED);
            b.iter(|| {
                black_box(draw(&registry, &mut rng).is_err());
            });
        });
    }

    group.finish();
}

fn exponential_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling/exponential");

    for &rate in &[0.001f64, 1.0, 1000.0] {
        group.bench_with_input(BenchmarkId::from_parameter(rate), &rate, |b, &rate| {
            let mut rng = StdRng::seed_from_u64(0xC0FFEE);
            b.iter(|| {
                black_box(exponential(rate, &mut rng));
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = draw_benches, exponential_benches
}
criterion_main!(benches);
