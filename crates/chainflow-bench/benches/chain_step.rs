//! Criterion benchmarks for full runs on the worker pool.

use std::hint::black_box;

use chainflow_bench::{pab_profile, reference_profile, simulation, stress_profile};
use chainflow_engine::{RunConfig, SyncPolicy};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_run(c: &mut Criterion, name: &str, config: RunConfig) {
    let mut sim = simulation(config, 42).unwrap();

    // Warm up: one run so the pool is started and pages are touched
    sim.run().unwrap();

    c.bench_function(name, |b| {
        b.iter(|| {
            sim.reset();
            black_box(sim.run().unwrap());
        });
    });
}

fn bench_rkn_4k(c: &mut Criterion) {
    bench_run(c, "rkn_100_steps_4k", reference_profile());
}

fn bench_rkn_64k(c: &mut Criterion) {
    bench_run(c, "rkn_100_steps_64k", stress_profile());
}

fn bench_pab_4k(c: &mut Criterion) {
    bench_run(c, "pab4_100_steps_4k", pab_profile());
}

fn bench_block_len(c: &mut Criterion) {
    let mut group = c.benchmark_group("rkn_4k_block_len");
    for block_len in [64, 256, 1024, 4096] {
        let config = RunConfig {
            block_len,
            ..reference_profile()
        };
        let mut sim = simulation(config, 42).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(block_len), &block_len, |b, _| {
            b.iter(|| {
                sim.reset();
                black_box(sim.run().unwrap());
            });
        });
    }
    group.finish();
}

fn bench_sync_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("rkn_4k_sync");
    for (name, sync) in [("lazy", SyncPolicy::Lazy), ("barrier", SyncPolicy::Barrier)] {
        let config = RunConfig {
            sync,
            ..reference_profile()
        };
        let mut sim = simulation(config, 42).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| {
                sim.reset();
                black_box(sim.run().unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_rkn_4k,
    bench_rkn_64k,
    bench_pab_4k,
    bench_block_len,
    bench_sync_policy
);
criterion_main!(benches);
