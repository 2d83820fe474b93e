//! # Pool Performance Benchmark
//!
//! REQUIREMENTS:
//! - Fast-path allocation is a bounds check and a bump
//! - Reset cost does not depend on how much was allocated
//!
//! Run with: `cargo bench --package quarry_core`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quarry_core::{Pool, DEFAULT_BLOCK_SIZE};

/// Allocations per round.
const ROUND: usize = 10_000;

/// Benchmark: allocation rounds of several sizes, reset between rounds.
fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate_round");

    for size in [8usize, 64, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut pool = Pool::create(0).unwrap();
            b.iter(|| {
                for _ in 0..ROUND {
                    black_box(pool.allocate(size).unwrap());
                }
                pool.reset();
            });
        });
    }

    group.finish();
}

/// Benchmark: a fresh pool growing its chain from one block.
fn bench_growth(c: &mut Criterion) {
    c.bench_function("grow_to_16_blocks", |b| {
        b.iter(|| {
            let mut pool = Pool::create(0).unwrap();
            for _ in 0..16 {
                black_box(pool.allocate(DEFAULT_BLOCK_SIZE).unwrap());
            }
            pool.destroy();
        });
    });
}

/// Benchmark: zeroed allocation and string duplication.
fn bench_helpers(c: &mut Criterion) {
    let mut pool = Pool::create(0).unwrap();
    c.bench_function("allocate_zeroed_50_f64", |b| {
        b.iter(|| {
            black_box(pool.allocate_zeroed(50, 8).unwrap());
            pool.reset();
        });
    });

    let mut pool = Pool::create(0).unwrap();
    c.bench_function("duplicate_string", |b| {
        b.iter(|| {
            black_box(pool.duplicate_string(black_box("Hello, World!")).unwrap());
            pool.reset();
        });
    });
}

/// Benchmark: reset of a pool holding many blocks.
fn bench_reset(c: &mut Criterion) {
    let mut pool = Pool::create(0).unwrap();
    for _ in 0..64 {
        pool.allocate(DEFAULT_BLOCK_SIZE).unwrap();
    }

    c.bench_function("reset_64_blocks", |b| {
        b.iter(|| {
            pool.reset();
            black_box(pool.stats());
        });
    });
}

criterion_group!(benches, bench_allocate, bench_growth, bench_helpers, bench_reset);
criterion_main!(benches);
