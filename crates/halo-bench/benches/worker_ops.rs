//! Criterion micro-benchmarks for the in-place chunk update.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use halo_bench::seeded_domain;
use halo_core::{Boundary, BoundaryPair, RuleTable};
use halo_engine::step_chunk;
use halo_test_utils::reference_step;

/// Benchmark: one in-place generation over a 100K-cell chunk.
fn bench_step_chunk_100k(c: &mut Criterion) {
    let table = RuleTable::new(30).unwrap();
    let mut buf = seeded_domain(100_000, 42).into_vec();

    c.bench_function("step_chunk_100k", |b| {
        b.iter(|| {
            let edges = step_chunk(&table, &mut buf, BoundaryPair::new(0, 1));
            black_box(edges);
        });
    });
}

/// Benchmark: the double-buffered reference step on the same input, for
/// comparison with the in-place update.
fn bench_reference_step_100k(c: &mut Criterion) {
    let table = RuleTable::new(30).unwrap();
    let mut cells = seeded_domain(100_000, 42).into_vec();

    c.bench_function("reference_step_100k", |b| {
        b.iter(|| {
            cells = reference_step(&table, &cells, Boundary::Periodic);
            black_box(&cells);
        });
    });
}

/// Benchmark: building all 256 rule tables.
fn bench_rule_tables(c: &mut Criterion) {
    c.bench_function("rule_tables_256", |b| {
        b.iter(|| {
            for rule in 0..=255u32 {
                black_box(RuleTable::new(rule).unwrap());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_step_chunk_100k,
    bench_reference_step_100k,
    bench_rule_tables
);
criterion_main!(benches);
