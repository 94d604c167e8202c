//! Benchmarks for the bounded distance predicates
//!
//! The predicates run once per candidate pair, so their cost dominates
//! verification. These isolate them from indexing and pair merging.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use simsearch::{within_edit_distance, within_hamming_distance};
use std::time::Duration;

/// `len` chars from a fixed repeating pattern, with `edits` substitutions
/// spread evenly.
fn word_pair(len: usize, edits: usize) -> (String, String) {
    let a: Vec<u8> = (0..len).map(|i| b"acgt"[(i * 7 + i / 3) % 4]).collect();
    let mut b = a.clone();
    for e in 0..edits {
        let at = (e + 1) * len / (edits + 1);
        b[at] = if b[at] == b'a' { b'c' } else { b'a' };
    }
    (
        String::from_utf8(a).unwrap(),
        String::from_utf8(b).unwrap(),
    )
}

/// Benchmark 1: Banded edit distance by string length
///
/// Tests: cost stays linear in length for a fixed cutoff
fn bench_edit_distance_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_distance_length");
    group.measurement_time(Duration::from_secs(5));

    for &len in &[8, 32, 128, 512] {
        let (a, b) = word_pair(len, 2);
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |bench, _| {
            bench.iter(|| black_box(within_edit_distance(black_box(&a), black_box(&b), 2)))
        });
    }

    group.finish();
}

/// Benchmark 2: Banded edit distance by cutoff
///
/// Tests: band width grows as 2k + 1
fn bench_edit_distance_cutoff(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_distance_cutoff");
    let (a, b) = word_pair(64, 3);

    for &k in &[1, 2, 3, 6] {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |bench, &k| {
            bench.iter(|| black_box(within_edit_distance(black_box(&a), black_box(&b), k)))
        });
    }

    group.finish();
}

/// Benchmark 3: Early rejection
///
/// Tests: length-difference bound and Hamming short-circuit
fn bench_rejection(c: &mut Criterion) {
    let (a, _) = word_pair(64, 0);
    let short = a[..40].to_string();
    let (_, far) = word_pair(64, 20);

    c.bench_function("edit_distance_length_reject", |b| {
        b.iter(|| black_box(within_edit_distance(black_box(&a), black_box(&short), 2)))
    });
    c.bench_function("hamming_short_circuit", |b| {
        b.iter(|| black_box(within_hamming_distance(black_box(&a), black_box(&far), 2)))
    });
}

criterion_group!(
    benches,
    bench_edit_distance_length,
    bench_edit_distance_cutoff,
    bench_rejection
);
criterion_main!(benches);
