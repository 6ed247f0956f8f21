//! Benchmarks for LRU cache operations.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lru_store::LruCache;

const OPS: u64 = 10_000;

/// Deterministic key stream with a hot set, so both hits and misses occur.
fn key_stream(len: u64, key_space: u64) -> Vec<u64> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state % key_space
        })
        .collect()
}

/// Inserts into a full cache, each one evicting the tail
fn bench_insert_evict(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_evict");
    group.throughput(Throughput::Elements(OPS));

    for capacity in [16usize, 1_024, 65_536] {
        group.bench_with_input(BenchmarkId::new("capacity", capacity), &capacity, |b, &cap| {
            let mut cache = LruCache::new(cap).expect("capacity must be positive");
            let mut next = 0u64;
            b.iter(|| {
                for _ in 0..OPS {
                    cache.insert(black_box(next), next);
                    next += 1;
                }
            });
        });
    }

    group.finish();
}

/// Reads that always hit and move the entry to the head
fn bench_get_hit(c: &mut Criterion) {
    let capacity = 1_024usize;
    let mut cache = LruCache::new(capacity).expect("capacity must be positive");
    for k in 0..capacity as u64 {
        cache.insert(k, k);
    }
    let keys = key_stream(OPS, capacity as u64);

    let mut group = c.benchmark_group("get_hit");
    group.throughput(Throughput::Elements(OPS));
    group.bench_function("capacity_1024", |b| {
        b.iter(|| {
            for k in &keys {
                black_box(cache.get(k));
            }
        })
    });
    group.finish();
}

/// Memoization workload: compute-insert over a key space larger than capacity
fn bench_get_or_insert_with(c: &mut Criterion) {
    let keys = key_stream(OPS, 4_096);

    let mut group = c.benchmark_group("get_or_insert_with");
    group.throughput(Throughput::Elements(OPS));

    for capacity in [256usize, 2_048] {
        group.bench_with_input(BenchmarkId::new("capacity", capacity), &capacity, |b, &cap| {
            let mut cache = LruCache::new(cap).expect("capacity must be positive");
            b.iter(|| {
                for &k in &keys {
                    black_box(cache.get_or_insert_with(k, || k.wrapping_mul(31)));
                }
            });
        });
    }

    group.finish();
}

/// Shrinking a full cache down to a tenth of its size
fn bench_resize_shrink(c: &mut Criterion) {
    let capacity = 10_000usize;

    c.bench_function("resize_shrink_10000_to_1000", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCache::new(capacity).expect("capacity must be positive");
                for k in 0..capacity as u64 {
                    cache.insert(k, k);
                }
                cache
            },
            |mut cache| {
                cache.resize(black_box(1_000)).expect("capacity must be positive");
                cache
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_insert_evict,
    bench_get_hit,
    bench_get_or_insert_with,
    bench_resize_shrink,
);

criterion_main!(benches);
