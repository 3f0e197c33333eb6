//! # Tree Benchmark
//!
//! Measures the ordered containers under the access patterns the layout
//! engine produces:
//! 1. Bulk insert of shuffled keys (pooled vs unpooled nodes)
//! 2. Point lookups on a populated set
//! 3. Cursor deletion while iterating
//! 4. O(n) size walk
//!
//! Run with: cargo bench -p arbora_collections --bench tree_benchmark

#![allow(missing_docs)]

use arbora_collections::{Map, Set};
use arbora_core::NodePoolConfig;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn shuffled_keys(count: usize) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..count as u64).collect();
    keys.shuffle(&mut ChaCha8Rng::seed_from_u64(0x5EED));
    keys
}

fn populated_set(keys: &[u64]) -> Set<u64> {
    let mut set = Set::with_pool(NodePoolConfig::default());
    for &key in keys {
        let _ = set.insert(key);
    }
    set
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_insert");

    for count in SIZES {
        let keys = shuffled_keys(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("pooled", count), &keys, |b, keys| {
            b.iter(|| black_box(populated_set(keys)));
        });

        group.bench_with_input(BenchmarkId::new("unpooled", count), &keys, |b, keys| {
            b.iter(|| {
                let mut set = Set::new();
                for &key in keys {
                    let _ = set.insert(key);
                }
                black_box(set)
            });
        });
    }

    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_find");

    for count in SIZES {
        let keys = shuffled_keys(count);
        let set = populated_set(&keys);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &keys, |b, keys| {
            b.iter(|| {
                let mut hits = 0usize;
                for key in keys {
                    if set.contains(black_box(key)) {
                        hits += 1;
                    }
                }
                black_box(hits)
            });
        });
    }

    group.finish();
}

fn bench_delete_while_iterating(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_delete_node_sweep");

    for count in SIZES {
        let keys = shuffled_keys(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &keys, |b, keys| {
            b.iter_batched(
                || populated_set(keys),
                |mut set| {
                    let mut cursor = set.first();
                    while let Some(node) = cursor {
                        if set.get(node).is_some_and(|key| key % 2 == 0) {
                            cursor = set.delete_node(node).1;
                        } else {
                            cursor = set.next(node);
                        }
                    }
                    black_box(set)
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_map_len(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_len_walk");

    for count in SIZES {
        let mut map = Map::new();
        for key in shuffled_keys(count) {
            let _ = map.insert(key, key.wrapping_mul(31));
        }

        group.bench_function(BenchmarkId::from_parameter(count), |b| {
            b.iter(|| black_box(map.len()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_find,
    bench_delete_while_iterating,
    bench_map_len,
);

criterion_main!(benches);
