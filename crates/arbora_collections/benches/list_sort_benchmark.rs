//! # List Sort Benchmark
//!
//! Natural merge sort over a `next` array:
//! 1. Random order (full log n passes)
//! 2. Already sorted (single pass, early exit)
//!
//! Run with: cargo bench -p arbora_collections --bench list_sort_benchmark

#![allow(missing_docs)]

use arbora_collections::list;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn chained(count: usize) -> Vec<Option<usize>> {
    (0..count).map(|i| (i + 1 < count).then_some(i + 1)).collect()
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_sort");

    for count in [1_000usize, 10_000, 100_000] {
        let mut rng = ChaCha8Rng::seed_from_u64(count as u64);
        let random: Vec<u32> = (0..count).map(|_| rng.gen()).collect();
        let ascending: Vec<u32> = (0..count as u32).collect();
        group.throughput(Throughput::Elements(count as u64));

        for (label, keys) in [("random", &random), ("sorted", &ascending)] {
            group.bench_with_input(BenchmarkId::new(label, count), keys, |b, keys| {
                b.iter_batched(
                    || chained(count),
                    |mut next| {
                        let head = list::sort(next.as_mut_slice(), Some(0), |_, x, y| {
                            keys[x] <= keys[y]
                        });
                        black_box((head, next))
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_sort);
criterion_main!(benches);
