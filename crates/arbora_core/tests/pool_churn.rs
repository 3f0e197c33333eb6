//! # Pool Churn Tests
//!
//! Random alloc/free sequences against both pools, checking:
//! 1. Live chunks never overlap (each keeps its own stamp)
//! 2. Recycled chunks come back zero-filled
//! 3. Counters and reserved size track block growth exactly
//!
//! Run with: cargo test -p arbora_core --test pool_churn

use arbora_core::{Chunk, NodePoolConfig, Pool, PoolAllocator, PoolConfig, PoolHandle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[test]
fn random_churn_keeps_chunks_disjoint() {
    let config = PoolConfig::new(24, 8).unwrap();
    let mut pool = Pool::from_config(config);
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut live: Vec<(Chunk, u8)> = Vec::new();

    for step in 0..5_000u32 {
        if live.is_empty() || rng.gen_bool(0.55) {
            let chunk = pool.alloc().unwrap();
            assert!(pool.chunk(chunk).iter().all(|&b| b == 0), "chunk not zeroed");

            let stamp = (step % 251) as u8 + 1;
            pool.chunk_mut(chunk).fill(stamp);
            live.push((chunk, stamp));
        } else {
            let victim = rng.gen_range(0..live.len());
            let (chunk, stamp) = live.swap_remove(victim);
            assert!(pool.chunk(chunk).iter().all(|&b| b == stamp), "chunk overwritten");
            pool.free(chunk);
        }

        assert_eq!(pool.allocated_count(), live.len());
        let capacity = pool.block_count() * pool.chunks_per_block();
        assert!(pool.allocated_count() + pool.free_count() <= capacity);
    }

    for (chunk, stamp) in &live {
        assert!(pool.chunk(*chunk).iter().all(|b| b == stamp));
    }
    assert_eq!(pool.size(), pool.block_count() * 24 * 8);
}

#[test]
fn free_list_is_drained_before_new_blocks() {
    let mut pool = Pool::new(16, 4);
    let chunks: Vec<Chunk> = (0..8).map(|_| pool.alloc().unwrap()).collect();
    assert_eq!(pool.block_count(), 2);

    for &chunk in &chunks {
        pool.free(chunk);
    }
    for _ in 0..8 {
        pool.alloc().unwrap();
    }
    assert_eq!(pool.block_count(), 2);

    pool.alloc().unwrap();
    assert_eq!(pool.block_count(), 3);
}

#[test]
fn node_pool_churn_matches_model() {
    let mut pool = PoolAllocator::with_config(NodePoolConfig::new(16).unwrap());
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let mut live: Vec<(PoolHandle, u64)> = Vec::new();

    for step in 0..3_000u64 {
        if live.is_empty() || rng.gen_bool(0.6) {
            let handle = pool.allocate(step).unwrap();
            live.push((handle, step));
        } else {
            let victim = rng.gen_range(0..live.len());
            let (handle, value) = live.swap_remove(victim);
            assert_eq!(pool.free(handle), Some(value));
            assert_eq!(pool.get(handle), None);
        }
    }

    assert_eq!(pool.allocated_count(), live.len());
    for (handle, value) in &live {
        assert_eq!(pool.get(*handle), Some(value));
    }
    assert_eq!(pool.iter().count(), live.len());
}
