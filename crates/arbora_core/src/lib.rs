//! # ARBORA Core
//!
//! Memory layer beneath the ARBORA ordered containers:
//! - [`Pool`]: blocks of fixed-size byte chunks with free-list reuse
//! - [`PoolAllocator`]: typed slot pool used for tree nodes
//! - [`calloc`]: zero-filled single allocation outside any pool
//!
//! ## Architecture Rules
//!
//! 1. **Allocation failure is a value** - reservations return [`MemoryError`]
//! 2. **Handles, not pointers** - chunks and slots are addressed by index
//! 3. **Single-threaded** - callers serialize access externally
//!
//! ## Example
//!
//! ```rust
//! use arbora_core::{Pool, PoolConfig};
//!
//! let config = PoolConfig::from_toml_str("chunk_size = 16\nchunks_per_block = 4")?;
//! let mut pool = Pool::from_config(config);
//! let chunk = pool.alloc()?;
//! assert_eq!(pool.size(), 64);
//! pool.free(chunk);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod memory;

pub use config::{NodePoolConfig, PoolConfig};
pub use error::{ConfigError, MemoryError, MemoryResult};
pub use memory::{calloc, Chunk, Pool, PoolAllocator, PoolHandle};
