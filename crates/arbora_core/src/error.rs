//! # Memory Error Types
//!
//! All errors that can occur in the memory layer.

use thiserror::Error;

/// Errors reported by pools and raw allocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// The system refused a reservation.
    ///
    /// This is the one recoverable failure of the layer: callers may retry
    /// with a smaller demand, degrade, or escalate.
    #[error("out of memory: failed to reserve {bytes} bytes")]
    OutOfMemory {
        /// Size of the refused reservation.
        bytes: usize,
    },

    /// A typed view was requested over a chunk that cannot hold the type.
    #[error("chunk of {chunk_size} bytes cannot be viewed as a value of size {type_size}, align {type_align}")]
    ChunkLayoutMismatch {
        /// Chunk size of the pool.
        chunk_size: usize,
        /// Size of the requested type.
        type_size: usize,
        /// Alignment of the requested type.
        type_align: usize,
    },
}

/// Errors produced while building or loading a pool configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `chunk_size` was zero.
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    /// `chunks_per_block` (or `nodes_per_block`) was zero.
    #[error("chunks per block must be greater than zero")]
    ZeroChunksPerBlock,

    /// The TOML source could not be parsed.
    #[error("invalid pool configuration: {0}")]
    Parse(String),
}

/// Result type for memory operations.
pub type MemoryResult<T> = Result<T, MemoryError>;
