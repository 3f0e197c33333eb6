//! # Memory Management
//!
//! Pooled allocation for fixed-size objects.
//!
//! ## Design Philosophy
//!
//! Memory is reserved in blocks and recycled through free lists:
//! - One reservation serves many objects
//! - Freed objects are reused before anything new is reserved
//! - Reservation failure is reported, never aborted on

mod chunk;
mod pool;
mod raw;

pub use chunk::{Chunk, Pool};
pub use pool::{PoolAllocator, PoolHandle};
pub use raw::calloc;
