//! # ARBORA Collections
//!
//! Ordered containers for the spatial layers of ARBORA:
//! - [`Set`]: deduplicating collections of leaves and identifiers
//! - [`Map`]: spatial keys associated with payload handles
//! - [`list`]: stable natural merge sort over linked sequences
//!
//! ## Architecture Rules
//!
//! 1. **One tree core** - `Set` and `Map` share the same red-black mechanics
//! 2. **Pooled nodes** - nodes live in an index-addressed pool, reserved in blocks
//! 3. **No cached size** - `len` walks the tree; `is_empty` is O(1)
//! 4. **Single-threaded** - mutation is never safe under concurrent access
//!
//! ## Example
//!
//! ```rust
//! use arbora_collections::Set;
//! use arbora_core::NodePoolConfig;
//!
//! let mut set = Set::with_pool(NodePoolConfig::new(256)?);
//! for leaf in [40, 10, 30, 20] {
//!     set.insert(leaf)?;
//! }
//!
//! // Delete while iterating: delete_node hands back a live cursor.
//! let mut cursor = set.first();
//! while let Some(node) = cursor {
//!     cursor = if set.get(node).is_some_and(|v| v % 20 == 0) {
//!         set.delete_node(node).1
//!     } else {
//!         set.next(node)
//!     };
//! }
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![10, 30]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod list;
pub mod map;
pub mod set;
pub mod tree;

pub use error::{TreeError, TreeResult};
pub use list::{DoublyLinks, Links};
pub use map::Map;
pub use set::Set;
pub use tree::{Compare, Identity, Natural, NodeId};
