//! # Container Error Types
//!
//! All errors that can occur in the ordered containers.

use arbora_core::MemoryError;
use thiserror::Error;

use crate::tree::NodeId;

/// Errors reported by [`Set`](crate::Set) and [`Map`](crate::Map).
///
/// Only [`TreeError::Memory`] is produced by mutating operations; the
/// remaining variants are reported by `validate` when a red-black or
/// ordering invariant does not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Node storage could not grow.
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// The root is colored red.
    #[error("root node is red")]
    RedRoot,

    /// A red node has a red child.
    #[error("red node has red child {node:?}")]
    RedViolation {
        /// The offending child.
        node: NodeId,
    },

    /// Two root-to-sentinel paths pass through different numbers of black nodes.
    #[error("black height differs below {node:?}")]
    BlackHeightMismatch {
        /// Node whose sentinel path has the deviating black count.
        node: NodeId,
    },

    /// A child does not point back at its parent.
    #[error("node {node:?} has a broken parent link")]
    BrokenParentLink {
        /// The node with the wrong parent link.
        node: NodeId,
    },

    /// In-order traversal is not strictly increasing.
    #[error("node {node:?} is out of order")]
    OrderViolation {
        /// First node not greater than its predecessor.
        node: NodeId,
    },
}

/// Result type for container operations.
pub type TreeResult<T> = Result<T, TreeError>;
