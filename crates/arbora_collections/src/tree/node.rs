//! # Tree Nodes
//!
//! Nodes live in a [`PoolAllocator`](arbora_core::PoolAllocator) and link
//! to each other by index. [`NodeId::NIL`] is the shared sentinel: it is
//! always black, never stored, and stands for both "no child" and "no
//! parent".

use arbora_core::PoolHandle;

/// Handle to a node of a [`Set`](crate::Set) or [`Map`](crate::Map).
///
/// A handle stays valid until its node is physically removed. Deleting a
/// node with two children removes its in-order successor instead and moves
/// the successor's payload into it, so a handle held across a deletion
/// elsewhere in the tree can go stale even though its element survives.
/// Stale handles are generation-tagged: once the slot is reused by a later
/// insert they still resolve to `None`, never to the new element. Iterate
/// while deleting through `delete_node`, which returns a handle that is
/// always live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) PoolHandle);

impl NodeId {
    /// The sentinel.
    pub(crate) const NIL: Self = Self(PoolHandle::DANGLING);

    #[inline]
    pub(crate) fn is_nil(self) -> bool {
        self == Self::NIL
    }

    /// `None` for the sentinel.
    #[inline]
    pub(crate) fn live(self) -> Option<Self> {
        (!self.is_nil()).then_some(self)
    }
}

/// Node color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A payload with a key the tree orders by.
pub(crate) trait Entry {
    type Key: ?Sized;

    fn key(&self) -> &Self::Key;
}

/// A tree node: links, color and payload.
#[derive(Clone, Debug)]
pub(crate) struct Node<E> {
    pub(crate) parent: NodeId,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) color: Color,
    pub(crate) entry: E,
}

impl<E> Node<E> {
    /// A fresh red leaf.
    pub(crate) fn leaf(parent: NodeId, entry: E) -> Self {
        Self {
            parent,
            left: NodeId::NIL,
            right: NodeId::NIL,
            color: Color::Red,
            entry,
        }
    }
}
