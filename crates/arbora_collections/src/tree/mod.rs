//! # Ordered-Tree Core
//!
//! Red-black tree mechanics shared by [`Set`](crate::Set) and
//! [`Map`](crate::Map): insertion, deletion, traversal and invariant
//! checks over nodes stored in a pool and addressed by index.
//!
//! ## Invariants
//!
//! 1. The root is black
//! 2. A red node has no red child
//! 3. Every root-to-sentinel path passes through the same number of black nodes
//!
//! Mutations leave the tree transiently inconsistent between individual
//! link updates; callers needing shared access must serialize externally.

mod balance;
mod node;
mod order;
mod validate;

use std::cmp::Ordering;

use arbora_core::{MemoryResult, NodePoolConfig, PoolAllocator};

pub use node::NodeId;
pub use order::{Compare, Identity, Natural};

pub(crate) use node::Entry;
use node::{Color, Node};

/// Where a copied node hangs off its parent.
#[derive(Clone, Copy)]
enum Side {
    Root,
    Left,
    Right,
}

/// Red-black tree over pooled nodes.
pub(crate) struct RbTree<E, C> {
    /// Node storage.
    nodes: PoolAllocator<Node<E>>,
    /// Root node, or the sentinel when empty.
    root: NodeId,
    /// Key ordering.
    compare: C,
}

impl<E: Entry, C: Compare<E::Key>> RbTree<E, C> {
    /// Creates an empty tree. With a config, node storage grows a block at a
    /// time; without one, a node at a time.
    pub(crate) fn new(compare: C, config: Option<NodePoolConfig>) -> Self {
        Self {
            nodes: config.map_or_else(PoolAllocator::new, PoolAllocator::with_config),
            root: NodeId::NIL,
            compare,
        }
    }

    /// Inserts an entry. Returns `None` (and drops the entry) if its key is
    /// already present.
    pub(crate) fn insert(&mut self, entry: E) -> MemoryResult<Option<NodeId>> {
        let mut parent = NodeId::NIL;
        let mut side = Ordering::Equal;
        let mut current = self.root;

        while !current.is_nil() {
            side = self
                .compare
                .compare(entry.key(), self.node(current).entry.key());
            parent = current;
            current = match side {
                Ordering::Less => self.left(current),
                Ordering::Greater => self.right(current),
                Ordering::Equal => return Ok(None),
            };
        }

        let id = NodeId(self.nodes.allocate(Node::leaf(parent, entry))?);
        match side {
            _ if parent.is_nil() => self.root = id,
            Ordering::Less => self.node_mut(parent).left = id,
            _ => self.node_mut(parent).right = id,
        }

        self.insert_fixup(id);
        Ok(Some(id))
    }

    /// Node holding `key`.
    pub(crate) fn find_node(&self, key: &E::Key) -> Option<NodeId> {
        let mut current = self.root;
        while !current.is_nil() {
            current = match self.compare.compare(key, self.node(current).entry.key()) {
                Ordering::Less => self.left(current),
                Ordering::Greater => self.right(current),
                Ordering::Equal => return Some(current),
            };
        }
        None
    }

    /// Removes the entry stored under `key`.
    pub(crate) fn delete(&mut self, key: &E::Key) -> Option<E> {
        let node = self.find_node(key)?;
        Some(self.remove(node).0)
    }

    /// Removes the entry held by `node` and returns it together with the
    /// in-order successor `node` had before the removal. The returned
    /// handle is always live.
    pub(crate) fn delete_node(&mut self, node: NodeId) -> (E, Option<NodeId>) {
        let mut next = self.next(node);
        let (entry, removed) = self.remove(node);

        // The successor's payload moved into `node`; its own slot is gone.
        if removed != node {
            next = Some(node);
        }
        debug_assert!(next != Some(removed), "Returning a freed item");

        (entry, next)
    }

    /// Leftmost node.
    pub(crate) fn first(&self) -> Option<NodeId> {
        self.root.live().map(|root| self.leftmost(root))
    }

    /// Rightmost node.
    pub(crate) fn last(&self) -> Option<NodeId> {
        self.root.live().map(|root| self.rightmost(root))
    }

    /// In-order predecessor.
    pub(crate) fn prev(&self, node: NodeId) -> Option<NodeId> {
        let left = self.left(node);
        if !left.is_nil() {
            return Some(self.rightmost(left));
        }

        // Climb until we arrive from a right child.
        let mut child = node;
        let mut parent = self.parent(node);
        while !parent.is_nil() && child == self.left(parent) {
            child = parent;
            parent = self.parent(parent);
        }
        parent.live()
    }

    /// In-order successor.
    pub(crate) fn next(&self, node: NodeId) -> Option<NodeId> {
        let right = self.right(node);
        if !right.is_nil() {
            return Some(self.leftmost(right));
        }

        // Climb until we arrive from a left child.
        let mut child = node;
        let mut parent = self.parent(node);
        while !parent.is_nil() && child == self.right(parent) {
            child = parent;
            parent = self.parent(parent);
        }
        parent.live()
    }

    /// Number of entries, counted by a full in-order walk.
    pub(crate) fn len(&self) -> usize {
        let mut count = 0;
        let mut node = self.first();
        while let Some(id) = node {
            count += 1;
            node = self.next(id);
        }
        count
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_nil()
    }

    /// Postorder release of every node back to the pool. Reserved node
    /// storage is kept.
    pub(crate) fn free(&mut self) {
        let mut node = self.root;
        while !node.is_nil() {
            let left = self.left(node);
            if !left.is_nil() {
                node = left;
                continue;
            }
            let right = self.right(node);
            if !right.is_nil() {
                node = right;
                continue;
            }

            // Both subtrees are gone: unhook and release.
            let parent = self.parent(node);
            if !parent.is_nil() {
                if self.left(parent) == node {
                    self.node_mut(parent).left = NodeId::NIL;
                } else {
                    self.node_mut(parent).right = NodeId::NIL;
                }
            }
            self.nodes.free(node.0);
            node = parent;
        }
        self.root = NodeId::NIL;
    }

    /// Entry held by a live node.
    #[inline]
    pub(crate) fn entry(&self, node: NodeId) -> Option<&E> {
        self.nodes.get(node.0).map(|n| &n.entry)
    }

    /// Mutable entry held by a live node. The key must not be changed in a
    /// way that moves it relative to its neighbours.
    #[inline]
    pub(crate) fn entry_mut(&mut self, node: NodeId) -> Option<&mut E> {
        self.nodes.get_mut(node.0).map(|n| &mut n.entry)
    }

    /// In-order iterator over `(node, entry)` pairs.
    pub(crate) fn iter(&self) -> Iter<'_, E, C> {
        Iter {
            tree: self,
            next: self.first(),
        }
    }

    /// Bytes reserved for node storage.
    pub(crate) fn reserved_bytes(&self) -> usize {
        self.nodes.reserved_bytes()
    }

    /// Physically unlinks `node`, or its in-order successor when `node`
    /// has two children, and returns the entry logically deleted along with
    /// the id of the node actually freed.
    fn remove(&mut self, node: NodeId) -> (E, NodeId) {
        let spliced = if self.left(node).is_nil() || self.right(node).is_nil() {
            node
        } else {
            self.leftmost(self.right(node))
        };

        let child = if self.left(spliced).is_nil() {
            self.right(spliced)
        } else {
            self.left(spliced)
        };
        let parent = self.parent(spliced);

        if !child.is_nil() {
            self.node_mut(child).parent = parent;
        }
        if parent.is_nil() {
            self.root = child;
        } else if spliced == self.left(parent) {
            self.node_mut(parent).left = child;
        } else {
            self.node_mut(parent).right = child;
        }

        if self.color(spliced) == Color::Black {
            self.delete_fixup(child, parent);
        }

        let Some(freed) = self.nodes.free(spliced.0) else {
            unreachable!("spliced node {spliced:?} was not live");
        };
        let entry = if spliced == node {
            freed.entry
        } else {
            std::mem::replace(&mut self.node_mut(node).entry, freed.entry)
        };

        (entry, spliced)
    }

    fn leftmost(&self, mut node: NodeId) -> NodeId {
        loop {
            let left = self.left(node);
            if left.is_nil() {
                return node;
            }
            node = left;
        }
    }

    fn rightmost(&self, mut node: NodeId) -> NodeId {
        loop {
            let right = self.right(node);
            if right.is_nil() {
                return node;
            }
            node = right;
        }
    }

    /// Compares the keys of two live nodes.
    fn compare_nodes(&self, a: NodeId, b: NodeId) -> Ordering {
        self.compare
            .compare(self.node(a).entry.key(), self.node(b).entry.key())
    }
}

impl<E: Clone, C: Clone> RbTree<E, C> {
    /// Structural copy preserving shape and colors, built without
    /// recursion into fresh node storage.
    pub(crate) fn copy(&self, config: Option<NodePoolConfig>) -> MemoryResult<Self> {
        let mut copy = Self {
            nodes: config.map_or_else(PoolAllocator::new, PoolAllocator::with_config),
            root: NodeId::NIL,
            compare: self.compare.clone(),
        };

        let mut pending = Vec::new();
        if let Some(root) = self.root.live() {
            pending.push((root, NodeId::NIL, Side::Root));
        }

        while let Some((source, parent, side)) = pending.pop() {
            let original = self.node(source);
            let mut node = Node::leaf(parent, original.entry.clone());
            node.color = original.color;
            let id = NodeId(copy.nodes.allocate(node)?);

            match side {
                Side::Root => copy.root = id,
                Side::Left => copy.node_mut(parent).left = id,
                Side::Right => copy.node_mut(parent).right = id,
            }

            if let Some(right) = original.right.live() {
                pending.push((right, id, Side::Right));
            }
            if let Some(left) = original.left.live() {
                pending.push((left, id, Side::Left));
            }
        }

        Ok(copy)
    }
}

impl<E, C> RbTree<E, C> {
    #[inline]
    fn node(&self, id: NodeId) -> &Node<E> {
        &self.nodes[id.0]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<E> {
        &mut self.nodes[id.0]
    }

    #[inline]
    fn parent(&self, id: NodeId) -> NodeId {
        self.node(id).parent
    }

    /// Left child; the sentinel is its own leaf.
    #[inline]
    fn left(&self, id: NodeId) -> NodeId {
        if id.is_nil() {
            NodeId::NIL
        } else {
            self.node(id).left
        }
    }

    /// Right child; the sentinel is its own leaf.
    #[inline]
    fn right(&self, id: NodeId) -> NodeId {
        if id.is_nil() {
            NodeId::NIL
        } else {
            self.node(id).right
        }
    }

    /// Node color; the sentinel is black.
    #[inline]
    fn color(&self, id: NodeId) -> Color {
        if id.is_nil() {
            Color::Black
        } else {
            self.node(id).color
        }
    }

    /// Recolors a node. The sentinel stays black.
    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        if !id.is_nil() {
            self.node_mut(id).color = color;
        }
    }
}

/// In-order iterator over a tree.
pub(crate) struct Iter<'a, E, C> {
    tree: &'a RbTree<E, C>,
    next: Option<NodeId>,
}

impl<'a, E: Entry, C: Compare<E::Key>> Iterator for Iter<'a, E, C> {
    type Item = (NodeId, &'a E);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.next(id);
        Some((id, &self.tree.node(id).entry))
    }
}
