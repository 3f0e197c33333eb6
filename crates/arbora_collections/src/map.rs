//! # Ordered Map
//!
//! Key to value association kept in key order on a red-black tree.

use std::fmt;

use arbora_core::NodePoolConfig;

use crate::error::TreeResult;
use crate::tree::{Compare, Entry, Identity, Natural, NodeId, RbTree};

/// Map payload: a key and its independent value.
struct Pair<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry for Pair<K, V> {
    type Key = K;

    #[inline]
    fn key(&self) -> &K {
        &self.key
    }
}

/// An ordered map from unique keys to values.
///
/// Keys and values are stored by value; store handles or references when
/// the payload is owned elsewhere. Node storage is private to each map:
/// nodes freed here are reused only by this map.
///
/// # Example
///
/// ```rust
/// use arbora_collections::Map;
///
/// let mut owners = Map::new();
/// owners.insert(17_u64, "body A")?;
/// owners.insert(4_u64, "body B")?;
///
/// assert_eq!(owners.find(&17), Some(&"body A"));
/// assert_eq!(owners.delete(&4), Some("body B"));
/// assert_eq!(owners.find(&4), None);
/// # Ok::<(), arbora_collections::TreeError>(())
/// ```
pub struct Map<K, V, C = Natural> {
    tree: RbTree<Pair<K, V>, C>,
}

impl<K: Ord, V> Map<K, V> {
    /// Creates an empty map ordered by `Ord` on keys.
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Creates an empty map ordered by `Ord` on keys whose nodes are
    /// reserved in blocks.
    #[must_use]
    pub fn with_pool(config: NodePoolConfig) -> Self {
        Self::with_comparator_and_pool(Natural, config)
    }
}

impl<K: Ord, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, F: Fn(&K) -> u64> Map<K, V, Identity<F>> {
    /// Creates an empty map ordered by a stable caller-assigned key handle.
    #[must_use]
    pub fn by_identity(handle: F) -> Self {
        Self::with_comparator(Identity(handle))
    }
}

impl<K, V, C: Compare<K>> Map<K, V, C> {
    /// Creates an empty map with a custom key ordering.
    #[must_use]
    pub fn with_comparator(compare: C) -> Self {
        Self {
            tree: RbTree::new(compare, None),
        }
    }

    /// Creates an empty map with a custom key ordering whose nodes are
    /// reserved in blocks.
    #[must_use]
    pub fn with_comparator_and_pool(compare: C, config: NodePoolConfig) -> Self {
        Self {
            tree: RbTree::new(compare, Some(config)),
        }
    }

    /// Maps `key` to `value`.
    ///
    /// Returns the new node, or `None` if the key is already mapped (the
    /// map is left unchanged and the arguments are dropped).
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Memory`](crate::TreeError::Memory) if node
    /// storage cannot grow.
    pub fn insert(&mut self, key: K, value: V) -> TreeResult<Option<NodeId>> {
        Ok(self.tree.insert(Pair { key, value })?)
    }

    /// Value mapped to `key`.
    #[must_use]
    pub fn find(&self, key: &K) -> Option<&V> {
        let node = self.tree.find_node(key)?;
        self.value(node)
    }

    /// Node holding `key`.
    #[must_use]
    pub fn find_node(&self, key: &K) -> Option<NodeId> {
        self.tree.find_node(key)
    }

    /// Removes `key` and returns its value, or `None` if unmapped.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.tree.delete(key).map(|pair| pair.value)
    }

    /// Removes the pair held by `node`.
    ///
    /// Returns the removed pair and the node that followed `node` in key
    /// order before the removal; that handle is always live.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a live node of this map.
    pub fn delete_node(&mut self, node: NodeId) -> ((K, V), Option<NodeId>) {
        let (pair, next) = self.tree.delete_node(node);
        ((pair.key, pair.value), next)
    }

    /// Removes every pair.
    pub fn free(&mut self) {
        self.tree.free();
    }

    /// Number of pairs. Walks the whole tree: O(n).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the map is empty. O(1).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Node with the smallest key.
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.tree.first()
    }

    /// Node with the largest key.
    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.tree.last()
    }

    /// Node with the next smaller key.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a live node of this map.
    #[must_use]
    pub fn prev(&self, node: NodeId) -> Option<NodeId> {
        self.tree.prev(node)
    }

    /// Node with the next larger key.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a live node of this map.
    #[must_use]
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        self.tree.next(node)
    }

    /// Key held by `node`, or `None` if the node has been freed.
    #[must_use]
    pub fn key(&self, node: NodeId) -> Option<&K> {
        self.tree.entry(node).map(|pair| &pair.key)
    }

    /// Value held by `node`, or `None` if the node has been freed.
    #[must_use]
    pub fn value(&self, node: NodeId) -> Option<&V> {
        self.tree.entry(node).map(|pair| &pair.value)
    }

    /// Mutable value held by `node`.
    pub fn value_mut(&mut self, node: NodeId) -> Option<&mut V> {
        self.tree.entry_mut(node).map(|pair| &mut pair.value)
    }

    /// Pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.tree.iter().map(|(_, pair)| (&pair.key, &pair.value))
    }

    /// Checks the red-black invariants and key ordering; returns the
    /// black height.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> TreeResult<usize> {
        self.tree.validate()
    }

    /// Bytes reserved for node storage.
    #[must_use]
    pub fn reserved_bytes(&self) -> usize {
        self.tree.reserved_bytes()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C: Compare<K>> fmt::Debug for Map<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
