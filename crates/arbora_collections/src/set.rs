//! # Ordered Set
//!
//! Unique elements kept in comparator order on a red-black tree.

use std::fmt;

use arbora_core::NodePoolConfig;

use crate::error::TreeResult;
use crate::tree::{Compare, Entry, Identity, Natural, NodeId, RbTree};

/// Set payload: the element is its own key.
#[derive(Clone)]
struct Element<T>(T);

impl<T> Entry for Element<T> {
    type Key = T;

    #[inline]
    fn key(&self) -> &T {
        &self.0
    }
}

/// An ordered set of unique elements.
///
/// Elements are stored by value; store handles or references when the
/// payload is owned elsewhere. Freeing the set drops the stored values and
/// nothing they point to.
///
/// Every set owns its node pool. Nodes freed by one set are reused by that
/// set's later inserts and never by another set; storage goes back to the
/// system when the set is dropped.
///
/// # Example
///
/// ```rust
/// use arbora_collections::Set;
///
/// let mut leaves = Set::new();
/// leaves.insert(7)?;
/// leaves.insert(3)?;
/// assert!(leaves.insert(7)?.is_none()); // already present
///
/// assert!(leaves.contains(&3));
/// assert_eq!(leaves.iter().copied().collect::<Vec<_>>(), vec![3, 7]);
/// # Ok::<(), arbora_collections::TreeError>(())
/// ```
pub struct Set<T, C = Natural> {
    tree: RbTree<Element<T>, C>,
}

impl<T: Ord> Set<T> {
    /// Creates an empty set ordered by `Ord`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Creates an empty set ordered by `Ord` whose nodes are reserved in blocks.
    #[must_use]
    pub fn with_pool(config: NodePoolConfig) -> Self {
        Self::with_comparator_and_pool(Natural, config)
    }
}

impl<T: Ord> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F: Fn(&T) -> u64> Set<T, Identity<F>> {
    /// Creates an empty set ordered by a stable caller-assigned handle.
    /// Elements with equal handles are the same element.
    #[must_use]
    pub fn by_identity(handle: F) -> Self {
        Self::with_comparator(Identity(handle))
    }
}

impl<T, C: Compare<T>> Set<T, C> {
    /// Creates an empty set with a custom ordering.
    #[must_use]
    pub fn with_comparator(compare: C) -> Self {
        Self {
            tree: RbTree::new(compare, None),
        }
    }

    /// Creates an empty set with a custom ordering whose nodes are
    /// reserved in blocks.
    #[must_use]
    pub fn with_comparator_and_pool(compare: C, config: NodePoolConfig) -> Self {
        Self {
            tree: RbTree::new(compare, Some(config)),
        }
    }

    /// Inserts an element.
    ///
    /// Returns the new node, or `None` if an equal element is already
    /// present (the set is left unchanged and `value` is dropped).
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Memory`](crate::TreeError::Memory) if node
    /// storage cannot grow.
    pub fn insert(&mut self, value: T) -> TreeResult<Option<NodeId>> {
        Ok(self.tree.insert(Element(value))?)
    }

    /// The stored element equal to `value`.
    #[must_use]
    pub fn find(&self, value: &T) -> Option<&T> {
        let node = self.tree.find_node(value)?;
        self.get(node)
    }

    /// Node of the stored element equal to `value`.
    #[must_use]
    pub fn find_node(&self, value: &T) -> Option<NodeId> {
        self.tree.find_node(value)
    }

    /// Whether an element equal to `value` is stored.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.tree.find_node(value).is_some()
    }

    /// Removes the element equal to `value` and returns it, or `None` if
    /// absent.
    pub fn delete(&mut self, value: &T) -> Option<T> {
        self.tree.delete(value).map(|element| element.0)
    }

    /// Removes the element held by `node`.
    ///
    /// Returns the removed element and the node that followed `node` in
    /// order before the removal. The returned handle is live even when the
    /// removal physically freed a different node, so a cursor can advance
    /// through it while deleting.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a live node of this set.
    pub fn delete_node(&mut self, node: NodeId) -> (T, Option<NodeId>) {
        let (element, next) = self.tree.delete_node(node);
        (element.0, next)
    }

    /// Removes every element.
    pub fn free(&mut self) {
        self.tree.free();
    }

    /// Number of elements. Walks the whole tree: O(n).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the set is empty. O(1).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Node of the smallest element.
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.tree.first()
    }

    /// Node of the largest element.
    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.tree.last()
    }

    /// Node of the next smaller element.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a live node of this set.
    #[must_use]
    pub fn prev(&self, node: NodeId) -> Option<NodeId> {
        self.tree.prev(node)
    }

    /// Node of the next larger element.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a live node of this set.
    #[must_use]
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        self.tree.next(node)
    }

    /// Element held by `node`, or `None` if the node has been freed.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&T> {
        self.tree.entry(node).map(|element| &element.0)
    }

    /// Elements in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.tree.iter().map(|(_, element)| &element.0)
    }

    /// Checks the red-black invariants and ordering; returns the black height.
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

impl<T: Clone, C: Compare<T> + Clone> Set<T, C> {
    /// Deep copy with the same shape, colors and ordering.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Memory`](crate::TreeError::Memory) if node
    /// storage for the copy cannot be reserved.
    pub fn copy(&self) -> TreeResult<Self> {
        Ok(Self {
            tree: self.tree.copy(None)?,
        })
    }

    /// Deep copy whose nodes are reserved in blocks.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Memory`](crate::TreeError::Memory) if node
    /// storage for the copy cannot be reserved.
    pub fn copy_with_pool(&self, config: NodePoolConfig) -> TreeResult<Self> {
        Ok(Self {
            tree: self.tree.copy(Some(config))?,
        })
    }
}

impl<T: fmt::Debug, C: Compare<T>> fmt::Debug for Set<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(values: &[i32]) -> Set<i32> {
        let mut set = Set::new();
        for &v in values {
            set.insert(v).unwrap();
        }
        set
    }

    #[test]
    fn test_set_insert_find() {
        let set = set_of(&[4, 2, 9]);
        assert_eq!(set.find(&2), Some(&2));
        assert_eq!(set.find(&5), None);
        assert!(set.contains(&9));
        assert!(!set.contains(&1));
    }

    #[test]
    fn test_set_duplicate_insert_no_op() {
        let mut set = set_of(&[1, 2, 3]);
        assert!(set.insert(2).unwrap().is_none());
        assert_eq!(set.len(), 3);
        assert_eq!(set.find(&2), Some(&2));
    }

    #[test]
    fn test_set_delete() {
        let mut set = set_of(&[5, 1, 8, 3]);
        assert_eq!(set.delete(&1), Some(1));
        assert_eq!(set.delete(&1), None);
        assert_eq!(set.len(), 3);
        assert!(!set.contains(&1));
        assert!(set.contains(&3));
        set.validate().unwrap();
    }

    #[test]
    fn test_set_reverse_comparator() {
        let mut set: Set<i32, _> = Set::with_comparator(|a: &i32, b: &i32| b.cmp(a));
        for v in [1, 3, 2] {
            set.insert(v).unwrap();
        }
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_set_identity_order() {
        struct Leaf {
            handle: u64,
            label: &'static str,
        }

        let mut set = Set::by_identity(|leaf: &Leaf| leaf.handle);
        set.insert(Leaf { handle: 9, label: "far" }).unwrap();
        set.insert(Leaf { handle: 2, label: "near" }).unwrap();
        assert!(set.insert(Leaf { handle: 9, label: "dup" }).unwrap().is_none());

        let labels: Vec<&str> = set.iter().map(|leaf| leaf.label).collect();
        assert_eq!(labels, vec!["near", "far"]);
    }

    #[test]
    fn test_set_first_last_traversal() {
        let set = set_of(&[30, 10, 20]);
        let first = set.first().unwrap();
        let last = set.last().unwrap();
        assert_eq!(set.get(first), Some(&10));
        assert_eq!(set.get(last), Some(&30));
        assert_eq!(set.next(first).and_then(|n| set.get(n)), Some(&20));
        assert_eq!(set.prev(first), None);
    }

    #[test]
    fn test_set_copy_independent() {
        let original = set_of(&[3, 1, 2]);
        let mut copy = original.copy().unwrap();
        copy.delete(&2);
        copy.insert(10).unwrap();

        assert_eq!(original.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(copy.iter().copied().collect::<Vec<_>>(), vec![1, 3, 10]);
    }

    #[test]
    fn test_set_free() {
        let mut set = Set::with_pool(NodePoolConfig::new(8).unwrap());
        for v in 0..20 {
            set.insert(v).unwrap();
        }
        let reserved = set.reserved_bytes();
        set.free();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        // Node storage is kept for reuse.
        assert_eq!(set.reserved_bytes(), reserved);
    }

    #[test]
    fn test_set_stale_node_after_successor_splice() {
        let mut set = set_of(&[0, 1, 2]);
        let held = set.find_node(&2).unwrap();

        // 1 has two children: 2's node is spliced out and its slot freed.
        assert_eq!(set.delete(&1), Some(1));
        set.insert(9).unwrap();

        assert_eq!(set.get(held), None);
        assert_eq!(set.find(&2), Some(&2));
        assert_eq!(set.find(&9), Some(&9));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![0, 2, 9]);
    }

    #[test]
    fn test_set_free_reuses_own_nodes() {
        let mut set = Set::with_pool(NodePoolConfig::new(4).unwrap());
        for v in 0..16 {
            set.insert(v).unwrap();
        }
        let reserved = set.reserved_bytes();

        set.free();
        for v in 100..116 {
            set.insert(v).unwrap();
        }
        assert_eq!(set.reserved_bytes(), reserved);
        assert_eq!(set.len(), 16);
    }

    #[test]
    fn test_set_debug() {
        let set = set_of(&[2, 1]);
        assert_eq!(format!("{set:?}"), "{1, 2}");
    }
}
