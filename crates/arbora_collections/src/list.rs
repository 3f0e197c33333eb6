//! # Linked-List Merge Sort
//!
//! Stable, bottom-up natural merge sort over linked sequences.
//!
//! The list is walked in runs of length 1, 2, 4, ... and adjacent runs are
//! merged by relinking nodes, so no node is ever allocated or moved. A pass
//! that finds the whole list in a single run ends the sort. Ties take the
//! left run first, which makes the sort stable.
//!
//! Links are reached through [`Links`] (and [`DoublyLinks`] for lists that
//! also keep backward links), so any node representation works: indices
//! into a vector, arena handles, or a plain `next` array.
//!
//! ## Example
//!
//! ```rust
//! use arbora_collections::list;
//!
//! let keys = [5, 3, 1, 4, 2];
//! // next[i] is the index following i.
//! let mut next = vec![Some(1), Some(2), Some(3), Some(4), None];
//!
//! let head = list::sort(next.as_mut_slice(), Some(0), |_, a, b| keys[a] <= keys[b]);
//!
//! let mut sorted = Vec::new();
//! let mut cursor = head;
//! while let Some(i) = cursor {
//!     sorted.push(keys[i]);
//!     cursor = next[i];
//! }
//! assert_eq!(sorted, [1, 2, 3, 4, 5]);
//! ```

/// Access to the forward links of a singly-linked sequence.
pub trait Links {
    /// Node handle.
    type Node: Copy + Eq;

    /// Node following `node`, or `None` at the tail.
    fn next(&self, node: Self::Node) -> Option<Self::Node>;

    /// Relinks the node following `node`.
    fn set_next(&mut self, node: Self::Node, next: Option<Self::Node>);
}

/// Access to the backward links of a doubly-linked sequence.
pub trait DoublyLinks: Links {
    /// Relinks the node preceding `node`.
    fn set_prev(&mut self, node: Self::Node, prev: Option<Self::Node>);
}

/// A `next` array: slot `i` holds the index following `i`.
impl Links for [Option<usize>] {
    type Node = usize;

    #[inline]
    fn next(&self, node: usize) -> Option<usize> {
        self[node]
    }

    #[inline]
    fn set_next(&mut self, node: usize, next: Option<usize>) {
        self[node] = next;
    }
}

/// Sorts the sequence starting at `head` and returns the new head.
///
/// `le(links, a, b)` must answer "a sorts no later than b". Elements for
/// which it holds both ways keep their original relative order.
///
/// O(n log n) predicate calls, O(1) auxiliary storage.
pub fn sort<L, F>(links: &mut L, head: Option<L::Node>, mut le: F) -> Option<L::Node>
where
    L: Links + ?Sized,
    F: FnMut(&L, L::Node, L::Node) -> bool,
{
    let mut list = head;
    let mut run = 1usize;

    loop {
        let mut merged_head = None;
        let mut tail: Option<L::Node> = None;
        let mut right = list;

        loop {
            let mut left = right;

            let mut left_len = 0;
            while left_len < run {
                let Some(node) = right else { break };
                right = links.next(node);
                left_len += 1;
            }

            let mut right_len = 0;
            let mut probe = right;
            while right_len < run {
                let Some(node) = probe else { break };
                probe = links.next(node);
                right_len += 1;
            }

            // The first run covers the whole list: sorted.
            if right.is_none() && left == list {
                return list;
            }
            if left_len + right_len == 0 {
                break;
            }

            while left_len > 0 && right_len > 0 {
                let (Some(l), Some(r)) = (left, right) else { break };
                let take = if le(links, l, r) {
                    left = links.next(l);
                    left_len -= 1;
                    l
                } else {
                    right = links.next(r);
                    right_len -= 1;
                    r
                };
                append(links, &mut merged_head, &mut tail, take);
            }

            while left_len > 0 {
                let Some(l) = left else { break };
                left = links.next(l);
                left_len -= 1;
                append(links, &mut merged_head, &mut tail, l);
            }

            while right_len > 0 {
                let Some(r) = right else { break };
                right = links.next(r);
                right_len -= 1;
                append(links, &mut merged_head, &mut tail, r);
            }
        }

        if let Some(last) = tail {
            links.set_next(last, None);
        }
        list = merged_head;
        run = run.saturating_mul(2);
    }
}

/// Sorts a doubly-linked sequence: [`sort`] on the forward links, then one
/// pass rebuilding every backward link.
pub fn sort_doubly<L, F>(links: &mut L, head: Option<L::Node>, le: F) -> Option<L::Node>
where
    L: DoublyLinks + ?Sized,
    F: FnMut(&L, L::Node, L::Node) -> bool,
{
    let head = sort(links, head, le);

    let mut prev = None;
    let mut cursor = head;
    while let Some(node) = cursor {
        links.set_prev(node, prev);
        prev = Some(node);
        cursor = links.next(node);
    }

    head
}

/// Appends `node` to the merged output.
#[inline]
fn append<L: Links + ?Sized>(
    links: &mut L,
    head: &mut Option<L::Node>,
    tail: &mut Option<L::Node>,
    node: L::Node,
) {
    match *tail {
        Some(last) => links.set_next(last, Some(node)),
        None => *head = Some(node),
    }
    *tail = Some(node);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Vector-backed doubly-linked list for tests.
    struct Chain<T> {
        items: Vec<T>,
        next: Vec<Option<usize>>,
        prev: Vec<Option<usize>>,
    }

    impl<T> Chain<T> {
        fn new(items: Vec<T>) -> (Self, Option<usize>) {
            let n = items.len();
            let next = (0..n).map(|i| (i + 1 < n).then_some(i + 1)).collect();
            let prev = (0..n).map(|i| i.checked_sub(1)).collect();
            let head = (n > 0).then_some(0);
            (Self { items, next, prev }, head)
        }

        fn forward(&self, head: Option<usize>) -> Vec<&T> {
            let mut out = Vec::new();
            let mut cursor = head;
            while let Some(i) = cursor {
                out.push(&self.items[i]);
                cursor = self.next[i];
            }
            out
        }
    }

    impl<T> Links for Chain<T> {
        type Node = usize;

        fn next(&self, node: usize) -> Option<usize> {
            self.next[node]
        }

        fn set_next(&mut self, node: usize, next: Option<usize>) {
            self.next[node] = next;
        }
    }

    impl<T> DoublyLinks for Chain<T> {
        fn set_prev(&mut self, node: usize, prev: Option<usize>) {
            self.prev[node] = prev;
        }
    }

    fn sorted_ints(values: Vec<i32>) -> Vec<i32> {
        let (mut chain, head) = Chain::new(values);
        let head = sort(&mut chain, head, |c, a, b| c.items[a] <= c.items[b]);
        chain.forward(head).into_iter().copied().collect()
    }

    #[test]
    fn test_sort_basic() {
        assert_eq!(sorted_ints(vec![5, 3, 1, 4, 2]), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sort_empty() {
        assert_eq!(sorted_ints(Vec::new()), Vec::<i32>::new());
    }

    #[test]
    fn test_sort_single() {
        assert_eq!(sorted_ints(vec![7]), vec![7]);
    }

    #[test]
    fn test_sort_already_sorted_unchanged() {
        let (mut chain, head) = Chain::new(vec![1, 2, 3, 4, 5, 6]);
        let sorted = sort(&mut chain, head, |c, a, b| c.items[a] <= c.items[b]);
        assert_eq!(sorted, head);
        assert_eq!(chain.next, vec![Some(1), Some(2), Some(3), Some(4), Some(5), None]);
    }

    #[test]
    fn test_sort_reverse_odd_length() {
        assert_eq!(
            sorted_ints(vec![9, 8, 7, 6, 5, 4, 3, 2, 1]),
            (1..=9).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_sort_stable() {
        let (mut chain, head) = Chain::new(vec![(1, "a"), (0, "x"), (1, "b"), (0, "y")]);
        let head = sort(&mut chain, head, |c, a, b| c.items[a].0 <= c.items[b].0);
        let labels: Vec<&str> = chain.forward(head).into_iter().map(|p| p.1).collect();
        assert_eq!(labels, vec!["x", "y", "a", "b"]);
    }

    #[test]
    fn test_sort_doubly_rebuilds_prev() {
        let (mut chain, head) = Chain::new(vec![3, 1, 2]);
        let head = sort_doubly(&mut chain, head, |c, a, b| c.items[a] <= c.items[b]);

        assert_eq!(head, Some(1));
        assert_eq!(chain.prev[1], None);
        assert_eq!(chain.prev[2], Some(1));
        assert_eq!(chain.prev[0], Some(2));
    }

    #[test]
    fn test_sort_next_array() {
        let keys = [30, 10, 20];
        let mut next = vec![Some(1), Some(2), None];
        let head = sort(next.as_mut_slice(), Some(0), |_, a, b| keys[a] <= keys[b]);
        assert_eq!(head, Some(1));
        assert_eq!(next, vec![None, Some(2), Some(0)]);
    }

    #[test]
    fn test_sort_predicate_calls_bounded() {
        let n = 1000usize;
        let values: Vec<usize> = (0..n).map(|i| (i * 7919) % n).collect();
        let (mut chain, head) = Chain::new(values);
        let mut calls = 0usize;
        let head = sort(&mut chain, head, |c, a, b| {
            calls += 1;
            c.items[a] <= c.items[b]
        });

        let sorted: Vec<usize> = chain.forward(head).into_iter().copied().collect();
        assert_eq!(sorted, (0..n).collect::<Vec<_>>());
        // n * ceil(log2 n) plus the first-pair probes of each pass.
        assert!(calls <= n * 10 + 10);
    }
}
