//! Invariant checking.

use std::cmp::Ordering;

use super::node::{Color, Entry, NodeId};
use super::{Compare, RbTree};
use crate::error::{TreeError, TreeResult};

impl<E: Entry, C: Compare<E::Key>> RbTree<E, C> {
    /// Checks every red-black invariant, parent-link consistency and
    /// strict in-order ordering. Returns the black height (black nodes on
    /// any root-to-sentinel path, sentinel excluded).
    pub(crate) fn validate(&self) -> TreeResult<usize> {
        let Some(root) = self.root.live() else {
            return Ok(0);
        };
        if self.color(root) == Color::Red {
            return Err(TreeError::RedRoot);
        }
        if !self.parent(root).is_nil() {
            return Err(TreeError::BrokenParentLink { node: root });
        }

        let mut black_height = None;
        let mut previous: Option<NodeId> = None;
        let mut current = self.first();

        while let Some(node) = current {
            for child in [self.left(node), self.right(node)] {
                if child.is_nil() {
                    continue;
                }
                if self.parent(child) != node {
                    return Err(TreeError::BrokenParentLink { node: child });
                }
                if self.color(node) == Color::Red && self.color(child) == Color::Red {
                    return Err(TreeError::RedViolation { node: child });
                }
            }

            if self.left(node).is_nil() || self.right(node).is_nil() {
                let height = self.black_depth(node);
                match black_height {
                    None => black_height = Some(height),
                    Some(expected) if expected != height => {
                        return Err(TreeError::BlackHeightMismatch { node });
                    }
                    Some(_) => {}
                }
            }

            if let Some(before) = previous {
                if self.compare_nodes(before, node) != Ordering::Less {
                    return Err(TreeError::OrderViolation { node });
                }
            }

            previous = Some(node);
            current = self.next(node);
        }

        Ok(black_height.unwrap_or(0))
    }

    /// Black nodes from `node` up to and including the root.
    fn black_depth(&self, mut node: NodeId) -> usize {
        let mut depth = 0;
        while !node.is_nil() {
            if self.color(node) == Color::Black {
                depth += 1;
            }
            node = self.parent(node);
        }
        depth
    }
}
