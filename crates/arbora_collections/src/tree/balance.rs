//! Rotations and the insert/delete fixup passes.

use super::node::{Color, NodeId};
use super::RbTree;

impl<E, C> RbTree<E, C> {
    /// Rotates `x` down to the left; its right child takes its place.
    fn rotate_left(&mut self, x: NodeId) {
        let y = self.right(x);
        debug_assert!(!y.is_nil(), "rotate_left without a right child");

        let y_left = self.left(y);
        self.node_mut(x).right = y_left;
        if !y_left.is_nil() {
            self.node_mut(y_left).parent = x;
        }

        let parent = self.parent(x);
        self.node_mut(y).parent = parent;
        if parent.is_nil() {
            self.root = y;
        } else if x == self.left(parent) {
            self.node_mut(parent).left = y;
        } else {
            self.node_mut(parent).right = y;
        }

        self.node_mut(y).left = x;
        self.node_mut(x).parent = y;
    }

    /// Rotates `x` down to the right; its left child takes its place.
    fn rotate_right(&mut self, x: NodeId) {
        let y = self.left(x);
        debug_assert!(!y.is_nil(), "rotate_right without a left child");

        let y_right = self.right(y);
        self.node_mut(x).left = y_right;
        if !y_right.is_nil() {
            self.node_mut(y_right).parent = x;
        }

        let parent = self.parent(x);
        self.node_mut(y).parent = parent;
        if parent.is_nil() {
            self.root = y;
        } else if x == self.right(parent) {
            self.node_mut(parent).right = y;
        } else {
            self.node_mut(parent).left = y;
        }

        self.node_mut(y).right = x;
        self.node_mut(x).parent = y;
    }

    /// Restores the invariants after `x` was linked in as a red leaf.
    pub(super) fn insert_fixup(&mut self, mut x: NodeId) {
        while x != self.root && self.color(self.parent(x)) == Color::Red {
            // A red parent is never the root, so the grandparent exists.
            let parent = self.parent(x);
            let grandparent = self.parent(parent);

            if parent == self.left(grandparent) {
                let uncle = self.right(grandparent);
                if self.color(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    x = grandparent;
                } else {
                    if x == self.right(parent) {
                        x = parent;
                        self.rotate_left(x);
                    }
                    let parent = self.parent(x);
                    let grandparent = self.parent(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.left(grandparent);
                if self.color(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    x = grandparent;
                } else {
                    if x == self.left(parent) {
                        x = parent;
                        self.rotate_right(x);
                    }
                    let parent = self.parent(x);
                    let grandparent = self.parent(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_left(grandparent);
                }
            }
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Restores the invariants after a black node was unlinked.
    ///
    /// `x` took the removed node's place and may be the sentinel, which is
    /// why its parent travels separately.
    pub(super) fn delete_fixup(&mut self, mut x: NodeId, mut parent: NodeId) {
        while x != self.root && self.color(x) == Color::Black {
            if x == self.left(parent) {
                let mut sibling = self.right(parent);

                if self.color(sibling) == Color::Red {
                    self.set_color(parent, Color::Red);
                    self.set_color(sibling, Color::Black);
                    self.rotate_left(parent);
                    sibling = self.right(parent);
                }

                if self.color(self.left(sibling)) == Color::Black
                    && self.color(self.right(sibling)) == Color::Black
                {
                    self.set_color(sibling, Color::Red);
                    x = parent;
                    parent = self.parent(x);
                } else {
                    if self.color(self.right(sibling)) == Color::Black {
                        let near = self.left(sibling);
                        self.set_color(near, Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.right(parent);
                    }

                    let far = self.right(sibling);
                    self.set_color(sibling, self.color(parent));
                    self.set_color(parent, Color::Black);
                    self.set_color(far, Color::Black);
                    self.rotate_left(parent);
                    x = self.root;
                }
            } else {
                let mut sibling = self.left(parent);

                if self.color(sibling) == Color::Red {
                    self.set_color(parent, Color::Red);
                    self.set_color(sibling, Color::Black);
                    self.rotate_right(parent);
                    sibling = self.left(parent);
                }

                if self.color(self.right(sibling)) == Color::Black
                    && self.color(self.left(sibling)) == Color::Black
                {
                    self.set_color(sibling, Color::Red);
                    x = parent;
                    parent = self.parent(x);
                } else {
                    if self.color(self.left(sibling)) == Color::Black {
                        let near = self.right(sibling);
                        self.set_color(near, Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.left(parent);
                    }

                    let far = self.left(sibling);
                    self.set_color(sibling, self.color(parent));
                    self.set_color(parent, Color::Black);
                    self.set_color(far, Color::Black);
                    self.rotate_right(parent);
                    x = self.root;
                }
            }
        }

        self.set_color(x, Color::Black);
    }
}
