//! Red-black insertion and deletion without parent links.
//!
//! Both operations descend from a vertex's root recording every [`Slot`] on
//! the way. The fix-up passes climb that path instead of following parent
//! pointers, and patch it whenever a rotation moves the node being fixed.
//! Each case is written once against a [`Side`]; the mirrored case is the
//! same code with the side flipped.

use std::cmp::Ordering;
use std::mem;

use tracing::trace;

use super::arena::{Arena, Color, NodeId, Side, Slot};

impl Arena {
    /// Root-to-here slots for `key` in `vertex`'s tree. The last slot holds
    /// the matching node, or is the empty slot where it belongs.
    fn descend(&self, vertex: usize, key: usize) -> Vec<Slot> {
        let mut slot = Slot::Root(vertex);
        let mut path = Vec::new();
        loop {
            path.push(slot);
            let Some(id) = self.get(slot) else { break };
            slot = match key.cmp(&self.node(id).key) {
                Ordering::Equal => break,
                Ordering::Less => Slot::Child(id, Side::Left),
                Ordering::Greater => Slot::Child(id, Side::Right),
            };
        }
        path
    }

    /// Find `key` in `vertex`'s tree, inserting a sentinel-filled node when it
    /// is missing. Returns the node and whether it was created.
    pub(crate) fn insert(
        &mut self,
        vertex: usize,
        key: usize,
        edge_type_count: usize,
    ) -> (NodeId, bool) {
        let path = self.descend(vertex, key);
        let slot = path[path.len() - 1];
        if let Some(existing) = self.get(slot) {
            return (existing, false);
        }

        let id = self.alloc(key, edge_type_count);
        self.set(slot, Some(id));
        self.fix_after_insert(&path, id);

        if let Some(root) = self.root(vertex) {
            self.paint(root, Color::Black);
        }
        (id, true)
    }

    /// `path[last]` holds `node`, a red node that may have a red parent.
    fn fix_after_insert(&mut self, path: &[Slot], mut node: NodeId) {
        let mut i = path.len() - 1;

        while let Some(parent) = path[i].parent() {
            if !self.is_red(Some(parent)) {
                return;
            }

            let above = path[i - 1];
            let (Some(grand), Some(parent_side)) = (above.parent(), above.side()) else {
                // The parent is the root.
                self.paint(parent, Color::Black);
                return;
            };

            let uncle = self.child(grand, parent_side.flip());
            if let Some(uncle) = uncle.filter(|&uncle| self.is_red(Some(uncle))) {
                trace!(key = self.node(node).key, "insert fix-up: red uncle");
                self.paint(parent, Color::Black);
                self.paint(uncle, Color::Black);
                self.paint(grand, Color::Red);
                node = grand;
                i -= 2;
                continue;
            }

            let top = path[i - 2];
            if path[i].side() == Some(parent_side) {
                // Straight line: the parent rises over the grandparent.
                trace!(key = self.node(node).key, "insert fix-up: single rotation");
                let inner = self.child(parent, parent_side.flip());
                self.set_child(grand, parent_side, inner);
                self.set_child(parent, parent_side.flip(), Some(grand));
                self.set(top, Some(parent));
                self.paint(parent, Color::Black);
            } else {
                // Zig-zag: the new node rises over both.
                trace!(key = self.node(node).key, "insert fix-up: double rotation");
                let outer = self.child(node, parent_side);
                let inner = self.child(node, parent_side.flip());
                self.set_child(parent, parent_side.flip(), outer);
                self.set_child(grand, parent_side, inner);
                self.set_child(node, parent_side, Some(parent));
                self.set_child(node, parent_side.flip(), Some(grand));
                self.set(top, Some(node));
                self.paint(node, Color::Black);
            }
            self.paint(grand, Color::Red);
            return;
        }
    }

    /// Remove `key` from `vertex`'s tree. Returns false when it was absent.
    pub(crate) fn remove(&mut self, vertex: usize, key: usize) -> bool {
        let mut path = self.descend(vertex, key);
        let Some(target) = self.get(path[path.len() - 1]) else {
            return false;
        };

        // With a left subtree, take over the in-order predecessor's entry and
        // delete the predecessor instead; it has no right child.
        let mut victim = target;
        if let Some(left) = self.node(target).left {
            path.push(Slot::Child(target, Side::Left));
            victim = left;
            while let Some(right) = self.node(victim).right {
                path.push(Slot::Child(victim, Side::Right));
                victim = right;
            }

            let predecessor = self.node_mut(victim);
            let predecessor_key = predecessor.key;
            let weights = mem::take(&mut predecessor.weights);
            let target_node = self.node_mut(target);
            target_node.key = predecessor_key;
            let displaced = mem::replace(&mut target_node.weights, weights);
            self.node_mut(victim).weights = displaced;
        }

        let removed = self.node(victim);
        let removed_red = removed.color == Color::Red;
        let orphan = removed.left.or(removed.right);
        self.set(path[path.len() - 1], orphan);
        self.release(victim);

        if !removed_red {
            self.fix_after_remove(path);
        }
        true
    }

    /// `path[last]` holds a subtree that is one black node short.
    fn fix_after_remove(&mut self, mut path: Vec<Slot>) {
        let mut i = path.len() - 1;

        loop {
            let current = self.get(path[i]);
            if let Some(red) = current.filter(|&id| self.is_red(Some(id))) {
                self.paint(red, Color::Black);
                return;
            }

            let (Some(parent), Some(side)) = (path[i].parent(), path[i].side()) else {
                // Reached the root: the whole tree lost one black level.
                return;
            };
            let other = side.flip();

            let Some(mut sibling) = self.child(parent, other) else {
                debug_assert!(false, "black height guarantees a sibling");
                return;
            };

            if self.is_red(Some(sibling)) {
                // Rotate the red sibling above the parent so a black nephew
                // becomes the new sibling, then retry against it.
                trace!(key = self.node(parent).key, "remove fix-up: red sibling");
                let nephew = self.child(sibling, side);
                self.set_child(parent, other, nephew);
                self.set_child(sibling, side, Some(parent));
                self.set(path[i - 1], Some(sibling));
                self.paint(sibling, Color::Black);
                self.paint(parent, Color::Red);

                path.truncate(i);
                path.push(Slot::Child(sibling, side));
                path.push(Slot::Child(parent, side));
                i = path.len() - 1;

                let Some(nephew) = nephew else {
                    debug_assert!(false, "a red sibling has two black children");
                    return;
                };
                sibling = nephew;
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, other);

            if !self.is_red(near) && !self.is_red(far) {
                trace!(key = self.node(parent).key, "remove fix-up: black nephews");
                self.paint(sibling, Color::Red);
                i -= 1;
                continue;
            }

            let parent_color = self.node(parent).color;
            match near.filter(|_| !self.is_red(far)) {
                Some(near) => {
                    // Only the near nephew is red: it rises over parent and
                    // sibling in one double rotation.
                    trace!(key = self.node(parent).key, "remove fix-up: near nephew");
                    let near_inner = self.child(near, side);
                    let near_outer = self.child(near, other);
                    self.set_child(parent, other, near_inner);
                    self.set_child(sibling, side, near_outer);
                    self.set_child(near, side, Some(parent));
                    self.set_child(near, other, Some(sibling));
                    self.set(path[i - 1], Some(near));
                    self.paint(near, parent_color);
                }
                None => {
                    // The far nephew is red: the sibling rises over the parent.
                    trace!(key = self.node(parent).key, "remove fix-up: far nephew");
                    self.set_child(parent, other, near);
                    self.set_child(sibling, side, Some(parent));
                    self.set(path[i - 1], Some(sibling));
                    self.paint(sibling, parent_color);
                    if let Some(far) = far {
                        self.paint(far, Color::Black);
                    }
                }
            }
            self.paint(parent, Color::Black);
            return;
        }
    }
}
