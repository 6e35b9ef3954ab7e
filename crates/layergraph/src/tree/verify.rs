//! Structural checks for the per-vertex red-black trees.

use thiserror::Error;

use super::arena::{Arena, Color, NodeId};

/// A broken red-black or filing invariant, reported by [`super::TreeGraph::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeViolation {
    /// The root of a vertex's tree is red.
    #[error("tree of vertex {vertex} has a red root")]
    RedRoot {
        /// Owner of the tree.
        vertex: usize,
    },

    /// A red node has a red child.
    #[error("tree of vertex {vertex}: red node {key} has a red child")]
    RedChildOfRed {
        /// Owner of the tree.
        vertex: usize,
        /// Key of the red parent.
        key: usize,
    },

    /// Two paths below a node cross different numbers of black nodes.
    #[error("tree of vertex {vertex}: unequal black height below node {key}")]
    BlackHeight {
        /// Owner of the tree.
        vertex: usize,
        /// Key of the unbalanced node.
        key: usize,
    },

    /// In-order keys are not strictly ascending.
    #[error("tree of vertex {vertex}: key {key} breaks ascending order")]
    KeyOrder {
        /// Owner of the tree.
        vertex: usize,
        /// First key out of order.
        key: usize,
    },

    /// A key that this vertex must never own.
    #[error("tree of vertex {vertex} holds misfiled key {key}")]
    Misfiled {
        /// Owner of the tree.
        vertex: usize,
        /// The misfiled key.
        key: usize,
    },

    /// Nodes allocated but unreachable from any root, or the reverse.
    #[error("arena holds {live} live nodes but trees reach {reachable}")]
    NodeCount {
        /// Nodes allocated and not released.
        live: usize,
        /// Nodes reachable from the roots.
        reachable: usize,
    },
}

impl Arena {
    /// Check every tree. `directed` decides which keys a vertex may own:
    /// anything but itself when directed, only smaller indices otherwise.
    pub(crate) fn verify(&self, directed: bool) -> Result<(), TreeViolation> {
        let vertex_count = self.tree_count();
        let mut reachable = 0;

        for vertex in 0..vertex_count {
            let Some(root) = self.root(vertex) else {
                continue;
            };
            if self.node(root).color == Color::Red {
                return Err(TreeViolation::RedRoot { vertex });
            }
            self.black_height(vertex, root)?;

            let mut previous: Option<usize> = None;
            for node in self.in_order(vertex) {
                let key = node.key;
                if previous.is_some_and(|previous| previous >= key) {
                    return Err(TreeViolation::KeyOrder { vertex, key });
                }
                let owned = if directed { key != vertex } else { key < vertex };
                if !owned || key >= vertex_count {
                    return Err(TreeViolation::Misfiled { vertex, key });
                }
                previous = Some(key);
                reachable += 1;
            }
        }

        let live = self.live_nodes();
        if live != reachable {
            return Err(TreeViolation::NodeCount { live, reachable });
        }
        Ok(())
    }

    /// Black nodes on every path from `id` down to a leaf, counting `id`.
    fn black_height(&self, vertex: usize, id: NodeId) -> Result<usize, TreeViolation> {
        let node = self.node(id);
        let key = node.key;
        let red = node.color == Color::Red;

        let mut heights = [0; 2];
        for (height, child) in heights.iter_mut().zip([node.left, node.right]) {
            if let Some(child) = child {
                if red && self.is_red(Some(child)) {
                    return Err(TreeViolation::RedChildOfRed { vertex, key });
                }
                *height = self.black_height(vertex, child)?;
            }
        }

        if heights[0] != heights[1] {
            return Err(TreeViolation::BlackHeight { vertex, key });
        }
        Ok(heights[0] + usize::from(!red))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::arena::Slot;

    #[test]
    fn detects_red_root() {
        let mut arena = Arena::new(2);
        let id = arena.alloc(0, 1);
        arena.set(Slot::Root(1), Some(id));

        let expected = TreeViolation::RedRoot { vertex: 1 };
        assert_eq!(arena.verify(false), Err(expected));
    }

    #[test]
    fn detects_black_height_mismatch() {
        let mut arena = Arena::new(3);
        let root = arena.alloc(1, 1);
        let child = arena.alloc(0, 1);
        arena.paint(root, Color::Black);
        arena.paint(child, Color::Black);
        arena.set(Slot::Root(2), Some(root));
        arena.node_mut(root).left = Some(child);

        let expected = TreeViolation::BlackHeight { vertex: 2, key: 1 };
        assert_eq!(arena.verify(false), Err(expected));
    }

    #[test]
    fn detects_misfiled_key() {
        let mut arena = Arena::new(3);
        arena.insert(1, 2, 1);

        let expected = TreeViolation::Misfiled { vertex: 1, key: 2 };
        assert_eq!(arena.verify(false), Err(expected));
        assert!(arena.verify(true).is_ok());
    }

    #[test]
    fn balanced_tree_passes() {
        let mut arena = Arena::new(64);
        for key in (0..63).rev() {
            arena.insert(63, key, 1);
        }
        assert!(arena.verify(false).is_ok());
    }
}
