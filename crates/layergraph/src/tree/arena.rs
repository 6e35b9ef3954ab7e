//! Node storage for the per-vertex red-black trees.
//!
//! Nodes live in one arena and refer to their children by [`NodeId`]. They
//! carry no parent reference; algorithms that need to climb record the
//! [`Slot`]s they descended through instead.

use std::cmp::Ordering;

use crate::base::NO_CONNECTION;

/// Stable handle to a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A place that holds a subtree: a vertex's root, or a node's child link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Root(usize),
    Child(NodeId, Side),
}

impl Slot {
    /// The node owning this slot, if it is a child link.
    #[inline]
    pub(crate) const fn parent(self) -> Option<NodeId> {
        match self {
            Self::Root(_) => None,
            Self::Child(parent, _) => Some(parent),
        }
    }

    /// Which child of [`parent`](Self::parent) this slot is.
    #[inline]
    pub(crate) const fn side(self) -> Option<Side> {
        match self {
            Self::Root(_) => None,
            Self::Child(_, side) => Some(side),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) key: usize,
    pub(crate) color: Color,
    pub(crate) weights: Box<[f32]>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

/// Owns every node of every vertex's tree.
#[derive(Debug, Clone)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    roots: Vec<Option<NodeId>>,
}

impl Arena {
    pub(crate) fn new(vertex_count: usize) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            roots: vec![None; vertex_count],
        }
    }

    /// Number of trees (one per vertex).
    pub(crate) fn tree_count(&self) -> usize {
        self.roots.len()
    }

    /// Number of nodes currently linked into some tree.
    pub(crate) fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub(crate) fn root(&self, vertex: usize) -> Option<NodeId> {
        self.roots[vertex]
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    #[inline]
    pub(crate) fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        let node = self.node(id);
        match side {
            Side::Left => node.left,
            Side::Right => node.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, id: NodeId, side: Side, child: Option<NodeId>) {
        let node = self.node_mut(id);
        match side {
            Side::Left => node.left = child,
            Side::Right => node.right = child,
        }
    }

    /// The subtree currently held by `slot`.
    #[inline]
    pub(crate) fn get(&self, slot: Slot) -> Option<NodeId> {
        match slot {
            Slot::Root(vertex) => self.roots[vertex],
            Slot::Child(parent, side) => self.child(parent, side),
        }
    }

    /// Hang `subtree` in `slot`.
    #[inline]
    pub(crate) fn set(&mut self, slot: Slot, subtree: Option<NodeId>) {
        match slot {
            Slot::Root(vertex) => self.roots[vertex] = subtree,
            Slot::Child(parent, side) => self.set_child(parent, side, subtree),
        }
    }

    /// Absent nodes count as black.
    #[inline]
    pub(crate) fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.node(id).color == Color::Red)
    }

    #[inline]
    pub(crate) fn paint(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    pub(crate) fn weights(&self, id: NodeId) -> &[f32] {
        &self.node(id).weights
    }

    pub(crate) fn weights_mut(&mut self, id: NodeId) -> &mut [f32] {
        &mut self.node_mut(id).weights
    }

    /// A fresh red leaf with every slot set to the sentinel.
    pub(crate) fn alloc(&mut self, key: usize, edge_type_count: usize) -> NodeId {
        if let Some(id) = self.free.pop() {
            let node = self.node_mut(id);
            node.key = key;
            node.color = Color::Red;
            node.left = None;
            node.right = None;
            if node.weights.len() == edge_type_count {
                node.weights.fill(NO_CONNECTION);
            } else {
                node.weights = vec![NO_CONNECTION; edge_type_count].into();
            }
            return id;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            key,
            color: Color::Red,
            weights: vec![NO_CONNECTION; edge_type_count].into(),
            left: None,
            right: None,
        });
        id
    }

    /// Return an unlinked node to the free list.
    pub(crate) fn release(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.left = None;
        node.right = None;
        self.free.push(id);
    }

    /// Standard descent from `vertex`'s root.
    pub(crate) fn find(&self, vertex: usize, key: usize) -> Option<NodeId> {
        let mut cursor = self.roots[vertex];
        while let Some(id) = cursor {
            let node = self.node(id);
            cursor = match key.cmp(&node.key) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Nodes of `vertex`'s tree in ascending key order.
    pub(crate) fn in_order(&self, vertex: usize) -> InOrder<'_> {
        let mut walk = InOrder {
            arena: self,
            stack: Vec::new(),
        };
        walk.push_left_spine(self.roots[vertex]);
        walk
    }
}

pub(crate) struct InOrder<'a> {
    arena: &'a Arena,
    stack: Vec<NodeId>,
}

impl InOrder<'_> {
    fn push_left_spine(&mut self, mut cursor: Option<NodeId>) {
        while let Some(id) = cursor {
            self.stack.push(id);
            cursor = self.arena.node(id).left;
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let arena = self.arena;
        let node = arena.node(id);
        self.push_left_spine(node.right);
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_nodes_are_reused() {
        let mut arena = Arena::new(2);
        let a = arena.alloc(1, 2);
        arena.weights_mut(a)[0] = 3.0;
        arena.release(a);
        assert_eq!(arena.live_nodes(), 0);

        let b = arena.alloc(0, 2);
        assert_eq!(a, b);
        assert_eq!(arena.weights(b), &[NO_CONNECTION, NO_CONNECTION]);
        assert_eq!(arena.node(b).color, Color::Red);
    }

    #[test]
    fn slots_address_roots_and_children() {
        let mut arena = Arena::new(3);
        let parent = arena.alloc(5, 1);
        let child = arena.alloc(2, 1);
        arena.set(Slot::Root(2), Some(parent));
        arena.set(Slot::Child(parent, Side::Left), Some(child));

        assert_eq!(arena.get(Slot::Root(2)), Some(parent));
        assert_eq!(arena.node(parent).left, Some(child));
        assert_eq!(Slot::Child(parent, Side::Left).parent(), Some(parent));
        assert_eq!(Slot::Root(2).side(), None);
        assert_eq!(arena.find(2, 2), Some(child));
        assert_eq!(arena.find(2, 3), None);

        let keys: Vec<_> = arena.in_order(2).map(|node| node.key).collect();
        assert_eq!(keys, vec![2, 5]);
    }
}
