//! Red-black tree backend.
//!
//! Every vertex owns a red-black tree keyed by neighbour index, with each
//! node carrying its weight vector inline. Undirected pairs are filed under
//! the larger index only. Lookups and updates on one vertex are
//! logarithmic in its degree.
//!
//! There is no reverse index. Incoming and undirected queries search the
//! other vertices' trees for a back-reference, and the merged directed
//! query interleaves those searches with an in-order walk of the vertex's own
//! tree so the result comes out sorted.
//!
//! # Example
//!
//! ```
//! use layergraph_core::{MultiGraph, TreeGraph};
//!
//! let mut graph = TreeGraph::new(5, 1, false)?;
//! for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 4)] {
//!     graph.set_edge_weight(a, b, 0, 1.0)?;
//! }
//! assert_eq!(graph.neighbours(2)?, vec![1, 3]);
//! graph.verify().expect("red-black invariants hold");
//! # Ok::<(), layergraph_core::GraphError>(())
//! ```

mod arena;
mod rebalance;
mod verify;

use tracing::{debug, trace};

use crate::base::{EdgeFilter, GraphBase};
use crate::contract::storage::Storage;
use crate::contract::MultiGraph;
use crate::error::GraphResult;

use self::arena::Arena;
pub use self::verify::TreeViolation;

/// Typed multigraph stored as one red-black tree per vertex.
#[derive(Debug, Clone)]
pub struct TreeGraph {
    base: GraphBase,
    arena: Arena,
}

impl TreeGraph {
    /// Create an empty graph.
    pub fn new(vertex_count: usize, edge_type_count: usize, directed: bool) -> GraphResult<Self> {
        let base = GraphBase::new(vertex_count, edge_type_count, directed)?;
        debug!(
            vertex_count,
            edge_type_count = base.edge_type_count(),
            directed,
            representation = "tree",
            "Created graph"
        );
        let arena = Arena::new(vertex_count);
        Ok(Self { base, arena })
    }

    /// Check the red-black and filing invariants of every vertex's tree,
    /// reporting the first [`TreeViolation`] found.
    pub fn verify(&self) -> Result<(), TreeViolation> {
        self.arena.verify(self.base.is_directed())
    }

    /// Number of entries stored across all trees.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.arena.live_nodes()
    }

    /// Whether `source`'s tree holds an entry for `target` passing the filter.
    fn points_to(&self, source: usize, target: usize, filter: EdgeFilter) -> bool {
        self.arena
            .find(source, target)
            .is_some_and(|id| filter.accepts(self.arena.weights(id)))
    }
}

impl Storage for TreeGraph {
    fn base(&self) -> &GraphBase {
        &self.base
    }

    fn find_edge(&self, v1: usize, v2: usize) -> Option<&[f32]> {
        let (owner, key) = self.base.owner_and_key(v1, v2);
        self.arena.find(owner, key).map(|id| self.arena.weights(id))
    }

    fn find_edge_mut(&mut self, v1: usize, v2: usize) -> Option<&mut [f32]> {
        let (owner, key) = self.base.owner_and_key(v1, v2);
        let id = self.arena.find(owner, key)?;
        Some(self.arena.weights_mut(id))
    }

    fn find_or_create_edge(&mut self, v1: usize, v2: usize) -> &mut [f32] {
        let (owner, key) = self.base.owner_and_key(v1, v2);
        let (id, created) = self.arena.insert(owner, key, self.base.edge_type_count());
        if created {
            self.base.record_addition();
            let version = self.base.versions().current;
            trace!(v1, v2, version, "Created edge");
        }
        self.arena.weights_mut(id)
    }

    fn delete_edge(&mut self, v1: usize, v2: usize) -> bool {
        let (owner, key) = self.base.owner_and_key(v1, v2);
        if !self.arena.remove(owner, key) {
            return false;
        }
        self.base.record_removal();
        let version = self.base.versions().current;
        trace!(v1, v2, version, "Removed edge");
        true
    }

    fn scan_owned(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        out.extend(
            self.arena
                .in_order(vertex)
                .filter(|node| filter.accepts(&node.weights))
                .map(|node| node.key),
        );
    }

    fn scan_incoming(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        let n = self.base.vertex_count();
        let incoming = |&source: &usize| self.points_to(source, vertex, filter);
        out.extend((0..n).filter(incoming));
    }

    fn scan_merged(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        // Search the gaps between consecutive own keys in ascending order.
        let incoming = |&source: &usize| self.points_to(source, vertex, filter);
        let mut gap_start = 0;
        for node in self.arena.in_order(vertex) {
            out.extend((gap_start..node.key).filter(incoming));
            if filter.accepts(&node.weights) || incoming(&node.key) {
                out.push(node.key);
            }
            gap_start = node.key + 1;
        }
        let n = self.base.vertex_count();
        out.extend((gap_start..n).filter(incoming));
    }

    fn scan_undirected(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        self.scan_owned(vertex, filter, out);
        let n = self.base.vertex_count();
        let files_pair = |&larger: &usize| self.points_to(larger, vertex, filter);
        out.extend((vertex + 1..n).filter(files_pair));
    }
}

impl MultiGraph for TreeGraph {}
