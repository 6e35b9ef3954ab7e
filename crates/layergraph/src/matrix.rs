//! Dense matrix backend.
//!
//! One flat array holds `edge_type_count` weight slots for every addressable
//! pair. Directed graphs address `(v1, v2)` at `v1 * n + v2`. Undirected
//! graphs pack the lower triangle: the pair is filed at
//! `row * (row + 1) / 2 + col` with `row = max(v1, v2)` and `col = min(v1, v2)`.
//!
//! A parallel presence flag per pair records which entries exist, so an
//! entry created but not yet written behaves like a freshly allocated node
//! in the other backends.

use std::collections::TryReserveError;

use tracing::{debug, trace};

use crate::base::{EdgeFilter, GraphBase, NO_CONNECTION};
use crate::contract::storage::Storage;
use crate::contract::MultiGraph;
use crate::error::{GraphError, GraphResult};

/// Typed multigraph stored as a dense (or triangular) weight matrix.
#[derive(Debug, Clone)]
pub struct MatrixGraph {
    base: GraphBase,
    weights: Vec<f32>,
    present: Vec<bool>,
}

impl MatrixGraph {
    /// Create a graph with every slot set to [`NO_CONNECTION`]. A matrix too
    /// large to address or allocate is an invalid argument.
    pub fn new(vertex_count: usize, edge_type_count: usize, directed: bool) -> GraphResult<Self> {
        let base = GraphBase::new(vertex_count, edge_type_count, directed)?;
        let n = base.vertex_count();

        let pairs = if directed {
            n.checked_mul(n)
        } else {
            n.checked_add(1)
                .and_then(|next| n.checked_mul(next))
                .map(|cells| cells / 2)
        };
        let slots = pairs.and_then(|pairs| pairs.checked_mul(base.edge_type_count()));
        let (Some(pairs), Some(slots)) = (pairs, slots) else {
            return Err(too_large(n));
        };

        let weights = filled(slots, NO_CONNECTION).map_err(|_| too_large(n))?;
        let present = filled(pairs, false).map_err(|_| too_large(n))?;

        debug!(
            vertex_count = n,
            edge_type_count = base.edge_type_count(),
            directed,
            representation = "matrix",
            "Created graph"
        );

        Ok(Self {
            base,
            weights,
            present,
        })
    }

    #[inline]
    fn pair_index(&self, v1: usize, v2: usize) -> usize {
        if self.base.is_directed() {
            v1 * self.base.vertex_count() + v2
        } else {
            let (row, col) = if v1 > v2 { (v1, v2) } else { (v2, v1) };
            triangle_row(row) + col
        }
    }

    #[inline]
    fn slots(&self, pair: usize) -> &[f32] {
        let k = self.base.edge_type_count();
        &self.weights[pair * k..(pair + 1) * k]
    }

    #[inline]
    fn slots_mut(&mut self, pair: usize) -> &mut [f32] {
        let k = self.base.edge_type_count();
        &mut self.weights[pair * k..(pair + 1) * k]
    }

    #[inline]
    fn passes(&self, pair: usize, filter: EdgeFilter) -> bool {
        self.present[pair] && filter.accepts(self.slots(pair))
    }
}

/// Offset of the first cell of `row` in the packed lower triangle.
#[inline]
const fn triangle_row(row: usize) -> usize {
    row * (row + 1) / 2
}

/// A vector of `len` copies of `value`, failing instead of aborting when
/// the allocation is impossible.
fn filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, TryReserveError> {
    let mut cells = Vec::new();
    cells.try_reserve_exact(len)?;
    cells.resize(len, value);
    Ok(cells)
}

fn too_large(vertex_count: usize) -> GraphError {
    GraphError::InvalidArgument(format!("matrix for {vertex_count} vertices is too large"))
}

impl Storage for MatrixGraph {
    fn base(&self) -> &GraphBase {
        &self.base
    }

    fn find_edge(&self, v1: usize, v2: usize) -> Option<&[f32]> {
        let pair = self.pair_index(v1, v2);
        self.present[pair].then(|| self.slots(pair))
    }

    fn find_edge_mut(&mut self, v1: usize, v2: usize) -> Option<&mut [f32]> {
        let pair = self.pair_index(v1, v2);
        if self.present[pair] {
            Some(self.slots_mut(pair))
        } else {
            None
        }
    }

    fn find_or_create_edge(&mut self, v1: usize, v2: usize) -> &mut [f32] {
        let pair = self.pair_index(v1, v2);
        if !self.present[pair] {
            self.present[pair] = true;
            self.base.record_addition();
            let version = self.base.versions().current;
            trace!(v1, v2, version, "Created edge");
        }
        self.slots_mut(pair)
    }

    fn delete_edge(&mut self, v1: usize, v2: usize) -> bool {
        let pair = self.pair_index(v1, v2);
        if !self.present[pair] {
            return false;
        }

        self.present[pair] = false;
        self.slots_mut(pair).fill(NO_CONNECTION);
        self.base.record_removal();
        let version = self.base.versions().current;
        trace!(v1, v2, version, "Removed edge");
        true
    }

    fn scan_owned(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        let n = self.base.vertex_count();
        if self.base.is_directed() {
            let row = vertex * n;
            out.extend((0..n).filter(|&v2| self.passes(row + v2, filter)));
        } else {
            let row = triangle_row(vertex);
            out.extend((0..vertex).filter(|&v2| self.passes(row + v2, filter)));
        }
    }

    fn scan_incoming(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        let n = self.base.vertex_count();
        out.extend((0..n).filter(|&v2| self.passes(v2 * n + vertex, filter)));
    }

    fn scan_merged(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        let n = self.base.vertex_count();
        let outgoing = |v2: usize| self.passes(vertex * n + v2, filter);
        let incoming = |v2: usize| self.passes(v2 * n + vertex, filter);
        out.extend((0..n).filter(|&v2| outgoing(v2) || incoming(v2)));
    }

    fn scan_undirected(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        // Smaller neighbours sit in this vertex's row, larger ones in its column.
        self.scan_owned(vertex, filter, out);
        let n = self.base.vertex_count();
        let in_column = |&v2: &usize| self.passes(triangle_row(v2) + vertex, filter);
        out.extend((vertex + 1..n).filter(in_column));
    }
}

impl MultiGraph for MatrixGraph {}
