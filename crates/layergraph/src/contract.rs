//! The contract every backend implements.
//!
//! Backends supply raw, unvalidated storage primitives through the crate-private
//! [`storage::Storage`] trait. [`MultiGraph`] layers validation and direction
//! routing on top, so every public entry point checks its arguments before
//! any storage is read or written.

use crate::base::{is_connected, EdgeFilter, GraphBase, Versions, NO_CONNECTION};
use crate::error::{GraphError, GraphResult};

pub(crate) mod storage {
    use crate::base::{EdgeFilter, GraphBase};

    /// Raw storage primitives. Callers have already validated every index and
    /// rejected self-loops.
    pub trait Storage {
        fn base(&self) -> &GraphBase;

        fn find_edge(&self, v1: usize, v2: usize) -> Option<&[f32]>;

        fn find_edge_mut(&mut self, v1: usize, v2: usize) -> Option<&mut [f32]>;

        /// Returns the weights for the pair, creating a sentinel-filled entry
        /// (and recording an addition) when there was none.
        fn find_or_create_edge(&mut self, v1: usize, v2: usize) -> &mut [f32];

        /// Removes the entry, recording a removal. Returns false when absent.
        fn delete_edge(&mut self, v1: usize, v2: usize) -> bool;

        /// Neighbours filed in `vertex`'s own storage, ascending.
        fn scan_owned(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>);

        /// Directed only: vertices with an edge pointing at `vertex`, ascending.
        fn scan_incoming(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>);

        /// Directed only: union of outgoing and incoming, ascending, no duplicates.
        fn scan_merged(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>);

        /// Undirected only: every vertex sharing an edge with `vertex`, ascending.
        fn scan_undirected(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>);
    }
}

/// Which way edges are followed in a neighbour query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Edges in either direction.
    Both,
    /// Edges leaving the vertex.
    Outgoing,
    /// Edges arriving at the vertex.
    Incoming,
}

/// Typed multigraph over a fixed vertex set `0..vertex_count`.
///
/// Each ordered (directed) or unordered (undirected) pair of distinct
/// vertices may carry one weight vector with `edge_type_count` slots. A
/// slot equal to [`NO_CONNECTION`] carries no edge of that type.
///
/// Neighbour queries return vertex ids in ascending order. On undirected
/// graphs the three directions coincide. Every method validates its
/// arguments first and returns [`GraphError`] without touching storage
/// when an index is out of range or the pair is a self-loop.
pub trait MultiGraph: storage::Storage {
    fn vertex_count(&self) -> usize {
        self.base().vertex_count()
    }

    fn edge_type_count(&self) -> usize {
        self.base().edge_type_count()
    }

    fn is_directed(&self) -> bool {
        self.base().is_directed()
    }

    /// Current version counters.
    fn versions(&self) -> Versions {
        self.base().versions()
    }

    /// Weights stored for the pair, or `None` when no entry exists.
    fn get_edge(&self, v1: usize, v2: usize) -> GraphResult<Option<&[f32]>> {
        self.base().check_pair(v1, v2)?;
        Ok(self.find_edge(v1, v2))
    }

    /// Weights stored for the pair, creating a sentinel-filled entry if needed.
    fn get_or_create_edge(&mut self, v1: usize, v2: usize) -> GraphResult<&mut [f32]> {
        self.base().check_pair(v1, v2)?;
        Ok(self.find_or_create_edge(v1, v2))
    }

    /// Remove the entry for the pair. Returns whether anything was removed.
    fn remove_edge(&mut self, v1: usize, v2: usize) -> GraphResult<bool> {
        self.base().check_pair(v1, v2)?;
        Ok(self.delete_edge(v1, v2))
    }

    fn has_edge(&self, v1: usize, v2: usize) -> GraphResult<bool> {
        Ok(self.get_edge(v1, v2)?.is_some())
    }

    /// The weight of one edge type, or `None` when that slot is unset.
    fn edge_weight(&self, v1: usize, v2: usize, edge_type: usize) -> GraphResult<Option<f32>> {
        self.base().check_pair(v1, v2)?;
        self.base().check_edge_type(edge_type)?;
        let weight = self.find_edge(v1, v2).map(|weights| weights[edge_type]);
        Ok(weight.filter(|&weight| is_connected(weight)))
    }

    /// Store the weight of one edge type, creating the entry when absent.
    ///
    /// # Errors
    ///
    /// Besides the index checks, rejects a weight that cannot represent a
    /// connection: the sentinel itself, or NaN.
    fn set_edge_weight(
        &mut self,
        v1: usize,
        v2: usize,
        edge_type: usize,
        weight: f32,
    ) -> GraphResult<()> {
        self.base().check_pair(v1, v2)?;
        self.base().check_edge_type(edge_type)?;
        if weight.is_nan() || weight == NO_CONNECTION {
            return Err(GraphError::InvalidArgument(format!(
                "weight {weight} cannot represent a connection"
            )));
        }
        self.find_or_create_edge(v1, v2)[edge_type] = weight;
        Ok(())
    }

    /// Reset one edge type to the sentinel. The entry itself stays.
    fn clear_edge_weight(&mut self, v1: usize, v2: usize, edge_type: usize) -> GraphResult<()> {
        self.base().check_pair(v1, v2)?;
        self.base().check_edge_type(edge_type)?;
        if let Some(weights) = self.find_edge_mut(v1, v2) {
            weights[edge_type] = NO_CONNECTION;
        }
        Ok(())
    }

    /// Neighbours in the given direction that pass `filter`, ascending.
    ///
    /// Undirected graphs ignore `direction`. Every other neighbour query
    /// is a shorthand for this one.
    fn neighbours_by(
        &self,
        vertex: usize,
        direction: Direction,
        filter: EdgeFilter,
    ) -> GraphResult<Vec<usize>> {
        let base = self.base();
        base.check_vertex(vertex)?;
        base.check_filter(filter)?;

        let mut out = Vec::new();
        if !base.is_directed() {
            self.scan_undirected(vertex, filter, &mut out);
            return Ok(out);
        }

        match direction {
            Direction::Both => self.scan_merged(vertex, filter, &mut out),
            Direction::Outgoing => self.scan_owned(vertex, filter, &mut out),
            Direction::Incoming => self.scan_incoming(vertex, filter, &mut out),
        }
        Ok(out)
    }

    /// All neighbours, either direction.
    fn neighbours(&self, vertex: usize) -> GraphResult<Vec<usize>> {
        self.neighbours_by(vertex, Direction::Both, EdgeFilter::Any)
    }

    fn neighbours_of_type(&self, vertex: usize, edge_type: usize) -> GraphResult<Vec<usize>> {
        self.neighbours_by(vertex, Direction::Both, EdgeFilter::Type(edge_type))
    }

    /// Targets of edges leaving `vertex`.
    fn neighbours_from(&self, vertex: usize) -> GraphResult<Vec<usize>> {
        self.neighbours_by(vertex, Direction::Outgoing, EdgeFilter::Any)
    }

    fn neighbours_from_of_type(&self, vertex: usize, edge_type: usize) -> GraphResult<Vec<usize>> {
        self.neighbours_by(vertex, Direction::Outgoing, EdgeFilter::Type(edge_type))
    }

    /// Sources of edges arriving at `vertex`.
    fn neighbours_to(&self, vertex: usize) -> GraphResult<Vec<usize>> {
        self.neighbours_by(vertex, Direction::Incoming, EdgeFilter::Any)
    }

    fn neighbours_to_of_type(&self, vertex: usize, edge_type: usize) -> GraphResult<Vec<usize>> {
        self.neighbours_by(vertex, Direction::Incoming, EdgeFilter::Type(edge_type))
    }

    /// Neighbours filed in `vertex`'s own storage, without reading other vertices.
    ///
    /// Equal to [`neighbours_from`](Self::neighbours_from) on directed graphs.
    /// On undirected graphs only the smaller-index neighbours are returned,
    /// since the larger index owns each pair.
    fn owned_neighbours(&self, vertex: usize) -> GraphResult<Vec<usize>> {
        self.owned_neighbours_by(vertex, EdgeFilter::Any)
    }

    fn owned_neighbours_of_type(&self, vertex: usize, edge_type: usize) -> GraphResult<Vec<usize>> {
        self.owned_neighbours_by(vertex, EdgeFilter::Type(edge_type))
    }

    fn owned_neighbours_by(&self, vertex: usize, filter: EdgeFilter) -> GraphResult<Vec<usize>> {
        self.base().check_vertex(vertex)?;
        self.base().check_filter(filter)?;
        let mut out = Vec::new();
        self.scan_owned(vertex, filter, &mut out);
        Ok(out)
    }
}
