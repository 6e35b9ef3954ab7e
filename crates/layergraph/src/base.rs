//! State shared by every backend: dimensions, direction and versioning.

use crate::error::{GraphError, GraphResult};

/// Weight stored in a slot that carries no connection.
///
/// Real edge weights are finite, so negative infinity never collides with one.
pub const NO_CONNECTION: f32 = f32::NEG_INFINITY;

/// Returns true when `weight` holds a connection.
#[inline]
#[must_use]
pub fn is_connected(weight: f32) -> bool {
    weight != NO_CONNECTION
}

/// Selects which edges count as "existing" during a neighbour scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFilter {
    /// Any stored entry counts, whatever its slots hold.
    Any,
    /// Only entries whose slot for this edge type holds a connection.
    Type(usize),
}

impl EdgeFilter {
    /// Test a stored weight vector against the filter.
    #[inline]
    #[must_use]
    pub fn accepts(self, weights: &[f32]) -> bool {
        match self {
            Self::Any => true,
            Self::Type(edge_type) => is_connected(weights[edge_type]),
        }
    }
}

/// Monotonic version counters.
///
/// `current` advances on every call that changes storage; `last_addition`
/// and `last_removal` remember the version of the latest change of each
/// kind. Zero means "never".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Versions {
    /// Version at which an edge entry was last created.
    pub last_addition: u64,
    /// Version at which an edge entry was last removed.
    pub last_removal: u64,
    /// Latest version.
    pub current: u64,
}

/// Validated construction parameters plus version counters.
#[derive(Debug, Clone)]
pub struct GraphBase {
    vertex_count: usize,
    edge_type_count: usize,
    directed: bool,
    versions: Versions,
}

impl GraphBase {
    /// Validate parameters and create the shared state. Fails with
    /// [`GraphError::InvalidArgument`] when `vertex_count` is zero; an
    /// edge-type count of zero normalizes to one.
    pub fn new(vertex_count: usize, edge_type_count: usize, directed: bool) -> GraphResult<Self> {
        if vertex_count < 1 {
            return Err(GraphError::InvalidArgument(
                "invalid number of vertices (less than 1)".to_owned(),
            ));
        }

        Ok(Self {
            vertex_count,
            edge_type_count: edge_type_count.max(1),
            directed,
            versions: Versions::default(),
        })
    }

    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of weight slots per vertex pair.
    #[must_use]
    pub const fn edge_type_count(&self) -> usize {
        self.edge_type_count
    }

    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    /// Snapshot of the version counters.
    #[must_use]
    pub const fn versions(&self) -> Versions {
        self.versions
    }

    pub(crate) fn check_vertex(&self, vertex: usize) -> GraphResult<()> {
        if vertex < self.vertex_count {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex,
                vertex_count: self.vertex_count,
            })
        }
    }

    pub(crate) fn check_edge_type(&self, edge_type: usize) -> GraphResult<()> {
        if edge_type < self.edge_type_count {
            Ok(())
        } else {
            Err(GraphError::EdgeTypeOutOfRange {
                edge_type,
                edge_type_count: self.edge_type_count,
            })
        }
    }

    pub(crate) fn check_filter(&self, filter: EdgeFilter) -> GraphResult<()> {
        match filter {
            EdgeFilter::Any => Ok(()),
            EdgeFilter::Type(edge_type) => self.check_edge_type(edge_type),
        }
    }

    /// Validate an endpoint pair; self-loops are rejected.
    pub(crate) fn check_pair(&self, v1: usize, v2: usize) -> GraphResult<()> {
        self.check_vertex(v1)?;
        self.check_vertex(v2)?;
        if v1 == v2 {
            return Err(GraphError::SelfLoop { vertex: v1 });
        }
        Ok(())
    }

    /// Map a pair onto `(owner, key)`: the vertex whose storage holds the
    /// entry and the neighbour index it is filed under.
    ///
    /// Directed pairs live with their source. Undirected pairs live with
    /// the larger index.
    #[inline]
    pub(crate) fn owner_and_key(&self, v1: usize, v2: usize) -> (usize, usize) {
        if self.directed || v1 > v2 {
            (v1, v2)
        } else {
            (v2, v1)
        }
    }

    pub(crate) fn record_addition(&mut self) {
        self.versions.current += 1;
        self.versions.last_addition = self.versions.current;
    }

    pub(crate) fn record_removal(&mut self) {
        self.versions.current += 1;
        self.versions.last_removal = self.versions.current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_edge_types_normalize_to_one() {
        let base = GraphBase::new(3, 0, false).unwrap();
        assert_eq!(base.edge_type_count(), 1);
    }

    #[test]
    fn zero_vertices_rejected() {
        let result = GraphBase::new(0, 1, true);
        assert!(matches!(result, Err(GraphError::InvalidArgument(_))));
    }

    #[test]
    fn pair_checks() {
        let base = GraphBase::new(4, 2, false).unwrap();
        assert!(base.check_pair(0, 3).is_ok());

        let self_loop = GraphError::SelfLoop { vertex: 2 };
        assert_eq!(base.check_pair(2, 2), Err(self_loop));

        let out_of_range = GraphError::VertexOutOfRange {
            vertex: 4,
            vertex_count: 4,
        };
        assert_eq!(base.check_pair(1, 4), Err(out_of_range));
        assert!(base.check_edge_type(1).is_ok());
        assert!(base.check_edge_type(2).is_err());
    }

    #[test]
    fn undirected_owner_is_larger_index() {
        let base = GraphBase::new(5, 1, false).unwrap();
        assert_eq!(base.owner_and_key(1, 3), (3, 1));
        assert_eq!(base.owner_and_key(3, 1), (3, 1));

        let directed = GraphBase::new(5, 1, true).unwrap();
        assert_eq!(directed.owner_and_key(1, 3), (1, 3));
    }

    #[test]
    fn versions_advance() {
        let mut base = GraphBase::new(2, 1, true).unwrap();
        base.record_addition();
        base.record_removal();
        base.record_addition();

        let expected = Versions {
            last_addition: 3,
            last_removal: 2,
            current: 3,
        };
        assert_eq!(base.versions(), expected);
    }

    #[test]
    fn filter_accepts() {
        let weights = [NO_CONNECTION, 0.5];
        assert!(EdgeFilter::Any.accepts(&weights));
        assert!(!EdgeFilter::Type(0).accepts(&weights));
        assert!(EdgeFilter::Type(1).accepts(&weights));
    }
}
