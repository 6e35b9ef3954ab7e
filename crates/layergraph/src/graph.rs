//! A graph whose backend is chosen at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::base::{EdgeFilter, GraphBase};
use crate::contract::storage::Storage;
use crate::contract::MultiGraph;
use crate::error::{GraphError, GraphResult};
use crate::list::ListGraph;
use crate::matrix::MatrixGraph;
use crate::tree::TreeGraph;

/// The three interchangeable storage layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Dense (directed) or lower-triangular (undirected) weight matrix.
    Matrix,
    /// Sorted per-vertex linked lists.
    List,
    /// One red-black tree per vertex.
    #[default]
    Tree,
}

impl Representation {
    /// Every representation, in declaration order.
    pub const ALL: [Self; 3] = [Self::Matrix, Self::List, Self::Tree];

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Matrix => "matrix",
            Self::List => "list",
            Self::Tree => "tree",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Representation {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "matrix" => Ok(Self::Matrix),
            "list" => Ok(Self::List),
            "tree" => Ok(Self::Tree),
            other => Err(GraphError::Config(format!(
                "unknown representation '{other}' (expected matrix, list or tree)"
            ))),
        }
    }
}

/// A typed multigraph with any of the three backends behind it.
#[derive(Debug, Clone)]
pub enum Graph {
    /// Dense or triangular matrix backend.
    Matrix(MatrixGraph),
    /// Sorted linked-list backend.
    List(ListGraph),
    /// Red-black tree backend.
    Tree(TreeGraph),
}

impl Graph {
    /// Create an empty graph with the chosen backend.
    pub fn new(
        representation: Representation,
        vertex_count: usize,
        edge_type_count: usize,
        directed: bool,
    ) -> GraphResult<Self> {
        Ok(match representation {
            Representation::Matrix => {
                Self::Matrix(MatrixGraph::new(vertex_count, edge_type_count, directed)?)
            }
            Representation::List => {
                Self::List(ListGraph::new(vertex_count, edge_type_count, directed)?)
            }
            Representation::Tree => {
                Self::Tree(TreeGraph::new(vertex_count, edge_type_count, directed)?)
            }
        })
    }

    /// Which backend this graph uses.
    #[must_use]
    pub const fn representation(&self) -> Representation {
        match self {
            Self::Matrix(_) => Representation::Matrix,
            Self::List(_) => Representation::List,
            Self::Tree(_) => Representation::Tree,
        }
    }
}

impl From<MatrixGraph> for Graph {
    fn from(graph: MatrixGraph) -> Self {
        Self::Matrix(graph)
    }
}

impl From<ListGraph> for Graph {
    fn from(graph: ListGraph) -> Self {
        Self::List(graph)
    }
}

impl From<TreeGraph> for Graph {
    fn from(graph: TreeGraph) -> Self {
        Self::Tree(graph)
    }
}

macro_rules! dispatch {
    ($graph:expr, $inner:ident => $call:expr) => {
        match $graph {
            Graph::Matrix($inner) => $call,
            Graph::List($inner) => $call,
            Graph::Tree($inner) => $call,
        }
    };
}

impl Storage for Graph {
    fn base(&self) -> &GraphBase {
        dispatch!(self, g => g.base())
    }

    fn find_edge(&self, v1: usize, v2: usize) -> Option<&[f32]> {
        dispatch!(self, g => g.find_edge(v1, v2))
    }

    fn find_edge_mut(&mut self, v1: usize, v2: usize) -> Option<&mut [f32]> {
        dispatch!(self, g => g.find_edge_mut(v1, v2))
    }

    fn find_or_create_edge(&mut self, v1: usize, v2: usize) -> &mut [f32] {
        dispatch!(self, g => g.find_or_create_edge(v1, v2))
    }

    fn delete_edge(&mut self, v1: usize, v2: usize) -> bool {
        dispatch!(self, g => g.delete_edge(v1, v2))
    }

    fn scan_owned(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        dispatch!(self, g => g.scan_owned(vertex, filter, out));
    }

    fn scan_incoming(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        dispatch!(self, g => g.scan_incoming(vertex, filter, out));
    }

    fn scan_merged(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        dispatch!(self, g => g.scan_merged(vertex, filter, out));
    }

    fn scan_undirected(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        dispatch!(self, g => g.scan_undirected(vertex, filter, out));
    }
}

impl MultiGraph for Graph {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_representation() {
        let matrix: Representation = "Matrix".parse().unwrap();
        assert_eq!(matrix, Representation::Matrix);
        let list: Representation = " list ".parse().unwrap();
        assert_eq!(list, Representation::List);

        let unknown = "hash".parse::<Representation>();
        assert!(matches!(unknown, Err(GraphError::Config(_))));
        for repr in Representation::ALL {
            assert_eq!(repr.to_string().parse::<Representation>().unwrap(), repr);
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Representation::Tree).unwrap();
        assert_eq!(json, "\"tree\"");
        let parsed: Representation = serde_json::from_str("\"matrix\"").unwrap();
        assert_eq!(parsed, Representation::Matrix);
    }

    #[test]
    fn dispatches_to_chosen_backend() {
        for repr in Representation::ALL {
            let mut graph = Graph::new(repr, 4, 2, true).unwrap();
            assert_eq!(graph.representation(), repr);
            graph.set_edge_weight(1, 3, 1, 0.25).unwrap();
            assert_eq!(graph.edge_weight(1, 3, 1).unwrap(), Some(0.25));
            assert_eq!(graph.neighbours_to(3).unwrap(), vec![1]);
            assert!(graph.remove_edge(1, 3).unwrap());
            assert!(!graph.has_edge(1, 3).unwrap());
        }
    }
}
