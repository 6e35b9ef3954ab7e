//! # layergraph-core
//!
//! Typed multigraph storage over a fixed vertex set. Every pair of distinct
//! vertices can carry one weight vector with a slot per edge type, so a
//! single structure holds several "layers" of edges at once.
//!
//! Three backends implement the same [`MultiGraph`] contract:
//!
//! - [`MatrixGraph`]: dense for directed graphs, lower-triangular otherwise.
//! - [`ListGraph`]: sorted singly-linked list per vertex.
//! - [`TreeGraph`]: red-black tree per vertex.
//!
//! [`Graph`] picks one at runtime, and [`GraphConfig`] builds a [`Graph`]
//! from JSON or `LAYERGRAPH_*` environment variables.
//!
//! ```
//! use layergraph_core::{Graph, MultiGraph, Representation};
//!
//! let mut graph = Graph::new(Representation::List, 4, 2, true)?;
//! graph.set_edge_weight(0, 2, 1, 0.5)?;
//! graph.set_edge_weight(3, 0, 0, 1.0)?;
//!
//! assert_eq!(graph.neighbours(0)?, vec![2, 3]);
//! assert_eq!(graph.neighbours_of_type(0, 1)?, vec![2]);
//! assert_eq!(graph.neighbours_to(0)?, vec![3]);
//! # Ok::<(), layergraph_core::GraphError>(())
//! ```

pub mod base;
pub mod config;
pub mod contract;
pub mod error;
pub mod graph;
pub mod list;
pub mod matrix;
pub mod tree;

pub use base::{is_connected, EdgeFilter, GraphBase, Versions, NO_CONNECTION};
pub use config::GraphConfig;
pub use contract::{Direction, MultiGraph};
pub use error::{ErrorKind, GraphError, GraphResult};
pub use graph::{Graph, Representation};
pub use list::ListGraph;
pub use matrix::MatrixGraph;
pub use tree::{TreeGraph, TreeViolation};
