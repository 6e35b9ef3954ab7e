//! Error types for graph storage operations.

use thiserror::Error;

/// The two failure classes a graph operation can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A vertex or edge-type index fell outside its valid range.
    Index,
    /// Construction parameters or call arguments were illegal.
    InvalidArgument,
}

/// Errors that can occur in graph storage operations.
///
/// Every variant is raised before storage is touched, so a failed call
/// leaves the graph exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A vertex index was outside `0..vertex_count`.
    #[error("vertex index {vertex} is out of range 0-{}", vertex_count.saturating_sub(1))]
    VertexOutOfRange {
        /// The offending index.
        vertex: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },

    /// An edge type was outside `0..edge_type_count`.
    #[error("edge type {edge_type} is out of range 0-{}", edge_type_count.saturating_sub(1))]
    EdgeTypeOutOfRange {
        /// The offending edge type.
        edge_type: usize,
        /// Number of edge types in the graph.
        edge_type_count: usize,
    },

    /// An edge from a vertex to itself was requested.
    #[error("self-loops are not supported (vertex {vertex})")]
    SelfLoop {
        /// The vertex used as both endpoints.
        vertex: usize,
    },

    /// An illegal argument was passed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A configuration value could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GraphError {
    /// Classify the error as an index error or an invalid argument.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::VertexOutOfRange { .. } | Self::EdgeTypeOutOfRange { .. } => ErrorKind::Index,
            Self::SelfLoop { .. } | Self::InvalidArgument(_) | Self::Config(_) => {
                ErrorKind::InvalidArgument
            }
        }
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GraphError::VertexOutOfRange {
            vertex: 9,
            vertex_count: 5,
        };
        assert_eq!(err.to_string(), "vertex index 9 is out of range 0-4");

        let err = GraphError::EdgeTypeOutOfRange {
            edge_type: 3,
            edge_type_count: 2,
        };
        assert!(err.to_string().contains("0-1"));
    }

    #[test]
    fn kinds() {
        let self_loop = GraphError::SelfLoop { vertex: 1 };
        assert_eq!(self_loop.kind(), ErrorKind::InvalidArgument);

        let config = GraphError::Config("x".to_owned());
        assert_eq!(config.kind(), ErrorKind::InvalidArgument);

        let edge_type = GraphError::EdgeTypeOutOfRange {
            edge_type: 1,
            edge_type_count: 1,
        };
        assert_eq!(edge_type.kind(), ErrorKind::Index);
    }

    #[test]
    fn from_json_error() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let graph_err: GraphError = err.into();
        assert!(matches!(graph_err, GraphError::Config(_)));
    }
}
