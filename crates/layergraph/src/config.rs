//! Construction parameters read from code, JSON or the environment.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, Representation};

/// Environment variable holding the vertex count (required by [`GraphConfig::from_env`]).
pub const ENV_VERTICES: &str = "LAYERGRAPH_VERTICES";
/// Environment variable holding the edge-type count. Defaults to 1.
pub const ENV_EDGE_TYPES: &str = "LAYERGRAPH_EDGE_TYPES";
/// Environment variable holding `true`/`false`. Defaults to undirected.
pub const ENV_DIRECTED: &str = "LAYERGRAPH_DIRECTED";
/// Environment variable naming the backend. Defaults to `tree`.
pub const ENV_REPRESENTATION: &str = "LAYERGRAPH_REPRESENTATION";

fn default_edge_types() -> i64 {
    1
}

/// Parameters for building a [`Graph`].
///
/// Counts are signed so that negative values arriving from JSON or the
/// environment are reported as invalid arguments rather than parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Number of vertices. Must be at least one.
    pub vertex_count: i64,
    /// Weight slots per pair. Zero is treated as one; negative is rejected.
    #[serde(default = "default_edge_types")]
    pub edge_type_count: i64,
    /// Whether `(v1, v2)` and `(v2, v1)` are distinct pairs.
    #[serde(default)]
    pub directed: bool,
    /// Backend to build.
    #[serde(default)]
    pub representation: Representation,
}

impl GraphConfig {
    /// Collect parameters without validating them; [`build`](Self::build)
    /// does that.
    pub fn new(
        vertex_count: i64,
        edge_type_count: i64,
        directed: bool,
        representation: Representation,
    ) -> Self {
        Self {
            vertex_count,
            edge_type_count,
            directed,
            representation,
        }
    }

    /// Parse a JSON object such as
    /// `{"vertex_count": 10, "edge_type_count": 2, "directed": true, "representation": "list"}`.
    pub fn from_json(json: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the `LAYERGRAPH_*` environment variables. Only the vertex count
    /// is required.
    pub fn from_env() -> GraphResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub(crate) fn from_lookup<F>(lookup: F) -> GraphResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vertex_count = lookup(ENV_VERTICES)
            .ok_or_else(|| GraphError::Config(format!("{ENV_VERTICES} is not set")))
            .and_then(|value| parse_var(ENV_VERTICES, &value))?;
        let edge_type_count = match lookup(ENV_EDGE_TYPES) {
            Some(value) => parse_var(ENV_EDGE_TYPES, &value)?,
            None => default_edge_types(),
        };
        let directed = match lookup(ENV_DIRECTED) {
            Some(value) => parse_var(ENV_DIRECTED, &value)?,
            None => false,
        };
        let representation = match lookup(ENV_REPRESENTATION) {
            Some(value) => value.parse()?,
            None => Representation::default(),
        };

        Ok(Self {
            vertex_count,
            edge_type_count,
            directed,
            representation,
        })
    }

    /// Validate the parameters and construct an empty graph.
    pub fn build(&self) -> GraphResult<Graph> {
        if self.vertex_count < 1 {
            return Err(GraphError::InvalidArgument(
                "invalid number of vertices (less than 1)".to_owned(),
            ));
        }
        if self.edge_type_count < 0 {
            return Err(GraphError::InvalidArgument(
                "invalid (negative) number of edge types".to_owned(),
            ));
        }
        let vertex_count = usize::try_from(self.vertex_count)
            .map_err(|err| GraphError::InvalidArgument(err.to_string()))?;
        let edge_type_count = usize::try_from(self.edge_type_count)
            .map_err(|err| GraphError::InvalidArgument(err.to_string()))?;

        debug!(
            vertex_count,
            edge_type_count,
            directed = self.directed,
            representation = %self.representation,
            "Building graph from config"
        );
        let representation = self.representation;
        Graph::new(representation, vertex_count, edge_type_count, self.directed)
    }
}

fn parse_var<T>(name: &str, value: &str) -> GraphResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|err| GraphError::Config(format!("{name}={value:?}: {err}")))
}
