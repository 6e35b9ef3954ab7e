//! Helpers shared across the integration tests.

#![allow(dead_code)]

use layergraph_core::{Graph, GraphResult, Representation};

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// One empty graph per backend, all with the same parameters.
pub fn all_backends(
    vertex_count: usize,
    edge_type_count: usize,
    directed: bool,
) -> GraphResult<Vec<Graph>> {
    Representation::ALL
        .into_iter()
        .map(|repr| Graph::new(repr, vertex_count, edge_type_count, directed))
        .collect()
}

/// Every `(directed, graph)` combination for the given size.
pub fn all_configurations(
    vertex_count: usize,
    edge_type_count: usize,
) -> GraphResult<Vec<(bool, Graph)>> {
    let mut out = Vec::new();
    for directed in [false, true] {
        for graph in all_backends(vertex_count, edge_type_count, directed)? {
            out.push((directed, graph));
        }
    }
    Ok(out)
}
