//! Replays one operation sequence against every backend and compares what
//! they report after each step.

#![allow(clippy::float_cmp)]

mod common;

use anyhow::{ensure, Result};
use layergraph_core::{Direction, EdgeFilter, Graph, GraphResult, MultiGraph};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy)]
enum Op {
    Create(usize, usize),
    Set(usize, usize, usize, f32),
    Clear(usize, usize, usize),
    Remove(usize, usize),
}

impl Op {
    fn apply(self, graph: &mut Graph) -> GraphResult<()> {
        match self {
            Self::Create(v1, v2) => graph.get_or_create_edge(v1, v2).map(drop),
            Self::Set(v1, v2, t, weight) => graph.set_edge_weight(v1, v2, t, weight),
            Self::Clear(v1, v2, t) => graph.clear_edge_weight(v1, v2, t),
            Self::Remove(v1, v2) => graph.remove_edge(v1, v2).map(drop),
        }
    }
}

/// Every neighbour query, for every vertex and filter.
fn snapshot(graph: &Graph) -> GraphResult<Vec<Vec<usize>>> {
    let filters = std::iter::once(EdgeFilter::Any)
        .chain((0..graph.edge_type_count()).map(EdgeFilter::Type));
    let mut out = Vec::new();
    for filter in filters {
        for vertex in 0..graph.vertex_count() {
            for direction in [Direction::Both, Direction::Outgoing, Direction::Incoming] {
                out.push(graph.neighbours_by(vertex, direction, filter)?);
            }
            out.push(graph.owned_neighbours_by(vertex, filter)?);
        }
    }
    Ok(out)
}

fn assert_equivalent(graphs: &[Graph], step: usize) -> Result<()> {
    let (first, rest) = graphs.split_first().expect("at least one backend");
    let expected = snapshot(first)?;
    for graph in rest {
        ensure!(
            snapshot(graph)? == expected,
            "step {step}: {} disagrees with {}",
            graph.representation(),
            first.representation()
        );
        ensure!(
            graph.versions() == first.versions(),
            "step {step}: versions differ"
        );
    }

    let n = first.vertex_count();
    for v1 in 0..n {
        for v2 in (0..n).filter(|&v2| v2 != v1) {
            let weights = first.get_edge(v1, v2)?;
            for graph in rest {
                let same = graph.get_edge(v1, v2)? == weights;
                ensure!(same, "step {step}: edge {v1}-{v2}");
            }
        }
    }
    Ok(())
}

fn random_op(rng: &mut StdRng, vertex_count: usize, edge_type_count: usize) -> Op {
    let v1 = rng.random_range(0..vertex_count);
    let v2 = (v1 + rng.random_range(1..vertex_count)) % vertex_count;
    let edge_type = rng.random_range(0..edge_type_count);
    match rng.random_range(0..10) {
        0..=2 => Op::Create(v1, v2),
        3..=5 => Op::Set(v1, v2, edge_type, rng.random_range(-5.0..5.0)),
        6 => Op::Clear(v1, v2, edge_type),
        _ => Op::Remove(v1, v2),
    }
}

fn replay(seed: u64, vertex_count: usize, edge_type_count: usize, directed: bool) -> Result<()> {
    common::init_tracing();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graphs = common::all_backends(vertex_count, edge_type_count, directed)?;

    for step in 0..400 {
        let op = random_op(&mut rng, vertex_count, edge_type_count);
        for graph in &mut graphs {
            op.apply(graph)?;
        }
        assert_equivalent(&graphs, step)?;
    }
    Ok(())
}

#[test]
fn test_replay_undirected() -> Result<()> {
    replay(1, 9, 3, false)
}

#[test]
fn test_replay_directed() -> Result<()> {
    replay(2, 9, 3, true)
}

#[test]
fn test_replay_single_type() -> Result<()> {
    replay(3, 16, 1, true)?;
    replay(4, 16, 1, false)
}

fn arb_op(vertex_count: usize, edge_type_count: usize) -> impl Strategy<Value = Op> {
    let pair = (0..vertex_count, 1..vertex_count)
        .prop_map(move |(v1, offset)| (v1, (v1 + offset) % vertex_count));
    prop_oneof![
        pair.clone().prop_map(|(v1, v2)| Op::Create(v1, v2)),
        (pair.clone(), 0..edge_type_count, -10.0f32..10.0)
            .prop_map(|((v1, v2), t, w)| Op::Set(v1, v2, t, w)),
        (pair.clone(), 0..edge_type_count)
            .prop_map(|((v1, v2), t)| Op::Clear(v1, v2, t)),
        pair.prop_map(|(v1, v2)| Op::Remove(v1, v2)),
    ]
}

proptest! {
    #[test]
    fn backends_agree(
        directed in any::<bool>(),
        ops in prop::collection::vec(arb_op(6, 2), 1..80),
    ) {
        let mut graphs = common::all_backends(6, 2, directed).expect("valid parameters");
        for (step, op) in ops.into_iter().enumerate() {
            for graph in &mut graphs {
                op.apply(graph).expect("generated ops are valid");
            }
            let agreed = assert_equivalent(&graphs, step);
            prop_assert!(agreed.is_ok(), "{:?}", agreed);
        }
    }
}
