mod common;

use std::collections::BTreeSet;

use anyhow::{bail, Result};
use layergraph_core::{MultiGraph, TreeGraph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const OPERATIONS: usize = 10_000;

/// Random interleaved inserts and removes, checking the trees against a
/// reference edge set.
fn fuzz(seed: u64, vertex_count: usize, directed: bool, insert_bias: f64) -> Result<()> {
    common::init_tracing();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = TreeGraph::new(vertex_count, 2, directed)?;
    let mut reference = BTreeSet::new();

    for step in 0..OPERATIONS {
        let v1 = rng.random_range(0..vertex_count);
        let v2 = rng.random_range(0..vertex_count);
        if v1 == v2 {
            continue;
        }
        let key = if directed || v1 > v2 {
            (v1, v2)
        } else {
            (v2, v1)
        };

        if rng.random_bool(insert_bias) {
            graph.get_or_create_edge(v1, v2)?;
            reference.insert(key);
        } else {
            let removed = graph.remove_edge(v1, v2)?;
            let expected = reference.remove(&key);
            assert_eq!(removed, expected, "step {step}: remove {v1}-{v2}");
        }

        if step % 97 == 0 {
            if let Err(violation) = graph.verify() {
                bail!("step {step}: {violation}");
            }
        }
    }

    graph.verify()?;
    assert_eq!(graph.entry_count(), reference.len());
    for owner in 0..vertex_count {
        let expected: Vec<usize> = reference
            .range((owner, 0)..(owner + 1, 0))
            .map(|&(_, key)| key)
            .collect();
        assert_eq!(graph.owned_neighbours(owner)?, expected, "owner {owner}");
    }
    Ok(())
}

#[test]
fn test_fuzz_undirected_dense() -> Result<()> {
    fuzz(0x5eed, 24, false, 0.6)
}

#[test]
fn test_fuzz_directed_dense() -> Result<()> {
    fuzz(0xfeed, 24, true, 0.6)
}

#[test]
fn test_fuzz_undirected_sparse() -> Result<()> {
    fuzz(7, 300, false, 0.5)
}

#[test]
fn test_fuzz_directed_churn() -> Result<()> {
    // Mostly removals once the trees fill up.
    fuzz(42, 12, true, 0.35)
}

#[test]
fn test_single_vertex_tree_drains() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(99);
    let n = 513;
    let mut graph = TreeGraph::new(n, 1, true)?;
    let mut keys: Vec<usize> = (1..n).collect();

    for &key in &keys {
        graph.get_or_create_edge(0, key)?;
    }
    graph.verify()?;

    while !keys.is_empty() {
        let key = keys.swap_remove(rng.random_range(0..keys.len()));
        assert!(graph.remove_edge(0, key)?);
        if keys.len() % 32 == 0 {
            graph.verify()?;
        }
    }
    graph.verify()?;
    assert!(graph.neighbours_from(0)?.is_empty());
    Ok(())
}
