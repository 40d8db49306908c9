/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use digraph_reach::algo::{acyclicity, top_sort};
use digraph_reach::graph::{AdjDigraph, UNASSIGNED};
use dsi_progress_logger::prelude::*;

#[test]
fn test_chain() -> Result<()> {
    let graph = AdjDigraph::from_arcs(4, [(0, 1), (1, 2), (2, 3)]);

    let ts = top_sort::run(&graph, no_logging![]);

    assert_eq!(ts.len(), 4);
    assert_eq!(ts.postorder(), &[3, 2, 1, 0]);
    assert_eq!(ts.order().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    for node in 0..4 {
        assert_eq!(ts.num(node), 3 - node);
        assert_eq!(ts.position(node), node);
    }

    Ok(())
}

#[test]
fn test_sinks_take_smallest_numbers() -> Result<()> {
    let arcs = [(0, 1), (0, 2), (1, 3), (2, 3), (4, 0), (4, 3)];
    let graph = AdjDigraph::from_arcs(5, arcs);

    let ts = top_sort::run(&graph, no_logging![]);

    for (u, v) in arcs {
        assert!(
            ts.num(u) > ts.num(v),
            "arc ({}, {}) numbered {} -> {}",
            u,
            v,
            ts.num(u),
            ts.num(v)
        );
    }

    // The sources-first order lists every arc source before its target.
    let order: Vec<usize> = ts.order().collect();
    for (u, v) in arcs {
        let pu = order.iter().position(|&n| n == u).unwrap();
        let pv = order.iter().position(|&n| n == v).unwrap();
        assert!(pu < pv);
    }

    Ok(())
}

#[test]
fn test_holes_are_unnumbered() -> Result<()> {
    let mut graph = AdjDigraph::new();
    graph.add_nodes(4);
    graph.add_arc(0, 2)?;
    graph.remove_node(1)?;

    let ts = top_sort::run(&graph, no_logging![]);

    assert_eq!(ts.len(), 3);
    assert_eq!(ts.num(1), UNASSIGNED);
    assert!(ts.num(0) > ts.num(2));

    Ok(())
}

#[test]
fn test_empty_graph() -> Result<()> {
    let graph = AdjDigraph::new();

    let ts = top_sort::run(&graph, no_logging![]);

    assert!(ts.is_empty());
    assert_eq!(ts.order().count(), 0);

    Ok(())
}

#[test]
fn test_acyclicity() -> Result<()> {
    let dag = AdjDigraph::from_arcs(4, [(0, 1), (1, 2), (1, 3), (0, 3)]);
    assert!(acyclicity(&dag, no_logging![]));

    let cyclic = AdjDigraph::from_arcs(3, [(0, 1), (1, 2), (2, 0)]);
    assert!(!acyclicity(&cyclic, no_logging![]));

    let self_loop = AdjDigraph::from_arcs(1, [(0, 0)]);
    assert!(!acyclicity(&self_loop, no_logging![]));

    let empty = AdjDigraph::new();
    assert!(acyclicity(&empty, no_logging![]));

    Ok(())
}
