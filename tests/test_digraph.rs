/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use digraph_reach::graph::{AdjDigraph, Digraph, GraphError, GraphFilter, UNASSIGNED};

#[test]
fn test_build_and_iterate() -> Result<()> {
    let mut graph = AdjDigraph::new();
    let nodes = graph.add_nodes(3);
    assert_eq!(nodes, 0..3);
    graph.add_arc(0, 1)?;
    graph.add_arc(0, 2)?;
    graph.add_arc(1, 2)?;

    assert_eq!(graph.num_nodes(), 3);
    assert_eq!(graph.num_arcs(), 3);
    assert_eq!(graph.node_bound(), 3);
    assert_eq!(graph.nodes().collect::<Vec<_>>(), vec![0, 1, 2]);

    let mut targets: Vec<usize> = graph.successors(0).map(|arc| arc.target).collect();
    targets.sort_unstable();
    assert_eq!(targets, vec![1, 2]);
    assert_eq!(graph.out_degree(1), 1);
    assert_eq!(graph.out_degree(2), 0);

    for arc in graph.successors(0) {
        assert_eq!(arc.source, 0);
        assert_eq!(graph.arc(arc.id), Some(arc));
    }

    Ok(())
}

#[test]
fn test_self_loops_and_parallel_arcs() -> Result<()> {
    let mut graph = AdjDigraph::new();
    graph.add_nodes(2);
    graph.add_arc(0, 0)?;
    graph.add_arc(0, 1)?;
    graph.add_arc(0, 1)?;

    assert_eq!(graph.num_arcs(), 3);
    assert_eq!(graph.out_degree(0), 3);
    let loops = graph.successors(0).filter(|arc| arc.target == 0).count();
    assert_eq!(loops, 1);

    Ok(())
}

#[test]
fn test_holes_after_node_removal() -> Result<()> {
    let mut graph = AdjDigraph::new();
    graph.add_nodes(4);
    graph.add_arc(0, 1)?;
    graph.add_arc(1, 2)?;
    graph.add_arc(2, 1)?;
    graph.add_arc(3, 3)?;

    graph.remove_node(1)?;

    assert_eq!(graph.num_nodes(), 3);
    assert_eq!(graph.node_bound(), 4);
    assert!(!graph.has_node(1));
    assert_eq!(graph.nodes().collect::<Vec<_>>(), vec![0, 2, 3]);
    // All arcs incident to the removed node went with it.
    assert_eq!(graph.num_arcs(), 1);
    assert_eq!(graph.out_degree(0), 0);
    assert_eq!(graph.out_degree(2), 0);
    assert_eq!(graph.out_degree(3), 1);

    Ok(())
}

#[test]
fn test_remove_and_relink_arc() -> Result<()> {
    let mut graph = AdjDigraph::new();
    graph.add_nodes(2);
    let a = graph.add_arc(0, 1)?;
    let b = graph.add_arc(1, 0)?;

    graph.remove_arc(a)?;
    assert_eq!(graph.num_arcs(), 1);
    assert_eq!(graph.arc(a), None);
    assert!(matches!(
        graph.remove_arc(a),
        Err(GraphError::InvalidArgument(_))
    ));

    graph.relink_arc(a)?;
    assert_eq!(graph.num_arcs(), 2);
    assert_eq!(graph.successors(0).next().map(|arc| arc.target), Some(1));

    // A live arc cannot be relinked.
    assert!(matches!(
        graph.relink_arc(b),
        Err(GraphError::InvalidArgument(_))
    ));
    // Unknown ids are rejected.
    assert!(matches!(
        graph.remove_arc(17),
        Err(GraphError::InvalidArgument(_))
    ));

    Ok(())
}

#[test]
fn test_invalid_endpoints() -> Result<()> {
    let mut graph = AdjDigraph::new();
    graph.add_nodes(2);
    graph.remove_node(1)?;

    assert!(matches!(
        graph.add_arc(0, 1),
        Err(GraphError::InvalidArgument(_))
    ));
    assert!(matches!(
        graph.add_arc(5, 0),
        Err(GraphError::InvalidArgument(_))
    ));

    // Relinking an arc whose endpoint has since been removed fails too.
    let mut graph = AdjDigraph::new();
    graph.add_nodes(2);
    let a = graph.add_arc(0, 1)?;
    graph.remove_arc(a)?;
    graph.remove_node(1)?;
    assert!(matches!(
        graph.relink_arc(a),
        Err(GraphError::InvalidArgument(_))
    ));

    Ok(())
}

#[test]
fn test_node_cursor_fails_fast() -> Result<()> {
    let mut graph = AdjDigraph::new();
    graph.add_nodes(3);

    let mut cursor = graph.node_cursor();
    assert_eq!(cursor.step(&graph)?, Some(0));

    graph.add_node();
    assert_eq!(cursor.step(&graph), Err(GraphError::ConcurrentModification));

    // A fresh cursor sees the new state.
    let mut cursor = graph.node_cursor();
    let mut seen = Vec::new();
    while let Some(node) = cursor.step(&graph)? {
        seen.push(node);
    }
    assert_eq!(seen, vec![0, 1, 2, 3]);

    Ok(())
}

#[test]
fn test_arc_cursor_fails_fast() -> Result<()> {
    let mut graph = AdjDigraph::new();
    graph.add_nodes(2);
    let a = graph.add_arc(0, 1)?;
    graph.add_arc(0, 0)?;

    let mut cursor = graph.out_cursor(0)?;
    assert!(cursor.step(&graph)?.is_some());

    graph.remove_arc(a)?;
    assert_eq!(cursor.step(&graph), Err(GraphError::ConcurrentModification));

    // Adding a node does not disturb an arc cursor.
    let mut cursor = graph.out_cursor(0)?;
    graph.add_node();
    assert!(cursor.step(&graph)?.is_some());
    assert_eq!(cursor.step(&graph)?, None);

    Ok(())
}

#[test]
fn test_trim_to_size() -> Result<()> {
    let mut graph = AdjDigraph::new();
    graph.add_nodes(5);
    graph.add_arc(0, 2)?;
    graph.add_arc(2, 4)?;
    let dead = graph.add_arc(4, 0)?;
    graph.remove_arc(dead)?;
    graph.remove_node(1)?;
    graph.remove_node(3)?;

    let map = graph.trim_to_size();
    assert_eq!(map.len(), 5);
    assert_eq!(map[1], UNASSIGNED);
    assert_eq!(map[3], UNASSIGNED);

    assert_eq!(graph.num_nodes(), 3);
    assert_eq!(graph.node_bound(), 3);
    assert_eq!(graph.num_arcs(), 2);
    let targets: Vec<usize> = graph.successors(map[0]).map(|arc| arc.target).collect();
    assert_eq!(targets, vec![map[2]]);
    let targets: Vec<usize> = graph.successors(map[2]).map(|arc| arc.target).collect();
    assert_eq!(targets, vec![map[4]]);

    Ok(())
}

struct SkipOdd;

impl GraphFilter for SkipOdd {
    fn skip_node(&self, node: usize) -> bool {
        node % 2 == 1
    }
}

#[test]
fn test_filter_is_exposed() -> Result<()> {
    let mut graph = AdjDigraph::new();
    graph.add_nodes(4);
    graph.add_arc(0, 1)?;

    assert!(graph.filter().is_none());
    graph.set_filter(Box::new(SkipOdd));
    let filter = graph.filter().unwrap();
    assert!(filter.skip_node(1));
    assert!(!filter.skip_node(2));
    assert!(!filter.skip_arc(graph.successors(0).next().unwrap()));

    graph.clear_filter();
    assert!(graph.filter().is_none());

    Ok(())
}
