use super::{acyclic_closure_sorted, CompactClosure};
use crate::algo::sccs;
use crate::algo::top_sort;
use crate::graph::{AdjDigraph, Arc, Digraph, GraphError, UNASSIGNED};
use dsi_progress_logger::ProgressLog;

/// Makes `graph` transitive by adding one direct arc per reachable but not
/// adjacent ordered pair; returns the added arcs.
pub fn close(graph: &mut AdjDigraph, pl: &mut impl ProgressLog) -> Result<Vec<Arc>, GraphError> {
    let t = CompactClosure::compute(&*graph, pl);
    let nodes: Vec<usize> = graph.nodes().collect();
    // Adjacency testing via a stamped mark array: one stamp per source node,
    // no clearing between sources.
    let mut marks = vec![0; graph.node_bound()];
    let mut stamp = 1;
    let mut added = Vec::new();

    pl.item_name("node");
    pl.expected_updates(Some(nodes.len()));
    pl.start("Closing digraph");

    for &u in &nodes {
        let direct: Vec<usize> = graph.successors(u).into_iter().map(|a| a.target).collect();
        for target in direct {
            marks[target] = stamp;
        }
        for &v in &nodes {
            if u != v && marks[v] < stamp && t.reaches(u, v) {
                let id = graph.add_arc(u, v)?;
                added.push(Arc {
                    id,
                    source: u,
                    target: v,
                });
            }
        }
        stamp += 1;
        pl.light_update();
    }

    pl.done();
    Ok(added)
}

/// Removes every redundant arc from the acyclic `graph`; returns the removed
/// arcs.
///
/// An arc is redundant when its endpoints stay connected without it. The
/// input must be acyclic; the removed set is then maximal and the closure of
/// the result equals the closure of the input.
pub fn acyclic_reduce(
    graph: &mut AdjDigraph,
    pl: &mut impl ProgressLog,
) -> Result<Vec<Arc>, GraphError> {
    let ts = top_sort::run(&*graph, pl);
    let mut matrix = acyclic_closure_sorted(&*graph, &ts, pl);
    let filter_skips =
        |arc: Arc| -> bool { graph.filter().is_some_and(|f| f.skip_arc(arc) || f.skip_node(arc.target)) };
    let mut removed = Vec::new();

    pl.item_name("node");
    pl.expected_updates(Some(ts.len()));
    pl.start("Reducing digraph");

    // Sources first; per node the out-arcs go by ascending target rank, so
    // every arc is compared only against the later arcs of the same node.
    for u in ts.order() {
        let mut arcs: Vec<Arc> = graph
            .successors(u)
            .into_iter()
            .filter(|&arc| !filter_skips(arc))
            .collect();
        arcs.sort_by_key(|arc| ts.position(arc.target));
        for (i, &arc) in arcs.iter().enumerate() {
            let v = arc.target;
            if matrix.get(u, v) {
                for later in &arcs[i + 1..] {
                    if matrix.get(v, later.target) {
                        matrix.set(u, later.target, false);
                    }
                }
            } else {
                removed.push(arc);
            }
        }
        pl.light_update();
    }

    for arc in &removed {
        graph.remove_arc(arc.id)?;
    }

    pl.done();
    Ok(removed)
}

/// Computes a transitive reduction of an arbitrary digraph.
///
/// The result is a fresh digraph: the condensation of `graph` reduced as a
/// DAG, with every component of size greater than one re-expanded into a
/// simple directed cycle through its members — the fewest arcs that keep the
/// component strongly connected. The second return value maps every original
/// node to its node in the reduction ([`UNASSIGNED`] for absent or filtered
/// nodes).
pub fn reduce(
    graph: impl Digraph,
    pl: &mut impl ProgressLog,
) -> Result<(AdjDigraph, Box<[usize]>), GraphError> {
    let components = sccs::tarjan(&graph, pl);
    let quotient = components.quotient(&graph, pl);
    let mut reduced = quotient.graph;
    acyclic_reduce(&mut reduced, pl)?;

    let mut node_map = vec![UNASSIGNED; graph.node_bound()];
    for (c, members) in quotient.members.iter().enumerate() {
        node_map[members[0]] = c;
        if members.len() == 1 {
            continue;
        }
        let mut prev = c;
        for &member in &members[1..] {
            let fresh = reduced.add_node();
            node_map[member] = fresh;
            reduced.add_arc(prev, fresh)?;
            prev = fresh;
        }
        reduced.add_arc(prev, c)?;
    }
    Ok((reduced, node_map.into_boxed_slice()))
}
