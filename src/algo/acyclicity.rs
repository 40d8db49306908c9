use crate::algo::visits::{depth_first::*, Sequential, StoppedWhenDone};
use crate::graph::Digraph;
use dsi_progress_logger::ProgressLog;

/// Runs an acyclicity test.
///
/// Self-loops count as cycles. Filtered nodes and arcs are ignored.
pub fn run(graph: impl Digraph, pl: &mut impl ProgressLog) -> bool {
    let mut visit = SeqPath::new(&graph);
    pl.item_name("node");
    pl.expected_updates(Some(graph.num_nodes()));
    pl.start("Checking acyclicity");

    // Stop the visit as soon as a back arc is found.
    let acyclic = visit.visit_all(
        |event| match event {
            Event::Revisit { on_stack: true, .. } => Err(StoppedWhenDone),
            _ => Ok(()),
        },
        pl,
    );

    pl.done();
    acyclic.is_ok()
}
