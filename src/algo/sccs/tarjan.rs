use super::Sccs;
use crate::algo::visits::{depth_first::*, Sequential};
use crate::graph::{Arc, Digraph, GraphFilter, UNASSIGNED};
use dsi_progress_logger::ProgressLog;
use unwrap_infallible::UnwrapInfallible;

/// Computes the strongly connected components of a graph with a single
/// depth-first visit.
///
/// This is the leader-election variant of Tarjan's algorithm: discovery
/// pushes a node onto a stack of open nodes and makes it its own leader; when
/// a node finishes, its out-arcs are enumerated a second time and every arc
/// into a still-open node may replace the leader by one with a smaller
/// discovery number. A node that finishes as its own leader closes its
/// component, popping the stack down to itself and assigning the next dense
/// component id.
///
/// Filtered nodes keep [`UNASSIGNED`] as component and leader.
pub fn tarjan(graph: impl Digraph, pl: &mut impl ProgressLog) -> Sccs {
    let mut visit = Tarjan::new(&graph);
    visit.run(pl);
    Sccs::new(
        visit.num_components,
        visit.component.into_boxed_slice(),
        visit.leader.into_boxed_slice(),
    )
}

struct Tarjan<'a, G: Digraph> {
    graph: &'a G,
    component: Vec<usize>,
    leader: Vec<usize>,
    start_num: Vec<usize>,
    open: Vec<usize>,
    num_components: usize,
}

#[inline(always)]
fn skip(filter: Option<&dyn GraphFilter>, arc: Arc) -> bool {
    filter.is_some_and(|f| f.skip_arc(arc) || f.skip_node(arc.target))
}

impl<'a, G: Digraph> Tarjan<'a, G> {
    fn new(graph: &'a G) -> Tarjan<'a, G> {
        let bound = graph.node_bound();
        Tarjan {
            graph,
            component: vec![UNASSIGNED; bound],
            leader: vec![UNASSIGNED; bound],
            start_num: vec![0; bound],
            open: Vec::with_capacity(16),
            num_components: 0,
        }
    }

    fn run(&mut self, pl: &mut impl ProgressLog) {
        let graph = self.graph;
        let mut visit = SeqDfs::new(graph);
        pl.item_name("node");
        pl.expected_updates(Some(graph.num_nodes()));
        pl.start("Computing strongly connected components");

        let filter = graph.filter();
        let component = &mut self.component;
        let leader = &mut self.leader;
        let start_num = &mut self.start_num;
        let open = &mut self.open;
        let num_components = &mut self.num_components;
        let mut clock = 0;

        visit
            .visit_all(
                |event| {
                    match event {
                        Event::Previsit { curr, .. } => {
                            start_num[curr] = clock;
                            clock += 1;
                            leader[curr] = curr;
                            open.push(curr);
                        }
                        Event::Postvisit { curr, .. } => {
                            for arc in graph.successors(curr) {
                                if skip(filter, arc) {
                                    continue;
                                }
                                let target = arc.target;
                                if component[target] == UNASSIGNED
                                    && start_num[leader[curr]] >= start_num[leader[target]]
                                {
                                    leader[curr] = leader[target];
                                }
                            }
                            if leader[curr] == curr {
                                while let Some(node) = open.pop() {
                                    component[node] = *num_components;
                                    leader[node] = curr;
                                    if node == curr {
                                        break;
                                    }
                                }
                                *num_components += 1;
                            }
                        }
                        _ => {}
                    }
                    Ok::<(), std::convert::Infallible>(())
                },
                pl,
            )
            .unwrap_infallible();

        pl.done();
    }
}
