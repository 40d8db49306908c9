/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Strongly connected components.
//!
//! [`tarjan`] computes the components with a single depth-first visit and
//! also elects a *leader*, one representative node per component.
//! [`Sccs::quotient`] condenses the graph: one node per component, arcs
//! deduplicated, with the member list of every component returned alongside.

mod tarjan;
pub use tarjan::tarjan;

use crate::graph::{AdjDigraph, Digraph, UNASSIGNED};
use dsi_progress_logger::ProgressLog;
use sux::bits::BitVec;

/// The strongly connected components of a graph.
///
/// Component ids are dense in `[0, num_components)`; nodes that are absent
/// or filtered report [`UNASSIGNED`].
pub trait StrongComponents {
    /// The number of strongly connected components.
    fn num_components(&self) -> usize;

    /// The component id of each node, indexed by node id.
    fn components(&self) -> &[usize];

    /// Returns the size of every component.
    fn compute_sizes(&self) -> Box<[usize]> {
        let mut sizes = vec![0; self.num_components()];
        for &component in self.components() {
            if component != UNASSIGNED {
                sizes[component] += 1;
            }
        }
        sizes.into_boxed_slice()
    }
}

/// The result of [`tarjan`]: component ids plus a leader node per component.
pub struct Sccs {
    num_components: usize,
    component: Box<[usize]>,
    leader: Box<[usize]>,
}

impl Sccs {
    pub(crate) fn new(num_components: usize, component: Box<[usize]>, leader: Box<[usize]>) -> Self {
        Sccs {
            num_components,
            component,
            leader,
        }
    }

    /// The leader node of each node's component, indexed by node id; all
    /// members of a component share the same leader, and the leader is a
    /// member. Absent or filtered nodes report [`UNASSIGNED`].
    pub fn leaders(&self) -> &[usize] {
        &self.leader
    }

    /// Condenses `graph`, which must be the graph these components were
    /// computed on.
    ///
    /// The quotient has exactly [`num_components`](Self::num_components)
    /// nodes and the quotient node id of an original node `n` is
    /// `components()[n]`. There is one arc `(c1, c2)` exactly when some
    /// unfiltered original arc joins distinct components `c1` and `c2`;
    /// parallel quotient arcs are suppressed with a
    /// `num_components × num_components` bitmap that is released before
    /// returning. The member list of every component comes back in
    /// [`Quotient::members`].
    pub fn quotient(&self, graph: impl Digraph, pl: &mut impl ProgressLog) -> Quotient {
        let c = self.num_components;
        let mut quot = AdjDigraph::with_capacity(c, c);
        quot.add_nodes(c);
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); c];
        let mut dedup = BitVec::new(c * c);

        pl.item_name("node");
        pl.expected_updates(Some(graph.num_nodes()));
        pl.start("Computing quotient graph");

        let filter = graph.filter();
        for node in graph.nodes() {
            if filter.is_some_and(|f| f.skip_node(node)) {
                continue;
            }
            let nc = self.component[node];
            members[nc].push(node);
            for arc in graph.successors(node) {
                if filter.is_some_and(|f| f.skip_arc(arc) || f.skip_node(arc.target)) {
                    continue;
                }
                let tc = self.component[arc.target];
                if nc == tc {
                    continue;
                }
                if !dedup.get(nc * c + tc) {
                    dedup.set(nc * c + tc, true);
                    quot.add_arc(nc, tc).expect("quotient node ids are dense");
                }
            }
            pl.light_update();
        }

        pl.done();
        Quotient {
            graph: quot,
            members: members.into_boxed_slice(),
        }
    }
}

impl StrongComponents for Sccs {
    fn num_components(&self) -> usize {
        self.num_components
    }

    fn components(&self) -> &[usize] {
        &self.component
    }
}

/// A condensed graph: one node per strongly connected component.
pub struct Quotient {
    /// The condensation; node ids are component ids.
    pub graph: AdjDigraph,
    /// For every quotient node, the original nodes it collapses.
    pub members: Box<[Vec<usize>]>,
}
