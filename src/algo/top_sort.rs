use crate::algo::visits::{depth_first::*, Sequential};
use crate::graph::{Digraph, UNASSIGNED};
use dsi_progress_logger::ProgressLog;
use unwrap_infallible::UnwrapInfallible;

/// A topological numbering of a directed acyclic graph.
///
/// The numbering is postorder-based: every arc `(a, b)` satisfies
/// `num(a) > num(b)`, so sinks take the smallest numbers. The closure
/// builder relies on this direction: processing nodes by ascending number
/// visits all successors of a node before the node itself, and a node's own
/// number is larger than anything it can reach.
///
/// On a cyclic input the numbering merely reflects DFS exit times; run
/// [`acyclicity`](crate::algo::acyclicity()) first if that matters.
pub struct TopSort {
    postorder: Box<[usize]>,
    num: Box<[usize]>,
}

/// Computes a topological numbering of `graph`.
///
/// Filtered and absent nodes are skipped; they report [`UNASSIGNED`] as
/// their number and do not appear in the order.
pub fn run(graph: impl Digraph, pl: &mut impl ProgressLog) -> TopSort {
    let mut visit = SeqDfs::new(&graph);
    pl.item_name("node");
    pl.expected_updates(Some(graph.num_nodes()));
    pl.start("Computing topological sort");

    let mut postorder = Vec::with_capacity(graph.num_nodes());
    let mut num = vec![UNASSIGNED; graph.node_bound()];

    visit
        .visit_all(
            |event| {
                if let Event::Postvisit { curr, .. } = event {
                    num[curr] = postorder.len();
                    postorder.push(curr);
                }
                Ok::<(), std::convert::Infallible>(())
            },
            pl,
        )
        .unwrap_infallible();

    pl.done();
    TopSort {
        postorder: postorder.into_boxed_slice(),
        num: num.into_boxed_slice(),
    }
}

impl TopSort {
    /// The number of `node`, or [`UNASSIGNED`] if the node was absent or
    /// filtered.
    #[inline(always)]
    pub fn num(&self, node: usize) -> usize {
        self.num[node]
    }

    /// The number of numbered nodes.
    pub fn len(&self) -> usize {
        self.postorder.len()
    }

    /// Whether no node was numbered.
    pub fn is_empty(&self) -> bool {
        self.postorder.is_empty()
    }

    /// The nodes by ascending number, i.e. sinks first.
    pub fn postorder(&self) -> &[usize] {
        &self.postorder
    }

    /// The nodes in topological order, sources first.
    pub fn order(&self) -> impl Iterator<Item = usize> + '_ {
        self.postorder.iter().rev().copied()
    }

    /// The rank of `node` in [`order`](TopSort::order), sources first.
    ///
    /// # Panics
    /// Panics on an unnumbered node.
    pub fn position(&self, node: usize) -> usize {
        let num = self.num[node];
        assert!(num != UNASSIGNED, "node {} is not numbered", node);
        self.postorder.len() - 1 - num
    }
}
