use super::Sequential;
use crate::graph::{Arc, Digraph};
use dsi_progress_logger::ProgressLog;
use sealed::sealed;
use sux::bits::BitVec;
use sux::traits::BitFieldSliceMut;

/// A depth-first visit that tracks known nodes only; [`Event::Revisit`]
/// always reports `on_stack: false`.
pub type SeqDfs<'a, G> = SeqIter<'a, TwoStates, G>;

/// A depth-first visit that also tracks the nodes on the visit path, so
/// [`Event::Revisit`] distinguishes back arcs.
pub type SeqPath<'a, G> = SeqIter<'a, ThreeStates, G>;

/// Events generated by a depth-first visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new visit starts from `root`.
    Init {
        /// The root of the visit.
        root: usize,
    },
    /// `curr` has been discovered.
    Previsit {
        /// The discovered node.
        curr: usize,
        /// The root of the current visit.
        root: usize,
        /// The length of the visit path to `curr`.
        depth: usize,
    },
    /// An arc led to the already known node `curr`.
    Revisit {
        /// The known node.
        curr: usize,
        /// The root of the current visit.
        root: usize,
        /// The length of the visit path to the arc source.
        depth: usize,
        /// Whether `curr` is on the visit path. Always false for
        /// [`SeqDfs`].
        on_stack: bool,
    },
    /// The enumeration of the out-arcs of `curr` is complete.
    Postvisit {
        /// The finished node.
        curr: usize,
        /// The root of the current visit.
        root: usize,
        /// The length of the visit path to `curr`.
        depth: usize,
    },
    /// The visit from `root` is complete.
    Done {
        /// The root of the visit.
        root: usize,
    },
}

type SuccIter<'a, G> = <<G as Digraph>::Successors<'a> as IntoIterator>::IntoIter;

/// Iterative depth-first visit over a [`Digraph`], generic over the node
/// state tracker; use through the [`SeqDfs`] and [`SeqPath`] aliases.
pub struct SeqIter<'a, S, G: Digraph> {
    graph: &'a G,
    /// One frame per node on the visit path: the in-flight successor
    /// enumeration and the node it belongs to.
    stack: Vec<(SuccIter<'a, G>, usize)>,
    state: S,
}

impl<'a, S: NodeStates, G: Digraph> SeqIter<'a, S, G> {
    /// Creates a new visit on the graph.
    pub fn new(graph: &'a G) -> SeqIter<'a, S, G> {
        SeqIter {
            graph,
            stack: Vec::with_capacity(16),
            state: S::new(graph.node_bound()),
        }
    }
}

#[doc(hidden)]
#[sealed]
pub trait NodeStates {
    fn new(n: usize) -> Self;
    fn set_known(&mut self, node: usize);
    fn known(&self, node: usize) -> bool;
    fn set_on_stack(&mut self, node: usize);
    fn set_off_stack(&mut self, node: usize);
    fn on_stack(&self, node: usize) -> bool;
    fn reset(&mut self);
}

#[doc(hidden)]
/// One bit per node: known. Nodes on the visit path are not distinguished.
pub struct TwoStates(BitVec);

#[sealed]
impl NodeStates for TwoStates {
    fn new(n: usize) -> TwoStates {
        TwoStates(BitVec::new(n))
    }
    #[inline(always)]
    fn set_known(&mut self, node: usize) {
        self.0.set(node, true);
    }
    #[inline(always)]
    fn known(&self, node: usize) -> bool {
        self.0.get(node)
    }
    #[inline(always)]
    fn set_on_stack(&mut self, _node: usize) {}
    #[inline(always)]
    fn set_off_stack(&mut self, _node: usize) {}
    #[inline(always)]
    fn on_stack(&self, _node: usize) -> bool {
        false
    }
    fn reset(&mut self) {
        self.0.reset();
    }
}

#[doc(hidden)]
/// Two bits per node: known, and on the visit path.
pub struct ThreeStates(BitVec);

#[sealed]
impl NodeStates for ThreeStates {
    fn new(n: usize) -> ThreeStates {
        ThreeStates(BitVec::new(2 * n))
    }
    #[inline(always)]
    fn set_known(&mut self, node: usize) {
        self.0.set(node * 2, true);
    }
    #[inline(always)]
    fn known(&self, node: usize) -> bool {
        self.0.get(node * 2)
    }
    #[inline(always)]
    fn set_on_stack(&mut self, node: usize) {
        self.0.set(node * 2 + 1, true);
    }
    #[inline(always)]
    fn set_off_stack(&mut self, node: usize) {
        self.0.set(node * 2 + 1, false);
    }
    #[inline(always)]
    fn on_stack(&self, node: usize) -> bool {
        self.0.get(node * 2 + 1)
    }
    fn reset(&mut self) {
        self.0.reset();
    }
}

#[inline(always)]
fn skip_arc<G: Digraph>(graph: &G, arc: Arc) -> bool {
    match graph.filter() {
        Some(filter) => filter.skip_arc(arc) || filter.skip_node(arc.target),
        None => false,
    }
}

impl<S: NodeStates, G: Digraph> Sequential<Event> for SeqIter<'_, S, G> {
    fn visit<E, C: FnMut(Event) -> Result<(), E>>(
        &mut self,
        root: usize,
        mut callback: C,
        pl: &mut impl ProgressLog,
    ) -> Result<(), E> {
        let state = &mut self.state;

        if state.known(root)
            || self
                .graph
                .filter()
                .is_some_and(|filter| filter.skip_node(root))
        {
            return Ok(());
        }

        callback(Event::Init { root })?;
        state.set_known(root);
        callback(Event::Previsit {
            curr: root,
            root,
            depth: 0,
        })?;
        state.set_on_stack(root);
        self.stack
            .push((self.graph.successors(root).into_iter(), root));

        'recurse: loop {
            let depth = self.stack.len();
            let Some((iter, node)) = self.stack.last_mut() else {
                callback(Event::Done { root })?;
                return Ok(());
            };
            let curr = *node;

            for arc in iter {
                if skip_arc(self.graph, arc) {
                    continue;
                }
                let succ = arc.target;
                if state.known(succ) {
                    callback(Event::Revisit {
                        curr: succ,
                        root,
                        depth,
                        on_stack: state.on_stack(succ),
                    })?;
                } else {
                    state.set_known(succ);
                    callback(Event::Previsit {
                        curr: succ,
                        root,
                        depth,
                    })?;
                    state.set_on_stack(succ);
                    self.stack
                        .push((self.graph.successors(succ).into_iter(), succ));
                    continue 'recurse;
                }
            }

            callback(Event::Postvisit {
                curr,
                root,
                depth: depth - 1,
            })?;
            pl.light_update();
            state.set_off_stack(curr);
            self.stack.pop();
        }
    }

    fn visit_all<E, C: FnMut(Event) -> Result<(), E>>(
        &mut self,
        mut callback: C,
        pl: &mut impl ProgressLog,
    ) -> Result<(), E> {
        let graph = self.graph;
        for root in graph.nodes() {
            self.visit(root, &mut callback, pl)?;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.state.reset();
    }
}
