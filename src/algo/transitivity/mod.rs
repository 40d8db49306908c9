/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Transitivity: compact closure, reachability matrices, transitive closing
//! and reduction.
//!
//! The closure of an arbitrary digraph is computed by condensing it
//! ([sccs](crate::algo::sccs)), numbering the condensation topologically with
//! sinks first ([top_sort](crate::algo::top_sort)), and then walking the
//! condensation by ascending number while each node's reachable set is
//! assembled as a sorted list of number intervals, merged from the lists of
//! its successors. The interval lists of all nodes share one flat pool, and
//! a reachability query is a binary search over one node's slice: `O(log k)`
//! for `k` intervals, with `k` typically small on sparse graphs.
//!
//! [`CompactClosure`] is that structure; [`closure`] expands it into a
//! [`BitMatrix`] for constant-time queries at quadratic space. The acyclic
//! variants skip the condensation. [`close`], [`acyclic_reduce`] and
//! [`reduce`] are the edge-set drivers built on top.
//!
//! Past roughly 46,000 nodes on one chain a quadratic matrix stops being
//! addressable with 32-bit pair arithmetic and stops fitting memory long
//! before that; prefer [`compact_closure`] for anything large.

mod range;
mod reduce;

pub use range::IRange;
pub use reduce::{acyclic_reduce, close, reduce};

use crate::algo::sccs::{self, Sccs, StrongComponents};
use crate::algo::top_sort::{self, TopSort};
use crate::graph::{Digraph, GraphError, UNASSIGNED};
use crate::utils::BitMatrix;
use dsi_progress_logger::ProgressLog;
use range::RangePool;

/// A boolean node-pair matrix.
pub trait NodeMatrix {
    /// The entry for the ordered pair `(u, v)`.
    fn get(&self, u: usize, v: usize) -> bool;

    /// Sets the entry for the ordered pair `(u, v)`.
    ///
    /// Read-only implementations fail with
    /// [`GraphError::UnsupportedOperation`].
    fn set(&mut self, u: usize, v: usize, value: bool) -> Result<(), GraphError>;
}

/// The transitive closure of a digraph in compact, interval-encoded form.
///
/// Queries take shared references only, so a built closure can be consulted
/// from any number of threads at once.
pub struct CompactClosure {
    sccs: Sccs,
    /// Topological number of each quotient node, indexed by component id.
    num: Box<[usize]>,
    pool: RangePool,
}

impl CompactClosure {
    /// Computes the compact closure of `graph`.
    pub fn compute(graph: impl Digraph, pl: &mut impl ProgressLog) -> Self {
        let sccs = sccs::tarjan(&graph, pl);
        let quotient = sccs.quotient(&graph, pl);
        let ts = top_sort::run(&quotient.graph, pl);
        let pool = RangePool::build(&quotient.graph, &ts, pl);
        let num = (0..sccs.num_components()).map(|c| ts.num(c)).collect();
        CompactClosure { sccs, num, pool }
    }

    /// Whether `u` reaches `v`, i.e. `u == v` or a directed path leads from
    /// `u` to `v`.
    ///
    /// False whenever either endpoint is absent or filtered.
    pub fn reaches(&self, u: usize, v: usize) -> bool {
        let components = self.sccs.components();
        let (Some(&cu), Some(&cv)) = (components.get(u), components.get(v)) else {
            return false;
        };
        if cu == UNASSIGNED || cv == UNASSIGNED {
            return false;
        }
        if cu == cv {
            return true;
        }
        self.pool.reaches_num(cu, self.num[cv])
    }

    /// The strongly connected components the closure is built on.
    pub fn sccs(&self) -> &Sccs {
        &self.sccs
    }

    /// The number of quotient nodes.
    pub fn num_components(&self) -> usize {
        self.sccs.num_components()
    }

    /// The total number of intervals in the pool.
    pub fn num_ranges(&self) -> usize {
        self.pool.num_ranges()
    }

    /// The interval slice describing the reachable set of component `c`.
    pub fn component_ranges(&self, c: usize) -> &[IRange] {
        self.pool.slice(c)
    }

    /// The topological number of component `c`; sinks take the smallest
    /// numbers.
    pub fn component_num(&self, c: usize) -> usize {
        self.num[c]
    }
}

impl NodeMatrix for CompactClosure {
    fn get(&self, u: usize, v: usize) -> bool {
        self.reaches(u, v)
    }

    fn set(&mut self, _u: usize, _v: usize, _value: bool) -> Result<(), GraphError> {
        Err(GraphError::UnsupportedOperation(
            "a compact closure is read-only",
        ))
    }
}

impl NodeMatrix for BitMatrix {
    fn get(&self, u: usize, v: usize) -> bool {
        BitMatrix::get(self, u, v)
    }

    fn set(&mut self, u: usize, v: usize, value: bool) -> Result<(), GraphError> {
        BitMatrix::set(self, u, v, value);
        Ok(())
    }
}

/// The transitive closure of a directed acyclic graph, interval-encoded.
///
/// Same structure as [`CompactClosure`] minus the condensation: every node
/// is its own component. The input must be acyclic; on a cyclic input the
/// result is unspecified.
pub struct AcyclicClosure {
    num: Box<[usize]>,
    pool: RangePool,
}

impl AcyclicClosure {
    /// Computes the closure of the acyclic `graph`.
    pub fn compute(graph: impl Digraph, pl: &mut impl ProgressLog) -> Self {
        let ts = top_sort::run(&graph, pl);
        Self::compute_sorted(graph, &ts, pl)
    }

    /// Computes the closure of the acyclic `graph`, reusing a topological
    /// numbering.
    pub fn compute_sorted(graph: impl Digraph, ts: &TopSort, pl: &mut impl ProgressLog) -> Self {
        let pool = RangePool::build(&graph, ts, pl);
        let num = (0..graph.node_bound()).map(|node| ts.num(node)).collect();
        AcyclicClosure { num, pool }
    }

    /// Whether `u` reaches `v`; false whenever either endpoint is absent or
    /// filtered.
    pub fn reaches(&self, u: usize, v: usize) -> bool {
        let (Some(&nu), Some(&nv)) = (self.num.get(u), self.num.get(v)) else {
            return false;
        };
        if nu == UNASSIGNED || nv == UNASSIGNED {
            return false;
        }
        if u == v {
            return true;
        }
        self.pool.reaches_num(u, nv)
    }

    /// The total number of intervals in the pool.
    pub fn num_ranges(&self) -> usize {
        self.pool.num_ranges()
    }
}

/// Computes the compact closure of `graph`; see [`CompactClosure`].
pub fn compact_closure(graph: impl Digraph, pl: &mut impl ProgressLog) -> CompactClosure {
    CompactClosure::compute(graph, pl)
}

/// Computes the reachability matrix of `graph`.
///
/// Entry `(u, v)` is set exactly when `u` reaches `v`. Queries are constant
/// time at the price of quadratic space; see the module documentation for
/// when [`compact_closure`] is the better choice.
pub fn closure(graph: impl Digraph, pl: &mut impl ProgressLog) -> BitMatrix {
    let t = CompactClosure::compute(&graph, pl);
    materialize(&graph, |u, v| t.reaches(u, v), pl)
}

/// Computes the reachability matrix of the acyclic `graph`.
pub fn acyclic_closure(graph: impl Digraph, pl: &mut impl ProgressLog) -> BitMatrix {
    let ts = top_sort::run(&graph, pl);
    acyclic_closure_sorted(graph, &ts, pl)
}

/// Computes the reachability matrix of the acyclic `graph`, reusing a
/// topological numbering.
pub fn acyclic_closure_sorted(
    graph: impl Digraph,
    ts: &TopSort,
    pl: &mut impl ProgressLog,
) -> BitMatrix {
    let t = AcyclicClosure::compute_sorted(&graph, ts, pl);
    materialize(&graph, |u, v| t.reaches(u, v), pl)
}

fn materialize(
    graph: impl Digraph,
    reaches: impl Fn(usize, usize) -> bool,
    pl: &mut impl ProgressLog,
) -> BitMatrix {
    let mut matrix = BitMatrix::new(graph.node_bound());
    let filter = graph.filter();

    pl.item_name("node");
    pl.expected_updates(Some(graph.num_nodes()));
    pl.start("Materializing reachability matrix");

    for u in graph.nodes() {
        if filter.is_some_and(|f| f.skip_node(u)) {
            continue;
        }
        for v in graph.nodes() {
            if reaches(u, v) {
                matrix.set(u, v, true);
            }
        }
        pl.light_update();
    }

    pl.done();
    matrix
}
