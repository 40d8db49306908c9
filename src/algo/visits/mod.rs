/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Sequential visits on digraphs.
//!
//! A visit walks a [`Digraph`](crate::graph::Digraph) and reports
//! [events](depth_first::Event) to a callback returning `Result<(), E>`; an
//! `Err` interrupts the visit and is propagated to the caller. An
//! interruption is not necessarily an error condition: a visit that has
//! already computed its answer bails out with [`StoppedWhenDone`], and
//! callbacks that cannot fail use `E = Infallible` and unwrap the result with
//! [`unwrap_infallible::UnwrapInfallible`].
//!
//! Visits honor the filter attached to the graph: filtered nodes are never
//! discovered and filtered arcs are never traversed. All visits take a
//! mutable reference to an implementation of
//! [`ProgressLog`](dsi_progress_logger::ProgressLog), invoked once per
//! postvisit; passing `no_logging![]` compiles the logging away.

pub mod depth_first;

use dsi_progress_logger::ProgressLog;
use thiserror::Error;

/// The result of the visit was computed without completing the visit; for
/// example, during an acyclicity test a single arc pointing into the visit
/// path settles the answer.
#[derive(Error, Debug)]
#[error("stopped when done")]
pub struct StoppedWhenDone;

/// A sequential visit generating events of type `A`.
pub trait Sequential<A> {
    /// Visits the graph from the given root, if the root has not been seen
    /// yet.
    fn visit<E, C: FnMut(A) -> Result<(), E>>(
        &mut self,
        root: usize,
        callback: C,
        pl: &mut impl ProgressLog,
    ) -> Result<(), E>;

    /// Visits the whole graph, starting a visit from every live unfiltered
    /// node that is still unknown.
    fn visit_all<E, C: FnMut(A) -> Result<(), E>>(
        &mut self,
        callback: C,
        pl: &mut impl ProgressLog,
    ) -> Result<(), E>;

    /// Resets the visit state, making it possible to reuse the visit.
    fn reset(&mut self);
}
