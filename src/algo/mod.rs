/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Graph algorithms: visits, strongly connected components, topological
//! numbering, and transitivity (compact closure, dense closure, closing and
//! reduction drivers).

pub mod sccs;
pub mod top_sort;
pub mod transitivity;
pub mod visits;

mod acyclicity;
pub use acyclicity::run as acyclicity;
