use thiserror::Error;

/// Errors reported by the graph container and the closure products.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// A node or arc id handed to a mutation operation does not denote what
    /// the operation expects (dead endpoint, unknown id, arc not previously
    /// removed, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The operation is not supported by this value, e.g. writing through
    /// the matrix view of a compact closure.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// A detached cursor observed that the digraph was structurally modified
    /// after the cursor was issued.
    #[error("digraph was structurally modified during iteration")]
    ConcurrentModification,
}
