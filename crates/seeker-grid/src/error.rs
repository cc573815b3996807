//! Error types for grid construction and priority-queue operations.

use thiserror::Error;

/// Errors that can occur while building a grid or operating the search queue.
///
/// Path-not-found is deliberately absent: it is a normal outcome carried in
/// [`crate::astar::PathResult`], never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The world size or derived cell counts are unusable.
    #[error("invalid grid dimensions: {0}")]
    InvalidDimensions(&'static str),
    /// The cell radius is not a positive finite number.
    #[error("invalid cell radius: {0}")]
    InvalidCellRadius(&'static str),
    /// Insert on a queue that already holds `capacity` elements. The caller
    /// is expected to size the queue from [`crate::map::grid::Grid::max_size`].
    #[error("priority queue full: capacity {capacity} reached")]
    QueueFull {
        /// The configured capacity that was exceeded.
        capacity: usize,
    },
    /// Extract or peek on an empty queue.
    #[error("priority queue is empty")]
    QueueEmpty,
}
