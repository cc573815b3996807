//! Coordinator error types.

use thiserror::Error;

/// Errors returned when handing work to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The dispatcher task has stopped; no further commands can be accepted.
    #[error("dispatcher is no longer running")]
    Closed,
}
