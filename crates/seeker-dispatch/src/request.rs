//! Path request types.

use seeker_grid::map::Position;
use std::fmt;

/// Monotonically increasing identifier handed out for every command the
/// coordinator accepts, requests and resets alike. Later submissions always
/// compare greater, which is what lets a reset fence off everything that
/// came before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub(crate) u64);

impl RequestId {
    /// The raw sequence number.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Completion callback for a path request, invoked with the simplified
/// waypoints and whether a path was found.
///
/// Runs at most once, on the dispatcher task. A request superseded by a
/// reset drops its callback without ever invoking it.
pub type PathCallback = Box<dyn FnOnce(Vec<Position>, bool) + Send + 'static>;

pub(crate) struct PathRequest {
    pub(crate) id: RequestId,
    pub(crate) start: Position,
    pub(crate) goal: Position,
    pub(crate) callback: PathCallback,
}

impl fmt::Debug for PathRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRequest")
            .field("id", &self.id)
            .field("start", &self.start)
            .field("goal", &self.goal)
            .finish_non_exhaustive()
    }
}
