//! Shared dispatch statistics.
//!
//! Counters live behind a small read/write blackboard so any thread can
//! observe coordinator activity without stopping the dispatcher.

use parking_lot::RwLock;
use std::sync::Arc;

/// Counters describing coordinator activity since spawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Requests accepted by the coordinator.
    pub submitted: u64,
    /// Requests whose callback ran with a found path.
    pub completed: u64,
    /// Requests whose callback ran without a path, including internal
    /// search errors.
    pub failed: u64,
    /// Requests dropped by a reset; their callbacks never ran.
    pub superseded: u64,
    /// Resets applied by the dispatcher.
    pub resets: u64,
    /// Requests currently waiting in the queue.
    pub pending: usize,
}

pub type SharedStats = Arc<RwLock<DispatchStats>>;

/// Copies the current counters out of the blackboard.
pub fn snapshot(stats: &SharedStats) -> DispatchStats {
    *stats.read()
}

pub(crate) fn record_submitted(stats: &SharedStats) {
    stats.write().submitted += 1;
}

pub(crate) fn record_completed(stats: &SharedStats) {
    stats.write().completed += 1;
}

pub(crate) fn record_failed(stats: &SharedStats) {
    stats.write().failed += 1;
}

pub(crate) fn record_superseded(stats: &SharedStats) {
    stats.write().superseded += 1;
}

pub(crate) fn record_reset(stats: &SharedStats) {
    stats.write().resets += 1;
}

pub(crate) fn record_pending(stats: &SharedStats, pending: usize) {
    stats.write().pending = pending;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_a_copy() {
        let stats = SharedStats::default();
        record_submitted(&stats);
        record_submitted(&stats);
        record_completed(&stats);
        record_pending(&stats, 1);

        let first = snapshot(&stats);
        record_failed(&stats);

        assert_eq!(first.submitted, 2);
        assert_eq!(first.completed, 1);
        assert_eq!(first.failed, 0, "snapshot must not track later writes");
        assert_eq!(snapshot(&stats).failed, 1);
    }
}
