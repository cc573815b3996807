//! Single-flight path request coordination.
//!
//! [`RequestCoordinator`] accepts path requests from any thread and feeds
//! them, one at a time and in submission order, to a dispatcher task that
//! owns the planner. At most one search runs at any moment; everything else
//! waits in a FIFO queue.
//!
//! A reset atomically replaces all pending work: it carries a new request
//! of its own, cancels everything submitted before it, and puts the
//! replacement at the head of the queue. Cancellation runs on a
//! sequence-number fence: every command carries a monotonically increasing
//! [`RequestId`], and applying a reset raises the fence to the reset's own
//! id. Queued requests below the fence are dropped on the spot. A search
//! already in flight is not interrupted, but the dispatcher re-checks the
//! fence between finishing the search and delivering, so its callback is
//! dropped as superseded instead of firing with a stale path. Superseded
//! callbacks are never invoked.

use crate::error::DispatchError;
use crate::request::{PathCallback, PathRequest, RequestId};
use crate::stats::{self, DispatchStats, SharedStats};

use seeker_grid::astar::AStarPlanner;
use seeker_grid::map::{Grid, Position};
use seeker_grid::simplify::simplify_path;

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

enum Command {
    Request(PathRequest),
    Reset(PathRequest),
}

/// Cloneable handle for submitting path requests and resets.
///
/// All clones feed the same dispatcher. Submission never blocks and never
/// waits for a search; results come back through the per-request callback.
#[derive(Clone)]
pub struct RequestCoordinator {
    commands: UnboundedSender<Command>,
    next_id: Arc<AtomicU64>,
    stats: SharedStats,
}

impl RequestCoordinator {
    /// Spawns the dispatcher task on the current tokio runtime and returns
    /// the submission handle together with the task's join handle.
    ///
    /// The dispatcher keeps running until every coordinator clone has been
    /// dropped, then drains the remaining queue and exits.
    pub fn spawn(grid: Arc<Grid>) -> (Self, JoinHandle<()>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        let stats = SharedStats::default();

        let dispatcher = Dispatcher {
            planner: AStarPlanner::new(&grid),
            grid,
            commands: receiver,
            queue: VecDeque::new(),
            fence: 0,
            stats: Arc::clone(&stats),
        };
        let handle = tokio::spawn(dispatcher.run());

        (
            Self {
                commands,
                next_id: Arc::new(AtomicU64::new(1)),
                stats,
            },
            handle,
        )
    }

    /// Queues a path search from `start` to `goal`.
    ///
    /// `callback` runs on the dispatcher task with the simplified world-space
    /// waypoints and a flag saying whether a path was found; an unreachable
    /// goal is reported as `(vec![], false)`, not as an error. If a reset
    /// supersedes the request first, the callback is dropped uninvoked.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Closed`] when the dispatcher has stopped.
    pub fn request_path(
        &self,
        start: Position,
        goal: Position,
        callback: PathCallback,
    ) -> Result<RequestId, DispatchError> {
        let id = self.allocate_id();
        let request = PathRequest {
            id,
            start,
            goal,
            callback,
        };
        self.commands
            .send(Command::Request(request))
            .map_err(|_| DispatchError::Closed)?;
        stats::record_submitted(&self.stats);
        debug!(%id, %start, %goal, "path request submitted");
        Ok(id)
    }

    /// Replaces all pending work with a single new request.
    ///
    /// Every request submitted before this call is superseded: queued
    /// requests are dropped without running, and a search already in flight
    /// finishes but has its result discarded at the delivery boundary.
    /// Superseded callbacks never run. The replacement request becomes the
    /// sole queue entry and is processed immediately; its `callback` behaves
    /// exactly as in [`RequestCoordinator::request_path`].
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Closed`] when the dispatcher has stopped.
    pub fn reset_path(
        &self,
        start: Position,
        goal: Position,
        callback: PathCallback,
    ) -> Result<RequestId, DispatchError> {
        let id = self.allocate_id();
        let request = PathRequest {
            id,
            start,
            goal,
            callback,
        };
        self.commands
            .send(Command::Reset(request))
            .map_err(|_| DispatchError::Closed)?;
        stats::record_submitted(&self.stats);
        debug!(%id, %start, %goal, "reset submitted");
        Ok(id)
    }

    /// Snapshot of the coordinator's activity counters.
    #[must_use]
    pub fn stats(&self) -> DispatchStats {
        stats::snapshot(&self.stats)
    }

    fn allocate_id(&self) -> RequestId {
        RequestId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

/// Owns the planner and processes commands serially.
struct Dispatcher {
    planner: AStarPlanner,
    grid: Arc<Grid>,
    commands: UnboundedReceiver<Command>,
    queue: VecDeque<PathRequest>,
    fence: u64,
    stats: SharedStats,
}

impl Dispatcher {
    async fn run(mut self) {
        info!("path dispatcher started");

        loop {
            let request = match self.queue.pop_front() {
                Some(request) => request,
                None => match self.commands.recv().await {
                    Some(command) => {
                        self.apply(command);
                        continue;
                    }
                    // All handles dropped and the queue is drained.
                    None => break,
                },
            };
            self.update_pending();

            // Pick up commands that arrived while this request waited, so a
            // reset issued before the search starts still fences it.
            self.drain_commands();
            if request.id.value() < self.fence {
                self.supersede(request);
                continue;
            }

            let PathRequest {
                id,
                start,
                goal,
                callback,
            } = request;
            debug!(%id, %start, %goal, "search started");
            let outcome = self.planner.plan(&self.grid, start, goal);

            // Park once so commands sent while the search ran can land, then
            // re-check the fence before delivering.
            tokio::task::yield_now().await;
            self.drain_commands();
            if id.value() < self.fence {
                stats::record_superseded(&self.stats);
                debug!(%id, "result superseded by reset, callback dropped");
                continue;
            }

            match outcome {
                Ok(result) => {
                    let total_cost = result.total_cost;
                    let nodes_explored = result.nodes_explored;
                    match result.path {
                        Some(path) => {
                            let waypoints: Vec<Position> =
                                simplify_path(&path).iter().map(|w| w.position).collect();
                            debug!(
                                %id,
                                waypoints = waypoints.len(),
                                total_cost = total_cost.unwrap_or(0),
                                nodes_explored,
                                "path delivered"
                            );
                            stats::record_completed(&self.stats);
                            callback(waypoints, true);
                        }
                        None => {
                            debug!(%id, nodes_explored, "no path found");
                            stats::record_failed(&self.stats);
                            callback(Vec::new(), false);
                        }
                    }
                }
                Err(e) => {
                    error!(%id, error = %e, "search failed internally");
                    stats::record_failed(&self.stats);
                    callback(Vec::new(), false);
                }
            }
        }

        info!("path dispatcher stopped");
    }

    /// Applies every command already sitting in the channel without waiting.
    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Request(request) => {
                if request.id.value() < self.fence {
                    // Sent before a reset that has already been applied.
                    self.supersede(request);
                } else {
                    self.queue.push_back(request);
                    self.update_pending();
                }
            }
            Command::Reset(replacement) => {
                self.fence = self.fence.max(replacement.id.value());
                stats::record_reset(&self.stats);

                // The replacement goes to the head of the queue and through
                // the same fence filter as everything behind it: delivery
                // order can lag allocation order when handles race, so only
                // requests numbered below the fence are dropped, and a later
                // reset applied first supersedes this one's replacement too.
                let mut pending = std::mem::take(&mut self.queue);
                pending.push_front(replacement);
                for request in pending {
                    if request.id.value() < self.fence {
                        self.supersede(request);
                    } else {
                        self.queue.push_back(request);
                    }
                }
                self.update_pending();
                debug!(fence = self.fence, "reset applied, queue replaced");
            }
        }
    }

    fn supersede(&self, request: PathRequest) {
        stats::record_superseded(&self.stats);
        debug!(id = %request.id, "request superseded by reset, callback dropped");
    }

    fn update_pending(&self) {
        stats::record_pending(&self.stats, self.queue.len());
    }
}
