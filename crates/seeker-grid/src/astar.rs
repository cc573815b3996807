//! A* search over a walkability grid.
//!
//! [`AStarPlanner`] owns a per-node state arena keyed by grid index and
//! reuses it across searches: every search bumps a generation counter and
//! entries stamped with an older generation read as untouched. Parent links
//! are arena indices, so reconstructing a path is pointer-free and the
//! planner holds no references into the grid between calls.

use crate::error::GridError;
use crate::heap::MinHeap;
use crate::map::grid::Grid;
use crate::map::point_types::{GridPoint, Position};
use crate::simplify::Waypoint;

use std::fmt;

use tracing::{debug, trace};

/// Cost of one orthogonal step, in tenths of a cell.
pub const STRAIGHT_COST: u32 = 10;
/// Cost of one diagonal step, in tenths of a cell.
pub const DIAGONAL_COST: u32 = 14;

/// Sentinel parent index for the start of a path.
const NO_PARENT: usize = usize::MAX;

/// Represents the result of an A* pathfinding operation with metadata.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    /// The computed path, if one was found.
    pub path: Option<Vec<Waypoint>>,
    /// The total cost of the path.
    pub total_cost: Option<u32>,
    /// The number of nodes explored during the search.
    pub nodes_explored: usize,
    /// The length of the path (number of waypoints).
    pub path_length: usize,
}

impl PathResult {
    /// Creates a new PathResult for a successful path.
    pub fn success(path: Vec<Waypoint>, total_cost: u32, nodes_explored: usize) -> Self {
        let path_length = path.len();
        Self {
            path: Some(path),
            total_cost: Some(total_cost),
            nodes_explored,
            path_length,
        }
    }

    /// Creates a new PathResult for a failed path search.
    pub fn failure(nodes_explored: usize) -> Self {
        Self {
            path: None,
            total_cost: None,
            nodes_explored,
            path_length: 0,
        }
    }

    /// Returns true if a path was found.
    pub fn is_success(&self) -> bool {
        self.path.is_some()
    }

    /// Returns the path if one was found.
    pub fn into_path(self) -> Option<Vec<Waypoint>> {
        self.path
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(_) => write!(
                f,
                "PathResult {{ success: true, path_length: {}, total_cost: {}, nodes_explored: {} }}",
                self.path_length,
                self.total_cost.unwrap_or(0),
                self.nodes_explored
            ),
            None => write!(
                f,
                "PathResult {{ success: false, nodes_explored: {} }}",
                self.nodes_explored
            ),
        }
    }
}

/// Calculates the octile distance between two grid points, in tenths of a
/// cell: diagonal steps cost [`DIAGONAL_COST`], the orthogonal remainder
/// [`STRAIGHT_COST`] each.
///
/// For 8-connected movement with these step costs this is admissible and
/// consistent, and exact on obstacle-free ground.
#[must_use]
pub fn octile_distance(a: GridPoint, b: GridPoint) -> u32 {
    let dx = a.x.abs_diff(b.x) as u32;
    let dy = a.y.abs_diff(b.y) as u32;
    let (min, max) = if dx < dy { (dx, dy) } else { (dy, dx) };
    DIAGONAL_COST * min + STRAIGHT_COST * (max - min)
}

/// Open-set entry. The derived order is lexicographic over (f, h, index),
/// which is total and collision-free: equal-f ties prefer the entry closer
/// to the goal, and equal-h ties fall back to the arena index, so extraction
/// order is fully deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    f: u32,
    h: u32,
    index: usize,
}

/// Per-node search state, valid only while `generation` matches the
/// planner's current search.
#[derive(Debug, Clone, Copy)]
struct NodeState {
    g: u32,
    h: u32,
    parent: usize,
    open: bool,
    generation: u64,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            g: 0,
            h: 0,
            parent: NO_PARENT,
            open: false,
            generation: 0,
        }
    }
}

/// Reusable A* planner over a [`Grid`].
///
/// The planner is cheap to keep around: successive [`AStarPlanner::plan`]
/// calls reuse the state arena without clearing it. It is not `Sync` by
/// contract, one planner serves one search at a time.
#[derive(Debug)]
pub struct AStarPlanner {
    states: Vec<NodeState>,
    generation: u64,
}

impl AStarPlanner {
    /// Creates a planner sized for `grid`.
    #[must_use]
    pub fn new(grid: &Grid) -> Self {
        Self {
            states: vec![NodeState::default(); grid.max_size()],
            generation: 0,
        }
    }

    /// Plans a path between two world positions.
    ///
    /// Endpoints are resolved to grid cells first; an endpoint landing on a
    /// blocked cell is substituted with the first neighboring walkable cell
    /// that sits strictly closer to the opposite endpoint. When none
    /// qualifies the blocked cell is kept as-is and the search runs anyway,
    /// typically exhausting the reachable region. A failed search is a
    /// normal outcome reported through [`PathResult::failure`], not an
    /// error.
    ///
    /// # Errors
    ///
    /// Propagates [`GridError`] from open-set operations. With the open set
    /// sized to `grid.max_size()` and one live entry per node these cannot
    /// trigger; they are not mapped to a failure result so a genuine logic
    /// fault would surface instead of masquerading as "no path".
    pub fn plan(
        &mut self,
        grid: &Grid,
        start: Position,
        goal: Position,
    ) -> Result<PathResult, GridError> {
        if self.states.len() != grid.max_size() {
            self.states.clear();
            self.states.resize(grid.max_size(), NodeState::default());
            self.generation = 0;
        }
        self.generation += 1;
        let generation = self.generation;

        let start_point = resolve_endpoint(grid, start, goal);
        let goal_point = resolve_endpoint(grid, goal, start);

        let start_index = grid.index_of(start_point);
        let goal_index = grid.index_of(goal_point);

        if start_index == goal_index {
            let node = grid.node(start_index);
            let path = vec![Waypoint {
                cell: node.point,
                position: node.position,
            }];
            return Ok(PathResult::success(path, 0, 0));
        }

        // One live heap entry per open node (improvements update in place),
        // so max_size is a hard capacity bound.
        let mut open = MinHeap::new(grid.max_size());
        let mut nodes_explored = 0usize;

        let start_h = octile_distance(start_point, goal_point);
        self.states[start_index] = NodeState {
            g: 0,
            h: start_h,
            parent: NO_PARENT,
            open: true,
            generation,
        };
        open.insert(OpenEntry {
            f: start_h,
            h: start_h,
            index: start_index,
        })?;

        while !open.is_empty() {
            let current_index = open.extract_min()?.index;
            self.states[current_index].open = false;
            nodes_explored += 1;

            if current_index == goal_index {
                let path = self.reconstruct(grid, goal_index);
                let total_cost = self.states[goal_index].g;
                debug!(
                    total_cost,
                    path_length = path.len(),
                    nodes_explored,
                    "path found"
                );
                return Ok(PathResult::success(path, total_cost, nodes_explored));
            }

            let current_point = grid.node(current_index).point;
            let current_g = self.states[current_index].g;

            for neighbor_point in grid.neighbors(current_point) {
                let neighbor_index = grid.index_of(neighbor_point);
                if !grid.node(neighbor_index).walkable {
                    continue;
                }

                let state = self.states[neighbor_index];
                let visited = state.generation == generation;
                if visited && !state.open {
                    // Closed under a consistent heuristic: already optimal.
                    continue;
                }

                let tentative_g = current_g + octile_distance(current_point, neighbor_point);
                if !visited {
                    let h = octile_distance(neighbor_point, goal_point);
                    self.states[neighbor_index] = NodeState {
                        g: tentative_g,
                        h,
                        parent: current_index,
                        open: true,
                        generation,
                    };
                    open.insert(OpenEntry {
                        f: tentative_g + h,
                        h,
                        index: neighbor_index,
                    })?;
                } else if tentative_g < state.g {
                    let stale = OpenEntry {
                        f: state.g + state.h,
                        h: state.h,
                        index: neighbor_index,
                    };
                    self.states[neighbor_index].g = tentative_g;
                    self.states[neighbor_index].parent = current_index;
                    let updated = open.update(
                        &stale,
                        OpenEntry {
                            f: tentative_g + state.h,
                            h: state.h,
                            index: neighbor_index,
                        },
                    );
                    debug_assert!(updated, "open node must have a live heap entry");
                }
            }
        }

        debug!(%start, %goal, nodes_explored, "no path found");
        Ok(PathResult::failure(nodes_explored))
    }

    /// Walks parent links from the goal back to the start and reverses.
    fn reconstruct(&self, grid: &Grid, goal_index: usize) -> Vec<Waypoint> {
        let mut path = Vec::new();
        let mut index = goal_index;
        while index != NO_PARENT {
            let node = grid.node(index);
            path.push(Waypoint {
                cell: node.point,
                position: node.position,
            });
            index = self.states[index].parent;
        }
        path.reverse();
        path
    }
}

/// Maps a queried world position to a grid cell, preferring walkable ones.
///
/// A blocked cell falls back to the first of its walkable neighbors (in
/// enumeration order, so resolution is deterministic) whose center sits
/// strictly closer to `toward` than the blocked cell's own center. If no
/// neighbor qualifies the blocked cell is returned unchanged; the search
/// still runs against it and usually fails.
fn resolve_endpoint(grid: &Grid, query: Position, toward: Position) -> GridPoint {
    let node = grid.node_at(query);
    if node.walkable {
        return node.point;
    }

    let current_distance = node.position.distance_to(toward);
    for neighbor_point in grid.neighbors(node.point) {
        let neighbor = grid.node(grid.index_of(neighbor_point));
        if neighbor.walkable && neighbor.position.distance_to(toward) < current_distance {
            trace!(
                %query,
                substitute = %neighbor_point,
                "blocked endpoint cell, using a closer walkable neighbor"
            );
            return neighbor_point;
        }
    }

    trace!(%query, cell = %node.point, "blocked endpoint cell has no closer walkable neighbor");
    node.point
}
