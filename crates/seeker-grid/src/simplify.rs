//! Path simplification.
//!
//! Raw grid paths carry one waypoint per cell. Followers only need the
//! points where heading changes, so [`simplify_path`] drops every interior
//! waypoint whose incoming and outgoing grid directions match.

use crate::map::point_types::{GridPoint, Position};

/// One step of a planned path: the grid cell and its world-space center.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Grid coordinates of the cell.
    pub cell: GridPoint,
    /// World-space center of the cell.
    pub position: Position,
}

/// Collapses straight runs of a path, keeping only direction changes.
///
/// The first and last waypoints are always kept, so paths of two or fewer
/// points pass through unchanged. Directions are compared as integer grid
/// deltas, which makes the operation exact and idempotent.
#[must_use]
pub fn simplify_path(path: &[Waypoint]) -> Vec<Waypoint> {
    if path.len() <= 2 {
        return path.to_vec();
    }

    let mut simplified = Vec::with_capacity(path.len());
    simplified.push(path[0]);
    for window in path.windows(3) {
        if direction(window[0].cell, window[1].cell) != direction(window[1].cell, window[2].cell) {
            simplified.push(window[1]);
        }
    }
    simplified.push(path[path.len() - 1]);
    simplified
}

fn direction(from: GridPoint, to: GridPoint) -> (isize, isize) {
    (
        to.x as isize - from.x as isize,
        to.y as isize - from.y as isize,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wp(x: usize, y: usize) -> Waypoint {
        Waypoint {
            cell: GridPoint::new(x, y),
            position: Position::new(x as f32, y as f32),
        }
    }

    #[test]
    fn test_straight_run_collapses_to_endpoints() {
        let path: Vec<Waypoint> = (0..6).map(|x| wp(x, 0)).collect();
        let simplified = simplify_path(&path);
        assert_eq!(simplified, vec![wp(0, 0), wp(5, 0)]);
    }

    #[test]
    fn test_diagonal_run_collapses_to_endpoints() {
        let path: Vec<Waypoint> = (0..5).map(|i| wp(i, i)).collect();
        let simplified = simplify_path(&path);
        assert_eq!(simplified, vec![wp(0, 0), wp(4, 4)]);
    }

    #[test]
    fn test_corner_is_kept() {
        let path = vec![wp(0, 0), wp(1, 0), wp(2, 0), wp(2, 1), wp(2, 2)];
        let simplified = simplify_path(&path);
        assert_eq!(simplified, vec![wp(0, 0), wp(2, 0), wp(2, 2)]);
    }

    #[test]
    fn test_zigzag_keeps_every_turn() {
        let path = vec![wp(0, 0), wp(1, 1), wp(2, 0), wp(3, 1), wp(4, 0)];
        let simplified = simplify_path(&path);
        assert_eq!(simplified, path, "alternating directions leave nothing to drop");
    }

    #[test]
    fn test_short_paths_pass_through() {
        assert!(simplify_path(&[]).is_empty());
        assert_eq!(simplify_path(&[wp(3, 3)]), vec![wp(3, 3)]);
        assert_eq!(simplify_path(&[wp(0, 0), wp(1, 1)]), vec![wp(0, 0), wp(1, 1)]);
    }

    #[test]
    fn test_simplify_is_idempotent() {
        // Straight run, a corner, a diagonal leg, then another corner.
        let path = vec![
            wp(0, 0),
            wp(1, 0),
            wp(2, 0),
            wp(3, 1),
            wp(4, 2),
            wp(5, 2),
            wp(6, 2),
            wp(6, 3),
        ];
        let once = simplify_path(&path);
        let twice = simplify_path(&once);
        assert_eq!(once, vec![wp(0, 0), wp(2, 0), wp(4, 2), wp(6, 2), wp(6, 3)]);
        assert_eq!(twice, once, "a simplified path must survive re-simplification");
    }
}
