//! Walkability grid for path planning.
//!
//! This module discretizes a bounded rectangle of the world into fixed-size
//! cells. Each cell's walkability is probed exactly once at build time via a
//! caller-supplied obstacle query; after that the grid is immutable and can be
//! shared freely between searches.

use crate::error::GridError;
use crate::map::point_types::{GridPoint, Position};
use tracing::debug;

/// Immutable configuration consumed once by [`Grid::build`].
///
/// `origin` is the world-space center of the covered rectangle; the grid
/// extends `world_width / 2` and `world_height / 2` in each direction from
/// it. `cell_radius` is half the edge length of one cell.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// World-space center of the grid.
    pub origin: Position,
    /// Covered world width.
    pub world_width: f32,
    /// Covered world height.
    pub world_height: f32,
    /// Half the edge length of one cell.
    pub cell_radius: f32,
}

impl GridConfig {
    /// Creates a new `GridConfig`.
    #[must_use]
    pub const fn new(origin: Position, world_width: f32, world_height: f32, cell_radius: f32) -> Self {
        Self {
            origin,
            world_width,
            world_height,
            cell_radius,
        }
    }
}

/// One grid cell: fixed walkability plus its world-space center and grid
/// coordinates. Created once at build time and never mutated; all per-search
/// bookkeeping lives in [`crate::astar::AStarPlanner`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Whether a path may pass through this cell.
    pub walkable: bool,
    /// World-space center of the cell.
    pub position: Position,
    /// Grid coordinates of the cell.
    pub point: GridPoint,
}

/// Fixed-size walkability map over a bounded 2D world.
///
/// Nodes are stored in one contiguous row-major arena so searches can key
/// their shadow state by plain indices (see [`Grid::index_of`]).
#[derive(Debug, Clone)]
pub struct Grid {
    config: GridConfig,
    size_x: usize,
    size_y: usize,
    cell_diameter: f32,
    bottom_left: Position,
    nodes: Vec<Node>,
}

impl Grid {
    /// Builds the grid from `config`, probing `obstacle_query(center,
    /// cell_radius)` exactly once per cell. The query returns `true` when an
    /// obstacle overlaps the probe circle; such cells become unwalkable for
    /// the lifetime of the grid.
    ///
    /// Cell counts per axis are `round(world_size / (2 * cell_radius))`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidCellRadius`] for a non-positive or
    /// non-finite radius, and [`GridError::InvalidDimensions`] for an
    /// unusable world size (non-positive, non-finite, smaller than one cell,
    /// or overflowing the cell arena).
    pub fn build<F>(config: GridConfig, mut obstacle_query: F) -> Result<Self, GridError>
    where
        F: FnMut(Position, f32) -> bool,
    {
        if !config.cell_radius.is_finite() || config.cell_radius <= 0.0 {
            return Err(GridError::InvalidCellRadius(
                "cell radius must be a positive finite number",
            ));
        }
        if !config.world_width.is_finite()
            || !config.world_height.is_finite()
            || config.world_width <= 0.0
            || config.world_height <= 0.0
        {
            return Err(GridError::InvalidDimensions(
                "world size must be positive and finite",
            ));
        }
        if !config.origin.x.is_finite() || !config.origin.y.is_finite() {
            return Err(GridError::InvalidDimensions("origin must be finite"));
        }

        let cell_diameter = config.cell_radius * 2.0;
        let size_x = (config.world_width / cell_diameter).round() as usize;
        let size_y = (config.world_height / cell_diameter).round() as usize;
        if size_x == 0 || size_y == 0 {
            return Err(GridError::InvalidDimensions(
                "world size is smaller than one cell",
            ));
        }
        let total_cells = size_x.checked_mul(size_y).ok_or(GridError::InvalidDimensions(
            "grid dimensions too large, cell arena would overflow",
        ))?;

        let bottom_left = Position::new(
            config.origin.x - config.world_width / 2.0,
            config.origin.y - config.world_height / 2.0,
        );

        let mut nodes = Vec::with_capacity(total_cells);
        let mut walkable_cells = 0usize;
        for y in 0..size_y {
            for x in 0..size_x {
                let position = Position::new(
                    bottom_left.x + (x as f32 + 0.5) * cell_diameter,
                    bottom_left.y + (y as f32 + 0.5) * cell_diameter,
                );
                let walkable = !obstacle_query(position, config.cell_radius);
                if walkable {
                    walkable_cells += 1;
                }
                nodes.push(Node {
                    walkable,
                    position,
                    point: GridPoint::new(x, y),
                });
            }
        }

        debug!(size_x, size_y, walkable_cells, "walkability grid built");

        Ok(Self {
            config,
            size_x,
            size_y,
            cell_diameter,
            bottom_left,
            nodes,
        })
    }

    /// Returns the node containing `position`.
    ///
    /// Out-of-bounds positions silently clamp to the nearest edge cell; this
    /// never fails or indexes out of range.
    #[must_use]
    pub fn node_at(&self, position: Position) -> &Node {
        let index = self.index_of(self.point_at(position));
        &self.nodes[index]
    }

    /// Maps a world position to the grid coordinates of its containing cell,
    /// clamping out-of-bounds positions to the nearest edge cell.
    #[must_use]
    pub fn point_at(&self, position: Position) -> GridPoint {
        // Float-to-int `as` casts saturate, so negative offsets, NaN, and
        // infinities all clamp instead of wrapping.
        let x = (((position.x - self.bottom_left.x) / self.cell_diameter) as usize)
            .min(self.size_x - 1);
        let y = (((position.y - self.bottom_left.y) / self.cell_diameter) as usize)
            .min(self.size_y - 1);
        GridPoint::new(x, y)
    }

    /// Returns the up-to-8 in-bounds Moore neighbors of `point`, excluding
    /// `point` itself, in a fixed deterministic order.
    ///
    /// Diagonal neighbors are returned even when both flanking orthogonal
    /// cells are blocked; callers that need strict corner rules must filter
    /// the result themselves.
    #[must_use]
    pub fn neighbors(&self, point: GridPoint) -> Vec<GridPoint> {
        let mut neighbors = Vec::with_capacity(8);
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let Some(x) = point.x.checked_add_signed(dx) else {
                    continue;
                };
                let Some(y) = point.y.checked_add_signed(dy) else {
                    continue;
                };
                if x < self.size_x && y < self.size_y {
                    neighbors.push(GridPoint::new(x, y));
                }
            }
        }
        neighbors
    }

    /// Linear arena index of an in-bounds grid point.
    #[must_use]
    pub fn index_of(&self, point: GridPoint) -> usize {
        point.y * self.size_x + point.x
    }

    /// Returns the node at an arena index (see [`Grid::index_of`]).
    #[must_use]
    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// All nodes in row-major order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Total cell count; the capacity bound for a per-search open set.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.nodes.len()
    }

    /// Cell count along the x axis.
    #[must_use]
    pub fn size_x(&self) -> usize {
        self.size_x
    }

    /// Cell count along the y axis.
    #[must_use]
    pub fn size_y(&self) -> usize {
        self.size_y
    }

    /// Edge length of one cell.
    #[must_use]
    pub fn cell_diameter(&self) -> f32 {
        self.cell_diameter
    }

    /// The configuration the grid was built from.
    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Grid ({}x{}, cell radius {:.3})",
            self.size_x, self.size_y, self.config.cell_radius
        )?;
        writeln!(
            f,
            "Origin: ({:.3}, {:.3})",
            self.config.origin.x, self.config.origin.y
        )?;

        // Highest y first so the output matches world orientation.
        for y in (0..self.size_y).rev() {
            for x in 0..self.size_x {
                let node = &self.nodes[self.index_of(GridPoint::new(x, y))];
                write!(f, "{} ", if node.walkable { '.' } else { '#' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
