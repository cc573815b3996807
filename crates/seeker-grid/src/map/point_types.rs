use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in grid coordinates (cell indices).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GridPoint {
    /// The x-coordinate (column index) in the grid.
    pub x: usize,
    /// The y-coordinate (row index) in the grid.
    pub y: usize,
}

impl GridPoint {
    /// Creates a new `GridPoint`.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A point in world coordinates.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Position {
    /// The x-coordinate in world units.
    pub x: f32,
    /// The y-coordinate in world units.
    pub y: f32,
}

impl Position {
    /// Creates a new `Position`.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
