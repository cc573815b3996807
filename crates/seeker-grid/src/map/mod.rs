//! Map construction and coordinate types.
//!
//! This module provides the walkability grid used by the planner, plus the
//! grid/world point types shared across the crate.

pub mod grid;
pub mod point_types;

pub use grid::{Grid, GridConfig, Node};
pub use point_types::{GridPoint, Position};
