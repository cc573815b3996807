pub mod astar;
pub mod error;
pub mod heap;
pub mod map;
pub mod simplify;
