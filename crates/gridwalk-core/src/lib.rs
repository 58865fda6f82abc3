//! **gridwalk-core** — core types for the *gridwalk* pathfinding engine.
//!
//! This crate provides the geometry primitives shared across the workspace
//! and an owned integer [`Grid`] used for traversal-cost maps, wave maps and
//! diagnostic export buffers.

pub mod geom;
pub mod grid;

pub use geom::{Point, Range, RangeIter};
pub use grid::Grid;
