use gridwalk_core::{Grid, Point};

use crate::path::Path;

/// Highest cell cost the engines take into account; larger values are
/// treated as this.
pub const MAX_COST: i32 = 100;

/// Read-only map capability consumed by the search engines.
///
/// Costs must not change while a search is running.
pub trait GridMap {
    /// Map width in cells.
    fn width(&self) -> i32;

    /// Map height in cells.
    fn height(&self) -> i32;

    /// Traversal cost of the in-bounds cell `(x, y)`: `0` is impassable,
    /// `1` fully passable, up to `100` for difficult terrain.
    fn cost(&self, x: i32, y: i32) -> i32;

    /// Whether `p` lies inside the map.
    #[inline]
    fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width() && p.y < self.height()
    }

    /// Whether `p` is outside the map or impassable.
    #[inline]
    fn is_blocked(&self, p: Point) -> bool {
        !self.contains(p) || self.cost(p.x, p.y) <= 0
    }
}

impl GridMap for Grid {
    #[inline]
    fn width(&self) -> i32 {
        Grid::width(self)
    }

    #[inline]
    fn height(&self) -> i32 {
        Grid::height(self)
    }

    #[inline]
    fn cost(&self, x: i32, y: i32) -> i32 {
        self.at(Point::new(x, y)).unwrap_or(0)
    }
}

impl<M: GridMap + ?Sized> GridMap for &M {
    #[inline]
    fn width(&self) -> i32 {
        (**self).width()
    }

    #[inline]
    fn height(&self) -> i32 {
        (**self).height()
    }

    #[inline]
    fn cost(&self, x: i32, y: i32) -> i32 {
        (**self).cost(x, y)
    }
}

/// Lifecycle state of a search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchState {
    /// Nothing has run since the last reset.
    #[default]
    Idle,
    /// Prepared for stepping and not yet finished.
    Searching,
    /// The target was reached.
    Found,
    /// The frontier or the search budget was exhausted.
    NotFound,
}

impl SearchState {
    /// Whether the search has finished, successfully or not.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Found | Self::NotFound)
    }
}

/// Lifecycle shared by every search strategy.
///
/// A search runs either to completion with [`expand`](Self::expand) or one
/// unit of work at a time with [`prepare_step`](Self::prepare_step) followed
/// by repeated [`step`](Self::step) calls. Both drive the same expansion
/// routine, so they visit nodes in the same order.
pub trait SearchEngine {
    /// The configured start cell.
    fn start(&self) -> Point;

    /// The configured target cell.
    fn target(&self) -> Point;

    /// Set the start and target cells for the next search.
    fn set_endpoints(&mut self, start: Point, target: Point);

    /// Clear all search state, the path and the found flag. Idempotent.
    fn reset(&mut self);

    /// Run the whole search and return whether the target was found.
    ///
    /// Returns `false` immediately when no map is configured.
    fn expand(&mut self) -> bool;

    /// Initialise the search for manual stepping.
    fn prepare_step(&mut self);

    /// Perform one unit of expansion work.
    ///
    /// Returns `true` while the search should continue and `false` once it
    /// has found the target, been exhausted, or was never prepared.
    fn step(&mut self) -> bool;

    /// Reconstruct [`path`](Self::path) from a finished, successful search.
    fn build_path(&mut self);

    /// Write per-cell exploration data into `buffer` for visualization.
    fn export_wave(&self, buffer: &mut Grid);

    /// Current lifecycle state.
    fn state(&self) -> SearchState;

    /// The most recently reconstructed path. Empty unless a search succeeded.
    fn path(&self) -> &Path;

    /// Whether the last search reached the target.
    fn is_found(&self) -> bool {
        self.state() == SearchState::Found
    }

    /// Search from `start` to `target` and build the path on success.
    fn find(&mut self, start: Point, target: Point) -> bool {
        self.set_endpoints(start, target);
        self.reset();
        if !self.expand() {
            return false;
        }
        self.build_path();
        true
    }
}
