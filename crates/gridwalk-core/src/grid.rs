//! An owned integer-cell grid.
//!
//! [`Grid`] stores one `i32` per cell in row-major order. The pathfinding
//! crate reads it as a traversal-cost map (`0` blocked, `1..=100` passable)
//! and writes wave distances and exploration costs into it.

use std::fmt;

use crate::geom::{Point, Range};

/// A 2D grid of `i32` values covering `[0, width) × [0, height)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    cells: Vec<i32>,
    width: i32,
    height: i32,
}

impl Grid {
    /// Create a new grid filled with `0`.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, 0)
    }

    /// Create a new grid with every cell set to `value`.
    pub fn filled(width: i32, height: i32, value: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            cells: vec![value; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    /// Build a grid from rows of values. Every row must have the same
    /// length as the first; shorter rows are padded with `0` and longer rows
    /// are truncated.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.as_ref().len()) as i32;
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.as_ref().iter().take(width as usize).enumerate() {
                grid.set(Point::new(x as i32, y as i32), v);
            }
        }
        grid
    }

    /// Returns the bounding range of this grid.
    pub fn bounds(&self) -> Range {
        Range::with_size(self.width, self.height)
    }

    /// Returns the size as a Point (width = x, height = y).
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    /// Width in cells.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether this grid contains the given point.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.contains(p) {
            Some((p.y * self.width + p.x) as usize)
        } else {
            None
        }
    }

    /// Get the value at a point, or `None` if out of bounds.
    #[inline]
    pub fn at(&self, p: Point) -> Option<i32> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Set the value at a point. Does nothing if out of bounds.
    #[inline]
    pub fn set(&mut self, p: Point, value: i32) {
        if let Some(i) = self.index(p) {
            self.cells[i] = value;
        }
    }

    /// Fill the entire grid with the given value.
    pub fn fill(&mut self, value: i32) {
        self.cells.fill(value);
    }

    /// Fill the grid using a function of each point.
    pub fn fill_fn(&mut self, mut f: impl FnMut(Point) -> i32) {
        for (i, p) in Range::with_size(self.width, self.height).iter().enumerate() {
            self.cells[i] = f(p);
        }
    }

    /// Resize to `width × height`, discarding the previous contents and
    /// filling with `value`. Keeps the allocation when it is large enough.
    pub fn reset(&mut self, width: i32, height: i32, value: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
        self.cells.clear();
        self.cells
            .resize((self.width as usize) * (self.height as usize), value);
    }

    /// Count how many cells equal the given value.
    pub fn count(&self, value: i32) -> usize {
        self.cells.iter().filter(|&&v| v == value).count()
    }

    /// Row-major iterator over `(point, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, i32)> + '_ {
        self.bounds().iter().zip(self.cells.iter().copied())
    }

    /// Raw row-major cell slice.
    pub fn as_slice(&self) -> &[i32] {
        &self.cells
    }
}

impl fmt::Display for Grid {
    /// One line per row, values separated by a single space.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                if x > 0 {
                    f.write_str(" ")?;
                }
                let i = (y * self.width + x) as usize;
                write!(f, "{}", self.cells[i])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
