use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use gridwalk_core::Point;

/// A path cell with the cumulative cost of reaching it.
///
/// Equality and hashing use the position only: two path points on the same
/// cell are the same point whatever their cost.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathPoint {
    pub x: i32,
    pub y: i32,
    pub length_from_start: i32,
}

impl PathPoint {
    /// Create a new path point.
    #[inline]
    pub const fn new(x: i32, y: i32, length_from_start: i32) -> Self {
        Self {
            x,
            y,
            length_from_start,
        }
    }

    /// The cell of this point.
    #[inline]
    pub const fn pos(self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl PartialEq for PathPoint {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for PathPoint {}

impl Hash for PathPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

/// An ordered route from start to target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    points: Vec<PathPoint>,
}

impl Path {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// First point, if any.
    pub fn start(&self) -> Option<PathPoint> {
        self.points.first().copied()
    }

    /// Last point, if any.
    pub fn target(&self) -> Option<PathPoint> {
        self.points.last().copied()
    }

    /// Number of points, endpoints included.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of moves along the path.
    pub fn steps(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// The points in traversal order.
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathPoint> {
        self.points.iter()
    }

    /// Append a point at the target end.
    pub fn push(&mut self, point: PathPoint) {
        self.points.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Whether the path passes through `p`.
    pub fn contains(&self, p: Point) -> bool {
        self.points.iter().any(|pp| pp.pos() == p)
    }

    /// First point of `self`, in traversal order, that `other` also visits.
    pub fn intersect(&self, other: &Path) -> Option<PathPoint> {
        let cells: HashSet<PathPoint> = other.points.iter().copied().collect();
        self.points.iter().find(|p| cells.contains(p)).copied()
    }

    /// Whether the two paths share at least one cell.
    pub fn intersects(&self, other: &Path) -> bool {
        self.intersect(other).is_some()
    }
}

impl From<Vec<PathPoint>> for Path {
    fn from(points: Vec<PathPoint>) -> Self {
        Self { points }
    }
}

impl FromIterator<PathPoint> for Path {
    fn from_iter<I: IntoIterator<Item = PathPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathPoint;
    type IntoIter = std::slice::Iter<'a, PathPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl IntoIterator for Path {
    type Item = PathPoint;
    type IntoIter = std::vec::IntoIter<PathPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}
