use gridwalk_core::Point;

/// Orthogonal moves: up, right, down, left.
pub const DIRECTIONS_4: [Point; 4] = [
    Point::new(0, -1),
    Point::new(1, 0),
    Point::new(0, 1),
    Point::new(-1, 0),
];

/// Orthogonal moves followed by the four diagonals.
pub const DIRECTIONS_8: [Point; 8] = [
    Point::new(0, -1),
    Point::new(1, 0),
    Point::new(0, 1),
    Point::new(-1, 0),
    Point::new(1, -1),
    Point::new(1, 1),
    Point::new(-1, 1),
    Point::new(-1, -1),
];

/// Direction table for 4- or 8-way movement.
#[inline]
pub fn directions(diagonal: bool) -> &'static [Point] {
    if diagonal { &DIRECTIONS_8 } else { &DIRECTIONS_4 }
}

/// Whether `dir` moves along both axes.
#[inline]
pub const fn is_diagonal(dir: Point) -> bool {
    dir.x != 0 && dir.y != 0
}
