//! Random cost maps for the demo.
//!
//! A map starts fully passable at cost 1, receives scattered patches of
//! difficult terrain and is then crossed by random-walk walls.

use gridwalk_core::{Grid, Point};
use rand::{Rng, RngExt, SeedableRng};

/// Cost written for wall cells.
pub const WALL_COST: i32 = 0;

/// Cost of plain ground.
pub const GROUND_COST: i32 = 1;

/// Parameters for [`generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainConfig {
    pub width: i32,
    pub height: i32,
    /// Share of cells (0.0–1.0) given a random cost above ground.
    pub rough_pct: f64,
    /// Highest cost a rough cell may get.
    pub max_cost: i32,
    /// Number of wall walks.
    pub walls: usize,
    /// Steps taken by each wall walk.
    pub wall_length: usize,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 48,
            height: 20,
            rough_pct: 0.25,
            max_cost: 9,
            walls: 10,
            wall_length: 14,
        }
    }
}

/// Chooses the next cell of a wall walk.
pub trait RandomWalker {
    fn neighbor(&self, p: Point, rng: &mut impl Rng) -> Point;
}

/// Walks one orthogonal cell at a time.
pub struct FourDirectionWalker;

impl RandomWalker for FourDirectionWalker {
    fn neighbor(&self, p: Point, rng: &mut impl Rng) -> Point {
        p.neighbors_4()[rng.random_range(0..4usize)]
    }
}

/// Cost map generator.
pub struct TerrainGen<R: Rng> {
    pub rng: R,
    pub grid: Grid,
}

impl<R: Rng> TerrainGen<R> {
    /// A `width × height` map of plain ground.
    pub fn new(width: i32, height: i32, rng: R) -> Self {
        Self {
            rng,
            grid: Grid::filled(width, height, GROUND_COST),
        }
    }

    /// Give roughly `pct` of the cells a random cost in `2..=max_cost`.
    ///
    /// Returns the number of cells changed.
    pub fn scatter_rough(&mut self, pct: f64, max_cost: i32) -> usize {
        if max_cost <= GROUND_COST {
            return 0;
        }
        let mut changed = 0;
        for p in self.grid.bounds().iter() {
            let r: f64 = self.rng.random();
            if r < pct {
                let cost = self.rng.random_range(GROUND_COST + 1..=max_cost);
                self.grid.set(p, cost);
                changed += 1;
            }
        }
        changed
    }

    /// Lay `walls` random walks of `length` steps, each starting at a random
    /// cell, turning every visited cell into a wall.
    ///
    /// Returns the number of cells turned into walls.
    pub fn random_walk_walls(&mut self, walker: &impl RandomWalker, walls: usize, length: usize) -> usize {
        let bounds = self.grid.bounds();
        if bounds.is_empty() {
            return 0;
        }
        let mut built = 0;
        for _ in 0..walls {
            let mut pos = Point::new(
                self.rng.random_range(0..bounds.width()),
                self.rng.random_range(0..bounds.height()),
            );
            for _ in 0..length {
                if self.grid.at(pos) != Some(WALL_COST) {
                    self.grid.set(pos, WALL_COST);
                    built += 1;
                }
                let next = walker.neighbor(pos, &mut self.rng);
                // Stay put at the border.
                if bounds.contains(next) {
                    pos = next;
                }
            }
        }
        built
    }

    /// Make `p` plain ground, e.g. so that search endpoints are passable.
    pub fn clear(&mut self, p: Point) {
        self.grid.set(p, GROUND_COST);
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

/// Build a map from `config`. The same seed always yields the same map.
pub fn generate(config: &TerrainConfig, seed: u64) -> Grid {
    let rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut tgen = TerrainGen::new(config.width, config.height, rng);
    tgen.scatter_rough(config.rough_pct, config.max_cost);
    tgen.random_walk_walls(&FourDirectionWalker, config.walls, config.wall_length);
    tgen.into_grid()
}
