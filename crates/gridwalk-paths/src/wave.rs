use std::mem;

use gridwalk_core::{Grid, Point};

use crate::neighbors::DIRECTIONS_4;
use crate::path::{Path, PathPoint};
use crate::traits::{GridMap, SearchEngine, SearchState};

/// Wave map value of an impassable cell.
pub const WALL: i32 = -2;

/// Wave map value of a passable cell the wave has not reached.
pub const UNVISITED: i32 = -1;

/// Options for [`WaveEngine`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WaveConfig {
    /// Accepted for parity with [`AStarConfig`](crate::AStarConfig).
    /// Propagation and path reconstruction both stay orthogonal.
    pub allow_diagonal: bool,
    /// Maximum number of propagation rounds; `0` means unlimited.
    pub search_limit: usize,
}

/// Breadth-first wave propagation from the target, followed by greedy
/// descent from the start.
///
/// Cell costs only decide passability: every passable cell is one step.
/// Unlike [`AStarEngine`](crate::AStarEngine), a blocked start or target
/// fails before any propagation.
pub struct WaveEngine<M> {
    map: Option<M>,
    config: WaveConfig,
    start: Point,
    target: Point,
    wave: Grid,
    frontier: Vec<Point>,
    next: Vec<Point>,
    level: usize,
    path: Path,
    state: SearchState,
}

impl<M: GridMap> WaveEngine<M> {
    pub fn new(config: WaveConfig) -> Self {
        Self {
            map: None,
            config,
            start: Point::ZERO,
            target: Point::ZERO,
            wave: Grid::new(0, 0),
            frontier: Vec::new(),
            next: Vec::new(),
            level: 0,
            path: Path::new(),
            state: SearchState::Idle,
        }
    }

    pub fn with_map(map: M, config: WaveConfig) -> Self {
        let mut engine = Self::new(config);
        engine.map = Some(map);
        engine
    }

    /// Replace the map. Resets any search in progress.
    pub fn set_map(&mut self, map: M) {
        self.map = Some(map);
        self.reset();
    }

    /// Remove and return the map. Resets any search in progress.
    pub fn clear_map(&mut self) -> Option<M> {
        self.reset();
        self.map.take()
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut WaveConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: WaveConfig) {
        self.config = config;
    }

    /// The wave map of the current search: [`WALL`], [`UNVISITED`] or the
    /// distance in steps from the target.
    pub fn wave(&self) -> &Grid {
        &self.wave
    }

    /// Propagation rounds completed, which is also the largest distance
    /// labelled so far.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Rebuild the wave map and seed the frontier with the target.
    fn seed(&mut self) {
        self.frontier.clear();
        self.next.clear();
        self.path.clear();
        self.level = 0;

        let Some(map) = self.map.as_ref() else {
            log::debug!("wave: no map configured");
            self.wave.reset(0, 0, UNVISITED);
            self.state = SearchState::NotFound;
            return;
        };

        self.wave.reset(map.width(), map.height(), UNVISITED);
        self.wave
            .fill_fn(|p| if map.cost(p.x, p.y) <= 0 { WALL } else { UNVISITED });

        if map.is_blocked(self.start) || map.is_blocked(self.target) {
            log::debug!(
                "wave: blocked or outside endpoint (start {}, target {})",
                self.start,
                self.target
            );
            self.state = SearchState::NotFound;
            return;
        }

        self.wave.set(self.target, 0);
        self.frontier.push(self.target);
        self.state = if self.start == self.target {
            SearchState::Found
        } else {
            SearchState::Searching
        };
    }

    /// Run one propagation round.
    fn advance(&mut self) {
        if self.frontier.is_empty() {
            log::debug!("wave: exhausted at level {}", self.level);
            self.state = SearchState::NotFound;
            return;
        }
        let limit = self.config.search_limit;
        if limit > 0 && self.level >= limit {
            log::debug!("wave: search limit {limit} reached");
            self.state = SearchState::NotFound;
            return;
        }
        if self.level > self.wave.len() {
            log::debug!("wave: level {} exceeds map area", self.level);
            self.state = SearchState::NotFound;
            return;
        }

        let value = self.level as i32 + 1;
        for &p in &self.frontier {
            for &d in &DIRECTIONS_4 {
                let n = p + d;
                if self.wave.at(n) == Some(UNVISITED) {
                    self.wave.set(n, value);
                    self.next.push(n);
                }
            }
        }
        mem::swap(&mut self.frontier, &mut self.next);
        self.next.clear();
        self.level += 1;
        log::trace!("wave: level {} reached {} cells", self.level, self.frontier.len());

        if self.wave.at(self.start) != Some(UNVISITED) {
            log::debug!("wave: reached {} at level {}", self.start, self.level);
            self.state = SearchState::Found;
        }
    }
}

impl<M: GridMap> SearchEngine for WaveEngine<M> {
    fn start(&self) -> Point {
        self.start
    }

    fn target(&self) -> Point {
        self.target
    }

    fn set_endpoints(&mut self, start: Point, target: Point) {
        self.start = start;
        self.target = target;
    }

    fn reset(&mut self) {
        self.frontier.clear();
        self.next.clear();
        self.wave.reset(0, 0, UNVISITED);
        self.level = 0;
        self.path.clear();
        self.state = SearchState::Idle;
    }

    fn expand(&mut self) -> bool {
        self.seed();
        while self.state == SearchState::Searching {
            self.advance();
        }
        self.state == SearchState::Found
    }

    fn prepare_step(&mut self) {
        self.seed();
    }

    fn step(&mut self) -> bool {
        if self.state != SearchState::Searching {
            return false;
        }
        self.advance();
        self.state == SearchState::Searching
    }

    /// Descend from the start to the orthogonal neighbour with the smallest
    /// wave value below the current one until the target is reached.
    fn build_path(&mut self) {
        self.path.clear();
        if self.state != SearchState::Found {
            log::warn!("wave: build_path called without a found search ({:?})", self.state);
            return;
        }

        let bound = self.wave.len();
        let mut cur = self.start;
        let mut value = self.wave.at(cur).unwrap_or(UNVISITED);
        self.path.push(PathPoint::new(cur.x, cur.y, value));
        while value > 0 && self.path.len() <= bound {
            let mut best: Option<(Point, i32)> = None;
            for &d in &DIRECTIONS_4 {
                let n = cur + d;
                let Some(v) = self.wave.at(n) else { continue };
                if v >= 0 && v < best.map_or(value, |(_, b)| b) {
                    best = Some((n, v));
                }
            }
            let Some((n, v)) = best else {
                log::warn!("wave: descent stuck at {cur} (value {value})");
                break;
            };
            cur = n;
            value = v;
            self.path.push(PathPoint::new(cur.x, cur.y, value));
        }
    }

    /// Copies the wave map. Cells the current search never labelled read as
    /// [`UNVISITED`].
    fn export_wave(&self, buffer: &mut Grid) {
        let size = self
            .map
            .as_ref()
            .map_or(self.wave.size(), |m| Point::new(m.width(), m.height()));
        buffer.reset(size.x, size.y, UNVISITED);
        for (p, v) in self.wave.iter() {
            buffer.set(p, v);
        }
    }

    fn state(&self) -> SearchState {
        self.state
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
