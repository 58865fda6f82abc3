use std::fmt;

use gridwalk_core::{Grid, Point};

use crate::heuristic::{HeuristicFormula, tie_break};
use crate::neighbors::{directions, is_diagonal};
use crate::node::{AStarNode, ClosedSet, OpenSet};
use crate::path::{Path, PathPoint};
use crate::traits::{GridMap, MAX_COST, SearchEngine, SearchState};
use crate::wave::{UNVISITED, WALL};

/// Multiplier applied to the cell cost of a diagonal move when
/// [`AStarConfig::heavy_diagonals`] is set.
pub const HEAVY_DIAGONAL_FACTOR: f64 = 2.41;

/// Cost added when a move switches axis relative to the previous move.
pub const DIRECTION_CHANGE_PENALTY: i32 = 20;

/// Tuning options for [`AStarEngine`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AStarConfig {
    /// Use 8 neighbour directions instead of 4.
    pub allow_diagonal: bool,
    /// Scale the cost of diagonal moves by [`HEAVY_DIAGONAL_FACTOR`].
    pub heavy_diagonals: bool,
    /// Remaining-cost estimate.
    pub formula: HeuristicFormula,
    /// Multiplier applied to the heuristic. Values above 1 trade optimality
    /// for speed.
    pub heuristic_weight: i32,
    /// Add [`DIRECTION_CHANGE_PENALTY`] whenever a move changes axis.
    pub punish_change_direction: bool,
    /// Re-open closed cells when a strictly cheaper route to them is found.
    pub reopen_closed_nodes: bool,
    /// Bias equal-cost choices toward the straight start-target line.
    pub tie_breaker: bool,
    /// Give up once this many nodes have been expanded without reaching
    /// the target.
    pub search_limit: usize,
}

impl Default for AStarConfig {
    fn default() -> Self {
        Self {
            allow_diagonal: true,
            heavy_diagonals: false,
            formula: HeuristicFormula::Manhattan,
            heuristic_weight: 1,
            punish_change_direction: false,
            reopen_closed_nodes: true,
            tie_breaker: false,
            search_limit: 2000,
        }
    }
}

impl AStarConfig {
    /// Check the options for values the search cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heuristic_weight < 0 {
            return Err(ConfigError::NegativeWeight(self.heuristic_weight));
        }
        if self.search_limit == 0 {
            return Err(ConfigError::ZeroSearchLimit);
        }
        Ok(())
    }
}

/// Errors reported by [`AStarConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The heuristic weight is below zero.
    NegativeWeight(i32),
    /// A search limit of zero would refuse even the start node.
    ZeroSearchLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeWeight(w) => write!(f, "heuristic weight must not be negative, got {w}"),
            Self::ZeroSearchLimit => f.write_str("search limit must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Best-first search over a [`GridMap`].
///
/// The open set is a binary heap keyed by `f = g + h` with ties resolved in
/// insertion order; a position index keeps only the cheapest entry per cell
/// live. The closed set records every expansion in order and is the source
/// of path reconstruction.
///
/// The start cell is not checked for passability: a search may leave a
/// blocked start through its passable neighbours. Start and target outside
/// the map fail immediately.
pub struct AStarEngine<M> {
    map: Option<M>,
    config: AStarConfig,
    start: Point,
    target: Point,
    open: OpenSet,
    closed: ClosedSet,
    path: Path,
    state: SearchState,
}

impl<M: GridMap> AStarEngine<M> {
    /// Create an engine without a map. Searches fail until
    /// [`set_map`](Self::set_map) is called.
    pub fn new(config: AStarConfig) -> Self {
        Self {
            map: None,
            config,
            start: Point::ZERO,
            target: Point::ZERO,
            open: OpenSet::default(),
            closed: ClosedSet::default(),
            path: Path::new(),
            state: SearchState::Idle,
        }
    }

    /// Create an engine searching `map`.
    pub fn with_map(map: M, config: AStarConfig) -> Self {
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

    pub fn config(&self) -> &AStarConfig {
        &self.config
    }

    /// Mutable access to the options. Changes apply to the next search.
    pub fn config_mut(&mut self) -> &mut AStarConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: AStarConfig) {
        self.config = config;
    }

    /// Expanded nodes in expansion order.
    ///
    /// After [`build_path`](SearchEngine::build_path) only the nodes on the
    /// reconstructed route remain.
    pub fn closed(&self) -> &[AStarNode] {
        self.closed.nodes()
    }

    /// Number of expanded nodes, the quantity bounded by the search limit.
    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }

    /// Number of cells waiting in the open set.
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Clear the frontier and seed it with the start node.
    fn seed(&mut self) {
        self.open.clear();
        self.closed.clear();
        self.path.clear();

        let Some(map) = self.map.as_ref() else {
            log::debug!("astar: no map configured");
            self.state = SearchState::NotFound;
            return;
        };
        if !map.contains(self.start) || !map.contains(self.target) {
            log::debug!(
                "astar: endpoint outside the map (start {}, target {})",
                self.start,
                self.target
            );
            self.state = SearchState::NotFound;
            return;
        }

        let w = self.config.heuristic_weight;
        self.open.push(AStarNode {
            x: self.start.x,
            y: self.start.y,
            g: 0,
            h: w,
            f: w,
            parent_x: self.start.x,
            parent_y: self.start.y,
        });
        self.state = SearchState::Searching;
    }

    /// Expand one node. Shared by [`expand`](SearchEngine::expand) and
    /// [`step`](SearchEngine::step).
    fn advance(&mut self) {
        let Some(map) = self.map.as_ref() else {
            self.state = SearchState::NotFound;
            return;
        };
        let Some(current) = self.open.pop() else {
            log::debug!(
                "astar: open set exhausted after {} expansions",
                self.closed.len()
            );
            self.state = SearchState::NotFound;
            return;
        };

        if current.pos() == self.target {
            self.closed.push(current);
            log::debug!(
                "astar: reached {} with cost {} after {} expansions",
                self.target,
                current.g,
                self.closed.len()
            );
            self.state = SearchState::Found;
            return;
        }

        if self.closed.len() >= self.config.search_limit {
            log::debug!("astar: search limit {} reached", self.config.search_limit);
            self.state = SearchState::NotFound;
            return;
        }

        log::trace!("astar: expand {} g={} f={}", current.pos(), current.g, current.f);

        let cfg = &self.config;
        let horizontal = current.x - current.parent_x;
        for &dir in directions(cfg.allow_diagonal) {
            let next = current.pos() + dir;
            if !map.contains(next) {
                continue;
            }

            let cell = map.cost(next.x, next.y).clamp(0, MAX_COST);
            let step = if cfg.heavy_diagonals && is_diagonal(dir) {
                (cell as f64 * HEAVY_DIAGONAL_FACTOR) as i32
            } else {
                cell
            };
            let mut g = current.g.saturating_add(step);
            // Impassable: the move adds nothing.
            if g == current.g {
                continue;
            }

            if cfg.punish_change_direction {
                if dir.x != 0 && horizontal == 0 {
                    g = g.saturating_add(DIRECTION_CHANGE_PENALTY);
                }
                if dir.y != 0 && horizontal != 0 {
                    g = g.saturating_add(DIRECTION_CHANGE_PENALTY);
                }
            }

            if self.open.best_g(next).is_some_and(|open_g| open_g <= g) {
                continue;
            }
            if self
                .closed
                .best_g(next)
                .is_some_and(|closed_g| !cfg.reopen_closed_nodes || closed_g <= g)
            {
                continue;
            }

            let mut h = cfg.formula.estimate(next, self.target, cfg.heuristic_weight);
            if cfg.tie_breaker {
                h = tie_break(h, current.pos(), self.start, self.target);
            }
            self.open.push(AStarNode {
                x: next.x,
                y: next.y,
                g,
                h,
                f: g.saturating_add(h),
                parent_x: current.x,
                parent_y: current.y,
            });
        }

        self.closed.push(current);
    }
}

impl<M: GridMap> SearchEngine for AStarEngine<M> {
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
        self.open.clear();
        self.closed.clear();
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

    fn build_path(&mut self) {
        self.path.clear();
        if self.state != SearchState::Found {
            log::warn!("astar: build_path called without a found search ({:?})", self.state);
            return;
        }
        let mut chain = self.closed.prune_to_chain();
        chain.reverse();
        self.path = chain
            .into_iter()
            .map(|n| PathPoint::new(n.x, n.y, n.g))
            .collect();
    }

    /// Writes `g` for every discovered cell, [`WALL`] for impassable cells
    /// and [`UNVISITED`] elsewhere. The buffer is resized to the map.
    fn export_wave(&self, buffer: &mut Grid) {
        let Some(map) = self.map.as_ref() else {
            buffer.fill(UNVISITED);
            return;
        };
        buffer.reset(map.width(), map.height(), UNVISITED);
        buffer.fill_fn(|p| {
            if map.cost(p.x, p.y) <= 0 {
                WALL
            } else {
                UNVISITED
            }
        });
        for (p, g) in self.open.iter() {
            buffer.set(p, g);
        }
        for n in self.closed.nodes() {
            buffer.set(n.pos(), n.g);
        }
    }

    fn state(&self) -> SearchState {
        self.state
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Reverse;
    use std::collections::{BinaryHeap, HashMap, HashSet};

    use rand::{Rng, RngExt, SeedableRng};

    use super::*;

    fn ones(w: i32, h: i32) -> Grid {
        Grid::filled(w, h, 1)
    }

    fn config(allow_diagonal: bool) -> AStarConfig {
        AStarConfig {
            allow_diagonal,
            ..AStarConfig::default()
        }
    }

    fn cost_of(path: &Path) -> Option<i32> {
        path.target().map(|p| p.length_from_start)
    }

    fn random_map(rng: &mut impl Rng, w: i32, h: i32, max_cost: i32) -> Grid {
        let mut g = Grid::new(w, h);
        g.fill_fn(|_| {
            if rng.random_range(0..5) == 0 {
                0
            } else {
                rng.random_range(1..=max_cost)
            }
        });
        g
    }

    /// Exhaustive Dijkstra using the engine's move-cost rules.
    fn dijkstra_cost(map: &Grid, start: Point, target: Point, diagonal: bool, heavy: bool) -> Option<i32> {
        let mut best: HashMap<Point, i32> = HashMap::new();
        let mut heap = BinaryHeap::new();
        best.insert(start, 0);
        heap.push(Reverse((0, start.x, start.y)));
        while let Some(Reverse((g, x, y))) = heap.pop() {
            let p = Point::new(x, y);
            if p == target {
                return Some(g);
            }
            if best.get(&p).is_some_and(|&b| b < g) {
                continue;
            }
            for &d in directions(diagonal) {
                let n = p + d;
                let Some(c) = map.at(n) else { continue };
                if c <= 0 {
                    continue;
                }
                let step = if heavy && is_diagonal(d) {
                    (c as f64 * HEAVY_DIAGONAL_FACTOR) as i32
                } else {
                    c
                };
                let ng = g + step;
                if best.get(&n).is_none_or(|&b| ng < b) {
                    best.insert(n, ng);
                    heap.push(Reverse((ng, n.x, n.y)));
                }
            }
        }
        None
    }

    #[test]
    fn open_grid_without_diagonals() {
        let map = ones(5, 5);
        let mut astar = AStarEngine::with_map(&map, config(false));
        assert!(astar.find(Point::new(0, 0), Point::new(4, 4)));
        assert!(astar.is_found());
        let path = astar.path();
        assert_eq!(path.len(), 9);
        assert_eq!(path.start().map(|p| p.pos()), Some(Point::new(0, 0)));
        assert_eq!(path.start().map(|p| p.length_from_start), Some(0));
        assert_eq!(path.target().map(|p| p.pos()), Some(Point::new(4, 4)));
        assert_eq!(cost_of(path), Some(8));
        for w in path.points().windows(2) {
            let d = w[1].pos() - w[0].pos();
            assert_eq!(d.x.abs() + d.y.abs(), 1);
        }
    }

    #[test]
    fn open_grid_with_light_diagonals() {
        let map = ones(5, 5);
        let mut astar = AStarEngine::with_map(&map, config(true));
        assert!(astar.find(Point::new(0, 0), Point::new(4, 4)));
        let path = astar.path();
        assert_eq!(cost_of(path), Some(4));
        assert_eq!(path.len(), 5);
        for (i, p) in path.iter().enumerate() {
            assert_eq!(p.pos(), Point::new(i as i32, i as i32));
        }
    }

    #[test]
    fn heavy_diagonals_cost_more() {
        let map = Grid::filled(2, 2, 3);
        let start = Point::new(0, 0);
        let target = Point::new(1, 1);

        let mut light = AStarEngine::with_map(&map, config(true));
        assert!(light.find(start, target));
        assert_eq!(cost_of(light.path()), Some(3));
        assert_eq!(light.path().len(), 2);

        // The diagonal now costs 7, two orthogonal moves cost 6.
        let mut heavy = AStarEngine::with_map(
            &map,
            AStarConfig {
                heavy_diagonals: true,
                ..config(true)
            },
        );
        assert!(heavy.find(start, target));
        assert_eq!(cost_of(heavy.path()), Some(6));
        assert_eq!(heavy.path().len(), 3);
    }

    #[test]
    fn wall_row_blocks_search() {
        let mut map = ones(5, 5);
        for x in 0..5 {
            map.set(Point::new(x, 2), 0);
        }
        let mut astar = AStarEngine::with_map(&map, config(false));
        assert!(!astar.find(Point::new(2, 0), Point::new(2, 4)));
        assert_eq!(astar.state(), SearchState::NotFound);
        assert!(astar.path().is_empty());
    }

    #[test]
    fn search_limit_of_one_gives_up() {
        let map = ones(5, 5);
        let mut astar = AStarEngine::with_map(
            &map,
            AStarConfig {
                search_limit: 1,
                ..config(false)
            },
        );
        assert!(!astar.find(Point::new(0, 0), Point::new(4, 4)));
        assert!(astar.path().is_empty());
        assert_eq!(astar.closed_len(), 1);

        astar.config_mut().search_limit = 100;
        assert!(astar.find(Point::new(0, 0), Point::new(4, 4)));
    }

    #[test]
    fn search_limit_counts_expansions() {
        let map = ones(3, 1);
        let limited = AStarConfig {
            search_limit: 1,
            ..config(false)
        };
        let mut astar = AStarEngine::with_map(&map, limited);
        // One expansion of the start reaches the neighbour.
        assert!(astar.find(Point::new(0, 0), Point::new(1, 0)));
        assert_eq!(astar.path().len(), 2);
        // The far end needs a second expansion.
        assert!(!astar.find(Point::new(0, 0), Point::new(2, 0)));
        assert_eq!(astar.state(), SearchState::NotFound);
        assert_eq!(astar.closed_len(), 1);

        astar.config_mut().search_limit = 2;
        assert!(astar.find(Point::new(0, 0), Point::new(2, 0)));
        assert_eq!(cost_of(astar.path()), Some(2));
    }

    #[test]
    fn start_equals_target() {
        let map = ones(3, 3);
        let mut astar = AStarEngine::with_map(&map, AStarConfig::default());
        assert!(astar.find(Point::new(1, 1), Point::new(1, 1)));
        assert_eq!(astar.path().len(), 1);
        assert_eq!(cost_of(astar.path()), Some(0));
    }

    #[test]
    fn avoids_expensive_terrain() {
        let map = Grid::from_rows(&[[1, 1, 1], [1, 9, 1], [1, 1, 1]]);
        let mut astar = AStarEngine::with_map(&map, config(false));
        assert!(astar.find(Point::new(0, 1), Point::new(2, 1)));
        assert_eq!(cost_of(astar.path()), Some(4));
        assert!(!astar.path().contains(Point::new(1, 1)));
    }

    #[test]
    fn blocked_start_is_permitted() {
        let map = Grid::from_rows(&[[0, 1, 1]]);
        let mut astar = AStarEngine::with_map(&map, config(false));
        assert!(astar.find(Point::new(0, 0), Point::new(2, 0)));
        assert_eq!(cost_of(astar.path()), Some(2));
    }

    #[test]
    fn blocked_target_is_unreachable() {
        let map = Grid::from_rows(&[[1, 1, 0]]);
        let mut astar = AStarEngine::with_map(&map, config(false));
        assert!(!astar.find(Point::new(0, 0), Point::new(2, 0)));
    }

    #[test]
    fn endpoints_outside_map_fail_fast() {
        let map = ones(3, 3);
        let mut astar = AStarEngine::with_map(&map, AStarConfig::default());
        assert!(!astar.find(Point::new(-1, 0), Point::new(2, 2)));
        assert!(!astar.find(Point::new(0, 0), Point::new(3, 0)));
        assert_eq!(astar.closed_len(), 0);
    }

    #[test]
    fn missing_map_is_not_found() {
        let map = ones(2, 2);
        let mut astar: AStarEngine<&Grid> = AStarEngine::new(AStarConfig::default());
        assert!(!astar.find(Point::new(0, 0), Point::new(1, 1)));
        astar.prepare_step();
        assert!(!astar.step());

        astar.set_map(&map);
        assert!(astar.find(Point::new(0, 0), Point::new(1, 1)));
        assert!(astar.clear_map().is_some());
        assert!(!astar.expand());
    }

    #[test]
    fn direction_changes_are_punished() {
        let map = ones(5, 5);
        let mut astar = AStarEngine::with_map(
            &map,
            AStarConfig {
                punish_change_direction: true,
                ..config(false)
            },
        );
        assert!(astar.find(Point::new(0, 0), Point::new(4, 0)));
        // Leaving the start horizontally counts as a change.
        assert_eq!(cost_of(astar.path()), Some(24));
        assert_eq!(astar.path().len(), 5);
        assert!(astar.path().iter().all(|p| p.y == 0));
    }

    #[test]
    fn tie_breaker_keeps_cost() {
        let map = ones(7, 7);
        let mut astar = AStarEngine::with_map(
            &map,
            AStarConfig {
                tie_breaker: true,
                ..config(false)
            },
        );
        assert!(astar.find(Point::new(0, 0), Point::new(6, 6)));
        assert_eq!(cost_of(astar.path()), Some(12));
    }

    #[test]
    fn step_mode_matches_expand() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let map = random_map(&mut rng, 12, 12, 4);
        let start = Point::new(0, 0);
        let target = Point::new(11, 11);

        let mut full = AStarEngine::with_map(&map, AStarConfig::default());
        full.set_endpoints(start, target);
        let found = full.expand();

        let mut stepped = AStarEngine::with_map(&map, AStarConfig::default());
        stepped.set_endpoints(start, target);
        stepped.prepare_step();
        assert_eq!(stepped.state(), SearchState::Searching);
        let mut steps = 0;
        while stepped.step() {
            steps += 1;
            assert!(steps < 10_000);
        }
        assert_eq!(stepped.is_found(), found);
        assert_eq!(stepped.closed(), full.closed());
        assert!(!stepped.step());

        if found {
            full.build_path();
            stepped.build_path();
            assert_eq!(full.path().points(), stepped.path().points());
        }
    }

    #[test]
    fn step_without_prepare_does_nothing() {
        let map = ones(3, 3);
        let mut astar = AStarEngine::with_map(&map, AStarConfig::default());
        assert!(!astar.step());
        assert_eq!(astar.state(), SearchState::Idle);
    }

    #[test]
    fn repeated_searches_are_deterministic() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let map = random_map(&mut rng, 16, 16, 9);
        let cfg = AStarConfig {
            tie_breaker: true,
            heavy_diagonals: true,
            ..AStarConfig::default()
        };
        let mut a = AStarEngine::with_map(&map, cfg.clone());
        let mut b = AStarEngine::with_map(&map, cfg);
        let start = Point::new(1, 1);
        let target = Point::new(14, 13);

        let first = a.find(start, target);
        let first_path: Vec<_> = a.path().iter().map(|p| (p.pos(), p.length_from_start)).collect();
        assert_eq!(a.find(start, target), first);
        let again: Vec<_> = a.path().iter().map(|p| (p.pos(), p.length_from_start)).collect();
        assert_eq!(b.find(start, target), first);
        let other: Vec<_> = b.path().iter().map(|p| (p.pos(), p.length_from_start)).collect();
        assert_eq!(first_path, again);
        assert_eq!(first_path, other);
    }

    #[test]
    fn path_costs_accumulate_cell_costs() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let map = random_map(&mut rng, 10, 10, 6);
            let mut astar = AStarEngine::with_map(&map, config(false));
            if !astar.find(Point::new(0, 0), Point::new(9, 9)) {
                continue;
            }
            let pts = astar.path().points();
            assert_eq!(pts[0].length_from_start, 0);
            for w in pts.windows(2) {
                let entered = map.at(w[1].pos()).unwrap_or(0);
                assert!(w[1].length_from_start > w[0].length_from_start);
                assert_eq!(w[1].length_from_start - w[0].length_from_start, entered);
            }
        }
    }

    #[test]
    fn admissible_heuristics_find_optimal_paths() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let cases = [
            (HeuristicFormula::Manhattan, false, false),
            (HeuristicFormula::MaxDxDy, true, false),
            (HeuristicFormula::DiagonalShortCut, true, true),
        ];
        for _ in 0..25 {
            let map = random_map(&mut rng, 9, 9, 5);
            let start = Point::new(rng.random_range(0..9), rng.random_range(0..9));
            let target = Point::new(rng.random_range(0..9), rng.random_range(0..9));
            for &(formula, diagonal, heavy) in &cases {
                let mut astar = AStarEngine::with_map(
                    &map,
                    AStarConfig {
                        allow_diagonal: diagonal,
                        heavy_diagonals: heavy,
                        formula,
                        heuristic_weight: 1,
                        tie_breaker: false,
                        search_limit: 10_000,
                        ..AStarConfig::default()
                    },
                );
                let found = astar.find(start, target);
                let expected = dijkstra_cost(&map, start, target, diagonal, heavy);
                assert_eq!(found, expected.is_some(), "{formula} {start} -> {target}");
                if found {
                    assert_eq!(cost_of(astar.path()), expected, "{formula} {start} -> {target}");
                }
            }
        }
    }

    #[test]
    fn closed_cells_stay_closed_without_reopening() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        let map = random_map(&mut rng, 14, 14, 9);
        let mut astar = AStarEngine::with_map(
            &map,
            AStarConfig {
                reopen_closed_nodes: false,
                heuristic_weight: 3,
                search_limit: 10_000,
                ..AStarConfig::default()
            },
        );
        astar.set_endpoints(Point::new(0, 0), Point::new(13, 13));
        astar.expand();
        let mut seen = HashSet::new();
        for n in astar.closed() {
            assert!(seen.insert(n.pos()), "{} closed twice", n.pos());
        }
    }

    // Weight 3 pulls the search along the bottom row, so (2, 0) is first
    // closed at g = 4 before the cheaper top route reaches it at g = 3.
    fn reopening_map() -> Grid {
        Grid::from_rows(&[[1, 2, 1, 5, 1], [1, 1, 1, 9, 1]])
    }

    fn reopening_config(reopen_closed_nodes: bool) -> AStarConfig {
        AStarConfig {
            heuristic_weight: 3,
            reopen_closed_nodes,
            ..config(false)
        }
    }

    fn closed_entries(astar: &AStarEngine<&Grid>, p: Point) -> Vec<i32> {
        astar.closed().iter().filter(|n| n.pos() == p).map(|n| n.g).collect()
    }

    #[test]
    fn reopening_improves_closed_cells() {
        let map = reopening_map();
        let mut astar = AStarEngine::with_map(&map, reopening_config(true));
        astar.set_endpoints(Point::new(0, 0), Point::new(4, 1));
        assert!(astar.expand());
        assert_eq!(closed_entries(&astar, Point::new(2, 0)), vec![4, 3]);

        astar.build_path();
        assert_eq!(cost_of(astar.path()), Some(10));
        let route: Vec<Point> = astar.path().iter().map(|p| p.pos()).collect();
        assert_eq!(
            route,
            vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(3, 0),
                Point::new(4, 0),
                Point::new(4, 1),
            ]
        );
    }

    #[test]
    fn without_reopening_the_first_route_sticks() {
        let map = reopening_map();
        let mut astar = AStarEngine::with_map(&map, reopening_config(false));
        astar.set_endpoints(Point::new(0, 0), Point::new(4, 1));
        assert!(astar.expand());
        assert_eq!(closed_entries(&astar, Point::new(2, 0)), vec![4]);

        astar.build_path();
        assert_eq!(cost_of(astar.path()), Some(13));
        assert!(!astar.path().contains(Point::new(2, 0)));
    }

    #[test]
    fn oversized_costs_are_capped() {
        let map = Grid::from_rows(&[[1, i32::MAX, 1]]);
        let mut astar = AStarEngine::with_map(&map, config(false));
        assert!(astar.find(Point::new(0, 0), Point::new(2, 0)));
        assert_eq!(cost_of(astar.path()), Some(MAX_COST + 1));

        let rough = Grid::filled(3, 3, i32::MAX);
        let mut heavy = AStarEngine::with_map(
            &rough,
            AStarConfig {
                heavy_diagonals: true,
                ..config(true)
            },
        );
        // Four capped orthogonal moves beat two heavy diagonals.
        assert!(heavy.find(Point::new(0, 0), Point::new(2, 2)));
        assert_eq!(cost_of(heavy.path()), Some(4 * MAX_COST));
    }

    #[test]
    fn build_path_prunes_closed_to_route() {
        let map = ones(6, 6);
        let mut astar = AStarEngine::with_map(&map, config(false));
        astar.set_endpoints(Point::new(0, 0), Point::new(5, 5));
        assert!(astar.expand());
        assert!(astar.closed_len() >= 11);
        astar.build_path();
        assert_eq!(astar.closed_len(), 11);
        assert_eq!(astar.path().len(), 11);
    }

    #[test]
    fn build_path_without_search_leaves_path_empty() {
        let map = ones(3, 3);
        let mut astar = AStarEngine::with_map(&map, AStarConfig::default());
        astar.build_path();
        assert!(astar.path().is_empty());
    }

    #[test]
    fn reset_is_idempotent() {
        let map = ones(4, 4);
        let mut astar = AStarEngine::with_map(&map, AStarConfig::default());
        assert!(astar.find(Point::new(0, 0), Point::new(3, 3)));
        astar.reset();
        astar.reset();
        assert_eq!(astar.state(), SearchState::Idle);
        assert!(astar.path().is_empty());
        assert_eq!(astar.closed_len(), 0);
        assert_eq!(astar.open_len(), 0);
    }

    #[test]
    fn export_marks_walls_and_costs() {
        let map = Grid::from_rows(&[[1, 1, 1], [0, 0, 1], [1, 1, 1]]);
        let mut astar = AStarEngine::with_map(&map, config(false));
        astar.set_endpoints(Point::new(0, 0), Point::new(0, 2));
        assert!(astar.expand());

        let mut buf = Grid::new(0, 0);
        astar.export_wave(&mut buf);
        assert_eq!(buf.size(), map.size());
        assert_eq!(buf.at(Point::new(0, 0)), Some(0));
        assert_eq!(buf.at(Point::new(0, 1)), Some(WALL));
        assert_eq!(buf.at(Point::new(1, 1)), Some(WALL));
        assert_eq!(buf.at(Point::new(2, 2)), Some(4));
        assert_eq!(buf.at(Point::new(0, 2)), Some(6));
    }

    #[test]
    fn config_validation() {
        assert_eq!(AStarConfig::default().validate(), Ok(()));
        let neg = AStarConfig {
            heuristic_weight: -1,
            ..AStarConfig::default()
        };
        assert_eq!(neg.validate(), Err(ConfigError::NegativeWeight(-1)));
        let zero = AStarConfig {
            search_limit: 0,
            ..AStarConfig::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroSearchLimit));
        assert!(ConfigError::ZeroSearchLimit.to_string().contains("search limit"));
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn config_round_trip() {
        let cfg = AStarConfig {
            formula: HeuristicFormula::Euclidean,
            heuristic_weight: 3,
            tie_breaker: true,
            ..AStarConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: AStarConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let back: AStarConfig = serde_json::from_str(r#"{"search_limit": 50}"#).unwrap();
        assert_eq!(back.search_limit, 50);
        assert_eq!(back.formula, HeuristicFormula::Manhattan);
        assert!(back.allow_diagonal);
    }
}
