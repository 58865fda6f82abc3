//! Command-line options of the `pathdemo` binary.

use std::fmt;

use clap::{Parser, ValueEnum};
use gridwalk_core::Point;
use gridwalk_paths::{AStarConfig, ConfigError, HeuristicFormula, WaveConfig};

use crate::terrain::TerrainConfig;

/// Which [`SearchEngine`](gridwalk_paths::SearchEngine) to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EngineKind {
    /// Best-first A* search.
    #[default]
    #[value(name = "astar", alias = "a*")]
    AStar,
    /// Breadth-first wave from the target.
    #[value(alias = "bfs")]
    Wave,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AStar => f.write_str("A*"),
            Self::Wave => f.write_str("wave"),
        }
    }
}

/// Options that parse but do not describe a runnable search.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionsError {
    Config(ConfigError),
    /// An endpoint lies outside the map.
    OutOfMap(Point),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::OutOfMap(p) => write!(f, "{p} is outside the map"),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::OutOfMap(_) => None,
        }
    }
}

impl From<ConfigError> for OptionsError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Parsed demo options.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "pathdemo", version, about = "Animate grid pathfinding in the terminal")]
pub struct Options {
    /// Search strategy.
    #[arg(long, value_enum, ignore_case = true, default_value_t = EngineKind::AStar)]
    pub engine: EngineKind,

    /// Terrain seed.
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Map size.
    #[arg(long, value_name = "WxH", value_parser = parse_size, default_value = "48x20")]
    pub size: (i32, i32),

    /// Start cell [default: top-left].
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    pub from: Option<Point>,

    /// Target cell [default: bottom-right].
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    pub to: Option<Point>,

    /// Heuristic formula: manhattan, max-dxdy, diagonal-shortcut, euclidean,
    /// euclidean-no-sqr or custom.
    #[arg(long, default_value_t = HeuristicFormula::Manhattan)]
    pub heuristic: HeuristicFormula,

    /// Heuristic weight.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub weight: i32,

    /// Search limit of either engine.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Allow diagonal moves.
    #[arg(long)]
    pub diagonal: bool,

    /// Diagonal moves cost 2.41x.
    #[arg(long)]
    pub heavy: bool,

    /// Penalise direction changes.
    #[arg(long)]
    pub punish: bool,

    /// Enable the tie-breaker.
    #[arg(long)]
    pub tie: bool,

    /// Never re-expand closed cells.
    #[arg(long)]
    pub no_reopen: bool,

    /// Animate the search one step at a time.
    #[arg(long)]
    pub step: bool,

    /// Delay between animation frames in milliseconds.
    #[arg(long = "delay", value_name = "MS", default_value_t = 40)]
    pub delay_ms: u64,
}

impl Options {
    /// Checks that clap cannot express: the A* options must validate and
    /// both endpoints must lie on the map.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.engine == EngineKind::AStar {
            self.astar().validate()?;
        }
        let (width, height) = self.size;
        for p in [self.start(), self.target()] {
            if p.x < 0 || p.y < 0 || p.x >= width || p.y >= height {
                return Err(OptionsError::OutOfMap(p));
            }
        }
        Ok(())
    }

    pub fn width(&self) -> i32 {
        self.size.0
    }

    pub fn height(&self) -> i32 {
        self.size.1
    }

    /// A* settings. Diagonals stay off unless `--diagonal` is given.
    pub fn astar(&self) -> AStarConfig {
        let defaults = AStarConfig::default();
        AStarConfig {
            allow_diagonal: self.diagonal,
            heavy_diagonals: self.heavy,
            formula: self.heuristic,
            heuristic_weight: self.weight,
            punish_change_direction: self.punish,
            reopen_closed_nodes: !self.no_reopen,
            tie_breaker: self.tie,
            search_limit: self.limit.unwrap_or(defaults.search_limit),
        }
    }

    pub fn wave(&self) -> WaveConfig {
        let defaults = WaveConfig::default();
        WaveConfig {
            allow_diagonal: self.diagonal,
            search_limit: self.limit.unwrap_or(defaults.search_limit),
        }
    }

    /// Start cell, defaulting to the top-left corner.
    pub fn start(&self) -> Point {
        self.from.unwrap_or(Point::ZERO)
    }

    /// Target cell, defaulting to the bottom-right corner.
    pub fn target(&self) -> Point {
        self.to
            .unwrap_or_else(|| Point::new(self.width() - 1, self.height() - 1))
    }

    pub fn terrain(&self) -> TerrainConfig {
        TerrainConfig {
            width: self.width(),
            height: self.height(),
            ..TerrainConfig::default()
        }
    }
}

fn split_pair(s: &str, sep: char) -> Result<(i32, i32), String> {
    let (a, b) = s
        .split_once(sep)
        .ok_or_else(|| format!("expected two numbers separated by \u{201c}{sep}\u{201d}"))?;
    let num = |v: &str| {
        v.trim()
            .parse::<i32>()
            .map_err(|e| format!("\u{201c}{v}\u{201d}: {e}"))
    };
    Ok((num(a)?, num(b)?))
}

/// `WxH` with both sides positive.
fn parse_size(s: &str) -> Result<(i32, i32), String> {
    let (w, h) = split_pair(&s.to_ascii_lowercase(), 'x')?;
    if w <= 0 || h <= 0 {
        return Err(format!("map size must be positive, got {w}x{h}"));
    }
    Ok((w, h))
}

/// `X,Y`.
fn parse_point(s: &str) -> Result<Point, String> {
    split_pair(s, ',').map(Point::from)
}
