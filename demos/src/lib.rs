//! Shared pieces of the gridwalk demos: terrain generation, command-line
//! options and the mapping from cost maps, wave buffers and paths to
//! coloured glyphs.

pub mod options;
pub mod terrain;

use gridwalk_core::{Grid, Point};
use gridwalk_paths::{AStarEngine, Path, SearchEngine, UNVISITED, WALL, WaveEngine};

pub use options::{EngineKind, Options, OptionsError};
pub use terrain::{TerrainConfig, TerrainGen, generate};

/// An RGB triple.
pub type Rgb = (u8, u8, u8);

const COL_WALL: Rgb = (90, 90, 120);
const COL_GROUND: Rgb = (70, 65, 60);
const COL_ROUGH_LOW: Rgb = (110, 150, 70);
const COL_ROUGH_HIGH: Rgb = (160, 90, 40);
const COL_WAVE_NEAR: Rgb = (60, 200, 220);
const COL_WAVE_FAR: Rgb = (40, 70, 160);
const COL_PATH: Rgb = (255, 220, 80);
const COL_START: Rgb = (80, 230, 80);
const COL_TARGET: Rgb = (230, 60, 60);

/// One rendered map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub fg: Rgb,
}

/// Linear blend of two colours, `t` in `0.0..=1.0`.
fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Everything the renderer needs to draw one frame.
pub struct Scene<'a> {
    pub map: &'a Grid,
    /// Exported wave buffer; may be empty.
    pub wave: &'a Grid,
    pub path: &'a Path,
    pub start: Point,
    pub target: Point,
}

impl Scene<'_> {
    /// Largest non-negative value in the wave buffer.
    fn wave_max(&self) -> i32 {
        self.wave.iter().map(|(_, v)| v).max().unwrap_or(0).max(1)
    }

    /// Glyph for `p`. Endpoints win over the path, the path over explored
    /// cells, explored cells over terrain.
    pub fn glyph(&self, p: Point) -> Glyph {
        self.glyph_scaled(p, self.wave_max())
    }

    fn glyph_scaled(&self, p: Point, wave_max: i32) -> Glyph {
        if p == self.start {
            return Glyph { ch: 'S', fg: COL_START };
        }
        if p == self.target {
            return Glyph { ch: 'T', fg: COL_TARGET };
        }
        if self.path.contains(p) {
            return Glyph { ch: '*', fg: COL_PATH };
        }
        let cost = self.map.at(p).unwrap_or(0);
        if cost <= 0 {
            return Glyph { ch: '#', fg: COL_WALL };
        }
        match self.wave.at(p) {
            Some(v) if v >= 0 => Glyph {
                ch: '~',
                fg: lerp(COL_WAVE_NEAR, COL_WAVE_FAR, v as f64 / wave_max as f64),
            },
            _ if cost == 1 => Glyph { ch: '.', fg: COL_GROUND },
            _ => Glyph {
                ch: char::from_digit(cost.min(9) as u32, 10).unwrap_or('+'),
                fg: lerp(COL_ROUGH_LOW, COL_ROUGH_HIGH, cost as f64 / 9.0),
            },
        }
    }

    /// Glyphs of one map row, left to right.
    pub fn row(&self, y: i32) -> Vec<Glyph> {
        let wave_max = self.wave_max();
        (0..self.map.width())
            .map(|x| self.glyph_scaled(Point::new(x, y), wave_max))
            .collect()
    }
}

/// Count of explored cells in an exported wave buffer.
pub fn explored(wave: &Grid) -> usize {
    wave.iter()
        .filter(|&(_, v)| v != WALL && v != UNVISITED)
        .count()
}

/// Build the engine selected by `opts` over `map`.
pub fn build_engine<'a>(map: &'a Grid, opts: &Options) -> Box<dyn SearchEngine + 'a> {
    match opts.engine {
        EngineKind::AStar => Box::new(AStarEngine::with_map(map, opts.astar())),
        EngineKind::Wave => Box::new(WaveEngine::with_map(map, opts.wave())),
    }
}

/// Generate the terrain for `opts` with both endpoints made passable.
pub fn demo_map(opts: &Options) -> Grid {
    let mut map = generate(&opts.terrain(), opts.seed);
    map.set(opts.start(), terrain::GROUND_COST);
    map.set(opts.target(), terrain::GROUND_COST);
    map
}
