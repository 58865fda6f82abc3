//! Pathfinding engines for weighted rectangular grids.
//!
//! Two interchangeable strategies implement the same [`SearchEngine`]
//! lifecycle:
//!
//! - **A\*** best-first search ([`AStarEngine`]) with configurable heuristic
//!   formula, weight, tie-breaking, diagonal weighting, direction-change
//!   penalty, node reopening and a closed-set budget.
//! - **Wave** propagation ([`WaveEngine`]): breadth-first distance labelling
//!   from the target, followed by greedy descent from the start.
//!
//! Both engines can run to completion ([`SearchEngine::find`] /
//! [`SearchEngine::expand`]) or one unit of work at a time
//! ([`SearchEngine::prepare_step`] + [`SearchEngine::step`]) so that callers
//! can visualize progress through [`SearchEngine::export_wave`].
//!
//! Maps are read through the [`GridMap`] capability; [`gridwalk_core::Grid`]
//! implements it directly. An engine owns all of its search state, so each
//! concurrent query needs its own engine, while a map may be shared.

mod astar;
mod heuristic;
mod neighbors;
mod node;
mod path;
mod traits;
mod wave;

pub use astar::{AStarConfig, AStarEngine, ConfigError, DIRECTION_CHANGE_PENALTY, HEAVY_DIAGONAL_FACTOR};
pub use heuristic::{HeuristicFormula, ParseFormulaError, chebyshev, manhattan, tie_break};
pub use neighbors::{DIRECTIONS_4, DIRECTIONS_8, directions, is_diagonal};
pub use node::AStarNode;
pub use path::{Path, PathPoint};
pub use traits::{GridMap, MAX_COST, SearchEngine, SearchState};
pub use wave::{UNVISITED, WALL, WaveConfig, WaveEngine};
