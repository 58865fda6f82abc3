//! Heuristic formulas for A*.
//!
//! Every formula scales by an integer weight `W` and truncates to an
//! integer, so estimates stay comparable with the integer path costs.

use std::fmt;
use std::str::FromStr;

use gridwalk_core::Point;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// The remaining-cost estimate used by [`AStarEngine`](crate::AStarEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeuristicFormula {
    /// `W × (dx + dy)`.
    #[default]
    Manhattan,
    /// Chebyshev distance, `W × max(dx, dy)`.
    MaxDxDy,
    /// Octile-style distance counting a diagonal move as `2W`.
    DiagonalShortCut,
    /// `W × sqrt(dx² + dy²)`, truncated.
    Euclidean,
    /// `W × (dx² + dy²)`.
    EuclideanNoSqr,
    /// `W × (diag + orth + dx + dy)`. Not admissible; kept for maps tuned
    /// against it.
    Custom,
}

impl HeuristicFormula {
    /// Every formula, in declaration order.
    pub const ALL: [HeuristicFormula; 6] = [
        Self::Manhattan,
        Self::MaxDxDy,
        Self::DiagonalShortCut,
        Self::Euclidean,
        Self::EuclideanNoSqr,
        Self::Custom,
    ];

    /// Estimated cost from `from` to `target` scaled by `weight`.
    ///
    /// Saturates at `i32::MAX` on very distant cells.
    pub fn estimate(self, from: Point, target: Point, weight: i32) -> i32 {
        let dx = (i64::from(target.x) - i64::from(from.x)).abs();
        let dy = (i64::from(target.y) - i64::from(from.y)).abs();
        let weight = i64::from(weight);
        let squared = dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy));
        let h = match self {
            Self::Manhattan => weight.saturating_mul(dx + dy),
            Self::MaxDxDy => weight.saturating_mul(dx.max(dy)),
            Self::DiagonalShortCut => {
                let diagonal = dx.min(dy);
                let straight = dx + dy;
                (weight * 2)
                    .saturating_mul(diagonal)
                    .saturating_add(weight.saturating_mul(straight - 2 * diagonal))
            }
            Self::Euclidean => (weight as f64 * (squared as f64).sqrt()) as i64,
            Self::EuclideanNoSqr => weight.saturating_mul(squared),
            Self::Custom => {
                let orthogonal = (dx - dy).abs();
                let diagonal = (dx + dy - orthogonal).abs() / 2;
                weight.saturating_mul(diagonal + orthogonal + dx + dy)
            }
        };
        i32::try_from(h).unwrap_or(i32::MAX)
    }

    /// Canonical lower-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Manhattan => "manhattan",
            Self::MaxDxDy => "max-dxdy",
            Self::DiagonalShortCut => "diagonal-shortcut",
            Self::Euclidean => "euclidean",
            Self::EuclideanNoSqr => "euclidean-no-sqr",
            Self::Custom => "custom",
        }
    }
}

/// Add the cross-product tie-breaker to the estimate `h`.
///
/// The perturbation grows with the distance of `parent` from the straight
/// line between `start` and `target`, so equal-`f` nodes near that line win.
#[inline]
pub fn tie_break(h: i32, parent: Point, start: Point, target: Point) -> i32 {
    let dx1 = i64::from(parent.x) - i64::from(target.x);
    let dy1 = i64::from(parent.y) - i64::from(target.y);
    let dx2 = i64::from(start.x) - i64::from(target.x);
    let dy2 = i64::from(start.y) - i64::from(target.y);
    let cross = (dx1 * dy2 - dx2 * dy1).abs();
    (h as f64 + cross as f64 * 0.001) as i32
}

impl fmt::Display for HeuristicFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a heuristic name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFormulaError {
    name: String,
}

impl fmt::Display for ParseFormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown heuristic formula \u{201c}{}\u{201d}", self.name)
    }
}

impl std::error::Error for ParseFormulaError {}

impl FromStr for HeuristicFormula {
    type Err = ParseFormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");
        match name.as_str() {
            "manhattan" => Ok(Self::Manhattan),
            "max-dxdy" | "chebyshev" => Ok(Self::MaxDxDy),
            "diagonal-shortcut" | "diagonal" | "octile" => Ok(Self::DiagonalShortCut),
            "euclidean" => Ok(Self::Euclidean),
            "euclidean-no-sqr" | "euclidean-squared" => Ok(Self::EuclideanNoSqr),
            "custom" => Ok(Self::Custom),
            _ => Err(ParseFormulaError { name: s.to_owned() }),
        }
    }
}
