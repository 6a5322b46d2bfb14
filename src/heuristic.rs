//! Estimates of the remaining cost between two cells.

use derive_more::Display;

use crate::grid::Position;
use crate::neighbours::Cost;
use crate::neighbours::DIAGONAL_COST;
use crate::neighbours::STRAIGHT_COST;

/// A goal-directed estimate.
pub trait Heuristic: std::fmt::Debug {
    fn h(&self, from: &Position, to: &Position) -> Cost;
}

#[inline(always)]
fn deltas(a: &Position, b: &Position) -> (Cost, Cost) {
    (a.row.abs_diff(b.row), a.col.abs_diff(b.col))
}

/// Octile distance: take every useful diagonal, walk straight for the rest.
///
/// ```
/// use gridsearch::grid::Position;
/// use gridsearch::heuristic::{DiagonalDistance, Heuristic};
/// let h = DiagonalDistance.h(&Position::new(4, 0), &Position::new(0, 4));
/// assert_eq!(h, 56);
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct DiagonalDistance;

impl Heuristic for DiagonalDistance {
    #[inline(always)]
    fn h(&self, from: &Position, to: &Position) -> Cost {
        let (dx, dy) = deltas(from, to);
        // 10 * (dx + dy) - 6 * min(dx, dy)
        STRAIGHT_COST * (dx + dy) - (2 * STRAIGHT_COST - DIAGONAL_COST) * dx.min(dy)
    }
}

/// The distance of following straight lines.
#[derive(Copy, Clone, Debug, Default)]
pub struct ManhattanDistance;

impl Heuristic for ManhattanDistance {
    #[inline(always)]
    fn h(&self, from: &Position, to: &Position) -> Cost {
        let (dx, dy) = deltas(from, to);
        STRAIGHT_COST * (dx + dy)
    }
}

/// Runtime choice of heuristic.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HeuristicKind {
    #[default]
    #[display("diagonal")]
    Diagonal,
    #[display("manhattan")]
    Manhattan,
}

impl Heuristic for HeuristicKind {
    #[inline(always)]
    fn h(&self, from: &Position, to: &Position) -> Cost {
        match self {
            HeuristicKind::Diagonal => DiagonalDistance.h(from, to),
            HeuristicKind::Manhattan => ManhattanDistance.h(from, to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_matches_octile_formula() {
        let end = Position::new(0, 4);
        for (p, expected) in [
            (Position::new(0, 4), 0),
            (Position::new(1, 4), 10),
            (Position::new(0, 3), 10),
            (Position::new(1, 3), 14),
            (Position::new(3, 0), 52),
            (Position::new(4, 1), 52),
            (Position::new(2, 1), 38),
            (Position::new(4, 2), 48),
        ] {
            assert_eq!(DiagonalDistance.h(&p, &end), expected, "at {p}");
        }
    }

    #[test]
    fn diagonal_is_symmetric() {
        let a = Position::new(7, 2);
        let b = Position::new(1, 9);
        assert_eq!(DiagonalDistance.h(&a, &b), DiagonalDistance.h(&b, &a));
    }

    #[test]
    fn manhattan() {
        assert_eq!(
            ManhattanDistance.h(&Position::new(4, 0), &Position::new(0, 4)),
            80
        );
        assert_eq!(
            HeuristicKind::Manhattan.h(&Position::new(1, 1), &Position::new(1, 1)),
            0
        );
    }

    #[test]
    fn never_exceeds_manhattan() {
        let end = Position::new(5, 5);
        for row in 0..10 {
            for col in 0..10 {
                let p = Position::new(row, col);
                assert!(DiagonalDistance.h(&p, &end) <= ManhattanDistance.h(&p, &end));
            }
        }
    }
}
