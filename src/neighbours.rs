//! Neighbour expansion over an implicit grid graph.
//!
//! Nothing is materialised; children are computed on demand from a [`Grid`]
//! and a [`Position`].

use derive_more::Display;
use smallvec::SmallVec;

use crate::grid::Grid;
use crate::grid::Position;

pub type Cost = u32;

pub const STRAIGHT_COST: Cost = 10;
pub const DIAGONAL_COST: Cost = 14;

/// Which cells count as adjacent.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Default)]
pub enum NeighbourMode {
    /// N, E, S, W
    #[default]
    #[display("4-wind")]
    FourWind,
    /// NW, N, NE, W, E, SW, S, SE
    #[display("8-wind")]
    EightWind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

// Children come out in this order, which breaks ties in the frontiers.
const FOUR_WIND: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];
const EIGHT_WIND: [Direction; 8] = [
    Direction::NorthWest,
    Direction::North,
    Direction::NorthEast,
    Direction::West,
    Direction::East,
    Direction::SouthWest,
    Direction::South,
    Direction::SouthEast,
];

impl Direction {
    /// `(d_row, d_col)`, rows grow southwards.
    #[inline(always)]
    pub const fn offset(&self) -> (i32, i32) {
        #[rustfmt::skip]
        let offset = match self {
            Direction::North     => (-1,  0),
            Direction::NorthEast => (-1,  1),
            Direction::East      => ( 0,  1),
            Direction::SouthEast => ( 1,  1),
            Direction::South     => ( 1,  0),
            Direction::SouthWest => ( 1, -1),
            Direction::West      => ( 0, -1),
            Direction::NorthWest => (-1, -1),
        };
        offset
    }

    #[inline(always)]
    pub const fn is_diagonal(&self) -> bool {
        let (d_row, d_col) = self.offset();
        d_row != 0 && d_col != 0
    }

    #[inline(always)]
    pub const fn cost(&self) -> Cost {
        if self.is_diagonal() {
            DIAGONAL_COST
        } else {
            STRAIGHT_COST
        }
    }
}

impl NeighbourMode {
    #[inline(always)]
    pub fn directions(&self) -> &'static [Direction] {
        match self {
            NeighbourMode::FourWind => &FOUR_WIND,
            NeighbourMode::EightWind => &EIGHT_WIND,
        }
    }

    /// Whether `a` and `b` are one step apart under this mode.
    ///
    /// ```
    /// use gridsearch::grid::Position;
    /// use gridsearch::neighbours::NeighbourMode;
    /// let a = Position::new(1, 1);
    /// assert!(NeighbourMode::FourWind.adjacent(&a, &Position::new(0, 1)));
    /// assert!(!NeighbourMode::FourWind.adjacent(&a, &Position::new(0, 0)));
    /// assert!(NeighbourMode::EightWind.adjacent(&a, &Position::new(0, 0)));
    /// assert!(!NeighbourMode::EightWind.adjacent(&a, &a));
    /// ```
    pub fn adjacent(&self, a: &Position, b: &Position) -> bool {
        self.directions()
            .iter()
            .any(|d| a.offset(d.offset().0, d.offset().1) == Some(*b))
    }
}

/// A neighbour of an expanded cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Child {
    pub position: Position,
    /// The cell holds a free value.
    pub accessible: bool,
    /// Cost of the single step into this cell.
    pub edge_cost: Cost,
}

pub type Children = SmallVec<[Child; 8]>;

/// Expands `position` into its in-bounds neighbours.
///
/// The `parent` cell is left out, blocked cells are kept but flagged as not
/// accessible.
pub fn expand(
    grid: &Grid,
    position: &Position,
    parent: Option<&Position>,
    mode: NeighbourMode,
) -> Children {
    let mut children = Children::new();
    for direction in mode.directions() {
        let (d_row, d_col) = direction.offset();
        let Some(p) = position.offset(d_row, d_col) else {
            continue;
        };
        if parent == Some(&p) {
            continue;
        }
        let Some(v) = grid.value(&p) else {
            continue;
        };
        children.push(Child {
            position: p,
            accessible: v == crate::grid::FREE,
            edge_cost: direction.cost(),
        });
    }
    children
}
