//! Breadth-first search.

use crate::algorithms::SearchError;
use crate::algorithms::Strategy;
use crate::algorithms::run;
use crate::data_structures::frontier::Queue;
use crate::grid::Grid;
use crate::grid::Position;
use crate::neighbours::Child;
use crate::neighbours::NeighbourMode;
use crate::search::SearchNode;
use crate::search::SearchOutcome;

/// Queue driven, 4-wind, no costs.
#[derive(Copy, Clone, Debug, Default)]
pub struct BreadthFirst;

impl Strategy for BreadthFirst {
    type Frontier = Queue;

    const NAME: &'static str = "BFS";
    const MODE: NeighbourMode = NeighbourMode::FourWind;

    fn start_node(&self, grid: &Grid, start: Position, _end: &Position) -> SearchNode {
        SearchNode::new(grid, start, None, Self::MODE, None, None)
    }

    fn child_node(
        &self,
        grid: &Grid,
        parent: &SearchNode,
        child: &Child,
        _end: &Position,
    ) -> SearchNode {
        SearchNode::new(
            grid,
            child.position,
            Some(*parent.position()),
            Self::MODE,
            None,
            None,
        )
    }
}

/// Breadth-first search from `start` to `end`.
///
/// The path found has the fewest 4-wind steps.
///
/// ```
/// use gridsearch::algorithms::breadth_first_search;
/// use gridsearch::grid::Grid;
/// use gridsearch::grid::Position;
///
/// let grid = Grid::try_from("0,0\n1,0").unwrap();
/// let outcome = breadth_first_search(&grid, Position::new(0, 0), Position::new(1, 1)).unwrap();
/// assert_eq!(
///     outcome.path(),
///     Some(&[Position::new(1, 1), Position::new(0, 1), Position::new(0, 0)][..])
/// );
/// ```
pub fn breadth_first_search(
    grid: &Grid,
    start: Position,
    end: Position,
) -> Result<SearchOutcome, SearchError> {
    run(&BreadthFirst, grid, start, end)
}
