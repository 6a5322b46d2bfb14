//! Cost guided search.
//!
//! An A*-like best-first search over 8-wind moves. Nodes are ranked by the cost
//! of the single step that reached them plus a goal estimate, accumulated costs
//! are not tracked, so paths are plausible rather than optimal.

use crate::algorithms::SearchError;
use crate::algorithms::Strategy;
use crate::algorithms::run;
use crate::config::SearchConfig;
use crate::data_structures::frontier::PriorityFrontier;
use crate::grid::Grid;
use crate::grid::Position;
use crate::heuristic::Heuristic;
use crate::heuristic::HeuristicKind;
use crate::neighbours::Child;
use crate::neighbours::NeighbourMode;
use crate::search::SearchNode;
use crate::search::SearchOutcome;

#[derive(Copy, Clone, Debug, Default)]
pub struct CostGuided<H: Heuristic = HeuristicKind> {
    pub heuristic: H,
}

impl<H: Heuristic> CostGuided<H> {
    pub fn new(heuristic: H) -> Self {
        Self { heuristic }
    }
}

impl From<&SearchConfig> for CostGuided<HeuristicKind> {
    fn from(config: &SearchConfig) -> Self {
        Self::new(config.heuristic)
    }
}

impl<H: Heuristic> Strategy for CostGuided<H> {
    type Frontier = PriorityFrontier;

    const NAME: &'static str = "A*";
    const MODE: NeighbourMode = NeighbourMode::EightWind;

    fn start_node(&self, grid: &Grid, start: Position, end: &Position) -> SearchNode {
        let h = self.heuristic.h(&start, end);
        SearchNode::new(grid, start, None, Self::MODE, Some(0), Some(h))
    }

    fn child_node(
        &self,
        grid: &Grid,
        parent: &SearchNode,
        child: &Child,
        end: &Position,
    ) -> SearchNode {
        let h = self.heuristic.h(&child.position, end);
        SearchNode::new(
            grid,
            child.position,
            Some(*parent.position()),
            Self::MODE,
            Some(child.edge_cost),
            Some(h),
        )
    }
}

/// Cost guided search from `start` to `end` with the diagonal distance estimate.
///
/// ```
/// use gridsearch::algorithms::cost_guided_search;
/// use gridsearch::grid::Grid;
/// use gridsearch::grid::Position;
///
/// let grid = Grid::new_free_with_dimensions(3, 3);
/// let outcome = cost_guided_search(&grid, Position::new(2, 0), Position::new(0, 2)).unwrap();
/// assert_eq!(
///     outcome.path(),
///     Some(&[Position::new(0, 2), Position::new(1, 1), Position::new(2, 0)][..])
/// );
/// ```
pub fn cost_guided_search(
    grid: &Grid,
    start: Position,
    end: Position,
) -> Result<SearchOutcome, SearchError> {
    run(&CostGuided::<HeuristicKind>::default(), grid, start, end)
}
