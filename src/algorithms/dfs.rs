//! Depth-first search.

use crate::algorithms::SearchError;
use crate::algorithms::Strategy;
use crate::algorithms::run;
use crate::config::DfsMembership;
use crate::config::SearchConfig;
use crate::data_structures::frontier::Stack;
use crate::grid::Grid;
use crate::grid::Position;
use crate::neighbours::Child;
use crate::neighbours::NeighbourMode;
use crate::search::SearchNode;
use crate::search::SearchOutcome;

/// Stack driven, 4-wind, no costs.
#[derive(Copy, Clone, Debug, Default)]
pub struct DepthFirst {
    pub membership: DfsMembership,
}

impl From<&SearchConfig> for DepthFirst {
    fn from(config: &SearchConfig) -> Self {
        Self {
            membership: config.dfs_membership,
        }
    }
}

impl Strategy for DepthFirst {
    type Frontier = Stack;

    const NAME: &'static str = "DFS";
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

    fn checks_frontier(&self) -> bool {
        self.membership == DfsMembership::LedgerAndStack
    }
}

/// Depth-first search from `start` to `end`.
pub fn depth_first_search(
    grid: &Grid,
    start: Position,
    end: Position,
) -> Result<SearchOutcome, SearchError> {
    run(&DepthFirst::default(), grid, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::testing::*;

    #[test_log::test]
    fn scenario() {
        let grid = scenario_grid();
        let outcome = depth_first_search(&grid, START, END).unwrap();
        assert_valid(&grid, NeighbourMode::FourWind, START, END, &outcome);
        assert_eq!(
            outcome,
            SearchOutcome::Found {
                visited: positions(&[
                    (4, 0),
                    (4, 1),
                    (4, 2),
                    (4, 3),
                    (4, 4),
                    (3, 4),
                    (3, 3),
                    (3, 2),
                    (2, 3),
                    (2, 4),
                    (1, 4),
                    (0, 4)
                ]),
                path: positions(&[
                    (0, 4),
                    (1, 4),
                    (2, 4),
                    (2, 3),
                    (3, 3),
                    (3, 4),
                    (4, 4),
                    (4, 3),
                    (4, 2),
                    (4, 1),
                    (4, 0)
                ]),
            }
        );
    }

    #[test_log::test]
    fn scenario_checking_the_stack() {
        let grid = scenario_grid();
        let dfs = DepthFirst {
            membership: DfsMembership::LedgerAndStack,
        };
        let outcome = run(&dfs, &grid, START, END).unwrap();
        assert_valid(&grid, NeighbourMode::FourWind, START, END, &outcome);
        assert_eq!(
            outcome,
            SearchOutcome::Found {
                visited: positions(&[
                    (4, 0),
                    (4, 1),
                    (4, 2),
                    (4, 3),
                    (4, 4),
                    (3, 4),
                    (2, 4),
                    (2, 3),
                    (1, 4),
                    (0, 4)
                ]),
                path: positions(&[
                    (0, 4),
                    (1, 4),
                    (2, 4),
                    (3, 4),
                    (4, 4),
                    (4, 3),
                    (4, 2),
                    (4, 1),
                    (4, 0)
                ]),
            }
        );
    }

    #[test]
    fn duplicate_stack_entries_are_accepted_once() {
        // (0,1) is pushed from (0,0) and again from (1,1) before either copy pops.
        let grid = Grid::try_from("0,0,1\n0,0,1\n1,1,0").unwrap();
        let outcome = depth_first_search(&grid, Position::new(0, 0), Position::new(2, 2)).unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::Exhausted {
                visited: positions(&[(0, 0), (1, 0), (1, 1), (0, 1)])
            }
        );
    }

    #[test]
    fn fresh_stack_per_call() {
        let grid = scenario_grid();
        let first = depth_first_search(&grid, START, END).unwrap();
        let other = depth_first_search(&grid, Position::new(0, 0), Position::new(1, 0)).unwrap();
        assert_eq!(other.visited(), positions(&[(0, 0), (1, 0)]).as_slice());
        assert_eq!(depth_first_search(&grid, START, END).unwrap(), first);
    }
}
