//! Implementation of search algorithms.
//!
//! Depth-first, breadth-first and cost guided search share one driver loop,
//! [`run`], and differ only in their [`Strategy`]: the frontier they use, how
//! far a cell reaches and how nodes are scored.

pub mod astar;
pub mod bfs;
pub mod dfs;

use std::fmt::Debug;

use derive_more::Display;
use log::debug;
use log::trace;
use thiserror::Error;

use crate::config::SearchConfig;
use crate::data_structures::frontier::Frontier;
use crate::grid::Grid;
use crate::grid::GridError;
use crate::grid::Position;
use crate::heuristic::HeuristicKind;
use crate::neighbours::Child;
use crate::neighbours::NeighbourMode;
use crate::search::Endpoint;
use crate::search::LedgerError;
use crate::search::SearchNode;
use crate::search::SearchOutcome;
use crate::search::VisitedLedger;

pub use astar::cost_guided_search;
pub use bfs::breadth_first_search;
pub use dfs::depth_first_search;

/// Contract violations. A missing path is a [`SearchOutcome`], not an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// What sets one search apart from the others.
pub trait Strategy: Debug {
    type Frontier: Frontier;

    const NAME: &'static str;
    const MODE: NeighbourMode;

    fn start_node(&self, grid: &Grid, start: Position, end: &Position) -> SearchNode;
    fn child_node(
        &self,
        grid: &Grid,
        parent: &SearchNode,
        child: &Child,
        end: &Position,
    ) -> SearchNode;

    /// Whether children already held by the frontier are skipped.
    fn checks_frontier(&self) -> bool {
        true
    }
}

/// Searches from `start` to `end`.
///
/// Each call owns a fresh frontier and ledger.
pub fn run<S: Strategy>(
    strategy: &S,
    grid: &Grid,
    start: Position,
    end: Position,
) -> Result<SearchOutcome, SearchError> {
    run_with_ledger(strategy, grid, start, end).map(|(outcome, _)| outcome)
}

/// Like [`run`], also handing back the ledger the search filled.
///
/// The ledger is empty when an endpoint is blocked.
pub fn run_with_ledger<S: Strategy>(
    strategy: &S,
    grid: &Grid,
    start: Position,
    end: Position,
) -> Result<(SearchOutcome, VisitedLedger), SearchError> {
    let mut ledger = VisitedLedger::new();
    grid.check_bounds(&start)?;
    grid.check_bounds(&end)?;
    if !grid.is_free(&start) {
        debug!("{}: start {start} is blocked", S::NAME);
        return Ok((SearchOutcome::Blocked(Endpoint::Start), ledger));
    }
    if !grid.is_free(&end) {
        debug!("{}: end {end} is blocked", S::NAME);
        return Ok((SearchOutcome::Blocked(Endpoint::End), ledger));
    }
    debug!("{}: {start} -> {end} on {grid:?} ({strategy:?})", S::NAME);

    let mut frontier = S::Frontier::default();
    frontier.push(strategy.start_node(grid, start, &end));

    while let Some(node) = frontier.pop() {
        if ledger.contains(node.position()) {
            trace!("discard {node}, already accepted");
            continue;
        }
        ledger.accept(&node);

        if *node.position() == end {
            let path = ledger.reconstruct_path(&end, &start)?;
            debug!(
                "{}: found {} steps after accepting {} nodes",
                S::NAME,
                path.len(),
                ledger.len()
            );
            let visited = ledger.order().to_vec();
            return Ok((SearchOutcome::Found { visited, path }, ledger));
        }

        for child in node.children() {
            if !child.accessible || ledger.contains(&child.position) {
                continue;
            }
            if strategy.checks_frontier() && frontier.contains(&child.position) {
                continue;
            }
            trace!("push {} from {}", child.position, node.position());
            frontier.push(strategy.child_node(grid, &node, child, &end));
        }
    }

    debug!("{}: exhausted after accepting {} nodes", S::NAME, ledger.len());
    let visited = ledger.order().to_vec();
    Ok((SearchOutcome::Exhausted { visited }, ledger))
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    #[display("DFS")]
    Dfs,
    #[display("BFS")]
    Bfs,
    #[display("A*")]
    #[value(name = "astar")]
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Dfs, Algorithm::Bfs, Algorithm::AStar];

    pub fn mode(&self) -> NeighbourMode {
        match self {
            Algorithm::Dfs => dfs::DepthFirst::MODE,
            Algorithm::Bfs => bfs::BreadthFirst::MODE,
            Algorithm::AStar => astar::CostGuided::<HeuristicKind>::MODE,
        }
    }

    pub fn search(
        &self,
        config: &SearchConfig,
        grid: &Grid,
        start: Position,
        end: Position,
    ) -> Result<SearchOutcome, SearchError> {
        self.search_with_ledger(config, grid, start, end)
            .map(|(outcome, _)| outcome)
    }

    pub fn search_with_ledger(
        &self,
        config: &SearchConfig,
        grid: &Grid,
        start: Position,
        end: Position,
    ) -> Result<(SearchOutcome, VisitedLedger), SearchError> {
        match self {
            Algorithm::Dfs => run_with_ledger(&dfs::DepthFirst::from(config), grid, start, end),
            Algorithm::Bfs => run_with_ledger(&bfs::BreadthFirst, grid, start, end),
            Algorithm::AStar => run_with_ledger(
                &astar::CostGuided::<HeuristicKind>::from(config),
                grid,
                start,
                end,
            ),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use indoc::indoc;

    use crate::grid::Grid;
    use crate::grid::Position;
    use crate::neighbours::NeighbourMode;
    use crate::search::SearchOutcome;

    /// A 5x5 grid with an anti-diagonal wall that leaves one way around.
    pub(crate) fn scenario_grid() -> Grid {
        Grid::try_from(indoc! {"
            0,0,0,0,0
            0,0,0,1,0
            1,1,1,0,0
            0,1,0,0,0
            0,0,0,0,0
        "})
        .unwrap()
    }

    pub(crate) const START: Position = Position::new(4, 0);
    pub(crate) const END: Position = Position::new(0, 4);

    pub(crate) fn positions(v: &[(u32, u32)]) -> Vec<Position> {
        v.iter().copied().map(Position::from).collect()
    }

    /// Checks everything a found path must satisfy.
    pub(crate) fn assert_valid(
        grid: &Grid,
        mode: NeighbourMode,
        start: Position,
        end: Position,
        outcome: &SearchOutcome,
    ) {
        let SearchOutcome::Found { visited, path } = outcome else {
            return;
        };
        assert_eq!(visited.first(), Some(&start));
        assert_eq!(visited.last(), Some(&end));
        assert_eq!(path.first(), Some(&end));
        assert_eq!(path.last(), Some(&start));
        for p in path {
            assert!(grid.is_free(p), "{p} on the path is blocked");
            assert!(visited.contains(p), "{p} on the path was never visited");
        }
        for step in path.windows(2) {
            assert!(
                mode.adjacent(&step[0], &step[1]),
                "{} -> {} is not a {mode} step",
                step[0],
                step[1]
            );
        }
        let mut seen = visited.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), visited.len(), "visited holds duplicates");
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;
    use rand::Rng;

    use super::testing::*;
    use super::*;
    use crate::config::DfsMembership;

    const NUM_INSTANCES: u64 = 500;

    fn random_instance(seed: u64) -> (Grid, Position, Position) {
        let mut r = ChaCha8Rng::seed_from_u64(seed);
        let grid = Grid::random(&mut r, 5, 5, 0.35);
        let start = Position::new(r.random_range(0..5), r.random_range(0..5));
        let end = Position::new(r.random_range(0..5), r.random_range(0..5));
        (grid, start, end)
    }

    fn configs() -> [SearchConfig; 3] {
        [
            SearchConfig::default(),
            SearchConfig::default().with_dfs_membership(DfsMembership::LedgerAndStack),
            SearchConfig::default().with_heuristic(HeuristicKind::Manhattan),
        ]
    }

    #[test_log::test]
    fn random_grids_give_sentinel_or_valid_path() {
        for seed in 0..NUM_INSTANCES {
            let (grid, start, end) = random_instance(seed);
            let blocked = !grid.is_free(&start) || !grid.is_free(&end);
            for config in configs() {
                for algorithm in Algorithm::ALL {
                    let outcome = algorithm.search(&config, &grid, start, end).unwrap();
                    assert_eq!(
                        matches!(outcome, SearchOutcome::Blocked(_)),
                        blocked,
                        "{algorithm} on seed {seed}"
                    );
                    assert_valid(&grid, algorithm.mode(), start, end, &outcome);

                    let (visited, path) = outcome.into_sequences();
                    assert!(!visited.is_empty());
                    assert!(!path.is_empty());
                }
            }
        }
    }

    #[test]
    fn searches_are_deterministic() {
        for seed in 0..50 {
            let (grid, start, end) = random_instance(seed);
            for algorithm in Algorithm::ALL {
                let config = SearchConfig::default();
                assert_eq!(
                    algorithm.search(&config, &grid.clone(), start, end),
                    algorithm.search(&config, &grid.clone(), start, end)
                );
            }
        }
    }

    #[test]
    fn strategies_agree_on_reachability() {
        for seed in 0..NUM_INSTANCES {
            let (grid, start, end) = random_instance(seed);
            let config = SearchConfig::default();
            let dfs = Algorithm::Dfs.search(&config, &grid, start, end).unwrap();
            let bfs = Algorithm::Bfs.search(&config, &grid, start, end).unwrap();
            let astar = Algorithm::AStar.search(&config, &grid, start, end).unwrap();

            assert_eq!(dfs.is_found(), bfs.is_found(), "seed {seed}");
            // Diagonal moves only add reachable cells.
            if bfs.is_found() {
                assert!(astar.is_found(), "seed {seed}");
            }
            // Breadth first finds the fewest 4-wind steps.
            if let (Some(b), Some(d)) = (bfs.path(), dfs.path()) {
                assert!(b.len() <= d.len(), "seed {seed}");
            }
        }
    }

    #[test]
    fn start_is_end() {
        let grid = scenario_grid();
        for algorithm in Algorithm::ALL {
            let outcome = algorithm
                .search(&SearchConfig::default(), &grid, START, START)
                .unwrap();
            assert_eq!(
                outcome,
                SearchOutcome::Found {
                    visited: vec![START],
                    path: vec![START]
                }
            );
        }
    }

    #[test]
    fn blocked_endpoints_give_sentinel() {
        let grid = scenario_grid();
        let wall = Position::new(2, 2);
        for algorithm in Algorithm::ALL {
            let config = SearchConfig::default();
            assert_eq!(
                algorithm.search(&config, &grid, wall, END),
                Ok(SearchOutcome::Blocked(Endpoint::Start))
            );
            assert_eq!(
                algorithm.search(&config, &grid, START, wall),
                Ok(SearchOutcome::Blocked(Endpoint::End))
            );
            assert_eq!(
                algorithm
                    .search(&config, &grid, START, wall)
                    .unwrap()
                    .into_sequences(),
                (vec![None], vec![None])
            );
        }
    }

    #[test]
    fn walled_off_end_is_exhausted() {
        let grid = Grid::try_from(indoc::indoc! {"
            0,0,1,0
            0,0,1,0
            1,1,1,0
        "})
        .unwrap();
        for algorithm in Algorithm::ALL {
            let outcome = algorithm
                .search(
                    &SearchConfig::default(),
                    &grid,
                    Position::new(0, 0),
                    Position::new(2, 3),
                )
                .unwrap();
            let SearchOutcome::Exhausted { visited } = &outcome else {
                panic!("{algorithm} got {outcome}");
            };
            let mut visited = visited.clone();
            visited.sort();
            assert_eq!(
                visited,
                positions(&[(0, 0), (0, 1), (1, 0), (1, 1)]),
                "{algorithm}"
            );
            assert_eq!(outcome.into_sequences(), (vec![None], vec![None]));
        }
    }

    #[test]
    fn ledger_matches_outcome() {
        let grid = scenario_grid();
        let (outcome, ledger) = run_with_ledger(&bfs::BreadthFirst, &grid, START, END).unwrap();
        assert_eq!(ledger.order(), outcome.visited());
        assert_eq!(ledger.get(&END).and_then(|r| r.parent), Some(Position::new(1, 4)));

        let (outcome, ledger) =
            run_with_ledger(&bfs::BreadthFirst, &grid, Position::new(2, 0), END).unwrap();
        assert_eq!(outcome, SearchOutcome::Blocked(Endpoint::Start));
        assert!(ledger.is_empty());
    }

    #[test]
    fn out_of_bounds_fails_fast() {
        let grid = scenario_grid();
        let outside = Position::new(5, 0);
        for algorithm in Algorithm::ALL {
            assert_eq!(
                algorithm.search(&SearchConfig::default(), &grid, outside, END),
                Err(SearchError::Grid(GridError::OutOfBounds {
                    position: outside,
                    rows: 5,
                    cols: 5
                }))
            );
            assert!(
                algorithm
                    .search(&SearchConfig::default(), &grid, START, Position::new(0, 9))
                    .is_err()
            );
        }
    }
}
