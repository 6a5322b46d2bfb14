use std::fmt::Debug;

use derive_more::Display;
use log::trace;
use num_traits::SaturatingAdd;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::grid::Grid;
use crate::grid::Position;
use crate::neighbours::Children;
use crate::neighbours::Cost;
use crate::neighbours::NeighbourMode;
use crate::neighbours::expand;

/// The expansion record of one cell during one search.
///
/// Immutable once built. Reaching the same position again builds a new node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchNode {
    position: Position,
    parent: Option<Position>,
    /// Cost of the step that reached this node, if the strategy tracks it.
    cost: Option<Cost>,
    heuristic: Option<Cost>,
    children: Children,
}

impl SearchNode {
    pub fn new(
        grid: &Grid,
        position: Position,
        parent: Option<Position>,
        mode: NeighbourMode,
        cost: Option<Cost>,
        heuristic: Option<Cost>,
    ) -> Self {
        debug_assert!(grid.contains(&position));
        let children = expand(grid, &position, parent.as_ref(), mode);
        Self {
            position,
            parent,
            cost,
            heuristic,
            children,
        }
    }

    #[inline(always)]
    pub fn position(&self) -> &Position {
        &self.position
    }
    #[inline(always)]
    pub fn parent(&self) -> Option<&Position> {
        self.parent.as_ref()
    }
    #[inline(always)]
    pub fn cost(&self) -> Option<Cost> {
        self.cost
    }
    #[inline(always)]
    pub fn heuristic(&self) -> Option<Cost> {
        self.heuristic
    }
    #[inline(always)]
    pub fn children(&self) -> &Children {
        &self.children
    }

    /// `cost + heuristic`, when both are tracked.
    #[inline(always)]
    #[must_use]
    pub fn total_priority(&self) -> Option<Cost> {
        match (self.cost, self.heuristic) {
            (Some(c), Some(h)) => Some(SaturatingAdd::saturating_add(&c, &h)),
            _ => None,
        }
    }
}

impl std::fmt::Display for SearchNode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Node{}", self.position)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LedgerRecord {
    pub position: Position,
    pub parent: Option<Position>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("No accepted node at {position}")]
    MissingRecord { position: Position },
    #[error("Parent chain from {goal} ended at {stuck} before reaching {start}")]
    BrokenChain {
        goal: Position,
        start: Position,
        stuck: Position,
    },
}

/// Every node accepted during a search, in pop order and by position.
#[derive(Default)]
pub struct VisitedLedger {
    order: Vec<Position>,
    records: FxHashMap<Position, LedgerRecord>,
}

impl VisitedLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a popped node.
    pub fn accept(&mut self, node: &SearchNode) {
        debug_assert!(
            !self.contains(node.position()),
            "{} was accepted twice",
            node.position()
        );
        trace!("accept {} (parent {:?})", node.position, node.parent);

        self.order.push(node.position);
        self.records.insert(
            node.position,
            LedgerRecord {
                position: node.position,
                parent: node.parent,
            },
        );
    }

    #[inline(always)]
    pub fn contains(&self, p: &Position) -> bool {
        self.records.contains_key(p)
    }

    pub fn get(&self, p: &Position) -> Option<&LedgerRecord> {
        self.records.get(p)
    }

    /// Positions in the order they were accepted.
    pub fn order(&self) -> &[Position] {
        &self.order
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Walks parent links from `goal` back to `start`.
    ///
    /// The result runs goal first, start last.
    pub fn reconstruct_path(
        &self,
        goal: &Position,
        start: &Position,
    ) -> Result<Vec<Position>, LedgerError> {
        let mut path = Vec::new();
        let mut current = *goal;

        while current != *start {
            let record = self
                .get(&current)
                .ok_or(LedgerError::MissingRecord { position: current })?;
            path.push(record.position);
            // Every step consumes a distinct record, a longer walk means a cycle.
            if path.len() > self.records.len() {
                return Err(LedgerError::BrokenChain {
                    goal: *goal,
                    start: *start,
                    stuck: current,
                });
            }
            current = record.parent.ok_or(LedgerError::BrokenChain {
                goal: *goal,
                start: *start,
                stuck: current,
            })?;
        }
        let record = self
            .get(&current)
            .ok_or(LedgerError::MissingRecord { position: current })?;
        path.push(record.position);

        Ok(path)
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "VisitedLedger Stats:")?;
        let s = size_of::<Position>();
        let l = self.order.len();
        let c = self.order.capacity();
        writeln!(
            out,
            "  - |Order|:   {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Order|*:  {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        let s = size_of::<(Position, LedgerRecord)>();
        let l = self.records.len();
        let c = self.records.capacity();
        writeln!(
            out,
            "  - |Index|:   {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Index|*:  {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        Ok(())
    }
}

impl Debug for VisitedLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "VisitedLedger{{({} nodes)}}", self.len())
    }
}

/// Which endpoint stopped a search before it started.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Endpoint {
    #[display("start")]
    Start,
    #[display("end")]
    End,
}

/// How a search ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The start or end cell is not free. Nothing was explored.
    Blocked(Endpoint),
    /// The frontier ran dry without reaching the end.
    Exhausted { visited: Vec<Position> },
    /// `visited` runs start first, `path` runs goal first.
    Found {
        visited: Vec<Position>,
        path: Vec<Position>,
    },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    pub fn path(&self) -> Option<&[Position]> {
        match self {
            SearchOutcome::Found { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn visited(&self) -> &[Position] {
        match self {
            SearchOutcome::Blocked(_) => &[],
            SearchOutcome::Exhausted { visited } => visited,
            SearchOutcome::Found { visited, .. } => visited,
        }
    }

    /// Flattens into `(visited, path)`, both `[None]` unless a path was found.
    pub fn into_sequences(self) -> (Vec<Option<Position>>, Vec<Option<Position>>) {
        match self {
            SearchOutcome::Found { visited, path } => (
                visited.into_iter().map(Some).collect(),
                path.into_iter().map(Some).collect(),
            ),
            SearchOutcome::Blocked(_) | SearchOutcome::Exhausted { .. } => (vec![None], vec![None]),
        }
    }
}

impl std::fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        const MAX_POSITIONS_DISPLAYED: usize = 20;

        match self {
            SearchOutcome::Blocked(endpoint) => write!(f, "Blocked({endpoint})"),
            SearchOutcome::Exhausted { visited } => {
                write!(f, "Exhausted({} visited)", visited.len())
            }
            SearchOutcome::Found { visited, path } => {
                write!(f, "Found({} visited, {} steps:", visited.len(), path.len())?;
                for p in path.iter().take(MAX_POSITIONS_DISPLAYED) {
                    write!(f, " {p}")?;
                }
                if path.len() > MAX_POSITIONS_DISPLAYED {
                    write!(f, " ...")?;
                }
                write!(f, ")")
            }
        }
    }
}
