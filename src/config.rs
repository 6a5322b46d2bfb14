//! Knobs shared by the search entry points and the command line tools.

use derive_more::Display;

use crate::heuristic::HeuristicKind;

/// How depth-first search decides a child is already pending.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DfsMembership {
    /// Only accepted positions are skipped. A cell may sit on the stack more
    /// than once, its later copies are discarded when popped.
    #[default]
    #[display("ledger-only")]
    LedgerOnly,
    /// Positions already on the stack are skipped too.
    #[display("ledger-and-stack")]
    LedgerAndStack,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchConfig {
    pub dfs_membership: DfsMembership,
    /// Estimate used by the cost guided search.
    pub heuristic: HeuristicKind,
}

impl SearchConfig {
    pub fn with_dfs_membership(mut self, dfs_membership: DfsMembership) -> Self {
        self.dfs_membership = dfs_membership;
        self
    }

    pub fn with_heuristic(mut self, heuristic: HeuristicKind) -> Self {
        self.heuristic = heuristic;
        self
    }
}
