//! Frontiers holding the nodes that are still waiting for expansion.
//!
//! Membership checks never look at node identity, only at positions. `Stack`
//! and `Queue` answer them from the positions they hold, `PriorityFrontier`
//! from its push log, see [`PriorityFrontier::contains`].

use std::collections::VecDeque;
use std::fmt::Debug;

use rustc_hash::FxHashMap;

use crate::grid::Position;
use crate::neighbours::Cost;
use crate::search::SearchNode;

/// The capabilities a search loop needs from its pending set.
pub trait Frontier: Default + Debug {
    fn push(&mut self, node: SearchNode);
    /// Removes the head.
    fn pop(&mut self) -> Option<SearchNode>;
    fn peek(&self) -> Option<&SearchNode>;
    /// Whether `p` counts as pending.
    fn contains(&self, p: &Position) -> bool;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counts how many held nodes sit at each position.
#[derive(Default, Debug)]
struct PositionIndex {
    counts: FxHashMap<Position, usize>,
}

impl PositionIndex {
    #[inline(always)]
    fn insert(&mut self, p: Position) {
        *self.counts.entry(p).or_insert(0) += 1;
    }

    #[inline(always)]
    fn remove(&mut self, p: &Position) {
        match self.counts.get_mut(p) {
            Some(1) => {
                self.counts.remove(p);
            }
            Some(n) => *n -= 1,
            None => unreachable!("Tried removing {p}, which was never indexed"),
        }
    }

    #[inline(always)]
    fn contains(&self, p: &Position) -> bool {
        self.counts.contains_key(p)
    }
}

/// Last in, first out.
///
/// The head is the end of the backing `Vec`.
#[derive(Default)]
pub struct Stack {
    nodes: Vec<SearchNode>,
    positions: PositionIndex,
}

impl Frontier for Stack {
    #[inline(always)]
    fn push(&mut self, node: SearchNode) {
        self.positions.insert(*node.position());
        self.nodes.push(node);
    }

    #[inline(always)]
    fn pop(&mut self) -> Option<SearchNode> {
        let node = self.nodes.pop()?;
        self.positions.remove(node.position());
        Some(node)
    }

    fn peek(&self) -> Option<&SearchNode> {
        self.nodes.last()
    }

    fn contains(&self, p: &Position) -> bool {
        self.positions.contains(p)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// First in, first out.
#[derive(Default)]
pub struct Queue {
    nodes: VecDeque<SearchNode>,
    positions: PositionIndex,
}

impl Frontier for Queue {
    #[inline(always)]
    fn push(&mut self, node: SearchNode) {
        self.positions.insert(*node.position());
        self.nodes.push_back(node);
    }

    #[inline(always)]
    fn pop(&mut self) -> Option<SearchNode> {
        let node = self.nodes.pop_front()?;
        self.positions.remove(node.position());
        Some(node)
    }

    fn peek(&self) -> Option<&SearchNode> {
        self.nodes.front()
    }

    fn contains(&self, p: &Position) -> bool {
        self.positions.contains(p)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Cost ordered frontier.
///
/// This is not a heap. Every push appends and then runs a single selection
/// pass that moves each new running minimum to the head, see
/// [`PriorityFrontier::prioritize`].
///
/// Membership follows push order instead of the reordered nodes: positions are
/// logged as pushed and every pop drops the oldest entry of the log, whichever
/// node it returned. A pending position can therefore be missed and pushed
/// again, and an expanded one can still count as pending for a while.
#[derive(Default)]
pub struct PriorityFrontier {
    /// Index 0 is the head.
    nodes: Vec<SearchNode>,
    /// Positions in push order, never reordered.
    log: VecDeque<Position>,
    logged: PositionIndex,
}

impl PriorityFrontier {
    /// Nodes without a total priority sort last.
    #[inline(always)]
    fn priority(node: &SearchNode) -> Cost {
        node.total_priority().unwrap_or(Cost::MAX)
    }

    /// One front-to-back scan over the nodes.
    ///
    /// A node whose priority is strictly below every priority scanned before
    /// it moves to the head. Earlier ties keep the head.
    fn prioritize(&mut self) {
        let mut least: Option<Cost> = None;
        for i in 0..self.nodes.len() {
            let p = Self::priority(&self.nodes[i]);
            if least.is_none_or(|least| p < least) {
                // Moving i to the head shifts [0, i) right by one, so the
                // nodes after i keep their indices.
                self.nodes[..=i].rotate_right(1);
                least = Some(p);
            }
        }
        self.verify_head();
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify_head(&self) {}
    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify_head(&self) {
        if let Some(head) = self.nodes.first() {
            let head = Self::priority(head);
            debug_assert!(
                self.nodes.iter().all(|n| head <= Self::priority(n)),
                "Head of {:?} is not minimal",
                self
            );
        }
    }

    /// The held nodes, head first.
    pub fn iter(&self) -> impl Iterator<Item = &SearchNode> {
        self.nodes.iter()
    }
}

impl Frontier for PriorityFrontier {
    fn push(&mut self, node: SearchNode) {
        self.log.push_back(*node.position());
        self.logged.insert(*node.position());
        self.nodes.push(node);
        self.prioritize();
    }

    fn pop(&mut self) -> Option<SearchNode> {
        if self.nodes.is_empty() {
            return None;
        }
        let node = self.nodes.remove(0);
        // Log and nodes always hold the same number of entries.
        if let Some(oldest) = self.log.pop_front() {
            self.logged.remove(&oldest);
        }
        Some(node)
    }

    fn peek(&self) -> Option<&SearchNode> {
        self.nodes.first()
    }

    /// Whether `p` is in the push log, not whether a held node sits at `p`.
    fn contains(&self, p: &Position) -> bool {
        self.logged.contains(p)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

macro_rules! debug_frontier {
    ($frontier:ty, $name:literal) => {
        impl Debug for $frontier {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}[", $name)?;
                for (i, node) in self.nodes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{node}")?;
                }
                write!(f, "]")
            }
        }
    };
}
debug_frontier!(Stack, "Stack");
debug_frontier!(Queue, "Queue");
debug_frontier!(PriorityFrontier, "PriorityFrontier");
