//! Containers used by the search loops.

pub mod frontier;
