use shadow_rs::shadow;

shadow!(build);

// Internals
// ---------
pub mod data_structures;

// Grids and moves
// ---------------
pub mod grid;
pub mod heuristic;
pub mod neighbours;

// Search bookkeeping
// ------------------
pub mod config;
pub mod search;

// Algorithms
// ----------
pub mod algorithms;
