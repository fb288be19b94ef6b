//! SIRD parameter fitting.
//!
//! Responsibilities:
//!
//! - build the candidate grid for (beta, gamma, mu)
//! - score a forecast against ground truth (summed per-compartment RMSE)
//! - search the grid exhaustively and keep the best candidate

pub mod grid;
pub mod score;
pub mod search;

pub use grid::*;
pub use score::*;
pub use search::*;
