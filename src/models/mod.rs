//! SIRD right-hand side and derived quantities.

pub mod sird;

pub use sird::*;
