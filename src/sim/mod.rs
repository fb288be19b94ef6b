//! Numerical integration of the SIRD system.

pub mod euler;

pub use euler::*;
