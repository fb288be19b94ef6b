//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - model inputs (`ModelParameters`, `State`, `SimulationConfig`)
//! - column-wise series (`Trajectory`, `GroundTruth`)
//! - run configuration (`ParamRange`, `FitConfig`)

pub mod types;

pub use types::*;
