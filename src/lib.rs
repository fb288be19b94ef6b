//! `sird-fit` library crate.
//!
//! The binary (`sird`) is a thin wrapper around this library so that:
//!
//! - the integrator, scorer and search are testable without spawning processes
//! - the fit pipeline is shared by the CLI report and the TUI

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod log;
pub mod math;
pub mod models;
pub mod plot;
pub mod progress;
pub mod report;
pub mod sim;
pub mod tui;
