//! Reference data sources.
//!
//! - synthetic ground truth generated from known parameters (`synthetic`)

pub mod synthetic;

pub use synthetic::*;
