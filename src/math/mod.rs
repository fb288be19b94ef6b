//! Mathematical utilities: error metrics.

pub mod metrics;

pub use metrics::*;
