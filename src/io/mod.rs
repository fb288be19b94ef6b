//! Input/output helpers.
//!
//! - ground-truth CSV ingest + validation (`ingest`)
//! - ground-truth CSV export for synthetic datasets (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
