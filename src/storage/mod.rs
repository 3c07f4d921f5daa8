// src/storage/mod.rs

//! Persistence for cross-run state.
//!
//! The baseline document is the only entity that survives across runs:
//! the set of SKUs already known to exist downstream, plus the time of
//! the last successful run.

mod baseline;

pub use baseline::{Baseline, BaselineStore};
