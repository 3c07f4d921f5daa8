// src/models/mod.rs

//! Domain models for the sync application.
//!
//! This module contains all data structures used throughout the
//! application, organized by their primary purpose.

mod config;
mod feed;
mod pricing;
mod product;
mod row;

// Re-export all public types
pub use config::{
    Config, Credentials, FeedConfig, ImageConfig, PathsConfig, TagConfig, FEED_PASS_ENV,
    FEED_USER_ENV,
};
pub use feed::ProductFeed;
pub use pricing::{PricingBook, PricingRecord, StockLevels};
pub use product::ProductRecord;
pub use row::{Command, ImportRow, ProductStatus, COLUMNS};

/// Per-run classification counts, reported after reconciliation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SyncStats {
    pub total: usize,
    pub new: usize,
    pub existing: usize,
    pub discontinued: usize,
}
