//! Pricing and stock records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-SKU pricing from the supplier's price file.
///
/// Optional per product: a SKU with no pricing record falls back to the
/// list price on its product record.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PricingRecord {
    /// Net trade price
    pub trade_price: f64,

    /// Recommended retail price
    pub rrp: f64,
}

/// All pricing records, keyed by SKU.
pub type PricingBook = HashMap<String, PricingRecord>;

/// Central stock quantity keyed by SKU. An absent SKU means zero.
pub type StockLevels = HashMap<String, u32>;
