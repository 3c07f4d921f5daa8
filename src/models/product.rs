//! Supplier product record.

use serde::{Deserialize, Serialize};

/// A single product row from the supplier's catalog export.
///
/// Built fresh each run by the product parser; never mutated afterwards
/// and discarded at end of run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    /// Stock-keeping unit, the unique key; never empty
    pub sku: String,

    /// Display title
    pub title: String,

    /// Rich-text description, passed through to the import untouched
    pub description: String,

    /// Brand name
    pub vendor: String,

    /// Retailer barcode
    pub barcode: String,

    /// Unit weight in kilograms
    pub weight_kg: f64,

    /// Image reference stem; empty means "use the SKU"
    pub image_ref: String,

    /// Supplier has discontinued this product
    pub discontinued: bool,

    /// Supplier list price, fallback when no pricing record exists
    pub rrp: f64,

    /// Top-level category name
    pub class_a: String,

    /// Mid-level category name (doubles as the product type)
    pub class_b: String,

    /// Leaf category name
    pub class_c: String,
}
