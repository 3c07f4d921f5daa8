// src/pipeline/reconcile.rs

//! The reconciliation engine.
//!
//! Classifies every product in the feed as new, existing, or
//! discontinued relative to the baseline and derives one import row per
//! product. Pure: the same inputs always produce the same rows and the
//! same updated baseline, and row order mirrors feed order.

use log::debug;

use crate::models::{
    Command, Config, ImageConfig, ImportRow, PricingBook, PricingRecord, ProductFeed,
    ProductRecord, ProductStatus, StockLevels, SyncStats,
};
use crate::storage::Baseline;
use crate::utils::slug;

/// Everything a run produces before it is written out.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// One row per product, in feed order
    pub rows: Vec<ImportRow>,
    /// Baseline unioned with this run's non-discontinued SKUs
    pub baseline_after: Baseline,
    /// Classification counts for the run summary
    pub stats: SyncStats,
}

/// Per-product classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub command: Command,
    pub status: ProductStatus,
    pub is_new: bool,
}

/// Classify one product against the baseline.
///
/// Discontinued wins over new/existing: a discontinued product is
/// archived regardless of whether the baseline has seen it.
pub fn classify(record: &ProductRecord, baseline: &Baseline) -> Classification {
    let is_new = !baseline.contains(&record.sku);
    if record.discontinued {
        Classification {
            command: Command::Delete,
            status: ProductStatus::Archived,
            is_new,
        }
    } else if is_new {
        Classification {
            command: Command::Merge,
            status: ProductStatus::Active,
            is_new,
        }
    } else {
        Classification {
            command: Command::Update,
            status: ProductStatus::Active,
            is_new,
        }
    }
}

/// Reconcile the three record sets against the baseline.
pub fn reconcile(
    feed: &ProductFeed,
    pricing: &PricingBook,
    stock: &StockLevels,
    baseline: &Baseline,
    config: &Config,
) -> ReconcileOutcome {
    let mut rows = Vec::with_capacity(feed.len());
    let mut baseline_after = baseline.clone();
    let mut stats = SyncStats::default();

    for record in feed.iter() {
        // Parsers drop key-less rows; skip defensively if one slips through
        if record.sku.is_empty() {
            continue;
        }

        let class = classify(record, baseline);
        stats.total += 1;
        if record.discontinued {
            stats.discontinued += 1;
        } else if class.is_new {
            stats.new += 1;
        } else {
            stats.existing += 1;
        }

        let quantity = stock.get(&record.sku).copied().unwrap_or(0);
        rows.push(build_row(
            record,
            pricing.get(&record.sku),
            quantity,
            class,
            config,
        ));

        // Discontinued SKUs never join the baseline, but existing members
        // are never evicted: a reinstated product must classify as
        // existing so a re-import cannot reset its live price.
        if !record.discontinued {
            baseline_after.insert(record.sku.clone());
        }
    }

    debug!(
        "Reconciled {} products against {} known SKUs",
        stats.total,
        baseline.len()
    );

    ReconcileOutcome {
        rows,
        baseline_after,
        stats,
    }
}

/// Derive the import row for one product.
pub fn build_row(
    record: &ProductRecord,
    pricing: Option<&PricingRecord>,
    quantity: u32,
    class: Classification,
    config: &Config,
) -> ImportRow {
    // Only brand-new products carry a price: the supplier RRP is a
    // starting point, and an empty field on later runs leaves a manually
    // adjusted live price untouched.
    let price = if class.is_new && !record.discontinued {
        let rrp = pricing
            .map(|p| p.rrp)
            .filter(|rrp| *rrp > 0.0)
            .unwrap_or(record.rrp);
        Some(round2(rrp))
    } else {
        None
    };

    let mut tags: Vec<String> = Vec::new();
    for class_name in [&record.class_a, &record.class_b, &record.class_c] {
        if !class_name.is_empty() {
            tags.push(class_name.clone());
        }
    }
    tags.push(config.tags.source.clone());
    if class.is_new {
        tags.push(config.tags.new_import.clone());
    }

    ImportRow {
        command: class.command,
        handle: slug::slugify(&format!("{}-{}", record.title, record.sku)),
        title: record.title.clone(),
        body_html: record.description.clone(),
        vendor: record.vendor.clone(),
        product_type: record.class_b.clone(),
        tags,
        sku: record.sku.clone(),
        grams: grams(record.weight_kg),
        price,
        barcode: record.barcode.clone(),
        image_src: image_url(record, &config.images),
        status: class.status,
        quantity,
    }
}

/// Kilograms to integer grams; negative or missing weight counts as zero.
fn grams(weight_kg: f64) -> u32 {
    if weight_kg.is_finite() && weight_kg > 0.0 {
        (weight_kg * 1000.0).round() as u32
    } else {
        0
    }
}

/// Round a price to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Image URL from the image reference, falling back to the SKU as stem.
fn image_url(record: &ProductRecord, images: &ImageConfig) -> String {
    let stem = if record.image_ref.trim().is_empty() {
        record.sku.trim()
    } else {
        record.image_ref.trim()
    };
    if stem.is_empty() {
        return String::new();
    }
    format!("{}{}{}", images.base_url, stem, images.extension)
}
