//! Bulk-import output row.
//!
//! One row per product in the feed, fully derived from the product,
//! pricing, and stock records plus baseline membership. Never persisted
//! independently of the output file.

/// Import command for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Archive the product downstream
    Delete,
    /// Merge-or-create (safe against a half-imported previous run)
    Merge,
    /// Update an already-known product
    Update,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Delete => "DELETE",
            Command::Merge => "MERGE",
            Command::Update => "UPDATE",
        }
    }
}

/// Downstream product status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    Active,
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Archived => "archived",
        }
    }

    /// The Published column value for this status.
    pub fn published(&self) -> &'static str {
        match self {
            ProductStatus::Active => "TRUE",
            ProductStatus::Archived => "FALSE",
        }
    }
}

/// Output column headers, in the exact order the import pipeline expects.
pub const COLUMNS: [&str; 22] = [
    "Command",
    "Handle",
    "Title",
    "Body (HTML)",
    "Vendor",
    "Type",
    "Tags",
    "Published",
    "Variant SKU",
    "Variant Grams",
    "Variant Inventory Tracker",
    "Variant Inventory Policy",
    "Variant Fulfillment Service",
    "Variant Price",
    "Variant Compare At Price",
    "Variant Requires Shipping",
    "Variant Taxable",
    "Variant Barcode",
    "Image Src",
    "Image Position",
    "Status",
    "Variant Inventory Qty",
];

// Fixed per-row column values
const INVENTORY_TRACKER: &str = "shopify";
const INVENTORY_POLICY: &str = "deny";
const FULFILLMENT_SERVICE: &str = "manual";
const REQUIRES_SHIPPING: &str = "TRUE";
const TAXABLE: &str = "TRUE";
const IMAGE_POSITION: &str = "1";

/// One output row, ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub command: Command,
    pub handle: String,
    pub title: String,
    pub body_html: String,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    pub sku: String,
    pub grams: u32,
    /// `None` leaves the downstream price untouched. Serializes as an
    /// empty field, never as zero, so a re-import cannot clobber a
    /// manually adjusted live price.
    pub price: Option<f64>,
    pub barcode: String,
    pub image_src: String,
    pub status: ProductStatus,
    pub quantity: u32,
}

impl ImportRow {
    /// Serialize to CSV fields in [`COLUMNS`] order.
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.command.as_str().to_string(),
            self.handle.clone(),
            self.title.clone(),
            self.body_html.clone(),
            self.vendor.clone(),
            self.product_type.clone(),
            self.tags.join(", "),
            self.status.published().to_string(),
            self.sku.clone(),
            self.grams.to_string(),
            INVENTORY_TRACKER.to_string(),
            INVENTORY_POLICY.to_string(),
            FULFILLMENT_SERVICE.to_string(),
            self.price.map(|p| format!("{:.2}", p)).unwrap_or_default(),
            String::new(), // Variant Compare At Price is always empty
            REQUIRES_SHIPPING.to_string(),
            TAXABLE.to_string(),
            self.barcode.clone(),
            self.image_src.clone(),
            IMAGE_POSITION.to_string(),
            self.status.as_str().to_string(),
            self.quantity.to_string(),
        ]
    }
}
