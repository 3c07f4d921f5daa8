// src/pipeline/parse.rs

//! Feed file parsers.
//!
//! Each parser turns one raw feed file into a typed, keyed record set.
//! Rows with an empty key are dropped silently, and malformed numeric
//! fields are coerced to zero through the `utils::num` policy; a single
//! bad field must never abort the batch.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use log::info;

use crate::error::{AppError, Result};
use crate::models::{PricingBook, PricingRecord, ProductFeed, ProductRecord, StockLevels};
use crate::utils::num;

/// Parse the pricing table (keyed `stock_no`, columns `price`/`rrp`).
pub fn parse_pricing(path: &Path) -> Result<PricingBook> {
    let text = read_csv_text(path)?;
    let mut reader = csv_reader(&text);
    let headers = header_index(reader.headers()?);

    let mut book = PricingBook::new();
    for result in reader.records() {
        let record = result?;
        let sku = field(&record, &headers, "stock_no").trim();
        if sku.is_empty() {
            continue;
        }
        book.insert(
            sku.to_string(),
            PricingRecord {
                trade_price: num::float_or_zero(field(&record, &headers, "price")),
                rrp: num::float_or_zero(field(&record, &headers, "rrp")),
            },
        );
    }

    info!("Loaded {} pricing records", book.len());
    Ok(book)
}

/// Parse the availability table (keyed `stock_no`, column `cstock`).
pub fn parse_stock(path: &Path) -> Result<StockLevels> {
    let text = read_csv_text(path)?;
    let mut reader = csv_reader(&text);
    let headers = header_index(reader.headers()?);

    let mut stock = StockLevels::new();
    for result in reader.records() {
        let record = result?;
        let sku = field(&record, &headers, "stock_no").trim();
        if sku.is_empty() {
            continue;
        }
        stock.insert(
            sku.to_string(),
            num::quantity_or_zero(field(&record, &headers, "cstock")),
        );
    }

    info!("Loaded {} stock records", stock.len());
    Ok(stock)
}

/// Parse the product export, dispatching on file extension.
///
/// The supplier publishes the catalog as a workbook with a CSV variant
/// alongside; both carry the same columns.
pub fn parse_products(path: &Path) -> Result<ProductFeed> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls") => {
            parse_products_workbook(path)
        }
        _ => parse_products_csv(path),
    }
}

/// Parse the CSV variant of the product export (keyed `StockCode`).
pub fn parse_products_csv(path: &Path) -> Result<ProductFeed> {
    let text = read_csv_text(path)?;
    let mut reader = csv_reader(&text);
    let headers = header_index(reader.headers()?);

    let mut feed = ProductFeed::new();
    for result in reader.records() {
        let record = result?;
        if let Some(product) =
            product_from_row(|name| field(&record, &headers, name).to_string())
        {
            feed.insert(product);
        }
    }

    info!("Loaded {} products from CSV", feed.len());
    Ok(feed)
}

/// Parse the workbook variant of the product export.
///
/// Reads the first worksheet: header row first, then one product per
/// row. Numeric cells are rendered to strings and run through the same
/// coercion policy as the CSV path.
pub fn parse_products_workbook(path: &Path) -> Result<ProductFeed> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names.first().ok_or_else(|| {
        AppError::validation(format!("{}: workbook has no sheets", path.display()))
    })?;
    let range = workbook.worksheet_range(first)?;

    let mut rows = range.rows();
    let headers: HashMap<String, usize> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .map(|(i, cell)| (cell_to_string(cell).trim().to_string(), i))
            .collect(),
        None => {
            info!("Loaded 0 products from workbook (empty sheet)");
            return Ok(ProductFeed::new());
        }
    };

    let mut feed = ProductFeed::new();
    for row in rows {
        let product = product_from_row(|name| {
            headers
                .get(name)
                .and_then(|&i| row.get(i))
                .map(cell_to_string)
                .unwrap_or_default()
        });
        if let Some(product) = product {
            feed.insert(product);
        }
    }

    info!("Loaded {} products from workbook", feed.len());
    Ok(feed)
}

/// Build a product record from a header-keyed row accessor.
///
/// Returns `None` for rows without a SKU (dropped silently, never an
/// error).
fn product_from_row<F: Fn(&str) -> String>(field: F) -> Option<ProductRecord> {
    let sku = field("StockCode").trim().to_string();
    if sku.is_empty() {
        return None;
    }
    Some(ProductRecord {
        title: field("Product Name").trim().to_string(),
        description: field("ProductDescription"),
        vendor: field("Brand_Name").trim().to_string(),
        barcode: field("RetailerBarcode").trim().to_string(),
        weight_kg: num::float_or_zero(&field("Weight")),
        image_ref: field("ImageRef").trim().to_string(),
        discontinued: num::flag_is_set(&field("DiscontinuedFlag")),
        rrp: num::float_or_zero(&field("CurrentListPrice")),
        class_a: field("ClassAName").trim().to_string(),
        class_b: field("ClassBName").trim().to_string(),
        class_c: field("ClassCName").trim().to_string(),
        sku,
    })
}

/// Read a feed CSV into memory, stripping the UTF-8 BOM the supplier
/// prepends to every export.
fn read_csv_text(path: &Path) -> Result<String> {
    let raw = fs::read(path)?;
    let text = String::from_utf8_lossy(&raw);
    Ok(text.strip_prefix('\u{feff}').unwrap_or(&text).to_string())
}

fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes())
}

fn header_index(headers: &csv::StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_string(), i))
        .collect()
}

/// Look up a field by header name; a missing column reads as empty.
fn field<'r>(
    record: &'r csv::StringRecord,
    headers: &HashMap<String, usize>,
    name: &str,
) -> &'r str {
    headers
        .get(name)
        .and_then(|&i| record.get(i))
        .unwrap_or("")
}

/// Render a workbook cell as the string the CSV path would have seen.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => {
            if *b {
                "1".to_string()
            } else {
                "0".to_string()
            }
        }
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}
