// src/pipeline/export.rs

//! Import file writer.

use std::path::Path;

use log::info;

use crate::error::{AppError, Result};
use crate::models::{ImportRow, COLUMNS};
use crate::utils::fs;

/// Write the import file: UTF-8, header row, one row per product, in
/// feed order. The write is atomic so a crashed run never leaves a
/// truncated file for the import pipeline to pick up.
pub fn write_import_csv(path: &Path, rows: &[ImportRow]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))?;

    fs::write_atomic(path, &bytes)?;
    info!("Generated {} with {} products", path.display(), rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Command, ProductStatus};
    use tempfile::TempDir;

    fn sample_row(sku: &str) -> ImportRow {
        ImportRow {
            command: Command::Merge,
            handle: format!("product-{}", sku.to_lowercase()),
            title: "Product".to_string(),
            body_html: String::new(),
            vendor: String::new(),
            product_type: String::new(),
            tags: vec!["Toolbank".to_string()],
            sku: sku.to_string(),
            grams: 0,
            price: Some(9.99),
            barcode: String::new(),
            image_src: String::new(),
            status: ProductStatus::Active,
            quantity: 0,
        }
    }

    #[test]
    fn test_writes_header_and_rows_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("import.csv");

        write_import_csv(&path, &[sample_row("B2"), sample_row("A1")]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("Command,Handle,Title,Body (HTML),Vendor,Type,Tags"));
        assert!(header.ends_with("Status,Variant Inventory Qty"));

        // Row order mirrors input order
        assert!(lines.next().unwrap().contains("B2"));
        assert!(lines.next().unwrap().contains("A1"));
    }

    #[test]
    fn test_header_has_exact_column_count() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("import.csv");

        write_import_csv(&path, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut reader = csv::Reader::from_reader(content.as_bytes());
        assert_eq!(reader.headers().unwrap().len(), COLUMNS.len());
    }

    #[test]
    fn test_empty_price_field_stays_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("import.csv");

        let mut row = sample_row("A1");
        row.price = None;
        write_import_csv(&path, &[row]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[13], "");
    }
}
