// src/pipeline/sync.rs

//! Full-pipeline orchestration.

use log::info;

use crate::error::Result;
use crate::models::{Config, Credentials, SyncStats};
use crate::pipeline::fetch::{self, FetchedFiles};
use crate::pipeline::{export, parse, reconcile};
use crate::storage::BaselineStore;

/// Parse the downloaded feed files, reconcile against the baseline,
/// write the import file, then save the updated baseline.
///
/// The baseline is written only after the output file exists: a run that
/// fails earlier must not advance it.
pub fn run_generate(config: &Config, files: &FetchedFiles) -> Result<SyncStats> {
    let store = BaselineStore::new(&config.paths.baseline_file);
    let baseline = store.load()?;
    info!("Known SKUs in baseline: {}", baseline.len());

    let pricing = parse::parse_pricing(&files.pricing)?;
    let stock = parse::parse_stock(&files.availability)?;
    let products = parse::parse_products(&files.products)?;

    let outcome = reconcile::reconcile(&products, &pricing, &stock, &baseline, config);
    info!(
        "Classified {} products: {} new, {} existing, {} discontinued",
        outcome.stats.total, outcome.stats.new, outcome.stats.existing, outcome.stats.discontinued
    );

    export::write_import_csv(&config.paths.output_file, &outcome.rows)?;
    store.save(&outcome.baseline_after)?;

    Ok(outcome.stats)
}

/// Run the full pipeline: fetch, then generate.
pub fn run_sync(config: &Config, credentials: &Credentials) -> Result<SyncStats> {
    info!("Step 1/2: Fetching feed files...");
    let files = fetch::run_fetch(config, credentials)?;

    info!("Step 2/2: Generating import file...");
    run_generate(config, &files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.paths.data_dir = dir.path().join("data");
        config.paths.output_file = dir.path().join("output/import.csv");
        config.paths.baseline_file = dir.path().join("baseline.json");
        config.feed.products_path = "products.csv".to_string();
        config
    }

    fn write_feed_files(config: &Config) {
        fs::create_dir_all(&config.paths.data_dir).unwrap();
        fs::write(
            config.paths.data_dir.join("pricing.csv"),
            "stock_no,price,rrp\nABC1,5.50,9.99\n",
        )
        .unwrap();
        fs::write(
            config.paths.data_dir.join("Availability01D.csv"),
            "stock_no,cstock\nABC1,12\n",
        )
        .unwrap();
        fs::write(
            config.paths.data_dir.join("products.csv"),
            "StockCode,Product Name,Brand_Name,DiscontinuedFlag,ClassAName\n\
             ABC1,Hammer,Stanley,0,Tools\n",
        )
        .unwrap();
    }

    #[test]
    fn test_generate_end_to_end() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        write_feed_files(&config);

        let stats = run_generate(&config, &FetchedFiles::locate(&config)).unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.new, 1);

        // Output file written with one MERGE row
        let output = fs::read_to_string(&config.paths.output_file).unwrap();
        assert!(output.lines().nth(1).unwrap().starts_with("MERGE,hammer-abc1"));

        // Baseline advanced
        let baseline = BaselineStore::new(&config.paths.baseline_file)
            .load()
            .unwrap();
        assert!(baseline.contains("ABC1"));

        // Second run over the same feed flips the product to UPDATE
        let stats = run_generate(&config, &FetchedFiles::locate(&config)).unwrap();
        assert_eq!(stats.new, 0);
        assert_eq!(stats.existing, 1);
        let output = fs::read_to_string(&config.paths.output_file).unwrap();
        assert!(output.lines().nth(1).unwrap().starts_with("UPDATE,"));
    }

    #[test]
    fn test_generate_fails_without_feed_files() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        // No downloads: the run fails and the baseline is never created
        assert!(run_generate(&config, &FetchedFiles::locate(&config)).is_err());
        assert!(!config.paths.baseline_file.exists());
    }
}
