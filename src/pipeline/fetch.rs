// src/pipeline/fetch.rs

//! Transfer step: download the three feed files into the data directory.
//!
//! Any failure here is fatal for the run: the import pipeline must
//! never see a partial feed, so no output is written and the baseline is
//! never touched after a failed transfer.

use std::path::{Path, PathBuf};

use log::info;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Config, Credentials};
use crate::utils::{fs, http};

/// Local paths of the three downloaded feed files.
#[derive(Debug, Clone)]
pub struct FetchedFiles {
    pub pricing: PathBuf,
    pub products: PathBuf,
    pub availability: PathBuf,
}

impl FetchedFiles {
    /// Where the feed files land for a given config, without fetching.
    /// Lets `generate` reuse a previous download.
    pub fn locate(config: &Config) -> Self {
        Self {
            pricing: config.download_path(&config.feed.pricing_path),
            products: config.download_path(&config.feed.products_path),
            availability: config.download_path(&config.feed.availability_path),
        }
    }
}

/// Download all three feed files.
pub fn run_fetch(config: &Config, credentials: &Credentials) -> Result<FetchedFiles> {
    let client = http::create_client(&config.feed)?;
    let base = Url::parse(&config.feed.base_url)?;

    info!("Fetching feed from {}", config.feed.base_url);

    let files = FetchedFiles::locate(config);
    download_file(
        &client,
        &base,
        credentials,
        &config.feed.pricing_path,
        &files.pricing,
    )?;
    download_file(
        &client,
        &base,
        credentials,
        &config.feed.products_path,
        &files.products,
    )?;
    download_file(
        &client,
        &base,
        credentials,
        &config.feed.availability_path,
        &files.availability,
    )?;

    Ok(files)
}

fn download_file(
    client: &reqwest::blocking::Client,
    base: &Url,
    credentials: &Credentials,
    remote_path: &str,
    dest: &Path,
) -> Result<()> {
    let url = base
        .join(remote_path)
        .map_err(|e| AppError::transfer(remote_path, e))?;

    info!("Downloading {}...", url);
    let bytes = http::download(client, url.as_str(), credentials)
        .map_err(|e| AppError::transfer(remote_path, e))?;

    fs::write_atomic(dest, &bytes)?;
    info!("Saved {} bytes to {}", bytes.len(), dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Config;

    #[test]
    fn test_locate_maps_remote_paths_to_data_dir() {
        let config = Config::default();
        let files = FetchedFiles::locate(&config);

        assert_eq!(files.pricing, PathBuf::from("data/pricing.csv"));
        assert_eq!(files.products, PathBuf::from("data/ProductExport.xlsx"));
        assert_eq!(files.availability, PathBuf::from("data/Availability01D.csv"));
    }

    #[test]
    fn test_remote_paths_resolve_under_base() {
        let base = Url::parse("https://feed.toolbank.com/").unwrap();
        let url = base.join("UnitData-01/Availability01D.csv").unwrap();
        assert_eq!(
            url.as_str(),
            "https://feed.toolbank.com/UnitData-01/Availability01D.csv"
        );
    }
}
