//! Baseline document: the set of SKUs already known downstream.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::fs::write_atomic;

/// The set of SKUs known to exist downstream.
///
/// Mutated once per run: unioned with every non-discontinued SKU seen in
/// the feed. Discontinued SKUs are never added, but existing members are
/// never evicted either: a product reinstated later must classify as
/// existing, not new, or a re-import would clobber its live price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Baseline {
    skus: HashSet<String>,
    updated: Option<DateTime<Utc>>,
}

impl Baseline {
    /// Create an empty baseline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a baseline from a set of SKUs.
    pub fn from_skus<I, S>(skus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skus: skus.into_iter().map(Into::into).collect(),
            updated: None,
        }
    }

    /// Whether a SKU is already known downstream.
    pub fn contains(&self, sku: &str) -> bool {
        self.skus.contains(sku)
    }

    /// Add a SKU to the known set.
    pub fn insert(&mut self, sku: String) {
        self.skus.insert(sku);
    }

    /// Number of known SKUs.
    pub fn len(&self) -> usize {
        self.skus.len()
    }

    /// Whether the baseline is empty.
    pub fn is_empty(&self) -> bool {
        self.skus.is_empty()
    }

    /// Time of the last successful run, if any.
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }
}

/// Serialized document shape.
#[derive(Serialize, Deserialize)]
struct BaselineFile {
    skus: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated: Option<DateTime<Utc>>,
}

/// Loads and saves the baseline document.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the baseline. A missing file is an empty baseline (first
    /// run), not an error.
    pub fn load(&self) -> Result<Baseline> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Baseline::new()),
            Err(e) => return Err(AppError::Io(e)),
        };
        let file: BaselineFile = serde_json::from_slice(&bytes)?;
        Ok(Baseline {
            skus: file.skus.into_iter().collect(),
            updated: file.updated,
        })
    }

    /// Save the baseline with a fresh timestamp. SKUs are written sorted
    /// so the document diffs cleanly between runs. The write is atomic.
    pub fn save(&self, baseline: &Baseline) -> Result<()> {
        let mut skus: Vec<String> = baseline.skus.iter().cloned().collect();
        skus.sort();
        let file = BaselineFile {
            skus,
            updated: Some(Utc::now()),
        };
        let bytes = serde_json::to_vec_pretty(&file)?;
        write_atomic(&self.path, &bytes)?;
        info!(
            "Saved {} known SKUs to {}",
            baseline.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_baseline() {
        let dir = TempDir::new().unwrap();
        let store = BaselineStore::new(dir.path().join("baseline.json"));

        let baseline = store.load().unwrap();
        assert!(baseline.is_empty());
        assert!(baseline.updated().is_none());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = BaselineStore::new(dir.path().join("baseline.json"));

        let baseline = Baseline::from_skus(["ABC1", "XYZ9"]);
        store.save(&baseline).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.contains("ABC1"));
        assert!(loaded.contains("XYZ9"));
        assert!(loaded.updated().is_some());
    }

    #[test]
    fn test_document_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("baseline.json");
        let store = BaselineStore::new(&path);

        store.save(&Baseline::from_skus(["B2", "A1"])).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();

        // SKUs are a sorted string array; updated is ISO-8601
        assert_eq!(doc["skus"][0], "A1");
        assert_eq!(doc["skus"][1], "B2");
        assert!(doc["updated"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_loads_document_without_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("baseline.json");
        std::fs::write(&path, r#"{"skus": ["ABC1"]}"#).unwrap();

        let loaded = BaselineStore::new(&path).load().unwrap();
        assert!(loaded.contains("ABC1"));
        assert!(loaded.updated().is_none());
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("baseline.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(BaselineStore::new(&path).load().is_err());
    }
}
