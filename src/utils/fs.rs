// src/utils/fs.rs

//! Filesystem helpers.

use std::fs;
use std::path::Path;

use crate::error::Result;

/// Write bytes atomically (write to temp, then rename), creating parent
/// directories as needed. A crashed run never leaves a truncated file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
