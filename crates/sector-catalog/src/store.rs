//! Directory-backed sector catalog.
//!
//! One sector per YAML file, keyed by sector name at the top level so the
//! files are self-describing. Writes default to skip-if-exists, which makes
//! catalog generation idempotent across re-runs on overlapping deck files
//! and lets concurrent writers race safely (first writer wins).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{CatalogError, Result};
use crate::sector::DynamicSector;

/// Serializer/deserializer for sector records on disk.
pub struct CatalogStore;

impl CatalogStore {
    /// Serialize a sector record to its on-disk YAML form.
    pub fn serialize(sector: &DynamicSector) -> Result<String> {
        let mut doc = BTreeMap::new();
        doc.insert(sector.name.as_str(), sector);
        Ok(serde_yaml::to_string(&doc)?)
    }

    /// Write a sector record at `path`, creating parent directories.
    ///
    /// Returns the written path, or an empty list when the file already
    /// exists and `force` is false.
    pub fn write(sector: &DynamicSector, path: &Path, force: bool) -> Result<Vec<PathBuf>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        if path.exists() && !force {
            debug!(path = %path.display(), sector = %sector.name, "sector file exists, skipping");
            return Ok(Vec::new());
        }

        fs::write(path, Self::serialize(sector)?)?;
        debug!(path = %path.display(), sector = %sector.name, "wrote sector file");
        Ok(vec![path.to_path_buf()])
    }

    /// Read a sector record back from disk.
    pub fn read(path: &Path) -> Result<DynamicSector> {
        let text = fs::read_to_string(path)?;
        let mut doc: BTreeMap<String, DynamicSector> = serde_yaml::from_str(&text)?;

        if doc.len() != 1 {
            return Err(CatalogError::MalformedRecord(format!(
                "expected exactly one sector in {}, found {}",
                path.display(),
                doc.len()
            )));
        }
        let (name, mut sector) = doc.pop_first().expect("len checked above");
        sector.name = name;
        Ok(sector)
    }

    /// List sector files under a catalog directory, sorted by path.
    pub fn list(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "yaml") {
                paths.push(path.to_path_buf());
            }
        }
        paths.sort();
        Ok(paths)
    }
}
