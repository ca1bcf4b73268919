//! Reader/writer boundary adapters.
//!
//! Drivers hand the pipeline a [`SceneContainer`]: a mapping from
//! dataset-id to gridded variables plus a distinguished `"METADATA"`
//! entry that carries attributes only. The built-in JSON adapters
//! implement the serialization contract; sensor-specific NetCDF readers
//! live outside the core and plug in through the same traits.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sat_common::MaskedGrid;

use crate::error::{PipelineError, Result};

/// Dataset-id of the attributes-only container entry.
pub const METADATA_KEY: &str = "METADATA";

/// Attributes copied from input to output on every product write.
pub const STANDARD_METADATA_KEYS: [&str; 8] = [
    "source_name",
    "platform_name",
    "data_provider",
    "start_datetime",
    "end_datetime",
    "granule_minutes",
    "sample_distance_km",
    "interpolation_radius_of_influence",
];

/// A typed metadata attribute value.
///
/// On disk every attribute is a string; `None`, `True`, `False`, and any
/// attribute whose name contains `datetime` round-trip through typed
/// forms.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Datetime(DateTime<Utc>),
}

impl AttrValue {
    /// Textual form used in serialized containers.
    pub fn to_stored_string(&self) -> String {
        match self {
            AttrValue::None => "None".to_string(),
            AttrValue::Bool(true) => "True".to_string(),
            AttrValue::Bool(false) => "False".to_string(),
            AttrValue::Int(i) => i.to_string(),
            AttrValue::Float(v) => v.to_string(),
            AttrValue::Str(s) => s.clone(),
            AttrValue::Datetime(dt) => dt.format("%c").to_string(),
        }
    }

    /// Parse the textual form back, applying the attribute-name rules.
    pub fn from_stored(name: &str, raw: &str) -> AttrValue {
        if name.contains("datetime") {
            if let Ok(dt) = sat_common::parse_ctime(raw) {
                return AttrValue::Datetime(dt);
            }
        }
        match raw {
            "None" => AttrValue::None,
            "True" => AttrValue::Bool(true),
            "False" => AttrValue::Bool(false),
            _ => AttrValue::Str(raw.to_string()),
        }
    }
}

/// Attribute bag attached to a dataset.
pub type Metadata = BTreeMap<String, AttrValue>;

/// Copy the standard attribute set from an input metadata bag.
pub fn carry_standard_metadata(src: &Metadata) -> Metadata {
    let mut out = Metadata::new();
    for key in STANDARD_METADATA_KEYS {
        if let Some(value) = src.get(key) {
            out.insert(key.to_string(), value.clone());
        }
    }
    out
}

/// Gridded variables plus attributes for one dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    pub variables: BTreeMap<String, MaskedGrid>,
    pub attrs: Metadata,
}

/// A reader's output: dataset-id to dataset, with a `"METADATA"` entry
/// that carries attributes and no data variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneContainer {
    pub datasets: BTreeMap<String, DataSet>,
}

impl SceneContainer {
    /// Attributes from the distinguished `"METADATA"` entry.
    pub fn metadata(&self) -> Option<&Metadata> {
        self.datasets.get(METADATA_KEY).map(|ds| &ds.attrs)
    }

    /// Insert a dataset under an id.
    pub fn insert(&mut self, id: impl Into<String>, dataset: DataSet) {
        self.datasets.insert(id.into(), dataset);
    }

    /// Set the `"METADATA"` entry from an attribute bag.
    pub fn set_metadata(&mut self, attrs: Metadata) {
        self.datasets.insert(
            METADATA_KEY.to_string(),
            DataSet {
                variables: BTreeMap::new(),
                attrs,
            },
        );
    }

    /// Find a variable across all non-metadata datasets.
    pub fn variable(&self, name: &str) -> Option<&MaskedGrid> {
        self.datasets
            .iter()
            .filter(|(id, _)| id.as_str() != METADATA_KEY)
            .find_map(|(_, ds)| ds.variables.get(name))
    }
}

/// Reads one or more files into a scene container.
pub trait ReaderAdapter {
    fn read(&self, paths: &[PathBuf]) -> Result<SceneContainer>;
}

/// Writes selected product variables plus standard metadata.
pub trait WriterAdapter {
    fn write(
        &self,
        container: &SceneContainer,
        products: &[String],
        output_paths: &[PathBuf],
    ) -> Result<Vec<PathBuf>>;
}

// Serialized form: attributes flattened to their stored-string forms.
#[derive(Serialize, Deserialize)]
struct StoredDataSet {
    variables: BTreeMap<String, MaskedGrid>,
    attrs: BTreeMap<String, String>,
}

fn store_attrs(attrs: &Metadata) -> BTreeMap<String, String> {
    attrs
        .iter()
        .map(|(k, v)| (k.clone(), v.to_stored_string()))
        .collect()
}

fn load_attrs(stored: &BTreeMap<String, String>) -> Metadata {
    stored
        .iter()
        .map(|(k, v)| (k.clone(), AttrValue::from_stored(k, v)))
        .collect()
}

/// Built-in reader for the JSON container format.
#[derive(Debug, Clone, Default)]
pub struct JsonSceneReader;

impl ReaderAdapter for JsonSceneReader {
    /// Each file becomes one dataset keyed by file stem; attributes from
    /// all files merge into the `"METADATA"` entry (later files win).
    fn read(&self, paths: &[PathBuf]) -> Result<SceneContainer> {
        let mut container = SceneContainer::default();
        let mut merged = Metadata::new();

        for path in paths {
            let text = fs::read_to_string(path)?;
            let stored: StoredDataSet = serde_json::from_str(&text)?;

            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| {
                    PipelineError::ReaderAdapter(format!("unusable path {}", path.display()))
                })?
                .to_string();

            let attrs = load_attrs(&stored.attrs);
            merged.extend(attrs.clone());
            debug!(path = %path.display(), dataset = %id, "read scene dataset");
            container.insert(
                id,
                DataSet {
                    variables: stored.variables,
                    attrs,
                },
            );
        }

        container.set_metadata(merged);
        Ok(container)
    }
}

/// Built-in writer for the JSON container format.
#[derive(Debug, Clone, Default)]
pub struct JsonSceneWriter;

impl WriterAdapter for JsonSceneWriter {
    /// Serialize only the selected product variables alongside the
    /// standard metadata attributes into each output path.
    fn write(
        &self,
        container: &SceneContainer,
        products: &[String],
        output_paths: &[PathBuf],
    ) -> Result<Vec<PathBuf>> {
        let mut variables = BTreeMap::new();
        for product in products {
            let grid = container.variable(product).ok_or_else(|| {
                PipelineError::WriterAdapter(format!("product variable '{product}' not found"))
            })?;
            variables.insert(product.clone(), grid.clone());
        }

        let attrs = container
            .metadata()
            .map(carry_standard_metadata)
            .unwrap_or_default();

        let stored = StoredDataSet {
            variables,
            attrs: store_attrs(&attrs),
        };
        let text = serde_json::to_string_pretty(&stored)?;

        let mut written = Vec::new();
        for path in output_paths {
            write_atomic(path, &text)?;
            for product in products {
                info!(product = %product, path = %path.display(), "WORKFLOWSUCCESS");
            }
            written.push(path.clone());
        }
        Ok(written)
    }
}

// Scoped write so a failure cannot leave a half-written product behind.
fn write_atomic(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, text)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
