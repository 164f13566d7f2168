//! # Nutrient Cache Module
//!
//! Persisted lookup results for the external nutrition provider, keyed by
//! lowercased ingredient name. The on-disk form is a flat, pretty-printed JSON
//! object that is safe to inspect and hand-edit:
//!
//! ```json
//! {
//!   "milk": [
//!     { "nutrientName": "Protein", "unitName": "G", "value": 3.27 }
//!   ],
//!   "unobtainium": null
//! }
//! ```
//!
//! `null` records that the provider had no match for the ingredient.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::errors::LookupError;

/// One raw nutrient amount as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientRecord {
    #[serde(rename = "nutrientName")]
    pub name: String,
    #[serde(rename = "unitName")]
    pub unit: String,
    pub value: f64,
}

impl NutrientRecord {
    pub fn new(name: &str, unit: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            value,
        }
    }
}

/// Outcome of a completed provider lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FoodLookup {
    Found(Vec<NutrientRecord>),
    /// Serialized as `null`
    NotFound,
}

/// Get/put capability over cached lookups
pub trait NutrientCache {
    fn get(&self, ingredient: &str) -> Option<FoodLookup>;

    fn put(&mut self, ingredient: &str, lookup: FoodLookup) -> Result<(), LookupError>;
}

/// Process-local cache, used by tests and when persistence is unwanted
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    entries: HashMap<String, FoodLookup>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NutrientCache for InMemoryCache {
    fn get(&self, ingredient: &str) -> Option<FoodLookup> {
        self.entries.get(ingredient).cloned()
    }

    fn put(&mut self, ingredient: &str, lookup: FoodLookup) -> Result<(), LookupError> {
        self.entries.insert(ingredient.to_string(), lookup);
        Ok(())
    }
}

/// JSON file cache, rewritten after every insertion
#[derive(Debug)]
pub struct JsonFileCache {
    path: PathBuf,
    entries: IndexMap<String, FoodLookup>,
}

impl JsonFileCache {
    /// Open the cache file, starting empty when it is missing or unreadable
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries: IndexMap<String, FoodLookup> = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Nutrient cache is corrupt, starting empty");
                    IndexMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No nutrient cache yet");
                IndexMap::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Nutrient cache is unreadable, starting empty");
                IndexMap::new()
            }
        };

        debug!(path = %path.display(), entries = entries.len(), "Nutrient cache opened");
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the whole cache through a temp file and rename it into place
    fn persist(&self) -> Result<(), LookupError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| LookupError::Cache(e.to_string()))?;

        let mut temp_file =
            NamedTempFile::new_in(&dir).map_err(|e| LookupError::Cache(e.to_string()))?;
        serde_json::to_writer_pretty(temp_file.as_file_mut(), &self.entries)
            .map_err(|e| LookupError::Cache(e.to_string()))?;
        temp_file
            .as_file_mut()
            .flush()
            .map_err(|e| LookupError::Cache(e.to_string()))?;
        temp_file
            .persist(&self.path)
            .map_err(|e| LookupError::Cache(e.to_string()))?;
        Ok(())
    }
}

impl NutrientCache for JsonFileCache {
    fn get(&self, ingredient: &str) -> Option<FoodLookup> {
        self.entries.get(ingredient).cloned()
    }

    fn put(&mut self, ingredient: &str, lookup: FoodLookup) -> Result<(), LookupError> {
        self.entries.insert(ingredient.to_string(), lookup);
        self.persist()
    }
}
