//! The model catalog: which models can be fetched, and from where.
//!
//! The catalog is a JSON document with a top-level `models` object mapping a
//! short model name to its hub location:
//!
//! ```json
//! {
//!   "models": {
//!     "7B": {
//!       "repo_id": "kipepeo-ai/africa-llm-7b-gguf",
//!       "filename": "africa-llm-7b-q4_k_m.gguf",
//!       "size_mb": 4370
//!     }
//!   }
//! }
//! ```
//!
//! Key order in the document is preserved and used for `--all` and `--list`.

mod repo_id;

pub use crate::error::CatalogError;
pub use repo_id::RepoId;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    models: IndexMap<String, ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    repo_id: RepoId,
    filename: String,
    #[serde(default)]
    size_mb: Option<f64>,
}

/// A downloadable model file.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelDescriptor {
    pub name: String,
    pub repo_id: RepoId,
    /// Path of the file inside the hub repository
    pub filename: String,
    /// Approximate size, for display only
    pub size_mb: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    models: IndexMap<String, ModelDescriptor>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CatalogError::NotFound(path.to_path_buf()));
            }
            Err(source) => {
                return Err(CatalogError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let catalog = Self::from_json(&raw).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), models = catalog.len(), "loaded model catalog");

        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        let models = file
            .models
            .into_iter()
            .map(|(name, entry)| {
                let descriptor = ModelDescriptor {
                    name: name.clone(),
                    repo_id: entry.repo_id,
                    filename: entry.filename,
                    size_mb: entry.size_mb,
                };
                (name, descriptor)
            })
            .collect();

        Ok(Self { models })
    }

    pub fn get(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Resolves which models to download.
    ///
    /// `all` wins over `models`. Otherwise `models` is a comma-separated list
    /// of names; every name must be in the catalog, or nothing is selected
    /// and the error lists both the unknown names and the valid ones.
    /// Requested order and duplicates are kept.
    pub fn resolve_selection(
        &self,
        all: bool,
        models: Option<&str>,
    ) -> Result<Vec<&ModelDescriptor>, CatalogError> {
        if all {
            return Ok(self.iter().collect());
        }

        let requested = models
            .filter(|list| !list.trim().is_empty())
            .ok_or(CatalogError::NothingSelected)?;
        let names: Vec<&str> = requested.split(',').map(str::trim).collect();

        let invalid: Vec<String> = names
            .iter()
            .filter(|name| !self.models.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !invalid.is_empty() {
            return Err(CatalogError::UnknownModels {
                invalid,
                available: self.names().map(String::from).collect(),
            });
        }

        Ok(names.iter().filter_map(|name| self.get(name)).collect())
    }
}
