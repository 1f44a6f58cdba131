use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the model catalog or resolving a selection
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configuration file does not exist
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The configuration file exists but could not be read
    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not a valid model catalog
    #[error("Failed to parse configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// One or more requested models are not in the catalog
    #[error(
        "Invalid model(s): {}\nAvailable models: {}",
        .invalid.join(", "),
        .available.join(", ")
    )]
    UnknownModels {
        invalid: Vec<String>,
        available: Vec<String>,
    },

    /// Neither `--all` nor a model list was given
    #[error("No models selected (use --models or --all)")]
    NothingSelected,
}

/// Errors that can occur during model download operations
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The hub request failed or returned an error status
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to create or access the output directory
    #[error("Failed to create output directory: {0}")]
    OutputDir(std::io::Error),

    /// Failed to write downloaded files to disk
    #[error("Failed to write file: {0}")]
    FileWrite(std::io::Error),

    /// The progress bar template is malformed
    #[error("Invalid progress template: {0}")]
    Progress(#[from] indicatif::style::TemplateError),
}

/// Errors that can occur while parsing hub repository ids
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RepoIdError {
    /// Empty owner before the `/`
    #[error("Invalid repository id '{0}': empty owner (expected format: owner/name or name)")]
    MissingOwner(String),

    /// Missing name component
    #[error("Invalid repository id '{0}': missing name (expected format: owner/name or name)")]
    MissingName(String),

    /// More than one `/` separator
    #[error("Invalid repository id '{0}': too many segments (expected format: owner/name or name)")]
    TooManySegments(String),
}
