#![cfg_attr(feature = "strict", deny(warnings))]

//! Fetches quantized models listed in a catalog from a model hub.

pub mod catalog;
pub mod download;
pub mod error;

pub use catalog::{Catalog, CatalogError, ModelDescriptor, RepoId};
pub use download::{
    DownloadError, FetchRequest, HttpHubClient, HubClient, HubConfig, Outcome, Summary,
    default_output_dir, download_one, download_selection,
};
