mod hub;
mod hub_config;

pub use crate::error::DownloadError;
pub use hub::{FetchRequest, HttpHubClient, HubClient};
pub use hub_config::HubConfig;

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::ModelDescriptor;

/// What happened to one requested model.
#[derive(Debug)]
pub enum Outcome {
    /// The file was already in the output directory; nothing was transferred
    AlreadyPresent(PathBuf),
    /// Dry run: the file would have been downloaded to this path
    WouldDownload(PathBuf),
    Downloaded(PathBuf),
    Failed(DownloadError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failed(_))
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: &Outcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Makes sure one model file is present in `output_dir`.
///
/// An existing file is never re-fetched. With `dry_run` nothing touches the
/// filesystem or the network. Client errors are returned as
/// [`Outcome::Failed`] rather than propagated, so a caller can move on to the
/// next model.
pub fn download_one(
    descriptor: &ModelDescriptor,
    output_dir: &Path,
    dry_run: bool,
    client: &dyn HubClient,
) -> Outcome {
    let target = output_dir.join(&descriptor.filename);

    if target.exists() {
        tracing::debug!(model = %descriptor.name, path = %target.display(), "already present, skipping");
        return Outcome::AlreadyPresent(target);
    }

    if dry_run {
        tracing::debug!(model = %descriptor.name, "dry run, skipping transfer");
        return Outcome::WouldDownload(target);
    }

    if let Err(e) = fs::create_dir_all(output_dir) {
        tracing::warn!(dir = %output_dir.display(), error = %e, "could not create output directory");
        return Outcome::Failed(DownloadError::OutputDir(e));
    }

    tracing::info!(
        model = %descriptor.name,
        repo_id = %descriptor.repo_id,
        filename = %descriptor.filename,
        "downloading"
    );
    let request = FetchRequest {
        repo_id: descriptor.repo_id.clone(),
        filename: descriptor.filename.clone(),
        destination: output_dir.to_path_buf(),
        resume: true,
    };

    match client.fetch(&request) {
        Ok(path) => Outcome::Downloaded(path),
        Err(e) => {
            tracing::warn!(model = %descriptor.name, error = %e, "download failed");
            Outcome::Failed(e)
        }
    }
}

/// Runs [`download_one`] for each model in order, handing every outcome to
/// `report` as it happens.
pub fn download_selection<F>(
    selection: &[&ModelDescriptor],
    output_dir: &Path,
    dry_run: bool,
    client: &dyn HubClient,
    mut report: F,
) -> Summary
where
    F: FnMut(&ModelDescriptor, &Outcome),
{
    let mut summary = Summary::default();

    for &descriptor in selection {
        let outcome = download_one(descriptor, output_dir, dry_run, client);
        report(descriptor, &outcome);
        summary.record(&outcome);
    }

    summary
}

/// `<data dir>/kipepeo/models`. The directory is not created here.
pub fn default_output_dir() -> Result<PathBuf, DownloadError> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        DownloadError::OutputDir(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine data directory",
        ))
    })?;

    Ok(data_dir.join("kipepeo").join("models"))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::catalog::Catalog;

    use super::*;

    const CATALOG: &str = r#"{
        "models": {
            "7B": {"repo_id": "kipepeo-ai/africa-llm-7b-gguf", "filename": "africa-llm-7b.gguf", "size_mb": 4370},
            "34B": {"repo_id": "kipepeo-ai/africa-llm-34b-gguf", "filename": "africa-llm-34b.gguf", "size_mb": 20220},
            "70B": {"repo_id": "kipepeo-ai/africa-llm-70b-gguf", "filename": "africa-llm-70b.gguf", "size_mb": 41000}
        }
    }"#;

    /// Records every request; writes the file unless the filename is in `failing`.
    #[derive(Default)]
    struct RecordingClient {
        requests: RefCell<Vec<FetchRequest>>,
        failing: Vec<&'static str>,
    }

    impl HubClient for RecordingClient {
        fn fetch(&self, request: &FetchRequest) -> Result<PathBuf, DownloadError> {
            self.requests.borrow_mut().push(request.clone());
            if self.failing.contains(&request.filename.as_str()) {
                return Err(DownloadError::FileWrite(std::io::Error::other("disk full")));
            }
            let target = request.target();
            fs::write(&target, b"gguf").map_err(DownloadError::FileWrite)?;
            Ok(target)
        }
    }

    impl RecordingClient {
        fn fetched(&self) -> Vec<String> {
            self.requests
                .borrow()
                .iter()
                .map(|r| r.filename.clone())
                .collect()
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_json(CATALOG).unwrap()
    }

    #[test]
    fn existing_file_is_reported_without_fetching() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("africa-llm-7b.gguf"), b"already here").unwrap();
        let catalog = catalog();
        let client = RecordingClient::default();

        let outcome = download_one(catalog.get("7B").unwrap(), dir.path(), false, &client);

        assert!(matches!(outcome, Outcome::AlreadyPresent(_)));
        assert!(outcome.is_success());
        assert!(client.fetched().is_empty());
    }

    #[test]
    fn dry_run_neither_creates_directory_nor_fetches() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("models");
        let catalog = catalog();
        let client = RecordingClient::default();

        let outcome = download_one(catalog.get("7B").unwrap(), &output, true, &client);

        match outcome {
            Outcome::WouldDownload(path) => assert_eq!(path, output.join("africa-llm-7b.gguf")),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!output.exists());
        assert!(client.fetched().is_empty());
    }

    #[test]
    fn download_creates_output_directory_and_delegates_to_client() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("assets").join("models");
        let catalog = catalog();
        let client = RecordingClient::default();

        let outcome = download_one(catalog.get("34B").unwrap(), &output, false, &client);

        assert!(matches!(outcome, Outcome::Downloaded(ref p) if p == &output.join("africa-llm-34b.gguf")));
        let requests = client.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].repo_id.to_string(), "kipepeo-ai/africa-llm-34b-gguf");
        assert_eq!(requests[0].destination, output);
        assert!(requests[0].resume);
    }

    #[test]
    fn client_errors_become_failed_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog();
        let client = RecordingClient {
            failing: vec!["africa-llm-7b.gguf"],
            ..Default::default()
        };

        let outcome = download_one(catalog.get("7B").unwrap(), dir.path(), false, &client);

        assert!(matches!(outcome, Outcome::Failed(DownloadError::FileWrite(_))));
        assert!(!outcome.is_success());
    }

    #[test]
    fn output_dir_that_is_a_file_fails_without_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("models");
        fs::write(&blocker, b"not a directory").unwrap();
        let catalog = catalog();
        let client = RecordingClient::default();

        let outcome = download_one(catalog.get("7B").unwrap(), &blocker, false, &client);

        assert!(matches!(outcome, Outcome::Failed(DownloadError::OutputDir(_))));
        assert!(client.fetched().is_empty());
    }

    #[test]
    fn all_selection_fetches_every_model_in_catalog_order() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog();
        let selection = catalog.resolve_selection(true, None).unwrap();
        let client = RecordingClient::default();

        let summary = download_selection(&selection, dir.path(), false, &client, |_, _| {});

        assert_eq!(
            client.fetched(),
            ["africa-llm-7b.gguf", "africa-llm-34b.gguf", "africa-llm-70b.gguf"]
        );
        assert_eq!(summary, Summary { succeeded: 3, failed: 0 });
        assert!(summary.is_success());
    }

    #[test]
    fn failures_do_not_stop_the_run_and_counts_add_up() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog();
        let selection = catalog.resolve_selection(false, Some("7B,34B,70B,7B")).unwrap();
        let client = RecordingClient {
            failing: vec!["africa-llm-34b.gguf"],
            ..Default::default()
        };
        let mut reported = Vec::new();

        let summary = download_selection(&selection, dir.path(), false, &client, |d, o| {
            reported.push((d.name.clone(), o.is_success()));
        });

        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), selection.len());
        assert!(!summary.is_success());
        assert_eq!(
            reported,
            [
                ("7B".to_string(), true),
                ("34B".to_string(), false),
                ("70B".to_string(), true),
                ("7B".to_string(), true),
            ]
        );
        // the second 7B finds the file written by the first
        assert_eq!(client.fetched().len(), 3);
    }

    #[test]
    fn default_output_dir_ends_with_kipepeo_models() {
        let dir = default_output_dir().unwrap();
        assert!(dir.ends_with("kipepeo/models"));
    }
}
