use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{CONTENT_RANGE, RANGE};

use crate::catalog::RepoId;
use crate::error::DownloadError;

use super::hub_config::HubConfig;

const HUB_USER_AGENT: &str = concat!("kipepeo-models/", env!("CARGO_PKG_VERSION"));

/// One file to fetch from the hub.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FetchRequest {
    pub repo_id: RepoId,
    pub filename: String,
    pub destination: PathBuf,
    /// Continue a previously interrupted transfer if one is on disk
    pub resume: bool,
}

impl FetchRequest {
    pub fn target(&self) -> PathBuf {
        self.destination.join(&self.filename)
    }
}

/// Transfers a single file from a model hub into a local directory.
pub trait HubClient {
    /// Fetches `request.filename` from `request.repo_id` into
    /// `request.destination`, returning the path of the written file.
    fn fetch(&self, request: &FetchRequest) -> Result<PathBuf, DownloadError>;
}

/// Blocking HTTP client for HuggingFace-compatible hubs.
pub struct HttpHubClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpHubClient {
    /// Client for the endpoint and token configured in the environment
    pub fn new() -> Result<Self, DownloadError> {
        Self::from_config(HubConfig::from_env())
    }

    pub fn from_config(config: HubConfig) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .user_agent(HUB_USER_AGENT)
            .connect_timeout(Duration::from_secs(30))
            .timeout(None::<Duration>)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            token: config.token,
        })
    }

    /// Environment token, explicit endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, DownloadError> {
        Self::from_config(HubConfig {
            endpoint: endpoint.into(),
            ..HubConfig::from_env()
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn file_url(&self, request: &FetchRequest) -> String {
        format!(
            "{}/{}/resolve/main/{}",
            self.endpoint.trim_end_matches('/'),
            request.repo_id,
            request.filename
        )
    }
}

impl HubClient for HttpHubClient {
    fn fetch(&self, request: &FetchRequest) -> Result<PathBuf, DownloadError> {
        let target = request.target();
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(DownloadError::OutputDir)?;
        }

        let partial = partial_path(&target);
        let offset = if request.resume {
            fs::metadata(&partial).map(|m| m.len()).unwrap_or(0)
        } else {
            0
        };

        let url = self.file_url(request);
        let mut builder = self.client.get(&url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if offset > 0 {
            tracing::debug!(url = %url, offset, "resuming partial download");
            builder = builder.header(RANGE, format!("bytes={offset}-"));
        }

        let response = builder.send()?;
        if offset > 0 && response.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            if unsatisfied_range_length(&response) == Some(offset) {
                tracing::debug!(url = %url, offset, "partial download already complete");
                fs::rename(&partial, &target).map_err(DownloadError::FileWrite)?;
                return Ok(target);
            }
            // The partial file is not a prefix of the remote file; start over.
            fs::remove_file(&partial).map_err(DownloadError::FileWrite)?;
            let restart = FetchRequest {
                resume: false,
                ..request.clone()
            };
            return self.fetch(&restart);
        }
        let response = response.error_for_status()?;

        let resumed = offset > 0 && response.status() == StatusCode::PARTIAL_CONTENT;
        let start = if resumed { offset } else { 0 };
        let file = if resumed {
            OpenOptions::new().append(true).open(&partial)
        } else {
            File::create(&partial)
        }
        .map_err(DownloadError::FileWrite)?;

        let total_size = response.content_length().map(|len| len + start).unwrap_or(0);
        let progress_bar = progress_bar(&request.filename, total_size)?;
        progress_bar.set_position(start);

        stream_to_file(response, file, &progress_bar)?;
        progress_bar.finish_and_clear();

        fs::rename(&partial, &target).map_err(DownloadError::FileWrite)?;

        Ok(target)
    }
}

/// Remote length from a 416 `Content-Range: bytes */<length>` header.
fn unsatisfied_range_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_RANGE)?
        .to_str()
        .ok()?
        .strip_prefix("bytes */")?
        .trim()
        .parse()
        .ok()
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn progress_bar(filename: &str, total_size: u64) -> Result<ProgressBar, DownloadError> {
    let progress_bar = ProgressBar::new(total_size);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})")?
            .progress_chars("#>-"),
    );
    progress_bar.set_message(filename.to_string());
    Ok(progress_bar)
}

fn stream_to_file(
    mut response: Response,
    mut file: File,
    progress_bar: &ProgressBar,
) -> Result<(), DownloadError> {
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(DownloadError::FileWrite)?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])
            .map_err(DownloadError::FileWrite)?;
        progress_bar.inc(bytes_read as u64);
    }

    file.flush().map_err(DownloadError::FileWrite)
}
