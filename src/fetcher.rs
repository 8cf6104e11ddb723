use hyper::ext::ReasonPhrase;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Response};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::error::{source_chain, FetchError};
use crate::target::Target;

pub const USER_AGENT: &str = "nvision-m3u-downloader/1.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub bytes: usize,
    pub path: PathBuf,
}

pub struct Fetcher {
    client: Client,
    show_progress: bool,
}

impl Fetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                FetchError::Unexpected(format!("failed to build HTTP client: {}", source_chain(&e)))
            })?;

        Ok(Fetcher {
            client,
            show_progress: true,
        })
    }

    /// Disables the spinner. It is already hidden when stderr is not a terminal.
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    fn spinner(&self, target: &Target) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        let style =
            ProgressStyle::default_spinner().template("{spinner:.green} Fetching playlist: {msg}");
        if let Ok(style) = style {
            pb.set_style(style);
        }
        pb.set_message(target.redacted_url());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Downloads `target` and writes the body to its output path. Nothing is
    /// written unless the server answered 2xx and the whole body was read.
    pub async fn fetch(&self, target: &Target) -> Result<Download, FetchError> {
        let pb = self.spinner(target);
        let result = self.fetch_bytes(target).await;
        pb.finish_and_clear();
        let body = result?;

        write_output(target.output(), &body).await?;
        tracing::info!(bytes = body.len(), path = %target.output().display(), "playlist saved");

        Ok(Download {
            bytes: body.len(),
            path: target.output().to_path_buf(),
        })
    }

    async fn fetch_bytes(&self, target: &Target) -> Result<Vec<u8>, FetchError> {
        tracing::debug!(url = %target.redacted_url(), "sending request");

        let response = self
            .client
            .get(target.url().clone())
            .send()
            .await
            .map_err(FetchError::network)?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "response received");
        if !status.is_success() {
            return Err(FetchError::Http {
                code: status.as_u16(),
                reason: reason_phrase(&response),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| {
                let cause = source_chain(&e.without_url());
                FetchError::Unexpected(format!("failed to read response body: {}", cause))
            })?;

        Ok(bytes.to_vec())
    }
}

/// The server's reason phrase, falling back to the canonical one for the status.
/// hyper only records the phrase when it differs from the canonical text.
fn reason_phrase(response: &Response) -> String {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).trim().to_string())
        .filter(|phrase| !phrase.is_empty())
        .or_else(|| response.status().canonical_reason().map(str::to_string))
        .unwrap_or_default()
}

/// Creates missing parent directories, then replaces `path` with `body`.
pub async fn write_output(path: &Path, body: &[u8]) -> Result<(), FetchError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).await?;

    let mut file = File::create(path).await?;
    file.write_all(body).await?;
    file.flush().await?;

    Ok(())
}
