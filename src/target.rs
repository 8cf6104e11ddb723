use std::borrow::Cow;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::FetchError;

/// Base of the credential URL; `username` and `password` are appended as
/// query pairs ahead of the fixed `type`/`output` parameters.
pub const URL_BASE: &str = "http://starter.nvisionbd.net/get.php";
pub const USERNAME_VAR: &str = "M3U_USERNAME";
pub const PASSWORD_VAR: &str = "M3U_PASSWORD";
pub const DEFAULT_OUTPUT: &str = "nvision.m3u";

const REDACTED: &str = "****";

/// The resolved (URL, destination) pair for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: Url,
    output: PathBuf,
}

impl Target {
    pub fn new(url: Url, output: impl Into<PathBuf>) -> Self {
        Target {
            url,
            output: output.into(),
        }
    }

    /// Resolves the download URL. An explicit URL wins and `lookup` is never
    /// called; otherwise both credential variables must be present and
    /// non-empty.
    pub fn resolve<F>(
        explicit: Option<Url>,
        output: PathBuf,
        lookup: F,
    ) -> Result<Self, FetchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = explicit {
            return Ok(Target::new(url, output));
        }

        let read = |key: &'static str| lookup(key).filter(|value| !value.is_empty());
        let username = read(USERNAME_VAR);
        let password = read(PASSWORD_VAR);

        match (username, password) {
            (Some(username), Some(password)) => {
                Ok(Target::new(credential_url(&username, &password)?, output))
            }
            (username, password) => {
                let mut missing = Vec::new();
                if username.is_none() {
                    missing.push(USERNAME_VAR);
                }
                if password.is_none() {
                    missing.push(PASSWORD_VAR);
                }
                Err(FetchError::MissingConfig { missing })
            }
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// The URL with any `password` query value masked, safe for diagnostics.
    pub fn redacted_url(&self) -> String {
        if !self.url.query_pairs().any(|(key, _)| key == "password") {
            return self.url.to_string();
        }

        let pairs: Vec<(Cow<'_, str>, Cow<'_, str>)> = self
            .url
            .query_pairs()
            .map(|(key, value)| {
                if key == "password" {
                    (key, Cow::Borrowed(REDACTED))
                } else {
                    (key, value)
                }
            })
            .collect();

        let mut redacted = self.url.clone();
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
        redacted.to_string()
    }
}

/// Fills the fixed template with the given credentials. Values are
/// percent-encoded as query components.
pub fn credential_url(username: &str, password: &str) -> Result<Url, FetchError> {
    Url::parse_with_params(
        URL_BASE,
        &[
            ("username", username),
            ("password", password),
            ("type", "m3u_plus"),
            ("output", "mpegts"),
        ],
    )
    .map_err(|e| FetchError::Unexpected(format!("failed to build URL: {}", e)))
}
