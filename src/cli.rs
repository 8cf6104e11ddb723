use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use crate::target::DEFAULT_OUTPUT;

#[derive(Parser, Debug)]
#[command(name = "nvision-m3u")]
#[command(about = "Download an M3U playlist and save it to disk")]
#[command(after_help = "Without --url, M3U_USERNAME and M3U_PASSWORD must be set.")]
pub struct Args {
    #[arg(long, help = "M3U URL (overrides the credential environment variables)")]
    pub url: Option<UrlArg>,
    #[arg(long, default_value = DEFAULT_OUTPUT, help = "Output filename")]
    pub output: PathBuf,
}

impl Args {
    /// The `--url` value, if one was given and is non-empty.
    pub fn explicit_url(&self) -> Option<Url> {
        self.url.as_ref().and_then(|arg| arg.0.clone())
    }
}

/// `--url` value. An empty string counts as not given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlArg(pub Option<Url>);

impl FromStr for UrlArg {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(UrlArg(None));
        }
        Url::parse(s).map(|url| UrlArg(Some(url)))
    }
}
