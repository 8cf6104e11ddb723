use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error(
        "Error: {} environment variable(s) must be set, or provide --url",
        .missing.join(" and ")
    )]
    MissingConfig { missing: Vec<&'static str> },

    #[error("HTTP error: {}", status_line(.code, .reason))]
    Http { code: u16, reason: String },

    #[error("URL error: {0}")]
    Network(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl FetchError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            FetchError::MissingConfig { .. } => 2,
            _ => 1,
        }
    }

    /// Builds a transport error from a reqwest failure. The request URL is
    /// stripped so credentials in the query string never reach the message.
    pub(crate) fn network(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            return FetchError::Network(format!("timed out ({})", source_chain(&err)));
        }
        FetchError::Network(source_chain(&err))
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Unexpected(err.to_string())
    }
}

fn status_line(code: &u16, reason: &str) -> String {
    if reason.is_empty() {
        code.to_string()
    } else {
        format!("{} {}", code, reason)
    }
}

/// Joins an error and its sources into one line, skipping repeated messages.
pub(crate) fn source_chain(err: &dyn std::error::Error) -> String {
    let mut parts: Vec<String> = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}
