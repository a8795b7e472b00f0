//! Error types for the enrichment pipeline and distance lookups

use std::path::PathBuf;

/// Fatal error from a pipeline run.
///
/// Per-row lookup failures are never surfaced here; they are counted in
/// [`EnrichStats`](crate::enrich::EnrichStats) instead.
#[derive(Debug)]
pub enum PipelineError {
    /// Input file missing or unreadable
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Input is not decodable as CSV
    Parse(csv::Error),
    /// Input has no header row
    EmptyInput(PathBuf),
    /// Output could not be encoded or persisted
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse(e) => write!(f, "CSV parse error: {e}"),
            Self::EmptyInput(path) => write!(f, "{} has no header row", path.display()),
            Self::Write { path, source } => {
                write!(f, "cannot write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::EmptyInput(_) => None,
        }
    }
}

impl From<csv::Error> for PipelineError {
    fn from(e: csv::Error) -> Self {
        Self::Parse(e)
    }
}

/// Error from a single distance lookup. Never aborts a run.
#[derive(Debug)]
pub enum LookupError {
    /// HTTP error with optional status code (`None` = transport failure)
    Http {
        status: Option<u16>,
        message: String,
    },
    /// Response body is not the expected JSON
    Decode(String),
    /// Response lacks a usable distance or duration
    MissingFields { element_status: Option<String> },
    /// No API key configured; no request was made
    MissingApiKey,
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Decode(msg) => write!(f, "invalid response: {msg}"),
            Self::MissingFields {
                element_status: Some(status),
            } => write!(f, "no distance/duration in response (status {status})"),
            Self::MissingFields {
                element_status: None,
            } => write!(f, "no distance/duration in response"),
            Self::MissingApiKey => write!(f, "API key not configured"),
        }
    }
}

impl std::error::Error for LookupError {}

impl LookupError {
    /// Create HTTP error from reqwest error.
    ///
    /// The URL is stripped so the API key does not end up in logs.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.without_url().to_string(),
        }
    }
}
