use crate::js::ParseError;
use thiserror::Error;

/// Transport-level failures, raised once the retry budget is spent.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timed out fetching {url}")]
    Timeout { url: String },
    #[error("connection to {url} failed: {reason}")]
    ConnectionFailed { url: String, reason: String },
    #[error("gave up on {url} after {attempts} attempts (last status {last_status})")]
    MaxRetriesExceeded {
        url: String,
        attempts: u32,
        last_status: u16,
    },
    #[error("could not build HTTP client: {0}")]
    Client(String),
}

/// Why a results page contributed nothing. Logged by the crawler, never returned.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("search page returned HTTP {status}")]
    HttpStatus { status: u16 },
    #[error("could not build search url from {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("result count marker missing or not numeric")]
    MissingResultCount,
}

/// Per-listing failures. None of these ever escape the orchestrator.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("detail page returned HTTP {status}")]
    HttpStatus { status: u16 },
    #[error("marker not found: {0}")]
    MissingMarker(&'static str),
    #[error("fragment {index} could not be parsed: {source}")]
    MalformedFragment {
        index: usize,
        #[source]
        source: ParseError,
    },
    #[error("no parsable availability date (script value {script_value:?})")]
    UnparsableDate { script_value: Option<String> },
}
