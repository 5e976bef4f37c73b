// errors.rs
use crate::schema::SchemaError;
use crate::scraper::site::ProfileError;
use thiserror::Error;

/// Problems with the run configuration. These are the only fatal errors;
/// they are raised before any request goes out.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {reason}")]
    Read { path: String, reason: String },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no search areas configured")]
    NoAreas,
    #[error("search area {0} is blank")]
    BlankArea(usize),
    #[error("worker count must be at least 1")]
    NoWorkers,
    #[error("invalid fetch settings: {0}")]
    Fetch(String),
    #[error("unknown site: {0}")]
    UnknownSite(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
}
