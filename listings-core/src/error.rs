use std::time::Duration;

use thiserror::Error;

/// Failure of a single feed source. Never escapes the aggregator.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("feed parsing error: {0}")]
    Parse(#[from] rss::Error),
    #[error("source timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid source url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
    /// Transport-level failures that are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            FetchError::Status(status) => status.is_server_error(),
            _ => false,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("minPrice ({min}) must not exceed maxPrice ({max})")]
    InvalidPriceRange { min: u64, max: u64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}
