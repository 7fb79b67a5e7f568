use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Errors that can occur while fetching a resource by path.
/// None of them are retried: a failed fetch is final for that attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Transport-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The server answered with a non-success status.
    Status { status: u16, message: String },
    /// The body could not be decoded (invalid UTF-8 or JSON).
    Parse(String),
}

impl FetchError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Status { status, message } if message.is_empty() => {
                write!(f, "HTTP {status}")
            }
            FetchError::Status { status, message } => write!(f, "HTTP {status}: {message}"),
            FetchError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Fetch-by-path access to the files that make up a site: the route
/// manifest, the environment file, the app shell, pages and components.
///
/// Paths are given exactly as the pipeline builds them (`/src/routes.json`,
/// `.env`, ...); resolving them against a host is the implementor's job.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the name of the fetcher, for logging.
    fn name(&self) -> &str;

    /// Fetches the resource at `path` as text. Non-success responses are
    /// reported as `FetchError::Status`.
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;
}

/// Fetches `path` and decodes the body as JSON.
pub async fn fetch_json<T: DeserializeOwned>(
    fetcher: &dyn Fetcher,
    path: &str,
) -> Result<T, FetchError> {
    let body = fetcher.fetch_text(path).await?;
    serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))
}
