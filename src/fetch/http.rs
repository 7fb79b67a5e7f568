//! HTTP fetcher backed by `reqwest`.
//!
//! Every path handed to the fetcher is resolved against a single origin
//! (`http://localhost:8080` by default), mirroring how a browser resolves
//! root-relative and relative URLs against the page it is running on.

use async_trait::async_trait;
use log::{debug, warn};

use crate::fetch::{FetchError, Fetcher};

pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Fetches site files from an HTTP server.
pub struct HttpFetcher {
    origin: String,
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a new HTTP fetcher.
    ///
    /// # Arguments
    /// * `origin` - Optional origin (scheme + host + port). Falls back to
    ///   `PAGEWRIGHT_ORIGIN`, then to [`DEFAULT_ORIGIN`].
    pub fn new(origin: Option<String>) -> Self {
        let env_origin = std::env::var("PAGEWRIGHT_ORIGIN").ok();
        let origin = origin
            .or(env_origin)
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

        Self {
            origin: origin.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Absolute URL for a fetch path.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.origin, path)
        } else {
            format!("{}/{}", self.origin, path)
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url_for(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        debug!("{} -> {}", url, response.status());

        if !response.status().is_success() {
            let status = response.status();
            let message = status.canonical_reason().unwrap_or_default().to_string();
            warn!("Fetch failed: {} - {}", url, status);
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}
