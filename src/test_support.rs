//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::FutureExt;

use crate::compose::ComponentLoader;
use crate::fetch::{FetchError, Fetcher};

fn not_found() -> FetchError {
    FetchError::Status {
        status: 404,
        message: "Not Found".to_string(),
    }
}

/// A fetcher serving fixed bodies by path; everything else is a 404.
#[derive(Default)]
pub struct StaticFetcher {
    files: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: &str) -> Self {
        self.files.insert(path.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        self.files.get(path).cloned().ok_or_else(not_found)
    }
}

/// A component resolver over fixed templates (keyed by lowercased name)
/// that counts how many loads it starts. Each load yields once before
/// completing so concurrent callers overlap.
pub fn counting_resolver(
    calls: &Arc<AtomicUsize>,
    templates: &[(&str, &str)],
) -> impl Fn(&str) -> ComponentLoader + Send + Sync + 'static {
    let calls = Arc::clone(calls);
    let templates: HashMap<String, String> = templates
        .iter()
        .map(|(name, body)| (name.to_string(), body.to_string()))
        .collect();

    move |name: &str| -> ComponentLoader {
        calls.fetch_add(1, Ordering::SeqCst);
        let result = templates.get(&name.to_lowercase()).cloned().ok_or_else(not_found);
        async move {
            tokio::task::yield_now().await;
            result
        }
        .boxed()
    }
}
