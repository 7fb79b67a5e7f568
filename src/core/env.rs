//! # Environment Store
//!
//! A flat `KEY=VALUE` file fetched once at startup. Pages and components
//! reference its values with `{{env.KEY}}` markers.
//!
//! ```text
//! # comment
//! API_URL="https://api.example.com"
//! GREETING=hello=world      → value "hello=world"
//! ```
//!
//! A missing or unreadable file is not an error: the store is simply empty
//! and every marker substitutes to the empty string.

use std::collections::HashMap;

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::core::error::LoadError;
use crate::fetch::Fetcher;

static ENV_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*env\.([A-Za-z0-9_]+)\s*\}\}").unwrap());

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentStore {
    vars: HashMap<String, String>,
}

impl EnvironmentStore {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    /// Fetches and parses the environment file. Never fails; a fetch error
    /// is logged and yields an empty store.
    pub async fn load(fetcher: &dyn Fetcher, path: &str) -> Self {
        match fetcher.fetch_text(path).await {
            Ok(text) => {
                let store = Self::parse(&text);
                info!("Loaded {} environment variable(s) from {}", store.len(), path);
                store
            }
            Err(e) => {
                warn!(
                    "{}. Proceeding without environment variables.",
                    LoadError::Environment(e)
                );
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut vars = HashMap::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once('=').unwrap_or((line, ""));
            vars.insert(key.trim().to_string(), unquote(value.trim()).to_string());
        }

        debug!("Parsed environment keys: {:?}", vars.keys().collect::<Vec<_>>());
        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Replaces every `{{env.KEY}}` marker. Unknown keys become "".
    pub fn substitute(&self, text: &str) -> String {
        ENV_MARKER
            .replace_all(text, |caps: &Captures| match self.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => {
                    debug!("Environment variable not found for {}", &caps[0]);
                    String::new()
                }
            })
            .into_owned()
    }
}

/// Strips one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
