//! # Route Table
//!
//! Exact-match mapping from a URL path to the page fragment that renders it.
//! Loaded once from `routes.json`:
//!
//! ```json
//! {
//!   "/":      { "component": "pages/home.html", "title": "Home" },
//!   "/about": { "component": "pages/about.html" }
//! }
//! ```

use std::collections::HashMap;

use log::{debug, error, info};
use serde::Deserialize;

use crate::core::error::LoadError;
use crate::fetch::{fetcher::fetch_json, Fetcher};

/// One value of the route manifest.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RouteSpec {
    pub component: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    pub path: String,
    pub component: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, RouteEntry>,
}

impl RouteTable {
    pub fn from_manifest(manifest: HashMap<String, RouteSpec>) -> Self {
        let routes = manifest
            .into_iter()
            .map(|(path, spec)| {
                let entry = RouteEntry {
                    path: path.clone(),
                    component: spec.component,
                    title: spec.title,
                };
                (path, entry)
            })
            .collect();
        Self { routes }
    }

    /// Fetches the manifest. Any failure leaves the table empty, so every
    /// later lookup is a miss and renders the not-found page.
    pub async fn load(fetcher: &dyn Fetcher, path: &str) -> Self {
        match fetch_json::<HashMap<String, RouteSpec>>(fetcher, path).await {
            Ok(manifest) => {
                let table = Self::from_manifest(manifest);
                info!("Loaded {} route(s) from {}", table.len(), path);
                debug!("Routes: {:?}", table.paths());
                table
            }
            Err(e) => {
                error!("{}", LoadError::RouteTable(e));
                Self::default()
            }
        }
    }

    pub fn lookup(&self, path: &str) -> Option<&RouteEntry> {
        self.routes.get(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}
