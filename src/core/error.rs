//! # Load Errors
//!
//! Every failure the pipeline can hit. All of them are soft: they are
//! caught where they happen, logged, and turned into a fallback (empty
//! data, an inline placeholder, or replacement text). `AppContainerMissing`
//! is the only one that stops an operation, and even then only the current
//! render becomes a no-op.

use std::fmt;

use crate::fetch::FetchError;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The route manifest could not be fetched or parsed. The table stays empty.
    RouteTable(FetchError),
    /// The environment file could not be fetched. The store stays empty.
    Environment(FetchError),
    /// A component template could not be loaded. Replaced by a placeholder.
    Component { name: String, source: FetchError },
    /// A page fragment could not be loaded. Replaced by an error message.
    Page { path: String, source: FetchError },
    /// No route matches the path. Triggers not-found rendering.
    RouteNotFound(String),
    /// The app shell did not provide a render container.
    AppContainerMissing,
}

impl LoadError {
    /// HTTP status behind the failure, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            LoadError::RouteTable(e) | LoadError::Environment(e) => e.status(),
            LoadError::Component { source, .. } | LoadError::Page { source, .. } => source.status(),
            LoadError::RouteNotFound(_) | LoadError::AppContainerMissing => None,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::RouteTable(e) => write!(f, "failed to load routes: {e}"),
            LoadError::Environment(e) => write!(f, "failed to load environment: {e}"),
            LoadError::Component { name, source } => {
                write!(f, "component {name} failed to load: {source}")
            }
            LoadError::Page { source, .. } => write!(f, "Failed to load page: {source}"),
            LoadError::RouteNotFound(path) => write!(f, "route not found: {path}"),
            LoadError::AppContainerMissing => write!(f, "app container not found"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::RouteTable(e) | LoadError::Environment(e) => Some(e),
            LoadError::Component { source, .. } | LoadError::Page { source, .. } => Some(source),
            _ => None,
        }
    }
}
