//! # Page Renderer
//!
//! Produces the markup for a page without touching the document:
//!
//! ```text
//!   fetch ──► env substitution ──► component expansion ──► asset paths
//! ```
//!
//! The stages always run in this order. Failures never escape: a page that
//! cannot be fetched renders as an inline error message, and a missing
//! not-found page falls back to fixed text.

use std::sync::Arc;

use log::{debug, error, info};

use crate::compose::{AssetPaths, ComponentCache};
use crate::core::config::ResolvedConfig;
use crate::core::env::EnvironmentStore;
use crate::core::error::LoadError;
use crate::fetch::{FetchError, Fetcher};

pub const NOT_FOUND_FALLBACK: &str = "404, page not found";

#[derive(Debug, Clone, PartialEq)]
pub enum RenderStatus {
    /// The page rendered normally.
    Rendered,
    /// The page fragment could not be loaded; `html` is an error message.
    Failed(LoadError),
    /// The not-found fragment rendered.
    NotFound,
    /// The not-found fragment itself was unavailable; `html` is fixed text.
    NotFoundFallback,
}

/// Markup ready to be committed to the container.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    pub html: String,
    pub status: RenderStatus,
}

pub struct PageRenderer {
    fetcher: Arc<dyn Fetcher>,
    config: ResolvedConfig,
    env: Arc<EnvironmentStore>,
    components: Arc<ComponentCache>,
    paths: AssetPaths,
}

impl PageRenderer {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        config: ResolvedConfig,
        env: Arc<EnvironmentStore>,
        components: Arc<ComponentCache>,
    ) -> Self {
        let paths = AssetPaths::from_config(&config);
        Self {
            fetcher,
            config,
            env,
            components,
            paths,
        }
    }

    pub fn components(&self) -> &Arc<ComponentCache> {
        &self.components
    }

    /// Renders the page fragment at `<baseUrl><basePath>/<component_path>`.
    pub async fn render(&self, component_path: &str) -> RenderOutcome {
        info!("Loading page: {}", component_path);
        match self.load_fragment(&self.config.page_url(component_path)).await {
            Ok(html) => {
                debug!("Page {} rendered ({} bytes)", component_path, html.len());
                RenderOutcome {
                    html,
                    status: RenderStatus::Rendered,
                }
            }
            Err(source) => {
                let err = LoadError::Page {
                    path: component_path.to_string(),
                    source,
                };
                error!("Error loading page: {}", err);
                RenderOutcome {
                    html: format!("<p>Error: {err}</p>"),
                    status: RenderStatus::Failed(err),
                }
            }
        }
    }

    /// Renders the not-found fragment, or the fixed fallback text.
    pub async fn render_not_found(&self) -> RenderOutcome {
        match self.load_fragment(&self.config.not_found_url()).await {
            Ok(html) => RenderOutcome {
                html,
                status: RenderStatus::NotFound,
            },
            Err(e) => {
                error!("Error rendering 404 page: {}", e);
                RenderOutcome {
                    html: NOT_FOUND_FALLBACK.to_string(),
                    status: RenderStatus::NotFoundFallback,
                }
            }
        }
    }

    /// Fetches the app shell. Env markers and asset paths are resolved;
    /// components are not expanded in the shell.
    pub async fn render_shell(&self) -> Result<String, FetchError> {
        let html = self.fetcher.fetch_text(&self.config.shell_url()).await?;
        Ok(self.paths.rewrite(&self.env.substitute(&html)))
    }

    async fn load_fragment(&self, path: &str) -> Result<String, FetchError> {
        let html = self.fetcher.fetch_text(path).await?;
        Ok(self.compose(&html).await)
    }

    /// env → expand → asset paths.
    pub async fn compose(&self, html: &str) -> String {
        let html = self.env.substitute(html);
        let html = self.components.expand(&html).await;
        self.paths.rewrite(&html)
    }
}
