//! # Component Cache
//!
//! Templates are resolved by name through a [`ComponentResolver`] and kept
//! for the rest of the session. Loads are deduplicated while in flight:
//!
//! ```text
//!   load("Card") ──► cached? ──yes──► template
//!                       │no
//!                       ▼
//!                 pending["card"]? ──yes──► await the same Shared future
//!                       │no
//!                       ▼
//!                 resolver.resolve("Card").shared() → pending → await → cache
//! ```
//!
//! Only successful loads are cached; a failed load is forgotten so the next
//! page that references the component tries again.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use log::debug;
use tokio::sync::Mutex;

use crate::compose::markers::AssetPaths;
use crate::core::config::ResolvedConfig;
use crate::core::env::EnvironmentStore;
use crate::core::error::LoadError;
use crate::fetch::{FetchError, Fetcher};

/// Future that produces a component's raw template text.
pub type ComponentLoader = BoxFuture<'static, Result<String, FetchError>>;

/// Maps a component name to the loader for its template.
pub trait ComponentResolver: Send + Sync {
    fn resolve(&self, name: &str) -> ComponentLoader;
}

impl<F> ComponentResolver for F
where
    F: Fn(&str) -> ComponentLoader + Send + Sync,
{
    fn resolve(&self, name: &str) -> ComponentLoader {
        self(name)
    }
}

/// Default resolver: `<baseUrl><basePath>/components/<lowercased name>.html`.
pub struct ConventionResolver {
    fetcher: Arc<dyn Fetcher>,
    root: String,
}

impl ConventionResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: &ResolvedConfig) -> Self {
        Self {
            fetcher,
            root: config.components_root(),
        }
    }

    pub fn location(&self, name: &str) -> String {
        format!("{}/{}.html", self.root, name.to_lowercase())
    }
}

impl ComponentResolver for ConventionResolver {
    fn resolve(&self, name: &str) -> ComponentLoader {
        let fetcher = Arc::clone(&self.fetcher);
        let path = self.location(name);
        async move {
            debug!("Loading component from: {}", path);
            fetcher.fetch_text(&path).await
        }
        .boxed()
    }
}

type PendingLoad = Shared<ComponentLoader>;

pub struct ComponentCache {
    resolver: Arc<dyn ComponentResolver>,
    pub(crate) env: Arc<EnvironmentStore>,
    pub(crate) paths: AssetPaths,
    templates: Mutex<HashMap<String, String>>,
    pending: Mutex<HashMap<String, PendingLoad>>,
}

impl ComponentCache {
    pub fn new(
        resolver: impl ComponentResolver + 'static,
        env: Arc<EnvironmentStore>,
        paths: AssetPaths,
    ) -> Self {
        Self::shared(Arc::new(resolver), env, paths)
    }

    /// Builds a cache over a resolver that other caches may also use.
    pub fn shared(
        resolver: Arc<dyn ComponentResolver>,
        env: Arc<EnvironmentStore>,
        paths: AssetPaths,
    ) -> Self {
        Self {
            resolver,
            env,
            paths,
            templates: Mutex::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Cache wired to the path convention for `config`.
    pub fn with_convention(
        fetcher: Arc<dyn Fetcher>,
        config: &ResolvedConfig,
        env: Arc<EnvironmentStore>,
    ) -> Self {
        Self::new(
            ConventionResolver::new(fetcher, config),
            env,
            AssetPaths::from_config(config),
        )
    }

    /// Returns the raw template for `name`, loading it at most once.
    pub async fn load(&self, name: &str) -> Result<String, LoadError> {
        let key = name.to_lowercase();

        if let Some(template) = self.templates.lock().await.get(&key) {
            debug!("Component {} found in cache", name);
            return Ok(template.clone());
        }

        let load = {
            let mut pending = self.pending.lock().await;
            match pending.get(&key) {
                Some(load) => {
                    debug!("Component {} already loading, awaiting it", name);
                    load.clone()
                }
                None => {
                    let load = self.resolver.resolve(name).shared();
                    pending.insert(key.clone(), load.clone());
                    load
                }
            }
        };

        let result = load.clone().await;

        if let Ok(template) = &result {
            self.templates
                .lock()
                .await
                .insert(key.clone(), template.clone());
            debug!("Component {} loaded successfully", name);
        }

        let mut pending = self.pending.lock().await;
        if pending.get(&key).is_some_and(|p| p.ptr_eq(&load)) {
            pending.remove(&key);
        }

        result.map_err(|source| LoadError::Component {
            name: name.to_string(),
            source,
        })
    }

    pub async fn is_cached(&self, name: &str) -> bool {
        self.templates
            .lock()
            .await
            .contains_key(&name.to_lowercase())
    }

    pub async fn len(&self) -> usize {
        self.templates.lock().await.len()
    }
}
