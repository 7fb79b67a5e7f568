//! # Runtime
//!
//! Owns the document and the navigation state and is the only thing that
//! writes to either. Renders run as spawned tasks and report back over a
//! channel:
//!
//! ```text
//!   DomEvent / navigate_to ──► update() ──► Effect::Resolve ──► spawn render
//!                                                                   │
//!   document ◄── commit ◄── Effect::Commit ◄── update() ◄── RenderFinished
//! ```
//!
//! Every route transition bumps the navigation generation, so a slow render
//! that finishes after a newer navigation is dropped instead of overwriting
//! the newer page.
//!
//! Methods that start a render spawn onto the current Tokio runtime and must
//! be called from inside one.

use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::mpsc;

use crate::compose::{AssetPaths, ComponentCache, ComponentResolver, ConventionResolver};
use crate::core::action::{update, Action, Effect, HistoryMode};
use crate::core::config::ResolvedConfig;
use crate::core::env::EnvironmentStore;
use crate::core::error::LoadError;
use crate::core::routes::RouteTable;
use crate::core::state::NavigationState;
use crate::dom::{Disposition, Document, DomEvent, Location};
use crate::fetch::Fetcher;
use crate::render::{self, InstanceRegistry, PageRenderer, RenderStatus};

pub struct Runtime<D: Document> {
    document: D,
    fetcher: Arc<dyn Fetcher>,
    config: ResolvedConfig,
    resolver: Arc<dyn ComponentResolver>,
    env: Arc<EnvironmentStore>,
    routes: RouteTable,
    renderer: Arc<PageRenderer>,
    state: NavigationState,
    instances: InstanceRegistry,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Action>,
}

impl<D: Document> Runtime<D> {
    /// A runtime with an empty environment and route table. Call
    /// [`Runtime::start`] to load them.
    pub fn new(document: D, fetcher: Arc<dyn Fetcher>, config: ResolvedConfig) -> Self {
        let resolver: Arc<dyn ComponentResolver> =
            Arc::new(ConventionResolver::new(Arc::clone(&fetcher), &config));
        let env = Arc::new(EnvironmentStore::default());
        let renderer = Self::build_renderer(&fetcher, &config, &resolver, &env);
        let state = NavigationState::new(document.location().pathname());
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            document,
            fetcher,
            config,
            resolver,
            env,
            routes: RouteTable::default(),
            renderer,
            state,
            instances: InstanceRegistry::new(),
            tx,
            rx,
        }
    }

    /// Replaces the path-convention component resolver.
    pub fn with_resolver(mut self, resolver: impl ComponentResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self.renderer = Self::build_renderer(&self.fetcher, &self.config, &self.resolver, &self.env);
        self
    }

    fn build_renderer(
        fetcher: &Arc<dyn Fetcher>,
        config: &ResolvedConfig,
        resolver: &Arc<dyn ComponentResolver>,
        env: &Arc<EnvironmentStore>,
    ) -> Arc<PageRenderer> {
        let components = Arc::new(ComponentCache::shared(
            Arc::clone(resolver),
            Arc::clone(env),
            AssetPaths::from_config(config),
        ));
        Arc::new(PageRenderer::new(
            Arc::clone(fetcher),
            config.clone(),
            Arc::clone(env),
            components,
        ))
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn env(&self) -> &EnvironmentStore {
        &self.env
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn components(&self) -> &ComponentCache {
        self.renderer.components()
    }

    pub fn instances(&self) -> &InstanceRegistry {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut InstanceRegistry {
        &mut self.instances
    }

    // ========================================================================
    // Startup
    // ========================================================================

    /// Loads the environment, route table and app shell, starts listening,
    /// and renders the current location. Returns once that first render has
    /// been committed.
    pub async fn start(&mut self) {
        info!("Starting with fetcher: {}", self.fetcher.name());

        self.env = Arc::new(EnvironmentStore::load(self.fetcher.as_ref(), &self.config.env_url()).await);
        debug!("Environment variables loaded: {}", self.env.len());
        self.renderer = Self::build_renderer(&self.fetcher, &self.config, &self.resolver, &self.env);

        self.routes = RouteTable::load(self.fetcher.as_ref(), &self.config.routes_url()).await;
        self.load_shell().await;
        self.setup();
        self.handle_route();
        self.settle().await;
    }

    async fn load_shell(&mut self) {
        match self.renderer.render_shell().await {
            Ok(html) => {
                if self.document.mount_shell(&html) {
                    debug!("App wrapper loaded");
                } else {
                    warn!("App wrapper has no #{} element", crate::dom::CONTAINER_ID);
                }
            }
            Err(e) => error!("Error loading app wrapper: {}", e),
        }
    }

    /// Starts reacting to link clicks and back/forward navigation.
    pub fn setup(&mut self) {
        let pathname = self.document.location().pathname().to_string();
        self.dispatch(Action::Listen { pathname });
        info!("Router listening");
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Handles an input event and reports whether its default browser
    /// behaviour must be suppressed.
    pub fn handle_event(&mut self, event: DomEvent) -> Disposition {
        match event {
            DomEvent::PopState => {
                let pathname = self.document.location().pathname().to_string();
                self.dispatch(Action::PopState { pathname });
                Disposition::Default
            }
            DomEvent::LinkClick(link) => {
                let location = self.document.location();
                match self.dispatch(Action::LinkActivated { link, location }) {
                    Effect::PassThrough => Disposition::Default,
                    _ => Disposition::Prevented,
                }
            }
            DomEvent::ActionClick {
                component_id,
                action,
            } => {
                self.instances
                    .dispatch_action(&mut self.document, &component_id, &action);
                Disposition::Default
            }
        }
    }

    /// Pushes a history entry for `path` and renders it.
    pub fn navigate_to(&mut self, path: &str) {
        info!("Navigating to: {}", path);
        if let Some(target) = self.resolve_href(path) {
            self.dispatch(Action::Navigate {
                target,
                mode: HistoryMode::Push,
            });
        }
    }

    /// Replaces the current history entry with `path` and renders it.
    pub fn replace(&mut self, path: &str) {
        info!("Replacing current route with: {}", path);
        if let Some(target) = self.resolve_href(path) {
            self.dispatch(Action::Navigate {
                target,
                mode: HistoryMode::Replace,
            });
        }
    }

    /// `navigate_to`, or a full page load when `reload` is set.
    pub fn go(&mut self, path: &str, reload: bool) {
        if let Some(target) = self.resolve_href(path) {
            self.dispatch(Action::Go { target, reload });
        }
    }

    /// Renders the document's current location without touching history.
    pub fn handle_route(&mut self) {
        let pathname = self.document.location().pathname().to_string();
        debug!("Handling route: {}", pathname);
        self.dispatch(Action::HandleRoute { pathname });
    }

    fn resolve_href(&self, path: &str) -> Option<Location> {
        let target = self.document.location().join(path);
        if target.is_none() {
            warn!("Cannot navigate to {}: not an in-app location", path);
        }
        target
    }

    // ========================================================================
    // Event loop
    // ========================================================================

    /// Waits until the latest route transition has been committed.
    pub async fn settle(&mut self) {
        while !self.state.is_settled() {
            match self.rx.recv().await {
                Some(action) => {
                    self.dispatch(action);
                }
                None => break,
            }
        }
    }

    /// Processes document events and finished renders until the event
    /// channel closes, then lets the last navigation settle.
    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<DomEvent>) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        debug!("Event loop received: {:?}", event);
                        self.handle_event(event);
                    }
                    None => break,
                },
                Some(action) = self.rx.recv() => {
                    self.dispatch(action);
                }
            }
        }
        self.settle().await;
    }

    fn dispatch(&mut self, action: Action) -> Effect {
        let effect = update(&mut self.state, action);
        self.apply(effect.clone());
        effect
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::None | Effect::PassThrough => {}
            Effect::Resolve {
                history,
                pathname,
                generation,
            } => {
                match history {
                    Some((HistoryMode::Push, target)) => self.document.push_state(&target),
                    Some((HistoryMode::Replace, target)) => self.document.replace_state(&target),
                    None => {}
                }
                self.begin_render(pathname, generation);
            }
            Effect::Reload(target) => self.document.assign(&target),
            Effect::Commit(outcome) => {
                match render::commit(&mut self.document, &mut self.instances, &outcome.html) {
                    Ok(created) => match outcome.status {
                        RenderStatus::Rendered => {
                            info!("Page loaded successfully ({} component instance(s))", created)
                        }
                        status => debug!("Committed {:?}", status),
                    },
                    Err(e) => error!("{}", e),
                }
                let generation = self.state.generation;
                self.dispatch(Action::Committed { generation });
            }
        }
    }

    /// Looks up the route and spawns the render for `generation`.
    fn begin_render(&mut self, pathname: String, generation: u64) {
        let route = self.routes.lookup(&pathname).cloned();
        match &route {
            Some(route) => {
                if let Some(title) = &route.title {
                    self.document.set_title(title);
                }
            }
            None => warn!("{}", LoadError::RouteNotFound(pathname)),
        }

        if !self.document.has_container() {
            error!("{}", LoadError::AppContainerMissing);
            self.dispatch(Action::Committed { generation });
            return;
        }

        let renderer = Arc::clone(&self.renderer);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = match route {
                Some(route) => renderer.render(&route.component).await,
                None => renderer.render_not_found().await,
            };
            if tx
                .send(Action::RenderFinished {
                    generation,
                    outcome,
                })
                .is_err()
            {
                warn!("Failed to deliver render for generation {}: runtime dropped", generation);
            }
        });
    }
}
