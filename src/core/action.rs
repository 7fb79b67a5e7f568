//! # Actions
//!
//! Everything that can happen to navigation becomes an `Action`.
//! User clicks an in-app link? That's `Action::LinkActivated`.
//! A page finished rendering? That's `Action::RenderFinished`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state and returns an `Effect` for the runtime to carry out. No side
//! effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::core::state::{NavigationState, Phase};
use crate::dom::{Link, Location};
use crate::render::RenderOutcome;

/// How a programmatic navigation touches history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    Replace,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `setup()`: start reacting to link clicks and popstate.
    Listen { pathname: String },
    /// Back/forward moved the document to `pathname`.
    PopState { pathname: String },
    /// A click on an anchor while the document was at `location`.
    LinkActivated { link: Link, location: Location },
    Navigate { target: Location, mode: HistoryMode },
    Go { target: Location, reload: bool },
    /// Resolve and render `pathname` without touching history.
    HandleRoute { pathname: String },
    RenderFinished { generation: u64, outcome: RenderOutcome },
    Committed { generation: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Leave the event to the browser.
    PassThrough,
    /// Optionally write history, then resolve `pathname` and render it
    /// under `generation`.
    Resolve {
        history: Option<(HistoryMode, Location)>,
        pathname: String,
        generation: u64,
    },
    /// Full page load.
    Reload(Location),
    /// Commit a finished render into the document.
    Commit(RenderOutcome),
}

const EXTERNAL_SCHEMES: &[&str] = &["http:", "https:", "mailto:", "tel:"];

/// Decides whether a link click is routed in-app. Returns the resolved
/// target, or None if the browser should handle the click.
pub fn intercept(link: &Link, location: &Location) -> Option<Location> {
    let href = link.href.as_deref().filter(|href| !href.is_empty())?;

    if EXTERNAL_SCHEMES.iter().any(|scheme| href.starts_with(scheme)) || href.starts_with('#') {
        return None;
    }
    if link.target.as_deref() == Some("_blank") || link.download || link.external || link.reload {
        return None;
    }

    let target = location.join(href)?;
    // In-page anchor on the current page.
    if target.pathname() == location.pathname() && target.hash().is_some() {
        return None;
    }
    Some(target)
}

fn resolve(
    state: &mut NavigationState,
    history: Option<(HistoryMode, Location)>,
    pathname: String,
) -> Effect {
    let generation = state.begin_transition(&pathname);
    debug!("Route transition to {} (generation {})", pathname, generation);
    Effect::Resolve {
        history,
        pathname,
        generation,
    }
}

fn navigate(state: &mut NavigationState, target: Location, mode: HistoryMode) -> Effect {
    let pathname = target.pathname().to_string();
    resolve(state, Some((mode, target)), pathname)
}

pub fn update(state: &mut NavigationState, action: Action) -> Effect {
    match action {
        Action::Listen { pathname } => {
            state.listening = true;
            state.last_observed_pathname = pathname;
            Effect::None
        }
        Action::PopState { pathname } => {
            if !state.listening {
                return Effect::None;
            }
            if pathname == state.last_observed_pathname {
                debug!("Ignoring popstate for unchanged path {}", pathname);
                return Effect::None;
            }
            resolve(state, None, pathname)
        }
        Action::LinkActivated { link, location } => {
            if !state.listening {
                return Effect::PassThrough;
            }
            match intercept(&link, &location) {
                Some(target) => navigate(state, target, HistoryMode::Push),
                None => Effect::PassThrough,
            }
        }
        Action::Navigate { target, mode } => navigate(state, target, mode),
        Action::Go { target, reload } => {
            if reload {
                Effect::Reload(target)
            } else {
                navigate(state, target, HistoryMode::Push)
            }
        }
        Action::HandleRoute { pathname } => resolve(state, None, pathname),
        Action::RenderFinished {
            generation,
            outcome,
        } => {
            if !state.is_current(generation) {
                debug!(
                    "Discarding stale render (generation {}, current {})",
                    generation, state.generation
                );
                return Effect::None;
            }
            state.phase = Phase::Rendered;
            Effect::Commit(outcome)
        }
        Action::Committed { generation } => {
            if state.is_current(generation) {
                state.phase = Phase::Idle;
            }
            Effect::None
        }
    }
}
