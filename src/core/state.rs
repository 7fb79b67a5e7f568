//! # Navigation State
//!
//! The logical position of the app, owned by the runtime.
//!
//! ```text
//! NavigationState
//! ├── current_path: String            // path of the last route transition
//! ├── last_observed_pathname: String  // pathname seen at the last popstate
//! ├── generation: u64                 // bumped per route transition
//! ├── phase: Phase                    // Idle / Resolving / Rendered
//! └── listening: bool                 // setup() has run
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// A render for `generation` is in flight.
    Resolving,
    /// A render finished and is being committed.
    Rendered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub current_path: String,
    pub last_observed_pathname: String,
    pub generation: u64,
    pub phase: Phase,
    pub listening: bool,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new("/")
    }
}

impl NavigationState {
    pub fn new(pathname: &str) -> Self {
        Self {
            current_path: pathname.to_string(),
            last_observed_pathname: pathname.to_string(),
            generation: 0,
            phase: Phase::Idle,
            listening: false,
        }
    }

    /// Starts a route transition to `pathname` and returns its generation.
    /// Any render still in flight becomes stale.
    pub fn begin_transition(&mut self, pathname: &str) -> u64 {
        self.generation += 1;
        self.current_path = pathname.to_string();
        self.last_observed_pathname = pathname.to_string();
        self.phase = Phase::Resolving;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn is_settled(&self) -> bool {
        self.phase == Phase::Idle
    }
}
