//! # Core
//!
//! Domain state and the pieces loaded once at startup.
//!
//! - [`config`]: layered configuration
//! - [`env`]: `{{env.KEY}}` values
//! - [`routes`]: path → page mapping
//! - [`state`] and [`action`]: navigation state and its reducer
//! - [`error`]: load failures

pub mod action;
pub mod config;
pub mod env;
pub mod error;
pub mod routes;
pub mod state;
