//! # Composition
//!
//! Turns a fragment containing component references into plain markup:
//! [`cache`] owns template loading, [`expand`] finds and renders references,
//! [`markers`] does the per-template substitutions.

pub mod cache;
pub mod expand;
pub mod html;
pub mod markers;

pub use cache::{ComponentCache, ComponentLoader, ComponentResolver, ConventionResolver};
pub use markers::AssetPaths;
