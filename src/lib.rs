//! Pagewright library exports for testing

pub mod compose;
pub mod core;
pub mod dom;
pub mod fetch;
pub mod render;
pub mod runtime;

#[cfg(test)]
pub mod test_support;

pub use runtime::Runtime;
