//! # Document Adapter
//!
//! The only place the pipeline touches the visible page. The runtime never
//! reaches into a concrete document; it drives everything through the
//! [`Document`] trait, so a browser binding and the headless
//! [`MemoryDocument`] are interchangeable.
//!
//! ```text
//!   Runtime ──► Document ──► history / title / container / scripts
//!      ▲                               │
//!      └──────────── DomEvent ◄────────┘   (clicks, back/forward)
//! ```

pub mod event;
pub mod location;
pub mod memory;
pub mod scan;

pub use event::{
    ComponentNotification, ComponentRoot, Disposition, DomEvent, ElementRef, Link, ScriptElement,
};
pub use location::Location;
pub use memory::MemoryDocument;

use crate::core::error::LoadError;

/// Id of the element the app shell must provide for page content.
pub const CONTAINER_ID: &str = "app-content";

/// Abstract document capabilities the runtime relies on.
pub trait Document {
    /// Current location (what `window.location` reports).
    fn location(&self) -> Location;

    /// Adds a history entry without loading anything.
    fn push_state(&mut self, location: &Location);

    /// Replaces the current history entry without loading anything.
    fn replace_state(&mut self, location: &Location);

    /// Full navigation to `location` (page reload).
    fn assign(&mut self, location: &Location);

    fn set_title(&mut self, title: &str);

    /// Appends the app shell to the body. Returns whether the shell provided
    /// the render container.
    fn mount_shell(&mut self, html: &str) -> bool;

    fn has_container(&self) -> bool;

    /// Replaces the container's contents.
    fn set_container_html(&mut self, html: &str) -> Result<(), LoadError>;

    /// Script elements currently inside the container, in document order.
    fn scripts(&self) -> Vec<ScriptElement>;

    /// Recreates `script` so it executes in the current document.
    fn execute_script(&mut self, script: &ScriptElement);

    /// Elements inside the container marked with `data-component`.
    fn component_roots(&self) -> Vec<ComponentRoot>;

    /// Stamps `data-component-id` onto a component root.
    fn set_component_id(&mut self, element: ElementRef, id: &str);

    /// Dispatches a custom event on the component's root element.
    fn dispatch(&mut self, notification: ComponentNotification);
}
