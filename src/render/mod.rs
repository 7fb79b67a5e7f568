//! # Rendering
//!
//! [`page`] builds markup off to the side; [`commit`] is the only step that
//! writes it into the document.

pub mod instances;
pub mod page;

pub use instances::{ComponentInstance, InstanceRegistry};
pub use page::{PageRenderer, RenderOutcome, RenderStatus, NOT_FOUND_FALLBACK};

use log::debug;

use crate::core::error::LoadError;
use crate::dom::Document;

/// Swaps `html` into the container, re-executes its scripts, then
/// initializes component instances. Returns the number of instances.
pub fn commit<D: Document + ?Sized>(
    document: &mut D,
    instances: &mut InstanceRegistry,
    html: &str,
) -> Result<usize, LoadError> {
    document.set_container_html(html)?;

    let scripts = document.scripts();
    debug!("Re-executing {} script(s)", scripts.len());
    for script in &scripts {
        document.execute_script(script);
    }

    Ok(instances.initialize(document))
}
