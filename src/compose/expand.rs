//! # Component Expansion
//!
//! One pass over a fragment: every top-level `<Name .../>` or
//! `<Name ...>children</Name>` (Name starting with an uppercase letter) is
//! replaced by its rendered template. Expansion is shallow. Children are
//! copied verbatim and tags inside a component's own template are left as
//! they are; the result is not scanned again.
//!
//! All templates referenced by one fragment are loaded concurrently and
//! spliced back at their original positions once every load has settled.
//! A component that fails to load becomes an HTML comment; its siblings
//! render normally.

use futures::future::join_all;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::compose::cache::ComponentCache;
use crate::compose::html::is_standard_element;
use crate::compose::markers::{fill_children, parse_attributes, substitute_props};
use crate::core::error::LoadError;

static COMPONENT_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([A-Z][A-Za-z0-9_]*)([^>]*?)(\s*/>|>)").unwrap());

/// A component reference found in a fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentTag<'a> {
    pub name: &'a str,
    pub attributes: &'a str,
    /// None for the self-closing form.
    pub children: Option<&'a str>,
    pub start: usize,
    pub end: usize,
}

/// Finds component references left to right, without overlap. An opening
/// tag with no matching `</Name>` is not a reference.
pub fn find_component_tags(html: &str) -> Vec<ComponentTag<'_>> {
    let mut tags = Vec::new();
    let mut pos = 0;

    while let Some(caps) = COMPONENT_OPEN.captures_at(html, pos) {
        let (Some(open), Some(name), Some(attributes), Some(close)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            break;
        };

        if is_standard_element(name.as_str()) {
            pos = open.end();
            continue;
        }

        if close.as_str().ends_with("/>") {
            tags.push(ComponentTag {
                name: name.as_str(),
                attributes: attributes.as_str(),
                children: None,
                start: open.start(),
                end: open.end(),
            });
            pos = open.end();
            continue;
        }

        let closing_tag = format!("</{}>", name.as_str());
        match html[open.end()..].find(&closing_tag) {
            Some(offset) => {
                let content_end = open.end() + offset;
                let end = content_end + closing_tag.len();
                tags.push(ComponentTag {
                    name: name.as_str(),
                    attributes: attributes.as_str(),
                    children: Some(&html[open.end()..content_end]),
                    start: open.start(),
                    end,
                });
                pos = end;
            }
            None => pos = open.start() + 1,
        }
    }

    tags
}

/// Inline marker left where a component failed to load.
pub fn failure_placeholder(error: &LoadError) -> String {
    match error {
        LoadError::Component { name, source } => {
            format!("<!-- Component {name} failed to load: {source} -->")
        }
        other => format!("<!-- {other} -->"),
    }
}

impl ComponentCache {
    /// Expands every top-level component reference in `html`. Always
    /// resolves; failures are rendered inline.
    pub async fn expand(&self, html: &str) -> String {
        let tags = find_component_tags(html);
        if tags.is_empty() {
            return html.to_string();
        }

        debug!(
            "Found potential components: {:?}",
            tags.iter().map(|t| t.name).collect::<Vec<_>>()
        );

        let rendered = join_all(tags.iter().map(|tag| self.render_tag(tag))).await;

        let mut out = String::with_capacity(html.len());
        let mut last = 0;
        for (tag, replacement) in tags.iter().zip(rendered) {
            out.push_str(&html[last..tag.start]);
            out.push_str(&replacement);
            last = tag.end;
        }
        out.push_str(&html[last..]);
        out
    }

    /// env → props → children → asset paths → component paths.
    async fn render_tag(&self, tag: &ComponentTag<'_>) -> String {
        let template = match self.load(tag.name).await {
            Ok(template) => template,
            Err(e) => {
                warn!("Failed to load component {}: {}", tag.name, e);
                return failure_placeholder(&e);
            }
        };

        let props = parse_attributes(tag.attributes);
        debug!("Rendering {} with props {:?}", tag.name, props);

        let rendered = self.env.substitute(&template);
        let rendered = substitute_props(&rendered, &props);
        let rendered = fill_children(&rendered, tag.children.unwrap_or_default());
        let rendered = self.paths.rewrite_assets(&rendered);
        self.paths.rewrite_components(&rendered)
    }
}
