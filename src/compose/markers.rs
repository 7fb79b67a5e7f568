//! Marker substitution inside a single template.
//!
//! Applied in a fixed order by the expander: props, then the children
//! slot, then asset and component paths. Environment markers are handled by
//! [`EnvironmentStore::substitute`](crate::core::env::EnvironmentStore::substitute)
//! before any of these run.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::core::config::ResolvedConfig;

pub const CHILDREN_MARKER: &str = "{{children}}";

static PROP_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").unwrap());

/// Best effort, no escaping: `key="value"` or `key='value'`, values may not
/// contain either quote character.
static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z0-9_]+)=["']([^"']*)["']"#).unwrap());

pub fn parse_attributes(source: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(source)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Replaces `{{name}}` with the matching prop, or "" when absent. The
/// children slot is left for [`fill_children`].
pub fn substitute_props(template: &str, props: &HashMap<String, String>) -> String {
    PROP_MARKER
        .replace_all(template, |caps: &Captures| {
            if &caps[1] == "children" {
                return caps[0].to_string();
            }
            props.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

pub fn fill_children(template: &str, children: &str) -> String {
    template.replace(CHILDREN_MARKER, children)
}

/// Rewrites `@assets/` and `@components/` to fully-qualified paths.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPaths {
    assets: String,
    components: String,
}

impl AssetPaths {
    pub fn new(assets: impl Into<String>, components: impl Into<String>) -> Self {
        Self {
            assets: assets.into(),
            components: components.into(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.assets_prefix(), config.components_prefix())
    }

    pub fn rewrite_assets(&self, html: &str) -> String {
        html.replace("@assets/", &self.assets)
    }

    pub fn rewrite_components(&self, html: &str) -> String {
        html.replace("@components/", &self.components)
    }

    /// Assets first, then component paths.
    pub fn rewrite(&self, html: &str) -> String {
        self.rewrite_components(&self.rewrite_assets(html))
    }
}
