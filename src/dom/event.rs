use std::collections::HashMap;

use serde::Serialize;

/// Input events the document reports to the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    /// History back/forward. The document location has already changed.
    PopState,
    /// A click that landed on (or inside) an `<a>` element.
    LinkClick(Link),
    /// A click on a `data-action` element inside an initialized component.
    ActionClick { component_id: String, action: String },
}

/// What the document should do with the event's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Let the default browser behaviour happen.
    Default,
    /// The runtime handled the event; suppress the default.
    Prevented,
}

/// The parts of an anchor element that decide whether a click is routed
/// in-app or left to the browser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    pub href: Option<String>,
    pub target: Option<String>,
    pub download: bool,
    /// `data-external`
    pub external: bool,
    /// `data-reload`
    pub reload: bool,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Default::default()
        }
    }

    /// Builds a link from an anchor's attribute map.
    pub fn from_attributes(attributes: &HashMap<String, String>) -> Self {
        Self {
            href: attributes.get("href").cloned(),
            target: attributes.get("target").cloned(),
            download: attributes.contains_key("download"),
            external: attributes.contains_key("data-external"),
            reload: attributes.contains_key("data-reload"),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_download(mut self) -> Self {
        self.download = true;
        self
    }

    pub fn with_external(mut self) -> Self {
        self.external = true;
        self
    }

    pub fn with_reload(mut self) -> Self {
        self.reload = true;
        self
    }
}

/// A `<script>` element as found in the rendered container.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptElement {
    pub attributes: Vec<(String, String)>,
    pub text: String,
}

impl ScriptElement {
    pub fn src(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == "src")
            .map(|(_, value)| value.as_str())
    }
}

/// Handle to an element in the current container. Only valid until the
/// container is next overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(pub usize);

/// An element carrying `data-component`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRoot {
    pub element: ElementRef,
    pub name: String,
    pub id: Option<String>,
    /// `data-action` values found inside the element, in document order.
    pub actions: Vec<String>,
}

/// Custom event emitted when a component action is clicked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentNotification {
    /// `component-<action>`
    pub event: String,
    pub component_name: String,
    pub component_id: String,
    pub state: serde_json::Map<String, serde_json::Value>,
}
