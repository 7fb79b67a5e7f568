//! Headless in-memory document.
//!
//! Keeps a history stack, a title, the mounted shell and the container's
//! markup, and records every side effect (executed scripts, dispatched
//! notifications, full reloads) so callers can inspect what a real browser
//! would have done.

use log::debug;

use crate::core::error::LoadError;
use crate::dom::{
    scan, ComponentNotification, ComponentRoot, Document, DomEvent, ElementRef, Location,
    ScriptElement, CONTAINER_ID,
};

#[derive(Debug)]
pub struct MemoryDocument {
    history: Vec<Location>,
    index: usize,
    title: String,
    body: String,
    container: Option<String>,
    executed_scripts: Vec<ScriptElement>,
    notifications: Vec<ComponentNotification>,
    reloads: Vec<Location>,
    container_writes: usize,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new(Location::root())
    }
}

impl MemoryDocument {
    pub fn new(location: Location) -> Self {
        Self {
            history: vec![location],
            index: 0,
            title: String::new(),
            body: String::new(),
            container: None,
            executed_scripts: Vec::new(),
            notifications: Vec::new(),
            reloads: Vec::new(),
            container_writes: 0,
        }
    }

    /// Starts at `href`, or `/` if it cannot be parsed.
    pub fn at(href: &str) -> Self {
        Self::new(Location::parse(href).unwrap_or_default())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn container_html(&self) -> Option<&str> {
        self.container.as_deref()
    }

    /// How many times the container has been overwritten.
    pub fn container_writes(&self) -> usize {
        self.container_writes
    }

    pub fn executed_scripts(&self) -> &[ScriptElement] {
        &self.executed_scripts
    }

    pub fn notifications(&self) -> &[ComponentNotification] {
        &self.notifications
    }

    pub fn reloads(&self) -> &[Location] {
        &self.reloads
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Browser back button. Returns the event to feed the runtime.
    pub fn back(&mut self) -> Option<DomEvent> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(DomEvent::PopState)
    }

    /// Browser forward button.
    pub fn forward(&mut self) -> Option<DomEvent> {
        if self.index + 1 >= self.history.len() {
            return None;
        }
        self.index += 1;
        Some(DomEvent::PopState)
    }

    /// Clicks the `data-action` element of an initialized component. Returns
    /// None if the component or action does not exist.
    pub fn click_action(&self, component_id: &str, action: &str) -> Option<DomEvent> {
        self.component_roots()
            .into_iter()
            .find(|root| root.id.as_deref() == Some(component_id))
            .filter(|root| root.actions.iter().any(|a| a == action))
            .map(|_| DomEvent::ActionClick {
                component_id: component_id.to_string(),
                action: action.to_string(),
            })
    }
}

impl Document for MemoryDocument {
    fn location(&self) -> Location {
        self.history[self.index].clone()
    }

    fn push_state(&mut self, location: &Location) {
        self.history.truncate(self.index + 1);
        self.history.push(location.clone());
        self.index = self.history.len() - 1;
    }

    fn replace_state(&mut self, location: &Location) {
        self.history[self.index] = location.clone();
    }

    fn assign(&mut self, location: &Location) {
        debug!("Full reload requested: {}", location);
        self.reloads.push(location.clone());
        self.push_state(location);
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn mount_shell(&mut self, html: &str) -> bool {
        self.body.push_str(html);
        if self.container.is_none() && scan::has_element_id(html, CONTAINER_ID) {
            self.container = Some(String::new());
        }
        self.container.is_some()
    }

    fn has_container(&self) -> bool {
        self.container.is_some()
    }

    fn set_container_html(&mut self, html: &str) -> Result<(), LoadError> {
        let container = self.container.as_mut().ok_or(LoadError::AppContainerMissing)?;
        container.clear();
        container.push_str(html);
        self.container_writes += 1;
        Ok(())
    }

    fn scripts(&self) -> Vec<ScriptElement> {
        let Some(html) = self.container.as_deref() else {
            return Vec::new();
        };
        scan::scripts(html)
            .into_iter()
            .map(|(attributes, text)| ScriptElement { attributes, text })
            .collect()
    }

    fn execute_script(&mut self, script: &ScriptElement) {
        self.executed_scripts.push(script.clone());
    }

    fn component_roots(&self) -> Vec<ComponentRoot> {
        let Some(html) = self.container.as_deref() else {
            return Vec::new();
        };
        scan::elements_with_attribute(html, "data-component")
            .into_iter()
            .enumerate()
            .map(|(n, span)| {
                let inner = &html[span.open_end..span.end];
                let actions = scan::elements_with_attribute(inner, "data-action")
                    .iter()
                    .filter_map(|el| el.attribute("data-action").map(str::to_string))
                    .collect();
                ComponentRoot {
                    element: ElementRef(n),
                    name: span.attribute("data-component").unwrap_or_default().to_string(),
                    id: span.attribute("data-component-id").map(str::to_string),
                    actions,
                }
            })
            .collect()
    }

    fn set_component_id(&mut self, element: ElementRef, id: &str) {
        let Some(html) = self.container.as_mut() else {
            return;
        };
        let roots = scan::elements_with_attribute(html, "data-component");
        if let Some(span) = roots.get(element.0) {
            let at = span.attribute_insert_point(html);
            html.insert_str(at, &format!(" data-component-id=\"{id}\""));
        }
    }

    fn dispatch(&mut self, notification: ComponentNotification) {
        debug!(
            "Dispatching {} on {} ({})",
            notification.event, notification.component_name, notification.component_id
        );
        self.notifications.push(notification);
    }
}
