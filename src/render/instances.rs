//! # Component Instances
//!
//! After each swap the container is scanned for `data-component` roots.
//! Each root gets a fresh `data-component-id` and a record holding an
//! opaque state bag. Clicking one of the root's `data-action` elements
//! dispatches `component-<action>` with that state.
//!
//! Records from the previous page are dropped when the next page is
//! committed. There are no teardown hooks; instances are simply abandoned
//! with the markup they belonged to.

use std::collections::HashMap;

use log::debug;
use serde_json::{Map, Value};

use crate::dom::{ComponentNotification, Document, ElementRef};

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentInstance {
    pub id: String,
    pub name: String,
    pub element: ElementRef,
    pub actions: Vec<String>,
    pub state: Map<String, Value>,
}

/// Generates an opaque, unique instance id.
pub fn new_instance_id() -> String {
    format!("comp_{}", uuid::Uuid::new_v4().simple())
}

#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: HashMap<String, ComponentInstance>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all records with the roots found in the current container.
    /// Returns how many instances were created.
    pub fn initialize<D: Document + ?Sized>(&mut self, document: &mut D) -> usize {
        self.instances.clear();

        let roots = document.component_roots();
        debug!("Found {} component instance(s) to initialize", roots.len());

        for root in roots {
            let id = new_instance_id();
            document.set_component_id(root.element, &id);
            self.instances.insert(
                id.clone(),
                ComponentInstance {
                    id,
                    name: root.name,
                    element: root.element,
                    actions: root.actions,
                    state: Map::new(),
                },
            );
        }

        self.instances.len()
    }

    pub fn get(&self, id: &str) -> Option<&ComponentInstance> {
        self.instances.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ComponentInstance> {
        self.instances.get_mut(id)
    }

    /// Instances of the named component, in document order.
    pub fn by_name(&self, name: &str) -> Vec<&ComponentInstance> {
        let mut found: Vec<_> = self.instances.values().filter(|i| i.name == name).collect();
        found.sort_by_key(|i| i.element.0);
        found
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Dispatches `component-<action>` for a click inside instance `id`.
    /// Returns false if the instance is unknown or has no such action.
    pub fn dispatch_action<D: Document + ?Sized>(
        &self,
        document: &mut D,
        id: &str,
        action: &str,
    ) -> bool {
        let Some(instance) = self.instances.get(id) else {
            debug!("Action {} for unknown component instance {}", action, id);
            return false;
        };
        if !instance.actions.iter().any(|a| a == action) {
            return false;
        }

        debug!("Component action triggered: {}.{}", instance.name, action);
        document.dispatch(ComponentNotification {
            event: format!("component-{action}"),
            component_name: instance.name.clone(),
            component_id: instance.id.clone(),
            state: instance.state.clone(),
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    fn document_with(html: &str) -> MemoryDocument {
        let mut doc = MemoryDocument::default();
        doc.mount_shell(r#"<div id="app-content"></div>"#);
        doc.set_container_html(html).unwrap();
        doc
    }

    #[test]
    fn test_instance_ids_are_unique() {
        let a = new_instance_id();
        let b = new_instance_id();
        assert!(a.starts_with("comp_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_initialize_stamps_ids() {
        let mut doc = document_with(
            r#"<div data-component="Counter"><button data-action="inc">+</button></div><div data-component="Counter"></div>"#,
        );
        let mut registry = InstanceRegistry::new();
        assert_eq!(registry.initialize(&mut doc), 2);

        let counters = registry.by_name("Counter");
        assert_eq!(counters.len(), 2);
        assert_eq!(counters[0].actions, vec!["inc".to_string()]);

        let stamped: Vec<_> = doc
            .component_roots()
            .into_iter()
            .filter_map(|r| r.id)
            .collect();
        assert_eq!(stamped, vec![counters[0].id.clone(), counters[1].id.clone()]);
    }

    #[test]
    fn test_initialize_drops_previous_instances() {
        let mut doc = document_with(r#"<div data-component="A"></div>"#);
        let mut registry = InstanceRegistry::new();
        registry.initialize(&mut doc);
        let old_id = registry.by_name("A")[0].id.clone();

        doc.set_container_html("<p>no components</p>").unwrap();
        assert_eq!(registry.initialize(&mut doc), 0);
        assert!(registry.get(&old_id).is_none());
    }

    #[test]
    fn test_dispatch_action_carries_state() {
        let mut doc = document_with(
            r#"<div data-component="Cart"><button data-action="checkout">Go</button></div>"#,
        );
        let mut registry = InstanceRegistry::new();
        registry.initialize(&mut doc);
        let id = registry.by_name("Cart")[0].id.clone();
        registry
            .get_mut(&id)
            .unwrap()
            .state
            .insert("items".to_string(), Value::from(3));

        assert!(registry.dispatch_action(&mut doc, &id, "checkout"));
        assert!(!registry.dispatch_action(&mut doc, &id, "refund"));
        assert!(!registry.dispatch_action(&mut doc, "comp_unknown", "checkout"));

        let sent = doc.notifications();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].event, "component-checkout");
        assert_eq!(sent[0].component_name, "Cart");
        assert_eq!(sent[0].state.get("items"), Some(&Value::from(3)));
    }
}
