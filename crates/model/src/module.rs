//! Module definitions
//!
//! A `Module` is a titled, ordered group of components inside a page.

use crate::component::Component;
use crate::ordering::{move_items, remove_by_id};
use formkit_core::{ComponentId, FieldValue, Identifiable, ModuleId, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Module values keyed by component title
pub type ModuleValues = BTreeMap<String, FieldValue>;

// ============================================================================
// Module
// ============================================================================

/// A named group of components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Unique identifier for this module
    pub id: ModuleId,

    /// Module title, also the key in page-wide values
    pub title: String,

    /// Components in display order
    pub components: Vec<Component>,

    /// Position within the owning page
    pub order: usize,
}

impl Module {
    /// Create an empty module
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            components: Vec::new(),
            order: 0,
        }
    }

    /// Add a component using builder pattern
    pub fn with_component(mut self, component: Component) -> Self {
        self.add_component(component);
        self
    }

    /// Set the position within the page
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    // ========================================================================
    // Component management
    // ========================================================================

    /// Append a component
    pub fn add_component(&mut self, component: Component) {
        tracing::debug!("Adding component '{}' to module '{}'", component.title, self.title);
        self.components.push(component);
    }

    /// Remove a component by ID
    pub fn remove_component(&mut self, component_id: ComponentId) -> Option<Component> {
        remove_by_id(&mut self.components, component_id)
    }

    /// Move the components at `sources` to start at `destination`
    pub fn move_components(&mut self, sources: &[usize], destination: usize) {
        move_items(&mut self.components, sources, destination);
    }

    /// Append a copy of a component and return the copy's ID
    pub fn duplicate_component(&mut self, component_id: ComponentId) -> Option<ComponentId> {
        let copy = self.get_component(component_id)?.duplicate();
        let id = copy.id;
        self.components.push(copy);
        Some(id)
    }

    /// Get a component by ID
    pub fn get_component(&self, component_id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == component_id)
    }

    /// Get a mutable component by ID
    pub fn get_component_mut(&mut self, component_id: ComponentId) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == component_id)
    }

    /// Get a component by title
    pub fn get_component_by_title(&self, title: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.title == title)
    }

    /// Number of components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// Current values keyed by component title
    ///
    /// Components sharing a title collide and the later one wins.
    pub fn values(&self) -> ModuleValues {
        self.components
            .iter()
            .map(|c| (c.title.clone(), c.value().clone()))
            .collect()
    }

    /// Titles used by more than one component
    pub fn duplicate_titles(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut repeated = BTreeSet::new();
        for component in &self.components {
            if !seen.insert(component.title.as_str()) {
                repeated.insert(component.title.clone());
            }
        }
        repeated.into_iter().collect()
    }

    /// Reset every component to its type's default value
    pub fn reset_to_defaults(&mut self) {
        for component in &mut self.components {
            component.reset_to_default();
        }
    }

    /// Copy with new IDs and default values
    ///
    /// Configurations stay shared with this module's components. The title
    /// defaults to `"<title> Template"`.
    pub fn create_template(&self, title: Option<&str>) -> Module {
        Module {
            id: Uuid::new_v4(),
            title: title.map_or_else(|| format!("{} Template", self.title), str::to_string),
            components: self.components.iter().map(Component::blank_copy).collect(),
            order: self.order,
        }
    }
}

impl Identifiable for Module {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validatable for Module {
    fn is_valid(&self) -> bool {
        self.components.iter().all(Component::is_valid)
    }

    fn validation_errors(&self) -> Vec<String> {
        self.components
            .iter()
            .flat_map(|c| c.validation_errors())
            .map(|e| format!("{} / {}", self.title, e))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
