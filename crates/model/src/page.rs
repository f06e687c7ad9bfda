//! Page definitions
//!
//! A `Page` is the top-level form document. It owns its modules, tracks when
//! it was last changed, and can act as a template other pages are created from.

use crate::component::Component;
use crate::module::{Module, ModuleValues};
use crate::ordering::{move_items, remove_by_id};
use chrono::{DateTime, Utc};
use formkit_core::{
    ComponentId, FieldValue, Identifiable, ModuleId, PageId, Timestamped, Validatable,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Metadata key pointing from a template to the page it was made from
pub const SOURCE_PAGE_ID_KEY: &str = "sourcePageId";

/// Metadata key pointing from a page to the template it was made from
pub const TEMPLATE_ID_KEY: &str = "templateId";

/// Free-form page metadata
pub type Metadata = BTreeMap<String, FieldValue>;

// ============================================================================
// Page
// ============================================================================

/// A form document made of ordered modules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Unique identifier for this page
    pub id: PageId,

    /// Page title
    pub title: String,

    /// Modules in display order
    pub modules: Vec<Module>,

    /// Whether this page is a reusable blueprint
    pub is_template: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,

    /// Optional metadata such as template back-references
    pub metadata: Option<Metadata>,

    /// Changed since it was last saved
    #[serde(skip)]
    pub is_dirty: bool,
}

impl Page {
    /// Create an empty page
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            modules: Vec::new(),
            is_template: false,
            created_at: now,
            updated_at: now,
            metadata: None,
            is_dirty: false,
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Add a module using builder pattern
    pub fn with_module(mut self, module: Module) -> Self {
        self.push_module(module);
        self
    }

    /// Mark the page as a template
    pub fn as_template(mut self) -> Self {
        self.is_template = true;
        self
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }

    // ========================================================================
    // Module management
    // ========================================================================

    /// Append a module
    pub fn add_module(&mut self, module: Module) {
        tracing::debug!("Adding module '{}' to page '{}'", module.title, self.title);
        self.push_module(module);
        self.mark_changed();
    }

    /// Remove a module by ID
    pub fn remove_module(&mut self, module_id: ModuleId) -> Option<Module> {
        let removed = remove_by_id(&mut self.modules, module_id)?;
        self.renumber_modules();
        self.mark_changed();
        Some(removed)
    }

    /// Move the modules at `sources` to start at `destination`
    pub fn move_modules(&mut self, sources: &[usize], destination: usize) {
        move_items(&mut self.modules, sources, destination);
        self.renumber_modules();
        self.mark_changed();
    }

    /// Get a module by ID
    pub fn get_module(&self, module_id: ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    /// Get a mutable module by ID; the page counts as changed
    pub fn get_module_mut(&mut self, module_id: ModuleId) -> Option<&mut Module> {
        let index = self.modules.iter().position(|m| m.id == module_id)?;
        self.mark_changed();
        self.modules.get_mut(index)
    }

    /// Find a component anywhere in the page
    pub fn find_component(&self, component_id: ComponentId) -> Option<&Component> {
        self.modules
            .iter()
            .find_map(|m| m.get_component(component_id))
    }

    /// Find a mutable component anywhere in the page; the page counts as changed
    pub fn find_component_mut(&mut self, component_id: ComponentId) -> Option<&mut Component> {
        let index = self
            .modules
            .iter()
            .position(|m| m.get_component(component_id).is_some())?;
        self.mark_changed();
        self.modules[index].get_component_mut(component_id)
    }

    /// Module owning the given component
    pub fn module_of(&self, component_id: ComponentId) -> Option<&Module> {
        self.modules
            .iter()
            .find(|m| m.get_component(component_id).is_some())
    }

    /// Total number of components
    pub fn component_count(&self) -> usize {
        self.modules.iter().map(Module::component_count).sum()
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// Values of every module keyed by module title
    pub fn all_values(&self) -> BTreeMap<String, ModuleValues> {
        self.modules
            .iter()
            .map(|m| (m.title.clone(), m.values()))
            .collect()
    }

    /// Reset every component to its type's default value
    pub fn reset_to_defaults(&mut self) {
        for module in &mut self.modules {
            module.reset_to_defaults();
        }
        self.mark_changed();
    }

    /// Look up a metadata entry
    pub fn metadata_value(&self, key: &str) -> Option<&FieldValue> {
        self.metadata.as_ref()?.get(key)
    }

    /// Page this template was created from
    pub fn source_page_id(&self) -> Option<PageId> {
        self.metadata_id(SOURCE_PAGE_ID_KEY)
    }

    /// Template this page was created from
    pub fn template_id(&self) -> Option<PageId> {
        self.metadata_id(TEMPLATE_ID_KEY)
    }

    fn metadata_id(&self, key: &str) -> Option<PageId> {
        let raw = self.metadata_value(key)?.as_str()?;
        Uuid::parse_str(raw).ok()
    }

    // ========================================================================
    // Templates
    // ========================================================================

    /// Copy the page into a template
    ///
    /// Every module and component gets a new ID and default values; the
    /// source page is recorded under `sourcePageId`. The title defaults to
    /// `"<title> Template"`.
    pub fn create_template(&self, title: Option<&str>) -> Page {
        let title = title.map_or_else(|| format!("{} Template", self.title), str::to_string);
        self.blank_copy(title)
            .as_template()
            .with_metadata(SOURCE_PAGE_ID_KEY, self.id.to_string())
    }

    /// Instantiate a fresh page from this template
    ///
    /// The new page keeps the title and structure, holds default values and
    /// records the template under `templateId`.
    pub fn create_page_from_template(&self) -> Page {
        self.blank_copy(self.title.clone())
            .with_metadata(TEMPLATE_ID_KEY, self.id.to_string())
    }

    fn blank_copy(&self, title: String) -> Page {
        let mut page = Page::new(title);
        page.modules = self
            .modules
            .iter()
            .map(|m| m.create_template(Some(&m.title)))
            .collect();
        page.renumber_modules();
        page
    }

    // ========================================================================
    // Change tracking
    // ========================================================================

    /// Clear the dirty flag after a successful save
    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    fn mark_changed(&mut self) {
        self.is_dirty = true;
        self.touch();
    }

    fn push_module(&mut self, mut module: Module) {
        module.order = self.modules.len();
        self.modules.push(module);
    }

    fn renumber_modules(&mut self) {
        for (i, module) in self.modules.iter_mut().enumerate() {
            module.order = i;
        }
    }
}

impl Identifiable for Page {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Timestamped for Page {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Validatable for Page {
    fn is_valid(&self) -> bool {
        self.modules.iter().all(Module::is_valid)
    }

    fn validation_errors(&self) -> Vec<String> {
        self.modules
            .iter()
            .flat_map(|m| m.validation_errors())
            .map(|e| format!("{}: {}", self.title, e))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
