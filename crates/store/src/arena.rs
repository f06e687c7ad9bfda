//! Normalized entity tables
//!
//! Pages, modules and components are stored flat, keyed by ID. Parents keep
//! ordered child-ID lists and children remember their parent, so deletes
//! cascade explicitly and any page can be reassembled into a [`Page`] tree.

use chrono::{DateTime, Utc};
use formkit_core::{ComponentId, ModuleId, PageId};
use formkit_model::{Component, Metadata, Module, Page};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Records
// ============================================================================

/// Stored page row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: PageId,
    pub title: String,
    pub is_template: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub metadata: Option<Metadata>,
    pub module_ids: Vec<ModuleId>,
}

/// Stored module row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub id: ModuleId,
    pub page_id: PageId,
    pub title: String,
    pub order: usize,
    pub component_ids: Vec<ComponentId>,
}

/// Stored component row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub module_id: ModuleId,
    pub component: Component,
}

// ============================================================================
// Arena
// ============================================================================

/// All persisted entities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pages: BTreeMap<PageId, PageRecord>,
    modules: BTreeMap<ModuleId, ModuleRecord>,
    components: BTreeMap<ComponentId, ComponentRecord>,
}

impl Arena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn contains_page(&self, id: PageId) -> bool {
        self.pages.contains_key(&id)
    }

    /// Assemble a page tree
    pub fn page(&self, id: PageId) -> Option<Page> {
        let record = self.pages.get(&id)?;
        let modules = record
            .module_ids
            .iter()
            .filter_map(|module_id| self.module(*module_id))
            .collect();

        Some(Page {
            id: record.id,
            title: record.title.clone(),
            modules,
            is_template: record.is_template,
            created_at: record.created_at,
            updated_at: record.updated_at,
            metadata: record.metadata.clone(),
            is_dirty: false,
        })
    }

    /// Assemble every page
    pub fn pages(&self) -> Vec<Page> {
        self.pages.keys().filter_map(|id| self.page(*id)).collect()
    }

    /// Assemble a module
    pub fn module(&self, id: ModuleId) -> Option<Module> {
        let record = self.modules.get(&id)?;
        Some(Module {
            id: record.id,
            title: record.title.clone(),
            components: record
                .component_ids
                .iter()
                .filter_map(|component_id| self.component(*component_id).cloned())
                .collect(),
            order: record.order,
        })
    }

    /// Look up a component
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id).map(|record| &record.component)
    }

    /// Page owning a module
    pub fn page_of_module(&self, id: ModuleId) -> Option<PageId> {
        self.modules.get(&id).map(|record| record.page_id)
    }

    /// Page owning a component
    pub fn page_of_component(&self, id: ComponentId) -> Option<PageId> {
        let module_id = self.components.get(&id)?.module_id;
        self.page_of_module(module_id)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Insert or replace a page and its whole subtree
    ///
    /// Modules and components the new tree no longer contains are removed.
    /// Rows the tree takes over from another page or module are unlinked there.
    pub fn insert_page(&mut self, page: &Page) {
        self.remove_page(page.id);
        for module in &page.modules {
            self.insert_module_rows(page.id, module);
        }
        self.pages.insert(
            page.id,
            PageRecord {
                id: page.id,
                title: page.title.clone(),
                is_template: page.is_template,
                created_at: page.created_at,
                updated_at: page.updated_at,
                metadata: page.metadata.clone(),
                module_ids: page.modules.iter().map(|m| m.id).collect(),
            },
        );
    }

    /// Insert or replace a module inside an existing page
    ///
    /// A replaced module keeps its position and a new one is appended.
    /// Components taken from another module leave that module.
    /// Returns `false` when the page is unknown.
    pub fn upsert_module(&mut self, page_id: PageId, module: &Module) -> bool {
        if !self.pages.contains_key(&page_id) {
            return false;
        }

        match self.page_of_module(module.id) {
            Some(owner) if owner == page_id => self.drop_module_rows(module.id),
            // Moved from another page
            Some(_) => {
                self.remove_module(module.id);
            }
            None => {}
        }
        self.insert_module_rows(page_id, module);

        if let Some(page) = self.pages.get_mut(&page_id) {
            if !page.module_ids.contains(&module.id) {
                page.module_ids.push(module.id);
            }
        }
        self.renumber_modules(page_id);
        self.touch_page(page_id);
        true
    }

    /// Mutable access to a stored component
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(&id).map(|record| &mut record.component)
    }

    /// Refresh a page's modification time
    pub fn touch_page(&mut self, id: PageId) {
        if let Some(page) = self.pages.get_mut(&id) {
            page.updated_at = Utc::now();
        }
    }

    // ========================================================================
    // Cascading deletes
    // ========================================================================

    /// Remove a page with all of its modules and components
    pub fn remove_page(&mut self, id: PageId) -> bool {
        let Some(record) = self.pages.remove(&id) else {
            return false;
        };
        for module_id in record.module_ids {
            self.drop_module_rows(module_id);
        }
        true
    }

    /// Remove a module with all of its components
    pub fn remove_module(&mut self, id: ModuleId) -> bool {
        let Some(page_id) = self.page_of_module(id) else {
            return false;
        };
        self.drop_module_rows(id);
        if let Some(page) = self.pages.get_mut(&page_id) {
            page.module_ids.retain(|module_id| *module_id != id);
        }
        self.renumber_modules(page_id);
        self.touch_page(page_id);
        true
    }

    /// Remove a single component
    pub fn remove_component(&mut self, id: ComponentId) -> bool {
        let Some(record) = self.components.remove(&id) else {
            return false;
        };
        if let Some(module) = self.modules.get_mut(&record.module_id) {
            module.component_ids.retain(|component_id| *component_id != id);
        }
        if let Some(page_id) = self.page_of_module(record.module_id) {
            self.touch_page(page_id);
        }
        true
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.pages.clear();
        self.modules.clear();
        self.components.clear();
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn insert_module_rows(&mut self, page_id: PageId, module: &Module) {
        self.detach_from_previous_owners(page_id, module);
        for component in &module.components {
            self.components.insert(
                component.id,
                ComponentRecord {
                    module_id: module.id,
                    component: component.clone(),
                },
            );
        }
        self.modules.insert(
            module.id,
            ModuleRecord {
                id: module.id,
                page_id,
                title: module.title.clone(),
                order: module.order,
                component_ids: module.components.iter().map(|c| c.id).collect(),
            },
        );
    }

    /// Unlink a module and its components from any other page or module
    /// still listing them, so every row has exactly one owner
    fn detach_from_previous_owners(&mut self, page_id: PageId, module: &Module) {
        let previous_page = self
            .page_of_module(module.id)
            .filter(|owner| *owner != page_id);
        if let Some(owner) = previous_page {
            if let Some(page) = self.pages.get_mut(&owner) {
                page.module_ids.retain(|module_id| *module_id != module.id);
            }
            self.renumber_modules(owner);
            self.touch_page(owner);
        }

        for component in &module.components {
            let previous_module = self
                .components
                .get(&component.id)
                .map(|record| record.module_id)
                .filter(|owner| *owner != module.id);
            let Some(owner) = previous_module else {
                continue;
            };
            if let Some(record) = self.modules.get_mut(&owner) {
                record.component_ids.retain(|component_id| *component_id != component.id);
            }
            if let Some(page) = self.page_of_module(owner) {
                self.touch_page(page);
            }
        }
    }

    fn drop_module_rows(&mut self, id: ModuleId) {
        if let Some(module) = self.modules.remove(&id) {
            for component_id in module.component_ids {
                self.components.remove(&component_id);
            }
        }
    }

    fn renumber_modules(&mut self, page_id: PageId) {
        let Some(page) = self.pages.get(&page_id) else {
            return;
        };
        for (order, module_id) in page.module_ids.iter().enumerate() {
            if let Some(module) = self.modules.get_mut(module_id) {
                module.order = order;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use formkit_core::ComponentType;
    use pretty_assertions::assert_eq;

    fn page() -> Page {
        Page::new("Intake")
            .with_module(
                Module::new("Person")
                    .with_component(Component::new(ComponentType::Text, "Name").with_value("Ada"))
                    .with_component(Component::new(ComponentType::Number, "Age").with_value(36)),
            )
            .with_module(
                Module::new("Extras")
                    .with_component(Component::new(ComponentType::Toggle, "Newsletter")),
            )
    }

    #[test]
    fn test_insert_and_assemble() {
        let page = page();
        let mut arena = Arena::new();
        arena.insert_page(&page);

        assert_eq!(arena.page_count(), 1);
        assert_eq!(arena.module_count(), 2);
        assert_eq!(arena.component_count(), 3);
        assert_eq!(arena.page(page.id).unwrap(), page);
    }

    #[test]
    fn test_reinsert_drops_stale_rows() {
        let mut page = page();
        let mut arena = Arena::new();
        arena.insert_page(&page);

        let extras = page.modules[1].id;
        page.remove_module(extras);
        arena.insert_page(&page);

        assert_eq!(arena.module_count(), 1);
        assert_eq!(arena.component_count(), 2);
        assert!(arena.module(extras).is_none());
    }

    #[test]
    fn test_remove_page_cascades() {
        let page = page();
        let mut arena = Arena::new();
        arena.insert_page(&page);

        assert!(arena.remove_page(page.id));
        assert!(arena.is_empty());
        assert_eq!(arena.module_count(), 0);
        assert_eq!(arena.component_count(), 0);
        assert!(!arena.remove_page(page.id));
    }

    #[test]
    fn test_remove_module_cascades_and_renumbers() {
        let page = page();
        let mut arena = Arena::new();
        arena.insert_page(&page);

        assert!(arena.remove_module(page.modules[0].id));
        assert_eq!(arena.component_count(), 1);

        let stored = arena.page(page.id).unwrap();
        assert_eq!(stored.modules.len(), 1);
        assert_eq!(stored.modules[0].title, "Extras");
        assert_eq!(stored.modules[0].order, 0);
    }

    #[test]
    fn test_remove_component() {
        let page = page();
        let name = page.modules[0].components[0].id;
        let mut arena = Arena::new();
        arena.insert_page(&page);

        assert_eq!(arena.page_of_component(name), Some(page.id));
        assert!(arena.remove_component(name));
        assert!(arena.component(name).is_none());
        assert_eq!(arena.module(page.modules[0].id).unwrap().components.len(), 1);
        assert!(!arena.remove_component(name));
    }

    #[test]
    fn test_upsert_module() {
        let page = page();
        let mut arena = Arena::new();
        arena.insert_page(&page);

        let mut person = page.modules[0].clone();
        person.title = "Applicant".to_string();
        assert!(arena.upsert_module(page.id, &person));

        let added = Module::new("Notes");
        assert!(arena.upsert_module(page.id, &added));

        let stored = arena.page(page.id).unwrap();
        let titles: Vec<&str> = stored.modules.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Applicant", "Extras", "Notes"]);
        assert_eq!(stored.modules.iter().map(|m| m.order).collect::<Vec<_>>(), vec![0, 1, 2]);

        assert!(!arena.upsert_module(uuid::Uuid::new_v4(), &added));
    }

    #[test]
    fn test_component_moved_between_modules() {
        let mut page = page();
        let mut arena = Arena::new();
        arena.insert_page(&page);

        let newsletter = page.modules[1].components[0].id;
        let moved = page.modules[1].remove_component(newsletter).unwrap();
        page.modules[0].add_component(moved);
        assert!(arena.upsert_module(page.id, &page.modules[0]));

        let stored = arena.page(page.id).unwrap();
        let counts: Vec<(&str, usize)> = stored
            .modules
            .iter()
            .map(|m| (m.title.as_str(), m.components.len()))
            .collect();
        assert_eq!(counts, vec![("Person", 3), ("Extras", 0)]);
        assert_eq!(arena.component_count(), 3);

        // Deleting the old owner leaves the moved component alone
        assert!(arena.remove_module(page.modules[1].id));
        assert!(arena.component(newsletter).is_some());
        assert_eq!(arena.page(page.id).unwrap().component_count(), 3);
    }

    #[test]
    fn test_module_saved_under_another_page() {
        let first = page();
        let mut second = Page::new("Follow up");
        second.add_module(first.modules[1].clone());

        let mut arena = Arena::new();
        arena.insert_page(&first);
        arena.insert_page(&second);

        let first_stored = arena.page(first.id).unwrap();
        assert_eq!(first_stored.modules.len(), 1);
        assert_eq!(first_stored.modules[0].title, "Person");
        assert_eq!(first_stored.modules[0].order, 0);
        assert_eq!(arena.page_of_module(first.modules[1].id), Some(second.id));

        assert!(arena.remove_page(second.id));
        let first_stored = arena.page(first.id).unwrap();
        assert_eq!(first_stored.modules.len(), 1);
        assert_eq!(first_stored.component_count(), 2);
        assert_eq!(arena.module_count(), 1);
        assert_eq!(arena.component_count(), 2);
    }

    #[test]
    fn test_upsert_moves_module_from_other_page() {
        let first = page();
        let second = Page::new("Follow up");
        let mut arena = Arena::new();
        arena.insert_page(&first);
        arena.insert_page(&second);

        let person = first.modules[0].clone();
        assert!(arena.upsert_module(second.id, &person));

        let titles: Vec<String> = arena
            .page(first.id)
            .unwrap()
            .modules
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["Extras".to_string()]);
        assert_eq!(arena.page(second.id).unwrap().component_count(), 2);
        assert_eq!(arena.component_count(), 3);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut arena = Arena::new();
        arena.insert_page(&page());

        let json = serde_json::to_string(&arena).unwrap();
        let back: Arena = serde_json::from_str(&json).unwrap();
        assert_eq!(back, arena);
    }
}
