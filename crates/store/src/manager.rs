//! Data manager
//!
//! The single entry point for persisted pages. All access goes through one
//! lock; every mutation is applied to a copy of the arena and only becomes
//! visible once the backend has persisted that copy.

use crate::arena::Arena;
use crate::backend::StorageBackend;
use formkit_core::{
    ComponentId, FieldValue, FormError, FormResult, PageId, Persistable, StorageError, Validatable,
};
use formkit_model::{Component, ExportEnvelope, Module, Page, default_pages, default_templates};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

// ============================================================================
// DataManager
// ============================================================================

/// Page store with all-or-nothing writes
pub struct DataManager {
    arena: Mutex<Arena>,
    backend: Arc<dyn StorageBackend>,
}

impl DataManager {
    /// Open the store, loading whatever the backend holds
    pub async fn open(backend: Arc<dyn StorageBackend>) -> FormResult<Self> {
        let arena = backend.load().await.map_err(|e| {
            error!("Failed to load store from {}: {}", backend.describe(), e);
            FormError::LoadFailed(e)
        })?;
        let arena = arena.unwrap_or_default();
        info!(
            "Opened store from {} ({} pages)",
            backend.describe(),
            arena.page_count()
        );

        Ok(Self {
            arena: Mutex::new(arena),
            backend,
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Non-template pages, most recently updated first
    pub async fn fetch_pages(&self) -> FormResult<Vec<Page>> {
        let arena = self.arena.lock().await;
        let mut pages: Vec<Page> = arena.pages().into_iter().filter(|p| !p.is_template).collect();
        pages.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        debug!("Fetched {} pages", pages.len());
        Ok(pages)
    }

    /// Templates ordered by title
    pub async fn fetch_templates(&self) -> FormResult<Vec<Page>> {
        let arena = self.arena.lock().await;
        let mut templates: Vec<Page> = arena.pages().into_iter().filter(|p| p.is_template).collect();
        templates.sort_by(|a, b| a.title.cmp(&b.title));
        debug!("Fetched {} templates", templates.len());
        Ok(templates)
    }

    /// A single page or template
    pub async fn fetch_page(&self, id: PageId) -> FormResult<Page> {
        self.arena
            .lock()
            .await
            .page(id)
            .ok_or_else(|| FormError::not_found(format!("page {}", id)))
    }

    /// A single component
    pub async fn fetch_component(&self, id: ComponentId) -> FormResult<Component> {
        self.arena
            .lock()
            .await
            .component(id)
            .cloned()
            .ok_or_else(|| FormError::not_found(format!("component {}", id)))
    }

    // ========================================================================
    // Pages
    // ========================================================================

    /// Insert or replace a page with its whole tree
    ///
    /// The page's dirty flag is cleared once it is stored.
    pub async fn save_page(&self, page: &mut Page) -> FormResult<()> {
        let snapshot = page.clone();
        self.commit("save page", FormError::SaveFailed, |arena| {
            arena.insert_page(&snapshot);
            Ok(())
        })
        .await?;
        page.mark_clean();
        info!("Saved page '{}'", page.title);
        Ok(())
    }

    /// Delete a page with its modules and components
    pub async fn delete_page(&self, id: PageId) -> FormResult<()> {
        self.commit("delete page", FormError::DeleteFailed, |arena| {
            if arena.remove_page(id) {
                Ok(())
            } else {
                Err(FormError::not_found(format!("page {}", id)))
            }
        })
        .await?;
        info!("Deleted page {}", id);
        Ok(())
    }

    /// Insert or replace one module of a stored page
    pub async fn save_module(&self, page_id: PageId, module: &Module) -> FormResult<()> {
        self.commit("save module", FormError::SaveFailed, |arena| {
            if arena.upsert_module(page_id, module) {
                Ok(())
            } else {
                Err(FormError::not_found(format!("page {}", page_id)))
            }
        })
        .await?;
        info!("Saved module '{}'", module.title);
        Ok(())
    }

    /// Set a stored component's value
    ///
    /// Returns the updated component with its validity recomputed.
    pub async fn update_component(
        &self,
        id: ComponentId,
        value: impl Into<FieldValue>,
    ) -> FormResult<Component> {
        let value = value.into();
        let updated = self
            .commit("update component", FormError::SaveFailed, |arena| {
                let component = arena
                    .component_mut(id)
                    .ok_or_else(|| FormError::not_found(format!("component {}", id)))?;
                component.set_value(value);
                let updated = component.clone();

                if let Some(page_id) = arena.page_of_component(id) {
                    arena.touch_page(page_id);
                }
                Ok(updated)
            })
            .await?;
        info!("Updated component '{}'", updated.title);
        Ok(updated)
    }

    /// Delete a single component
    pub async fn delete_component(&self, id: ComponentId) -> FormResult<()> {
        self.commit("delete component", FormError::DeleteFailed, |arena| {
            if arena.remove_component(id) {
                Ok(())
            } else {
                Err(FormError::not_found(format!("component {}", id)))
            }
        })
        .await?;
        info!("Deleted component {}", id);
        Ok(())
    }

    /// Delete every page, module and component
    pub async fn clear_all_data(&self) -> FormResult<()> {
        self.commit("clear all data", FormError::DeleteFailed, |arena| {
            arena.clear();
            Ok(())
        })
        .await?;
        info!("Cleared all data");
        Ok(())
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check every page and template
    ///
    /// Fails with one message per invalid page.
    pub async fn validate_all(&self) -> FormResult<()> {
        let pages = self.fetch_pages().await?;
        let templates = self.fetch_templates().await?;

        let errors: Vec<String> = pages
            .iter()
            .filter(|p| !p.is_valid())
            .map(|p| format!("Invalid page: {}", p.title))
            .chain(
                templates
                    .iter()
                    .filter(|t| !t.is_valid())
                    .map(|t| format!("Invalid template: {}", t.title)),
            )
            .collect();

        if errors.is_empty() {
            info!("Data validation successful");
            Ok(())
        } else {
            let err = FormError::ModelValidationFailed(errors);
            warn!("{}", err);
            Err(err)
        }
    }

    // ========================================================================
    // Templates
    // ========================================================================

    /// Instantiate and store a new page from a template
    pub async fn create_page_from_template(&self, template_id: PageId) -> FormResult<Page> {
        let template = self.fetch_template(template_id).await?;
        let mut page = template.create_page_from_template();
        self.save_page(&mut page).await?;
        info!("Created page from template '{}'", template.title);
        Ok(page)
    }

    /// Store a copy of a template titled `"<title> Copy"`
    pub async fn duplicate_template(&self, template_id: PageId) -> FormResult<Page> {
        let template = self.fetch_template(template_id).await?;
        let mut copy = template.create_template(Some(&format!("{} Copy", template.title)));
        self.save_page(&mut copy).await?;
        Ok(copy)
    }

    async fn fetch_template(&self, id: PageId) -> FormResult<Page> {
        let page = self.fetch_page(id).await?;
        if !page.is_template {
            return Err(FormError::invalid_data(format!(
                "page '{}' is not a template",
                page.title
            )));
        }
        Ok(page)
    }

    // ========================================================================
    // Export / import
    // ========================================================================

    /// Snapshot every page and template
    pub async fn export_data(&self) -> FormResult<ExportEnvelope> {
        let pages = self.fetch_pages().await?;
        let templates = self.fetch_templates().await?;
        let envelope = ExportEnvelope::new(&pages, &templates);
        info!("Exported {} pages and {} templates", pages.len(), templates.len());
        Ok(envelope)
    }

    /// Snapshot every page and template as JSON
    pub async fn export_json(&self) -> FormResult<String> {
        self.export_data().await?.to_json()
    }

    /// Replace all data with an export
    ///
    /// Templates are stored before pages. Nothing changes if persisting fails.
    pub async fn import_data(&self, envelope: &ExportEnvelope) -> FormResult<()> {
        self.commit("import data", FormError::SaveFailed, |arena| {
            arena.clear();
            for export in envelope.templates.iter().chain(&envelope.pages) {
                arena.insert_page(&Page::from_export(export));
            }
            Ok(())
        })
        .await?;
        info!(
            "Imported {} templates and {} pages",
            envelope.templates.len(),
            envelope.pages.len()
        );
        Ok(())
    }

    /// Replace all data with an export read from JSON
    pub async fn import_json(&self, json: &str) -> FormResult<()> {
        let envelope = ExportEnvelope::from_json(json)?;
        self.import_data(&envelope).await
    }

    /// Install the built-in templates and welcome page into an empty store
    ///
    /// Returns whether anything was added.
    pub async fn seed_defaults(&self) -> FormResult<bool> {
        if !self.arena.lock().await.is_empty() {
            debug!("Store already has data, skipping defaults");
            return Ok(false);
        }

        let seeded = self
            .commit("seed defaults", FormError::SaveFailed, |arena| {
                if !arena.is_empty() {
                    return Ok(false);
                }
                for page in default_templates().iter().chain(&default_pages()) {
                    arena.insert_page(page);
                }
                Ok(true)
            })
            .await?;
        if seeded {
            info!("Seeded default templates and pages");
        }
        Ok(seeded)
    }

    // ========================================================================
    // Commit
    // ========================================================================

    /// Apply a change to a copy of the arena and swap it in once persisted
    async fn commit<T>(
        &self,
        action: &str,
        wrap: fn(StorageError) -> FormError,
        change: impl FnOnce(&mut Arena) -> FormResult<T>,
    ) -> FormResult<T> {
        let mut arena = self.arena.lock().await;
        let mut draft = arena.clone();
        let out = change(&mut draft)?;

        if let Err(e) = self.backend.persist(&draft).await {
            error!("Failed to {} ({}): {}", action, self.backend.describe(), e);
            return Err(wrap(e));
        }
        *arena = draft;
        debug!("Committed {}", action);
        Ok(out)
    }
}
