//! Export and import snapshots
//!
//! A page export is a flat, camelCase JSON snapshot: page identity and flags,
//! then each module's title-keyed values. An [`ExportEnvelope`] bundles the
//! pages and templates of a whole store.

use crate::component::Component;
use crate::module::{Module, ModuleValues};
use crate::page::{Metadata, Page};
use chrono::{DateTime, Utc};
use formkit_core::{ComponentType, ModuleId, PageId, Persistable, ValueKind};
use serde::{Deserialize, Serialize};

// ============================================================================
// Snapshots
// ============================================================================

/// Snapshot of one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageExport {
    pub id: PageId,
    pub title: String,
    pub is_template: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub modules: Vec<ModuleExport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Snapshot of one module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleExport {
    pub id: ModuleId,
    pub title: String,
    pub values: ModuleValues,
}

/// Everything a store exports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportEnvelope {
    pub pages: Vec<PageExport>,
    pub templates: Vec<PageExport>,
}

impl ExportEnvelope {
    /// Snapshot the given pages and templates
    pub fn new(pages: &[Page], templates: &[Page]) -> Self {
        Self {
            pages: pages.iter().map(Page::export).collect(),
            templates: templates.iter().map(Page::export).collect(),
        }
    }

    /// Total number of pages and templates
    pub fn len(&self) -> usize {
        self.pages.len() + self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Persistable for ExportEnvelope {
    fn file_extension() -> &'static str {
        crate::EXPORT_FILE_EXTENSION
    }
}

// ============================================================================
// Page conversions
// ============================================================================

impl Page {
    /// Flatten the page into an export snapshot
    pub fn export(&self) -> PageExport {
        for module in &self.modules {
            let collisions = module.duplicate_titles();
            if !collisions.is_empty() {
                tracing::warn!(
                    "Module '{}' in page '{}' has repeated titles {:?}; later values win in export",
                    module.title,
                    self.title,
                    collisions
                );
            }
        }

        PageExport {
            id: self.id,
            title: self.title.clone(),
            is_template: self.is_template,
            created_at: self.created_at,
            updated_at: self.updated_at,
            modules: self
                .modules
                .iter()
                .map(|m| ModuleExport {
                    id: m.id,
                    title: m.title.clone(),
                    values: m.values(),
                })
                .collect(),
            metadata: self.metadata.clone(),
        }
    }

    /// Rebuild a page from an export snapshot
    ///
    /// Page and module IDs are kept. Components get new IDs, a type inferred
    /// from their value and the default configuration for that type.
    pub fn from_export(export: &PageExport) -> Page {
        let modules = export
            .modules
            .iter()
            .enumerate()
            .map(|(order, m)| Module {
                id: m.id,
                title: m.title.clone(),
                components: m
                    .values
                    .iter()
                    .map(|(title, value)| {
                        Component::new(inferred_type(value.kind()), title.clone())
                            .with_value(value.clone())
                    })
                    .collect(),
                order,
            })
            .collect();

        Page {
            id: export.id,
            title: export.title.clone(),
            modules,
            is_template: export.is_template,
            created_at: export.created_at,
            updated_at: export.updated_at,
            metadata: export.metadata.clone(),
            is_dirty: false,
        }
    }
}

/// Component type able to hold a value of this kind
fn inferred_type(kind: ValueKind) -> ComponentType {
    match kind {
        ValueKind::String => ComponentType::Text,
        ValueKind::Int | ValueKind::Float => ComponentType::Number,
        ValueKind::Date => ComponentType::Date,
        ValueKind::Bool => ComponentType::Toggle,
    }
}

// ============================================================================
// Tests
// ============================================================================
