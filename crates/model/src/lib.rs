//! # formkit Model
//!
//! The page tree a form is built from, plus the rules its values are checked
//! against.
//!
//! ## Core Concepts
//!
//! - **Page**: Top-level form document; may be flagged as a template
//! - **Module**: Named, ordered group of components within a page
//! - **Component**: Single typed input with a value and a configuration
//! - **ComponentConfiguration**: Presentation text and the ordered rule list
//! - **ValidationRule**: One predicate over a component value
//! - **PageExport**: Flat snapshot used for backup and import
//!

// Module declarations
pub mod component;
pub mod configuration;
pub mod defaults;
pub mod export;
pub mod module;
pub mod ordering;
pub mod page;
pub mod validation;

// Re-export commonly used types at crate root
pub use component::Component;
pub use configuration::{ComponentConfiguration, default_picker_options};
pub use defaults::{default_pages, default_templates};
pub use export::{ExportEnvelope, ModuleExport, PageExport};
pub use module::{Module, ModuleValues};
pub use ordering::move_items;
pub use page::{Metadata, Page, SOURCE_PAGE_ID_KEY, TEMPLATE_ID_KEY};
pub use validation::{CustomRule, ValidationRule};

// Re-export core types that are commonly used with the model
pub use formkit_core::{
    ComponentId, ComponentType, FieldValue, FormError, FormResult, ModuleId, PageId,
    ValidationCategory, ValueKind,
};

/// Export file extension
pub const EXPORT_FILE_EXTENSION: &str = "json";

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        // Tree
        Component,
        ComponentConfiguration,
        // Re-exported from core
        ComponentType,
        ExportEnvelope,
        FieldValue,
        FormError,
        FormResult,
        Module,
        Page,
        PageExport,
        ValidationRule,
    };
    pub use formkit_core::{Identifiable, Persistable, Timestamped, Validatable};
}
