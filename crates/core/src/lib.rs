//! # formkit Core
//!
//! Core types, traits, and error handling for formkit.
//!
//! This crate provides the foundational building blocks used by the model
//! and store crates, including:
//!
//! - **Value**: `FieldValue`, the closed tagged union holding a component value
//! - **Types**: Identifiers, `ComponentType` and `ValidationCategory`
//! - **Traits**: Common behaviors like `Validatable` and `Persistable`
//! - **Config**: User `Settings` read from TOML
//! - **Errors**: Unified error handling with `FormError` and `FormResult`
//!

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
pub mod value;

// Re-export commonly used items at crate root
pub use config::{BackupFrequency, Settings, Theme};
pub use error::{FormError, FormResult, StorageError};
pub use traits::{Identifiable, Persistable, Timestamped, Validatable};
pub use types::{
    ComponentId, ComponentType, ConfigurationId, DEFAULT_PICKER_OPTION, ModuleId, PageId,
    ValidationCategory,
};
pub use value::{FieldValue, ValueKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
