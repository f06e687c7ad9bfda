//! # formkit Store
//!
//! Persistence for the page tree.
//!
//! - **Arena**: Normalized page, module and component tables with cascading deletes
//! - **StorageBackend**: Where the arena is kept (`MemoryBackend`, `JsonFileBackend`)
//! - **DataManager**: Async store API; each write commits fully or not at all
//!

pub mod arena;
pub mod backend;
pub mod manager;

// Re-export commonly used items at crate root
pub use arena::Arena;
pub use backend::{JsonFileBackend, MemoryBackend, SCHEMA_VERSION, StorageBackend};
pub use manager::DataManager;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
