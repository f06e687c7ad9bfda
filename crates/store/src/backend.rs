//! Storage backends
//!
//! A backend persists the whole [`Arena`] as one unit: a write either lands
//! completely or fails and leaves the previous state in place.

use crate::arena::Arena;
use async_trait::async_trait;
use formkit_core::StorageError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Current schema version for store files
pub const SCHEMA_VERSION: u32 = 1;

// ============================================================================
// StorageBackend
// ============================================================================

/// Where the arena lives between runs
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the last persisted arena, `None` when nothing was stored yet
    async fn load(&self) -> Result<Option<Arena>, StorageError>;

    /// Persist the arena, replacing what was stored before
    async fn persist(&self, arena: &Arena) -> Result<(), StorageError>;

    /// Short description for logs
    fn describe(&self) -> String;
}

// ============================================================================
// MemoryBackend
// ============================================================================

/// Keeps the arena in memory
///
/// Writes can be switched off to exercise failure paths.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stored: Mutex<Option<Arena>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that already holds an arena
    pub fn with_arena(arena: Arena) -> Self {
        Self {
            stored: Mutex::new(Some(arena)),
            ..Self::default()
        }
    }

    /// Make every following write fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Copy of what was last persisted
    pub async fn snapshot(&self) -> Option<Arena> {
        self.stored.lock().await.clone()
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn load(&self) -> Result<Option<Arena>, StorageError> {
        Ok(self.stored.lock().await.clone())
    }

    async fn persist(&self, arena: &Arena) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes are disabled".to_string()));
        }
        *self.stored.lock().await = Some(arena.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

// ============================================================================
// JsonFileBackend
// ============================================================================

/// Store file wrapper carrying the schema version
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile<A> {
    schema_version: u32,
    arena: A,
}

/// Keeps the arena in a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Create a backend for the given file (created on first write)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file written first and renamed over the store file
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StorageBackend for JsonFileBackend {
    async fn load(&self) -> Result<Option<Arena>, StorageError> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(None);
        }

        let json = tokio::fs::read_to_string(&self.path).await?;
        let file: StoreFile<Arena> = serde_json::from_str(&json)?;
        if file.schema_version > SCHEMA_VERSION {
            return Err(StorageError::Unavailable(format!(
                "store file schema version {} is newer than supported version {}",
                file.schema_version, SCHEMA_VERSION
            )));
        }
        Ok(Some(file.arena))
    }

    async fn persist(&self, arena: &Arena) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&StoreFile {
            schema_version: SCHEMA_VERSION,
            arena,
        })?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let staging = self.staging_path();
        tokio::fs::write(&staging, json).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

// ============================================================================
// Tests
// ============================================================================
