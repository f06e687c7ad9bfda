//! formkit
//!
//! Opens the page store, seeds the built-in templates on first run, checks
//! every stored page and writes a scheduled backup when one is due.

use anyhow::{Context, Result};
use chrono::Utc;
use formkit_core::{Persistable, Settings};
use formkit_model::EXPORT_FILE_EXTENSION;
use formkit_store::{DataManager, JsonFileBackend, MemoryBackend, StorageBackend};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Settings file used when `FORMKIT_CONFIG` is not set
const DEFAULT_CONFIG_PATH: &str = "formkit.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config_path = std::env::var_os("FORMKIT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut settings = Settings::load(&config_path)
        .with_context(|| format!("loading settings from {}", config_path.display()))?;

    let backend: Arc<dyn StorageBackend> = match &settings.storage_path {
        Some(path) => Arc::new(JsonFileBackend::new(path)),
        None => {
            warn!("No storage path configured, data will not outlive this run");
            Arc::new(MemoryBackend::new())
        }
    };
    let manager = DataManager::open(backend).await?;

    if manager.seed_defaults().await? {
        info!("Installed default templates");
    }
    if let Err(e) = manager.validate_all().await {
        warn!("Stored data needs attention: {}", e);
    }

    let now = Utc::now();
    if let (true, Some(dir)) = (settings.should_backup(now), settings.backup_dir.clone()) {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating backup directory {}", dir.display()))?;
        let path = dir.join(format!(
            "formkit-backup-{}.{}",
            now.format("%Y%m%d-%H%M%S"),
            EXPORT_FILE_EXTENSION
        ));

        manager.export_data().await?.save_to_file(&path)?;
        settings.mark_backed_up(now);
        settings
            .save(&config_path)
            .with_context(|| format!("saving settings to {}", config_path.display()))?;
        info!("Wrote backup to {}", path.display());
    }

    let pages = manager.fetch_pages().await?;
    let templates = manager.fetch_templates().await?;
    println!(
        "formkit v{}: {} pages, {} templates",
        formkit_model::VERSION,
        pages.len(),
        templates.len()
    );
    for page in &pages {
        println!("  {} ({} components)", page.title, page.component_count());
    }

    Ok(())
}
