//! Integration tests for `DataManager`

use formkit_core::{ComponentType, FieldValue, FormError, Validatable};
use formkit_model::{Component, ComponentConfiguration, ExportEnvelope, Module, Page, ValidationRule};
use formkit_store::{DataManager, JsonFileBackend, MemoryBackend, StorageBackend};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

// ============================================================================
// Helpers
// ============================================================================

async fn memory_store() -> (DataManager, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let manager = DataManager::open(backend.clone())
        .await
        .expect("open memory store");
    (manager, backend)
}

fn survey(title: &str) -> Page {
    Page::new(title).with_module(
        Module::new("Questions")
            .with_component(Component::new(ComponentType::Text, "Name").with_value("Ada"))
            .with_component(Component::new(ComponentType::Number, "Score").with_value(7)),
    )
}

// ============================================================================
// Pages
// ============================================================================

/// Saving clears the dirty flag and the page reads back unchanged.
#[tokio::test]
async fn test_save_and_fetch_page() {
    let (manager, backend) = memory_store().await;
    let mut page = survey("Survey");
    page.add_module(Module::new("Notes"));
    assert!(page.is_dirty);

    manager.save_page(&mut page).await.expect("save page");

    assert!(!page.is_dirty, "Saved page should be clean");
    assert_eq!(manager.fetch_page(page.id).await.expect("fetch page"), page);
    assert_eq!(backend.write_count(), 1);
}

/// Pages come newest first and templates are kept apart, sorted by title.
#[tokio::test]
async fn test_fetch_ordering() {
    let (manager, _) = memory_store().await;

    let mut older = survey("Older");
    older.updated_at = older.updated_at - chrono::Duration::hours(1);
    let mut newer = survey("Newer");
    let mut zeta = survey("Zeta").as_template();
    let mut alpha = survey("Alpha").as_template();

    for page in [&mut older, &mut newer, &mut zeta, &mut alpha] {
        manager.save_page(page).await.expect("save page");
    }

    let pages = manager.fetch_pages().await.expect("fetch pages");
    let titles: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Newer", "Older"]);

    let templates = manager.fetch_templates().await.expect("fetch templates");
    let titles: Vec<&str> = templates.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Zeta"]);
}

/// Deleting a page removes its modules and components too.
#[tokio::test]
async fn test_delete_page_cascades() {
    let (manager, backend) = memory_store().await;
    let mut page = survey("Survey");
    manager.save_page(&mut page).await.expect("save page");

    let name = page.modules[0].components[0].id;
    manager.delete_page(page.id).await.expect("delete page");

    assert!(matches!(
        manager.fetch_page(page.id).await,
        Err(FormError::DataNotFound(_))
    ));
    assert!(manager.fetch_component(name).await.is_err());

    let stored = backend.snapshot().await.expect("persisted arena");
    assert_eq!(stored.module_count(), 0);
    assert_eq!(stored.component_count(), 0);

    assert!(matches!(
        manager.delete_page(page.id).await,
        Err(FormError::DataNotFound(_))
    ));
}

// ============================================================================
// Modules and components
// ============================================================================

/// A new module is appended to the stored page.
#[tokio::test]
async fn test_save_module() {
    let (manager, _) = memory_store().await;
    let mut page = survey("Survey");
    manager.save_page(&mut page).await.expect("save page");

    let module = Module::new("Follow up")
        .with_component(Component::new(ComponentType::Toggle, "Contact me"));
    manager.save_module(page.id, &module).await.expect("save module");

    let stored = manager.fetch_page(page.id).await.expect("fetch page");
    assert_eq!(stored.modules.len(), 2);
    assert_eq!(stored.modules[1].title, "Follow up");
    assert_eq!(stored.modules[1].order, 1);

    assert!(matches!(
        manager.save_module(Uuid::new_v4(), &module).await,
        Err(FormError::DataNotFound(_))
    ));
}

/// Updating a value revalidates and refreshes the page timestamp.
#[tokio::test]
async fn test_update_component() {
    let (manager, _) = memory_store().await;
    let mut page = survey("Survey");
    manager.save_page(&mut page).await.expect("save page");
    let name = page.modules[0].components[0].id;

    let updated = manager
        .update_component(name, "")
        .await
        .expect("update component");
    assert!(!updated.is_valid(), "Empty name should fail the required rule");

    let stored = manager.fetch_page(page.id).await.expect("fetch page");
    assert_eq!(stored.find_component(name).unwrap().value(), &FieldValue::from(""));
    assert!(stored.updated_at >= page.updated_at);
    assert!(!stored.is_valid());

    assert!(matches!(
        manager.update_component(Uuid::new_v4(), 1).await,
        Err(FormError::DataNotFound(_))
    ));
}

/// Deleting a component leaves its siblings in place.
#[tokio::test]
async fn test_delete_component() {
    let (manager, _) = memory_store().await;
    let mut page = survey("Survey");
    manager.save_page(&mut page).await.expect("save page");
    let name = page.modules[0].components[0].id;

    manager.delete_component(name).await.expect("delete component");

    let stored = manager.fetch_page(page.id).await.expect("fetch page");
    let titles: Vec<&str> = stored.modules[0]
        .components
        .iter()
        .map(|c| c.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Score"]);
}

/// A component moved to another module is stored once, under its new module.
#[tokio::test]
async fn test_save_module_with_component_from_sibling() {
    let (manager, _) = memory_store().await;
    let mut page = Page::new("Survey")
        .with_module(
            Module::new("First")
                .with_component(Component::new(ComponentType::Text, "Name").with_value("Ada")),
        )
        .with_module(Module::new("Second"));
    manager.save_page(&mut page).await.expect("save page");

    let name = page.modules[0].components[0].id;
    let moved = page.modules[0].remove_component(name).unwrap();
    page.modules[1].add_component(moved);
    manager
        .save_module(page.id, &page.modules[1])
        .await
        .expect("save module");

    let stored = manager.fetch_page(page.id).await.expect("fetch page");
    let counts: Vec<(&str, usize)> = stored
        .modules
        .iter()
        .map(|m| (m.title.as_str(), m.components.len()))
        .collect();
    assert_eq!(counts, vec![("First", 0), ("Second", 1)]);
    assert_eq!(stored.component_count(), 1);
    assert_eq!(stored.module_of(name).unwrap().title, "Second");
}

/// Saving a module under a second page takes it away from the first, so
/// deleting either page never removes rows the other still shows.
#[tokio::test]
async fn test_module_saved_under_two_pages_has_one_owner() {
    let (manager, backend) = memory_store().await;
    let shared = Module::new("Shared")
        .with_component(Component::new(ComponentType::Number, "Score").with_value(3));
    let mut first = Page::new("First")
        .with_module(shared.clone())
        .with_module(Module::new("Own"));
    let mut second = Page::new("Second").with_module(shared.clone());
    manager.save_page(&mut first).await.expect("save first");
    manager.save_page(&mut second).await.expect("save second");

    let stored = manager.fetch_page(first.id).await.expect("fetch first");
    let titles: Vec<&str> = stored.modules.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Own"]);
    assert_eq!(stored.modules[0].order, 0);

    manager.delete_page(second.id).await.expect("delete second");

    let stored = manager.fetch_page(first.id).await.expect("fetch first");
    assert_eq!(stored.modules.len(), 1);
    let arena = backend.snapshot().await.expect("persisted arena");
    assert_eq!(arena.module_count(), 1);
    assert_eq!(arena.component_count(), 0);
}

// ============================================================================
// Failure handling
// ============================================================================

/// A failed write surfaces as a typed error and leaves the store unchanged.
#[tokio::test]
async fn test_failed_write_does_not_commit() {
    let (manager, backend) = memory_store().await;
    let mut page = survey("Survey");
    manager.save_page(&mut page).await.expect("save page");

    backend.set_fail_writes(true);

    let mut second = survey("Second");
    assert!(matches!(
        manager.save_page(&mut second).await,
        Err(FormError::SaveFailed(_))
    ));
    assert!(matches!(
        manager.delete_page(page.id).await,
        Err(FormError::DeleteFailed(_))
    ));
    assert!(matches!(
        manager.clear_all_data().await,
        Err(FormError::DeleteFailed(_))
    ));

    let name = page.modules[0].components[0].id;
    assert!(matches!(
        manager.update_component(name, "Grace").await,
        Err(FormError::SaveFailed(_))
    ));
    assert!(matches!(
        manager.save_module(page.id, &Module::new("Extra")).await,
        Err(FormError::SaveFailed(_))
    ));
    assert!(matches!(
        manager.delete_component(name).await,
        Err(FormError::DeleteFailed(_))
    ));

    let pages = manager.fetch_pages().await.expect("fetch pages");
    assert_eq!(pages.len(), 1, "Only the first page should be stored");
    assert_eq!(pages[0], page, "Stored page should be untouched");
    assert_eq!(
        manager.fetch_component(name).await.expect("fetch component").value(),
        &FieldValue::from("Ada")
    );
    assert_eq!(backend.write_count(), 1);
}

/// Clearing removes every page and template.
#[tokio::test]
async fn test_clear_all_data() {
    let (manager, backend) = memory_store().await;
    manager.seed_defaults().await.expect("seed");
    manager.clear_all_data().await.expect("clear");

    assert!(manager.fetch_pages().await.unwrap().is_empty());
    assert!(manager.fetch_templates().await.unwrap().is_empty());
    assert!(backend.snapshot().await.expect("persisted arena").is_empty());
}

// ============================================================================
// Validation
// ============================================================================

/// Invalid pages and templates are reported together.
#[tokio::test]
async fn test_validate_all() {
    let (manager, _) = memory_store().await;
    let mut valid = survey("Valid");
    manager.save_page(&mut valid).await.expect("save page");
    manager.validate_all().await.expect("all valid");

    let strict = ComponentConfiguration::new().with_rule(ValidationRule::MinLength(10));
    let mut broken = Page::new("Broken").with_module(
        Module::new("Only").with_component(
            Component::new(ComponentType::Text, "Code")
                .with_configuration(strict)
                .with_value("short"),
        ),
    );
    let mut broken_template = broken.create_template(Some("Broken template"));
    manager.save_page(&mut broken).await.expect("save page");
    manager
        .save_page(&mut broken_template)
        .await
        .expect("save template");

    match manager.validate_all().await {
        Err(FormError::ModelValidationFailed(errors)) => assert_eq!(
            errors,
            vec![
                "Invalid page: Broken".to_string(),
                "Invalid template: Broken template".to_string()
            ]
        ),
        other => panic!("expected validation failure, got {:?}", other),
    }
}

// ============================================================================
// Templates
// ============================================================================

/// Seeding only happens once and installs the built-in content.
#[tokio::test]
async fn test_seed_defaults() {
    let (manager, _) = memory_store().await;
    assert!(manager.seed_defaults().await.expect("seed"));
    assert!(!manager.seed_defaults().await.expect("seed again"));

    let templates = manager.fetch_templates().await.unwrap();
    let titles: Vec<&str> = templates.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Basic Profile", "Contact Form", "Full Profile"]);

    let pages = manager.fetch_pages().await.unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].title, "Welcome Page");
    manager.validate_all().await.expect("defaults are valid");
}

/// Pages created from a template point back at it and get fresh IDs.
#[tokio::test]
async fn test_create_page_from_template() {
    let (manager, _) = memory_store().await;
    manager.seed_defaults().await.expect("seed");
    let template = manager
        .fetch_templates()
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.title == "Contact Form")
        .expect("contact template");

    let page = manager
        .create_page_from_template(template.id)
        .await
        .expect("create page");

    assert!(!page.is_template);
    assert_eq!(page.template_id(), Some(template.id));
    assert_ne!(page.modules[0].id, template.modules[0].id);
    assert_eq!(manager.fetch_pages().await.unwrap().len(), 2);

    let welcome = manager
        .fetch_pages()
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.title == "Welcome Page")
        .expect("welcome page")
        .id;
    assert!(matches!(
        manager.create_page_from_template(welcome).await,
        Err(FormError::InvalidData(_))
    ));
}

/// Duplicating a template stores a second template titled "<title> Copy".
#[tokio::test]
async fn test_duplicate_template() {
    let (manager, _) = memory_store().await;
    let mut template = survey("Intake").as_template();
    manager.save_page(&mut template).await.expect("save template");

    let copy = manager
        .duplicate_template(template.id)
        .await
        .expect("duplicate");

    assert_eq!(copy.title, "Intake Copy");
    assert!(copy.is_template);
    assert_eq!(copy.source_page_id(), Some(template.id));
    let titles: Vec<String> = manager
        .fetch_templates()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["Intake".to_string(), "Intake Copy".to_string()]);
}

// ============================================================================
// Export / import
// ============================================================================

/// Import replaces everything, keeping page IDs and values.
#[tokio::test]
async fn test_export_then_import() {
    let (source, _) = memory_store().await;
    source.seed_defaults().await.expect("seed");
    let envelope = source.export_data().await.expect("export");
    assert_eq!(envelope.templates.len(), 3);
    assert_eq!(envelope.pages.len(), 1);

    let (target, _) = memory_store().await;
    let mut stale = survey("Stale");
    target.save_page(&mut stale).await.expect("save page");
    target.import_data(&envelope).await.expect("import");

    let pages = target.fetch_pages().await.unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].id, envelope.pages[0].id);
    let values = pages[0].all_values();
    assert_eq!(values["Sample Module"]["Sample Number"], FieldValue::Int(42));
    assert_eq!(target.fetch_templates().await.unwrap().len(), 3);
}

/// JSON import rejects malformed input without touching the store.
#[tokio::test]
async fn test_import_bad_json() {
    let (manager, _) = memory_store().await;
    manager.seed_defaults().await.expect("seed");

    assert!(matches!(
        manager.import_json("{\"pages\": 1}").await,
        Err(FormError::InvalidData(_))
    ));
    assert_eq!(manager.fetch_templates().await.unwrap().len(), 3);

    let json = manager.export_json().await.expect("export json");
    let envelope: ExportEnvelope = serde_json::from_str(&json).expect("valid envelope");
    assert_eq!(envelope.len(), 4);
}

/// A failed import leaves existing data in place.
#[tokio::test]
async fn test_failed_import_keeps_data() {
    let (manager, backend) = memory_store().await;
    let mut page = survey("Keep me");
    manager.save_page(&mut page).await.expect("save page");

    backend.set_fail_writes(true);
    let result = manager.import_data(&ExportEnvelope::default()).await;
    assert!(matches!(result, Err(FormError::SaveFailed(_))));
    assert_eq!(manager.fetch_pages().await.unwrap().len(), 1);
}

// ============================================================================
// File backend
// ============================================================================

/// Data written through the JSON file backend survives a reopen.
#[tokio::test]
async fn test_json_file_store_reopens() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forms.json");

    let backend: Arc<dyn StorageBackend> = Arc::new(JsonFileBackend::new(&path));
    let manager = DataManager::open(backend.clone()).await.expect("open");
    let mut page = survey("Persisted");
    manager.save_page(&mut page).await.expect("save page");
    drop(manager);

    let reopened = DataManager::open(backend).await.expect("reopen");
    let stored = reopened.fetch_page(page.id).await.expect("fetch page");
    assert_eq!(stored, page);
    assert!(stored.is_valid());
}

/// A corrupt store file fails to open with a load error.
#[tokio::test]
async fn test_corrupt_store_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forms.json");
    std::fs::write(&path, "garbage").unwrap();

    let result = DataManager::open(Arc::new(JsonFileBackend::new(&path))).await;
    assert!(matches!(result, Err(FormError::LoadFailed(_))));
}
