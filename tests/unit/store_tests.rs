//! Unit tests for the model stores
//!
//! Both stores are exercised through the `ModelStore` trait object the way
//! callers receive them.

use dbrepo::model::DatabaseObject;
use dbrepo::store::normalize_app_name;
use dbrepo::{DbRepoError, JsonFileStore, MemoryStore, ModelStore};
use tempfile::TempDir;

fn sample_model() -> DatabaseObject {
    let mut model = DatabaseObject::new();
    model.properties.db_name = "shop".to_string();
    model.properties.has_current = true;
    model.versions = vec!["1.0.0.0".to_string(), "current".to_string()];
    model
        .parameters
        .insert("ENV".to_string(), vec!["a.sql".to_string()]);
    model
}

fn check_store(store: &dyn ModelStore) {
    let model = sample_model();
    store.save_model("shop", &model).unwrap();
    assert_eq!(store.load_model("shop").unwrap(), model);
    assert_eq!(store.load_model("shop-database").unwrap(), model);

    // Saving again replaces the entry
    let mut changed = model.clone();
    changed.properties.db_name = "shop2".to_string();
    store.save_model("shop-database", &changed).unwrap();
    assert_eq!(store.load_model("shop").unwrap().properties.db_name, "shop2");

    let err = store.load_model("other").unwrap_err();
    assert!(matches!(err, DbRepoError::ModelNotFound { .. }));
}

#[test]
fn test_memory_store_contract() {
    check_store(&MemoryStore::new());
}

#[test]
fn test_json_store_contract() {
    let dir = TempDir::new().unwrap();
    check_store(&JsonFileStore::new(dir.path()));
}

#[test]
fn test_json_store_artifact_names() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::with_prefix(dir.path(), "tools");
    store.save_model("shop", &sample_model()).unwrap();
    store.save_version_files("shop", &[]).unwrap();

    assert!(dir.path().join("tools-db-data.json").exists());
    assert!(dir.path().join("tools-dbs.json").exists());
    assert!(store.load_version_files("shop").unwrap().is_empty());
}

#[test]
fn test_app_name_suffix() {
    assert_eq!(normalize_app_name("billing"), "billing-database");
    assert_eq!(normalize_app_name("billing-database"), "billing-database");
}
