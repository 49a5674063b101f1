//! In-memory store

use std::collections::HashMap;
use std::sync::Mutex;

use super::{normalize_app_name, ModelStore};
use crate::error::DbRepoError;
use crate::model::DatabaseObject;
use crate::release::DatabaseVersionFile;

/// Store keeping artifacts in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    models: Mutex<HashMap<String, DatabaseObject>>,
    version_files: Mutex<HashMap<String, Vec<DatabaseVersionFile>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.models.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ModelStore for MemoryStore {
    fn load_model(&self, app_name: &str) -> Result<DatabaseObject, DbRepoError> {
        let key = normalize_app_name(app_name);
        let models = self.models.lock().unwrap_or_else(|e| e.into_inner());
        models
            .get(&key)
            .cloned()
            .ok_or(DbRepoError::ModelNotFound { app_name: key })
    }

    fn save_model(&self, app_name: &str, model: &DatabaseObject) -> Result<(), DbRepoError> {
        let mut models = self.models.lock().unwrap_or_else(|e| e.into_inner());
        models.insert(normalize_app_name(app_name), model.clone());
        Ok(())
    }

    fn load_version_files(
        &self,
        app_name: &str,
    ) -> Result<Vec<DatabaseVersionFile>, DbRepoError> {
        let key = normalize_app_name(app_name);
        let files = self.version_files.lock().unwrap_or_else(|e| e.into_inner());
        files
            .get(&key)
            .cloned()
            .ok_or(DbRepoError::ModelNotFound { app_name: key })
    }

    fn save_version_files(
        &self,
        app_name: &str,
        version_files: &[DatabaseVersionFile],
    ) -> Result<(), DbRepoError> {
        let mut files = self.version_files.lock().unwrap_or_else(|e| e.into_inner());
        files.insert(normalize_app_name(app_name), version_files.to_vec());
        Ok(())
    }
}
