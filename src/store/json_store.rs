//! JSON file backed store
//!
//! Each artifact kind is one JSON document mapping application name to
//! artifact. Saving reads the whole document, replaces one entry and rewrites
//! the file. There is no locking; concurrent writers may lose updates.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{normalize_app_name, ModelStore};
use crate::error::DbRepoError;
use crate::model::DatabaseObject;
use crate::release::DatabaseVersionFile;

const DEFAULT_PREFIX: &str = "dbrepo";

type Document = BTreeMap<String, Value>;

/// Store writing `<prefix>-db-data.json` and `<prefix>-dbs.json` into a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    prefix: String,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_prefix(dir, DEFAULT_PREFIX)
    }

    pub fn with_prefix(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Path of the aggregated model document.
    pub fn model_path(&self) -> PathBuf {
        self.dir.join(format!("{}-db-data.json", self.prefix))
    }

    /// Path of the version manifest document.
    pub fn version_files_path(&self) -> PathBuf {
        self.dir.join(format!("{}-dbs.json", self.prefix))
    }

    fn load_entry<T: DeserializeOwned>(&self, path: &Path, app_name: &str) -> Result<T, DbRepoError> {
        let key = normalize_app_name(app_name);
        let mut document = read_document(path)?;
        let value = document
            .remove(&key)
            .ok_or(DbRepoError::ModelNotFound { app_name: key })?;
        serde_json::from_value(value).map_err(|e| DbRepoError::StoreParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn save_entry<T: Serialize + ?Sized>(
        &self,
        path: &Path,
        app_name: &str,
        entry: &T,
    ) -> Result<(), DbRepoError> {
        let mut document = read_document(path)?;
        document.insert(normalize_app_name(app_name), serde_json::to_value(entry)?);
        write_document(path, &document)
    }
}

impl ModelStore for JsonFileStore {
    fn load_model(&self, app_name: &str) -> Result<DatabaseObject, DbRepoError> {
        self.load_entry(&self.model_path(), app_name)
    }

    fn save_model(&self, app_name: &str, model: &DatabaseObject) -> Result<(), DbRepoError> {
        self.save_entry(&self.model_path(), app_name, model)
    }

    fn load_version_files(
        &self,
        app_name: &str,
    ) -> Result<Vec<DatabaseVersionFile>, DbRepoError> {
        self.load_entry(&self.version_files_path(), app_name)
    }

    fn save_version_files(
        &self,
        app_name: &str,
        version_files: &[DatabaseVersionFile],
    ) -> Result<(), DbRepoError> {
        self.save_entry(&self.version_files_path(), app_name, version_files)
    }
}

/// Read a store document; a missing file is an empty document.
fn read_document(path: &Path) -> Result<Document, DbRepoError> {
    if !path.exists() {
        return Ok(Document::new());
    }
    let text = fs::read_to_string(path).map_err(|e| DbRepoError::StoreReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| DbRepoError::StoreParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_document(path: &Path, document: &Document) -> Result<(), DbRepoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DbRepoError::StoreWriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json).map_err(|e| DbRepoError::StoreWriteError {
        path: path.to_path_buf(),
        source: e,
    })
}
