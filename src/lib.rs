//! dbrepo: reads versioned PostgreSQL release repositories
//!
//! A repository keeps its schema as SQL scripts under
//! `postgres/release/<version>/`, one folder per release plus `current`.
//! This library folds those scripts into a single model of the database
//! (tables, functions and every other object kind, each with its version
//! history) and persists it for the tools that consume it.

pub mod error;
pub mod model;
pub mod parser;
pub mod release;
pub mod source;
pub mod store;
pub mod util;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

pub use error::DbRepoError;
pub use model::DatabaseObject;
pub use release::DatabaseVersionFile;
pub use source::{FsSourceReader, MemorySourceReader, SourceReader};
pub use store::{JsonFileStore, MemoryStore, ModelStore};

/// Options for reading a repository
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Repository root (the folder containing `postgres/`)
    pub repo_path: PathBuf,
    /// Application name to store under (defaults to the repository folder name)
    pub app_name: Option<String>,
    /// Directory holding the JSON store files
    pub store_dir: PathBuf,
}

impl ReadOptions {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            app_name: None,
            store_dir: PathBuf::from("."),
        }
    }

    /// Normalised application name.
    pub fn app_name(&self) -> String {
        let name = self.app_name.clone().unwrap_or_else(|| {
            std::fs::canonicalize(&self.repo_path)
                .unwrap_or_else(|_| self.repo_path.clone())
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "repository".to_string())
        });
        store::normalize_app_name(&name)
    }
}

/// Everything read from one repository.
#[derive(Debug, Clone)]
pub struct RepositoryScan {
    pub version_files: Vec<DatabaseVersionFile>,
    pub model: DatabaseObject,
}

/// Read the manifests of a repository and build its model.
pub fn scan_repository(repo_path: &Path, reader: &dyn SourceReader) -> Result<RepositoryScan> {
    // Step 1: Read every version manifest
    let version_files = release::read_release(repo_path)?;

    // Step 2: Fold and analyze
    let model = model::extract_object_information(&version_files, reader);

    info!(
        repository = %repo_path.display(),
        manifests = version_files.len(),
        versions = model.versions.len(),
        objects = model.object_count(),
        tables = model.tables().count(),
        functions = model.functions().count(),
        "Read database repository"
    );

    Ok(RepositoryScan {
        version_files,
        model,
    })
}

/// Scan a repository and save both artifacts into `store`.
pub fn read_repository_into(
    options: &ReadOptions,
    reader: &dyn SourceReader,
    store: &dyn ModelStore,
) -> Result<RepositoryScan> {
    let scan = scan_repository(&options.repo_path, reader)?;

    let app_name = options.app_name();
    store.save_version_files(&app_name, &scan.version_files)?;
    store.save_model(&app_name, &scan.model)?;
    info!(app = %app_name, "Saved database model");

    Ok(scan)
}

/// Scan a repository from disk and save it into the JSON store in
/// `options.store_dir`.
pub fn read_repository(options: &ReadOptions) -> Result<RepositoryScan> {
    let store = JsonFileStore::new(&options.store_dir);
    read_repository_into(options, &FsSourceReader, &store)
}
