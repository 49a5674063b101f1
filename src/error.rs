//! Error types for dbrepo

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a repository read or a store operation.
///
/// Per-object problems (a missing object file, SQL that does not match the
/// expected shape, a version folder with an unusable name) are not errors:
/// they are logged and the read continues with a best-effort model.
#[derive(Error, Debug)]
pub enum DbRepoError {
    #[error("Release directory not found: {path}")]
    ReleaseDirNotFound { path: PathBuf },

    #[error("Failed to read version manifest: {path}")]
    ManifestReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse version manifest: {path}")]
    ManifestParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No stored database model for application: {app_name}")]
    ModelNotFound { app_name: String },

    #[error("Failed to read store file: {path}")]
    StoreReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file is not valid JSON: {path}")]
    StoreParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write store file: {path}")]
    StoreWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize stored document: {message}")]
    StoreSerializeError { message: String },
}

impl From<serde_json::Error> for DbRepoError {
    fn from(err: serde_json::Error) -> Self {
        DbRepoError::StoreSerializeError {
            message: err.to_string(),
        }
    }
}
