//! Persistence of the read model
//!
//! Two artifacts are stored per application: the aggregated
//! [`DatabaseObject`] and the raw version manifests it was built from.
//! Callers pass a store handle explicitly; there is no process-wide store.

mod json_store;
mod memory_store;

pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;

use crate::error::DbRepoError;
use crate::model::DatabaseObject;
use crate::release::DatabaseVersionFile;

/// Suffix every stored application name ends with.
pub const APP_NAME_SUFFIX: &str = "-database";

/// Store for read models, keyed by application name.
///
/// Implementations normalise names with [`normalize_app_name`], so `shop`
/// and `shop-database` address the same entry.
pub trait ModelStore: Send + Sync {
    /// Load a model; [`DbRepoError::ModelNotFound`] when none was saved.
    fn load_model(&self, app_name: &str) -> Result<DatabaseObject, DbRepoError>;
    /// Save a model, replacing any previous one.
    fn save_model(&self, app_name: &str, model: &DatabaseObject) -> Result<(), DbRepoError>;
    fn load_version_files(&self, app_name: &str)
        -> Result<Vec<DatabaseVersionFile>, DbRepoError>;
    fn save_version_files(
        &self,
        app_name: &str,
        version_files: &[DatabaseVersionFile],
    ) -> Result<(), DbRepoError>;
}

/// `shop` -> `shop-database`; names already carrying the suffix are kept.
pub fn normalize_app_name(app_name: &str) -> String {
    if app_name.ends_with(APP_NAME_SUFFIX) {
        app_name.to_string()
    } else {
        format!("{}{}", app_name, APP_NAME_SUFFIX)
    }
}
