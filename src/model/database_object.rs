//! The aggregated database model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::elements::{DatabaseFunction, DatabaseObjectEntry, DatabaseTable};
use crate::release::DatabaseFileType;

/// Objects of one kind, keyed by object name.
pub type Bucket = BTreeMap<String, DatabaseObjectEntry>;

/// Repository-wide facts derived while aggregating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseProperties {
    pub db_name: String,
    pub has_current: bool,
    /// Repository root the model was read from
    pub path: String,
    /// Highest released version; empty when only `current` exists
    pub last_version: String,
}

/// Aggregate root: one bucket per file kind plus repository-wide data.
///
/// Serialized as a flat object: the bucket kinds (`table`, `function`, ...)
/// next to `_properties`, `_parameters` and `_versions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseObject {
    #[serde(flatten)]
    pub buckets: BTreeMap<DatabaseFileType, Bucket>,
    #[serde(rename = "_properties", default)]
    pub properties: DatabaseProperties,
    /// Placeholder name -> files referencing it
    #[serde(rename = "_parameters", default)]
    pub parameters: BTreeMap<String, Vec<String>>,
    /// Distinct version names in processing order
    #[serde(rename = "_versions", default)]
    pub versions: Vec<String>,
}

impl DatabaseObject {
    /// An empty model with a bucket for every kind.
    pub fn new() -> Self {
        Self {
            buckets: DatabaseFileType::BUCKETS
                .iter()
                .map(|kind| (*kind, Bucket::new()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn bucket(&self, kind: DatabaseFileType) -> Option<&Bucket> {
        self.buckets.get(&kind)
    }

    pub fn tables(&self) -> impl Iterator<Item = &DatabaseTable> {
        self.bucket(DatabaseFileType::Table)
            .into_iter()
            .flat_map(|b| b.values())
            .filter_map(DatabaseObjectEntry::as_table)
    }

    pub fn functions(&self) -> impl Iterator<Item = &DatabaseFunction> {
        self.bucket(DatabaseFileType::Function)
            .into_iter()
            .flat_map(|b| b.values())
            .filter_map(DatabaseObjectEntry::as_function)
    }

    /// Look an object up by name across all buckets, in bucket order.
    pub fn find(&self, name: &str) -> Option<(DatabaseFileType, &DatabaseObjectEntry)> {
        self.buckets
            .iter()
            .find_map(|(kind, bucket)| bucket.get(name).map(|entry| (*kind, entry)))
    }

    /// Number of objects over all buckets.
    pub fn object_count(&self) -> usize {
        self.buckets.values().map(BTreeMap::len).sum()
    }
}
