//! Version manifest (`version.json`) reading
//!
//! A manifest is a JSON array of install steps:
//!
//! ```json
//! [{ "userToUse": "postgres", "databaseToUse": "postgres",
//!    "fileList": ["00-database-setup/001-create.sql", "03-tables/abct_user_usr.sql"] }]
//! ```
//!
//! File list entries are relative to the version folder holding the manifest.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::file_type::DatabaseFileType;
use super::version_name::is_acceptable_version;
use crate::error::DbRepoError;
use crate::util::normalize_path;

/// One classified entry of a step's file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseFile {
    #[serde(rename = "type")]
    pub file_type: DatabaseFileType,
    /// Object name: the file stem
    pub name: String,
    /// Path of the file, joined onto its version folder
    pub file: String,
}

impl DatabaseFile {
    pub fn from_entry(version_dir: &Path, entry: &str) -> Self {
        let relative = entry.replace('\\', "/");
        let name = Path::new(&relative)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file_type: DatabaseFileType::classify(&relative),
            name,
            file: normalize_path(&version_dir.join(&relative)),
        }
    }
}

/// One install step of a version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseVersion {
    #[serde(default)]
    pub user_to_use: String,
    #[serde(default)]
    pub database_to_use: String,
    /// Kept verbatim; its shape varies between repositories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<serde_json::Value>,
    #[serde(default)]
    pub file_list: Vec<String>,
    #[serde(default)]
    pub files: Vec<DatabaseFile>,
}

/// A parsed `version.json` together with the version it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseVersionFile {
    pub file_name: String,
    pub version_name: String,
    pub versions: Vec<DatabaseVersion>,
}

impl DatabaseVersionFile {
    /// Build from manifest text. `path` is the manifest's own path; its
    /// parent folder name is the version name.
    pub fn from_manifest_json(path: &Path, json: &str) -> Result<Self, DbRepoError> {
        let mut versions: Vec<DatabaseVersion> =
            serde_json::from_str(json).map_err(|e| DbRepoError::ManifestParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        let version_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let version_name = version_dir
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        for version in &mut versions {
            version.files = version
                .file_list
                .iter()
                .map(|entry| DatabaseFile::from_entry(&version_dir, entry))
                .collect();
        }

        Ok(Self {
            file_name: normalize_path(path),
            version_name,
            versions,
        })
    }

    pub fn has_acceptable_version(&self) -> bool {
        is_acceptable_version(&self.version_name)
    }

    /// Files whose path matches no known segment.
    pub fn unknown_files(&self) -> impl Iterator<Item = &DatabaseFile> {
        self.files()
            .filter(|f| f.file_type == DatabaseFileType::Unknown)
    }

    /// Every classified file of every step, in manifest order.
    pub fn files(&self) -> impl Iterator<Item = &DatabaseFile> {
        self.versions.iter().flat_map(|v| v.files.iter())
    }
}

/// Read and classify one `version.json`.
pub fn read_version_file(path: &Path) -> Result<DatabaseVersionFile, DbRepoError> {
    let json = std::fs::read_to_string(path).map_err(|e| DbRepoError::ManifestReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    DatabaseVersionFile::from_manifest_json(path, &json)
}
