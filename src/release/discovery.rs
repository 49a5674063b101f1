//! Locating version manifests in a repository
//!
//! Layout: `<repo>/postgres/release/<version>/version.json`.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::version_file::{read_version_file, DatabaseVersionFile};
use crate::error::DbRepoError;

pub const MANIFEST_FILE_NAME: &str = "version.json";

/// `<repo>/postgres/release`
pub fn release_dir(repo_path: &Path) -> PathBuf {
    repo_path.join("postgres").join("release")
}

/// Manifest paths of every version folder, sorted by folder name.
pub fn find_version_manifests(repo_path: &Path) -> Result<Vec<PathBuf>, DbRepoError> {
    let root = release_dir(repo_path);
    if !root.is_dir() {
        return Err(DbRepoError::ReleaseDirNotFound { path: root });
    }

    let manifests: Vec<PathBuf> = WalkDir::new(&root)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == MANIFEST_FILE_NAME)
        .map(|e| e.into_path())
        .collect();

    debug!(
        release_dir = %root.display(),
        count = manifests.len(),
        "Found version manifests"
    );
    Ok(manifests)
}

/// Read every version manifest of a repository.
///
/// A manifest that cannot be read or parsed aborts the read: without it the
/// version history would be silently incomplete.
pub fn read_release(repo_path: &Path) -> Result<Vec<DatabaseVersionFile>, DbRepoError> {
    find_version_manifests(repo_path)?
        .iter()
        .map(|path| read_version_file(path))
        .collect()
}

/// Repository root of a manifest path (four levels up).
pub fn repository_root_of(manifest: &Path) -> Option<&Path> {
    manifest.ancestors().nth(4)
}
