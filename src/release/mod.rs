//! Release folder reading: version manifests and file classification

mod discovery;
mod file_type;
mod version_file;
mod version_name;

pub use discovery::{
    find_version_manifests, read_release, release_dir, repository_root_of, MANIFEST_FILE_NAME,
};
pub use file_type::DatabaseFileType;
pub use version_file::{read_version_file, DatabaseFile, DatabaseVersion, DatabaseVersionFile};
pub use version_name::{is_acceptable_version, version_sort_key, CURRENT_VERSION};
