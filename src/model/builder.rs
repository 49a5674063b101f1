//! Build the database model from version manifests
//!
//! Two passes, each a plain function of its input:
//!
//! 1. [`fold`] walks the manifests in version order and records, per object,
//!    its latest file and its full version history.
//! 2. [`analyze`] reads each object's latest file and parses it into its
//!    typed form. It takes the finished [`FoldedObjects`] by value, so no file
//!    is read before every latest file is known.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;
use tracing::debug;

use super::database_object::DatabaseObject;
use super::elements::{DatabaseObjectEntry, DatabaseSubObject};
use super::parameters::scan_parameters;
use crate::parser::ObjectAnalyzer;
use crate::release::{
    repository_root_of, version_sort_key, DatabaseFileType, DatabaseVersionFile, CURRENT_VERSION,
};
use crate::source::SourceReader;
use crate::util::normalize_path;

/// Minimum number of objects to benefit from parallel analysis.
/// Below this threshold, sequential processing is faster due to rayon overhead.
const PARALLEL_THRESHOLD: usize = 8;

static DROP_DATABASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bdrop\s+database\s+(?:if\s+exists\s+)?"?(?:<\w+>|[A-Za-z0-9]+)_(\w+)"?"#)
        .unwrap()
});

static TABLE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]{2,4})t_").unwrap());

/// Result of the fold pass: objects with final latest files, not yet analyzed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoldedObjects {
    pub buckets: BTreeMap<DatabaseFileType, BTreeMap<String, DatabaseSubObject>>,
    /// Distinct version names in processing order
    pub versions: Vec<String>,
    pub has_current: bool,
    /// Last non-`current` version processed
    pub last_version: String,
    /// Every listed file, unknown kinds included, in processing order
    pub files: Vec<String>,
}

/// Fold version manifests into per-kind object records.
///
/// Manifests with an unusable version name are dropped. The rest are
/// processed oldest first (`current` last); manifests of the same version
/// keep their input order. The last file seen for an object is its latest.
pub fn fold(version_files: &[DatabaseVersionFile]) -> FoldedObjects {
    let mut ordered: Vec<&DatabaseVersionFile> = version_files
        .iter()
        .filter(|vf| {
            let keep = vf.has_acceptable_version();
            if !keep {
                debug!(
                    manifest = %vf.file_name,
                    version = %vf.version_name,
                    "Dropping manifest with unacceptable version name"
                );
            }
            keep
        })
        .collect();
    ordered.sort_by_key(|vf| version_sort_key(&vf.version_name));

    let mut folded = FoldedObjects::default();

    for version_file in ordered {
        let version = version_file.version_name.as_str();
        if version == CURRENT_VERSION {
            folded.has_current = true;
        } else {
            folded.last_version = version.to_string();
        }
        if !folded.versions.iter().any(|v| v == version) {
            folded.versions.push(version.to_string());
        }

        for file in version_file.files() {
            folded.files.push(file.file.clone());
            if file.file_type == DatabaseFileType::Unknown {
                continue;
            }
            folded
                .buckets
                .entry(file.file_type)
                .or_default()
                .entry(file.name.clone())
                .or_insert_with(|| DatabaseSubObject::new(file.name.clone()))
                .record(version, &file.file);
        }
    }

    debug!(
        versions = folded.versions.len(),
        objects = folded.buckets.values().map(BTreeMap::len).sum::<usize>(),
        files = folded.files.len(),
        "Folded version manifests"
    );
    folded
}

/// Analyze folded objects into the final model.
pub fn analyze(folded: FoldedObjects, reader: &dyn SourceReader) -> DatabaseObject {
    let FoldedObjects {
        buckets,
        versions,
        has_current,
        last_version,
        files,
    } = folded;

    let work: Vec<(DatabaseFileType, String, DatabaseSubObject)> = buckets
        .into_iter()
        .flat_map(|(kind, bucket)| {
            bucket
                .into_iter()
                .map(move |(name, object)| (kind, name, object))
        })
        .collect();
    let object_count = work.len();

    let analyze_one = |(kind, name, object): (DatabaseFileType, String, DatabaseSubObject)| {
        let entry = ObjectAnalyzer::for_file_type(kind).analyze(object, reader);
        (kind, name, entry)
    };

    let analyzed: Vec<(DatabaseFileType, String, DatabaseObjectEntry)> =
        if object_count >= PARALLEL_THRESHOLD {
            work.into_par_iter().map(analyze_one).collect()
        } else {
            work.into_iter().map(analyze_one).collect()
        };

    let mut model = DatabaseObject::new();
    for (kind, name, entry) in analyzed {
        model.buckets.entry(kind).or_default().insert(name, entry);
    }

    model.properties.has_current = has_current;
    model.properties.last_version = last_version;
    model.properties.db_name = derive_db_name(&model, reader);
    model.versions = versions;
    model.parameters = scan_parameters(files.iter().map(String::as_str), reader);

    debug!(
        objects = object_count,
        parameters = model.parameters.len(),
        "Analyzed database objects"
    );
    model
}

/// Fold and analyze version manifests into a complete [`DatabaseObject`].
pub fn extract_object_information(
    version_files: &[DatabaseVersionFile],
    reader: &dyn SourceReader,
) -> DatabaseObject {
    let path = version_files
        .first()
        .and_then(|vf| repository_root_of(Path::new(&vf.file_name)).map(normalize_path))
        .unwrap_or_default();

    let mut model = analyze(fold(version_files), reader);
    model.properties.path = path;
    model
}

/// Database name from the `drop database <env>_<name>` setup script, else the
/// prefix of the first conventionally named table.
fn derive_db_name(model: &DatabaseObject, reader: &dyn SourceReader) -> String {
    let from_setup = model
        .bucket(DatabaseFileType::Setup)
        .into_iter()
        .flat_map(|bucket| bucket.values())
        .find_map(|entry| {
            let text = reader
                .read_source(Path::new(&entry.base().latest_file))
                .ok()?;
            DROP_DATABASE_RE
                .captures(&text)
                .map(|caps| caps[1].to_string())
        });
    if let Some(name) = from_setup {
        return name;
    }

    model
        .bucket(DatabaseFileType::Table)
        .into_iter()
        .flat_map(|bucket| bucket.keys())
        .find_map(|name| TABLE_PREFIX_RE.captures(name).map(|caps| caps[1].to_string()))
        .unwrap_or_default()
}
