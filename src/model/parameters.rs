//! `<PARAM>` placeholder scanning
//!
//! Release scripts are templates: `<DB_NAME>`, `<ENV>` and similar
//! placeholders are substituted by the installer.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::source::SourceReader;

static PARAMETER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<(\w+)>").unwrap());

/// Distinct placeholder names in `text`, in order of first appearance.
pub fn extract_parameters(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PARAMETER_RE
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Map each placeholder to the files using it.
///
/// Every file is read once; a file that cannot be read is logged and skipped.
pub fn scan_parameters<'a, I>(files: I, reader: &dyn SourceReader) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parameters: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut scanned = HashSet::new();

    for file in files {
        if !scanned.insert(file) {
            continue;
        }
        let text = match reader.read_source(Path::new(file)) {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %file, error = %e, "Could not read file for parameter scan");
                continue;
            }
        };
        for name in extract_parameters(&text) {
            parameters.entry(name).or_default().push(file.to_string());
        }
    }

    parameters
}
