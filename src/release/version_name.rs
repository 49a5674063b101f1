//! Release version names and their ordering

use std::sync::LazyLock;

use regex::Regex;

/// Name of the unreleased version folder; it always sorts last.
pub const CURRENT_VERSION: &str = "current";

static ACCEPTABLE_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^current$|^\d+\.\d+\.\d+\.\d+$").unwrap());

/// True for `current` and for `MAJOR.MINOR.PATCH.BUILD` names.
pub fn is_acceptable_version(name: &str) -> bool {
    ACCEPTABLE_VERSION_RE.is_match(name)
}

/// Numeric ordering key of a version name.
///
/// Each dotted component is offset by 1000 and the results are concatenated,
/// so `1.2.3.4` becomes `1001100210031004`. `current` maps to the maximum
/// key. Names that are not numeric map to 0.
pub fn version_sort_key(name: &str) -> u128 {
    if name == CURRENT_VERSION {
        return u128::MAX;
    }

    let digits: Option<String> = name
        .split('.')
        .map(|component| {
            component
                .parse::<u128>()
                .ok()
                .and_then(|n| n.checked_add(1000))
                .map(|n| n.to_string())
        })
        .collect();

    digits.and_then(|d| d.parse().ok()).unwrap_or(0)
}
