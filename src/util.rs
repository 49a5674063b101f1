//! Shared utility helpers.

use std::path::Path;

use convert_case::{Case, Casing};

/// Case-insensitive starts_with check without allocating.
#[inline]
pub fn starts_with_ci(haystack: &str, needle: &str) -> bool {
    haystack.len() >= needle.len()
        && haystack.as_bytes()[..needle.len()].eq_ignore_ascii_case(needle.as_bytes())
}

/// True when `word` equals any of `candidates`, ignoring ASCII case.
#[inline]
pub fn eq_any_ci(word: &str, candidates: &[&str]) -> bool {
    candidates.iter().any(|c| word.eq_ignore_ascii_case(c))
}

/// Convert a snake_case identifier into camelCase (`first_name` -> `firstName`).
pub fn to_camel_case(snake: &str) -> String {
    let lower = snake.to_ascii_lowercase();
    lower.from_case(Case::Snake).to_case(Case::Camel)
}

/// Render a path with forward slashes so stored models are identical across platforms.
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Strip one layer of surrounding double quotes from an identifier.
#[inline]
pub fn unquote_ident(ident: &str) -> &str {
    ident
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(ident)
}
