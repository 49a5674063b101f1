//! Comment tag parsing
//!
//! Tags live inside SQL comments and annotate tables and columns for the
//! downstream generators:
//!
//! ```sql
//! /* #service-name=accounts #roles=['admin','user'] #no-delete */
//! create table abct_user_usr (
//!     usr_email text not null /* #list-filter=byEmail #sort */,
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Locates tag candidates inside a larger piece of text.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"#([A-Za-z][\w-]*)(?:=(\[[^\]]*\]|'[^']*'|"[^"]*"|[^\s,*/]+))?"#).unwrap()
});

/// Parses a single tag, anchored on both ends.
static SINGLE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([A-Za-z][\w-]*)(?:=(.+))?$").unwrap());

/// Items of a `['a', 'b']` list literal.
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"'([^']*)'|"([^"]*)"|([^\s,'"]+)"#).unwrap());

/// Tag value: either a bare flag (`#ignore`) or text (`#roles=['admin']`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Flag(bool),
    Text(String),
}

impl TagValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) => Some(s),
            TagValue::Flag(_) => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Flag(b) => write!(f, "{}", b),
            TagValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A parsed `#name` or `#name=value` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: TagValue,
}

/// Tags keyed by name; a later tag with the same name replaces the earlier one.
pub type TagMap = BTreeMap<String, Tag>;

impl Tag {
    /// Parse one tag string such as `#ignore` or `#roles=['admin','user']`.
    ///
    /// Returns `None` when the text is not a tag. Callers normally feed this
    /// with candidates found by [`extract_tags`].
    pub fn parse(text: &str) -> Option<Tag> {
        let caps = SINGLE_TAG_RE.captures(text.trim())?;
        let name = caps.get(1)?.as_str().to_string();
        let value = match caps.get(2) {
            Some(m) => TagValue::Text(strip_scalar_quotes(m.as_str()).to_string()),
            None => TagValue::Flag(true),
        };
        Some(Tag { name, value })
    }

    /// Value items: list literals are split into their entries, a scalar
    /// value is a one-item list and a flag has no items.
    pub fn list_values(&self) -> Vec<String> {
        let Some(text) = self.value.as_text() else {
            return Vec::new();
        };
        let trimmed = text.trim();
        match trimmed
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
        {
            Some(inner) => LIST_ITEM_RE
                .captures_iter(inner)
                .filter_map(|c| c.get(1).or_else(|| c.get(2)).or_else(|| c.get(3)))
                .map(|m| m.as_str().to_string())
                .collect(),
            None => vec![trimmed.to_string()],
        }
    }
}

fn strip_scalar_quotes(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Find every tag in `text`, in order of appearance.
pub fn extract_tag_list(text: &str) -> Vec<Tag> {
    TAG_RE
        .find_iter(text)
        .filter_map(|m| Tag::parse(m.as_str()))
        .collect()
}

/// Build the tag map for `text`.
pub fn extract_tags(text: &str) -> TagMap {
    let mut tags = TagMap::new();
    for tag in extract_tag_list(text) {
        tags.insert(tag.name.clone(), tag);
    }
    tags
}
