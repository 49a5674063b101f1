//! Column definition parsing
//!
//! A column fragment is never parsed with a grammar. The first word is the
//! column name; every property is then detected with its own regex against
//! the fragment text, so the order of clauses does not matter:
//!
//! ```sql
//! fk_usr_ord_owner_id integer not null references abct_user_usr(pk_usr_id) /* #list-filter */
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::tags::{extract_tags, TagMap, TagValue};
use crate::model::{DatabaseTableField, ForeignKey};
use crate::util::{to_camel_case, unquote_ident};

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

static NOT_NULL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnot\s+null\b").unwrap());

static UNIQUE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\sunique\b").unwrap());

static REFERENCES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\breferences\s+(?:"?\w+"?\s*\.\s*)?"?(\w+)"?\s*\(\s*"?(\w+)"?\s*\)"#)
        .unwrap()
});

static DEFAULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdefault\s+(.+)$").unwrap());

static PRIMARY_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bprimary\s+key\b").unwrap());

/// First column clause after the type.
static TYPE_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s(?:not\s+null|null|unique|references|default|primary\s+key|check|constraint|collate|generated)\b",
    )
    .unwrap()
});

/// Column clauses that can follow a default expression.
static DEFAULT_TAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s+(?:not\s+null|null|unique|references|primary\s+key|check|constraint|collate|generated)\b.*$",
    )
    .unwrap()
});

static PRIMARY_KEY_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^pk_[a-z0-9]+_id$").unwrap());

/// Audit columns maintained by triggers, never written by generated update code.
pub const AUDIT_COLUMNS: &[&str] = &["created_by", "created_at", "modified_by", "modified_at"];

/// Parse one column fragment of a `CREATE TABLE` (or `RETURNS TABLE`) list.
///
/// `table_suffix` is the three-character code from the table name; pass an
/// empty string when the owner follows no naming convention. Returns `None`
/// for a fragment without a column name.
pub fn parse_field(fragment: &str, table_suffix: &str) -> Option<DatabaseTableField> {
    let clean = COMMENT_RE.replace_all(fragment, " ");
    let clean = clean.trim();

    let (raw_name, remainder) = match clean.find(char::is_whitespace) {
        Some(idx) => (&clean[..idx], &clean[idx..]),
        None => (clean, ""),
    };
    if raw_name.is_empty() {
        return None;
    }
    let name = unquote_ident(raw_name).to_string();

    let field_type = match TYPE_END_RE.find(remainder) {
        Some(m) => remainder[..m.start()].trim(),
        None => remainder.trim(),
    }
    .to_string();

    let default = DEFAULT_RE
        .captures(clean)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());
    let default_value = default
        .as_deref()
        .map(|d| DEFAULT_TAIL_RE.replace(d, "").trim().to_string());

    let foreign_key = REFERENCES_RE.captures(clean).map(|c| ForeignKey {
        table: c[1].to_string(),
        key: c[2].to_string(),
    });

    let is_primary_key = PRIMARY_KEY_RE.is_match(clean);
    let tags = extract_tags(fragment);

    let camel_cased_name = resolve_camel_cased_name(&name, table_suffix, &tags);

    let is_audit = AUDIT_COLUMNS.iter().any(|c| name.eq_ignore_ascii_case(c));

    let mut field = DatabaseTableField {
        camel_cased_name,
        field_type,
        not_null: NOT_NULL_RE.is_match(clean),
        unique: UNIQUE_RE.is_match(clean),
        default,
        default_value,
        is_primary_key,
        is_foreign_key: foreign_key.is_some(),
        foreign_key,
        to_update: !(is_audit || is_primary_key),
        retrieve_in_list: is_primary_key,
        sort: tags.contains_key("sort"),
        get_with_parent: tags.contains_key("get-with-parent"),
        name,
        ..Default::default()
    };

    if let Some(tag) = tags.get("list-filter") {
        field.is_list_filter = true;
        field.list_filter_name = Some(match &tag.value {
            TagValue::Text(name) => name.clone(),
            TagValue::Flag(_) => field.camel_cased_name.clone(),
        });
    }

    field.tags = tags;
    Some(field)
}

/// Resolve the camelCase name of a column.
///
/// Order: `#camel-cased-name` tag, then the `fk_<ref>_<own suffix>_<name>`
/// convention, then the `pk_<suffix>_id` convention, then the column name
/// with the table suffix prefix removed. A foreign key that does not follow
/// the convention for this table lands in the last branch; consistency
/// checkers rely on that.
fn resolve_camel_cased_name(name: &str, table_suffix: &str, tags: &TagMap) -> String {
    if let Some(explicit) = tags
        .get("camel-cased-name")
        .and_then(|t| t.value.as_text())
    {
        return explicit.to_string();
    }

    if let Some(rest) = foreign_key_convention(name, table_suffix) {
        return to_camel_case(rest);
    }

    if PRIMARY_KEY_NAME_RE.is_match(name) {
        return "id".to_string();
    }

    let stripped = if table_suffix.is_empty() {
        name
    } else {
        strip_suffix_prefix(name, table_suffix).unwrap_or(name)
    };
    to_camel_case(stripped)
}

/// `fk_abc_xyz_owner_id` on a table with suffix `xyz` yields `owner_id`.
fn foreign_key_convention<'a>(name: &'a str, table_suffix: &str) -> Option<&'a str> {
    if table_suffix.len() != 3 {
        return None;
    }
    let lower = name.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    // fk_ + 3 + _ + 3 + _ + at least one character
    if bytes.len() < 12 || !lower.starts_with("fk_") || bytes[6] != b'_' || bytes[10] != b'_' {
        return None;
    }
    let referenced = &lower[3..6];
    let own = &lower[7..10];
    let is_code = |s: &str| s.bytes().all(|b| b.is_ascii_alphanumeric());
    if is_code(referenced) && own.eq_ignore_ascii_case(table_suffix) {
        Some(&name[11..])
    } else {
        None
    }
}

fn strip_suffix_prefix<'a>(name: &'a str, table_suffix: &str) -> Option<&'a str> {
    let prefix_len = table_suffix.len() + 1;
    if name.len() > prefix_len
        && name.as_bytes()[table_suffix.len()] == b'_'
        && name[..table_suffix.len()].eq_ignore_ascii_case(table_suffix)
    {
        Some(&name[prefix_len..])
    } else {
        None
    }
}
