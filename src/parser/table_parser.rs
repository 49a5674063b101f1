//! CREATE TABLE analysis
//!
//! Works on text already passed through
//! [`simplify_for_analysis`](super::simplify_for_analysis). Tables follow the
//! naming convention `<dbprefix>t_<name>_<suffix>`, e.g. `abct_user_usr`.

use std::sync::LazyLock;

use regex::Regex;

use super::field_parser::parse_field;
use super::fragments::{extract_parenthesized, split_top_level};
use super::tags::extract_tags;
use crate::model::{DatabaseSubObject, DatabaseTable};
use crate::util::{eq_any_ci, to_camel_case, unquote_ident};

/// Start of the `CREATE TABLE` statement; header tags sit before it.
static CREATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcreate\s+(?:(?:global|local)\s+)?(?:unlogged\s+|temp(?:orary)?\s+)?table\b")
        .unwrap()
});

static TABLE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:table|exists)\s+(?:"?\w+"?\s*\.\s*)?"?(\w+)"?\s*\("#).unwrap()
});

static TABLE_CONVENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([a-z]{2,4})t_(\w+)_([a-z0-9]{3})$").unwrap());

/// Leading words of table-level constraint entries in the column list.
const CONSTRAINT_KEYWORDS: &[&str] = &[
    "check",
    "unique",
    "primary",
    "exclude",
    "foreign",
    "constraint",
    "like",
];

/// Naming-convention parts of a table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNameParts {
    pub db_prefix: String,
    pub camel_cased_name: String,
    pub table_suffix: String,
}

/// Split `abct_user_profile_usr` into `abc`, `userProfile` and `usr`.
pub fn decompose_table_name(name: &str) -> Option<TableNameParts> {
    let caps = TABLE_CONVENTION_RE.captures(name)?;
    Some(TableNameParts {
        db_prefix: caps[1].to_string(),
        camel_cased_name: to_camel_case(&caps[2]),
        table_suffix: caps[3].to_string(),
    })
}

/// Analyze simplified SQL defining `base` into a [`DatabaseTable`].
///
/// Text that does not contain a recognisable `CREATE TABLE` yields a table
/// with only the fold data filled in.
pub fn parse_table(base: DatabaseSubObject, sql: &str) -> DatabaseTable {
    let mut table = DatabaseTable::from_sub_object(base);

    let create_at = CREATE_RE.find(sql).map(|m| m.start());
    if let Some(start) = create_at {
        table.tags = extract_tags(&sql[..start]);
    }
    let search_from = create_at.unwrap_or(0);

    let name_match = TABLE_NAME_RE.captures(&sql[search_from..]);
    let sql_name = name_match
        .as_ref()
        .and_then(|c| c.get(1))
        .map(|m| unquote_ident(m.as_str()).to_string());

    let naming_source = sql_name.as_deref().unwrap_or(&table.base.name);
    match decompose_table_name(naming_source) {
        Some(parts) => {
            table.db_prefix = parts.db_prefix;
            table.camel_cased_name = parts.camel_cased_name;
            table.table_suffix = parts.table_suffix;
        }
        None => table.camel_cased_name = to_camel_case(naming_source),
    }

    let Some(caps) = name_match else {
        return table;
    };
    let Some(whole) = caps.get(0) else {
        return table;
    };
    // The name pattern ends on the opening parenthesis of the column list
    let open = search_from + whole.end() - 1;
    let Some((body, _)) = extract_parenthesized(sql, open) else {
        return table;
    };

    for fragment in split_top_level(body) {
        if is_table_constraint(&fragment) {
            continue;
        }
        if let Some(field) = parse_field(&fragment, &table.table_suffix) {
            if field.is_primary_key && table.primary_key.is_none() {
                table.primary_key = Some(field.name.clone());
            }
            table.fields.push(field);
        }
    }

    table
}

fn is_table_constraint(fragment: &str) -> bool {
    fragment
        .split_whitespace()
        .find(|word| !word.starts_with("/*"))
        .map(|word| {
            let word = word.split('(').next().unwrap_or(word);
            eq_any_ci(word, CONSTRAINT_KEYWORDS)
        })
        .unwrap_or(false)
}
