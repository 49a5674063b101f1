//! CREATE FUNCTION analysis
//!
//! Extracts the signature of a PostgreSQL function from simplified SQL:
//! name (with the `<dbprefix>f_<name>` convention), arguments, volatility
//! and return shape. The body is never inspected.

use std::sync::LazyLock;

use regex::Regex;

use super::field_parser::parse_field;
use super::fragments::{extract_parenthesized, split_top_level};
use crate::model::{
    ArgumentMode, DatabaseFunction, DatabaseSubObject, FunctionArgument, FunctionMode, ReturnType,
};
use crate::util::{to_camel_case, unquote_ident};

static FUNCTION_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\bcreate\s+(or\s+replace\s+)?(?:function|procedure)\s+(?:"?\w+"?\s*\.\s*)?"?(\w+)"?\s*\("#,
    )
    .unwrap()
});

static FUNCTION_CONVENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([a-z]{2,4})f_(\w+)$").unwrap());

static MODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(immutable|stable|volatile|leakproof)\b").unwrap());

static RETURNS_TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*returns\s+table\s*\(").unwrap());

/// Captures the return type up to the next function attribute.
static RETURNS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*returns\s+(.+?)(?:\s+(?:as|language|immutable|stable|volatile|leakproof|strict|security|external|cost|rows|parallel|set|called|returns|not|window|support|begin)\b|\s*\$|\s*;|\s*$)",
    )
    .unwrap()
});

static ARG_DEFAULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.*?)\s*(?:\bdefault\b|=)\s*(.+)$").unwrap());

static DOLLAR_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(?:[A-Za-z_]\w*)?\$").unwrap());

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

/// Analyze simplified SQL defining `base` into a [`DatabaseFunction`].
pub fn parse_function(base: DatabaseSubObject, sql: &str) -> DatabaseFunction {
    let mut function = DatabaseFunction::from_sub_object(base);

    let name_match = FUNCTION_NAME_RE.captures(sql);
    let sql_name = name_match
        .as_ref()
        .and_then(|c| c.get(2))
        .map(|m| unquote_ident(m.as_str()).to_string());

    let naming_source = sql_name.as_deref().unwrap_or(&function.base.name);
    match FUNCTION_CONVENTION_RE.captures(naming_source) {
        Some(caps) => {
            function.db_prefix = caps[1].to_string();
            function.camel_cased_name = to_camel_case(&caps[2]);
        }
        None => function.camel_cased_name = to_camel_case(naming_source),
    }

    let Some(caps) = name_match else {
        return function;
    };
    function.has_or_replace = caps.get(1).is_some();

    let Some(whole) = caps.get(0) else {
        return function;
    };
    let Some((args, after_args)) = extract_parenthesized(sql, whole.end() - 1) else {
        return function;
    };

    function.arguments = split_top_level(args)
        .iter()
        .filter_map(|fragment| parse_argument(fragment))
        .collect();

    let rest = strip_dollar_quoted(&sql[after_args..]);
    function.mode = MODE_RE
        .captures(&rest)
        .and_then(|c| FunctionMode::from_keyword(&c[1]));

    let (return_type, return_table) = parse_return(&rest);
    function.return_type = return_type;
    function.return_table = return_table;

    function
}

/// Parse one argument: `[mode] [name] type [default expr | = expr]`.
fn parse_argument(fragment: &str) -> Option<FunctionArgument> {
    let clean = COMMENT_RE.replace_all(fragment, " ");
    let clean = clean.trim();
    if clean.is_empty() {
        return None;
    }

    let (head, default_value) = match ARG_DEFAULT_RE.captures(clean) {
        Some(caps) => (
            caps.get(1).map(|m| m.as_str()).unwrap_or(""),
            caps.get(2).map(|m| m.as_str().trim().to_string()),
        ),
        None => (clean, None),
    };

    let mut words: Vec<&str> = head.split_whitespace().collect();
    let mut mode = ArgumentMode::default();
    if words.len() > 1 {
        if let Some(explicit) = ArgumentMode::from_keyword(words[0]) {
            mode = explicit;
            words.remove(0);
        }
    }

    let (name, arg_type) = match words.len() {
        0 => return None,
        1 => (String::new(), words[0].to_string()),
        _ => (unquote_ident(words[0]).to_string(), words[1..].join(" ")),
    };

    Some(FunctionArgument {
        mode,
        name,
        arg_type,
        default_value,
    })
}

/// Detect the return shape from the text following the argument list.
fn parse_return(rest: &str) -> (ReturnType, Option<Vec<crate::model::DatabaseTableField>>) {
    if let Some(m) = RETURNS_TABLE_RE.find(rest) {
        let columns = extract_parenthesized(rest, m.end() - 1)
            .map(|(body, _)| {
                split_top_level(body)
                    .iter()
                    .filter_map(|fragment| parse_field(fragment, ""))
                    .collect()
            })
            .unwrap_or_default();
        return (ReturnType::Table, Some(columns));
    }

    let Some(caps) = RETURNS_RE.captures(rest) else {
        return (ReturnType::Void, None);
    };
    let declared = caps[1].trim().to_string();
    (ReturnType::from(declared), None)
}

/// Remove `$tag$ ... $tag$` bodies so keywords inside them are not matched.
fn strip_dollar_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = DOLLAR_TAG_RE.find(rest) {
        out.push_str(&rest[..open.start()]);
        let tag = open.as_str();
        let after_open = &rest[open.end()..];
        match after_open.find(tag) {
            Some(close) => rest = &after_open[close + tag.len()..],
            None => {
                rest = "";
                break;
            }
        }
        out.push(' ');
    }
    out.push_str(rest);
    out
}
