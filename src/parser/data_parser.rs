//! Data script analysis

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{DatabaseData, DatabaseSubObject};
use crate::util::unquote_ident;

static INSERT_INTO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\binsert\s+into\s+(?:"?\w+"?\s*\.\s*)?("?\w+"?)"#).unwrap()
});

/// Analyze a data script, recording each table it inserts into once, in
/// order of first appearance.
pub fn parse_data(base: DatabaseSubObject, sql: &str) -> DatabaseData {
    let mut data = DatabaseData::from_sub_object(base);
    for caps in INSERT_INTO_RE.captures_iter(sql) {
        let table = unquote_ident(&caps[1]);
        if !data.target_tables.iter().any(|t| t == table) {
            data.target_tables.push(table.to_string());
        }
    }
    data
}
