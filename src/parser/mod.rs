//! PostgreSQL DDL analysis
//!
//! Parsing is deliberately lenient: source text is simplified with the
//! sqlparser tokenizer, then tables, functions and data scripts are read with
//! targeted regexes. Anything unrecognised yields an empty record rather than
//! an error.

mod analyzer;
mod data_parser;
mod field_parser;
mod fragments;
mod function_parser;
mod simplify;
mod table_parser;
mod tags;

pub use analyzer::ObjectAnalyzer;
pub use data_parser::parse_data;
pub use field_parser::{parse_field, AUDIT_COLUMNS};
pub use fragments::{extract_parenthesized, split_top_level};
pub use function_parser::parse_function;
pub use simplify::simplify_for_analysis;
pub use table_parser::{decompose_table_name, parse_table, TableNameParts};
pub use tags::{extract_tag_list, extract_tags, Tag, TagMap, TagValue};
