//! Token-based SQL normalisation ahead of regex analysis
//!
//! The object analyzers match structure with regular expressions, which only
//! works on a predictable shape of text. This module rebuilds a SQL file from
//! its tokens into a single line:
//!
//! 1. Whitespace runs (spaces, tabs, newlines) become one space
//! 2. Comments without a `#tag` are dropped
//! 3. Comments carrying a `#tag` are kept as `/* ... */` (line comments are
//!    converted so they survive the newline collapse)
//! 4. String literals, quoted identifiers and parentheses are kept as written
//!
//! When the tokenizer rejects the input (unterminated literal, stray
//! character) a regex-based fallback produces the same shape with less
//! precision around comments inside literals.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*(.*?)\*/|--([^\n]*)").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapse a SQL file into the single-line form the analyzers expect.
pub fn simplify_for_analysis(sql: &str) -> String {
    let sql = sql.strip_prefix('\u{FEFF}').unwrap_or(sql);
    match SimplifyTokenParser::new(sql) {
        Some(parser) => parser.simplify(),
        None => simplify_with_regex(sql),
    }
}

/// Rebuilds SQL text token by token.
struct SimplifyTokenParser {
    tokens: Vec<Token>,
}

impl SimplifyTokenParser {
    fn new(sql: &str) -> Option<Self> {
        let dialect = PostgreSqlDialect {};
        let tokens = Tokenizer::new(&dialect, sql).tokenize().ok()?;
        Some(Self { tokens })
    }

    fn simplify(&self) -> String {
        let mut out = String::new();
        let mut pending_space = false;

        for token in &self.tokens {
            let comment = match token {
                Token::Whitespace(Whitespace::SingleLineComment { comment, .. }) => Some(comment),
                Token::Whitespace(Whitespace::MultiLineComment(comment)) => Some(comment),
                Token::Whitespace(_) => {
                    pending_space = true;
                    continue;
                }
                _ => None,
            };

            if let Some(comment) = comment {
                // Kept comments always stand apart from their neighbours
                if let Some(kept) = tag_comment(comment) {
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    out.push_str(&kept);
                }
                pending_space = true;
                continue;
            }

            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push_str(&token_to_string(token));
        }

        out
    }
}

/// Render a token the way it was written in the source.
fn token_to_string(token: &Token) -> String {
    match token {
        Token::SingleQuotedString(s) => format!("'{}'", s.replace('\'', "''")),
        Token::NationalStringLiteral(s) => format!("N'{}'", s.replace('\'', "''")),
        other => other.to_string(),
    }
}

/// Keep a comment only when it carries a tag, normalised to block form.
fn tag_comment(comment: &str) -> Option<String> {
    if !comment.contains('#') {
        return None;
    }
    let body = WHITESPACE_RE.replace_all(comment.trim(), " ");
    Some(format!("/* {} */", body))
}

/// Fallback used when the tokenizer gives up on the input.
fn simplify_with_regex(sql: &str) -> String {
    let without_noise = COMMENT_RE.replace_all(sql, |caps: &Captures| {
        let body = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or("");
        match tag_comment(body) {
            Some(kept) => format!(" {} ", kept),
            None => " ".to_string(),
        }
    });
    WHITESPACE_RE
        .replace_all(&without_noise, " ")
        .trim()
        .to_string()
}
