//! Identifier checks and references.
//!
//! Configurations arrive from JSON payloads where an absent value can leak
//! through as the literal string `"undefined"` or `"null"`. Every identifier
//! passes through [`check_identifier`] before it can reach the token stream,
//! so malformed names fail compilation instead of producing broken SQL.

use crate::error::{CompileError, CompileResult};
use crate::sql::token::Token;

/// Validate an identifier, rejecting empty strings and the sentinel
/// strings `"undefined"` / `"null"`.
pub fn check_identifier(name: &str) -> CompileResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("undefined")
        || trimmed.eq_ignore_ascii_case("null")
    {
        return Err(CompileError::InvalidIdentifier(name.to_string()));
    }
    Ok(trimmed)
}

/// Build an identifier token after validation.
pub fn ident(name: &str) -> CompileResult<Token> {
    Ok(Token::Ident(check_identifier(name)?.to_string()))
}

/// Build a schema-qualified reference token.
///
/// The schema, when present, is held to the same identifier rules as the
/// table.
pub fn qualified(schema: Option<&str>, table: &str) -> CompileResult<Token> {
    let schema = match schema {
        Some(s) => Some(check_identifier(s)?.to_string()),
        None => None,
    };
    Ok(Token::QualifiedIdent {
        schema,
        name: check_identifier(table)?.to_string(),
    })
}

/// Build a table reference from `"table"` or `"schema.table"` notation.
pub fn table_reference(raw: &str) -> CompileResult<Token> {
    match raw.split_once('.') {
        Some((schema, table)) => qualified(Some(schema), table),
        None => qualified(None, raw),
    }
}
