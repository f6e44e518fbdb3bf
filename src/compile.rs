//! Query compiler - orchestrates validation and clause builders into one
//! SQL string for a target dialect.
//!
//! The clause order is load-bearing: GROUP BY is computed before ORDER BY
//! validity is checked, and the TOP-vs-OFFSET decision precedes both SELECT
//! and final LIMIT rendering.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::error::CompileResult;
use crate::model::QueryConfiguration;
use crate::sql::builder;
use crate::sql::dialect::{Dialect, SqlDialect};
use crate::sql::token::Token;
use crate::validate;

/// Compile a configuration into SQL text for the given dialect.
///
/// Pure and deterministic: identical `(config, parameters, dialect)` inputs
/// always yield identical SQL. Runtime parameters bound to filters via
/// `isParameter` are resolved here, at compile time; `@name` tokens in the
/// resulting text are the execution engine's concern.
pub fn compile(
    config: &QueryConfiguration,
    parameters: &HashMap<String, Value>,
    dialect: Dialect,
) -> CompileResult<String> {
    validate::validate(config)?;

    // A limit with no offset is satisfied by TOP on dialects that have it,
    // making the trailing pagination clause (and its ORDER BY requirement)
    // unnecessary.
    let offset = config.offset.unwrap_or(0);
    let top = if dialect.uses_top_for_limit() && config.limit.is_some() && offset == 0 {
        config.limit
    } else {
        None
    };

    let mut ts = builder::select_clause(&config.fields, top, dialect)?;

    ts.newline().append(&builder::from_clause(&config.tables[0])?);

    let joins = builder::join_clauses(&config.joins)?;
    if !joins.is_empty() {
        ts.newline().append(&joins);
    }

    if !config.filters.is_empty() {
        ts.newline().push(Token::Where).space();
        ts.append(&builder::filter_list(&config.filters, parameters, dialect)?);
    }

    let group_refs = builder::group_by_references(config, dialect)?;
    if !group_refs.is_empty() {
        ts.newline().append(&builder::group_by_clause(&group_refs));
    }

    if !config.having.is_empty() {
        ts.newline().push(Token::Having).space();
        ts.append(&builder::filter_list(&config.having, parameters, dialect)?);
    }

    // Pagination still owed after the TOP decision.
    let pagination_pending = (config.limit.is_some() && top.is_none()) || offset > 0;

    if !config.order_by.is_empty() {
        ts.newline()
            .append(&builder::order_by_clause(&config.order_by, dialect)?);
    } else if pagination_pending && dialect.requires_order_by_for_offset() {
        ts.newline()
            .append(&builder::default_order_by(&config.fields, dialect)?);
    }

    if pagination_pending {
        ts.newline();
        ts.append(&dialect.emit_limit_offset(config.limit, config.offset));
    }

    let sql = ts.serialize(dialect).trim().to_string();
    debug!(dialect = %dialect, bytes = sql.len(), "compiled query");
    Ok(sql)
}
