//! Expression builders - one pure function per SQL clause.
//!
//! Each builder renders its fragment as a [`TokenStream`]; the compiler
//! assembles them in the fixed clause order. Builders never do I/O and
//! never mutate the configuration, so compilation is deterministic and safe
//! to run concurrently.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{CompileError, CompileResult};
use crate::model::{
    Aggregation, CompareOp, Connective, DataType, FieldConfiguration, FilterConfiguration,
    FilterOperator, JoinConfiguration, JoinType, OrderConfiguration, QueryConfiguration, SortDir,
};
use crate::sql::dialect::{Dialect, SqlDialect};
use crate::sql::ident;
use crate::sql::token::{Token, TokenStream};
use crate::sql::value::{format_as_string, format_value};

// =============================================================================
// Field references
// =============================================================================

/// Render one field as it appears outside the SELECT list (no alias).
///
/// Raw expressions win over everything; aggregations wrap the qualified
/// reference; otherwise the plain qualified reference is emitted.
pub fn field_reference(field: &FieldConfiguration, dialect: Dialect) -> CompileResult<TokenStream> {
    if let Some(expression) = &field.expression {
        let mut ts = TokenStream::new();
        ts.push(Token::Raw(expression.clone()));
        return Ok(ts);
    }

    match field.aggregation {
        Some(agg) => aggregate_reference(field, agg, dialect),
        None => plain_reference(field),
    }
}

fn plain_reference(field: &FieldConfiguration) -> CompileResult<TokenStream> {
    let mut ts = TokenStream::new();
    if let Some(schema) = &field.schema {
        ts.push(ident::ident(schema)?).push(Token::Dot);
    }
    ts.push(ident::ident(&field.table)?)
        .push(Token::Dot)
        .push(ident::ident(&field.field)?);
    Ok(ts)
}

fn aggregate_reference(
    field: &FieldConfiguration,
    agg: Aggregation,
    dialect: Dialect,
) -> CompileResult<TokenStream> {
    let mut ts = TokenStream::new();
    ts.push(Token::FunctionName(agg.function_name().into()));
    ts.lparen();

    match agg {
        // COUNT(*) is the one place a wildcard bypasses identifier escaping.
        Aggregation::Count if field.field == "*" => {
            ts.push(Token::Star);
        }
        Aggregation::Count => {
            ts.append(&plain_reference(field)?);
        }
        Aggregation::CountDistinct => {
            ts.push(Token::Distinct).space();
            ts.append(&plain_reference(field)?);
        }
        Aggregation::Concat => {
            ts.append(&plain_reference(field)?);
            // GROUP_CONCAT has a default separator; STRING_AGG requires one.
            if dialect.remap_function("STRING_AGG").is_none() {
                ts.comma().space().push(Token::LitString(",".into()));
            }
        }
        Aggregation::Sum | Aggregation::Avg | Aggregation::Min | Aggregation::Max => {
            ts.append(&plain_reference(field)?);
        }
    }

    ts.rparen();
    Ok(ts)
}

// =============================================================================
// SELECT
// =============================================================================

/// Render the SELECT clause, one aliased item per field.
///
/// `top` carries the dialect's TOP limit when the compiler decided the
/// pagination is satisfied in the SELECT clause itself.
pub fn select_clause(
    fields: &[FieldConfiguration],
    top: Option<u64>,
    dialect: Dialect,
) -> CompileResult<TokenStream> {
    let mut ts = TokenStream::new();
    ts.push(Token::Select);

    if let Some(n) = top {
        ts.space().push(Token::Top).space().push(Token::LitInt(n as i64));
    }

    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            ts.comma();
        }
        ts.space();
        ts.append(&field_reference(field, dialect)?);
        ts.space()
            .push(Token::As)
            .space()
            .push(ident::ident(&field.alias)?);
    }

    Ok(ts)
}

// =============================================================================
// FROM / JOIN
// =============================================================================

/// Render the FROM clause from a `"table"` or `"schema.table"` entry.
pub fn from_clause(table: &str) -> CompileResult<TokenStream> {
    let mut ts = TokenStream::new();
    ts.push(Token::From)
        .space()
        .push(ident::table_reference(table)?);
    Ok(ts)
}

/// Render all JOIN clauses, one per line, conditions conjoined with AND.
pub fn join_clauses(joins: &[JoinConfiguration]) -> CompileResult<TokenStream> {
    let mut ts = TokenStream::new();

    for (i, join) in joins.iter().enumerate() {
        if i > 0 {
            ts.newline();
        }

        match join.join_type {
            JoinType::Inner => ts.push(Token::Inner),
            JoinType::Left => ts.push(Token::Left),
            JoinType::Right => ts.push(Token::Right),
            JoinType::Full => ts.push(Token::Full).space().push(Token::Outer),
        };
        ts.space().push(Token::Join).space();
        ts.push(ident::qualified(
            join.right.schema.as_deref(),
            &join.right.table,
        )?);
        ts.space().push(Token::On).space();

        if join.conditions.is_empty() {
            return Err(CompileError::InvalidConfiguration(format!(
                "join on table '{}' has no conditions",
                join.right.table
            )));
        }

        for (c, cond) in join.conditions.iter().enumerate() {
            if c > 0 {
                ts.space().push(Token::And).space();
            }
            ts.push(ident::qualified(
                join.left.schema.as_deref(),
                &join.left.table,
            )?)
            .push(Token::Dot)
            .push(ident::ident(&cond.left_column)?);
            ts.space().push(compare_token(cond.operator)).space();
            ts.push(ident::qualified(
                join.right.schema.as_deref(),
                &join.right.table,
            )?)
            .push(Token::Dot)
            .push(ident::ident(&cond.right_column)?);
        }
    }

    Ok(ts)
}

fn compare_token(op: CompareOp) -> Token {
    match op {
        CompareOp::Eq => Token::Eq,
        CompareOp::Ne => Token::Ne,
        CompareOp::Lt => Token::Lt,
        CompareOp::Lte => Token::Lte,
        CompareOp::Gt => Token::Gt,
        CompareOp::Gte => Token::Gte,
    }
}

// =============================================================================
// WHERE / HAVING
// =============================================================================

/// Render a filter list (used for both WHERE and HAVING).
///
/// A filter's connective belongs to the predicate that precedes it: it is
/// appended after that filter's own condition when more filters follow,
/// defaulting to AND.
pub fn filter_list(
    filters: &[FilterConfiguration],
    parameters: &HashMap<String, Value>,
    dialect: Dialect,
) -> CompileResult<TokenStream> {
    let mut ts = TokenStream::new();

    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            ts.space();
        }
        ts.append(&filter_condition(filter, parameters, dialect)?);

        if i + 1 < filters.len() {
            ts.space().push(match filter.connective.unwrap_or_default() {
                Connective::And => Token::And,
                Connective::Or => Token::Or,
            });
        }
    }

    Ok(ts)
}

fn filter_condition(
    filter: &FilterConfiguration,
    parameters: &HashMap<String, Value>,
    dialect: Dialect,
) -> CompileResult<TokenStream> {
    // Parameter-bound filters resolve their value at compile time; a missing
    // parameter behaves like an absent value (SQL NULL).
    let resolved: Option<&Value> = if filter.is_parameter {
        filter
            .parameter_name
            .as_deref()
            .and_then(|name| parameters.get(name))
    } else {
        filter.value.as_ref()
    };

    let mut ts = field_reference(&filter.field, dialect)?;
    let data_type = filter.field.data_type;

    match filter.operator {
        FilterOperator::Equals => {
            ts.space().push(Token::Eq).space();
            ts.push(format_value(resolved, data_type));
        }
        FilterOperator::NotEquals => {
            ts.space().push(Token::Ne).space();
            ts.push(format_value(resolved, data_type));
        }
        FilterOperator::GreaterThan => {
            ts.space().push(Token::Gt).space();
            ts.push(format_value(resolved, data_type));
        }
        FilterOperator::GreaterThanOrEqual => {
            ts.space().push(Token::Gte).space();
            ts.push(format_value(resolved, data_type));
        }
        FilterOperator::LessThan => {
            ts.space().push(Token::Lt).space();
            ts.push(format_value(resolved, data_type));
        }
        FilterOperator::LessThanOrEqual => {
            ts.space().push(Token::Lte).space();
            ts.push(format_value(resolved, data_type));
        }
        FilterOperator::Between => {
            let (start, end) = between_bounds(resolved);
            ts.space().push(Token::Between).space();
            ts.push(format_value(start, data_type));
            ts.space().push(Token::And).space();
            ts.push(format_value(end, data_type));
        }
        FilterOperator::In => {
            match resolved {
                Some(Value::Array(items)) if items.is_empty() => {
                    // `IN ()` is invalid SQL; an empty list matches nothing.
                    ts = TokenStream::new();
                    ts.push(Token::LitInt(1))
                        .space()
                        .push(Token::Eq)
                        .space()
                        .push(Token::LitInt(0));
                }
                Some(Value::Array(items)) => {
                    ts.space().push(Token::In).space().lparen();
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            ts.comma().space();
                        }
                        ts.push(format_value(Some(item), data_type));
                    }
                    ts.rparen();
                }
                other => {
                    // Scalar degenerates to a single-element list.
                    ts.space().push(Token::In).space().lparen();
                    ts.push(format_value(other, data_type));
                    ts.rparen();
                }
            }
        }
        FilterOperator::Like => {
            ts.space().push(Token::Like).space();
            ts.push(wildcard(resolved, "%", "%"));
        }
        FilterOperator::StartsWith => {
            ts.space().push(Token::Like).space();
            ts.push(wildcard(resolved, "", "%"));
        }
        FilterOperator::EndsWith => {
            ts.space().push(Token::Like).space();
            ts.push(wildcard(resolved, "%", ""));
        }
        FilterOperator::IsNull => {
            ts.space().push(Token::IsNull);
        }
        FilterOperator::IsNotNull => {
            ts.space().push(Token::IsNotNull);
        }
    }

    Ok(ts)
}

fn between_bounds(value: Option<&Value>) -> (Option<&Value>, Option<&Value>) {
    match value {
        Some(Value::Object(map)) => (map.get("start"), map.get("end")),
        Some(Value::Array(items)) => (items.first(), items.get(1)),
        _ => (None, None),
    }
}

/// Wildcarding always forces string-style quoting, whatever the field's
/// declared type.
fn wildcard(value: Option<&Value>, prefix: &str, suffix: &str) -> Token {
    let text = value.map(format_as_string).unwrap_or_default();
    Token::LitString(format!("{}{}{}", prefix, text, suffix))
}

// =============================================================================
// GROUP BY
// =============================================================================

/// Compute the GROUP BY references for a configuration.
///
/// SQL requires every non-aggregated selected column to appear in GROUP BY,
/// so when any field is aggregated, every other plain field is grouped
/// automatically; explicit groupBy entries are merged in afterwards. Both
/// sets are deduplicated by rendered reference. With no aggregation at all,
/// no GROUP BY is emitted.
pub fn group_by_references(
    config: &QueryConfiguration,
    dialect: Dialect,
) -> CompileResult<Vec<TokenStream>> {
    if !config.has_aggregation() {
        return Ok(vec![]);
    }

    let mut seen: Vec<String> = vec![];
    let mut refs: Vec<TokenStream> = vec![];

    let inferred = config.fields.iter().filter(|f| f.is_groupable());
    for field in inferred.chain(config.group_by.iter()) {
        let ts = if field.is_groupable() {
            plain_reference(field)?
        } else {
            field_reference(field, dialect)?
        };
        let rendered = ts.serialize(dialect);
        if !seen.contains(&rendered) {
            seen.push(rendered);
            refs.push(ts);
        }
    }

    Ok(refs)
}

/// Render the GROUP BY clause from precomputed references.
pub fn group_by_clause(refs: &[TokenStream]) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::GroupBy).space();
    for (i, group_ref) in refs.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.append(group_ref);
    }
    ts
}

// =============================================================================
// ORDER BY
// =============================================================================

/// Render the ORDER BY clause.
///
/// Entries sort ascending by priority before rendering; the sort is stable,
/// so ties keep input order. Aggregated order fields render through the same
/// aggregate logic as SELECT items.
pub fn order_by_clause(
    order_by: &[OrderConfiguration],
    dialect: Dialect,
) -> CompileResult<TokenStream> {
    let mut entries: Vec<&OrderConfiguration> = order_by.iter().collect();
    entries.sort_by_key(|o| o.priority);

    let mut ts = TokenStream::new();
    ts.push(Token::OrderBy).space();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.append(&field_reference(&entry.field, dialect)?);
        ts.space().push(match entry.direction {
            SortDir::Asc => Token::Asc,
            SortDir::Desc => Token::Desc,
        });
    }

    Ok(ts)
}

/// Synthesize the default ordering required by OFFSET pagination on
/// dialects that demand one: the first selected field ascending, or the
/// `(SELECT NULL)` placeholder when there are no fields to order by.
pub fn default_order_by(
    fields: &[FieldConfiguration],
    dialect: Dialect,
) -> CompileResult<TokenStream> {
    let mut ts = TokenStream::new();
    ts.push(Token::OrderBy).space();

    match fields.first() {
        Some(field) => {
            ts.append(&field_reference(field, dialect)?);
            ts.space().push(Token::Asc);
        }
        None => {
            // Syntactically valid but non-deterministic; pagination over an
            // unordered set can repeat or skip rows between pages.
            ts.lparen()
                .push(Token::Select)
                .space()
                .push(Token::Null)
                .rparen();
        }
    }

    Ok(ts)
}

// =============================================================================
// Tests
// =============================================================================
