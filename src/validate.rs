//! Structural validation of a configuration, run before compilation.
//!
//! Everything here fails fast: no SQL is generated and no connection is
//! opened once a configuration is rejected.

use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::model::{Aggregation, FieldConfiguration, QueryConfiguration};
use crate::sql::ident::check_identifier;

/// Validate the structural invariants of a configuration.
///
/// Rejects empty field/table lists, sentinel identifiers, wildcard fields
/// outside `COUNT(*)`, and fields whose table is not declared in `tables`.
/// A mix of aggregated and non-aggregated fields is *not* an error: the
/// compiler resolves it by inferring GROUP BY, so it is only logged.
pub fn validate(config: &QueryConfiguration) -> CompileResult<()> {
    if config.fields.is_empty() {
        return Err(CompileError::InvalidConfiguration(
            "query must have at least one field".into(),
        ));
    }
    if config.tables.is_empty() {
        return Err(CompileError::InvalidConfiguration(
            "query must specify at least one table".into(),
        ));
    }

    // Pagination values render as i64 literals downstream.
    for (name, value) in [("limit", config.limit), ("offset", config.offset)] {
        if let Some(v) = value {
            if i64::try_from(v).is_err() {
                return Err(CompileError::InvalidConfiguration(format!(
                    "{} {} exceeds the supported range",
                    name, v
                )));
            }
        }
    }

    for field in &config.fields {
        validate_field(field)?;

        if !table_is_declared(field, &config.tables) {
            return Err(CompileError::InvalidConfiguration(format!(
                "field '{}' references table '{}' which is not in the table list",
                field.alias, field.table
            )));
        }
    }

    let aggregated = config.fields.iter().filter(|f| f.aggregation.is_some()).count();
    let plain = config.fields.iter().filter(|f| f.is_groupable()).count();
    if aggregated > 0 && plain > 0 {
        debug!(
            aggregated,
            plain, "mixed aggregated and plain fields; GROUP BY will be inferred"
        );
    }

    Ok(())
}

fn validate_field(field: &FieldConfiguration) -> CompileResult<()> {
    check_identifier(&field.table)?;
    check_identifier(&field.alias)?;
    if let Some(schema) = &field.schema {
        check_identifier(schema)?;
    }

    if field.field == "*" {
        // The wildcard is only meaningful as COUNT(*).
        if field.aggregation != Some(Aggregation::Count) {
            return Err(CompileError::InvalidConfiguration(format!(
                "field '{}' uses the wildcard without COUNT aggregation",
                field.alias
            )));
        }
    } else {
        check_identifier(&field.field)?;
    }

    Ok(())
}

/// A field's table is declared when the table list contains it exactly,
/// as a schema-qualified match, or as the unqualified suffix of a
/// qualified entry.
fn table_is_declared(field: &FieldConfiguration, tables: &[String]) -> bool {
    let qualified = field
        .schema
        .as_ref()
        .map(|s| format!("{}.{}", s, field.table));

    tables.iter().any(|entry| {
        if *entry == field.table {
            return true;
        }
        if let Some(q) = &qualified {
            if entry == q {
                return true;
            }
        }
        match entry.split_once('.') {
            Some((_, unqualified)) => unqualified == field.table,
            None => false,
        }
    })
}
