//! PostgreSQL dialect.
//!
//! Postgres is the LIMIT-style baseline: ANSI double-quote identifiers,
//! true/false boolean literals, LIMIT/OFFSET pagination with no ORDER BY
//! requirement.

use super::helpers;
use super::SqlDialect;

/// PostgreSQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn default_port(&self) -> u16 {
        5432
    }
}
