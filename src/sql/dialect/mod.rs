//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for SQL dialect differences.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `"` (Postgres), `` ` `` (MySQL), `[]` (T-SQL)
//! - Pagination: LIMIT/OFFSET vs TOP / OFFSET FETCH
//! - Boolean literals: true/false vs 1/0
//! - Aggregate function names: STRING_AGG vs GROUP_CONCAT
//!
//! The dialect registry lives here too: [`Dialect::from_name`] maps the
//! family of names a user might type for the same engine to one canonical
//! dialect, and [`Dialect::default_port`] supplies connection defaults.

pub mod helpers;
mod mysql;
mod postgres;
mod tsql;

pub use mysql::MySql;
pub use postgres::Postgres;
pub use tsql::TSql;

use super::token::TokenStream;
use crate::error::CompileError;

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    /// Quote an identifier (table, column, alias).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// All dialects use single quotes with `''` for escaping.
    /// Override for Unicode prefix (T-SQL N'...').
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    fn format_bool(&self, b: bool) -> &'static str;

    /// Emit LIMIT/OFFSET or equivalent pagination clause.
    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_standard(limit, offset)
    }

    /// Whether this dialect requires ORDER BY for OFFSET pagination.
    ///
    /// T-SQL requires ORDER BY when using OFFSET FETCH.
    fn requires_order_by_for_offset(&self) -> bool {
        false
    }

    /// Whether a limit with no offset renders as `TOP n` in the SELECT
    /// clause instead of a trailing pagination clause.
    fn uses_top_for_limit(&self) -> bool {
        false
    }

    /// Remap a function name for this dialect.
    ///
    /// Returns `Some(new_name)` if the function should be remapped, `None`
    /// to keep the original. Matched case-insensitively.
    fn remap_function(&self, name: &str) -> Option<&'static str> {
        let _ = name;
        None
    }

    /// Default server port for this engine family.
    fn default_port(&self) -> u16;
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    TSql,
    Postgres,
    MySql,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::TSql => &TSql,
            Dialect::Postgres => &Postgres,
            Dialect::MySql => &MySql,
        }
    }

    /// Resolve a logical database-type name to a dialect.
    ///
    /// Accepts the common synonyms for each engine family,
    /// case-insensitively. Unknown names fail with
    /// [`CompileError::UnsupportedDialect`]; there is no fallback.
    pub fn from_name(name: &str) -> Result<Self, CompileError> {
        match name.trim().to_lowercase().as_str() {
            "tsql" | "mssql" | "sqlserver" | "sql_server" | "azure" => Ok(Dialect::TSql),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            _ => Err(CompileError::UnsupportedDialect(name.to_string())),
        }
    }

    /// Default server port for this engine family.
    pub fn default_port(&self) -> u16 {
        self.dialect().default_port()
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        self.dialect().emit_limit_offset(limit, offset)
    }

    fn requires_order_by_for_offset(&self) -> bool {
        self.dialect().requires_order_by_for_offset()
    }

    fn uses_top_for_limit(&self) -> bool {
        self.dialect().uses_top_for_limit()
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.dialect().remap_function(name)
    }

    fn default_port(&self) -> u16 {
        self.dialect().default_port()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}
