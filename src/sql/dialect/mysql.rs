//! MySQL / MariaDB dialect.
//!
//! - Backtick identifier quoting
//! - Numeric 1/0 boolean literals
//! - LIMIT/OFFSET pagination
//! - GROUP_CONCAT instead of STRING_AGG

use super::helpers;
use super::SqlDialect;

/// MySQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        match name.to_uppercase().as_str() {
            "STRING_AGG" => Some("GROUP_CONCAT"),
            _ => None,
        }
    }

    fn default_port(&self) -> u16 {
        3306
    }
}
