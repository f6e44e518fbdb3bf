//! Runtime parameter substitution.
//!
//! Parameters reach the SQL text as `@name` tokens and are replaced
//! textually: strings quoted with doubled single quotes, everything else
//! stringified. Values are escaped, not bound; the `Connection` trait is
//! the seam for driver-native binding.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

static PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z_][A-Za-z0-9_]*)").expect("parameter pattern is valid"));

/// Replace each `@name` token with its formatted value.
///
/// Tokens with no matching parameter are left untouched.
pub fn substitute_parameters(sql: &str, parameters: &HashMap<String, Value>) -> String {
    PARAM_RE
        .replace_all(sql, |caps: &Captures| match parameters.get(&caps[1]) {
            Some(value) => format_parameter(value),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn format_parameter(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        other => other.to_string(),
    }
}
