//! Literal value formatting by semantic type.
//!
//! Runtime values arrive as `serde_json::Value`, so each formatting rule has
//! to tolerate upstream type-detection errors: a numeric field may carry a
//! non-numeric string, a boolean may arrive as `"true"`. The declared
//! [`DataType`] decides the rendering, the actual JSON value decides the
//! fallbacks.

use serde_json::Value;

use crate::model::DataType;
use crate::sql::token::Token;

/// Format a runtime value as a literal token for the given semantic type.
///
/// Pure function: the same value/type pair always yields the same token.
pub fn format_value(value: Option<&Value>, data_type: DataType) -> Token {
    let value = match value {
        None | Some(Value::Null) => return Token::Null,
        Some(v) => v,
    };

    match data_type {
        DataType::Boolean => Token::LitBool(truthy(value)),

        dt if dt.is_numeric() => format_numeric(value),

        // JSON values are serialized before quoting, whatever their shape.
        DataType::Json => Token::LitString(value.to_string()),

        // Remaining textual types quote the value as-is.
        _ => Token::LitString(as_plain_string(value)),
    }
}

/// Format a value as a string literal regardless of its declared type.
///
/// LIKE-style wildcarding always compares against text, so the builders use
/// this when wrapping values in `%`.
pub fn format_as_string(value: &Value) -> String {
    as_plain_string(value)
}

fn format_numeric(value: &Value) -> Token {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Token::LitInt(i)
            } else {
                Token::LitFloat(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                Token::LitInt(i)
            } else {
                match trimmed.parse::<f64>() {
                    Ok(f) if f.is_finite() => Token::LitFloat(f),
                    // Quoted fallback for non-numeric strings under a
                    // numeric declared type. "NaN", "inf", and overflow
                    // notations like "1e999" parse but have no SQL
                    // numeric literal form, so they take it too.
                    _ => Token::LitString(s.clone()),
                }
            }
        }
        Value::Bool(b) => Token::LitInt(i64::from(*b)),
        other => Token::LitString(other.to_string()),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true") || s == "1",
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

fn as_plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
