//! Closed enums used by the configuration model.
//!
//! Every enum here is a tagged variant set with exhaustive matching in the
//! builders; adding a variant causes compile errors at each dispatch site.

use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// Semantic data type of a selected field.
///
/// Drives literal formatting only; the compiler never inspects database
/// column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Integer,
    Decimal,
    Currency,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    Time,
    Boolean,
    Text,
    Json,
    Binary,
    Uuid,
}

impl DataType {
    /// Whether literals of this type render as quoted strings.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            DataType::String
                | DataType::Text
                | DataType::Uuid
                | DataType::Date
                | DataType::DateTime
                | DataType::Time
                | DataType::Json
                | DataType::Binary
        )
    }

    /// Whether literals of this type render unquoted when numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Number | DataType::Integer | DataType::Decimal | DataType::Currency
        )
    }
}

/// SQL set functions supported in the SELECT list.
///
/// Deserializes through `TryFrom<String>` so an unknown aggregation name in
/// a payload surfaces as [`CompileError::UnsupportedAggregation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Aggregation {
    Sum,
    Count,
    CountDistinct,
    Avg,
    Min,
    Max,
    /// String aggregation; rendered via the dialect function remap
    /// (STRING_AGG, or GROUP_CONCAT on MySQL).
    Concat,
}

impl Aggregation {
    /// Canonical SQL function name before dialect remapping.
    pub fn function_name(&self) -> &'static str {
        match self {
            Aggregation::Sum => "SUM",
            Aggregation::Count | Aggregation::CountDistinct => "COUNT",
            Aggregation::Avg => "AVG",
            Aggregation::Min => "MIN",
            Aggregation::Max => "MAX",
            Aggregation::Concat => "STRING_AGG",
        }
    }
}

impl TryFrom<String> for Aggregation {
    type Error = CompileError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(Aggregation::Sum),
            "count" => Ok(Aggregation::Count),
            "count_distinct" => Ok(Aggregation::CountDistinct),
            "avg" | "average" => Ok(Aggregation::Avg),
            "min" => Ok(Aggregation::Min),
            "max" => Ok(Aggregation::Max),
            "concat" | "string_agg" | "group_concat" => Ok(Aggregation::Concat),
            other => Err(CompileError::UnsupportedAggregation(other.to_string())),
        }
    }
}

/// Filter comparison operators.
///
/// Deserializes through `TryFrom<String>` so an unknown operator string in a
/// payload surfaces as [`CompileError::UnsupportedOperator`] instead of a
/// generic serde error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Between,
    In,
    Like,
    StartsWith,
    EndsWith,
    IsNull,
    IsNotNull,
}

impl TryFrom<String> for FilterOperator {
    type Error = CompileError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "equals" | "eq" => Ok(FilterOperator::Equals),
            "not_equals" | "neq" => Ok(FilterOperator::NotEquals),
            "greater_than" | "gt" => Ok(FilterOperator::GreaterThan),
            "greater_than_or_equal" | "gte" => Ok(FilterOperator::GreaterThanOrEqual),
            "less_than" | "lt" => Ok(FilterOperator::LessThan),
            "less_than_or_equal" | "lte" => Ok(FilterOperator::LessThanOrEqual),
            "between" => Ok(FilterOperator::Between),
            "in" => Ok(FilterOperator::In),
            // "contains" is a legacy alias for like
            "like" | "contains" => Ok(FilterOperator::Like),
            "starts_with" => Ok(FilterOperator::StartsWith),
            "ends_with" => Ok(FilterOperator::EndsWith),
            "is_null" => Ok(FilterOperator::IsNull),
            "is_not_null" => Ok(FilterOperator::IsNotNull),
            other => Err(CompileError::UnsupportedOperator(other.to_string())),
        }
    }
}

/// Logical connective to the next filter in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connective {
    #[default]
    And,
    Or,
}

/// Type of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

/// Comparison operator for a join condition column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    #[default]
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}
