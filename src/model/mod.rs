//! Configuration model - the declarative description of a report query.
//!
//! A [`QueryConfiguration`] is constructed fresh per compile call and is
//! immutable during compilation. External names are camelCase because the
//! configuration arrives as JSON from the report designer.

pub mod types;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use types::{
    Aggregation, CompareOp, Connective, DataType, FilterOperator, JoinType, SortDir,
};

/// One selected value in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfiguration {
    /// Optional schema the table lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Source table name.
    pub table: String,
    /// Column name, or `*` (only valid under COUNT).
    pub field: String,
    /// Output alias; becomes the column name in result rows.
    pub alias: String,
    /// Semantic type used for literal formatting.
    pub data_type: DataType,
    /// Optional set function applied to the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    /// Raw SQL expression overriding table/field rendering.
    ///
    /// Rendered verbatim; must come from trusted report definitions, never
    /// from end-user input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl FieldConfiguration {
    /// Plain (non-aggregated, non-expression) column reference.
    pub fn new(table: &str, field: &str, alias: &str, data_type: DataType) -> Self {
        Self {
            schema: None,
            table: table.into(),
            field: field.into(),
            alias: alias.into(),
            data_type,
            aggregation: None,
            expression: None,
        }
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    pub fn with_expression(mut self, expression: &str) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Whether this field contributes to GROUP BY inference.
    ///
    /// Aggregated fields and raw expressions are excluded; everything else
    /// must be grouped once any aggregation is present.
    pub fn is_groupable(&self) -> bool {
        self.aggregation.is_none() && self.expression.is_none()
    }
}

/// One predicate in a WHERE or HAVING clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfiguration {
    /// The field the predicate applies to.
    pub field: FieldConfiguration,
    pub operator: FilterOperator,
    /// Scalar, array, or `{start, end}` range depending on the operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Connective to the *next* filter; defaults to AND when more follow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connective: Option<Connective>,
    /// When true, the value is looked up by `parameter_name` in the
    /// caller-supplied parameter map at compile time.
    #[serde(default)]
    pub is_parameter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_name: Option<String>,
}

impl FilterConfiguration {
    pub fn new(field: FieldConfiguration, operator: FilterOperator, value: Value) -> Self {
        Self {
            field,
            operator,
            value: Some(value),
            connective: None,
            is_parameter: false,
            parameter_name: None,
        }
    }

    pub fn with_connective(mut self, connective: Connective) -> Self {
        self.connective = Some(connective);
        self
    }

    pub fn parameterized(mut self, name: &str) -> Self {
        self.is_parameter = true;
        self.parameter_name = Some(name.into());
        self
    }
}

/// One column-pair condition inside a join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinCondition {
    pub left_column: String,
    pub right_column: String,
    #[serde(default)]
    pub operator: CompareOp,
}

/// One side of a join, optionally schema-qualified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub table: String,
}

impl JoinTable {
    pub fn new(table: &str) -> Self {
        Self {
            schema: None,
            table: table.into(),
        }
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// A JOIN between two tables; conditions are conjoined with AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinConfiguration {
    pub join_type: JoinType,
    pub left: JoinTable,
    pub right: JoinTable,
    pub conditions: Vec<JoinCondition>,
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfiguration {
    /// Field to sort by; may carry an aggregation.
    pub field: FieldConfiguration,
    #[serde(default)]
    pub direction: SortDir,
    /// Lower sorts first; ties keep input order.
    #[serde(default)]
    pub priority: i32,
}

/// The compilation unit: everything needed to render one SELECT statement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryConfiguration {
    /// Selected fields, in output order. Must be non-empty.
    pub fields: Vec<FieldConfiguration>,
    /// Source tables; `tables[0]` is the FROM table. Entries may be
    /// schema-qualified as `schema.table`. Must be non-empty.
    pub tables: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<JoinConfiguration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterConfiguration>,
    /// Explicit grouping, merged after inferred GROUP BY fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<FieldConfiguration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub having: Vec<FilterConfiguration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl QueryConfiguration {
    /// Whether any selected field carries an aggregation.
    pub fn has_aggregation(&self) -> bool {
        self.fields.iter().any(|f| f.aggregation.is_some())
    }
}
