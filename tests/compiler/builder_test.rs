use std::collections::HashMap;

use serde_json::{json, Value};

use reportsmith::builder;
use reportsmith::dialect::Dialect;
use reportsmith::model::{
    Aggregation, CompareOp, Connective, DataType, FieldConfiguration, FilterConfiguration,
    FilterOperator, JoinCondition, JoinConfiguration, JoinTable, JoinType, OrderConfiguration,
    SortDir,
};

fn field(table: &str, name: &str, alias: &str, dt: DataType) -> FieldConfiguration {
    FieldConfiguration::new(table, name, alias, dt)
}

fn render_filter(filter: FilterConfiguration, dialect: Dialect) -> String {
    builder::filter_list(&[filter], &HashMap::new(), dialect)
        .unwrap()
        .serialize(dialect)
}

#[test]
fn test_every_comparison_operator_renders() {
    let cases = [
        (FilterOperator::Equals, "= 5"),
        (FilterOperator::NotEquals, "<> 5"),
        (FilterOperator::GreaterThan, "> 5"),
        (FilterOperator::GreaterThanOrEqual, ">= 5"),
        (FilterOperator::LessThan, "< 5"),
        (FilterOperator::LessThanOrEqual, "<= 5"),
    ];

    for (op, expected) in cases {
        let sql = render_filter(
            FilterConfiguration::new(
                field("T", "n", "n", DataType::Integer),
                op,
                json!(5),
            ),
            Dialect::Postgres,
        );
        assert_eq!(sql, format!("\"T\".\"n\" {}", expected));
    }
}

#[test]
fn test_null_operators_ignore_value() {
    let sql = render_filter(
        FilterConfiguration::new(
            field("T", "deleted_at", "deleted_at", DataType::DateTime),
            FilterOperator::IsNull,
            json!("ignored"),
        ),
        Dialect::Postgres,
    );
    assert_eq!(sql, "\"T\".\"deleted_at\" IS NULL");

    let sql = render_filter(
        FilterConfiguration::new(
            field("T", "deleted_at", "deleted_at", DataType::DateTime),
            FilterOperator::IsNotNull,
            json!("ignored"),
        ),
        Dialect::Postgres,
    );
    assert_eq!(sql, "\"T\".\"deleted_at\" IS NOT NULL");
}

#[test]
fn test_in_list_renders_each_item_by_type() {
    let sql = render_filter(
        FilterConfiguration::new(
            field("T", "status", "status", DataType::String),
            FilterOperator::In,
            json!(["open", "closed"]),
        ),
        Dialect::TSql,
    );
    assert_eq!(sql, "[T].[status] IN ('open', 'closed')");
}

#[test]
fn test_empty_in_list_matches_nothing() {
    let sql = render_filter(
        FilterConfiguration::new(
            field("T", "status", "status", DataType::String),
            FilterOperator::In,
            json!([]),
        ),
        Dialect::TSql,
    );
    assert_eq!(sql, "1 = 0");
}

#[test]
fn test_like_operators_wrap_wildcards() {
    let like = |op| {
        render_filter(
            FilterConfiguration::new(
                field("T", "name", "name", DataType::String),
                op,
                json!("ann"),
            ),
            Dialect::Postgres,
        )
    };
    assert_eq!(like(FilterOperator::Like), "\"T\".\"name\" LIKE '%ann%'");
    assert_eq!(like(FilterOperator::StartsWith), "\"T\".\"name\" LIKE 'ann%'");
    assert_eq!(like(FilterOperator::EndsWith), "\"T\".\"name\" LIKE '%ann'");
}

#[test]
fn test_connective_follows_each_predicate_except_last() {
    let filters = vec![
        FilterConfiguration::new(
            field("T", "a", "a", DataType::Integer),
            FilterOperator::Equals,
            json!(1),
        )
        .with_connective(Connective::Or),
        FilterConfiguration::new(
            field("T", "b", "b", DataType::Integer),
            FilterOperator::Equals,
            json!(2),
        ),
        FilterConfiguration::new(
            field("T", "c", "c", DataType::Integer),
            FilterOperator::Equals,
            json!(3),
        ),
    ];

    let sql = builder::filter_list(&filters, &HashMap::new(), Dialect::Postgres)
        .unwrap()
        .serialize(Dialect::Postgres);
    // Second filter has no explicit connective: AND is the default. The
    // last filter's connective, if any, is never rendered.
    assert_eq!(
        sql,
        "\"T\".\"a\" = 1 OR \"T\".\"b\" = 2 AND \"T\".\"c\" = 3"
    );
}

#[test]
fn test_missing_parameter_renders_null() {
    let filter = FilterConfiguration::new(
        field("T", "region", "region", DataType::String),
        FilterOperator::Equals,
        json!("unused"),
    )
    .parameterized("region");

    let sql = render_filter(filter, Dialect::Postgres);
    assert_eq!(sql, "\"T\".\"region\" = NULL");
}

#[test]
fn test_parameter_resolved_from_map() {
    let filter = FilterConfiguration::new(
        field("T", "region", "region", DataType::String),
        FilterOperator::Equals,
        json!("unused"),
    )
    .parameterized("region");

    let mut params: HashMap<String, Value> = HashMap::new();
    params.insert("region".into(), json!("West"));

    let sql = builder::filter_list(&[filter], &params, Dialect::Postgres)
        .unwrap()
        .serialize(Dialect::Postgres);
    assert_eq!(sql, "\"T\".\"region\" = 'West'");
}

#[test]
fn test_join_condition_operators() {
    let join = JoinConfiguration {
        join_type: JoinType::Left,
        left: JoinTable::new("Users"),
        right: JoinTable::new("Orders"),
        conditions: vec![
            JoinCondition {
                left_column: "id".into(),
                right_column: "user_id".into(),
                operator: CompareOp::Eq,
            },
            JoinCondition {
                left_column: "created".into(),
                right_column: "created".into(),
                operator: CompareOp::Lte,
            },
        ],
    };

    let sql = builder::join_clauses(&[join])
        .unwrap()
        .serialize(Dialect::TSql);
    assert_eq!(
        sql,
        "LEFT JOIN [Orders] ON [Users].[id] = [Orders].[user_id] \
         AND [Users].[created] <= [Orders].[created]"
    );
}

#[test]
fn test_full_join_renders_outer_keyword() {
    let join = JoinConfiguration {
        join_type: JoinType::Full,
        left: JoinTable::new("A"),
        right: JoinTable::new("B"),
        conditions: vec![JoinCondition {
            left_column: "id".into(),
            right_column: "a_id".into(),
            operator: CompareOp::Eq,
        }],
    };

    let sql = builder::join_clauses(&[join])
        .unwrap()
        .serialize(Dialect::Postgres);
    assert!(sql.starts_with("FULL OUTER JOIN \"B\""));
}

#[test]
fn test_join_without_conditions_rejected() {
    let join = JoinConfiguration {
        join_type: JoinType::Inner,
        left: JoinTable::new("A"),
        right: JoinTable::new("B"),
        conditions: vec![],
    };
    assert!(builder::join_clauses(&[join]).is_err());
}

#[test]
fn test_order_by_priority_is_stable() {
    let order = vec![
        OrderConfiguration {
            field: field("T", "c", "c", DataType::String),
            direction: SortDir::Desc,
            priority: 2,
        },
        OrderConfiguration {
            field: field("T", "a", "a", DataType::String),
            direction: SortDir::Asc,
            priority: 1,
        },
        OrderConfiguration {
            field: field("T", "b", "b", DataType::String),
            direction: SortDir::Asc,
            priority: 1,
        },
    ];

    let sql = builder::order_by_clause(&order, Dialect::Postgres)
        .unwrap()
        .serialize(Dialect::Postgres);
    assert_eq!(
        sql,
        "ORDER BY \"T\".\"a\" ASC, \"T\".\"b\" ASC, \"T\".\"c\" DESC"
    );
}

#[test]
fn test_order_by_aggregated_field() {
    let order = vec![OrderConfiguration {
        field: field("T", "amount", "total", DataType::Currency)
            .with_aggregation(Aggregation::Sum),
        direction: SortDir::Desc,
        priority: 0,
    }];

    let sql = builder::order_by_clause(&order, Dialect::Postgres)
        .unwrap()
        .serialize(Dialect::Postgres);
    assert_eq!(sql, "ORDER BY SUM(\"T\".\"amount\") DESC");
}

#[test]
fn test_default_order_by_placeholder_without_fields() {
    let sql = builder::default_order_by(&[], Dialect::TSql)
        .unwrap()
        .serialize(Dialect::TSql);
    assert_eq!(sql, "ORDER BY (SELECT NULL)");
}

#[test]
fn test_concat_aggregation_per_dialect() {
    let concat = field("T", "tags", "tags", DataType::String)
        .with_aggregation(Aggregation::Concat);

    let tsql = builder::field_reference(&concat, Dialect::TSql)
        .unwrap()
        .serialize(Dialect::TSql);
    assert_eq!(tsql, "STRING_AGG([T].[tags], ',')");

    let mysql = builder::field_reference(&concat, Dialect::MySql)
        .unwrap()
        .serialize(Dialect::MySql);
    assert_eq!(mysql, "GROUP_CONCAT(`T`.`tags`)");
}

#[test]
fn test_expression_field_rendered_verbatim() {
    let expr = field("T", "unused", "age", DataType::Integer)
        .with_expression("DATEDIFF(year, [T].[dob], GETDATE())");

    let sql = builder::field_reference(&expr, Dialect::TSql)
        .unwrap()
        .serialize(Dialect::TSql);
    assert_eq!(sql, "DATEDIFF(year, [T].[dob], GETDATE())");
}
