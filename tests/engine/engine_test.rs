use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use reportsmith::engine::{
    Connection, ConnectionFactory, DataSourceConfig, DataSourceResolver, ExecutionEngine,
    ExecutionObserver, QueryStats, Row,
};
use reportsmith::error::{EngineError, EngineResult};
use reportsmith::Dialect;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("reportsmith=debug")
        .with_test_writer()
        .try_init();
}

fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

// -----------------------------------------------------------------------------
// Mocks
// -----------------------------------------------------------------------------

struct StaticResolver(HashMap<String, DataSourceConfig>);

impl StaticResolver {
    fn single(id: &str) -> Self {
        let mut sources = HashMap::new();
        sources.insert(
            id.to_string(),
            DataSourceConfig::new(Dialect::Postgres, "db.test", "reports"),
        );
        Self(sources)
    }
}

#[async_trait]
impl DataSourceResolver for StaticResolver {
    async fn resolve(&self, id: &str) -> EngineResult<DataSourceConfig> {
        self.0
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::DataSourceNotFound(id.to_string()))
    }
}

#[derive(Default)]
struct MockBehavior {
    rows: Vec<Row>,
    query_delay: Duration,
    fail_query: bool,
}

/// Factory sharing counters with the test so connection lifecycle can be
/// asserted after the engine returns.
struct MockFactory {
    behavior: Arc<MockBehavior>,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
    seen_sql: Arc<Mutex<Vec<String>>>,
}

impl MockFactory {
    fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(behavior),
            opened: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicUsize::new(0)),
            seen_sql: Arc::new(Mutex::new(vec![])),
        }
    }
}

#[async_trait]
impl ConnectionFactory for MockFactory {
    async fn connect(&self, _config: &DataSourceConfig) -> EngineResult<Box<dyn Connection>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockConnection {
            behavior: Arc::clone(&self.behavior),
            closed: Arc::clone(&self.closed),
            seen_sql: Arc::clone(&self.seen_sql),
        }))
    }
}

struct MockConnection {
    behavior: Arc<MockBehavior>,
    closed: Arc<AtomicUsize>,
    seen_sql: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Connection for MockConnection {
    async fn query(&mut self, sql: &str) -> EngineResult<Vec<Row>> {
        self.seen_sql.lock().unwrap().push(sql.to_string());
        if !self.behavior.query_delay.is_zero() {
            tokio::time::sleep(self.behavior.query_delay).await;
        }
        if self.behavior.fail_query {
            return Err(EngineError::Query("relation does not exist".into()));
        }
        Ok(self.behavior.rows.clone())
    }

    async fn close(self: Box<Self>) -> EngineResult<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct CapturingObserver(Mutex<Vec<(String, QueryStats)>>);

impl ExecutionObserver for CapturingObserver {
    fn record(&self, data_source: &str, stats: &QueryStats) {
        self.0
            .lock()
            .unwrap()
            .push((data_source.to_string(), stats.clone()));
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[tokio::test]
async fn test_execute_returns_rows_and_closes_connection() {
    init_tracing();
    let factory = MockFactory::new(MockBehavior {
        rows: vec![row(&[("id", json!(1))]), row(&[("id", json!(2))])],
        ..Default::default()
    });
    let closed = Arc::clone(&factory.closed);

    let engine = ExecutionEngine::new(StaticResolver::single("warehouse"), factory);
    let rows = engine
        .execute("warehouse", "SELECT 1", &HashMap::new())
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("id"), Some(&json!(1)));
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unknown_data_source() {
    init_tracing();
    let factory = MockFactory::new(MockBehavior::default());
    let opened = Arc::clone(&factory.opened);

    let engine = ExecutionEngine::new(StaticResolver::single("warehouse"), factory);
    let err = engine
        .execute("nope", "SELECT 1", &HashMap::new())
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::DataSourceNotFound("nope".into()));
    // Resolution failed before any connection was opened.
    assert_eq!(opened.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_query_failure_still_closes_connection() {
    init_tracing();
    let factory = MockFactory::new(MockBehavior {
        fail_query: true,
        ..Default::default()
    });
    let closed = Arc::clone(&factory.closed);

    let engine = ExecutionEngine::new(StaticResolver::single("warehouse"), factory);
    let err = engine
        .execute("warehouse", "SELECT nope", &HashMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Query(_)));
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_timeout_still_closes_connection() {
    init_tracing();
    let factory = MockFactory::new(MockBehavior {
        query_delay: Duration::from_secs(60),
        ..Default::default()
    });
    let closed = Arc::clone(&factory.closed);

    let engine = ExecutionEngine::new(StaticResolver::single("warehouse"), factory)
        .with_timeout(Duration::from_millis(20));
    let err = engine
        .execute("warehouse", "SELECT pg_sleep(60)", &HashMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Timeout(_)));
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_parameters_substituted_before_query() {
    init_tracing();
    let factory = MockFactory::new(MockBehavior::default());
    let seen = Arc::clone(&factory.seen_sql);

    let engine = ExecutionEngine::new(StaticResolver::single("warehouse"), factory);
    let mut params = HashMap::new();
    params.insert("region".to_string(), json!("We'st"));
    params.insert("min".to_string(), json!(10));

    engine
        .execute(
            "warehouse",
            "SELECT * FROM t WHERE region = @region AND amount > @min AND x = @unknown",
            &params,
        )
        .await
        .unwrap();

    let sql = seen.lock().unwrap()[0].clone();
    assert_eq!(
        sql,
        "SELECT * FROM t WHERE region = 'We''st' AND amount > 10 AND x = @unknown"
    );
}

#[tokio::test]
async fn test_observer_receives_stats() {
    init_tracing();
    let factory = MockFactory::new(MockBehavior {
        rows: vec![row(&[("n", json!(1))]); 3],
        ..Default::default()
    });
    let observer = Arc::new(CapturingObserver::default());

    let engine = ExecutionEngine::new(StaticResolver::single("warehouse"), factory)
        .with_observer(observer.clone());
    engine
        .execute("warehouse", "SELECT 1", &HashMap::new())
        .await
        .unwrap();

    let recorded = observer.0.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    let (source, stats) = &recorded[0];
    assert_eq!(source, "warehouse");
    assert_eq!(stats.row_count, 3);
    assert!(!stats.slow);
}

#[tokio::test]
async fn test_slow_query_flagged() {
    init_tracing();
    let factory = MockFactory::new(MockBehavior {
        query_delay: Duration::from_millis(5),
        ..Default::default()
    });
    let observer = Arc::new(CapturingObserver::default());

    let engine = ExecutionEngine::new(StaticResolver::single("warehouse"), factory)
        .with_slow_threshold(Duration::from_millis(1))
        .with_observer(observer.clone());
    engine
        .execute("warehouse", "SELECT 1", &HashMap::new())
        .await
        .unwrap();

    let recorded = observer.0.lock().unwrap();
    assert!(recorded[0].1.slow);
}

#[tokio::test]
async fn test_observer_not_called_on_failure() {
    init_tracing();
    let factory = MockFactory::new(MockBehavior {
        fail_query: true,
        ..Default::default()
    });
    let observer = Arc::new(CapturingObserver::default());

    let engine = ExecutionEngine::new(StaticResolver::single("warehouse"), factory)
        .with_observer(observer.clone());
    let _ = engine
        .execute("warehouse", "SELECT nope", &HashMap::new())
        .await;

    assert!(observer.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_compile_then_execute_end_to_end() {
    init_tracing();
    let factory = MockFactory::new(MockBehavior {
        rows: vec![row(&[("name", json!("Ada"))])],
        ..Default::default()
    });
    let seen = Arc::clone(&factory.seen_sql);

    let config = reportsmith::QueryConfiguration {
        fields: vec![reportsmith::model::FieldConfiguration::new(
            "Users",
            "name",
            "name",
            reportsmith::model::DataType::String,
        )],
        tables: vec!["Users".into()],
        ..Default::default()
    };
    let params = HashMap::new();
    let sql = reportsmith::compile(&config, &params, Dialect::Postgres).unwrap();

    let engine = ExecutionEngine::new(StaticResolver::single("warehouse"), factory);
    let rows = engine.execute("warehouse", &sql, &params).await.unwrap();

    assert_eq!(rows[0].get("name"), Some(&json!("Ada")));
    assert!(seen.lock().unwrap()[0].contains("FROM \"Users\""));
}
