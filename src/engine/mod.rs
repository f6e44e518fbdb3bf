//! Execution engine - runs compiled SQL against an on-demand connection.
//!
//! Every `execute` call is independent: it resolves the data source, opens
//! its own connection, runs the statement under a deadline, and tears the
//! connection down before returning, on every exit path. Calls share no
//! state, so the engine is safe to use concurrently without locking.

mod connection;
mod datasource;
mod params;

pub use connection::{Connection, ConnectionFactory, Row};
pub use datasource::{DataSourceConfig, DataSourceResolver};
pub use params::substitute_parameters;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};

/// Default wall-clock deadline for one query.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Executions slower than this are flagged to the observer.
pub const SLOW_QUERY_THRESHOLD: Duration = Duration::from_secs(10);

/// Timing and volume statistics for one execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryStats {
    pub elapsed: Duration,
    pub row_count: usize,
    /// Whether elapsed time crossed the slow-query threshold.
    pub slow: bool,
}

/// Observability collaborator; receives statistics after each successful
/// execution.
pub trait ExecutionObserver: Send + Sync {
    fn record(&self, data_source: &str, stats: &QueryStats);
}

/// Default observer: reports through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ExecutionObserver for TracingObserver {
    fn record(&self, data_source: &str, stats: &QueryStats) {
        if stats.slow {
            warn!(
                data_source,
                elapsed_ms = stats.elapsed.as_millis() as u64,
                rows = stats.row_count,
                "slow query"
            );
        } else {
            info!(
                data_source,
                elapsed_ms = stats.elapsed.as_millis() as u64,
                rows = stats.row_count,
                "query executed"
            );
        }
    }
}

/// Runs compiled SQL against resolved data sources.
pub struct ExecutionEngine<R, F> {
    resolver: R,
    factory: F,
    observer: Arc<dyn ExecutionObserver>,
    timeout: Duration,
    slow_threshold: Duration,
}

impl<R, F> ExecutionEngine<R, F>
where
    R: DataSourceResolver,
    F: ConnectionFactory,
{
    pub fn new(resolver: R, factory: F) -> Self {
        Self {
            resolver,
            factory,
            observer: Arc::new(TracingObserver),
            timeout: DEFAULT_QUERY_TIMEOUT,
            slow_threshold: SLOW_QUERY_THRESHOLD,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Execute SQL against the data source identified by `data_source`.
    ///
    /// `@name` tokens in `sql` are substituted from `parameters` before the
    /// statement is sent. The connection opened for this call is closed on
    /// every exit path - success, query failure, or timeout.
    ///
    /// Timeout cancellation is best-effort: the local wait is abandoned and
    /// the connection closed, but the remote query is not cancelled
    /// server-side.
    pub async fn execute(
        &self,
        data_source: &str,
        sql: &str,
        parameters: &HashMap<String, Value>,
    ) -> EngineResult<Vec<Row>> {
        let config = self.resolver.resolve(data_source).await?;
        let sql = substitute_parameters(sql, parameters);
        debug!(data_source, dialect = %config.dialect, "executing query");

        let mut conn = self.factory.connect(&config).await?;
        let started = Instant::now();

        let outcome = tokio::time::timeout(self.timeout, conn.query(&sql)).await;

        // Teardown happens before the outcome is inspected, so no exit path
        // can leak the connection.
        if let Err(close_err) = conn.close().await {
            warn!(data_source, error = %close_err, "connection close failed");
        }

        let rows = match outcome {
            Ok(Ok(rows)) => rows,
            Ok(Err(query_err)) => return Err(query_err),
            Err(_elapsed) => return Err(EngineError::Timeout(self.timeout.as_secs())),
        };

        let elapsed = started.elapsed();
        let stats = QueryStats {
            elapsed,
            row_count: rows.len(),
            slow: elapsed >= self.slow_threshold,
        };
        self.observer.record(data_source, &stats);

        Ok(rows)
    }
}
