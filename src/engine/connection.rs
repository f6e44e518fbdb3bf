//! Connection collaborator traits.
//!
//! The engine never talks to a driver directly; it asks an injected
//! [`ConnectionFactory`] for a fresh [`Connection`] scoped to a single
//! `execute` call. Pooling, if wanted, lives behind the factory - never as
//! ambient process-wide state inside the engine.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::EngineResult;

use super::datasource::DataSourceConfig;

/// One result row: column alias to value, in SELECT-list order.
pub type Row = serde_json::Map<String, Value>;

/// A live database connection scoped to one `execute` call.
#[async_trait]
pub trait Connection: Send {
    /// Run a statement and return all rows.
    async fn query(&mut self, sql: &str) -> EngineResult<Vec<Row>>;

    /// Tear the connection down. Called on every exit path.
    async fn close(self: Box<Self>) -> EngineResult<()>;
}

/// Opens connections from resolved data-source configurations.
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    async fn connect(&self, config: &DataSourceConfig) -> EngineResult<Box<dyn Connection>>;
}
