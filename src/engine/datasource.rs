//! Data-source resolution.
//!
//! A report references its database by an opaque id; the resolver turns
//! that into connection parameters, or signals "not found".

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::sql::dialect::Dialect;

/// Connection parameters for one data source.
#[derive(Debug, Clone)]
pub struct DataSourceConfig {
    /// SQL dialect of the engine behind this source.
    pub dialect: Dialect,
    /// Server hostname.
    pub host: String,
    /// Port; falls back to the dialect default when absent.
    pub port: Option<u16>,
    /// Database name.
    pub database: String,
    /// Username, when the server does not use ambient authentication.
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
}

impl DataSourceConfig {
    pub fn new(dialect: Dialect, host: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            dialect,
            host: host.into(),
            port: None,
            database: database.into(),
            username: None,
            password: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// The port to connect on, using the dialect default when unset.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.dialect.default_port())
    }
}

/// Resolves an opaque data-source reference to connection parameters.
#[async_trait]
pub trait DataSourceResolver: Send + Sync {
    /// Look up a data source by id; fails with
    /// [`crate::error::EngineError::DataSourceNotFound`] for unknown ids.
    async fn resolve(&self, id: &str) -> EngineResult<DataSourceConfig>;
}
