//! Error types for compilation and execution.

use thiserror::Error;

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// Result type for query execution.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors detected while turning a configuration into SQL text.
///
/// All of these are raised synchronously, before any connection is opened.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// Structural problem in the input configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An identifier is empty or one of the sentinel strings
    /// "undefined"/"null" that upstream payloads use for absent values.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Unknown database-type name given to the dialect registry.
    #[error("unsupported dialect: {0:?}")]
    UnsupportedDialect(String),

    /// Filter operator outside the known set.
    #[error("unsupported filter operator: {0:?}")]
    UnsupportedOperator(String),

    /// Aggregation function outside the known set.
    #[error("unsupported aggregation: {0:?}")]
    UnsupportedAggregation(String),
}

/// Errors raised by the execution engine.
///
/// Whatever the failure, the engine guarantees the connection used by the
/// call has been closed before the error is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The data-source reference could not be resolved.
    #[error("data source not found: {0:?}")]
    DataSourceNotFound(String),

    /// The execution deadline elapsed before the database answered.
    ///
    /// The remote query is not cancelled server-side; only the local wait
    /// is abandoned.
    #[error("query timed out after {0} seconds")]
    Timeout(u64),

    /// Failed to open a connection to the data source.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The database rejected or aborted the statement.
    #[error("query failed: {0}")]
    Query(String),

    /// Compilation failed before execution started.
    #[error(transparent)]
    Compile(#[from] CompileError),
}
