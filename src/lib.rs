//! # Reportsmith
//!
//! Compiles declarative report definitions into multi-dialect SQL and
//! executes them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        QueryConfiguration (+ parameters, dialect)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [validate]
//! ┌─────────────────────────────────────────────────────────┐
//! │           Structural invariants checked, fail fast       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [builders]
//! ┌─────────────────────────────────────────────────────────┐
//! │   SELECT / FROM / JOIN / WHERE / GROUP BY / HAVING /     │
//! │   ORDER BY / LIMIT as dialect-agnostic token streams     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [serialize per dialect]
//! ┌─────────────────────────────────────────────────────────┐
//! │                      SQL text                            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [engine]
//! ┌─────────────────────────────────────────────────────────┐
//! │   @param substitution → fresh connection → deadline →    │
//! │   rows, connection closed on every exit path             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Compilation is pure, synchronous computation with no I/O; only the
//! engine suspends, and only on the database round-trip.

pub mod compile;
pub mod engine;
pub mod error;
pub mod model;
pub mod sql;
pub mod validate;

// Re-export SQL submodules at crate level for convenient paths
pub use sql::builder;
pub use sql::dialect;
pub use sql::ident;
pub use sql::token;
pub use sql::value;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compile::compile;
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::engine::{
        Connection, ConnectionFactory, DataSourceConfig, DataSourceResolver, ExecutionEngine,
        ExecutionObserver, QueryStats, Row,
    };
    pub use crate::error::{CompileError, CompileResult, EngineError, EngineResult};
    pub use crate::model::{
        Aggregation, CompareOp, Connective, DataType, FieldConfiguration, FilterConfiguration,
        FilterOperator, JoinCondition, JoinConfiguration, JoinTable, JoinType,
        OrderConfiguration, QueryConfiguration, SortDir,
    };
    pub use crate::token::{Token, TokenStream};
}

// Also export at crate root for convenience
pub use compile::compile;
pub use dialect::Dialect;
pub use engine::ExecutionEngine;
pub use error::{CompileError, EngineError};
pub use model::QueryConfiguration;
