//! Connection trait for the benchmark collaborator

use crate::{QueryDialect, QueryResult, Result, StatementResult, Value};
use async_trait::async_trait;

/// A database connection capable of running arbitrary read queries.
///
/// The advisory engine does not own the connection lifecycle: callers open
/// and close connections, the engine only borrows them for benchmarking.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "sqlite", "postgresql", "mysql")
    fn driver_name(&self) -> &str;

    /// Get the SQL dialect spoken by this connection
    fn dialect(&self) -> QueryDialect {
        QueryDialect::Generic
    }

    /// Execute a query that returns rows (SELECT)
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult>;

    /// Execute a statement that modifies data (INSERT/UPDATE/DELETE)
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult>;

    /// Close the connection
    async fn close(&self) -> Result<()>;

    /// Check if the connection is closed
    fn is_closed(&self) -> bool;
}
