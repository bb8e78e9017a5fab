//! Connector and session traits

use crate::error::DbResult;
use crate::outcome::StatementOutcome;
use async_trait::async_trait;
use sfddl_core::ConnectionConfig;

/// Opens sessions against a database from a resolved connection config.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Authenticate and open a session bound to the configured target
    async fn connect(&self, config: &ConnectionConfig) -> DbResult<Box<dyn Session>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// A single open connection
#[async_trait]
pub trait Session: Send {
    /// Execute one SQL statement and return whatever rows it produced
    async fn execute(&mut self, sql: &str) -> DbResult<StatementOutcome>;

    /// Release the connection
    async fn close(self: Box<Self>) -> DbResult<()>;
}
