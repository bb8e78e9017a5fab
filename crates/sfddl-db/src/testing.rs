//! In-memory connector for tests
//!
//! `RecordingConnector` never touches the network. It records every call
//! made through it so tests can assert on the exact command sequence.

use crate::error::{DbError, DbResult};
use crate::outcome::StatementOutcome;
use crate::traits::{Connector, Session};
use async_trait::async_trait;
use sfddl_core::ConnectionConfig;
use std::sync::{Arc, Mutex};

/// Marker recorded when a session is opened
pub const CONNECT: &str = "CONNECT";
/// Marker recorded when a session is closed
pub const CLOSE: &str = "CLOSE";

/// How `connect` should fail, if at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectFailure {
    Auth,
    Connection,
}

#[derive(Debug, Default)]
struct Script {
    connect_failure: Option<ConnectFailure>,
    failing_statement: Option<String>,
    fail_close: bool,
    rows: Vec<Vec<String>>,
}

/// Connector that records calls instead of talking to a server
#[derive(Debug, Clone, Default)]
pub struct RecordingConnector {
    calls: Arc<Mutex<Vec<String>>>,
    script: Arc<Mutex<Script>>,
}

impl RecordingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `connect` fail with the given kind of error
    pub fn fail_connect(self, failure: ConnectFailure) -> Self {
        self.with_script(|s| s.connect_failure = Some(failure))
    }

    /// Make the statement with this exact text fail
    pub fn fail_on(self, sql: &str) -> Self {
        let sql = sql.to_string();
        self.with_script(|s| s.failing_statement = Some(sql))
    }

    /// Make `close` return an error (after recording it)
    pub fn fail_close(self) -> Self {
        self.with_script(|s| s.fail_close = true)
    }

    /// Rows returned by every successful statement, under a single `status` column
    pub fn with_rows(self, rows: &[&str]) -> Self {
        let rows = rows.iter().map(|r| vec![r.to_string()]).collect();
        self.with_script(|s| s.rows = rows)
    }

    fn with_script(self, f: impl FnOnce(&mut Script)) -> Self {
        f(&mut self.script.lock().unwrap());
        self
    }

    /// Every recorded call, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// SQL texts sent to the server, in order
    pub fn executed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c != CONNECT && c != CLOSE)
            .collect()
    }

    pub fn connected(&self) -> bool {
        self.calls().iter().any(|c| c == CONNECT)
    }

    pub fn closed(&self) -> bool {
        self.calls().iter().any(|c| c == CLOSE)
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl Connector for RecordingConnector {
    async fn connect(&self, config: &ConnectionConfig) -> DbResult<Box<dyn Session>> {
        let failure = self.script.lock().unwrap().connect_failure;
        match failure {
            Some(ConnectFailure::Auth) => {
                return Err(DbError::AuthError(format!(
                    "Error 390100 (08004): Incorrect username or password was specified for {}",
                    config.account()
                )))
            }
            Some(ConnectFailure::Connection) => {
                return Err(DbError::ConnectionError(format!(
                    "could not reach {}.snowflakecomputing.com",
                    config.account()
                )))
            }
            None => {}
        }
        self.record(CONNECT);
        Ok(Box::new(RecordingSession {
            connector: self.clone(),
        }))
    }

    fn db_type(&self) -> &'static str {
        "recording"
    }
}

struct RecordingSession {
    connector: RecordingConnector,
}

#[async_trait]
impl Session for RecordingSession {
    async fn execute(&mut self, sql: &str) -> DbResult<StatementOutcome> {
        self.connector.record(sql);
        let script = self.connector.script.lock().unwrap();
        if script.failing_statement.as_deref() == Some(sql) {
            return Err(DbError::ExecutionError {
                statement: sql.to_string(),
                message: "Error 2003 (02000): SQL compilation error: object does not exist"
                    .to_string(),
            });
        }
        let mut outcome = StatementOutcome::empty(sql);
        if !script.rows.is_empty() {
            outcome.columns = vec!["status".to_string()];
            outcome.rows = script.rows.clone();
        }
        Ok(outcome)
    }

    async fn close(self: Box<Self>) -> DbResult<()> {
        self.connector.record(CLOSE);
        if self.connector.script.lock().unwrap().fail_close {
            return Err(DbError::ConnectionError("connection reset".to_string()));
        }
        Ok(())
    }
}
