//! Error types for sfddl-db

use thiserror::Error;

/// Statement executor errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Driver library could not be loaded (D001)
    #[error("[D001] Failed to load Snowflake driver: {0}")]
    DriverLoad(String),

    /// Bad credentials or failed Okta handshake (D002)
    #[error("[D002] Authentication failed: {0}")]
    AuthError(String),

    /// Network failure or unreachable account (D003)
    #[error("[D003] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement rejected or failed server-side (D004)
    #[error("[D004] SQL execution failed: {message}\n  statement: {statement}")]
    ExecutionError { statement: String, message: String },
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;
