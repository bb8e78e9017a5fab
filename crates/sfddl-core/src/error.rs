//! Error types for sfddl-core

use thiserror::Error;

/// Configuration error, raised before any network activity
#[derive(Error, Debug)]
pub enum ConfigError {
    /// C001: A field required by the active auth mode or target is missing
    #[error("[C001] Missing required field: {field}")]
    MissingField { field: &'static str },

    /// C002: Auth mode is neither `snowflake` nor `okta`
    #[error("[C002] Invalid auth mode '{value}': expected 'snowflake' or 'okta'")]
    InvalidAuthMode { value: String },

    /// C003: Okta URL could not be parsed or is not http(s)
    #[error("[C003] Invalid Okta URL '{url}': {reason}")]
    InvalidOktaUrl { url: String, reason: String },

    /// C004: Statement source is ambiguous or incomplete
    #[error("[C004] Invalid statement source: {message}")]
    InvalidStatementSource { message: String },

    /// C005: Config file not found
    #[error("[C005] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C006: Failed to parse config file
    #[error("[C006] Failed to parse config: {message}")]
    ConfigParse { message: String },

    /// C007: A record in the statement record file is malformed
    #[error("[C007] Invalid record #{record}: {message}")]
    InvalidRecord { record: usize, message: String },

    /// C008: IO error with file path context
    #[error("[C008] Failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Name of the offending field, for errors that concern a single field.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::MissingField { field } => Some(field),
            ConfigError::InvalidAuthMode { .. } => Some("auth_mode"),
            ConfigError::InvalidOktaUrl { .. } => Some("okta_url"),
            ConfigError::InvalidStatementSource { .. } | ConfigError::InvalidRecord { .. } => {
                Some("statement_source")
            }
            _ => None,
        }
    }
}

/// Result type alias for ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
