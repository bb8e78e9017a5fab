//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use secrecy::SecretString;
use sfddl_core::{ConfigError, ConfigFile, ConnectionConfig, RawConfig};
use sfddl_db::DbError;
use std::fmt;

use crate::cli::{ConnectionArgs, GlobalArgs, StatementArgs};

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Empty: the underlying error has already been reported.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

pub(crate) const EXIT_FAILURE: i32 = 1;
pub(crate) const EXIT_CONFIG: i32 = 2;
pub(crate) const EXIT_AUTH: i32 = 3;
pub(crate) const EXIT_CONNECTION: i32 = 4;
pub(crate) const EXIT_EXECUTION: i32 = 5;

/// Map an error to the process exit code of its root cause.
pub(crate) fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.downcast_ref::<ConfigError>().is_some() {
            return EXIT_CONFIG;
        }
        if let Some(db) = cause.downcast_ref::<DbError>() {
            return match db {
                DbError::AuthError(_) => EXIT_AUTH,
                DbError::ConnectionError(_) | DbError::DriverLoad(_) => EXIT_CONNECTION,
                DbError::ExecutionError { .. } => EXIT_EXECUTION,
            };
        }
        if let Some(code) = cause.downcast_ref::<ExitCode>() {
            return code.0;
        }
    }
    EXIT_FAILURE
}

/// Report a command failure on stderr and turn it into an `ExitCode`.
pub(crate) fn fail(err: anyhow::Error) -> anyhow::Error {
    if err.downcast_ref::<ExitCode>().is_some() {
        return err;
    }
    eprintln!("Error: {:#}", err);
    ExitCode(exit_code_for(&err)).into()
}

/// Build the flag/environment layer from parsed arguments.
pub(crate) fn raw_from_args(connection: &ConnectionArgs, source: &StatementArgs) -> RawConfig {
    RawConfig {
        auth_mode: connection.auth_mode.clone(),
        username: connection.username.clone(),
        password: connection.password.clone().map(SecretString::new),
        okta_url: connection.okta_url.clone(),
        account: connection.account.clone(),
        warehouse: connection.warehouse.clone(),
        database: connection.database.clone(),
        schema: connection.schema.clone(),
        // An unset flag must not override `suspend_after_run: true` from the file.
        suspend_after_run: connection.suspend_warehouse.then_some(true),
        login_timeout_secs: connection.login_timeout,
        statements: source.statements.clone(),
        records: source.records.clone(),
        field: source.field.clone(),
    }
}

/// Resolve the connection config from the config file (if any) and the
/// flag/environment layer.
pub(crate) fn resolve_config(
    global: &GlobalArgs,
    connection: &ConnectionArgs,
    source: &StatementArgs,
) -> Result<ConnectionConfig> {
    let file_layer = match &global.config {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => RawConfig::default(),
    };

    let config = file_layer
        .merge(raw_from_args(connection, source))
        .resolve()
        .context("Invalid configuration")?;

    log::debug!(
        "Resolved {} configuration for account {}",
        config.auth_mode(),
        config.account()
    );
    Ok(config)
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
