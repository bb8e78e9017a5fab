//! Snowflake backend over the ADBC Snowflake driver.
//!
//! The driver is a shared library (`adbc_driver_snowflake`) loaded at connect
//! time through the ADBC driver manager; all wire protocol and authentication
//! work, including the native Okta flow, happens inside it.

use crate::error::{DbError, DbResult};
use crate::outcome::StatementOutcome;
use crate::traits::{Connector, Session};
use adbc_core::error::{Error as AdbcError, Status};
use adbc_core::options::{AdbcVersion, OptionDatabase, OptionValue};
use adbc_core::{Connection as _, Database as _, Driver as _, Statement as _};
use adbc_driver_manager::{ManagedConnection, ManagedDatabase, ManagedDriver};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use sfddl_core::{AuthCredentials, ConnectionConfig};

/// Default driver library name, resolved through the system library path
pub const DEFAULT_DRIVER_LIBRARY: &str = "adbc_driver_snowflake";

const DRIVER_ENTRYPOINT: &[u8] = b"SnowflakeDriverInit";
const APP_NAME: &str = "sfddl";

// Names of Database options
pub(crate) const ACCOUNT: &str = "adbc.snowflake.sql.account";
pub(crate) const WAREHOUSE: &str = "adbc.snowflake.sql.warehouse";
pub(crate) const DATABASE: &str = "adbc.snowflake.sql.db";
pub(crate) const SCHEMA: &str = "adbc.snowflake.sql.schema";
pub(crate) const AUTH_TYPE: &str = "adbc.snowflake.sql.auth_type";
pub(crate) const AUTH_OKTA_URL: &str = "adbc.snowflake.sql.client_option.okta_url";
pub(crate) const LOGIN_TIMEOUT: &str = "adbc.snowflake.sql.client_option.login_timeout";
pub(crate) const OCSP_FAIL_OPEN_MODE: &str = "adbc.snowflake.sql.client_option.ocsp_fail_open_mode";
pub(crate) const APPLICATION_NAME: &str = "adbc.snowflake.sql.client_option.app_name";

pub(crate) mod auth_type {
    /// General username password authentication
    pub const DEFAULT: &str = "auth_snowflake";
    /// Native okta URL to perform SSO authentication on Okta
    pub const OKTA: &str = "auth_okta";
}

/// A driver option, kept independent of the ADBC option types
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DriverOption {
    Username,
    Password,
    Named(&'static str),
}

/// Build the driver options for a resolved config.
///
/// Only the active auth mode's credentials are included.
pub(crate) fn driver_options(config: &ConnectionConfig) -> Vec<(DriverOption, String)> {
    let mut opts = vec![
        (DriverOption::Named(ACCOUNT), config.account().to_string()),
        (DriverOption::Named(WAREHOUSE), config.warehouse().to_string()),
        (DriverOption::Named(DATABASE), config.database().to_string()),
        (DriverOption::Named(SCHEMA), config.schema().to_string()),
        (DriverOption::Named(OCSP_FAIL_OPEN_MODE), "true".to_string()),
        (DriverOption::Named(APPLICATION_NAME), APP_NAME.to_string()),
    ];

    let auth_type = match config.credentials() {
        AuthCredentials::Snowflake { .. } => auth_type::DEFAULT,
        AuthCredentials::Okta { url, .. } => {
            opts.push((DriverOption::Named(AUTH_OKTA_URL), url.to_string()));
            auth_type::OKTA
        }
    };
    opts.push((DriverOption::Named(AUTH_TYPE), auth_type.to_string()));

    if let Some(username) = config.credentials().username() {
        opts.push((DriverOption::Username, username.to_string()));
    }
    if let Some(password) = config.credentials().password() {
        opts.push((DriverOption::Password, password.expose_secret().clone()));
    }

    if let Some(timeout) = config.login_timeout() {
        // The driver parses Go duration strings.
        opts.push((
            DriverOption::Named(LOGIN_TIMEOUT),
            format!("{}s", timeout.as_secs()),
        ));
    }
    opts
}

fn into_adbc_options(opts: Vec<(DriverOption, String)>) -> Vec<(OptionDatabase, OptionValue)> {
    opts.into_iter()
        .map(|(key, value)| {
            let key = match key {
                DriverOption::Username => OptionDatabase::Username,
                DriverOption::Password => OptionDatabase::Password,
                DriverOption::Named(name) => OptionDatabase::Other(name.to_string()),
            };
            (key, OptionValue::String(value))
        })
        .collect()
}

/// Render an ADBC error with the vendor code and SQLSTATE when present.
pub(crate) fn describe_adbc_error(err: &AdbcError) -> String {
    let sqlstate: String = err
        .sqlstate
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8 as char)
        .collect();
    if err.vendor_code == 0 && sqlstate.is_empty() {
        err.message.clone()
    } else {
        format!("Error {} ({}): {}", err.vendor_code, sqlstate, err.message)
    }
}

/// Snowflake login failures (bad password, locked user, Okta/SAML, JWT,
/// OAuth) use vendor codes 390100..=390399.
const LOGIN_VENDOR_CODES: std::ops::RangeInclusive<i32> = 390_100..=390_399;

fn sqlstate_class(err: &AdbcError) -> [u8; 2] {
    [err.sqlstate[0] as u8, err.sqlstate[1] as u8]
}

/// Whether a connect failure was a rejected login.
///
/// The Go driver reports login failures with `Status::IO`, so the vendor
/// code and SQLSTATE are checked as well as the status.
pub(crate) fn is_auth_failure(err: &AdbcError) -> bool {
    matches!(err.status, Status::Unauthenticated | Status::Unauthorized)
        || LOGIN_VENDOR_CODES.contains(&err.vendor_code)
        || &sqlstate_class(err) == b"28"
}

/// Classify an error raised while opening a connection
pub(crate) fn connect_error(err: AdbcError) -> DbError {
    let message = describe_adbc_error(&err);
    if is_auth_failure(&err) {
        DbError::AuthError(message)
    } else {
        DbError::ConnectionError(message)
    }
}

fn execution_error(statement: &str, message: String) -> DbError {
    DbError::ExecutionError {
        statement: statement.to_string(),
        message,
    }
}

/// Snowflake connector backed by the ADBC Snowflake driver
pub struct SnowflakeConnector {
    driver_library: String,
}

impl SnowflakeConnector {
    /// Connector that loads the driver from the system library path
    pub fn new() -> Self {
        Self::with_driver_library(DEFAULT_DRIVER_LIBRARY)
    }

    /// Connector that loads the driver from a specific library name or path
    pub fn with_driver_library(library: impl Into<String>) -> Self {
        Self {
            driver_library: library.into(),
        }
    }

    fn load_driver(&self) -> DbResult<ManagedDriver> {
        ManagedDriver::load_dynamic_from_name(
            &self.driver_library,
            Some(DRIVER_ENTRYPOINT),
            AdbcVersion::V110,
        )
        .map_err(|e| DbError::DriverLoad(format!("{}: {}", self.driver_library, e.message)))
    }
}

impl Default for SnowflakeConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for SnowflakeConnector {
    async fn connect(&self, config: &ConnectionConfig) -> DbResult<Box<dyn Session>> {
        let mut driver = self.load_driver()?;
        log::debug!("Loaded driver {}", self.driver_library);

        let opts = into_adbc_options(driver_options(config));
        let database = driver.new_database_with_opts(opts).map_err(connect_error)?;
        let connection = database.new_connection().map_err(connect_error)?;

        Ok(Box::new(SnowflakeSession {
            connection,
            _database: database,
            _driver: driver,
        }))
    }

    fn db_type(&self) -> &'static str {
        "snowflake"
    }
}

/// Open Snowflake connection.
///
/// Fields drop in declaration order, so the connection is released before
/// the database handle and the driver that own it.
pub struct SnowflakeSession {
    connection: ManagedConnection,
    _database: ManagedDatabase,
    _driver: ManagedDriver,
}

#[async_trait]
impl Session for SnowflakeSession {
    async fn execute(&mut self, sql: &str) -> DbResult<StatementOutcome> {
        let mut statement = self
            .connection
            .new_statement()
            .map_err(|e| execution_error(sql, describe_adbc_error(&e)))?;
        statement
            .set_sql_query(sql)
            .map_err(|e| execution_error(sql, describe_adbc_error(&e)))?;

        let reader = statement
            .execute()
            .map_err(|e| execution_error(sql, describe_adbc_error(&e)))?;
        let batches = reader
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| execution_error(sql, e.to_string()))?;

        StatementOutcome::from_batches(sql, &batches)
    }

    async fn close(self: Box<Self>) -> DbResult<()> {
        drop(self);
        Ok(())
    }
}

#[cfg(test)]
#[path = "snowflake_test.rs"]
mod tests;
