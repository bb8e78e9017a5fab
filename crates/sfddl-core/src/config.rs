//! Connection configuration: raw layered input, the YAML config file, and the
//! validated [`ConnectionConfig`] a run executes with.

use crate::auth::{parse_okta_url, AuthCredentials, AuthMode};
use crate::error::{ConfigError, ConfigResult};
use crate::identifier::{Account, Database, Schema, Warehouse};
use crate::statement::StatementSource;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Unvalidated field values from one configuration layer (file, environment or flags).
///
/// Every field is optional so that layers can be merged before resolution.
#[derive(Debug, Default)]
pub struct RawConfig {
    /// `snowflake` or `okta`
    pub auth_mode: Option<String>,
    pub username: Option<String>,
    /// Only ever supplied by flags or environment, never by a file
    pub password: Option<SecretString>,
    pub okta_url: Option<String>,
    pub account: Option<String>,
    pub warehouse: Option<String>,
    pub database: Option<String>,
    pub schema: Option<String>,
    pub suspend_after_run: Option<bool>,
    pub login_timeout_secs: Option<u64>,
    /// Literal statements
    pub statements: Vec<String>,
    /// Record file holding one statement per record
    pub records: Option<PathBuf>,
    /// Field of each record that holds the SQL text
    pub field: Option<String>,
}

impl RawConfig {
    /// Layer `overrides` on top of `self`. Every value set in `overrides` wins.
    ///
    /// The statement source is replaced as a whole when `overrides` names
    /// statements or a record file, so layers never mix the two.
    pub fn merge(self, overrides: RawConfig) -> RawConfig {
        let source_overridden = !overrides.statements.is_empty() || overrides.records.is_some();
        let (statements, records, field) = if source_overridden {
            let field = match overrides.records {
                Some(_) => overrides.field.or(self.field),
                None => overrides.field,
            };
            (overrides.statements, overrides.records, field)
        } else {
            (self.statements, self.records, overrides.field.or(self.field))
        };

        RawConfig {
            auth_mode: overrides.auth_mode.or(self.auth_mode),
            username: overrides.username.or(self.username),
            password: overrides.password.or(self.password),
            okta_url: overrides.okta_url.or(self.okta_url),
            account: overrides.account.or(self.account),
            warehouse: overrides.warehouse.or(self.warehouse),
            database: overrides.database.or(self.database),
            schema: overrides.schema.or(self.schema),
            suspend_after_run: overrides.suspend_after_run.or(self.suspend_after_run),
            login_timeout_secs: overrides.login_timeout_secs.or(self.login_timeout_secs),
            statements,
            records,
            field,
        }
    }

    /// Validate and normalize into a [`ConnectionConfig`].
    ///
    /// Checks run in a fixed order (auth mode, credentials, target, statement
    /// source) and the first failure is returned. Credentials of the inactive
    /// auth mode are dropped without validation.
    pub fn resolve(self) -> ConfigResult<ConnectionConfig> {
        let mode: AuthMode = sanitize(self.auth_mode.as_deref())
            .ok_or(ConfigError::MissingField { field: "auth_mode" })?
            .parse()?;

        let username = sanitize(self.username.as_deref()).map(str::to_string);
        let password = self
            .password
            .filter(|p| !p.expose_secret().trim().is_empty());

        let credentials = match mode {
            AuthMode::Snowflake => AuthCredentials::Snowflake {
                username: username.ok_or(ConfigError::MissingField { field: "username" })?,
                password: password.ok_or(ConfigError::MissingField { field: "password" })?,
            },
            AuthMode::Okta => {
                let raw_url = sanitize(self.okta_url.as_deref())
                    .ok_or(ConfigError::MissingField { field: "okta_url" })?;
                parse_okta_url(raw_url)?;
                AuthCredentials::Okta {
                    url: raw_url.to_string(),
                    username,
                    password,
                }
            }
        };

        let account = Account::normalize(self.account.as_deref())?;
        let warehouse = Warehouse::require(self.warehouse.as_deref())?;
        let database = Database::require(self.database.as_deref())?;
        let schema = Schema::require(self.schema.as_deref())?;

        let statement_source = StatementSource::resolve(self.statements, self.records, self.field)?;

        Ok(ConnectionConfig {
            credentials,
            account,
            warehouse,
            database,
            schema,
            suspend_after_run: self.suspend_after_run.unwrap_or(false),
            statement_source,
            login_timeout: self.login_timeout_secs.map(Duration::from_secs),
        })
    }
}

/// Trim a value, treating empty or whitespace-only input as absent.
fn sanitize(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// The validated, immutable execution request for one run
#[derive(Debug)]
pub struct ConnectionConfig {
    credentials: AuthCredentials,
    account: Account,
    warehouse: Warehouse,
    database: Database,
    schema: Schema,
    suspend_after_run: bool,
    statement_source: StatementSource,
    login_timeout: Option<Duration>,
}

impl ConnectionConfig {
    pub fn auth_mode(&self) -> AuthMode {
        self.credentials.mode()
    }

    pub fn credentials(&self) -> &AuthCredentials {
        &self.credentials
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn warehouse(&self) -> &Warehouse {
        &self.warehouse
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether `ALTER WAREHOUSE ... SUSPEND` runs after the statements
    pub fn suspend_after_run(&self) -> bool {
        self.suspend_after_run
    }

    pub fn statement_source(&self) -> &StatementSource {
        &self.statement_source
    }

    /// Login timeout handed to the driver; `None` keeps the driver default
    pub fn login_timeout(&self) -> Option<Duration> {
        self.login_timeout
    }

    /// Printable view of the config with the password redacted
    pub fn summary(&self) -> ConfigSummary<'_> {
        ConfigSummary {
            auth_mode: self.auth_mode(),
            username: self.credentials.username(),
            password: self.credentials.password().map(|_| REDACTED),
            okta_url: self.credentials.okta_url(),
            account: self.account.as_str(),
            warehouse: self.warehouse.as_str(),
            database: self.database.as_str(),
            schema: self.schema.as_str(),
            suspend_after_run: self.suspend_after_run,
            login_timeout_secs: self.login_timeout.map(|d| d.as_secs()),
            statement_source: &self.statement_source,
        }
    }
}

const REDACTED: &str = "********";

/// Serializable, password-free view of a [`ConnectionConfig`]
#[derive(Debug, Serialize)]
pub struct ConfigSummary<'a> {
    pub auth_mode: AuthMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub okta_url: Option<&'a str>,
    pub account: &'a str,
    pub warehouse: &'a str,
    pub database: &'a str,
    pub schema: &'a str,
    pub suspend_after_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_timeout_secs: Option<u64>,
    pub statement_source: &'a StatementSource,
}

/// On-disk configuration file (YAML).
///
/// Holds everything except the password, which is never read from disk.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// `snowflake` or `okta`
    #[serde(default)]
    pub auth_mode: Option<String>,

    /// Snowflake (or Okta) login name
    #[serde(default)]
    pub username: Option<String>,

    /// Okta endpoint, e.g. `https://org.okta.com`
    #[serde(default)]
    pub okta_url: Option<String>,

    /// Snowflake account identifier
    #[serde(default)]
    pub account: Option<String>,

    /// Warehouse to run and optionally suspend
    #[serde(default)]
    pub warehouse: Option<String>,

    /// Target database
    #[serde(default)]
    pub database: Option<String>,

    /// Target schema
    #[serde(default)]
    pub schema: Option<String>,

    /// Suspend the warehouse once all statements have run (default: false)
    #[serde(default)]
    pub suspend_after_run: Option<bool>,

    /// Login timeout in seconds passed to the driver
    #[serde(default)]
    pub login_timeout_secs: Option<u64>,

    /// Literal statements to execute in order
    #[serde(default)]
    pub statements: Vec<String>,

    /// Record file (JSON array or JSON Lines), relative to the config file
    #[serde(default)]
    pub records: Option<PathBuf>,

    /// Record field holding the SQL text
    #[serde(default)]
    pub field: Option<String>,

    /// Accepted only to reject it with a clear message
    #[serde(default)]
    password: Option<serde_yaml::Value>,
}

impl ConfigFile {
    /// Load a config file into a [`RawConfig`] layer.
    ///
    /// A relative `records` path is resolved against the file's directory.
    pub fn load(path: &Path) -> ConfigResult<RawConfig> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut raw = Self::parse(&content)?;
        if let (Some(records), Some(dir)) = (raw.records.as_mut(), path.parent()) {
            if records.is_relative() {
                *records = dir.join(&*records);
            }
        }
        log::debug!("Loaded config file {}", path.display());
        Ok(raw)
    }

    /// Parse config file content into a [`RawConfig`] layer
    pub fn parse(content: &str) -> ConfigResult<RawConfig> {
        // An empty document deserializes to unit, not to a map.
        if content.trim().is_empty() {
            return Ok(RawConfig::default());
        }
        let file: ConfigFile =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ConfigParse {
                message: e.to_string(),
            })?;
        if file.password.is_some() {
            return Err(ConfigError::ConfigParse {
                message: "'password' is not allowed in config files; \
                          pass it with --password or SFDDL_PASSWORD"
                    .to_string(),
            });
        }
        Ok(file.into_raw())
    }

    fn into_raw(self) -> RawConfig {
        RawConfig {
            auth_mode: self.auth_mode,
            username: self.username,
            password: None,
            okta_url: self.okta_url,
            account: self.account,
            warehouse: self.warehouse,
            database: self.database,
            schema: self.schema,
            suspend_after_run: self.suspend_after_run,
            login_timeout_secs: self.login_timeout_secs,
            statements: self.statements,
            records: self.records,
            field: self.field,
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
