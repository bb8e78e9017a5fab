//! Authentication modes and the credentials each mode carries

use crate::error::{ConfigError, ConfigResult};
use secrecy::SecretString;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// How the connection authenticates against Snowflake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Native Snowflake username and password
    Snowflake,
    /// Okta federated authentication
    Okta,
}

impl FromStr for AuthMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snowflake" => Ok(AuthMode::Snowflake),
            "okta" => Ok(AuthMode::Okta),
            _ => Err(ConfigError::InvalidAuthMode {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Snowflake => write!(f, "snowflake"),
            AuthMode::Okta => write!(f, "okta"),
        }
    }
}

/// Credentials for the active auth mode.
///
/// Only the variant's own fields are ever validated or sent to the driver;
/// values entered for the other mode are dropped during resolution.
#[derive(Debug)]
pub enum AuthCredentials {
    /// Native Snowflake login
    Snowflake {
        username: String,
        password: SecretString,
    },
    /// Okta login. The Okta account's username and password are optional and
    /// forwarded to the driver's native Okta flow when present.
    Okta {
        /// Endpoint as entered (trimmed), validated by [`parse_okta_url`]
        url: String,
        username: Option<String>,
        password: Option<SecretString>,
    },
}

impl AuthCredentials {
    /// The mode these credentials belong to
    pub fn mode(&self) -> AuthMode {
        match self {
            AuthCredentials::Snowflake { .. } => AuthMode::Snowflake,
            AuthCredentials::Okta { .. } => AuthMode::Okta,
        }
    }

    /// Login name sent to the driver, if any
    pub fn username(&self) -> Option<&str> {
        match self {
            AuthCredentials::Snowflake { username, .. } => Some(username),
            AuthCredentials::Okta { username, .. } => username.as_deref(),
        }
    }

    /// Password sent to the driver, if any
    pub fn password(&self) -> Option<&SecretString> {
        match self {
            AuthCredentials::Snowflake { password, .. } => Some(password),
            AuthCredentials::Okta { password, .. } => password.as_ref(),
        }
    }

    /// Okta endpoint, for Okta credentials
    pub fn okta_url(&self) -> Option<&str> {
        match self {
            AuthCredentials::Snowflake { .. } => None,
            AuthCredentials::Okta { url, .. } => Some(url.as_str()),
        }
    }
}

/// Parse an Okta endpoint. It must be an absolute http(s) URL with a host.
pub fn parse_okta_url(raw: &str) -> ConfigResult<Url> {
    let invalid = |reason: String| ConfigError::InvalidOktaUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "scheme must be http or https, found '{}'",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("URL has no host".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
