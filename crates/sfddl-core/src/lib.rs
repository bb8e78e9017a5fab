//! sfddl-core - Core library for sfddl
//!
//! This crate turns raw, layered configuration (config file, environment,
//! command-line flags) into a validated, immutable [`ConnectionConfig`], and
//! reads the statements a run executes from its [`StatementSource`].

pub mod auth;
pub mod config;
pub mod error;
pub mod identifier;
mod newtype_string;
pub mod statement;

pub use auth::{parse_okta_url, AuthCredentials, AuthMode};
pub use config::{ConfigFile, ConfigSummary, ConnectionConfig, RawConfig};
pub use error::{ConfigError, ConfigResult};
pub use identifier::{Account, Database, Schema, Warehouse};
pub use statement::{LoadedStatements, StatementSource};
