//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// sfddl - Run DDL statements against Snowflake
#[derive(Parser, Debug)]
#[command(name = "sfddl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (debug-level log file)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// YAML config file providing defaults for connection and statement options
    #[arg(short, long, global = true, env = "SFDDL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory receiving per-run log folders (default: system temp dir)
    #[arg(long, global = true, env = "SFDDL_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute statements against Snowflake
    Run(RunArgs),

    /// Resolve and print the configuration without connecting
    Check(CheckArgs),
}

/// Connection settings, each readable from an `SFDDL_*` environment variable
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Authentication mode: snowflake or okta
    #[arg(long, env = "SFDDL_AUTH_MODE")]
    pub auth_mode: Option<String>,

    /// Snowflake user name
    #[arg(short, long, env = "SFDDL_USERNAME")]
    pub username: Option<String>,

    /// Snowflake password
    #[arg(long, env = "SFDDL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Okta URL used for federated authentication
    #[arg(long, env = "SFDDL_OKTA_URL")]
    pub okta_url: Option<String>,

    /// Snowflake account identifier
    #[arg(short, long, env = "SFDDL_ACCOUNT")]
    pub account: Option<String>,

    /// Warehouse to run statements on
    #[arg(short, long, env = "SFDDL_WAREHOUSE")]
    pub warehouse: Option<String>,

    /// Target database
    #[arg(short, long, env = "SFDDL_DATABASE")]
    pub database: Option<String>,

    /// Target schema
    #[arg(long, env = "SFDDL_SCHEMA")]
    pub schema: Option<String>,

    /// Suspend the warehouse after all statements succeed
    #[arg(long, env = "SFDDL_SUSPEND_WAREHOUSE")]
    pub suspend_warehouse: bool,

    /// Login timeout in seconds, passed to the driver
    #[arg(long, env = "SFDDL_LOGIN_TIMEOUT")]
    pub login_timeout: Option<u64>,
}

/// Where the SQL text comes from
#[derive(Args, Debug, Clone, Default)]
pub struct StatementArgs {
    /// SQL statement to execute (repeatable, runs in the order given)
    #[arg(short = 'e', long = "statement")]
    pub statements: Vec<String>,

    /// JSON or JSON Lines file of records holding the SQL
    #[arg(long)]
    pub records: Option<PathBuf>,

    /// Record field whose value is the SQL to execute
    #[arg(short, long)]
    pub field: Option<String>,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub source: StatementArgs,

    /// Resolve and print what would run without connecting
    #[arg(long)]
    pub dry_run: bool,

    /// ADBC Snowflake driver library name or path
    #[arg(
        long,
        env = "SFDDL_DRIVER_LIBRARY",
        default_value = sfddl_db::DEFAULT_DRIVER_LIBRARY
    )]
    pub driver_library: String,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub source: StatementArgs,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
