//! Check command implementation

use anyhow::{Context, Result};

use crate::cli::{CheckArgs, GlobalArgs};
use crate::commands::common;

/// Execute the check command
pub async fn execute(args: &CheckArgs, global: &GlobalArgs) -> Result<()> {
    check(args, global).map_err(common::fail)
}

/// Render the resolved configuration as pretty JSON, password redacted.
pub(crate) fn render(args: &CheckArgs, global: &GlobalArgs) -> Result<String> {
    let config = common::resolve_config(global, &args.connection, &args.source)?;
    serde_json::to_string_pretty(&config.summary()).context("Failed to serialize configuration")
}

fn check(args: &CheckArgs, global: &GlobalArgs) -> Result<()> {
    println!("{}", render(args, global)?);
    println!("Configuration OK");
    Ok(())
}

#[cfg(test)]
#[path = "check_test.rs"]
mod tests;
