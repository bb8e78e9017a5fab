//! Run command implementation

use anyhow::{Context, Result};
use sfddl_core::{ConnectionConfig, LoadedStatements};
use sfddl_db::executor::{suspend_sql, use_schema_sql, use_warehouse_sql};
use sfddl_db::{run_statements, Connector, RunReport, SnowflakeConnector, StatementOutcome};

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common;
use crate::logging;

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let connector = SnowflakeConnector::with_driver_library(args.driver_library.as_str());
    run_with(&connector, args, global).await.map_err(common::fail)
}

/// Resolve, load and execute against the given connector.
pub(crate) async fn run_with(
    connector: &dyn Connector,
    args: &RunArgs,
    global: &GlobalArgs,
) -> Result<()> {
    let config = common::resolve_config(global, &args.connection, &args.source)?;
    let loaded = config
        .statement_source()
        .load()
        .context("Failed to load statements")?;

    if loaded.record_count == 0 {
        println!("No records to process");
        return Ok(());
    }
    if loaded.is_empty() {
        log::debug!("All {} record(s) are blank", loaded.record_count);
    }

    if args.dry_run {
        print_plan(&config, &loaded);
        return Ok(());
    }

    let log_path = logging::init(global)?;
    if global.verbose {
        eprintln!("Logging to {}", log_path.display());
    }
    log::info!(
        "Running {} statement(s) from {} record(s) on account {}",
        loaded.statements.len(),
        loaded.record_count,
        config.account()
    );

    let report = run_statements(connector, &config, &loaded.statements).await?;

    print_report(&report);
    println!("Processed {} records", loaded.record_count);
    println!("Snowflake transaction complete");
    Ok(())
}

fn print_plan(config: &ConnectionConfig, loaded: &LoadedStatements) {
    println!(
        "Dry run: {} statement(s) for {} via {} auth",
        loaded.statements.len(),
        config.account(),
        config.auth_mode()
    );
    println!("  {}", use_warehouse_sql(config));
    println!("  {}", use_schema_sql(config));
    for sql in &loaded.statements {
        println!("  {}", sql);
    }
    if config.suspend_after_run() {
        println!("  {}", suspend_sql(config));
    }
}

fn print_report(report: &RunReport) {
    for outcome in &report.outcomes {
        println!("{}", outcome.statement);
        print_rows(outcome);
    }
    if report.suspended {
        println!("Warehouse suspended");
    }
}

fn print_rows(outcome: &StatementOutcome) {
    if outcome.rows.is_empty() {
        return;
    }
    println!("  {}", outcome.columns.join(" | "));
    for row in &outcome.rows {
        println!("  {}", row.join(" | "));
    }
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
