//! Run sequence: connect, session setup, statements, optional suspend, close

use crate::error::DbResult;
use crate::outcome::{RunReport, StatementOutcome};
use crate::traits::{Connector, Session};
use sfddl_core::{AuthMode, ConnectionConfig};

/// `USE WAREHOUSE <wh>`
pub fn use_warehouse_sql(config: &ConnectionConfig) -> String {
    format!("USE WAREHOUSE {}", config.warehouse())
}

/// `USE SCHEMA <db>.<schema>`
pub fn use_schema_sql(config: &ConnectionConfig) -> String {
    format!("USE SCHEMA {}.{}", config.database(), config.schema())
}

/// `ALTER WAREHOUSE <wh> SUSPEND`
pub fn suspend_sql(config: &ConnectionConfig) -> String {
    format!("ALTER WAREHOUSE {} SUSPEND", config.warehouse())
}

/// Execute `statements` in order against the configured target.
///
/// The first failing statement ends the run and the warehouse is left
/// running. The session is closed on every path once it has been opened.
/// An empty `statements` still runs session setup and the suspend.
pub async fn run_statements(
    connector: &dyn Connector,
    config: &ConnectionConfig,
    statements: &[String],
) -> DbResult<RunReport> {
    log::debug!(
        "Connecting to account {} with {} backend",
        config.account(),
        connector.db_type()
    );
    let mut session = connector.connect(config).await.map_err(|e| {
        log::error!("{}", e);
        e
    })?;
    match config.auth_mode() {
        AuthMode::Snowflake => log::info!("Authenticated via Snowflake"),
        AuthMode::Okta => log::info!("Authenticated via Okta"),
    }

    let result = run_in_session(session.as_mut(), config, statements).await;
    if let Err(e) = &result {
        log::error!("{}", e);
    }

    match (result, session.close().await) {
        (Ok(report), Ok(())) => Ok(report),
        (Ok(report), Err(e)) => {
            log::warn!("Failed to close connection cleanly: {}", e);
            Ok(report)
        }
        (Err(e), close) => {
            if let Err(close_err) = close {
                log::warn!("Failed to close connection cleanly: {}", close_err);
            }
            Err(e)
        }
    }
}

async fn run_in_session(
    session: &mut dyn Session,
    config: &ConnectionConfig,
    statements: &[String],
) -> DbResult<RunReport> {
    for setup in [use_warehouse_sql(config), use_schema_sql(config)] {
        log::debug!("{}", setup);
        session.execute(&setup).await?;
    }

    let mut outcomes: Vec<StatementOutcome> = Vec::with_capacity(statements.len());
    for sql in statements {
        log::info!("Executing: {}", sql);
        let outcome = session.execute(sql).await?;
        log::debug!("{} row(s) returned", outcome.row_count());
        outcomes.push(outcome);
    }

    let suspended = if config.suspend_after_run() {
        session.execute(&suspend_sql(config)).await?;
        log::info!("Suspended the warehouse");
        true
    } else {
        false
    };

    Ok(RunReport {
        auth_mode: config.auth_mode(),
        outcomes,
        suspended,
    })
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
