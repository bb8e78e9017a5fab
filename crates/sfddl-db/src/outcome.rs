//! Statement and run results

use crate::error::{DbError, DbResult};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use sfddl_core::AuthMode;

/// Rows returned by one statement, rendered as text.
///
/// Results are passed through as the server returned them; DDL usually
/// yields a single status row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementOutcome {
    pub statement: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl StatementOutcome {
    /// Outcome of a statement that returned no result set
    pub fn empty(statement: &str) -> Self {
        Self {
            statement: statement.to_string(),
            ..Default::default()
        }
    }

    /// Render Arrow record batches into text rows.
    ///
    /// Column names come from the first batch; nulls render as `NULL`.
    pub fn from_batches(statement: &str, batches: &[RecordBatch]) -> DbResult<Self> {
        let mut outcome = Self::empty(statement);
        let Some(first) = batches.first() else {
            return Ok(outcome);
        };
        outcome.columns = first
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().to_string())
            .collect();

        let options = FormatOptions::default().with_null("NULL");
        for batch in batches {
            let formatters = batch
                .columns()
                .iter()
                .map(|col| ArrayFormatter::try_new(col.as_ref(), &options))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| DbError::ExecutionError {
                    statement: statement.to_string(),
                    message: format!("cannot render result: {}", e),
                })?;

            for row in 0..batch.num_rows() {
                outcome
                    .rows
                    .push(formatters.iter().map(|f| f.value(row).to_string()).collect());
            }
        }
        Ok(outcome)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Result of a complete run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Auth mode the session was opened with
    pub auth_mode: AuthMode,
    /// One outcome per user statement, in execution order
    pub outcomes: Vec<StatementOutcome>,
    /// Whether the warehouse suspend command was issued
    pub suspended: bool,
}

#[cfg(test)]
#[path = "outcome_test.rs"]
mod tests;
