//! Statement sources: where the SQL text to execute comes from.
//!
//! A source is resolved at configuration time, but the statement text itself
//! is only read when the run starts ([`StatementSource::load`]).

use crate::error::{ConfigError, ConfigResult};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Where the statements for a run come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatementSource {
    /// Literal statements, executed in the given order
    Inline { statements: Vec<String> },
    /// One statement per record, read from `field` of each record in a JSON
    /// array or JSON Lines file
    RecordField { path: PathBuf, field: String },
}

/// Statements read from a source, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedStatements {
    /// Non-blank statement texts
    pub statements: Vec<String>,
    /// Number of records seen, including those with no statement
    pub record_count: usize,
}

impl LoadedStatements {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl StatementSource {
    /// Build a source from the raw inputs. Exactly one of inline statements
    /// or a record file (with a field name) must be given.
    pub fn resolve(
        statements: Vec<String>,
        records: Option<PathBuf>,
        field: Option<String>,
    ) -> ConfigResult<Self> {
        let statements: Vec<String> = statements
            .iter()
            .filter_map(|s| non_blank(s))
            .collect();
        let field = field.as_deref().and_then(non_blank);

        match (statements.is_empty(), records, field) {
            (false, Some(_), _) => Err(ConfigError::InvalidStatementSource {
                message: "use either inline statements or a record file, not both".to_string(),
            }),
            (false, None, Some(_)) => Err(ConfigError::InvalidStatementSource {
                message: "a field name was given without a record file".to_string(),
            }),
            (false, None, None) => Ok(StatementSource::Inline { statements }),
            (true, Some(path), Some(field)) => Ok(StatementSource::RecordField { path, field }),
            (true, Some(path), None) => Err(ConfigError::InvalidStatementSource {
                message: format!(
                    "record file '{}' requires the name of the field holding the SQL",
                    path.display()
                ),
            }),
            (true, None, _) => Err(ConfigError::MissingField {
                field: "statement_source",
            }),
        }
    }

    /// Read the statement texts
    pub fn load(&self) -> ConfigResult<LoadedStatements> {
        match self {
            StatementSource::Inline { statements } => Ok(LoadedStatements {
                statements: statements.clone(),
                record_count: statements.len(),
            }),
            StatementSource::RecordField { path, field } => load_record_field(path, field),
        }
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn load_record_field(path: &Path, field: &str) -> ConfigResult<LoadedStatements> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let records = parse_records(&content)?;
    let record_count = records.len();
    let mut statements = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        let number = idx + 1;
        let Value::Object(map) = record else {
            return Err(ConfigError::InvalidRecord {
                record: number,
                message: "expected a JSON object".to_string(),
            });
        };
        let text = match map.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => non_blank(s),
            Some(Value::Bool(b)) => Some(b.to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Array(_)) | Some(Value::Object(_)) => {
                return Err(ConfigError::InvalidRecord {
                    record: number,
                    message: format!("field '{}' holds a nested value, not SQL text", field),
                })
            }
        };
        match text {
            Some(sql) => statements.push(sql),
            None => log::debug!("Record #{} has no value for '{}', skipping", number, field),
        }
    }

    Ok(LoadedStatements {
        statements,
        record_count,
    })
}

/// Parse a JSON array of records, or JSON Lines when the content is not an array.
fn parse_records(content: &str) -> ConfigResult<Vec<Value>> {
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(content).map_err(|e| ConfigError::InvalidRecord {
            record: 1,
            message: e.to_string(),
        });
    }

    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| ConfigError::InvalidRecord {
                record: idx + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "statement_test.rs"]
mod tests;
