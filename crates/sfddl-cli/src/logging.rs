//! Per-run log file
//!
//! Each run writes to `<log-dir>/<unix-timestamp>/snowflake_connector.log`.

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

pub(crate) const LOG_FILE_NAME: &str = "snowflake_connector.log";

/// Path of the log file for a run started at `timestamp` (unix seconds)
pub(crate) fn log_file_path(base: &Path, timestamp: i64) -> PathBuf {
    base.join(timestamp.to_string()).join(LOG_FILE_NAME)
}

/// Create the per-run log file and install it as the `log` backend.
///
/// `RUST_LOG` overrides the level chosen from `--verbose`. If a logger is
/// already installed the file is still created but records keep going to
/// the existing logger.
pub(crate) fn init(global: &GlobalArgs) -> Result<PathBuf> {
    let base = global.log_dir.clone().unwrap_or_else(std::env::temp_dir);
    let path = log_file_path(&base, chrono::Utc::now().timestamp());
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let level = if global.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let installed = Builder::from_env(Env::default().default_filter_or(level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .try_init();
    if installed.is_err() {
        log::debug!("Logger already installed; {} stays empty", path.display());
    }

    Ok(path)
}

#[cfg(test)]
#[path = "logging_test.rs"]
mod tests;
