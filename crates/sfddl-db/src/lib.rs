//! sfddl-db - Statement execution for sfddl
//!
//! This crate provides the `Connector` and `Session` traits, the
//! ADBC-backed Snowflake implementation and the run sequence built on them.

pub mod error;
pub mod executor;
pub mod outcome;
pub mod snowflake;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use error::{DbError, DbResult};
pub use executor::run_statements;
pub use outcome::{RunReport, StatementOutcome};
pub use snowflake::{SnowflakeConnector, DEFAULT_DRIVER_LIBRARY};
pub use traits::{Connector, Session};
