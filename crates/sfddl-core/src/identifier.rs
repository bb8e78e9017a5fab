//! Strongly-typed identifiers for the Snowflake target (account, warehouse, database, schema).

use crate::error::ConfigResult;
use crate::newtype_string::define_identifier;

define_identifier! {
    /// Snowflake account identifier, e.g. `xy12345.eu-west-1`.
    pub struct Account => "account";
}

define_identifier! {
    /// Virtual warehouse that runs the statements.
    pub struct Warehouse => "warehouse";
}

define_identifier! {
    /// Database the session is bound to.
    pub struct Database => "database";
}

define_identifier! {
    /// Schema the session is bound to.
    pub struct Schema => "schema";
}

impl Account {
    /// Resolve an account identifier, dropping any `scheme://` prefix and trailing `/`.
    ///
    /// Users often paste the account URL instead of the bare identifier.
    pub fn normalize(value: Option<&str>) -> ConfigResult<Self> {
        let stripped = value.map(|v| {
            let v = v.trim();
            let v = match v.find("//") {
                Some(pos) => &v[pos + 2..],
                None => v,
            };
            v.trim_end_matches('/')
        });
        Self::require(stripped)
    }
}

#[cfg(test)]
#[path = "identifier_test.rs"]
mod tests;
