//! Macro for defining the Snowflake target identifier newtypes.
//!
//! Every identifier shares the same invariant (trimmed, non-empty) and maps a
//! missing value to `ConfigError::MissingField` naming its own field.

/// Define a trimmed, non-empty identifier newtype bound to a config field name.
///
/// Generates:
/// - The struct with `Debug, Clone, PartialEq, Eq, Hash, Serialize`
/// - `FIELD`, the config field name reported when the value is missing
/// - `try_new()` (returns Option), `require()` (returns ConfigResult), `as_str()`
/// - `Display`, `AsRef<str>`, `Deref<Target=str>`, `PartialEq<&str>`
macro_rules! define_identifier {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident => $field:literal;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl $Name {
            /// Config field name this identifier is read from.
            pub const FIELD: &'static str = $field;

            /// Trim the value, returning `None` if nothing is left.
            pub fn try_new(value: impl AsRef<str>) -> Option<Self> {
                let trimmed = value.as_ref().trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Self(trimmed.to_string()))
                }
            }

            /// Like [`try_new`](Self::try_new), reporting a missing field on failure.
            pub fn require(value: Option<&str>) -> $crate::error::ConfigResult<Self> {
                value
                    .and_then(Self::try_new)
                    .ok_or($crate::error::ConfigError::MissingField { field: Self::FIELD })
            }

            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str { &self.0 }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool { self.0 == *other }
        }
    };
}

pub(crate) use define_identifier;
