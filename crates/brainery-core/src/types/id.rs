//! Opaque string identifiers for domain records.
//!
//! The relational backend issues integer keys and the document backend issues
//! 24-hex object ids. Both are carried as strings so that callers compare and
//! serialize identifiers without knowing which backend produced them. Each
//! backend decides for itself whether a given string can name one of its
//! records; a string it cannot parse simply matches nothing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Macro to define an opaque string identifier newtype.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a backend-issued identifier.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(AppError::validation(concat!(
                        stringify!($name),
                        " must not be empty"
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of a registered identity.
    IdentityId
);

define_id!(
    /// Identifier of a saved topic.
    SavedTopicId
);

define_id!(
    /// Identifier of a resource record.
    ResourceId
);

define_id!(
    /// Identifier of a catalog subject.
    SubjectId
);

define_id!(
    /// Identifier of a catalog topic.
    TopicId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_key_renders_as_string() {
        let id = IdentityId::from(42);
        assert_eq!(id.as_str(), "42");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"42\"");
    }

    #[test]
    fn test_from_str_trims_and_rejects_empty() {
        let id: SavedTopicId = " 65f0c2a1b3d4e5f6a7b8c9d0 ".parse().expect("parse");
        assert_eq!(id.as_str(), "65f0c2a1b3d4e5f6a7b8c9d0");
        assert!("   ".parse::<SavedTopicId>().is_err());
    }
}
