//! Identifiers for characters, chronicles, users and ledger rows
//!
//! Every id is a v4 UUID behind its own newtype. Ids travel as their
//! hyphenated text form: that is what the SQLite columns hold and what
//! `FromStr` reads back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text that is not a valid id of the named kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: {value:?}")]
pub struct InvalidId {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident => $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.hyphenated().fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self).map_err(|_| InvalidId {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }
    };
}

define_id!(CharacterId => "character id");
define_id!(
    /// A storytelling group; reviewers only act on characters in theirs
    ChronicleId => "chronicle id"
);
define_id!(UserId => "user id");
define_id!(
    /// One ledger row
    SpendRequestId => "spend request id"
);
define_id!(
    /// One background rating on a sheet; a character may hold the same
    /// background several times
    BackgroundRatingId => "background rating id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_form_parses_back() {
        let id = SpendRequestId::new();
        assert_eq!(id.to_string().parse::<SpendRequestId>().unwrap(), id);
    }

    #[test]
    fn test_parse_error_names_the_kind() {
        let err = "not-a-uuid".parse::<CharacterId>().unwrap_err();
        assert_eq!(err.kind, "character id");
        assert_eq!(err.to_string(), "Invalid character id: \"not-a-uuid\"");
    }

    #[test]
    fn test_serializes_as_bare_string() {
        let id = UserId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
