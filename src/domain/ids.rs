//! String-backed identifiers.
//!
//! Each id wraps a private `String` and serializes as a bare string.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Create a new `", stringify!($name), "`.")]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_id!(
    /// A participant: trader, liquidity provider or market creator.
    ActorId
);

string_id!(
    /// Label of one tradeable outcome.
    OutcomeId
);

string_id!(
    /// Market identifier, attached to every log line the market emits.
    MarketId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_id_new_and_as_str() {
        let id = ActorId::new("alice");
        assert_eq!(id.as_str(), "alice");
    }

    #[test]
    fn actor_id_display() {
        let id = ActorId::from("bob");
        assert_eq!(format!("{id}"), "bob");
    }

    #[test]
    fn outcome_id_from_string() {
        let id: OutcomeId = String::from("Yes").into();
        assert_eq!(id.as_str(), "Yes");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&OutcomeId::from("No")).unwrap();
        assert_eq!(json, "\"No\"");
    }

    #[test]
    fn market_id_equality() {
        assert_eq!(MarketId::from("m-1"), MarketId::new("m-1"));
        assert_ne!(MarketId::from("m-1"), MarketId::from("m-2"));
    }
}
