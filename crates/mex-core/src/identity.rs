//! # Identifiers
//!
//! Every MEx item is addressed by an [`Identifier`]: a short base-62 string
//! matching [`MEX_ID_PATTERN`]. Typed newtypes distinguish the identifier
//! namespaces: you cannot pass a `MergedVariableIdentifier` where a
//! `MergedResourceIdentifier` is expected.
//!
//! Each typed identifier carries the schema `TITLE` it is rendered with in a
//! generated JSON Schema. The schema reconciliation derives the referenced
//! entity from that title (`MergedResourceIdentifier` → `resource`), so the
//! type names here are part of the schema contract.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

use crate::error::IdentifierError;

/// Pattern every identifier must match, shared across the schema family.
pub const MEX_ID_PATTERN: &str = r"^[a-zA-Z0-9]{14,22}$";

static MEX_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MEX_ID_PATTERN).expect("valid regex"));

const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of generated identifiers (`62^22 > 2^128`).
const GENERATED_LENGTH: usize = 22;

/// An untyped MEx identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Validate and wrap an identifier string.
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::PatternMismatch` if `value` does not match
    /// [`MEX_ID_PATTERN`].
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        Self::checked("Identifier", value.into())
    }

    fn checked(kind: &'static str, value: String) -> Result<Self, IdentifierError> {
        if MEX_ID_REGEX.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(IdentifierError::PatternMismatch { kind, value })
        }
    }

    /// Generate a new random identifier from a version 4 UUID.
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Derive an identifier deterministically from a seed.
    ///
    /// The seed is stamped as a version 4 UUID first, so seeded and random
    /// identifiers share one format.
    pub fn from_seed(seed: u128) -> Self {
        Self::from_uuid(Builder::from_random_bytes(seed.to_be_bytes()).into_uuid())
    }

    fn from_uuid(uuid: Uuid) -> Self {
        Self(base62_encode(uuid.as_u128()))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `value` matches [`MEX_ID_PATTERN`].
    pub fn is_valid(value: &str) -> bool {
        MEX_ID_REGEX.is_match(value)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::checked("Identifier", value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn base62_encode(mut n: u128) -> String {
    let mut digits = Vec::with_capacity(GENERATED_LENGTH);
    while n > 0 {
        digits.push(BASE62_ALPHABET[(n % 62) as usize]);
        n /= 62;
    }
    while digits.len() < GENERATED_LENGTH {
        digits.push(b'0');
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

/// An identifier bound to one entity namespace.
pub trait TypedIdentifier:
    Clone + fmt::Debug + fmt::Display + Into<Identifier> + Serialize + for<'de> Deserialize<'de>
{
    /// Title used when this identifier type is rendered into a JSON Schema.
    const TITLE: &'static str;

    /// Wrap an already validated identifier.
    fn from_identifier(identifier: Identifier) -> Self;

    /// Borrow the untyped identifier.
    fn as_identifier(&self) -> &Identifier;
}

macro_rules! typed_identifier {
    ($($(#[$meta:meta])* $name:ident;)+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(try_from = "String", into = "String")]
            pub struct $name(Identifier);

            impl $name {
                /// Validate and wrap an identifier string.
                ///
                /// # Errors
                ///
                /// Returns `IdentifierError::PatternMismatch` if `value` does
                /// not match [`MEX_ID_PATTERN`].
                pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
                    Identifier::checked(stringify!($name), value.into()).map(Self)
                }

                /// Generate a new random identifier.
                pub fn generate() -> Self {
                    Self(Identifier::generate())
                }

                /// Derive an identifier deterministically from a seed.
                pub fn from_seed(seed: u128) -> Self {
                    Self(Identifier::from_seed(seed))
                }

                /// Access the identifier string.
                pub fn as_str(&self) -> &str {
                    self.0.as_str()
                }
            }

            impl TypedIdentifier for $name {
                const TITLE: &'static str = stringify!($name);

                fn from_identifier(identifier: Identifier) -> Self {
                    Self(identifier)
                }

                fn as_identifier(&self) -> &Identifier {
                    &self.0
                }
            }

            impl TryFrom<String> for $name {
                type Error = IdentifierError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::new(value)
                }
            }

            impl From<$name> for String {
                fn from(value: $name) -> Self {
                    value.0.into()
                }
            }

            impl From<$name> for Identifier {
                fn from(value: $name) -> Self {
                    value.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(&self.0, f)
                }
            }
        )+
    };
}

typed_identifier! {
    /// Identifier of an extracted organization.
    ExtractedOrganizationIdentifier;
    /// Identifier of an extracted organizational unit.
    ExtractedOrganizationalUnitIdentifier;
    /// Identifier of an extracted primary source.
    ExtractedPrimarySourceIdentifier;
    /// Identifier of an extracted resource.
    ExtractedResourceIdentifier;
    /// Identifier of an extracted variable group.
    ExtractedVariableGroupIdentifier;
    /// Identifier of an extracted variable.
    ExtractedVariableIdentifier;
    /// Stable target identifier shared by all organizations merged into one.
    MergedOrganizationIdentifier;
    /// Stable target identifier of a merged organizational unit.
    MergedOrganizationalUnitIdentifier;
    /// Stable target identifier of a merged primary source.
    MergedPrimarySourceIdentifier;
    /// Stable target identifier of a merged resource.
    MergedResourceIdentifier;
    /// Stable target identifier of a merged variable group.
    MergedVariableGroupIdentifier;
    /// Stable target identifier of a merged variable.
    MergedVariableIdentifier;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_identifier_matches_pattern() {
        for _ in 0..100 {
            let id = Identifier::generate();
            assert!(Identifier::is_valid(id.as_str()), "bad id {id}");
            assert_eq!(id.as_str().len(), GENERATED_LENGTH);
        }
    }

    #[test]
    fn test_seeded_identifier_is_deterministic() {
        assert_eq!(Identifier::from_seed(42), Identifier::from_seed(42));
        assert_ne!(Identifier::from_seed(42), Identifier::from_seed(43));
    }

    #[test]
    fn test_seed_zero_is_still_valid() {
        let id = Identifier::from_seed(0);
        assert!(Identifier::is_valid(id.as_str()));
    }

    #[test]
    fn test_new_rejects_short_and_symbolic_values() {
        assert!(Identifier::new("short").is_err());
        assert!(Identifier::new("has-dashes-in-it-00").is_err());
        assert!(Identifier::new("a".repeat(23)).is_err());
        assert!(Identifier::new("bFQoRhcVH5DHU6").is_ok());
    }

    #[test]
    fn test_typed_identifier_error_names_type() {
        let err = MergedResourceIdentifier::new("nope").unwrap_err();
        assert!(err.to_string().contains("MergedResourceIdentifier"));
    }

    #[test]
    fn test_typed_identifier_title() {
        assert_eq!(MergedResourceIdentifier::TITLE, "MergedResourceIdentifier");
        assert_eq!(
            ExtractedOrganizationalUnitIdentifier::TITLE,
            "ExtractedOrganizationalUnitIdentifier"
        );
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let id = MergedVariableIdentifier::from_seed(7);
        let json = serde_json::to_string(&id).unwrap();
        let back: MergedVariableIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let bad: Result<MergedVariableIdentifier, _> = serde_json::from_str(r#""x""#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_typed_into_untyped() {
        let typed = MergedOrganizationIdentifier::from_seed(1);
        let untyped: Identifier = typed.clone().into();
        assert_eq!(untyped.as_str(), typed.as_str());
        assert_eq!(typed.as_identifier(), &untyped);
    }
}
