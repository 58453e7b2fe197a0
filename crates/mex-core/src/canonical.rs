//! # Canonical JSON
//!
//! Schema fragments are compared and deduplicated structurally. Two
//! fragments that differ only in key order must produce the same bytes, so
//! every structural key flows through [`CanonicalJson`], which serializes
//! with RFC 8785 (JCS) rules: sorted keys, compact separators, deterministic
//! number formatting.
//!
//! Unlike digest-oriented canonicalization, nothing is rejected here: schema
//! documents may legitimately contain floats (`minimum: 0.5`), and a failed
//! JCS pass falls back to `serde_json`'s own compact form, which is still
//! key-sorted for `serde_json::Value`.

use serde_json::Value;

/// The canonical serialization of a JSON value.
///
/// Ordering follows the byte order of the serialization, which gives unions
/// of schema alternatives a stable order regardless of authoring order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalJson(String);

impl CanonicalJson {
    /// Canonicalize a JSON value.
    pub fn new(value: &Value) -> Self {
        Self(canonical_json(value))
    }

    /// Access the canonical text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the canonical text back into a value.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the text is not valid JSON, which
    /// cannot happen for values built through [`CanonicalJson::new`].
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.0)
    }
}

impl AsRef<str> for CanonicalJson {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Serialize a JSON value in canonical form.
pub fn canonical_json(value: &Value) -> String {
    serde_jcs::to_string(value).unwrap_or_else(|_| value.to_string())
}
