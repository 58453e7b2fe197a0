//! # Text, Link and Email Values
//!
//! Small value types that metadata fields are assembled from. Their JSON
//! Schema definitions live in `mex-model`; here they are plain serde types.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::MexError;

/// Pattern every email address must match.
pub const EMAIL_PATTERN: &str = r"^[^@ ]+@[^@ ]+\.[^@ ]+$";

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

/// Language tag of a [`Text`] or [`Link`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextLanguage {
    /// German
    De,
    /// English
    En,
}

impl TextLanguage {
    /// All supported language tags.
    pub const ALL: [TextLanguage; 2] = [TextLanguage::De, TextLanguage::En];

    /// The lowercase tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    /// Parse a tag, ignoring case. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "de" => Some(Self::De),
            "en" => Some(Self::En),
            _ => None,
        }
    }
}

/// A string value with an optional language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Text {
    /// The text itself.
    pub value: String,
    /// Language of the text, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<TextLanguage>,
}

impl Text {
    /// Create a text with a language.
    pub fn new(value: impl Into<String>, language: Option<TextLanguage>) -> Self {
        Self {
            value: value.into(),
            language,
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.language {
            Some(language) => write!(f, "{} ({})", self.value, language.as_str()),
            None => f.write_str(&self.value),
        }
    }
}

/// A hyperlink with optional title and language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// Link target.
    pub url: Url,
    /// Human readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Language of the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<TextLanguage>,
}

impl Link {
    /// Parse a bare URL into an untitled link.
    ///
    /// # Errors
    ///
    /// Returns `MexError::InvalidValue` if `url` is not an absolute URL.
    pub fn parse(url: &str) -> Result<Self, MexError> {
        let url = Url::parse(url)
            .map_err(|e| MexError::InvalidValue(format!("invalid url {url:?}: {e}")))?;
        Ok(Self {
            url,
            title: None,
            language: None,
        })
    }
}

/// A validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and wrap an email address.
    ///
    /// # Errors
    ///
    /// Returns `MexError::InvalidValue` if the value does not match
    /// [`EMAIL_PATTERN`].
    pub fn new(value: impl Into<String>) -> Result<Self, MexError> {
        let value = value.into();
        if EMAIL_REGEX.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(MexError::InvalidValue(format!("invalid email {value:?}")))
        }
    }

    /// Access the address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = MexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_serializes_without_missing_language() {
        let text = Text::new("Abteilung 1", None);
        assert_eq!(
            serde_json::to_value(&text).unwrap(),
            serde_json::json!({"value": "Abteilung 1"})
        );
        let text = Text::new("Department 1", Some(TextLanguage::En));
        assert_eq!(
            serde_json::to_value(&text).unwrap(),
            serde_json::json!({"value": "Department 1", "language": "en"})
        );
    }

    #[test]
    fn test_language_from_tag() {
        assert_eq!(TextLanguage::from_tag("DE"), Some(TextLanguage::De));
        assert_eq!(TextLanguage::from_tag("fr"), None);
    }

    #[test]
    fn test_email_validation() {
        assert!(Email::new("info@rki.de").is_ok());
        assert!(Email::new("no-at-sign.de").is_err());
        assert!(Email::new("two words@rki.de").is_err());
        let bad: Result<Email, _> = serde_json::from_str(r#""@""#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_link_parse() {
        let link = Link::parse("https://www.rki.de").unwrap();
        assert_eq!(link.url.as_str(), "https://www.rki.de/");
        assert!(Link::parse("not a url").is_err());
    }
}
