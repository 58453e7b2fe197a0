//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types shared by the MEx crates. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Value-type errors carry the rejected input verbatim.
//! - Settings errors name the environment variable that was malformed.

use thiserror::Error;

/// Top-level error type for the MEx model stack.
#[derive(Error, Debug)]
pub enum MexError {
    /// An identifier did not match the canonical identifier pattern.
    #[error("identifier error: {0}")]
    Identifier(#[from] IdentifierError),

    /// A timestamp could not be parsed.
    #[error("timestamp error: {0}")]
    Timestamp(#[from] TimestampError),

    /// Settings could not be resolved.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    /// A value violated its type constraints.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error constructing an identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The string does not match `MEX_ID_PATTERN`.
    #[error("{kind} {value:?} does not match the identifier pattern")]
    PatternMismatch {
        /// Identifier type that was being constructed.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Error parsing a timestamp.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// The string does not match `TIMESTAMP_REGEX`.
    #[error("{0:?} does not match the timestamp pattern")]
    PatternMismatch(String),

    /// The string matched the pattern but names no valid instant.
    #[error("{value:?} is out of range: {reason}")]
    OutOfRange {
        /// The rejected value.
        value: String,
        /// Why the components could not be combined.
        reason: String,
    },
}

/// Error resolving settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {var}: {reason}")]
    InvalidVar {
        /// Environment variable name.
        var: &'static str,
        /// Reason the value was rejected.
        reason: String,
    },

    /// A dotenv file existed but could not be loaded.
    #[error("cannot load dotenv file {path}: {reason}")]
    DotenvFile {
        /// Path of the dotenv file.
        path: String,
        /// Loader error message.
        reason: String,
    },
}
