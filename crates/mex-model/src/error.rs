use thiserror::Error;

use crate::validate::ValidationViolations;

/// Errors raised by the model layer.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The document did not conform to the generated schema.
    #[error("validation failed against {entity_type}:\n{violations}")]
    ValidationFailed {
        /// Entity type that was validated against.
        entity_type: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// No model is registered under this entity type.
    #[error("unknown entity type {0:?}")]
    UnknownEntityType(String),

    /// The document carries no usable `$type` discriminant.
    #[error("document has no string `$type` discriminant")]
    MissingEntityType,

    /// The discriminant names another entity type than the model expects.
    #[error("expected entity type {expected}, found {found}")]
    EntityTypeMismatch {
        /// Entity type of the model.
        expected: &'static str,
        /// Entity type found in the document.
        found: String,
    },

    /// The compiled validator could not be built from the generated schema.
    #[error("validator build error for {entity_type}: {reason}")]
    ValidatorBuild {
        /// Entity type of the schema.
        entity_type: String,
        /// Reason the validator could not be built.
        reason: String,
    },

    /// A document file could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad {
        /// Path to the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
