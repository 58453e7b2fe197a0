//! # mex-model: Entity Models and Generated Schemas
//!
//! Typed extracted models for the MEx metadata entities, each paired with a
//! hand-maintained static schema descriptor. The descriptors are rendered
//! into JSON Schema documents in the notation a model-derived schema uses
//! (class-name references, identifier patterns, enum references for
//! vocabularies). `mex-schema` reconciles those documents with the
//! hand-authored entity schemas.
//!
//! ## Layout
//!
//! - [`vocabulary`]: controlled vocabularies (`DataType`, `Theme`, …).
//! - [`descriptor`]: `FieldKind`, `FieldDescriptor`, `EntityDescriptor`
//!   and their JSON Schema rendering.
//! - [`extracted`]: the `ExtractedModel` trait, shared extracted-data
//!   fields and the registry of all models.
//! - one module per entity.
//! - [`validate`]: `jsonschema` validation of instance documents.
//!
//! ## Crate Policy
//!
//! - A typed model and its descriptor must describe the same document;
//!   the tests of every entity module validate a serialized instance
//!   against the rendered schema.

pub mod descriptor;
pub mod error;
pub mod extracted;
pub mod organization;
pub mod organizational_unit;
pub mod primary_source;
pub mod resource;
pub mod validate;
pub mod variable;
pub mod variable_group;
pub mod vocabulary;

pub use descriptor::{EntityDescriptor, FieldDescriptor, FieldKind, FIELD_REF_PREFIX};
pub use error::ModelError;
pub use extracted::{extracted_model_descriptors, generated_schemas, ExtractedModel};
pub use organization::ExtractedOrganization;
pub use organizational_unit::ExtractedOrganizationalUnit;
pub use primary_source::ExtractedPrimarySource;
pub use resource::ExtractedResource;
pub use validate::{FileValidation, InstanceValidator, ValidationViolations, Violation};
pub use variable::ExtractedVariable;
pub use variable_group::ExtractedVariableGroup;
pub use vocabulary::{AccessRestriction, DataType, Language, Theme, Vocabulary, VocabularyEnum};
