//! # Extracted Models
//!
//! Every entity an extractor produces is an `Extracted*` model. They share
//! four fields: the primary source they came from, their identifier inside
//! that source, their own identifier and the stable target identifier of
//! the merged item they contribute to.
//!
//! Documents carry a `$type` discriminant naming the concrete model, which
//! is how mixed NDJSON streams are routed back to a model.

use std::collections::BTreeMap;

use mex_core::{MergedPrimarySourceIdentifier, TypedIdentifier};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::descriptor::{EntityDescriptor, FieldDescriptor, FieldKind, DISCRIMINANT};
use crate::error::ModelError;
use crate::{
    ExtractedOrganization, ExtractedOrganizationalUnit, ExtractedPrimarySource,
    ExtractedResource, ExtractedVariable, ExtractedVariableGroup,
};

/// Provenance fields shared by every extracted model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedData {
    /// The primary source this item was extracted from.
    pub had_primary_source: MergedPrimarySourceIdentifier,
    /// Identifier of the item inside its primary source.
    pub identifier_in_primary_source: String,
}

impl ExtractedData {
    /// Provenance for an item of `had_primary_source`.
    pub fn new(
        had_primary_source: MergedPrimarySourceIdentifier,
        identifier_in_primary_source: impl Into<String>,
    ) -> Self {
        Self {
            had_primary_source,
            identifier_in_primary_source: identifier_in_primary_source.into(),
        }
    }
}

/// Descriptors of the shared fields for a model whose own identifier is
/// `I` and whose merged identifier is `M`.
pub fn extracted_data_fields<I: TypedIdentifier, M: TypedIdentifier>() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::required(
            "hadPrimarySource",
            FieldKind::Identifier(MergedPrimarySourceIdentifier::TITLE),
        ),
        FieldDescriptor::required("identifierInPrimarySource", FieldKind::String),
        FieldDescriptor::required("identifier", FieldKind::Identifier(I::TITLE)),
        FieldDescriptor::required("stableTargetId", FieldKind::Identifier(M::TITLE)),
    ]
}

/// A typed extracted model with a static schema descriptor.
pub trait ExtractedModel: Serialize + DeserializeOwned {
    /// Concrete entity type, the value of `$type`.
    const ENTITY_TYPE: &'static str;

    /// Static schema descriptor of this model.
    fn descriptor() -> EntityDescriptor;

    /// Serialize into a document tagged with `$type`.
    fn to_document(&self) -> Result<Value, ModelError> {
        let mut document = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut document {
            map.insert(
                DISCRIMINANT.to_string(),
                Value::String(Self::ENTITY_TYPE.to_string()),
            );
        }
        Ok(document)
    }

    /// Deserialize a document, checking its `$type` if present.
    fn from_document(mut document: Value) -> Result<Self, ModelError> {
        if let Value::Object(map) = &mut document {
            match map.remove(DISCRIMINANT) {
                None => {}
                Some(Value::String(found)) if found == Self::ENTITY_TYPE => {}
                Some(Value::String(found)) => {
                    return Err(ModelError::EntityTypeMismatch {
                        expected: Self::ENTITY_TYPE,
                        found,
                    })
                }
                Some(_) => return Err(ModelError::MissingEntityType),
            }
        }
        Ok(serde_json::from_value(document)?)
    }
}

/// Descriptors of all extracted models, sorted by entity type.
pub fn extracted_model_descriptors() -> Vec<EntityDescriptor> {
    let mut descriptors = vec![
        ExtractedOrganization::descriptor(),
        ExtractedOrganizationalUnit::descriptor(),
        ExtractedPrimarySource::descriptor(),
        ExtractedResource::descriptor(),
        ExtractedVariable::descriptor(),
        ExtractedVariableGroup::descriptor(),
    ];
    descriptors.sort_by_key(|descriptor| descriptor.entity_type);
    descriptors
}

/// Generated JSON Schemas keyed by entity type without the `Extracted`
/// prefix, e.g. `Variable`.
pub fn generated_schemas() -> BTreeMap<String, Value> {
    extracted_model_descriptors()
        .into_iter()
        .map(|descriptor| (descriptor.name().to_string(), descriptor.json_schema()))
        .collect()
}
