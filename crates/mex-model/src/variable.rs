//! Variables: single pieces of information within a resource.

use mex_core::{
    ExtractedVariableIdentifier, MergedResourceIdentifier, MergedVariableGroupIdentifier,
    MergedVariableIdentifier, Text, TypedIdentifier,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::descriptor::{EntityDescriptor, FieldDescriptor, FieldKind};
use crate::extracted::{extracted_data_fields, ExtractedData, ExtractedModel};
use crate::vocabulary::{DataType, VocabularyEnum};

/// An automatically extracted metadata set describing a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedVariable {
    /// Provenance.
    #[serde(flatten)]
    pub extracted: ExtractedData,
    /// Identifier of this extracted item.
    pub identifier: ExtractedVariableIdentifier,
    /// Identifier of the merged variable.
    pub stable_target_id: MergedVariableIdentifier,
    /// Variable groups this variable belongs to.
    #[serde(default)]
    pub belongs_to: Vec<MergedVariableGroupIdentifier>,
    /// Coding system of the values, e.g. a questionnaire version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding_system: Option<String>,
    /// Type of the values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    /// Free-text description.
    #[serde(default)]
    pub description: Vec<Text>,
    /// Label, at least one.
    pub label: Vec<Text>,
    /// Resources this variable is used in, at least one.
    pub used_in: Vec<MergedResourceIdentifier>,
    /// Allowed values.
    #[serde(default)]
    pub value_set: Vec<String>,
}

impl ExtractedModel for ExtractedVariable {
    const ENTITY_TYPE: &'static str = "ExtractedVariable";

    fn descriptor() -> EntityDescriptor {
        let mut fields =
            extracted_data_fields::<ExtractedVariableIdentifier, MergedVariableIdentifier>();
        fields.extend([
            FieldDescriptor::optional(
                "belongsTo",
                FieldKind::list(FieldKind::Identifier(MergedVariableGroupIdentifier::TITLE)),
            ),
            FieldDescriptor::optional("codingSystem", FieldKind::String)
                .with_examples([json!("SF-36 Version 1")]),
            FieldDescriptor::optional("dataType", FieldKind::Vocabulary(DataType::VOCABULARY))
                .with_examples([json!("https://mex.rki.de/concept/data-type-1")]),
            FieldDescriptor::optional("description", FieldKind::texts()),
            FieldDescriptor::required("label", FieldKind::non_empty_list(FieldKind::Definition("Text")))
                .with_examples([json!({"language": "de", "value": "Mehrere Treppenabsätze steigen"})]),
            FieldDescriptor::required(
                "usedIn",
                FieldKind::non_empty_list(FieldKind::Identifier(MergedResourceIdentifier::TITLE)),
            ),
            FieldDescriptor::optional("valueSet", FieldKind::list(FieldKind::String))
                .with_examples([
                    json!("Ja, stark eingeschränkt"),
                    json!("Ja, etwas eingeschränkt"),
                    json!("Nein, überhaupt nicht eingeschränkt"),
                ]),
        ]);
        EntityDescriptor {
            entity_type: Self::ENTITY_TYPE,
            description: "An automatically extracted metadata set describing a variable.",
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::InstanceValidator;
    use mex_core::{MergedPrimarySourceIdentifier, TextLanguage};

    fn variable() -> ExtractedVariable {
        ExtractedVariable {
            extracted: ExtractedData::new(MergedPrimarySourceIdentifier::from_seed(10), "var-7"),
            identifier: ExtractedVariableIdentifier::from_seed(11),
            stable_target_id: MergedVariableIdentifier::from_seed(12),
            belongs_to: vec![MergedVariableGroupIdentifier::from_seed(13)],
            coding_system: Some("SF-36 Version 1".to_string()),
            data_type: Some(DataType::Integer),
            description: vec![],
            label: vec![Text::new("Mehrere Treppenabsätze steigen", Some(TextLanguage::De))],
            used_in: vec![MergedResourceIdentifier::from_seed(14)],
            value_set: vec!["Ja".to_string(), "Nein".to_string()],
        }
    }

    #[test]
    fn test_serialized_variable_is_valid() {
        let validator = InstanceValidator::new();
        let document = variable().to_document().unwrap();
        validator.validate_document(&document).unwrap();
    }

    #[test]
    fn test_empty_label_is_rejected() {
        let validator = InstanceValidator::new();
        let mut item = variable();
        item.label.clear();
        let err = validator
            .validate_document(&item.to_document().unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("/label"), "{err}");
    }

    #[test]
    fn test_unknown_data_type_is_rejected() {
        let validator = InstanceValidator::new();
        let mut document = variable().to_document().unwrap();
        document["dataType"] = json!("https://mex.rki.de/concept/theme-1");
        assert!(validator.validate_document(&document).is_err());
    }

    #[test]
    fn test_optional_fields_are_skipped() {
        let mut item = variable();
        item.coding_system = None;
        item.data_type = None;
        let document = item.to_document().unwrap();
        assert!(document.get("codingSystem").is_none());
        assert!(document.get("dataType").is_none());
        assert_eq!(document["description"], json!([]));
    }
}
