//! Primary sources: the systems metadata is extracted from.

use mex_core::{
    ExtractedPrimarySourceIdentifier, Link, MergedOrganizationalUnitIdentifier,
    MergedPrimarySourceIdentifier, Text, TypedIdentifier,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::descriptor::{EntityDescriptor, FieldDescriptor, FieldKind};
use crate::extracted::{extracted_data_fields, ExtractedData, ExtractedModel};
use crate::resource::{contact_kind, ContactIdentifier};

/// An automatically extracted metadata set describing a primary source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPrimarySource {
    #[serde(flatten)]
    pub extracted: ExtractedData,
    pub identifier: ExtractedPrimarySourceIdentifier,
    pub stable_target_id: MergedPrimarySourceIdentifier,
    #[serde(default)]
    pub alternative_title: Vec<Text>,
    #[serde(default)]
    pub contact: Vec<ContactIdentifier>,
    #[serde(default)]
    pub description: Vec<Text>,
    #[serde(default)]
    pub documentation: Vec<Link>,
    #[serde(default)]
    pub located_at: Vec<Link>,
    #[serde(default)]
    pub title: Vec<Text>,
    #[serde(default)]
    pub unit_in_charge: Vec<MergedOrganizationalUnitIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ExtractedModel for ExtractedPrimarySource {
    const ENTITY_TYPE: &'static str = "ExtractedPrimarySource";

    fn descriptor() -> EntityDescriptor {
        let mut fields = extracted_data_fields::<
            ExtractedPrimarySourceIdentifier,
            MergedPrimarySourceIdentifier,
        >();
        fields.extend([
            FieldDescriptor::optional("alternativeTitle", FieldKind::texts()),
            FieldDescriptor::optional("contact", FieldKind::list(contact_kind())),
            FieldDescriptor::optional("description", FieldKind::texts()),
            FieldDescriptor::optional("documentation", FieldKind::links()),
            FieldDescriptor::optional("locatedAt", FieldKind::links()),
            FieldDescriptor::optional("title", FieldKind::texts()),
            FieldDescriptor::optional(
                "unitInCharge",
                FieldKind::list(FieldKind::Identifier(MergedOrganizationalUnitIdentifier::TITLE)),
            ),
            FieldDescriptor::optional("version", FieldKind::String)
                .with_examples([json!("v1"), json!("2023-01-16")]),
        ]);
        EntityDescriptor {
            entity_type: Self::ENTITY_TYPE,
            description: "An automatically extracted metadata set describing a primary source.",
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::InstanceValidator;

    #[test]
    fn test_minimal_primary_source_is_valid() {
        let source = ExtractedPrimarySource {
            extracted: ExtractedData::new(MergedPrimarySourceIdentifier::from_seed(0), "mex"),
            identifier: ExtractedPrimarySourceIdentifier::from_seed(30),
            stable_target_id: MergedPrimarySourceIdentifier::from_seed(31),
            alternative_title: vec![],
            contact: vec![],
            description: vec![],
            documentation: vec![Link::parse("https://mex.rki.de/docs").unwrap()],
            located_at: vec![],
            title: vec![Text::new("Metadatenkatalog", None)],
            unit_in_charge: vec![],
            version: None,
        };
        let document = source.to_document().unwrap();
        InstanceValidator::new().validate_document(&document).unwrap();
        assert_eq!(document["documentation"][0]["url"], "https://mex.rki.de/docs");
    }

    #[test]
    fn test_link_requires_url() {
        let document = json!({
            "$type": "ExtractedPrimarySource",
            "hadPrimarySource": "00000000000000000000",
            "identifierInPrimarySource": "mex",
            "identifier": "0000000000000000000U",
            "stableTargetId": "0000000000000000000V",
            "locatedAt": [{"title": "Startseite"}],
        });
        let err = InstanceValidator::new()
            .validate_document(&document)
            .unwrap_err();
        assert!(err.to_string().contains("url"), "{err}");
    }

    #[test]
    fn test_only_shared_fields_are_required() {
        assert_eq!(
            ExtractedPrimarySource::descriptor().required(),
            ["hadPrimarySource", "identifierInPrimarySource", "identifier", "stableTargetId"]
        );
    }
}
