//! Organizational units: departments, groups and other units of an
//! organization.

use mex_core::{
    Email, ExtractedOrganizationalUnitIdentifier, Link, MergedOrganizationIdentifier,
    MergedOrganizationalUnitIdentifier, Text, TypedIdentifier,
};
use serde::{Deserialize, Serialize};

use crate::descriptor::{EntityDescriptor, FieldDescriptor, FieldKind};
use crate::extracted::{extracted_data_fields, ExtractedData, ExtractedModel};

/// An automatically extracted metadata set describing an organizational unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedOrganizationalUnit {
    #[serde(flatten)]
    pub extracted: ExtractedData,
    pub identifier: ExtractedOrganizationalUnitIdentifier,
    pub stable_target_id: MergedOrganizationalUnitIdentifier,
    #[serde(default)]
    pub alternative_name: Vec<Text>,
    #[serde(default)]
    pub email: Vec<Email>,
    pub name: Vec<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_unit: Option<MergedOrganizationalUnitIdentifier>,
    #[serde(default)]
    pub short_name: Vec<Text>,
    #[serde(default)]
    pub unit_of: Vec<MergedOrganizationIdentifier>,
    #[serde(default)]
    pub website: Vec<Link>,
}

impl ExtractedModel for ExtractedOrganizationalUnit {
    const ENTITY_TYPE: &'static str = "ExtractedOrganizationalUnit";

    fn descriptor() -> EntityDescriptor {
        let mut fields = extracted_data_fields::<
            ExtractedOrganizationalUnitIdentifier,
            MergedOrganizationalUnitIdentifier,
        >();
        fields.extend([
            FieldDescriptor::optional("alternativeName", FieldKind::texts()),
            FieldDescriptor::optional("email", FieldKind::list(FieldKind::Email)),
            FieldDescriptor::required("name", FieldKind::non_empty_list(FieldKind::Definition("Text"))),
            FieldDescriptor::optional(
                "parentUnit",
                FieldKind::Identifier(MergedOrganizationalUnitIdentifier::TITLE),
            ),
            FieldDescriptor::optional("shortName", FieldKind::texts()),
            FieldDescriptor::optional(
                "unitOf",
                FieldKind::list(FieldKind::Identifier(MergedOrganizationIdentifier::TITLE)),
            ),
            FieldDescriptor::optional("website", FieldKind::links()),
        ]);
        EntityDescriptor {
            entity_type: Self::ENTITY_TYPE,
            description: "An automatically extracted metadata set describing an organizational unit.",
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::InstanceValidator;
    use mex_core::{MergedPrimarySourceIdentifier, TextLanguage};
    use serde_json::json;

    fn unit() -> ExtractedOrganizationalUnit {
        ExtractedOrganizationalUnit {
            extracted: ExtractedData::new(MergedPrimarySourceIdentifier::from_seed(40), "fg99"),
            identifier: ExtractedOrganizationalUnitIdentifier::from_seed(41),
            stable_target_id: MergedOrganizationalUnitIdentifier::from_seed(42),
            alternative_name: vec![],
            email: vec![Email::new("fg99@rki.de").unwrap()],
            name: vec![Text::new("Fachgebiet 99", Some(TextLanguage::De))],
            parent_unit: Some(MergedOrganizationalUnitIdentifier::from_seed(43)),
            short_name: vec![Text::new("FG 99", None)],
            unit_of: vec![MergedOrganizationIdentifier::from_seed(44)],
            website: vec![],
        }
    }

    #[test]
    fn test_serialized_unit_is_valid() {
        let document = unit().to_document().unwrap();
        InstanceValidator::new().validate_document(&document).unwrap();
    }

    #[test]
    fn test_bad_email_is_rejected() {
        let mut document = unit().to_document().unwrap();
        document["email"] = json!(["no-at-sign"]);
        let err = InstanceValidator::new()
            .validate_document(&document)
            .unwrap_err();
        assert!(err.to_string().contains("/email/0"), "{err}");
    }

    #[test]
    fn test_unknown_text_language_is_rejected() {
        let mut document = unit().to_document().unwrap();
        document["name"] = json!([{"value": "Unit 99", "language": "fr"}]);
        assert!(InstanceValidator::new().validate_document(&document).is_err());
    }
}
