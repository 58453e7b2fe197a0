//! Organizations: legal entities such as institutes, universities or
//! public authorities.

use mex_core::{
    ExtractedOrganizationIdentifier, Link, MergedOrganizationIdentifier, Text,
};
use serde::{Deserialize, Serialize};

use crate::descriptor::{EntityDescriptor, FieldDescriptor, FieldKind};
use crate::extracted::{extracted_data_fields, ExtractedData, ExtractedModel};

/// An automatically extracted metadata set describing an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedOrganization {
    #[serde(flatten)]
    pub extracted: ExtractedData,
    pub identifier: ExtractedOrganizationIdentifier,
    pub stable_target_id: MergedOrganizationIdentifier,
    #[serde(default)]
    pub alternative_name: Vec<Text>,
    #[serde(default)]
    pub gepris_id: Vec<Link>,
    #[serde(default)]
    pub gnd_id: Vec<Link>,
    #[serde(default)]
    pub isni_id: Vec<Link>,
    pub official_name: Vec<Text>,
    #[serde(default)]
    pub ror_id: Vec<Link>,
    #[serde(default)]
    pub short_name: Vec<Text>,
    #[serde(default)]
    pub viaf_id: Vec<Link>,
    #[serde(default)]
    pub website: Vec<Link>,
    #[serde(default)]
    pub wikidata_id: Vec<Link>,
}

impl ExtractedModel for ExtractedOrganization {
    const ENTITY_TYPE: &'static str = "ExtractedOrganization";

    fn descriptor() -> EntityDescriptor {
        let mut fields = extracted_data_fields::<
            ExtractedOrganizationIdentifier,
            MergedOrganizationIdentifier,
        >();
        fields.extend([
            FieldDescriptor::optional("alternativeName", FieldKind::texts()),
            FieldDescriptor::optional("geprisId", FieldKind::links()),
            FieldDescriptor::optional("gndId", FieldKind::links()),
            FieldDescriptor::optional("isniId", FieldKind::links()),
            FieldDescriptor::required(
                "officialName",
                FieldKind::non_empty_list(FieldKind::Definition("Text")),
            ),
            FieldDescriptor::optional("rorId", FieldKind::links()),
            FieldDescriptor::optional("shortName", FieldKind::texts()),
            FieldDescriptor::optional("viafId", FieldKind::links()),
            FieldDescriptor::optional("website", FieldKind::links()),
            FieldDescriptor::optional("wikidataId", FieldKind::links()),
        ]);
        EntityDescriptor {
            entity_type: Self::ENTITY_TYPE,
            description: "An automatically extracted metadata set describing an organization.",
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::InstanceValidator;
    use mex_core::{MergedPrimarySourceIdentifier, TextLanguage};

    #[test]
    fn test_serialized_organization_is_valid() {
        let organization = ExtractedOrganization {
            extracted: ExtractedData::new(MergedPrimarySourceIdentifier::from_seed(50), "Q679041"),
            identifier: ExtractedOrganizationIdentifier::from_seed(51),
            stable_target_id: MergedOrganizationIdentifier::from_seed(52),
            alternative_name: vec![Text::new("RKI", None)],
            gepris_id: vec![],
            gnd_id: vec![Link::parse("https://d-nb.info/gnd/2036836-4").unwrap()],
            isni_id: vec![],
            official_name: vec![Text::new("Robert Koch-Institut", Some(TextLanguage::De))],
            ror_id: vec![Link::parse("https://ror.org/01k5qnb77").unwrap()],
            short_name: vec![],
            viaf_id: vec![],
            website: vec![],
            wikidata_id: vec![Link::parse("https://www.wikidata.org/entity/Q679041").unwrap()],
        };
        let document = organization.to_document().unwrap();
        InstanceValidator::new().validate_document(&document).unwrap();
        let parsed = ExtractedOrganization::from_document(document).unwrap();
        assert_eq!(parsed, organization);
    }

    #[test]
    fn test_official_name_is_required() {
        let required = ExtractedOrganization::descriptor().required();
        assert!(required.contains(&"officialName"));
        assert_eq!(required.len(), 5);
    }
}
