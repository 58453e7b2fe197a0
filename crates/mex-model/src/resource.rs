//! Resources: collections of information held by a unit, e.g. a study
//! or a dataset.

use mex_core::{
    ExtractedResourceIdentifier, MergedOrganizationIdentifier, MergedOrganizationalUnitIdentifier,
    MergedResourceIdentifier, Text, Timestamp, TypedIdentifier,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::descriptor::{EntityDescriptor, FieldDescriptor, FieldKind};
use crate::extracted::{extracted_data_fields, ExtractedData, ExtractedModel};
use crate::vocabulary::{AccessRestriction, Language, Theme, VocabularyEnum};

/// Either kind of contact point: a unit or a whole organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContactIdentifier {
    OrganizationalUnit(MergedOrganizationalUnitIdentifier),
    Organization(MergedOrganizationIdentifier),
}

/// Field kind of a contact: a union of both identifier types.
pub(crate) fn contact_kind() -> FieldKind {
    FieldKind::Union(vec![
        FieldKind::Identifier(MergedOrganizationalUnitIdentifier::TITLE),
        FieldKind::Identifier(MergedOrganizationIdentifier::TITLE),
    ])
}

/// An automatically extracted metadata set describing a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedResource {
    #[serde(flatten)]
    pub extracted: ExtractedData,
    pub identifier: ExtractedResourceIdentifier,
    pub stable_target_id: MergedResourceIdentifier,
    pub access_restriction: AccessRestriction,
    pub contact: Vec<ContactIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    #[serde(default)]
    pub description: Vec<Text>,
    #[serde(default)]
    pub keyword: Vec<Text>,
    #[serde(default)]
    pub language: Vec<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<Timestamp>,
    #[serde(default)]
    pub publisher: Vec<MergedOrganizationIdentifier>,
    pub theme: Vec<Theme>,
    pub title: Vec<Text>,
    pub unit_in_charge: Vec<MergedOrganizationalUnitIdentifier>,
}

impl ExtractedModel for ExtractedResource {
    const ENTITY_TYPE: &'static str = "ExtractedResource";

    fn descriptor() -> EntityDescriptor {
        let mut fields =
            extracted_data_fields::<ExtractedResourceIdentifier, MergedResourceIdentifier>();
        fields.extend([
            FieldDescriptor::required(
                "accessRestriction",
                FieldKind::Vocabulary(AccessRestriction::VOCABULARY),
            )
            .with_examples([json!("https://mex.rki.de/concept/access-restriction-1")]),
            FieldDescriptor::required("contact", FieldKind::non_empty_list(contact_kind())),
            FieldDescriptor::optional("created", FieldKind::Timestamp),
            FieldDescriptor::optional("description", FieldKind::texts()),
            FieldDescriptor::optional("keyword", FieldKind::texts()),
            FieldDescriptor::optional(
                "language",
                FieldKind::list(FieldKind::Vocabulary(Language::VOCABULARY)),
            ),
            FieldDescriptor::optional("modified", FieldKind::Timestamp),
            FieldDescriptor::optional(
                "publisher",
                FieldKind::list(FieldKind::Identifier(MergedOrganizationIdentifier::TITLE)),
            ),
            FieldDescriptor::required(
                "theme",
                FieldKind::non_empty_list(FieldKind::Vocabulary(Theme::VOCABULARY)),
            )
            .with_examples([json!("https://mex.rki.de/concept/theme-1")]),
            FieldDescriptor::required("title", FieldKind::non_empty_list(FieldKind::Definition("Text"))),
            FieldDescriptor::required(
                "unitInCharge",
                FieldKind::non_empty_list(FieldKind::Identifier(
                    MergedOrganizationalUnitIdentifier::TITLE,
                )),
            ),
        ]);
        EntityDescriptor {
            entity_type: Self::ENTITY_TYPE,
            description: "An automatically extracted metadata set describing a resource.",
            fields,
        }
    }
}
