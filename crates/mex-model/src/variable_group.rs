//! Variable groups: the grouping of variables within a resource.

use mex_core::{
    ExtractedVariableGroupIdentifier, MergedResourceIdentifier, MergedVariableGroupIdentifier,
    Text, TypedIdentifier,
};
use serde::{Deserialize, Serialize};

use crate::descriptor::{EntityDescriptor, FieldDescriptor, FieldKind};
use crate::extracted::{extracted_data_fields, ExtractedData, ExtractedModel};

/// An automatically extracted metadata set describing a variable group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedVariableGroup {
    #[serde(flatten)]
    pub extracted: ExtractedData,
    pub identifier: ExtractedVariableGroupIdentifier,
    pub stable_target_id: MergedVariableGroupIdentifier,
    pub contained_by: Vec<MergedResourceIdentifier>,
    pub label: Vec<Text>,
}

impl ExtractedModel for ExtractedVariableGroup {
    const ENTITY_TYPE: &'static str = "ExtractedVariableGroup";

    fn descriptor() -> EntityDescriptor {
        let mut fields = extracted_data_fields::<
            ExtractedVariableGroupIdentifier,
            MergedVariableGroupIdentifier,
        >();
        fields.extend([
            FieldDescriptor::required(
                "containedBy",
                FieldKind::non_empty_list(FieldKind::Identifier(MergedResourceIdentifier::TITLE)),
            ),
            FieldDescriptor::required("label", FieldKind::non_empty_list(FieldKind::Definition("Text"))),
        ]);
        EntityDescriptor {
            entity_type: Self::ENTITY_TYPE,
            description: "An automatically extracted metadata set describing a variable group.",
            fields,
        }
    }
}
