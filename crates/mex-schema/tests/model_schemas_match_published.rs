//! Integration test: the schemas generated from the models must match the
//! entity documents in `schemas/entities` on every axis.
//!
//! Failures list the raw specified and generated fragments of each
//! differing field, so one run shows every discrepancy.

use std::path::PathBuf;

use mex_schema::{compare, normalized, Axis, SchemaSet};
use serde_json::json;

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn specified() -> SchemaSet {
    SchemaSet::load_specified(&repo_root().join("schemas/entities"))
        .unwrap_or_else(|e| panic!("cannot load specified schemas: {e}"))
}

#[test]
fn test_model_schemas_match_published() {
    let report = compare(&SchemaSet::generated(), &specified());
    assert!(report.is_clean(), "{report}");
    assert_eq!(report.entities, 6);
}

#[test]
fn test_concept_is_excluded_from_entity_set() {
    let specified = specified();
    assert!(specified.get("Concept").is_none());
    let report = compare(&SchemaSet::generated(), &specified);
    assert_eq!(report.on_axis(Axis::EntitySet).count(), 0);
}

#[test]
fn test_every_specified_field_is_compared() {
    let specified = specified();
    let field_count: usize = specified
        .iter()
        .map(|(_, schema)| schema["properties"].as_object().map_or(0, |p| p.len()))
        .sum();
    let report = compare(&SchemaSet::generated(), &specified);
    assert_eq!(report.fields, field_count);
}

#[test]
fn test_vocabulary_and_entity_references_resolve() {
    let generated = SchemaSet::generated();
    let variable = generated.get("Variable").unwrap();

    let data_type = normalized("dataType", &variable["properties"]["dataType"]);
    assert_eq!(data_type["$ref"], "/schema/fields/data-type");

    let used_in = normalized("usedIn", &variable["properties"]["usedIn"]);
    assert_eq!(
        used_in["items"],
        json!({"$ref": "/schema/entities/resource#/identifier"})
    );

    let identifier = normalized("identifier", &variable["properties"]["identifier"]);
    assert_eq!(identifier, json!({"$ref": "/schema/fields/identifier"}));
}

#[test]
fn test_drifted_model_is_reported() {
    let generated = SchemaSet::generated();
    let mut schemas: std::collections::BTreeMap<String, serde_json::Value> = generated
        .iter()
        .map(|(name, schema)| (name.to_string(), schema.clone()))
        .collect();
    let resource = schemas.get_mut("Resource").unwrap();
    resource["properties"]["theme"]["minItems"] = json!(2);
    resource["required"] = json!(["identifier"]);

    let report = compare(&SchemaSet::new(schemas), &specified());
    let subjects: Vec<&str> = report
        .on_axis(Axis::FieldDefinition)
        .map(|m| m.subject.as_str())
        .collect();
    assert_eq!(subjects, ["Resource.theme"]);
    assert_eq!(report.on_axis(Axis::RequiredFields).count(), 1);
}
