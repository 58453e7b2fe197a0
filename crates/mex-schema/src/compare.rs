//! # Comparator
//!
//! Checks a generated and a specified [`SchemaSet`] along five axes and
//! records every discrepancy in a [`ComparisonReport`]. One run surfaces
//! all mismatches; nothing short-circuits.

use std::collections::BTreeSet;
use std::fmt;

use mex_core::CanonicalJson;
use serde_json::{Map, Value};

use crate::error::ReconciliationError;
use crate::loader::SchemaSet;
use crate::normalize::normalized;

/// Property holding the concrete entity type, generated side only.
const DISCRIMINANT: &str = "$type";

/// What a mismatch is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    /// The two sides name different entities.
    EntitySet,
    /// An entity has different field names.
    FieldNames,
    /// The discriminant disagrees with the titles.
    Discriminant,
    /// An entity has different required fields.
    RequiredFields,
    /// A field's normalized fragments differ.
    FieldDefinition,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntitySet => "entity-set",
            Self::FieldNames => "field-names",
            Self::Discriminant => "discriminant",
            Self::RequiredFields => "required-fields",
            Self::FieldDefinition => "field-definition",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discrepancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub axis: Axis,
    /// `Entity` or `Entity.field`; empty for the entity set.
    pub subject: String,
    /// Human-readable explanation, including raw fragments for fields.
    pub detail: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subject.is_empty() {
            write!(f, "[{}]\n{}", self.axis, self.detail)
        } else {
            write!(f, "[{}] {}\n{}", self.axis, self.subject, self.detail)
        }
    }
}

/// Result of comparing two schema sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonReport {
    /// Entities present on both sides.
    pub entities: usize,
    /// Specified fields whose definitions were compared.
    pub fields: usize,
    mismatches: Vec<Mismatch>,
}

impl ComparisonReport {
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// True if no axis reported a mismatch.
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Mismatches on one axis.
    pub fn on_axis(&self, axis: Axis) -> impl Iterator<Item = &Mismatch> {
        self.mismatches.iter().filter(move |m| m.axis == axis)
    }

    /// `Ok(self)` if clean, otherwise the report as an error.
    ///
    /// # Errors
    ///
    /// Returns `ReconciliationError::Mismatches` carrying the full report.
    pub fn into_result(self) -> Result<Self, ReconciliationError> {
        if self.is_clean() {
            Ok(self)
        } else {
            Err(ReconciliationError::Mismatches(self))
        }
    }

    fn push(&mut self, axis: Axis, subject: impl Into<String>, detail: impl Into<String>) {
        let mismatch = Mismatch {
            axis,
            subject: subject.into(),
            detail: detail.into(),
        };
        tracing::warn!(axis = %mismatch.axis, subject = %mismatch.subject, "schema mismatch");
        self.mismatches.push(mismatch);
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "compared {} entities and {} fields: {} mismatch(es)",
            self.entities,
            self.fields,
            self.mismatches.len()
        )?;
        for mismatch in &self.mismatches {
            write!(f, "\n\n{mismatch}")?;
        }
        Ok(())
    }
}

/// Compare `generated` against `specified` on every axis.
pub fn compare(generated: &SchemaSet, specified: &SchemaSet) -> ComparisonReport {
    let mut report = ComparisonReport::default();

    let generated_names: Vec<&str> = generated.names().collect();
    let specified_names: Vec<&str> = specified.names().collect();
    if generated_names != specified_names {
        report.push(
            Axis::EntitySet,
            "",
            difference("entities", &generated_names, &specified_names),
        );
    }

    for (name, specified_schema) in specified.iter() {
        let Some(generated_schema) = generated.get(name) else {
            continue;
        };
        report.entities += 1;
        tracing::debug!(entity = name, "comparing entity");
        compare_entity(&mut report, name, generated_schema, specified_schema);
    }

    tracing::info!(
        entities = report.entities,
        fields = report.fields,
        mismatches = report.mismatches.len(),
        "schema comparison finished"
    );
    report
}

fn compare_entity(report: &mut ComparisonReport, name: &str, generated: &Value, specified: &Value) {
    let empty = Map::new();
    let generated_properties = generated
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let specified_properties = specified
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let generated_fields: Vec<&str> = generated_properties
        .keys()
        .map(String::as_str)
        .filter(|field| *field != DISCRIMINANT)
        .collect();
    let specified_fields: Vec<&str> = specified_properties.keys().map(String::as_str).collect();
    if sorted(&generated_fields) != sorted(&specified_fields) {
        report.push(
            Axis::FieldNames,
            name,
            difference("fields", &generated_fields, &specified_fields),
        );
    }

    compare_discriminant(report, name, generated, specified);

    let generated_required = required(generated);
    let specified_required = required(specified);
    if sorted(&generated_required) != sorted(&specified_required) {
        report.push(
            Axis::RequiredFields,
            name,
            difference("required fields", &generated_required, &specified_required),
        );
    }

    for (field, specified_fragment) in specified_properties {
        report.fields += 1;
        let subject = format!("{name}.{field}");
        let Some(generated_fragment) = generated_properties.get(field) else {
            report.push(
                Axis::FieldDefinition,
                subject,
                format!("missing in generated schema\n\nspecified:\n{}", pretty(specified_fragment)),
            );
            continue;
        };
        if normalized(field, generated_fragment) != normalized(field, specified_fragment) {
            report.push(
                Axis::FieldDefinition,
                subject,
                format!(
                    "specified:\n{}\n\ngenerated:\n{}",
                    pretty(specified_fragment),
                    pretty(generated_fragment)
                ),
            );
        }
    }
}

fn compare_discriminant(report: &mut ComparisonReport, name: &str, generated: &Value, specified: &Value) {
    let entity_type = generated
        .pointer("/properties/$type/const")
        .and_then(Value::as_str);
    let Some(entity_type) = entity_type else {
        report.push(Axis::Discriminant, name, "generated schema has no `$type` const");
        return;
    };

    let generated_title = generated.get("title").and_then(Value::as_str).unwrap_or_default();
    if generated_title != entity_type {
        report.push(
            Axis::Discriminant,
            name,
            format!("generated title {generated_title:?} differs from `$type` {entity_type:?}"),
        );
    }

    let specified_title: String = specified
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if !entity_type.contains(&specified_title) {
        report.push(
            Axis::Discriminant,
            name,
            format!("specified title {specified_title:?} is not part of `$type` {entity_type:?}"),
        );
    }
}

fn required(schema: &Value) -> Vec<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|fields| fields.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn sorted<'a>(items: &[&'a str]) -> BTreeSet<&'a str> {
    items.iter().copied().collect()
}

fn difference(what: &str, generated: &[&str], specified: &[&str]) -> String {
    let generated = sorted(generated);
    let specified = sorted(specified);
    let only_generated: Vec<&str> = generated.difference(&specified).copied().collect();
    let only_specified: Vec<&str> = specified.difference(&generated).copied().collect();
    format!("{what} only generated: {only_generated:?}\n{what} only specified: {only_specified:?}")
}

/// Pretty JSON with sorted keys, independent of map ordering features.
fn pretty(value: &Value) -> String {
    let sorted = CanonicalJson::new(value)
        .to_value()
        .unwrap_or_else(|_| value.clone());
    serde_json::to_string_pretty(&sorted).unwrap_or_else(|_| sorted.to_string())
}
