//! # Field Normalizer
//!
//! Rewrites one field fragment, in place, into the canonical form shared by
//! generated and specified schemas. Rules run in this order:
//!
//! 1. A list is normalized item by item; falsy items (`null`, `false`, `0`,
//!    `""`, `[]`, `{}`) are dropped.
//! 2. `sameAs`, `subPropertyOf` and `description` are dropped.
//! 3. `title` and `useScheme` are taken out. The title names the entity an
//!    identifier refers to, the scheme names the vocabulary.
//! 4. `date`, `date-time` and the timestamp pattern all become
//!    `format: date-time` without `pattern` or `examples`.
//! 5. An identifier pattern becomes a reference: `/schema/fields/identifier`
//!    for `identifier` and `stableTargetId`, otherwise
//!    `/schema/entities/<Entity>#/identifier`.
//! 6. The generic concept reference, matched exactly as written, becomes
//!    `/schema/fields/<vocabulary>` when a scheme was given.
//! 7. References are kebab-cased, text runs only.
//! 8. Array items are normalized with the same field name.
//! 9. `anyOf` and `allOf` alternatives are normalized, deduplicated and
//!    sorted by their canonical JSON. A single remaining object alternative
//!    is merged into the parent, which is then normalized again.
//!
//! Nothing here fails. Shapes no rule recognizes are left alone.

use std::collections::BTreeMap;

use mex_core::{dromedary_to_kebab, sub_only_text, CanonicalJson, MEX_ID_PATTERN, TIMESTAMP_REGEX};
use mex_model::vocabulary::VOCABULARY_SCHEME_PREFIX;
use serde_json::{Map, Value};

/// Annotations without semantic weight, present on one side only.
const IGNORED_ANNOTATIONS: [&str; 3] = ["sameAs", "subPropertyOf", "description"];

/// Fields whose identifier refers to the item itself.
const UNIVERSAL_IDENTIFIER_FIELDS: [&str; 2] = ["identifier", "stableTargetId"];

/// Reference to the shared identifier definition.
pub const IDENTIFIER_REF: &str = "/schema/fields/identifier";

/// Reference the published schemas use for any vocabulary-bound field.
pub const CONCEPT_REF: &str = "/schema/entities/concept#/identifier";

/// Union-like keys, in processing order.
const QUANTIFIERS: [&str; 2] = ["anyOf", "allOf"];

/// Normalize the fragment of field `field` in place.
pub fn normalize_field(field: &str, fragment: &mut Value) {
    match fragment {
        Value::Array(items) => normalize_items(field, items),
        Value::Object(object) => normalize_object(field, object),
        _ => {}
    }
}

/// Return a normalized copy of `fragment`.
pub fn normalized(field: &str, fragment: &Value) -> Value {
    let mut copy = fragment.clone();
    normalize_field(field, &mut copy);
    copy
}

fn normalize_items(field: &str, items: &mut Vec<Value>) {
    for item in items.iter_mut() {
        normalize_field(field, item);
    }
    items.retain(is_truthy);
}

fn normalize_object(field: &str, object: &mut Map<String, Value>) {
    for key in IGNORED_ANNOTATIONS {
        object.remove(key);
    }

    let title = take_string(object, "title");
    let use_scheme = take_string(object, "useScheme");
    let vocabulary = use_scheme
        .strip_prefix(VOCABULARY_SCHEME_PREFIX)
        .unwrap_or(&use_scheme);

    if is_date(object) {
        object.remove("examples");
        object.remove("pattern");
        object.insert("format".to_string(), Value::from("date-time"));
    }

    if string_at(object, "pattern") == Some(MEX_ID_PATTERN) {
        object.remove("pattern");
        object.remove("type");
        let reference = if UNIVERSAL_IDENTIFIER_FIELDS.contains(&field) {
            IDENTIFIER_REF.to_string()
        } else {
            format!("/schema/entities/{}#/identifier", referenced_entity(&title))
        };
        object.insert("$ref".to_string(), Value::from(reference));
    }

    if let Some(Value::String(reference)) = object.get_mut("$ref") {
        if reference.as_str() == CONCEPT_REF && !vocabulary.is_empty() {
            *reference = format!("/schema/fields/{vocabulary}");
        }
        *reference = sub_only_text(dromedary_to_kebab, reference);
    }

    if string_at(object, "type") == Some("array") {
        if let Some(items) = object.get_mut("items") {
            normalize_field(field, items);
        }
    }

    let mut dissolved = false;
    for quantifier in QUANTIFIERS {
        let Some(Value::Array(alternatives)) = object.get_mut(quantifier) else {
            continue;
        };
        normalize_items(field, alternatives);
        deduplicate(alternatives);
        if alternatives.len() == 1 && alternatives[0].is_object() {
            if let Some(Value::Array(mut alternatives)) = object.remove(quantifier) {
                if let Some(Value::Object(only)) = alternatives.pop() {
                    object.extend(only);
                    dissolved = true;
                }
            }
        }
    }
    if dissolved {
        normalize_object(field, object);
    }
}

/// Entity name an identifier title refers to:
/// `MergedOrganizationalUnitIdentifier` → `OrganizationalUnit`.
fn referenced_entity(title: &str) -> &str {
    let name = title.strip_suffix("Identifier").unwrap_or(title);
    let name = name.strip_prefix("Merged").unwrap_or(name);
    name.strip_prefix("Extracted").unwrap_or(name)
}

fn is_date(object: &Map<String, Value>) -> bool {
    matches!(string_at(object, "format"), Some("date" | "date-time"))
        || string_at(object, "pattern") == Some(TIMESTAMP_REGEX)
}

/// Drop structural duplicates and order the survivors canonically.
fn deduplicate(alternatives: &mut Vec<Value>) {
    let unique: BTreeMap<CanonicalJson, Value> = alternatives
        .drain(..)
        .map(|alternative| (CanonicalJson::new(&alternative), alternative))
        .collect();
    alternatives.extend(unique.into_values());
}

fn take_string(object: &mut Map<String, Value>, key: &str) -> String {
    match object.remove(key) {
        Some(Value::String(value)) => value,
        _ => String::new(),
    }
}

fn string_at<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(object) => !object.is_empty(),
    }
}
