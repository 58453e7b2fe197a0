//! # Static Schema Descriptors
//!
//! Each entity declares its fields once as a list of [`FieldDescriptor`]s.
//! [`EntityDescriptor::json_schema`] renders the list into the JSON Schema
//! a model-derived generator would emit:
//!
//! - identifiers as `{"title": "<IdentifierType>", "type": "string", "pattern": MEX_ID_PATTERN}`,
//! - shared field types and vocabularies as `{"$ref": "/schema/fields/<ClassName>"}`,
//!   wrapped in `allOf` when the field adds annotations next to the reference,
//! - timestamps as strings constrained by `TIMESTAMP_REGEX`,
//! - the `$type` discriminant as a `const` property.
//!
//! The rendered documents are also valid JSON Schema for instance
//! validation once the `/schema/fields/*` references resolve, see
//! [`crate::validate`].

use mex_core::text::EMAIL_PATTERN;
use mex_core::{TextLanguage, MEX_ID_PATTERN, TIMESTAMP_REGEX};
use serde_json::{json, Map, Value};

use crate::vocabulary::{vocabularies, Vocabulary};

/// Prefix of references to shared field definitions.
pub const FIELD_REF_PREFIX: &str = "/schema/fields/";

/// Name of the discriminant property.
pub const DISCRIMINANT: &str = "$type";

/// Shared definition of [`mex_core::Text`].
pub const TEXT_DEFINITION: &str = "Text";

/// Shared definition of [`mex_core::Link`].
pub const LINK_DEFINITION: &str = "Link";

/// Type constraint of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A plain string.
    String,
    /// An identifier of the named typed identifier, e.g. `MergedResourceIdentifier`.
    Identifier(&'static str),
    /// A reference to a shared definition under `/schema/fields/`.
    Definition(&'static str),
    /// A concept of a controlled vocabulary.
    Vocabulary(Vocabulary),
    /// A timestamp of any supported precision.
    Timestamp,
    /// An email address.
    Email,
    /// One of several alternatives.
    Union(Vec<FieldKind>),
    /// A list of items.
    Array {
        /// Item constraint.
        items: Box<FieldKind>,
        /// Minimum number of items, if any.
        min_items: Option<u64>,
    },
}

impl FieldKind {
    /// A list of `items` that may be empty.
    pub fn list(items: FieldKind) -> Self {
        Self::Array {
            items: Box::new(items),
            min_items: None,
        }
    }

    /// A list of `items` with at least one entry.
    pub fn non_empty_list(items: FieldKind) -> Self {
        Self::Array {
            items: Box::new(items),
            min_items: Some(1),
        }
    }

    /// A list of texts.
    pub fn texts() -> Self {
        Self::list(Self::Definition(TEXT_DEFINITION))
    }

    /// A list of links.
    pub fn links() -> Self {
        Self::list(Self::Definition(LINK_DEFINITION))
    }

    fn render(&self) -> Map<String, Value> {
        let value = match self {
            Self::String => json!({"type": "string"}),
            Self::Identifier(title) => json!({
                "title": title,
                "type": "string",
                "pattern": MEX_ID_PATTERN,
            }),
            Self::Definition(name) => json!({"$ref": format!("{FIELD_REF_PREFIX}{name}")}),
            Self::Vocabulary(vocabulary) => {
                json!({"$ref": format!("{FIELD_REF_PREFIX}{}", vocabulary.class_name)})
            }
            Self::Timestamp => json!({
                "title": "Timestamp",
                "type": "string",
                "pattern": TIMESTAMP_REGEX,
                "examples": ["2011-11-11T11:11:11Z", "2011-11-11", "2011-11", "2011"],
            }),
            Self::Email => json!({
                "title": "Email",
                "type": "string",
                "format": "email",
                "pattern": EMAIL_PATTERN,
                "examples": ["info@rki.de"],
            }),
            Self::Union(alternatives) => json!({
                "anyOf": alternatives
                    .iter()
                    .map(|alternative| Value::Object(alternative.render()))
                    .collect::<Vec<_>>(),
            }),
            Self::Array { items, min_items } => {
                let mut array = json!({
                    "type": "array",
                    "items": Value::Object(items.render()),
                });
                if let Some(min_items) = min_items {
                    array["minItems"] = json!(min_items);
                }
                array
            }
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// One field of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name as it appears in documents, e.g. `usedIn`.
    pub name: &'static str,
    /// Type constraint.
    pub kind: FieldKind,
    /// Whether documents must carry the field.
    pub required: bool,
    /// Example values, rendered as the `examples` annotation.
    pub examples: Vec<Value>,
}

impl FieldDescriptor {
    /// An optional field.
    pub fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            examples: Vec::new(),
        }
    }

    /// A required field.
    pub fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            required: true,
            ..Self::optional(name, kind)
        }
    }

    /// Attach example values.
    pub fn with_examples(mut self, examples: impl IntoIterator<Item = Value>) -> Self {
        self.examples = examples.into_iter().collect();
        self
    }

    /// Render the field fragment.
    ///
    /// The field title (`usedIn` → `Usedin`) is only added when the type
    /// does not bring its own title: an identifier keeps the title of its
    /// identifier type, which names the referenced entity.
    pub fn json_schema(&self) -> Value {
        let mut fragment = self.kind.render();
        let is_reference = fragment.contains_key("$ref");
        let annotated = !self.examples.is_empty();

        if is_reference && annotated {
            let reference = Value::Object(std::mem::take(&mut fragment));
            fragment.insert("allOf".to_string(), json!([reference]));
        }
        if !is_reference || annotated {
            fragment
                .entry("title".to_string())
                .or_insert_with(|| json!(field_title(self.name)));
        }
        if annotated {
            fragment.insert("examples".to_string(), json!(self.examples));
        }
        Value::Object(fragment)
    }
}

/// Schema descriptor of one extracted entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDescriptor {
    /// Concrete entity type, e.g. `ExtractedVariable`.
    pub entity_type: &'static str,
    /// One-line description of the entity.
    pub description: &'static str,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl EntityDescriptor {
    /// Entity name without the `Extracted` prefix, e.g. `Variable`.
    pub fn name(&self) -> &'static str {
        self.entity_type
            .strip_prefix("Extracted")
            .unwrap_or(self.entity_type)
    }

    /// Names of required fields, in declaration order.
    pub fn required(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name)
            .collect()
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Render the entity's JSON Schema document.
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        properties.insert(
            DISCRIMINANT.to_string(),
            json!({
                "title": "$Type",
                "type": "string",
                "const": self.entity_type,
                "enum": [self.entity_type],
            }),
        );
        for field in &self.fields {
            properties.insert(field.name.to_string(), field.json_schema());
        }
        json!({
            "title": self.entity_type,
            "description": self.description,
            "type": "object",
            "properties": properties,
            "required": self.required(),
        })
    }
}

/// Title a generator derives from a field name: first letter upper case,
/// the rest lower case, underscores as spaces.
pub fn field_title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .map(|c| if c == '_' { ' ' } else { c })
            .collect(),
        None => String::new(),
    }
}

/// Shared definitions every generated schema may reference, keyed by the
/// name used after [`FIELD_REF_PREFIX`].
pub fn field_definitions() -> Map<String, Value> {
    let languages: Vec<&str> = TextLanguage::ALL.iter().map(TextLanguage::as_str).collect();
    let mut definitions = Map::new();
    definitions.insert(
        "Identifier".to_string(),
        json!({"title": "Identifier", "type": "string", "pattern": MEX_ID_PATTERN}),
    );
    definitions.insert(
        TEXT_DEFINITION.to_string(),
        json!({
            "title": "Text",
            "type": "object",
            "properties": {
                "value": {"title": "Value", "type": "string", "minLength": 1},
                "language": {"title": "TextLanguage", "type": "string", "enum": languages},
            },
            "required": ["value"],
        }),
    );
    definitions.insert(
        LINK_DEFINITION.to_string(),
        json!({
            "title": "Link",
            "type": "object",
            "properties": {
                "url": {"title": "Url", "type": "string", "format": "uri", "minLength": 1},
                "title": {"title": "Title", "type": "string"},
                "language": {"title": "TextLanguage", "type": "string", "enum": languages},
            },
            "required": ["url"],
        }),
    );
    for vocabulary in vocabularies() {
        definitions.insert(vocabulary.class_name.to_string(), vocabulary.definition());
    }
    definitions
}
