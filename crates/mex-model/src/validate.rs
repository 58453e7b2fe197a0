//! # Instance Validation
//!
//! Validates extracted item documents against the generated schemas with
//! the `jsonschema` crate (Draft 2020-12).
//!
//! ## Reference Resolution
//!
//! Generated schemas reference shared field definitions as
//! `/schema/fields/<Name>`. Before compiling, each schema gets the `$id`
//! `https://mex.rki.de/schema/entities/<entity>`, so those references
//! resolve to `https://mex.rki.de/schema/fields/<Name>`. A local retriever
//! serves them from [`field_definitions`]; nothing is fetched over the
//! network and unknown names fail the build.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::{Retrieve, Uri, ValidationOptions, Validator};
use mex_core::dromedary_to_kebab;
use serde_json::{Map, Value};

use crate::descriptor::{field_definitions, DISCRIMINANT, FIELD_REF_PREFIX};
use crate::error::ModelError;
use crate::extracted::extracted_model_descriptors;

/// Base URI generated schemas are compiled under.
const SCHEMA_BASE_URI: &str = "https://mex.rki.de/schema/entities/";

/// Serves `/schema/fields/<Name>` references from memory.
struct LocalFieldRetriever {
    definitions: Map<String, Value>,
}

impl Retrieve for LocalFieldRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let name = uri_str
            .split_once(FIELD_REF_PREFIX)
            .map(|(_, name)| name)
            .unwrap_or(uri_str);
        self.definitions
            .get(name)
            .cloned()
            .ok_or_else(|| format!("unknown field definition {uri_str}").into())
    }
}

/// One schema violation of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer into the document, empty for the document itself.
    pub instance_path: String,
    /// JSON pointer to the failing keyword in the entity schema.
    pub schema_path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = match self.instance_path.as_str() {
            "" => "/",
            path => path,
        };
        write!(f, "{at}: {} [{}]", self.message, self.schema_path)
    }
}

/// Every violation found in one document, in validator order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationViolations(Vec<Violation>);

impl ValidationViolations {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Violations at one instance path.
    pub fn at<'a>(&'a self, instance_path: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.0.iter().filter(move |v| v.instance_path == instance_path)
    }
}

impl FromIterator<Violation> for ValidationViolations {
    fn from_iter<T: IntoIterator<Item = Violation>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(|v| format!("  {v}")).collect();
        f.write_str(&lines.join("\n"))
    }
}

/// Outcome of validating every document in one file.
#[derive(Debug)]
pub struct FileValidation {
    /// The validated file.
    pub path: PathBuf,
    /// Number of documents found in the file.
    pub documents: usize,
    /// Zero-based document index and error of every invalid document.
    pub failures: Vec<(usize, ModelError)>,
}

impl FileValidation {
    /// True if every document was valid.
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Validates documents against the generated schemas.
///
/// Schemas are rendered once at construction. Validators are compiled per
/// call, or once per entity type for a whole file.
#[derive(Debug, Clone)]
pub struct InstanceValidator {
    /// Generated schemas keyed by entity type, e.g. `ExtractedVariable`.
    schemas: BTreeMap<String, Value>,
    definitions: Map<String, Value>,
}

impl Default for InstanceValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceValidator {
    /// Render the schemas of all extracted models.
    pub fn new() -> Self {
        let schemas = extracted_model_descriptors()
            .into_iter()
            .map(|descriptor| {
                let mut schema = descriptor.json_schema();
                if let Value::Object(map) = &mut schema {
                    map.insert(
                        "$id".to_string(),
                        Value::String(format!(
                            "{SCHEMA_BASE_URI}{}",
                            dromedary_to_kebab(descriptor.name())
                        )),
                    );
                }
                (descriptor.entity_type.to_string(), schema)
            })
            .collect();
        Self {
            schemas,
            definitions: field_definitions(),
        }
    }

    /// Entity types that can be validated, sorted.
    pub fn entity_types(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    /// Resolve `Variable` or `ExtractedVariable` to a known entity type.
    pub fn resolve_entity_type(&self, name: &str) -> Result<&str, ModelError> {
        if let Some((key, _)) = self.schemas.get_key_value(name) {
            return Ok(key.as_str());
        }
        let prefixed = format!("Extracted{name}");
        match self.schemas.get_key_value(&prefixed) {
            Some((key, _)) => Ok(key.as_str()),
            None => Err(ModelError::UnknownEntityType(name.to_string())),
        }
    }

    fn build_options(&self) -> ValidationOptions {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        opts.with_retriever(LocalFieldRetriever {
            definitions: self.definitions.clone(),
        });
        opts
    }

    /// Build a compiled `Validator` for one entity type.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownEntityType` for an unregistered type and
    /// `ModelError::ValidatorBuild` if the schema does not compile.
    pub fn build_validator(&self, entity_type: &str) -> Result<Validator, ModelError> {
        let entity_type = self.resolve_entity_type(entity_type)?;
        let schema = self
            .schemas
            .get(entity_type)
            .ok_or_else(|| ModelError::UnknownEntityType(entity_type.to_string()))?;
        self.build_options()
            .build(schema)
            .map_err(|e| ModelError::ValidatorBuild {
                entity_type: entity_type.to_string(),
                reason: e.to_string(),
            })
    }

    /// Validate a document against the model named by its `$type`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::MissingEntityType` if the document has no string
    /// `$type`, `ModelError::ValidationFailed` if it violates the schema.
    pub fn validate_document(&self, instance: &Value) -> Result<(), ModelError> {
        let entity_type = instance
            .get(DISCRIMINANT)
            .and_then(Value::as_str)
            .ok_or(ModelError::MissingEntityType)?;
        self.validate_as(entity_type, instance)
    }

    /// Validate a document against an explicit entity type.
    pub fn validate_as(&self, entity_type: &str, instance: &Value) -> Result<(), ModelError> {
        let validator = self.build_validator(entity_type)?;
        check(&validator, entity_type, instance)
    }

    /// Validate every document of a `.json`, `.ndjson`, `.yaml` or `.yml`
    /// file.
    ///
    /// A JSON or YAML file holds one document or an array of documents; an
    /// NDJSON file holds one document per non-empty line. Documents are
    /// routed by `$type` unless `entity_type` is given.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::DocumentLoad` if the file cannot be read or
    /// parsed. Invalid documents are reported in the returned
    /// [`FileValidation`], not as an error.
    pub fn validate_file(
        &self,
        path: &Path,
        entity_type: Option<&str>,
    ) -> Result<FileValidation, ModelError> {
        let documents = load_documents(path)?;
        let mut validators: HashMap<String, Validator> = HashMap::new();
        let mut failures = Vec::new();

        for (index, document) in documents.iter().enumerate() {
            let target = match entity_type {
                Some(name) => Some(name),
                None => document.get(DISCRIMINANT).and_then(Value::as_str),
            };
            let result = match target {
                None => Err(ModelError::MissingEntityType),
                Some(name) => self.resolve_entity_type(name).and_then(|resolved| {
                    if !validators.contains_key(resolved) {
                        validators.insert(resolved.to_string(), self.build_validator(resolved)?);
                    }
                    match validators.get(resolved) {
                        Some(validator) => check(validator, resolved, document),
                        None => Err(ModelError::UnknownEntityType(resolved.to_string())),
                    }
                }),
            };
            if let Err(e) = result {
                tracing::debug!(path = %path.display(), index, error = %e, "invalid document");
                failures.push((index, e));
            }
        }

        tracing::info!(
            path = %path.display(),
            documents = documents.len(),
            failures = failures.len(),
            "validated file"
        );
        Ok(FileValidation {
            path: path.to_path_buf(),
            documents: documents.len(),
            failures,
        })
    }
}

fn check(validator: &Validator, entity_type: &str, instance: &Value) -> Result<(), ModelError> {
    let violations: ValidationViolations = validator
        .iter_errors(instance)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();
    if violations.is_empty() {
        return Ok(());
    }
    Err(ModelError::ValidationFailed {
        entity_type: entity_type.to_string(),
        violations,
    })
}

fn load_documents(path: &Path) -> Result<Vec<Value>, ModelError> {
    let load_error = |reason: String| ModelError::DocumentLoad {
        path: path.display().to_string(),
        reason,
    };
    let content =
        std::fs::read_to_string(path).map_err(|e| load_error(format!("cannot read file: {e}")))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let value = match ext {
        "ndjson" | "jsonl" => {
            return content
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(n, line)| {
                    serde_json::from_str(line)
                        .map_err(|e| load_error(format!("invalid JSON on line {}: {e}", n + 1)))
                })
                .collect();
        }
        "yaml" | "yml" => serde_yaml::from_str::<Value>(&content)
            .map_err(|e| load_error(format!("invalid YAML: {e}")))?,
        _ => serde_json::from_str(&content).map_err(|e| load_error(format!("invalid JSON: {e}")))?,
    };
    Ok(match value {
        Value::Array(items) => items,
        single => vec![single],
    })
}
