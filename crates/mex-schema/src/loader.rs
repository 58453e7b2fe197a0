//! # Schema Loader
//!
//! Both sides of a reconciliation are a [`SchemaSet`]: entity name to JSON
//! Schema document. Generated documents come from the model descriptors,
//! specified documents from `*.json` files in a directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::LoadError;

/// Title prefix of abstract concept documents, which have no model.
const ABSTRACT_TITLE_PREFIX: &str = "Concept";

/// Entity name to schema document, sorted by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaSet {
    schemas: BTreeMap<String, Value>,
}

impl SchemaSet {
    /// Wrap an existing mapping.
    pub fn new(schemas: BTreeMap<String, Value>) -> Self {
        Self { schemas }
    }

    /// The schemas generated from the extracted models, keyed by entity
    /// type without the `Extracted` prefix.
    pub fn generated() -> Self {
        let schemas = mex_model::generated_schemas();
        tracing::debug!(count = schemas.len(), "rendered generated schemas");
        Self { schemas }
    }

    /// Load every `*.json` document in `dir`.
    ///
    /// Documents titled `Concept…` are skipped. The key is the title with
    /// all whitespace removed (`Organizational Unit` → `OrganizationalUnit`).
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the directory or a file cannot be read,
    /// a file is not JSON, a document has no string `title` or no object
    /// `properties`, or two documents share a key.
    pub fn load_specified(dir: &Path) -> Result<Self, LoadError> {
        let entries = std::fs::read_dir(dir).map_err(|source| LoadError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoadError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut schemas = BTreeMap::new();
        for path in paths {
            let Some((name, schema)) = load_document(&path)? else {
                continue;
            };
            if schemas.contains_key(&name) {
                return Err(LoadError::DuplicateEntity { name, path });
            }
            tracing::debug!(entity = %name, path = %path.display(), "loaded specified schema");
            schemas.insert(name, schema);
        }
        tracing::info!(dir = %dir.display(), count = schemas.len(), "loaded specified schemas");
        Ok(Self { schemas })
    }

    /// Entity names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Schema document of one entity.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Iterate `(name, document)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schemas.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Read one document; `None` for abstract concept documents.
fn load_document(path: &Path) -> Result<Option<(String, Value)>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let schema: Value = serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })?;

    let title = schema
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| LoadError::MissingKey {
            path: path.to_path_buf(),
            key: "title",
            expected: "string",
        })?;
    if title.starts_with(ABSTRACT_TITLE_PREFIX) {
        tracing::debug!(title, path = %path.display(), "skipping abstract schema");
        return Ok(None);
    }
    if !schema.get("properties").is_some_and(Value::is_object) {
        return Err(LoadError::MissingKey {
            path: path.to_path_buf(),
            key: "properties",
            expected: "object",
        });
    }

    let name: String = title.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(Some((name, schema)))
}
