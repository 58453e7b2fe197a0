use std::path::PathBuf;

use thiserror::Error;

use crate::compare::ComparisonReport;

/// A published entity schema document could not be loaded.
///
/// Fatal: without every document the entity and field universe of the
/// comparison is unknown.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The schema directory could not be listed.
    #[error("cannot read schema directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A schema file could not be read.
    #[error("cannot read schema file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A schema file is not valid JSON.
    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A schema document lacks `title` or `properties`.
    #[error("schema {path} has no {key:?} {expected}")]
    MissingKey {
        path: PathBuf,
        key: &'static str,
        expected: &'static str,
    },

    /// Two documents map to the same entity name.
    #[error("entity {name:?} is defined twice, again in {path}")]
    DuplicateEntity { name: String, path: PathBuf },
}

/// Errors of a reconciliation run.
#[derive(Error, Debug)]
pub enum ReconciliationError {
    /// Loading the published schemas failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The schema sets disagree.
    #[error("schemas do not match\n{0}")]
    Mismatches(ComparisonReport),
}
