use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while extracting or transforming source records.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// A source file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file does not hold the expected records.
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A wikidata organization has neither an official name nor a label.
    #[error("wikidata organization {0} has no official name or label")]
    MissingOfficialName(String),

    /// A value in a source record is invalid.
    #[error(transparent)]
    Value(#[from] mex_core::MexError),
}
