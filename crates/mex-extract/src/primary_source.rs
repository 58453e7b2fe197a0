//! Primary source registry.
//!
//! The registry is a JSON list of seed records, one per system metadata is
//! extracted from. All of them are themselves extracted from the MEx
//! primary source, whose stable target identifier is fixed.

use std::path::Path;

use mex_core::{
    ExtractedPrimarySourceIdentifier, MergedPrimarySourceIdentifier, MexError, Settings, Text,
};
use mex_model::extracted::ExtractedData;
use mex_model::ExtractedPrimarySource;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::identity::IdentityStore;

/// Stable target identifier of the MEx primary source itself.
pub const MEX_PRIMARY_SOURCE_STABLE_TARGET_ID: &str = "00000000000000";

/// Identifier in primary source of the MEx primary source seed.
const MEX_PRIMARY_SOURCE_IDENTIFIER: &str = "mex";

/// A raw primary source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedPrimarySource {
    pub identifier: String,
    #[serde(default)]
    pub title: Vec<Text>,
}

/// Read the registry configured by `settings.primary_sources_path`.
pub fn extract_seed_primary_sources(settings: &Settings) -> Result<Vec<SeedPrimarySource>, ExtractError> {
    read_records(&settings.primary_sources_file())
}

/// Transform seeds into extracted primary sources.
///
/// The seed `mex` keeps the fixed MEx stable target identifier; every other
/// seed gets its identity from `identities`.
pub fn transform_seed_primary_sources(
    seeds: &[SeedPrimarySource],
    identities: &mut dyn IdentityStore,
) -> Result<Vec<ExtractedPrimarySource>, ExtractError> {
    let mex = MergedPrimarySourceIdentifier::new(MEX_PRIMARY_SOURCE_STABLE_TARGET_ID)
        .map_err(MexError::from)?;

    Ok(seeds
        .iter()
        .map(|seed| {
            let identity = identities.assign(&mex, &seed.identifier);
            let stable_target_id = if seed.identifier == MEX_PRIMARY_SOURCE_IDENTIFIER {
                mex.clone()
            } else {
                identity.stable_target_id_as()
            };
            ExtractedPrimarySource {
                extracted: ExtractedData::new(mex.clone(), seed.identifier.clone()),
                identifier: identity.identifier_as::<ExtractedPrimarySourceIdentifier>(),
                stable_target_id,
                alternative_title: vec![],
                contact: vec![],
                description: vec![],
                documentation: vec![],
                located_at: vec![],
                title: seed.title.clone(),
                unit_in_charge: vec![],
                version: None,
            }
        })
        .collect())
}

/// Read a JSON list of records.
pub(crate) fn read_records<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, ExtractError> {
    let content = std::fs::read_to_string(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<T> = serde_json::from_str(&content).map_err(|source| ExtractError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), count = records.len(), "read records");
    Ok(records)
}
