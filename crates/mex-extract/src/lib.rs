//! # mex-extract: Extraction Glue
//!
//! Turns raw records from the organigram, the primary source registry and
//! wikidata into extracted models from `mex-model`. Input locations come
//! from an explicit [`mex_core::Settings`] passed by reference.
//!
//! - [`identity`]: assigns `identifier` / `stableTargetId` pairs.
//! - [`primary_source`]: the primary source registry.
//! - [`organigram`]: organizational units and their lookup tables.
//! - [`wikidata`]: wikidata organization entities.

pub mod error;
pub mod identity;
pub mod organigram;
pub mod primary_source;
pub mod wikidata;

pub use error::ExtractError;
pub use identity::{identity_store, DummyIdentityStore, Identity, IdentityStore, MemoryIdentityStore};
pub use organigram::{
    extract_organigram_units, get_synonyms, get_unit_merged_ids_by_emails,
    get_unit_merged_ids_by_synonyms, transform_organigram_units, OrganigramName, OrganigramUnit,
};
pub use primary_source::{
    extract_seed_primary_sources, transform_seed_primary_sources, SeedPrimarySource,
    MEX_PRIMARY_SOURCE_STABLE_TARGET_ID,
};
pub use wikidata::{load_wikidata_organizations, transform_wikidata_organization, WikidataOrganization};
