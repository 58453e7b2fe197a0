//! # Organigram Subcommand
//!
//! Loads the organigram, transforms it into organizational units and prints
//! the sizes of the synonym and email lookup tables built from it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mex_core::{MergedPrimarySourceIdentifier, Settings};
use mex_extract::{
    extract_organigram_units, get_unit_merged_ids_by_emails, get_unit_merged_ids_by_synonyms,
    identity_store, transform_organigram_units, MEX_PRIMARY_SOURCE_STABLE_TARGET_ID,
};

/// Identifier of the organigram in the primary source registry.
const ORGANIGRAM_PRIMARY_SOURCE: &str = "organigram";

/// Arguments for the `mex organigram` subcommand.
#[derive(Args, Debug)]
pub struct OrganigramArgs {
    /// Organigram file. Defaults to MEX_ORGANIGRAM_PATH.
    #[arg(long, value_name = "FILE")]
    pub path: Option<PathBuf>,
}

/// Execute the organigram subcommand.
pub fn run_organigram(args: &OrganigramArgs, settings: &Settings) -> Result<u8> {
    let settings = match &args.path {
        Some(path) => Settings {
            organigram_path: path.clone(),
            ..settings.clone()
        },
        None => settings.clone(),
    };

    let raw_units = extract_organigram_units(&settings).context("failed to extract organigram")?;

    let mut identities = identity_store(settings.identity_provider);
    let mex = MergedPrimarySourceIdentifier::new(MEX_PRIMARY_SOURCE_STABLE_TARGET_ID)?;
    let primary_source = identities
        .assign(&mex, ORGANIGRAM_PRIMARY_SOURCE)
        .stable_target_id_as::<MergedPrimarySourceIdentifier>();

    let units = transform_organigram_units(&raw_units, &primary_source, None, identities.as_mut())
        .context("failed to transform organigram")?;
    let synonyms = get_unit_merged_ids_by_synonyms(&units);
    let emails = get_unit_merged_ids_by_emails(&units);

    println!("{}", settings.organigram_file().display());
    println!("  units:    {}", units.len());
    println!("  synonyms: {}", synonyms.len());
    println!("  emails:   {}", emails.len());
    Ok(0)
}
