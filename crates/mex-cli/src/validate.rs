//! # Validate Subcommand
//!
//! Validates extracted items against the schemas rendered from the models.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mex_core::Settings;
use mex_model::InstanceValidator;

/// Arguments for the `mex validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON, NDJSON or YAML file of extracted items.
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Validate every item as this type instead of routing by `$type`.
    #[arg(long, value_name = "TYPE")]
    pub entity_type: Option<String>,
}

/// Execute the validate subcommand.
///
/// Returns exit code 0 when every item is valid and 1 otherwise.
pub fn run_validate(args: &ValidateArgs, settings: &Settings) -> Result<u8> {
    let path = crate::resolve_path(&args.path, &settings.work_dir);
    let validator = InstanceValidator::new();
    let result = validator
        .validate_file(&path, args.entity_type.as_deref())
        .with_context(|| format!("failed to validate {}", path.display()))?;

    let passed = result.documents - result.failures.len();
    println!("{}: {}/{} passed", path.display(), passed, result.documents);
    for (index, error) in &result.failures {
        println!("  FAIL: item {}: {}", index + 1, error);
    }

    Ok(if result.is_valid() { 0 } else { 1 })
}
