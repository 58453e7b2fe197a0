//! # Check Schemas Subcommand
//!
//! Loads the entity schemas from the schema directory, renders the model
//! schemas and prints every mismatch between the two.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mex_core::Settings;
use mex_schema::{compare, SchemaSet};

/// Arguments for the `mex check-schemas` subcommand.
#[derive(Args, Debug)]
pub struct CheckSchemasArgs {
    /// Directory with the entity schemas. Defaults to MEX_SCHEMA_DIR.
    #[arg(long, value_name = "DIR")]
    pub schema_dir: Option<PathBuf>,
}

/// Execute the check-schemas subcommand.
///
/// Returns exit code 0 when the schemas match and 1 otherwise.
pub fn run_check_schemas(args: &CheckSchemasArgs, settings: &Settings) -> Result<u8> {
    let schema_dir = args.schema_dir.as_ref().unwrap_or(&settings.schema_dir);
    let schema_dir = crate::resolve_path(schema_dir, &settings.work_dir);

    let specified = SchemaSet::load_specified(&schema_dir)
        .with_context(|| format!("failed to load entity schemas from {}", schema_dir.display()))?;
    let report = compare(&SchemaSet::generated(), &specified);

    println!("{report}");
    Ok(if report.is_clean() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_schema_dir() -> PathBuf {
        let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        dir.pop(); // crates
        dir.pop(); // repo root
        dir.join("schemas/entities")
    }

    #[test]
    fn published_schemas_pass() {
        let args = CheckSchemasArgs {
            schema_dir: Some(repo_schema_dir()),
        };
        assert_eq!(run_check_schemas(&args, &Settings::default()).unwrap(), 0);
    }

    #[test]
    fn drifted_schema_fails() {
        let dir = tempfile::tempdir().unwrap();
        for entry in std::fs::read_dir(repo_schema_dir()).unwrap() {
            let path = entry.unwrap().path();
            std::fs::copy(&path, dir.path().join(path.file_name().unwrap())).unwrap();
        }
        let variable = dir.path().join("variable.json");
        let mut schema: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&variable).unwrap()).unwrap();
        schema["required"] = serde_json::json!([]);
        std::fs::write(&variable, schema.to_string()).unwrap();

        let args = CheckSchemasArgs {
            schema_dir: Some(dir.path().to_path_buf()),
        };
        assert_eq!(run_check_schemas(&args, &Settings::default()).unwrap(), 1);
    }

    #[test]
    fn missing_schema_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = CheckSchemasArgs {
            schema_dir: Some(dir.path().join("nope")),
        };
        assert!(run_check_schemas(&args, &Settings::default()).is_err());
    }
}
