//! # mex CLI entry point
//!
//! Parses command-line arguments, resolves settings from the environment
//! and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use mex_cli::check::{run_check_schemas, CheckSchemasArgs};
use mex_cli::organigram::{run_organigram, OrganigramArgs};
use mex_cli::settings::{run_settings, SettingsArgs};
use mex_cli::validate::{run_validate, ValidateArgs};
use mex_core::Settings;

/// MEx model stack CLI.
///
/// Checks that the metadata models agree with the published entity
/// schemas, validates extracted items and inspects settings.
#[derive(Parser, Debug)]
#[command(name = "mex", version, about, long_about = None)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Log filter, e.g. `info` or `mex_schema=debug`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare the model schemas with the entity schemas on disk.
    CheckSchemas(CheckSchemasArgs),

    /// Validate a JSON, NDJSON or YAML file of extracted items.
    Validate(ValidateArgs),

    /// Print the resolved settings.
    Settings(SettingsArgs),

    /// Load the organigram and report units and lookup sizes.
    Organigram(OrganigramArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = Settings::from_env();
    let debug = settings.as_ref().is_ok_and(|settings| settings.debug);
    mex_cli::init_tracing(cli.log_json, cli.log_level.as_deref(), debug);

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("invalid settings: {e}");
            return ExitCode::from(2);
        }
    };
    tracing::debug!(work_dir = %settings.work_dir.display(), "resolved settings");

    let result = match cli.command {
        Commands::CheckSchemas(args) => run_check_schemas(&args, &settings),
        Commands::Validate(args) => run_validate(&args, &settings),
        Commands::Settings(args) => run_settings(&args, &settings),
        Commands::Organigram(args) => run_organigram(&args, &settings),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
