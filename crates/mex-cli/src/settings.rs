//! # Settings Subcommand

use anyhow::Result;
use clap::Args;

use mex_core::Settings;

/// Arguments for the `mex settings` subcommand.
#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Print as a dotenv file instead of a table.
    #[arg(long)]
    pub env: bool,
}

/// Execute the settings subcommand.
pub fn run_settings(args: &SettingsArgs, settings: &Settings) -> Result<u8> {
    if args.env {
        println!("{}", settings.env_text());
    } else {
        println!("{}", settings.text());
    }
    Ok(0)
}
