//! # mex-cli: CLI Tool for the MEx Model Stack
//!
//! Provides the `mex` command-line interface.
//!
//! ## Subcommands
//!
//! - `mex check-schemas`: Reconcile the model schemas with the published
//!   entity schemas.
//! - `mex validate`: Validate extracted items against the model schemas.
//! - `mex settings`: Print the resolved settings.
//! - `mex organigram`: Load and transform the organigram.
//!
//! Handlers return the process exit code: 0 on success, 1 when the checked
//! input does not pass. Operational errors surface as `Err` and exit with 2.
//!
//! ```bash
//! mex check-schemas --schema-dir schemas/entities
//! mex validate items.ndjson --entity-type Resource
//! mex settings --env > .env
//! ```

pub mod check;
pub mod organigram;
pub mod settings;
pub mod validate;

use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

/// Resolve a path that may be relative to the work directory.
///
/// Absolute paths are returned as-is. A relative path is joined onto
/// `work_dir` if it exists there, and otherwise left relative to the
/// current directory.
pub fn resolve_path(path: &Path, work_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let relative = work_dir.join(path);
    if relative.exists() {
        relative
    } else {
        path.to_path_buf()
    }
}

/// Install the global tracing subscriber.
///
/// An explicit `level` wins over `RUST_LOG`; without either, `debug`
/// selects the debug level and everything else logs warnings only.
pub fn init_tracing(json: bool, level: Option<&str>, debug: bool) {
    let fallback = if debug { "debug" } else { "warn" };
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
    };

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_absolute_path_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let absolute = dir.path().join("x.json");
        assert_eq!(resolve_path(&absolute, Path::new("/elsewhere")), absolute);
    }

    #[test]
    fn resolve_relative_path_prefers_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("schemas")).unwrap();
        assert_eq!(
            resolve_path(Path::new("schemas"), dir.path()),
            dir.path().join("schemas")
        );
        assert_eq!(
            resolve_path(Path::new("missing"), dir.path()),
            PathBuf::from("missing")
        );
    }
}
