//! # Settings
//!
//! Process configuration for extractors, the schema check and the CLI.
//!
//! A [`Settings`] value is built once at process start and handed to every
//! collaborator by reference. Values come from, in order of precedence:
//!
//! 1. the process environment (`MEX_*` variables),
//! 2. a `.env` file in `assets_dir` if one exists, otherwise a `.env` file in
//!    the working directory,
//! 3. built-in defaults.
//!
//! Because `assets_dir` itself decides which dotenv file applies, resolution
//! runs twice: once to find `assets_dir`, once with the final dotenv file.
//! Dotenv files are read, never exported into the process environment.
//!
//! Paths to input files are stored as given and resolved against
//! `assets_dir` when relative; see [`Settings::resolve_asset`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SettingsError;

static DEFAULT_BACKEND_API_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://localhost:8080/").expect("valid url"));
static DEFAULT_WIKI_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://wikidata/").expect("valid url"));

const DEFAULT_ORGANIGRAM_PATH: &str = "raw-data/organigram/organizational_units.json";
const DEFAULT_PRIMARY_SOURCES_PATH: &str = "raw-data/primary-sources/primary-sources.json";
const DEFAULT_SCHEMA_DIR: &str = "schemas/entities";

/// Where extracted or ingested data is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sink {
    /// Newline-delimited JSON files in `work_dir`.
    Ndjson,
    /// The backend API.
    Backend,
    /// A graph database.
    Graph,
}

impl Sink {
    /// The lowercase setting value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ndjson => "ndjson",
            Self::Backend => "backend",
            Self::Graph => "graph",
        }
    }
}

impl FromStr for Sink {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ndjson" => Ok(Self::Ndjson),
            "backend" => Ok(Self::Backend),
            "graph" => Ok(Self::Graph),
            other => Err(format!("unknown sink {other:?}")),
        }
    }
}

/// Provider that assigns stable target identifiers to new items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProvider {
    /// Deterministic identifiers derived from the item itself.
    Dummy,
    /// Identifiers remembered in memory for the lifetime of the process.
    Memory,
}

impl IdentityProvider {
    /// The lowercase setting value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dummy => "dummy",
            Self::Memory => "memory",
        }
    }
}

impl FromStr for IdentityProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dummy" => Ok(Self::Dummy),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown identity provider {other:?}")),
        }
    }
}

/// Common settings shared by every MEx component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable debug mode (verbose logging).
    pub debug: bool,
    /// Where to send extracted or ingested data.
    pub sink: Vec<Sink>,
    /// Directory with read-only input files.
    pub assets_dir: PathBuf,
    /// Directory for generated and temporary files.
    pub work_dir: PathBuf,
    /// Provider assigning stable target identifiers.
    pub identity_provider: IdentityProvider,
    /// Backend API URL.
    pub backend_api_url: Url,
    /// Organigram JSON file, absolute or relative to `assets_dir`.
    pub organigram_path: PathBuf,
    /// Primary sources JSON file, absolute or relative to `assets_dir`.
    pub primary_sources_path: PathBuf,
    /// Directory with the specified entity schemas.
    pub schema_dir: PathBuf,
    /// Wikidata API URL.
    pub wiki_api_url: Url,
    /// Wikidata query service URL.
    pub wiki_query_service_url: Url,
}

impl Default for Settings {
    fn default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            debug: false,
            sink: vec![Sink::Ndjson],
            assets_dir: cwd.join("assets"),
            work_dir: cwd,
            identity_provider: IdentityProvider::Dummy,
            backend_api_url: DEFAULT_BACKEND_API_URL.clone(),
            organigram_path: PathBuf::from(DEFAULT_ORGANIGRAM_PATH),
            primary_sources_path: PathBuf::from(DEFAULT_PRIMARY_SOURCES_PATH),
            schema_dir: PathBuf::from(DEFAULT_SCHEMA_DIR),
            wiki_api_url: DEFAULT_WIKI_URL.clone(),
            wiki_query_service_url: DEFAULT_WIKI_URL.clone(),
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment and dotenv files.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidVar` for malformed values and
    /// `SettingsError::DotenvFile` for unreadable dotenv files.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_sources(|var| std::env::var(var).ok(), Path::new(".env"))
    }

    /// Resolve settings from an environment lookup and a working-directory
    /// dotenv file, applying the assets-dir dotenv override.
    ///
    /// # Errors
    ///
    /// See [`Settings::from_env`].
    pub fn from_sources(
        env: impl Fn(&str) -> Option<String>,
        cwd_dotenv: &Path,
    ) -> Result<Self, SettingsError> {
        let dotenv = read_dotenv(cwd_dotenv)?;
        let first = Self::from_lookup(|var| env(var).or_else(|| dotenv.get(var).cloned()))?;

        let assets_dotenv = first.assets_dir.join(".env");
        if !assets_dotenv.is_file() {
            return Ok(first);
        }
        tracing::debug!(path = %assets_dotenv.display(), "loading dotenv from assets dir");
        let dotenv = read_dotenv(&assets_dotenv)?;
        Self::from_lookup(|var| env(var).or_else(|| dotenv.get(var).cloned()))
    }

    /// Build settings from a single variable lookup, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidVar` for malformed values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let path = |var: &str, default: PathBuf| lookup(var).map(PathBuf::from).unwrap_or(default);

        Ok(Self {
            debug: parse_var(&lookup, "MEX_DEBUG", parse_bool)?.unwrap_or(defaults.debug),
            sink: parse_var(&lookup, "MEX_SINK", parse_sinks)?.unwrap_or(defaults.sink),
            assets_dir: path("MEX_ASSETS_DIR", defaults.assets_dir),
            work_dir: path("MEX_WORK_DIR", defaults.work_dir),
            identity_provider: parse_var(&lookup, "MEX_IDENTITY_PROVIDER", |s| {
                s.parse::<IdentityProvider>()
            })?
                .unwrap_or(defaults.identity_provider),
            backend_api_url: parse_var(&lookup, "MEX_BACKEND_API_URL", parse_url)?
                .unwrap_or(defaults.backend_api_url),
            organigram_path: path("MEX_ORGANIGRAM_PATH", defaults.organigram_path),
            primary_sources_path: path("MEX_PRIMARY_SOURCES_PATH", defaults.primary_sources_path),
            schema_dir: path("MEX_SCHEMA_DIR", defaults.schema_dir),
            wiki_api_url: parse_var(&lookup, "MEX_WIKI_API_URL", parse_url)?
                .unwrap_or(defaults.wiki_api_url),
            wiki_query_service_url: parse_var(&lookup, "MEX_WIKI_QUERY_SERVICE_URL", parse_url)?
                .unwrap_or(defaults.wiki_query_service_url),
        })
    }

    /// Resolve an asset path: absolute paths are kept, relative paths are
    /// joined onto `assets_dir`.
    pub fn resolve_asset(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.assets_dir.join(path)
        }
    }

    /// Resolved location of the organigram file.
    pub fn organigram_file(&self) -> PathBuf {
        self.resolve_asset(&self.organigram_path)
    }

    /// Resolved location of the primary sources file.
    pub fn primary_sources_file(&self) -> PathBuf {
        self.resolve_asset(&self.primary_sources_path)
    }

    fn entries(&self) -> Vec<(&'static str, &'static str, String)> {
        let sinks: Vec<&str> = self.sink.iter().map(Sink::as_str).collect();
        vec![
            ("debug", "MEX_DEBUG", self.debug.to_string()),
            ("sink", "MEX_SINK", sinks.join(",")),
            ("assets_dir", "MEX_ASSETS_DIR", self.assets_dir.display().to_string()),
            ("work_dir", "MEX_WORK_DIR", self.work_dir.display().to_string()),
            (
                "identity_provider",
                "MEX_IDENTITY_PROVIDER",
                self.identity_provider.as_str().to_string(),
            ),
            ("backend_api_url", "MEX_BACKEND_API_URL", self.backend_api_url.to_string()),
            (
                "organigram_path",
                "MEX_ORGANIGRAM_PATH",
                self.organigram_path.display().to_string(),
            ),
            (
                "primary_sources_path",
                "MEX_PRIMARY_SOURCES_PATH",
                self.primary_sources_path.display().to_string(),
            ),
            ("schema_dir", "MEX_SCHEMA_DIR", self.schema_dir.display().to_string()),
            ("wiki_api_url", "MEX_WIKI_API_URL", self.wiki_api_url.to_string()),
            (
                "wiki_query_service_url",
                "MEX_WIKI_QUERY_SERVICE_URL",
                self.wiki_query_service_url.to_string(),
            ),
        ]
    }

    /// Dump the settings into a readable, aligned table.
    pub fn text(&self) -> String {
        let entries = self.entries();
        let indent = entries.iter().map(|(key, _, _)| key.len()).max().unwrap_or(0);
        entries
            .iter()
            .map(|(key, _, value)| format!("{key:<indent$} {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Dump the settings as environment variables. Empty values are skipped.
    pub fn env(&self) -> BTreeMap<String, String> {
        self.entries()
            .into_iter()
            .filter(|(_, _, value)| !value.is_empty())
            .map(|(_, var, value)| (var.to_string(), value))
            .collect()
    }

    /// Dump the settings as a `.env` file body.
    pub fn env_text(&self) -> String {
        self.env()
            .iter()
            .map(|(key, value)| format!("{key}=\"{}\"", value.replace('"', "\\\"")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<Option<T>, SettingsError> {
    lookup(var)
        .map(|raw| parse(&raw).map_err(|reason| SettingsError::InvalidVar { var, reason }))
        .transpose()
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(format!("not a boolean: {other:?}")),
    }
}

fn parse_sinks(raw: &str) -> Result<Vec<Sink>, String> {
    let raw = raw.trim();
    if raw.starts_with('[') {
        let items: Vec<String> =
            serde_json::from_str(raw).map_err(|e| format!("invalid sink list: {e}"))?;
        return items.iter().map(|s| s.parse::<Sink>()).collect();
    }
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<Sink>())
        .collect()
}

fn parse_url(raw: &str) -> Result<Url, String> {
    Url::parse(raw.trim()).map_err(|e| format!("invalid url: {e}"))
}

fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, SettingsError> {
    if !path.is_file() {
        return Ok(HashMap::new());
    }
    let to_error = |e: dotenvy::Error| SettingsError::DotenvFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    };
    dotenvy::from_path_iter(path)
        .map_err(to_error)?
        .map(|item| item.map_err(to_error))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.sink, vec![Sink::Ndjson]);
        assert_eq!(settings.identity_provider, IdentityProvider::Dummy);
        assert!(settings.assets_dir.ends_with("assets"));
    }

    #[test]
    fn test_variables_override_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("MEX_DEBUG", "true"),
            ("MEX_SINK", "ndjson, backend"),
            ("MEX_IDENTITY_PROVIDER", "memory"),
            ("MEX_BACKEND_API_URL", "http://backend:8080/"),
            ("MEX_ASSETS_DIR", "/data/assets"),
        ]))
        .unwrap();
        assert!(settings.debug);
        assert_eq!(settings.sink, vec![Sink::Ndjson, Sink::Backend]);
        assert_eq!(settings.identity_provider, IdentityProvider::Memory);
        assert_eq!(settings.backend_api_url.as_str(), "http://backend:8080/");
        assert_eq!(
            settings.organigram_file(),
            PathBuf::from("/data/assets/raw-data/organigram/organizational_units.json")
        );
    }

    #[test]
    fn test_sink_accepts_json_list() {
        let settings =
            Settings::from_lookup(lookup_from(&[("MEX_SINK", r#"["graph","ndjson"]"#)])).unwrap();
        assert_eq!(settings.sink, vec![Sink::Graph, Sink::Ndjson]);
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = Settings::from_lookup(lookup_from(&[("MEX_DEBUG", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("MEX_DEBUG"));
        let err = Settings::from_lookup(lookup_from(&[("MEX_SINK", "s3")])).unwrap_err();
        assert!(err.to_string().contains("MEX_SINK"));
        let err =
            Settings::from_lookup(lookup_from(&[("MEX_WIKI_API_URL", "no url")])).unwrap_err();
        assert!(err.to_string().contains("MEX_WIKI_API_URL"));
    }

    #[test]
    fn test_absolute_asset_paths_are_kept() {
        let settings =
            Settings::from_lookup(lookup_from(&[("MEX_ORGANIGRAM_PATH", "/abs/units.json")]))
                .unwrap();
        assert_eq!(settings.organigram_file(), PathBuf::from("/abs/units.json"));
    }

    #[test]
    fn test_assets_dotenv_replaces_cwd_dotenv() {
        let dir = tempfile::tempdir().unwrap();
        let assets = dir.path().join("assets");
        std::fs::create_dir_all(&assets).unwrap();
        let cwd_dotenv = dir.path().join(".env");
        std::fs::write(
            &cwd_dotenv,
            format!(
                "MEX_ASSETS_DIR={}\nMEX_DEBUG=true\nMEX_SINK=graph\n",
                assets.display()
            ),
        )
        .unwrap();
        std::fs::write(assets.join(".env"), "MEX_SINK=backend\n").unwrap();

        let settings = Settings::from_sources(
            lookup_from(&[("MEX_ASSETS_DIR", &assets.display().to_string())]),
            &cwd_dotenv,
        )
        .unwrap();
        assert_eq!(settings.assets_dir, assets);
        assert_eq!(settings.sink, vec![Sink::Backend]);
        // Only the assets dotenv applies in the second pass.
        assert!(!settings.debug);
    }

    #[test]
    fn test_process_env_wins_over_dotenv() {
        let dir = tempfile::tempdir().unwrap();
        let cwd_dotenv = dir.path().join(".env");
        std::fs::write(&cwd_dotenv, "MEX_IDENTITY_PROVIDER=memory\n").unwrap();
        let settings = Settings::from_sources(
            lookup_from(&[
                ("MEX_IDENTITY_PROVIDER", "dummy"),
                ("MEX_ASSETS_DIR", &dir.path().join("none").display().to_string()),
            ]),
            &cwd_dotenv,
        )
        .unwrap();
        assert_eq!(settings.identity_provider, IdentityProvider::Dummy);
    }

    #[test]
    fn test_text_is_aligned() {
        let text = Settings::default().text();
        let indent = "wiki_query_service_url".len();
        for line in text.lines() {
            assert_eq!(line.as_bytes()[indent], b' ', "misaligned: {line:?}");
            assert_ne!(line.as_bytes()[indent + 1], b' ', "misaligned: {line:?}");
        }
        assert!(text.starts_with("debug "));
        assert!(text.contains("wiki_query_service_url https://wikidata/"));
    }

    #[test]
    fn test_env_text_escapes_quotes() {
        let mut settings = Settings::default();
        settings.schema_dir = PathBuf::from("dir \"quoted\"");
        let text = settings.env_text();
        assert!(text.contains(r#"MEX_SCHEMA_DIR="dir \"quoted\"""#));
        assert!(text.contains(r#"MEX_DEBUG="false""#));
        let keys: Vec<&str> = text.lines().map(|l| l.split('=').next().unwrap()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
