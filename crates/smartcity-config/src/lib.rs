//! Configuration for the smartcity CLI.
//!
//! Layered loading (built-in defaults, then the TOML file, then
//! `SMARTCITY_` environment variables), platform paths, and translation to
//! `smartcity_core::CoreConfig`. CLI flags are applied on top by the
//! binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use smartcity_api::{DEFAULT_BASE_URL, DEFAULT_CITIES_PATH};
use smartcity_core::{ClearPolicy, CoreConfig, RepositoryOptions, SearchOptions};

/// Environment prefix. Nested keys use a double underscore:
/// `SMARTCITY_API__TIMEOUT_MS=5000`.
pub const ENV_PREFIX: &str = "SMARTCITY_";

const FAVORITES_FILE_NAME: &str = "favorite_preferences.json";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub search: SearchSection,

    #[serde(default)]
    pub repository: RepositorySection,
}

/// Where the city dataset is fetched from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Dataset path relative to `base_url`.
    #[serde(default = "default_cities_path")]
    pub cities_path: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cities_path: default_cities_path(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_cities_path() -> String {
    DEFAULT_CITIES_PATH.into()
}
fn default_timeout_ms() -> u64 {
    20_000
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StorageSection {
    /// Favorites preference file. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorites_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchSection {
    /// Typing debounce for `SearchViewModel`. One-shot CLI searches skip it.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Queries of this many characters or fewer are not searched.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    400
}
fn default_min_query_len() -> usize {
    2
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RepositorySection {
    /// Fetch the list before a lookup when nothing is cached.
    #[serde(default)]
    pub lookup_fetches_on_miss: bool,

    /// `cities-and-favorites` or `cities-only`.
    #[serde(default)]
    pub clear_policy: ClearPolicy,
}

impl Config {
    /// Build a `CoreConfig`, resolving the favorites file against the
    /// platform data dir when unset.
    pub fn to_core_config(&self) -> Result<CoreConfig, ConfigError> {
        let base_url: url::Url = self
            .api
            .base_url
            .parse()
            .map_err(|e| ConfigError::Validation {
                field: "api.base_url".into(),
                reason: format!("{e}: {}", self.api.base_url),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Validation {
                field: "api.base_url".into(),
                reason: format!("not a base URL: {base_url}"),
            });
        }
        if self.api.timeout_ms == 0 {
            return Err(ConfigError::Validation {
                field: "api.timeout_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }

        let favorites_file = self
            .storage
            .favorites_file
            .clone()
            .unwrap_or_else(default_favorites_file);

        Ok(CoreConfig {
            base_url,
            cities_path: self.api.cities_path.clone(),
            timeout: Duration::from_millis(self.api.timeout_ms),
            favorites_file,
            repository: RepositoryOptions {
                lookup_fetches_on_miss: self.repository.lookup_fetches_on_miss,
                clear_policy: self.repository.clear_policy,
            },
            search: SearchOptions {
                debounce: Duration::from_millis(self.search.debounce_ms),
                min_query_len: self.search.min_query_len,
            },
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "citron", "smartcity")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the favorites preference file.
pub fn default_favorites_file() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join(FAVORITES_FILE_NAME),
        |dirs| dirs.data_dir().join(FAVORITES_FILE_NAME),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("smartcity");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from `path` plus environment. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML at `path`, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
