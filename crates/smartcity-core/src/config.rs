// ── Runtime configuration ──
//
// These types describe *where* the data lives and how the repository and
// search behave. They never touch disk themselves; the CLI (via
// smartcity-config) constructs a `CoreConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use smartcity_api::{DEFAULT_BASE_URL, DEFAULT_CITIES_PATH, DEFAULT_TIMEOUT};

/// What `clear()` wipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ClearPolicy {
    /// City cache and favorite set together.
    #[default]
    CitiesAndFavorites,
    /// City cache only; favorites survive.
    CitiesOnly,
}

/// Repository behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepositoryOptions {
    /// When the cache has never been populated, `find_by_id` fetches the
    /// list first instead of answering "absent".
    pub lookup_fetches_on_miss: bool,
    pub clear_policy: ClearPolicy,
}

/// Search view-model tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Delay between the prefetch gate opening and the search running.
    pub debounce: Duration,
    /// Queries of this many characters or fewer are not searched.
    pub min_query_len: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(400),
            min_query_len: 2,
        }
    }
}

impl SearchOptions {
    /// Whether `query` runs a search at all. Blank queries never do.
    pub fn is_searchable(&self, query: &str) -> bool {
        !query.trim().is_empty() && query.chars().count() > self.min_query_len
    }
}

/// Everything needed to build a repository and its view-models.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Host (or mirror) serving the dataset.
    pub base_url: Url,
    /// Dataset path relative to `base_url`.
    pub cities_path: String,
    /// Connect + request timeout.
    pub timeout: Duration,
    /// Preferences file holding the favorite set.
    pub favorites_file: PathBuf,
    pub repository: RepositoryOptions,
    pub search: SearchOptions,
}

impl CoreConfig {
    /// Defaults for everything except where favorites are persisted.
    pub fn with_favorites_file(favorites_file: impl Into<PathBuf>) -> Self {
        Self {
            base_url: default_base_url(),
            cities_path: DEFAULT_CITIES_PATH.into(),
            timeout: DEFAULT_TIMEOUT,
            favorites_file: favorites_file.into(),
            repository: RepositoryOptions::default(),
            search: SearchOptions::default(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}
