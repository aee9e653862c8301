// smartcity-core: Offline-first city data layer between smartcity-api and consumers (CLI).

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod presentation;
pub mod repository;
pub mod store;
pub mod usecase;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClearPolicy, CoreConfig, RepositoryOptions, SearchOptions};
pub use error::{CityError, CoreError};
pub use model::{City, CityId, Coordinate};
pub use repository::{CachedCityRepository, CityRepository, CitySource};
pub use store::{
    FavoriteStore, LocalCityStore, MemoryFavoriteStore, PreferenceFavoriteStore, Preferences,
};
pub use usecase::{
    AddFavorite, ClearLocalData, FetchCityList, GetCity, RemoveFavorite, SearchCity, WatchCityList,
};

use std::sync::Arc;

use smartcity_api::{CityApiClient, TransportConfig};

/// Repository type wired with the production sources.
pub type DefaultRepository = CachedCityRepository<CityApiClient, PreferenceFavoriteStore>;

/// Build the production repository from a `CoreConfig`.
///
/// Creates the HTTP client and opens the favorites preference file. The
/// city cache starts unpopulated.
pub fn build_repository(config: &CoreConfig) -> Result<Arc<DefaultRepository>, CoreError> {
    let transport = TransportConfig::with_timeout(config.timeout);
    let client = CityApiClient::new(&config.base_url, &config.cities_path, &transport)?;
    let favorites = PreferenceFavoriteStore::new(Preferences::open(&config.favorites_file));

    Ok(Arc::new(CachedCityRepository::with_options(
        client,
        LocalCityStore::new(),
        favorites,
        config.repository,
    )))
}
