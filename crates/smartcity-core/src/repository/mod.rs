// ── City repository ──
//
// Offline-first access to the city list. The remote source is hit only
// when the local cache is empty or when a caller explicitly asks for a
// refresh through `city_list`. Favorite flags are never stored with the
// list; every read merges them from the favorite store.

use std::future::Future;
use std::sync::Arc;

use async_stream::try_stream;
use futures_core::Stream;
use smartcity_api::{CityApiClient, CityPayload};
use tracing::{debug, info, warn};

use crate::config::{ClearPolicy, RepositoryOptions};
use crate::convert::cities_from_payloads;
use crate::error::CoreError;
use crate::model::{City, CityId};
use crate::store::{FavoriteStore, LocalCityStore};

// ── Remote source seam ───────────────────────────────────────────────

/// Where the full city list comes from.
pub trait CitySource: Send + Sync {
    fn fetch_cities(&self) -> impl Future<Output = Result<Vec<CityPayload>, CoreError>> + Send;
}

impl CitySource for CityApiClient {
    async fn fetch_cities(&self) -> Result<Vec<CityPayload>, CoreError> {
        Ok(self.list_cities().await?)
    }
}

impl<S: CitySource> CitySource for Arc<S> {
    fn fetch_cities(&self) -> impl Future<Output = Result<Vec<CityPayload>, CoreError>> + Send {
        (**self).fetch_cities()
    }
}

// ── Repository contract ──────────────────────────────────────────────

/// Read and mutate cities and favorites.
///
/// Streams are lazy and finite: nothing happens until they are polled, and
/// each new subscription starts over.
pub trait CityRepository: Send + Sync {
    /// Make sure a list is cached. Returns whether the cached or freshly
    /// fetched list is non-empty.
    fn fetch_city_list(&self) -> impl Future<Output = Result<bool, CoreError>> + Send;

    /// Cached list first (empty if nothing is cached), then the result of
    /// an unconditional refetch.
    fn city_list(&self) -> impl Stream<Item = Result<Vec<City>, CoreError>> + Send + '_;

    /// Cities whose name contains `query`, ignoring case, ordered by name
    /// then country. Emits exactly one item.
    fn search_city(&self, query: String) -> impl Stream<Item = Result<Vec<City>, CoreError>> + Send + '_;

    /// Cached city with its current favorite flag.
    fn find_by_id(&self, id: CityId) -> impl Future<Output = Result<Option<City>, CoreError>> + Send;

    /// Overwrite the cached list.
    fn store(&self, cities: Vec<City>) -> impl Future<Output = ()> + Send;

    fn clear(&self) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn add_favorite(&self, id: CityId) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn remove_favorite(&self, id: CityId) -> impl Future<Output = Result<bool, CoreError>> + Send;
}

// ── Cached implementation ────────────────────────────────────────────

/// Repository backed by a remote source, an in-memory cache and a
/// favorite store.
pub struct CachedCityRepository<S, F> {
    source: S,
    local: LocalCityStore,
    favorites: F,
    options: RepositoryOptions,
}

impl<S: CitySource, F: FavoriteStore> CachedCityRepository<S, F> {
    pub fn new(source: S, local: LocalCityStore, favorites: F) -> Self {
        Self::with_options(source, local, favorites, RepositoryOptions::default())
    }

    pub fn with_options(
        source: S,
        local: LocalCityStore,
        favorites: F,
        options: RepositoryOptions,
    ) -> Self {
        Self {
            source,
            local,
            favorites,
            options,
        }
    }

    /// The in-memory cache, for change subscriptions and refresh times.
    pub fn local(&self) -> &LocalCityStore {
        &self.local
    }

    pub fn favorites(&self) -> &F {
        &self.favorites
    }

    pub fn options(&self) -> RepositoryOptions {
        self.options
    }

    /// Cached list, treating "populated but empty" like "never populated".
    fn cached_nonempty(&self) -> Option<Arc<Vec<City>>> {
        self.local.get().filter(|cities| !cities.is_empty())
    }

    /// Pull the list from the remote source and replace the cache.
    async fn refetch(&self) -> Result<Arc<Vec<City>>, CoreError> {
        let payloads = self.source.fetch_cities().await.inspect_err(|e| {
            warn!(error = %e, "city list fetch failed");
        })?;
        let cities = self.local.store(cities_from_payloads(payloads));
        info!(count = cities.len(), "city list refreshed from remote");
        Ok(cities)
    }

    async fn filter_and_merge(&self, cities: &[City], query: &str) -> Result<Vec<City>, CoreError> {
        let favorites = self.favorites.get().await?;
        let mut matches: Vec<City> = cities
            .iter()
            .filter(|city| city.name_contains(query))
            .map(|city| city.with_favorite(favorites.contains(&city.id)))
            .collect();
        matches.sort_by_cached_key(City::sort_key);
        Ok(matches)
    }
}

impl<S: CitySource, F: FavoriteStore> CityRepository for CachedCityRepository<S, F> {
    async fn fetch_city_list(&self) -> Result<bool, CoreError> {
        if self.cached_nonempty().is_some() {
            debug!("city list already cached, skipping fetch");
            return Ok(true);
        }
        let cities = self.refetch().await?;
        Ok(!cities.is_empty())
    }

    fn city_list(&self) -> impl Stream<Item = Result<Vec<City>, CoreError>> + Send + '_ {
        try_stream! {
            let cached = self.local.get().map(|c| c.as_ref().clone()).unwrap_or_default();
            debug!(count = cached.len(), "emitting cached city list");
            yield cached;

            let fresh = self.refetch().await?;
            yield fresh.as_ref().clone();
        }
    }

    fn search_city(&self, query: String) -> impl Stream<Item = Result<Vec<City>, CoreError>> + Send + '_ {
        try_stream! {
            let cities = match self.cached_nonempty() {
                Some(cities) => cities,
                None => {
                    debug!(%query, "cache empty, fetching before search");
                    self.refetch().await?
                }
            };
            let matches = self.filter_and_merge(&cities, &query).await?;
            debug!(%query, matches = matches.len(), "search complete");
            yield matches;
        }
    }

    async fn find_by_id(&self, id: CityId) -> Result<Option<City>, CoreError> {
        if self.options.lookup_fetches_on_miss && self.cached_nonempty().is_none() {
            self.refetch().await?;
        }
        let Some(city) = self.local.get_by_id(id) else {
            debug!(id, "city not in cache");
            return Ok(None);
        };
        let is_favorite = self.favorites.contains(id).await?;
        Ok(Some(City {
            is_favorite,
            ..city
        }))
    }

    async fn store(&self, cities: Vec<City>) {
        self.local.store(cities);
    }

    async fn clear(&self) -> Result<(), CoreError> {
        self.local.clear();
        if self.options.clear_policy == ClearPolicy::CitiesAndFavorites {
            self.favorites.clear().await?;
        }
        info!(policy = %self.options.clear_policy, "local data cleared");
        Ok(())
    }

    async fn add_favorite(&self, id: CityId) -> Result<bool, CoreError> {
        debug!(id, "adding favorite");
        self.favorites.add_favorite(id).await
    }

    async fn remove_favorite(&self, id: CityId) -> Result<bool, CoreError> {
        debug!(id, "removing favorite");
        self.favorites.remove_favorite(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Coordinate;
    use crate::testing::{FakeSource, payload, repository, repository_with, sample_payloads};
    use futures_util::StreamExt;
    use pretty_assertions::assert_eq;

    fn names(cities: &[City]) -> Vec<&str> {
        cities.iter().map(|c| c.name.as_str()).collect()
    }

    async fn first<T>(stream: impl Stream<Item = T>) -> T {
        let mut stream = std::pin::pin!(stream);
        stream.next().await.unwrap()
    }

    #[tokio::test]
    async fn fetch_hits_remote_once_then_serves_cache() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);

        assert!(repo.fetch_city_list().await.unwrap());
        assert!(repo.fetch_city_list().await.unwrap());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn fetch_of_empty_remote_list_returns_false() {
        let source = Arc::new(FakeSource::with(Vec::new()));
        let repo = repository(&source);

        assert!(!repo.fetch_city_list().await.unwrap());
        assert!(repo.local().is_populated());
        // An empty cache still counts as "fetch needed".
        assert!(!repo.fetch_city_list().await.unwrap());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn fetch_error_propagates_and_leaves_cache_empty() {
        let source = Arc::new(FakeSource::unreachable());
        let repo = repository(&source);

        let err = repo.fetch_city_list().await.unwrap_err();
        assert!(matches!(err, CoreError::ConnectionFailed { .. }));
        assert!(!repo.local().is_populated());
    }

    #[tokio::test]
    async fn search_filters_case_insensitively_and_sorts() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);
        repo.fetch_city_list().await.unwrap();

        let items: Vec<_> = repo.search_city("o".into()).collect().await;
        assert_eq!(items.len(), 1);
        let found = items.into_iter().next().unwrap().unwrap();
        assert_eq!(names(&found), vec!["Cordoba", "New York"]);

        let upper = first(repo.search_city("NEW".into())).await.unwrap();
        assert_eq!(names(&upper), vec!["New York"]);
    }

    #[tokio::test]
    async fn search_without_matches_is_empty_not_error() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);
        repo.fetch_city_list().await.unwrap();

        let found = first(repo.search_city("zzz".into())).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn search_ties_break_on_country() {
        let source = Arc::new(FakeSource::with(vec![
            payload(10, "Springfield", "US", 0.0, 0.0),
            payload(11, "springfield", "AU", 0.0, 0.0),
            payload(12, "Alpha", "ZZ", 0.0, 0.0),
        ]));
        let repo = repository(&source);

        let found = first(repo.search_city(String::new())).await.unwrap();
        let ids: Vec<_> = found.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![12, 11, 10]);
    }

    #[tokio::test]
    async fn search_on_empty_cache_fetches_first() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);

        let found = first(repo.search_city("den".into())).await.unwrap();
        assert_eq!(names(&found), vec!["Denver"]);
        assert_eq!(source.calls(), 1);
        assert!(repo.local().is_populated());

        first(repo.search_city("den".into())).await.unwrap();
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn search_failure_is_a_single_terminal_error() {
        let source = Arc::new(FakeSource::unreachable());
        let repo = repository(&source);

        let items: Vec<_> = repo.search_city("o".into()).collect().await;
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }

    #[tokio::test]
    async fn search_merges_current_favorites() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);
        repo.fetch_city_list().await.unwrap();
        repo.add_favorite(2).await.unwrap();

        let found = first(repo.search_city("o".into())).await.unwrap();
        let flags: Vec<_> = found.iter().map(|c| (c.id, c.is_favorite)).collect();
        assert_eq!(flags, vec![(2, true), (1, false)]);

        // The cache itself never carries the flag.
        assert!(repo.local().get().unwrap().iter().all(|c| !c.is_favorite));
    }

    #[tokio::test]
    async fn city_list_emits_cache_then_refetch() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);

        let first: Vec<_> = repo.city_list().collect().await;
        assert_eq!(first.len(), 2);
        assert!(first[0].as_ref().unwrap().is_empty());
        assert_eq!(first[1].as_ref().unwrap().len(), 3);

        source.respond_with(vec![payload(9, "Oslo", "NO", 10.75, 59.91)]);
        let second: Vec<_> = repo.city_list().collect().await;
        assert_eq!(second[0].as_ref().unwrap().len(), 3);
        assert_eq!(names(second[1].as_ref().unwrap()), vec!["Oslo"]);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn city_list_refetch_failure_follows_cached_item() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);
        repo.fetch_city_list().await.unwrap();
        source.fail();

        let items: Vec<_> = repo.city_list().collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().len(), 3);
        assert!(items[1].is_err());
        // The failed refetch leaves the old list in place.
        assert_eq!(repo.local().get().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn find_by_id_reads_cache_only_by_default() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);

        assert!(repo.find_by_id(1).await.unwrap().is_none());
        assert_eq!(source.calls(), 0);

        repo.fetch_city_list().await.unwrap();
        repo.add_favorite(1).await.unwrap();
        let city = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(city.name, "New York");
        assert!(city.is_favorite);
        assert!(repo.find_by_id(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_id_can_fetch_on_empty_cache() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository_with(
            &source,
            RepositoryOptions {
                lookup_fetches_on_miss: true,
                ..RepositoryOptions::default()
            },
        );

        let city = repo.find_by_id(3).await.unwrap().unwrap();
        assert_eq!(city.name, "Denver");
        assert_eq!(source.calls(), 1);

        // Populated cache: a miss does not refetch.
        assert!(repo.find_by_id(404).await.unwrap().is_none());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn favorite_add_and_remove_are_visible_on_next_read() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);
        repo.fetch_city_list().await.unwrap();

        assert!(repo.add_favorite(2).await.unwrap());
        assert!(repo.find_by_id(2).await.unwrap().unwrap().is_favorite);
        assert!(repo.remove_favorite(2).await.unwrap());
        assert!(!repo.find_by_id(2).await.unwrap().unwrap().is_favorite);
    }

    #[tokio::test]
    async fn clear_wipes_cities_and_favorites_by_default() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);
        repo.fetch_city_list().await.unwrap();
        repo.add_favorite(1).await.unwrap();

        repo.clear().await.unwrap();
        assert!(repo.local().get().is_none());
        assert!(repo.favorites().get().await.unwrap().is_empty());

        repo.fetch_city_list().await.unwrap();
        assert_eq!(source.calls(), 2);
        assert!(!repo.find_by_id(1).await.unwrap().unwrap().is_favorite);
    }

    #[tokio::test]
    async fn cities_only_policy_keeps_favorites() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository_with(
            &source,
            RepositoryOptions {
                clear_policy: ClearPolicy::CitiesOnly,
                ..RepositoryOptions::default()
            },
        );
        repo.fetch_city_list().await.unwrap();
        repo.add_favorite(1).await.unwrap();

        repo.clear().await.unwrap();
        assert!(repo.local().get().is_none());
        assert!(repo.favorites().contains(1).await.unwrap());
    }

    #[tokio::test]
    async fn store_overwrites_cache_without_remote() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);

        repo.store(vec![City::new(77, "Lima", "PE", Coordinate::new(-77.04, -12.05))])
            .await;
        assert!(repo.fetch_city_list().await.unwrap());
        assert_eq!(repo.find_by_id(77).await.unwrap().unwrap().name, "Lima");
        assert_eq!(source.calls(), 0);
    }
}
