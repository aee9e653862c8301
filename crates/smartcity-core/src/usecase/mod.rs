// ── Use cases ──
//
// One type per repository call. Each is the single place where a
// `CoreError` is classified into a `CityError` and logged; nothing below
// this layer catches.

use std::sync::Arc;

use futures_core::Stream;
use futures_util::StreamExt;
use tracing::{error, warn};

use crate::error::{CityError, CoreError};
use crate::model::{City, CityId};
use crate::repository::CityRepository;

/// Classify and log a failure at the use-case boundary.
fn classify(operation: &'static str, err: &CoreError) -> CityError {
    let kind = CityError::from(err);
    error!(operation, kind = kind.name(), error = %err, "city operation failed");
    kind
}

/// A store call that completed but reported `false`.
fn rejected(operation: &'static str, id: CityId) -> CityError {
    warn!(operation, id, "favorite store rejected the update");
    CityError::Unknown
}

macro_rules! use_case {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<R> {
            repository: Arc<R>,
        }

        impl<R: CityRepository> $name<R> {
            pub fn new(repository: Arc<R>) -> Self {
                Self { repository }
            }
        }

        impl<R> Clone for $name<R> {
            fn clone(&self) -> Self {
                Self {
                    repository: Arc::clone(&self.repository),
                }
            }
        }
    };
}

use_case!(
    /// Prime the city cache. `Ok(false)` means the list is empty, which is
    /// not an error.
    FetchCityList
);
use_case!(
    /// Observe the cached list followed by a refreshed one.
    WatchCityList
);
use_case!(
    /// Filtered, ordered search with favorite flags.
    SearchCity
);
use_case!(
    /// Point lookup; a miss is `CityNotFound`.
    GetCity
);
use_case!(AddFavorite);
use_case!(RemoveFavorite);
use_case!(
    /// Drop the cached list (and favorites, per the clear policy).
    ClearLocalData
);

impl<R: CityRepository> FetchCityList<R> {
    pub async fn execute(&self) -> Result<bool, CityError> {
        self.repository
            .fetch_city_list()
            .await
            .map_err(|e| classify("fetch_city_list", &e))
    }
}

impl<R: CityRepository> WatchCityList<R> {
    pub fn execute(&self) -> impl Stream<Item = Result<Vec<City>, CityError>> + Send + '_ {
        self.repository
            .city_list()
            .map(|item| item.map_err(|e| classify("city_list", &e)))
    }
}

impl<R: CityRepository> SearchCity<R> {
    pub fn execute(
        &self,
        query: impl Into<String>,
    ) -> impl Stream<Item = Result<Vec<City>, CityError>> + Send + '_ {
        self.repository
            .search_city(query.into())
            .map(|item| item.map_err(|e| classify("search_city", &e)))
    }
}

impl<R: CityRepository> GetCity<R> {
    pub async fn execute(&self, id: CityId) -> Result<City, CityError> {
        match self.repository.find_by_id(id).await {
            Ok(Some(city)) => Ok(city),
            Ok(None) => {
                warn!(id, "city lookup missed");
                Err(CityError::CityNotFound)
            }
            Err(e) => Err(classify("find_by_id", &e)),
        }
    }
}

impl<R: CityRepository> AddFavorite<R> {
    pub async fn execute(&self, id: CityId) -> Result<(), CityError> {
        match self.repository.add_favorite(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(rejected("add_favorite", id)),
            Err(e) => Err(classify("add_favorite", &e)),
        }
    }
}

impl<R: CityRepository> RemoveFavorite<R> {
    pub async fn execute(&self, id: CityId) -> Result<(), CityError> {
        match self.repository.remove_favorite(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(rejected("remove_favorite", id)),
            Err(e) => Err(classify("remove_favorite", &e)),
        }
    }
}

impl<R: CityRepository> ClearLocalData<R> {
    pub async fn execute(&self) -> Result<(), CityError> {
        self.repository
            .clear()
            .await
            .map_err(|e| classify("clear", &e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::FavoriteStore;
    use crate::testing::{FakeSource, repository, sample_payloads};

    #[tokio::test]
    async fn fetch_reports_empty_list_as_false_not_error() {
        let source = Arc::new(FakeSource::with(Vec::new()));
        let fetch = FetchCityList::new(repository(&source));
        assert_eq!(fetch.execute().await, Ok(false));
    }

    #[tokio::test]
    async fn unreachable_source_is_connection_error() {
        let source = Arc::new(FakeSource::unreachable());
        let repo = repository(&source);

        assert_eq!(
            FetchCityList::new(Arc::clone(&repo)).execute().await,
            Err(CityError::ConnectionError)
        );

        let search = SearchCity::new(repo);
        let items: Vec<_> = search.execute("new").collect().await;
        assert_eq!(items, vec![Err(CityError::ConnectionError)]);
    }

    #[tokio::test]
    async fn get_city_miss_is_city_not_found() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);
        let get = GetCity::new(Arc::clone(&repo));

        assert_eq!(get.execute(1).await, Err(CityError::CityNotFound));

        FetchCityList::new(repo).execute().await.unwrap();
        assert_eq!(get.execute(1).await.unwrap().name, "New York");
        assert_eq!(get.execute(999).await, Err(CityError::CityNotFound));
    }

    #[tokio::test]
    async fn favorite_round_trip_through_use_cases() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);
        FetchCityList::new(Arc::clone(&repo)).execute().await.unwrap();

        AddFavorite::new(Arc::clone(&repo)).execute(3).await.unwrap();
        assert!(GetCity::new(Arc::clone(&repo)).execute(3).await.unwrap().is_favorite);

        RemoveFavorite::new(Arc::clone(&repo)).execute(3).await.unwrap();
        assert!(!repo.favorites().contains(3).await.unwrap());
    }

    #[tokio::test]
    async fn watch_maps_each_item() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);
        FetchCityList::new(Arc::clone(&repo)).execute().await.unwrap();
        source.fail();

        let watch = WatchCityList::new(repo);
        let items: Vec<_> = watch.execute().collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().len(), 3);
        assert_eq!(items[1], Err(CityError::ConnectionError));
    }

    #[tokio::test]
    async fn clear_forces_next_fetch_to_hit_remote() {
        let source = Arc::new(FakeSource::with(sample_payloads()));
        let repo = repository(&source);
        let fetch = FetchCityList::new(Arc::clone(&repo));

        fetch.execute().await.unwrap();
        ClearLocalData::new(repo).execute().await.unwrap();
        fetch.execute().await.unwrap();
        assert_eq!(source.calls(), 2);
    }
}
