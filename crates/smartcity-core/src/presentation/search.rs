//! Search screen state.
//!
//! Typing is debounced and gated on the initial prefetch: a search only
//! runs once the prefetch finished (successfully or not), then waits the
//! debounce delay. A new query aborts whichever search is still pending.

use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::SearchOptions;
use crate::error::CityError;
use crate::model::{City, CityId};
use crate::repository::CityRepository;
use crate::usecase::{AddFavorite, FetchCityList, RemoveFavorite, SearchCity};

use super::state::{StateContainer, StateHandle};

// ── View types ───────────────────────────────────────────────────────

/// One row of search output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: CityId,
    /// `"<name>, <country>"`.
    pub full_name: String,
    pub is_favorite: bool,
    pub latitude: f64,
    pub longitude: f64,
}

/// User-facing error text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub is_loading: bool,
    /// Mirrors the prefetch gate: `true` once the prefetch has settled.
    pub is_prefetching: bool,
    pub current_text: String,
    pub error: Option<ErrorMessage>,
    /// `None` until a search has produced results (or after a short query).
    pub results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEffect {
    NavigateNext(CityId),
    ShowError(String),
}

/// Whether searches may run yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefetchGate {
    AwaitingPrefetch,
    Ready,
}

// ── Mapping ──────────────────────────────────────────────────────────

pub struct SearchMapper;

impl SearchMapper {
    pub fn to_search_result(city: &City) -> SearchResult {
        SearchResult {
            id: city.id,
            full_name: format!("{}, {}", city.name, city.country_code),
            is_favorite: city.is_favorite,
            latitude: city.coordinate.latitude,
            longitude: city.coordinate.longitude,
        }
    }

    pub fn map_list(cities: &[City]) -> Vec<SearchResult> {
        cities.iter().map(Self::to_search_result).collect()
    }

    pub fn resolve_error(error: CityError) -> ErrorMessage {
        let message = match error {
            CityError::Unknown => "Something went wrong. Please try again.",
            CityError::NotFound => "No cities matched your search.",
            CityError::ConnectionError => {
                "Could not reach the city service. Check your connection and try again."
            }
            CityError::CityNotFound => "That city could not be found.",
        };
        ErrorMessage {
            message: message.to_owned(),
        }
    }
}

// ── View-model ───────────────────────────────────────────────────────

pub struct SearchViewModel<R> {
    container: StateContainer<SearchState, SearchEffect>,
    fetch: FetchCityList<R>,
    search: SearchCity<R>,
    add_favorite: AddFavorite<R>,
    remove_favorite: RemoveFavorite<R>,
    gate: Arc<watch::Sender<PrefetchGate>>,
    pending: Mutex<Option<JoinHandle<()>>>,
    options: SearchOptions,
}

impl<R: CityRepository + 'static> SearchViewModel<R> {
    pub fn new(repository: Arc<R>, options: SearchOptions) -> Self {
        let (gate, _) = watch::channel(PrefetchGate::AwaitingPrefetch);
        Self {
            container: StateContainer::new(SearchState::default()),
            fetch: FetchCityList::new(Arc::clone(&repository)),
            search: SearchCity::new(Arc::clone(&repository)),
            add_favorite: AddFavorite::new(Arc::clone(&repository)),
            remove_favorite: RemoveFavorite::new(repository),
            gate: Arc::new(gate),
            pending: Mutex::new(None),
            options,
        }
    }

    pub fn container(&self) -> &StateContainer<SearchState, SearchEffect> {
        &self.container
    }

    pub fn state(&self) -> SearchState {
        self.container.state()
    }

    pub fn gate(&self) -> PrefetchGate {
        *self.gate.borrow()
    }

    /// Warm the cache in the background. The gate opens whatever the
    /// outcome.
    pub fn on_prefetch(&self) -> JoinHandle<()> {
        let fetch = self.fetch.clone();
        let gate = Arc::clone(&self.gate);
        let handle = self.container.handle();

        self.container.spawn(async move {
            match fetch.execute().await {
                Ok(non_empty) => info!(non_empty, "prefetch finished"),
                Err(e) => warn!(error = %e, "prefetch failed"),
            }
            gate.send_replace(PrefetchGate::Ready);
            handle.update_state(|s| s.is_prefetching = true);
        })
    }

    /// Record the query and schedule a search for it, superseding any
    /// search still waiting or running.
    pub fn on_search(&self, query: &str) {
        self.container
            .update_state(|s| s.current_text = query.to_owned());
        self.abort_pending();

        if !self.options.is_searchable(query) {
            self.container.update_state(|s| {
                s.results = None;
                s.is_loading = false;
            });
            return;
        }

        self.container.update_state(|s| s.is_loading = true);

        let search = self.search.clone();
        let handle = self.container.handle();
        let mut gate = self.gate.subscribe();
        let debounce = self.options.debounce;
        let query = query.to_owned();

        let task = self.container.spawn(async move {
            let opened = gate
                .wait_for(|g| *g == PrefetchGate::Ready)
                .await
                .map(|_| ());
            if opened.is_err() {
                return;
            }
            tokio::time::sleep(debounce).await;

            let mut results = std::pin::pin!(search.execute(query));
            while let Some(item) = results.next().await {
                match item {
                    Ok(cities) => handle.update_state(|s| {
                        s.results = Some(SearchMapper::map_list(&cities));
                        s.is_loading = false;
                    }),
                    Err(error) => report_error(&handle, error),
                }
            }
        });

        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(task);
        }
    }

    pub fn on_result_clicked(&self, result: &SearchResult) {
        self.container
            .send_effect(SearchEffect::NavigateNext(result.id));
    }

    /// Flip the favorite flag of `result` and patch the matching row.
    pub fn on_favorite_clicked(&self, result: &SearchResult) -> JoinHandle<()> {
        let add = self.add_favorite.clone();
        let remove = self.remove_favorite.clone();
        let handle = self.container.handle();
        let id = result.id;
        let make_favorite = !result.is_favorite;

        self.container.spawn(async move {
            let outcome = if make_favorite {
                add.execute(id).await
            } else {
                remove.execute(id).await
            };
            handle.update_state(|s| match outcome {
                Ok(()) => {
                    if let Some(row) = s.results.iter_mut().flatten().find(|r| r.id == id) {
                        row.is_favorite = make_favorite;
                    }
                }
                Err(error) => {
                    s.error = Some(SearchMapper::resolve_error(error));
                    s.is_loading = false;
                }
            });
        })
    }

    fn abort_pending(&self) {
        if let Some(task) = self.pending.lock().ok().and_then(|mut p| p.take()) {
            task.abort();
        }
    }
}

fn report_error(handle: &StateHandle<SearchState, SearchEffect>, error: CityError) {
    let message = SearchMapper::resolve_error(error);
    handle.send_effect(SearchEffect::ShowError(message.message.clone()));
    handle.update_state(|s| {
        s.error = Some(message);
        s.is_loading = false;
    });
}
