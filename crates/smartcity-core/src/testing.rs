// Shared fixtures for unit tests across the crate.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use smartcity_api::{CityPayload, CoordinatePayload};

use crate::config::RepositoryOptions;
use crate::error::CoreError;
use crate::repository::{CachedCityRepository, CitySource};
use crate::store::{LocalCityStore, MemoryFavoriteStore};

pub(crate) fn payload(id: i64, name: &str, country: &str, lon: f64, lat: f64) -> CityPayload {
    CityPayload {
        id,
        name: name.into(),
        country: country.into(),
        coordinate: CoordinatePayload { lon, lat },
    }
}

/// New York (US), Cordoba (AR), Denver (US).
pub(crate) fn sample_payloads() -> Vec<CityPayload> {
    vec![
        payload(1, "New York", "US", -74.0060, 40.7128),
        payload(2, "Cordoba", "AR", -64.1888, -31.4201),
        payload(3, "Denver", "US", -104.9903, 39.7392),
    ]
}

/// Scripted remote source that counts how often it is hit.
pub(crate) struct FakeSource {
    calls: AtomicUsize,
    response: Mutex<Result<Vec<CityPayload>, String>>,
    delay: Duration,
}

impl FakeSource {
    pub(crate) fn with(payloads: Vec<CityPayload>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response: Mutex::new(Ok(payloads)),
            delay: Duration::ZERO,
        }
    }

    /// Every fetch fails as an unreachable host.
    pub(crate) fn unreachable() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response: Mutex::new(Err("connection refused".into())),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn respond_with(&self, payloads: Vec<CityPayload>) {
        *self.response.lock().unwrap() = Ok(payloads);
    }

    pub(crate) fn fail(&self) {
        *self.response.lock().unwrap() = Err("connection refused".into());
    }
}

impl CitySource for FakeSource {
    async fn fetch_cities(&self) -> Result<Vec<CityPayload>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let response = self.response.lock().unwrap().clone();
        response.map_err(|reason| CoreError::ConnectionFailed {
            url: "http://fake.invalid/cities.json".into(),
            reason,
        })
    }
}

pub(crate) type FakeRepository = CachedCityRepository<Arc<FakeSource>, MemoryFavoriteStore>;

/// Repository over a shared fake so tests can keep counting calls.
pub(crate) fn repository(source: &Arc<FakeSource>) -> Arc<FakeRepository> {
    repository_with(source, RepositoryOptions::default())
}

pub(crate) fn repository_with(
    source: &Arc<FakeSource>,
    options: RepositoryOptions,
) -> Arc<FakeRepository> {
    Arc::new(CachedCityRepository::with_options(
        Arc::clone(source),
        LocalCityStore::new(),
        MemoryFavoriteStore::new(),
        options,
    ))
}
