// ── In-memory city cache ──
//
// Holds the full fetched list as one immutable snapshot. Writers swap the
// whole snapshot; readers always see either the old list or the new one.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};

use crate::model::{City, CityId};

/// One stored city list and when it was stored.
#[derive(Debug)]
pub struct CitySnapshot {
    pub cities: Arc<Vec<City>>,
    pub stored_at: DateTime<Utc>,
}

/// Process-local cache of the full city list.
///
/// Distinguishes "never populated" (`get()` returns `None`) from
/// "populated but empty". `clear()` returns to the never-populated state.
/// The list and its refresh time live in one snapshot, swapped as a unit.
pub struct LocalCityStore {
    current: ArcSwapOption<CitySnapshot>,
}

impl LocalCityStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
        }
    }

    /// Replace the whole list and hand back the stored snapshot.
    pub fn store(&self, cities: Vec<City>) -> Arc<Vec<City>> {
        let cities = Arc::new(cities);
        self.current.store(Some(Arc::new(CitySnapshot {
            cities: Arc::clone(&cities),
            stored_at: Utc::now(),
        })));
        cities
    }

    /// Current list, or `None` if never populated (or cleared).
    pub fn get(&self) -> Option<Arc<Vec<City>>> {
        self.current
            .load_full()
            .map(|snap| Arc::clone(&snap.cities))
    }

    /// Linear scan of the current list.
    pub fn get_by_id(&self, id: CityId) -> Option<City> {
        let snap = self.current.load();
        (*snap).as_ref()?.cities.iter().find(|c| c.id == id).cloned()
    }

    pub fn clear(&self) {
        self.current.store(None);
    }

    pub fn is_populated(&self) -> bool {
        self.current.load().is_some()
    }

    /// When the current list was stored.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        (*self.current.load()).as_ref().map(|snap| snap.stored_at)
    }
}

impl Default for LocalCityStore {
    fn default() -> Self {
        Self::new()
    }
}
