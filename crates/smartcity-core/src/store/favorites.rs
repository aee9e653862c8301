// ── Favorite set storage ──
//
// `add_favorite`/`remove_favorite` are a read followed by a write with no
// lock held in between. Two concurrent calls can interleave and the last
// write wins on the persisted set.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Mutex;

use crate::error::CoreError;
use crate::model::CityId;

use super::preferences::Preferences;

/// Preference key holding the favorite ids as strings.
pub const FAVORITE_LIST_IDS: &str = "favoriteListIds";

/// Persistence for the set of favorited city ids.
///
/// Implementors provide `get`, `store` and `clear`; membership and the
/// incremental add/remove are derived from them.
pub trait FavoriteStore: Send + Sync {
    /// Current set; empty if nothing was ever stored.
    fn get(&self) -> impl Future<Output = Result<BTreeSet<CityId>, CoreError>> + Send;

    /// Replace the persisted set.
    fn store(&self, ids: &BTreeSet<CityId>) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Drop all persisted favorite state.
    fn clear(&self) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn contains(&self, id: CityId) -> impl Future<Output = Result<bool, CoreError>> + Send {
        async move { Ok(self.get().await?.contains(&id)) }
    }

    /// Insert `id` and persist. Returns `true` once the write completed,
    /// including when `id` was already present.
    fn add_favorite(&self, id: CityId) -> impl Future<Output = Result<bool, CoreError>> + Send {
        async move {
            let mut ids = self.get().await?;
            ids.insert(id);
            self.store(&ids).await?;
            Ok(true)
        }
    }

    /// Remove `id` and persist. Removing an absent id still returns `true`.
    fn remove_favorite(&self, id: CityId) -> impl Future<Output = Result<bool, CoreError>> + Send {
        async move {
            let mut ids = self.get().await?;
            ids.remove(&id);
            self.store(&ids).await?;
            Ok(true)
        }
    }
}

// ── Durable implementation ───────────────────────────────────────────

/// Favorites kept in a preferences file under [`FAVORITE_LIST_IDS`].
#[derive(Debug, Clone)]
pub struct PreferenceFavoriteStore {
    prefs: Preferences,
}

impl PreferenceFavoriteStore {
    pub fn new(prefs: Preferences) -> Self {
        Self { prefs }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }
}

impl FavoriteStore for PreferenceFavoriteStore {
    async fn get(&self) -> Result<BTreeSet<CityId>, CoreError> {
        let Some(raw) = self.prefs.get_string_set(FAVORITE_LIST_IDS).await? else {
            return Ok(BTreeSet::new());
        };
        raw.iter()
            .map(|s| {
                s.parse::<CityId>().map_err(|e| {
                    CoreError::storage(self.prefs.path(), format!("bad favorite id '{s}': {e}"))
                })
            })
            .collect()
    }

    async fn store(&self, ids: &BTreeSet<CityId>) -> Result<(), CoreError> {
        let encoded: BTreeSet<String> = ids.iter().map(ToString::to_string).collect();
        self.prefs.put_string_set(FAVORITE_LIST_IDS, &encoded).await
    }

    async fn clear(&self) -> Result<(), CoreError> {
        self.prefs.remove(FAVORITE_LIST_IDS).await
    }
}

// ── Process-local implementation ─────────────────────────────────────

/// Favorites held in memory only; lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryFavoriteStore {
    ids: Mutex<BTreeSet<CityId>>,
}

impl MemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeSet<CityId>>, CoreError> {
        self.ids
            .lock()
            .map_err(|_| CoreError::Internal("favorite set lock poisoned".into()))
    }
}

impl FavoriteStore for MemoryFavoriteStore {
    async fn get(&self) -> Result<BTreeSet<CityId>, CoreError> {
        Ok(self.lock()?.clone())
    }

    async fn store(&self, ids: &BTreeSet<CityId>) -> Result<(), CoreError> {
        *self.lock()? = ids.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<(), CoreError> {
        self.lock()?.clear();
        Ok(())
    }
}
