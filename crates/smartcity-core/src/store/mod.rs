// ── Local stores ──
//
// The volatile city cache and the durable favorite set. The repository
// composes both with the remote source.

mod favorites;
mod local;
mod preferences;

pub use favorites::{FAVORITE_LIST_IDS, FavoriteStore, MemoryFavoriteStore, PreferenceFavoriteStore};
pub use local::{CitySnapshot, LocalCityStore};
pub use preferences::Preferences;
