// ── View state containers ──
//
// Framework-free state holders for the search and map screens. A front
// end subscribes to the state `watch` and drains the effect queue.

mod maps;
mod search;
mod state;

pub use maps::{MapPin, MapsEffect, MapsState, MapsViewModel};
pub use search::{
    ErrorMessage, PrefetchGate, SearchEffect, SearchMapper, SearchResult, SearchState,
    SearchViewModel,
};
pub use state::{EFFECT_CAPACITY, StateContainer, StateHandle};
