// ── Map screen state ──
//
// Loads one city by id and exposes it as a labelled pin. `map_loaded`
// flips on every successful load so a renderer can tell a new pin from a
// repeated one; the renderer sets it back with `on_map_loaded`.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::model::{City, CityId};
use crate::repository::CityRepository;
use crate::usecase::GetCity;

use super::search::ErrorMessage;
use super::state::StateContainer;

/// A city ready to be placed on a map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPin {
    pub id: CityId,
    /// `"<name>, <COUNTRY>"`.
    pub label: String,
    pub is_favorite: bool,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&City> for MapPin {
    fn from(city: &City) -> Self {
        Self {
            id: city.id,
            label: format!("{}, {}", city.name, city.country_code.to_uppercase()),
            is_favorite: city.is_favorite,
            latitude: city.coordinate.latitude,
            longitude: city.coordinate.longitude,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapsState {
    pub map_loaded: bool,
    /// Stable error kind name, e.g. `"CityNotFound"`.
    pub error: Option<ErrorMessage>,
    pub ui_object: Option<MapPin>,
}

/// The map screen has no one-shot effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapsEffect {}

pub struct MapsViewModel<R> {
    container: StateContainer<MapsState, MapsEffect>,
    get_city: GetCity<R>,
}

impl<R: CityRepository + 'static> MapsViewModel<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            container: StateContainer::new(MapsState::default()),
            get_city: GetCity::new(repository),
        }
    }

    pub fn container(&self) -> &StateContainer<MapsState, MapsEffect> {
        &self.container
    }

    pub fn state(&self) -> MapsState {
        self.container.state()
    }

    pub fn on_load_city(&self, id: CityId) -> JoinHandle<()> {
        self.container.update_state(|s| s.map_loaded = false);

        let get_city = self.get_city.clone();
        let handle = self.container.handle();
        self.container.spawn(async move {
            let outcome = get_city.execute(id).await;
            handle.update_state(|s| match outcome {
                Ok(city) => {
                    s.ui_object = Some(MapPin::from(&city));
                    s.map_loaded = !s.map_loaded;
                }
                Err(error) => {
                    s.error = Some(ErrorMessage {
                        message: error.name().to_owned(),
                    });
                }
            });
        })
    }

    pub fn on_map_loaded(&self) {
        self.container.update_state(|s| s.map_loaded = true);
    }
}
