// ── API-to-domain type conversions ──
//
// Bridges raw `smartcity_api` payloads into `smartcity_core::model`
// types. The favorite flag always starts out `false`; it is merged in by
// the repository at read time.

use smartcity_api::{CityPayload, CoordinatePayload};

use crate::model::{City, Coordinate};

impl From<CoordinatePayload> for Coordinate {
    fn from(c: CoordinatePayload) -> Self {
        Coordinate::new(c.lon, c.lat)
    }
}

impl From<CityPayload> for City {
    fn from(p: CityPayload) -> Self {
        City {
            id: p.id,
            name: p.name,
            country_code: p.country,
            coordinate: p.coordinate.into(),
            is_favorite: false,
        }
    }
}

/// Convert a whole fetched list.
pub(crate) fn cities_from_payloads(payloads: Vec<CityPayload>) -> Vec<City> {
    payloads.into_iter().map(City::from).collect()
}
