// ── City domain type ──

use serde::{Deserialize, Serialize};

/// Stable identifier assigned by the remote dataset.
pub type CityId = i64;

/// Geographic position. No range validation is performed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub country_code: String,
    pub coordinate: Coordinate,
    /// Computed from the favorite store when the city is read. Never
    /// persisted with the city list; a cached `City` always carries `false`.
    #[serde(default)]
    pub is_favorite: bool,
}

impl City {
    pub fn new(
        id: CityId,
        name: impl Into<String>,
        country_code: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            country_code: country_code.into(),
            coordinate,
            is_favorite: false,
        }
    }

    /// Copy of this city with the favorite flag set.
    pub fn with_favorite(&self, is_favorite: bool) -> Self {
        Self {
            is_favorite,
            ..self.clone()
        }
    }

    /// Case-insensitive substring match against the name only.
    pub fn name_contains(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }

    /// Ordering key: lowercase name, then lowercase country code.
    pub fn sort_key(&self) -> (String, String) {
        (self.name.to_lowercase(), self.country_code.to_lowercase())
    }
}
