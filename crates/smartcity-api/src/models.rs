// Wire types for the city dataset.
//
// Field names follow the published JSON file, not Rust conventions;
// serde renames bridge the two. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// One record of the city dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityPayload {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    /// Two-letter country code as published (not normalized).
    pub country: String,
    #[serde(rename = "coord")]
    pub coordinate: CoordinatePayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinatePayload {
    pub lon: f64,
    pub lat: f64,
}
