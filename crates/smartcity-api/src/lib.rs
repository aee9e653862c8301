// smartcity-api: Async Rust client for the SmartCity city dataset endpoint

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{CityApiClient, DEFAULT_BASE_URL, DEFAULT_CITIES_PATH};
pub use error::Error;
pub use models::{CityPayload, CoordinatePayload};
pub use transport::{DEFAULT_TIMEOUT, TransportConfig};
