// ── Domain model ──

mod city;

pub use city::{City, CityId, Coordinate};
