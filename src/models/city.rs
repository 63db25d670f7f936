//! City gazetteer model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One gazetteer entry, identified by the (city, country) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct City {
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}

/// Latitude/longitude pair for a resolved city
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}
