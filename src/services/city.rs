//! City lookup
//!
//! Coordinates resolution and prefix search over the city gazetteer. Both
//! lookups are case-insensitive; a blank search term returns nothing without
//! touching the database.

use tracing::debug;

use crate::database::CityRepository;
use crate::models::city::{City, Coordinates};
use crate::utils::errors::Result;

/// Result cap for a single search, matching the client page size
pub const MAX_SEARCH_RESULTS: i64 = 10;

#[derive(Debug, Clone)]
pub struct CityService {
    cities: CityRepository,
}

impl CityService {
    /// Create a new CityService instance
    pub fn new(cities: CityRepository) -> Self {
        Self { cities }
    }

    /// Coordinates for a city/country pair. None when the pair is unknown.
    pub async fn coordinates(&self, city: &str, country: &str) -> Result<Option<Coordinates>> {
        self.cities.find_coordinates(city.trim(), country.trim()).await
    }

    /// Cities whose name starts with the query, up to `limit` capped at
    /// [`MAX_SEARCH_RESULTS`]
    pub async fn search(&self, query: &str, limit: Option<i64>) -> Result<Vec<City>> {
        let term = query.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let limit = limit.unwrap_or(MAX_SEARCH_RESULTS).clamp(1, MAX_SEARCH_RESULTS);
        debug!(limit = limit, "City search");
        self.cities.search_by_prefix(term, limit).await
    }
}
