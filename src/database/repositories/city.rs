//! City repository implementation

use sqlx::PgPool;

use crate::models::city::{City, Coordinates};
use crate::utils::errors::AluMapError;

#[derive(Debug, Clone)]
pub struct CityRepository {
    pool: PgPool,
}

impl CityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a city/country pair to coordinates, case-insensitively
    pub async fn find_coordinates(
        &self,
        city: &str,
        country: &str,
    ) -> Result<Option<Coordinates>, AluMapError> {
        let row: Option<(f64, f64)> = sqlx::query_as(
            "SELECT lat, lng FROM cities WHERE LOWER(city) = LOWER($1) AND LOWER(country) = LOWER($2)",
        )
        .bind(city)
        .bind(country)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(lat, lng)| Coordinates { lat, lng }))
    }

    /// Prefix search over city names, case-insensitively
    pub async fn search_by_prefix(
        &self,
        prefix: &str,
        limit: i64,
    ) -> Result<Vec<City>, AluMapError> {
        let cities = sqlx::query_as::<_, City>(
            r#"
            SELECT city, country, lat, lng FROM cities
            WHERE LOWER(city) LIKE LOWER($1) || '%'
            ORDER BY city
            LIMIT $2
            "#,
        )
        .bind(prefix)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(cities)
    }

    /// Add a gazetteer entry, skipping an existing (city, country) pair.
    /// Used by the dataset import.
    pub async fn insert_if_absent(&self, entry: &City) -> Result<bool, AluMapError> {
        let result = sqlx::query(
            r#"
            INSERT INTO cities (city, country, lat, lng)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (city, country) DO NOTHING
            "#,
        )
        .bind(&entry.city)
        .bind(&entry.country)
        .bind(entry.lat)
        .bind(entry.lng)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
