//! Settings repository implementation
//!
//! Generic key to JSONB value storage. The event-settings service layers the
//! lazy-default semantics on top.

use sqlx::PgPool;

use crate::utils::errors::AluMapError;

#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the value stored under a key
    pub async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, AluMapError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT value FROM settings WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Insert or replace the value under a key
    pub async fn upsert(&self, key: &str, value: &serde_json::Value) -> Result<(), AluMapError> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a default value only when the key is absent. Returns the stored
    /// value either way.
    pub async fn get_or_insert(
        &self,
        key: &str,
        default: &serde_json::Value,
    ) -> Result<serde_json::Value, AluMapError> {
        let row: (serde_json::Value,) = sqlx::query_as(
            r#"
            INSERT INTO settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = settings.value
            RETURNING value
            "#,
        )
        .bind(key)
        .bind(default)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }
}
