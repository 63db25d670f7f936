//! Allowed email repository implementation

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::utils::errors::AluMapError;

#[derive(Debug, Clone)]
pub struct AllowedEmailRepository {
    pool: PgPool,
}

impl AllowedEmailRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a hashed email is in the allow list
    pub async fn exists(&self, hashed_email: &str) -> Result<bool, AluMapError> {
        let found: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM allowed_emails WHERE hashed_email = $1")
                .bind(hashed_email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(found.is_some())
    }

    /// Insert a hashed email, skipping duplicates. Returns true when a new
    /// row was added.
    pub async fn insert_if_absent(&self, hashed_email: &str) -> Result<bool, AluMapError> {
        let result = sqlx::query(
            r#"
            INSERT INTO allowed_emails (id, hashed_email, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (hashed_email) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(hashed_email)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count allow-list entries
    pub async fn count(&self) -> Result<i64, AluMapError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM allowed_emails")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
