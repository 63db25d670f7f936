//! Alumni repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::alumni::{Alumni, CreateAlumniRecord};
use crate::utils::errors::AluMapError;

const ALUMNI_COLUMNS: &str = "id, email, hashed_password, first_name, last_name, graduation_year, telegram_alias, is_verified, is_banned, created_at";

#[derive(Debug, Clone)]
pub struct AlumniRepository {
    pool: PgPool,
}

impl AlumniRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new alumni account, unverified and not banned
    pub async fn create(&self, record: CreateAlumniRecord) -> Result<Alumni, AluMapError> {
        let alumni = sqlx::query_as::<_, Alumni>(
            r#"
            INSERT INTO alumni (id, email, hashed_password, first_name, last_name, graduation_year, telegram_alias, is_verified, is_banned, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, false, false, $8)
            RETURNING id, email, hashed_password, first_name, last_name, graduation_year, telegram_alias, is_verified, is_banned, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.email)
        .bind(record.hashed_password)
        .bind(record.first_name)
        .bind(record.last_name)
        .bind(record.graduation_year)
        .bind(record.telegram_alias)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(alumni)
    }

    /// Find alumni by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Alumni>, AluMapError> {
        let alumni = sqlx::query_as::<_, Alumni>(&format!(
            "SELECT {} FROM alumni WHERE id = $1",
            ALUMNI_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(alumni)
    }

    /// Find alumni by email, case-insensitively
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Alumni>, AluMapError> {
        let alumni = sqlx::query_as::<_, Alumni>(&format!(
            "SELECT {} FROM alumni WHERE LOWER(email) = LOWER($1)",
            ALUMNI_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(alumni)
    }

    /// Set a password and mark the account verified in one statement. Used
    /// by the graduate identity-proof path.
    pub async fn verify_with_password(
        &self,
        id: Uuid,
        hashed_password: &str,
    ) -> Result<Alumni, AluMapError> {
        let alumni = sqlx::query_as::<_, Alumni>(&format!(
            "UPDATE alumni SET hashed_password = $2, is_verified = true WHERE id = $1 RETURNING {}",
            ALUMNI_COLUMNS
        ))
        .bind(id)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await?;

        Ok(alumni)
    }

    /// Ban/unban alumni
    pub async fn set_ban_status(&self, id: Uuid, is_banned: bool) -> Result<Alumni, AluMapError> {
        let alumni = sqlx::query_as::<_, Alumni>(&format!(
            "UPDATE alumni SET is_banned = $2 WHERE id = $1 RETURNING {}",
            ALUMNI_COLUMNS
        ))
        .bind(id)
        .bind(is_banned)
        .fetch_one(&self.pool)
        .await?;

        Ok(alumni)
    }

    /// List all alumni with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Alumni>, AluMapError> {
        let alumni = sqlx::query_as::<_, Alumni>(&format!(
            "SELECT {} FROM alumni ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            ALUMNI_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(alumni)
    }

    /// Get banned alumni
    pub async fn list_banned(&self) -> Result<Vec<Alumni>, AluMapError> {
        let alumni = sqlx::query_as::<_, Alumni>(&format!(
            "SELECT {} FROM alumni WHERE is_banned = true ORDER BY created_at DESC",
            ALUMNI_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(alumni)
    }
}
