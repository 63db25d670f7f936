//! Admin repository implementation

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::admin::Admin;
use crate::utils::errors::AluMapError;

#[derive(Debug, Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new admin account
    pub async fn create(&self, email: &str, hashed_password: &str) -> Result<Admin, AluMapError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (id, email, hashed_password, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, hashed_password, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }

    /// Find admin by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, AluMapError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, email, hashed_password, created_at FROM admins WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    /// Find admin by email, case-insensitively
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, AluMapError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, email, hashed_password, created_at FROM admins WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    /// List every admin account. Used for manual-verification fan-out.
    pub async fn list_all(&self) -> Result<Vec<Admin>, AluMapError> {
        let admins = sqlx::query_as::<_, Admin>(
            "SELECT id, email, hashed_password, created_at FROM admins ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(admins)
    }
}
