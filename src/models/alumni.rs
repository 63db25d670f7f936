//! Alumni model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alumni {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub first_name: String,
    pub last_name: String,
    pub graduation_year: i32,
    pub telegram_alias: Option<String>,
    pub is_verified: bool,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
}

impl Alumni {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAlumniRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub graduation_year: i32,
    pub telegram_alias: Option<String>,
    pub manual_verification: bool,
}

/// Row-creation payload, built by the registration workflow after validation
#[derive(Debug, Clone)]
pub struct CreateAlumniRecord {
    pub email: String,
    pub hashed_password: String,
    pub first_name: String,
    pub last_name: String,
    pub graduation_year: i32,
    pub telegram_alias: Option<String>,
}
