//! Verification record repository implementation
//!
//! One record per alumni. Code issuance and consumption for the same alumni
//! are serialized on the record row so a resend can never race a concurrent
//! verify.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::verification::VerificationRecord;
use crate::utils::errors::AluMapError;

const RECORD_COLUMNS: &str =
    "id, alumni_id, verification_code, code_expires_at, requested_at, manual_requested, verified_at";

/// Result of attempting to consume a verification code under the row lock
#[derive(Debug, Clone)]
pub enum CodeConsumeOutcome {
    Verified(VerificationRecord),
    Mismatch,
    Expired,
    NoRecord,
}

#[derive(Debug, Clone)]
pub struct VerificationRepository {
    pool: PgPool,
}

impl VerificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the verification record for an alumni
    pub async fn find_by_alumni_id(
        &self,
        alumni_id: Uuid,
    ) -> Result<Option<VerificationRecord>, AluMapError> {
        let record = sqlx::query_as::<_, VerificationRecord>(&format!(
            "SELECT {} FROM email_verifications WHERE alumni_id = $1",
            RECORD_COLUMNS
        ))
        .bind(alumni_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Issue a fresh code, creating the record or overwriting it in place.
    /// Resets `verified_at` and the cooldown clock.
    pub async fn upsert_code(
        &self,
        alumni_id: Uuid,
        code: &str,
        manual_requested: bool,
    ) -> Result<VerificationRecord, AluMapError> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(VerificationRecord::CODE_VALIDITY_HOURS);

        let record = sqlx::query_as::<_, VerificationRecord>(&format!(
            r#"
            INSERT INTO email_verifications (id, alumni_id, verification_code, code_expires_at, requested_at, manual_requested, verified_at)
            VALUES ($1, $2, $3, $4, $5, $6, NULL)
            ON CONFLICT (alumni_id) DO UPDATE
            SET verification_code = EXCLUDED.verification_code,
                code_expires_at = EXCLUDED.code_expires_at,
                requested_at = EXCLUDED.requested_at,
                manual_requested = EXCLUDED.manual_requested,
                verified_at = NULL
            RETURNING {}
            "#,
            RECORD_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(alumni_id)
        .bind(code)
        .bind(expires_at)
        .bind(now)
        .bind(manual_requested)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Mark the record as a manual-verification request. Returns false when
    /// no record exists.
    pub async fn set_manual_requested(&self, alumni_id: Uuid) -> Result<bool, AluMapError> {
        let result =
            sqlx::query("UPDATE email_verifications SET manual_requested = true WHERE alumni_id = $1")
                .bind(alumni_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Attempt to consume a verification code. Locks the record row for the
    /// duration of the check so a concurrent resend cannot slip between the
    /// comparison and the account flip, then marks both the record and the
    /// alumni account verified in the same transaction.
    pub async fn consume_code(
        &self,
        alumni_id: Uuid,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<CodeConsumeOutcome, AluMapError> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, VerificationRecord>(&format!(
            "SELECT {} FROM email_verifications WHERE alumni_id = $1 FOR UPDATE",
            RECORD_COLUMNS
        ))
        .bind(alumni_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(record) = record else {
            tx.rollback().await?;
            return Ok(CodeConsumeOutcome::NoRecord);
        };

        if record.verification_code != code {
            tx.rollback().await?;
            return Ok(CodeConsumeOutcome::Mismatch);
        }

        if record.is_code_expired(now) {
            tx.rollback().await?;
            return Ok(CodeConsumeOutcome::Expired);
        }

        let record = sqlx::query_as::<_, VerificationRecord>(&format!(
            "UPDATE email_verifications SET verified_at = $2 WHERE alumni_id = $1 RETURNING {}",
            RECORD_COLUMNS
        ))
        .bind(alumni_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE alumni SET is_verified = true WHERE id = $1")
            .bind(alumni_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(CodeConsumeOutcome::Verified(record))
    }

    /// Flip an account's verified flag and stamp or clear `verified_at`
    /// symmetrically, atomically across both tables. Tolerates a missing
    /// verification record (manually created accounts).
    pub async fn set_account_verification(
        &self,
        alumni_id: Uuid,
        verified: bool,
        now: DateTime<Utc>,
    ) -> Result<(), AluMapError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE alumni SET is_verified = $2 WHERE id = $1")
            .bind(alumni_id)
            .bind(verified)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE email_verifications SET verified_at = $2 WHERE alumni_id = $1")
            .bind(alumni_id)
            .bind(if verified { Some(now) } else { None })
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
