//! Email verification record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One-to-one with an alumni account. Re-issuing a code overwrites the record
/// in place; there is no history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VerificationRecord {
    pub id: Uuid,
    pub alumni_id: Uuid,
    pub verification_code: String,
    pub code_expires_at: DateTime<Utc>,
    /// Drives the resend cooldown
    pub requested_at: DateTime<Utc>,
    pub manual_requested: bool,
    pub verified_at: Option<DateTime<Utc>>,
}

impl VerificationRecord {
    pub const CODE_VALIDITY_HOURS: i64 = 1;
    pub const RESEND_COOLDOWN_SECONDS: i64 = 60;

    pub fn is_code_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.code_expires_at
    }

    /// Remaining cooldown before another code may be requested, in whole
    /// seconds. Zero means a resend is permitted.
    pub fn resend_wait_seconds(&self, now: DateTime<Utc>) -> i64 {
        let elapsed = now.signed_duration_since(self.requested_at).num_seconds();
        (Self::RESEND_COOLDOWN_SECONDS - elapsed).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(requested_at: DateTime<Utc>) -> VerificationRecord {
        VerificationRecord {
            id: Uuid::new_v4(),
            alumni_id: Uuid::new_v4(),
            verification_code: "123456".to_string(),
            code_expires_at: requested_at + Duration::hours(1),
            requested_at,
            manual_requested: false,
            verified_at: None,
        }
    }

    #[test]
    fn test_code_expiry_window() {
        let issued = Utc::now();
        let rec = record(issued);
        assert!(!rec.is_code_expired(issued + Duration::minutes(59)));
        assert!(rec.is_code_expired(issued + Duration::minutes(61)));
    }

    #[test]
    fn test_resend_wait_counts_down_in_whole_seconds() {
        let issued = Utc::now();
        let rec = record(issued);
        assert_eq!(rec.resend_wait_seconds(issued + Duration::seconds(18)), 42);
        assert_eq!(rec.resend_wait_seconds(issued + Duration::seconds(60)), 0);
        assert_eq!(rec.resend_wait_seconds(issued + Duration::seconds(300)), 0);
    }
}
