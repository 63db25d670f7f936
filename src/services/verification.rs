//! Verification workflow
//!
//! The account lifecycle is Unverified -> Verified, with an admin-only reset
//! back to Unverified to support moderation reversal. Code issuance and
//! consumption for one alumni are serialized on the verification record row.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::database::{
    AdminRepository, AlumniRepository, CodeConsumeOutcome, VerificationRepository,
};
use crate::models::Actor;
use crate::services::auth::TokenResponse;
use crate::services::email::EmailService;
use crate::services::notification::NotificationService;
use crate::utils::errors::{AluMapError, Result};
use crate::utils::logging::log_verification_action;
use crate::utils::security::{create_access_token, generate_verification_code, hash_password};

/// Graduate identity-proof request: year plus first name in place of the
/// emailed code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyGraduateRequest {
    pub email: String,
    pub password: String,
    pub graduation_year: i32,
    pub first_name: String,
}

#[derive(Clone)]
pub struct VerificationService {
    alumni: AlumniRepository,
    admins: AdminRepository,
    verifications: VerificationRepository,
    email: EmailService,
    notifier: NotificationService,
    token_secret: String,
}

impl VerificationService {
    /// Create a new VerificationService instance
    pub fn new(
        alumni: AlumniRepository,
        admins: AdminRepository,
        verifications: VerificationRepository,
        email: EmailService,
        notifier: NotificationService,
        token_secret: String,
    ) -> Self {
        Self {
            alumni,
            admins,
            verifications,
            email,
            notifier,
            token_secret,
        }
    }

    /// Verify an account with the emailed 6-digit code and return a bearer
    /// token
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<TokenResponse> {
        let alumni = self
            .alumni
            .find_by_email(email)
            .await?
            .ok_or_else(|| AluMapError::not_found("User"))?;

        if alumni.is_verified {
            return Err(AluMapError::Conflict("User already verified".to_string()));
        }

        match self
            .verifications
            .consume_code(alumni.id, code, Utc::now())
            .await?
        {
            CodeConsumeOutcome::NoRecord => Err(AluMapError::not_found("Verification record")),
            CodeConsumeOutcome::Mismatch => Err(AluMapError::InvalidCode),
            CodeConsumeOutcome::Expired => Err(AluMapError::CodeExpired),
            CodeConsumeOutcome::Verified(_) => {
                log_verification_action(&alumni.email, "verify_code", None);
                self.email
                    .send_verification_success(&alumni.email, &alumni.first_name)
                    .await;
                let token =
                    create_access_token(&self.token_secret, &alumni.email, alumni.id, "alumni")?;
                Ok(TokenResponse::bearer(token))
            }
        }
    }

    /// Re-issue a verification code. Rate limited to one request per minute
    /// per account.
    pub async fn resend_code(&self, email: &str) -> Result<()> {
        let alumni = self
            .alumni
            .find_by_email(email)
            .await?
            .ok_or_else(|| AluMapError::not_found("User"))?;

        if alumni.is_verified {
            return Err(AluMapError::Conflict("User already verified".to_string()));
        }

        if let Some(record) = self.verifications.find_by_alumni_id(alumni.id).await? {
            let wait = record.resend_wait_seconds(Utc::now());
            if wait > 0 {
                return Err(AluMapError::RateLimited { seconds: wait });
            }
        }

        let code = generate_verification_code();
        let record = self
            .verifications
            .upsert_code(alumni.id, &code, false)
            .await?;

        log_verification_action(&alumni.email, "resend_code", None);
        self.email
            .send_verification_code(&alumni.email, &alumni.first_name, &record.verification_code)
            .await;

        Ok(())
    }

    /// Switch an already-registered account to the manual review path.
    /// Repeated calls re-notify the admins.
    pub async fn request_manual_verification(&self, email: &str) -> Result<()> {
        let alumni = self
            .alumni
            .find_by_email(email)
            .await?
            .ok_or_else(|| AluMapError::not_found("User"))?;

        if alumni.is_verified {
            return Err(AluMapError::Conflict("User is already verified".to_string()));
        }

        if !self.verifications.set_manual_requested(alumni.id).await? {
            return Err(AluMapError::not_found("Verification record"));
        }

        log_verification_action(&alumni.email, "request_manual_verification", None);

        let name = format!(
            "{} (REQUESTED MANUAL VERIFICATION - no email access)",
            alumni.full_name()
        );
        self.notifier
            .notify_admins_manual_verification(&alumni.email, &name)
            .await;
        match self.admins.list_all().await {
            Ok(admins) => {
                for admin in admins {
                    self.email
                        .send_manual_verification_alert(&admin.email, &alumni.email, &name)
                        .await;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to list admins for manual-verification fan-out");
            }
        }

        Ok(())
    }

    /// Admin manual verification of an account
    pub async fn admin_verify(&self, actor: &Actor, email: &str) -> Result<()> {
        require_admin(actor, "You are not authorized to verify users")?;

        let alumni = self
            .alumni
            .find_by_email(email)
            .await?
            .ok_or_else(|| AluMapError::not_found("User"))?;

        if alumni.is_verified {
            return Err(AluMapError::Conflict("User already verified".to_string()));
        }

        self.verifications
            .set_account_verification(alumni.id, true, Utc::now())
            .await?;

        info!(admin_id = %actor.id(), alumni_id = %alumni.id, "Account manually verified");
        self.email
            .send_verification_success(&alumni.email, &alumni.first_name)
            .await;

        Ok(())
    }

    /// Admin reset of a verified account back to unverified
    pub async fn admin_unverify(&self, actor: &Actor, email: &str) -> Result<()> {
        require_admin(actor, "You are not authorized to unverify users")?;

        let alumni = self
            .alumni
            .find_by_email(email)
            .await?
            .ok_or_else(|| AluMapError::not_found("User"))?;

        if !alumni.is_verified {
            return Err(AluMapError::Conflict("User is not verified".to_string()));
        }

        self.verifications
            .set_account_verification(alumni.id, false, Utc::now())
            .await?;

        info!(admin_id = %actor.id(), alumni_id = %alumni.id, "Account verification reset");
        Ok(())
    }

    /// Graduate identity-proof path: match year and first name, set the
    /// password and verify in one step, bypassing the code entirely.
    pub async fn verify_graduate(&self, request: VerifyGraduateRequest) -> Result<TokenResponse> {
        let alumni = self
            .alumni
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AluMapError::not_found("User"))?;

        if alumni.is_verified {
            return Err(AluMapError::Conflict("User already verified".to_string()));
        }

        if alumni.graduation_year != request.graduation_year
            || alumni.first_name.to_lowercase() != request.first_name.trim().to_lowercase()
        {
            return Err(AluMapError::Validation(
                "Invalid verification information".to_string(),
            ));
        }

        let hashed = hash_password(&request.password)?;
        let alumni = self.alumni.verify_with_password(alumni.id, &hashed).await?;

        log_verification_action(&alumni.email, "verify_graduate", None);
        let token = create_access_token(&self.token_secret, &alumni.email, alumni.id, "alumni")?;
        Ok(TokenResponse::bearer(token))
    }
}

fn require_admin(actor: &Actor, message: &str) -> Result<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AluMapError::Forbidden(message.to_string()))
    }
}
