//! Registration workflow
//!
//! Creates the unverified account, consults the allow-list gate and routes
//! the outcome: emailed code for recognized graduates, admin review for
//! everyone else. The routing itself stores no state beyond the
//! `manual_requested` flag on the verification record.

use tracing::info;

use crate::config::RegistrationConfig;
use crate::database::{AdminRepository, AlumniRepository, VerificationRepository};
use crate::models::alumni::{CreateAlumniRecord, RegisterAlumniRequest};
use crate::services::allow_list::AllowListService;
use crate::services::email::EmailService;
use crate::services::notification::NotificationService;
use crate::utils::errors::{AluMapError, Result};
use crate::utils::helpers::{
    is_valid_email, is_valid_telegram_alias, normalize_email, normalize_telegram_alias,
};
use crate::utils::security::{generate_verification_code, hash_password};

/// How the response should route the freshly registered user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Allow-listed, code emailed
    CodeSent { email: String },
    /// Allow-listed but manual review was requested
    PendingManual { email: String },
    /// Not on the allow-list; admins review regardless of the preference flag
    PendingManualUnrecognized { email: String },
}

impl RegistrationOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            RegistrationOutcome::CodeSent { .. } => {
                "Registration successful. Please check your email for verification code."
            }
            RegistrationOutcome::PendingManual { .. } => {
                "Registration successful. Your account is pending manual verification by an administrator."
            }
            RegistrationOutcome::PendingManualUnrecognized { .. } => {
                "Registration successful. Your email was not recognized as a graduate address; your account is pending manual verification."
            }
        }
    }
}

/// Validated, normalized registration input
#[derive(Debug, Clone)]
pub struct ValidatedRegistration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub graduation_year: i32,
    pub telegram_alias: Option<String>,
    pub manual_verification: bool,
}

/// Validate and normalize a registration request against the configured
/// constraints
pub fn validate_registration(
    request: &RegisterAlumniRequest,
    config: &RegistrationConfig,
) -> Result<ValidatedRegistration> {
    let email = normalize_email(&request.email);
    if !is_valid_email(&email) {
        return Err(AluMapError::Validation("Invalid email address".to_string()));
    }

    let domain = email.split('@').nth(1).unwrap_or_default();
    let suffix = config.email_domain.to_lowercase();
    if domain != suffix && !domain.ends_with(&format!(".{}", suffix)) {
        return Err(AluMapError::Validation(format!(
            "Email must belong to the {} domain",
            config.email_domain
        )));
    }

    if request.password.len() < config.min_password_length {
        return Err(AluMapError::Validation(format!(
            "Password must be at least {} characters long",
            config.min_password_length
        )));
    }

    let first_name = request.first_name.trim().to_string();
    let last_name = request.last_name.trim().to_string();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AluMapError::Validation("Name fields are required".to_string()));
    }

    if request.graduation_year < config.min_graduation_year
        || request.graduation_year > config.max_graduation_year
    {
        return Err(AluMapError::Validation("Graduation year is out of range".to_string()));
    }

    let telegram_alias = match request.telegram_alias.as_deref() {
        None => None,
        Some(raw) if raw.trim().is_empty() => None,
        Some(raw) => {
            let alias = normalize_telegram_alias(raw);
            if !is_valid_telegram_alias(&alias) {
                return Err(AluMapError::Validation(
                    "Telegram alias must be 3-32 letters, digits or underscores".to_string(),
                ));
            }
            Some(alias)
        }
    };

    Ok(ValidatedRegistration {
        email,
        password: request.password.clone(),
        first_name,
        last_name,
        graduation_year: request.graduation_year,
        telegram_alias,
        manual_verification: request.manual_verification,
    })
}

#[derive(Clone)]
pub struct RegistrationService {
    alumni: AlumniRepository,
    admins: AdminRepository,
    verifications: VerificationRepository,
    allow_list: AllowListService,
    email: EmailService,
    notifier: NotificationService,
    config: RegistrationConfig,
}

impl RegistrationService {
    /// Create a new RegistrationService instance
    pub fn new(
        alumni: AlumniRepository,
        admins: AdminRepository,
        verifications: VerificationRepository,
        allow_list: AllowListService,
        email: EmailService,
        notifier: NotificationService,
        config: RegistrationConfig,
    ) -> Self {
        Self {
            alumni,
            admins,
            verifications,
            allow_list,
            email,
            notifier,
            config,
        }
    }

    /// Register a new alumni account
    pub async fn register(&self, request: RegisterAlumniRequest) -> Result<RegistrationOutcome> {
        let input = validate_registration(&request, &self.config)?;

        if self.alumni.find_by_email(&input.email).await?.is_some() {
            return Err(AluMapError::Conflict("Email already registered".to_string()));
        }

        let hashed_password = hash_password(&input.password)?;
        let alumni = self
            .alumni
            .create(CreateAlumniRecord {
                email: input.email.clone(),
                hashed_password,
                first_name: input.first_name,
                last_name: input.last_name,
                graduation_year: input.graduation_year,
                telegram_alias: input.telegram_alias,
            })
            .await?;

        let allow_listed = self.allow_list.is_allowed(&alumni.email).await?;
        let effective_manual = input.manual_verification || !allow_listed;

        let code = generate_verification_code();
        let record = self
            .verifications
            .upsert_code(alumni.id, &code, effective_manual)
            .await?;

        info!(
            alumni_id = %alumni.id,
            allow_listed = allow_listed,
            manual = effective_manual,
            "Alumni registered"
        );

        if allow_listed && !input.manual_verification {
            // The only path where the code leaves the system
            self.email
                .send_verification_code(&alumni.email, &alumni.first_name, &record.verification_code)
                .await;
            return Ok(RegistrationOutcome::CodeSent { email: alumni.email });
        }

        let name = if allow_listed {
            alumni.full_name()
        } else {
            format!("{} (NOT A RECOGNIZED GRADUATE)", alumni.full_name())
        };
        self.notify_admins(&alumni.email, &name).await;

        if allow_listed {
            Ok(RegistrationOutcome::PendingManual { email: alumni.email })
        } else {
            Ok(RegistrationOutcome::PendingManualUnrecognized { email: alumni.email })
        }
    }

    /// Telegram broadcast plus an email to every admin account. Best-effort
    /// on both channels.
    async fn notify_admins(&self, user_email: &str, user_name: &str) {
        self.notifier
            .notify_admins_manual_verification(user_email, user_name)
            .await;

        match self.admins.list_all().await {
            Ok(admins) => {
                for admin in admins {
                    self.email
                        .send_manual_verification_alert(&admin.email, user_email, user_name)
                        .await;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to list admins for manual-verification fan-out");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config() -> RegistrationConfig {
        RegistrationConfig {
            email_domain: "inst.edu".to_string(),
            min_password_length: 8,
            min_graduation_year: 1990,
            max_graduation_year: 2100,
        }
    }

    fn request() -> RegisterAlumniRequest {
        RegisterAlumniRequest {
            email: "Ada.Graduate@inst.edu".to_string(),
            password: "long enough".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Graduate".to_string(),
            graduation_year: 2020,
            telegram_alias: Some("@ada_gram".to_string()),
            manual_verification: false,
        }
    }

    #[test]
    fn test_valid_request_is_normalized() {
        let input = validate_registration(&request(), &config()).unwrap();
        assert_eq!(input.email, "ada.graduate@inst.edu");
        assert_eq!(input.telegram_alias.as_deref(), Some("ada_gram"));
    }

    #[test]
    fn test_subdomain_of_configured_suffix_is_accepted() {
        let mut req = request();
        req.email = "ada@alumni.inst.edu".to_string();
        assert!(validate_registration(&req, &config()).is_ok());
    }

    #[test]
    fn test_foreign_domain_rejected() {
        let mut req = request();
        req.email = "ada@example.com".to_string();
        assert_matches!(
            validate_registration(&req, &config()),
            Err(AluMapError::Validation(_))
        );
    }

    #[test]
    fn test_short_password_rejected() {
        let mut req = request();
        req.password = "short".to_string();
        assert_matches!(
            validate_registration(&req, &config()),
            Err(AluMapError::Validation(_))
        );
    }

    #[test]
    fn test_bad_alias_rejected_but_empty_alias_dropped() {
        let mut req = request();
        req.telegram_alias = Some("has spaces".to_string());
        assert!(validate_registration(&req, &config()).is_err());

        req.telegram_alias = Some("  ".to_string());
        let input = validate_registration(&req, &config()).unwrap();
        assert_eq!(input.telegram_alias, None);
    }

    #[test]
    fn test_graduation_year_bounds() {
        let mut req = request();
        req.graduation_year = 1889;
        assert!(validate_registration(&req, &config()).is_err());
    }

    #[test]
    fn test_outcome_messages_route_the_user() {
        let email = "a@inst.edu".to_string();
        assert!(RegistrationOutcome::CodeSent { email: email.clone() }
            .message()
            .contains("check your email"));
        assert!(RegistrationOutcome::PendingManual { email: email.clone() }
            .message()
            .contains("manual verification"));
        assert!(RegistrationOutcome::PendingManualUnrecognized { email }
            .message()
            .contains("not recognized"));
    }
}
