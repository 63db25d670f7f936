//! Services module
//!
//! This module contains business logic services

pub mod allow_list;
pub mod auth;
pub mod city;
pub mod email;
pub mod event;
pub mod event_settings;
pub mod moderation;
pub mod notification;
pub mod participation;
pub mod registration;
pub mod reminder;
pub mod verification;

// Re-export commonly used services
pub use allow_list::{AllowListService, ImportSummary};
pub use auth::{AuthService, TokenResponse};
pub use city::CityService;
pub use email::EmailService;
pub use event::EventService;
pub use event_settings::EventSettingsService;
pub use moderation::ModerationService;
pub use notification::NotificationService;
pub use participation::ParticipationService;
pub use registration::{RegistrationOutcome, RegistrationService};
pub use reminder::ReminderService;
pub use verification::{VerificationService, VerifyGraduateRequest};

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub registration_service: RegistrationService,
    pub verification_service: VerificationService,
    pub event_service: EventService,
    pub participation_service: ParticipationService,
    pub moderation_service: ModerationService,
    pub allow_list_service: AllowListService,
    pub event_settings_service: EventSettingsService,
    pub city_service: CityService,
    pub reminder_service: ReminderService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: Settings, database: DatabaseService) -> Result<Self> {
        let notification_service = NotificationService::new(&settings.notifier);
        let email_service = EmailService::new(&settings.mail)?;
        let allow_list_service = AllowListService::new(
            database.allowed_emails.clone(),
            settings.allow_list.hash_secret.clone(),
        );
        let event_settings_service = EventSettingsService::new(database.settings.clone());

        let auth_service = AuthService::new(
            database.alumni.clone(),
            database.admins.clone(),
            settings.auth.token_secret.clone(),
        );
        let registration_service = RegistrationService::new(
            database.alumni.clone(),
            database.admins.clone(),
            database.verifications.clone(),
            allow_list_service.clone(),
            email_service.clone(),
            notification_service.clone(),
            settings.registration.clone(),
        );
        let verification_service = VerificationService::new(
            database.alumni.clone(),
            database.admins.clone(),
            database.verifications.clone(),
            email_service.clone(),
            notification_service.clone(),
            settings.auth.token_secret.clone(),
        );
        let event_service = EventService::new(
            database.events.clone(),
            database.alumni.clone(),
            event_settings_service.clone(),
            notification_service.clone(),
        );
        let participation_service = ParticipationService::new(
            database.events.clone(),
            database.alumni.clone(),
            notification_service.clone(),
        );
        let moderation_service = ModerationService::new(database.alumni.clone());
        let city_service = CityService::new(database.cities.clone());
        let reminder_service = ReminderService::new(
            database.events,
            database.alumni,
            notification_service,
            settings.reminder.clone(),
        );

        Ok(Self {
            auth_service,
            registration_service,
            verification_service,
            event_service,
            participation_service,
            moderation_service,
            allow_list_service,
            event_settings_service,
            city_service,
            reminder_service,
        })
    }
}
