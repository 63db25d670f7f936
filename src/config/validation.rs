//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{AluMapError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_registration_config(&settings.registration)?;
    validate_notifier_config(&settings.notifier)?;
    validate_reminder_config(&settings.reminder)?;
    validate_logging_config(&settings.logging)?;
    Ok(())
}

fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(AluMapError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(AluMapError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(AluMapError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.token_secret.is_empty() {
        return Err(AluMapError::Config("Token secret is required".to_string()));
    }
    Ok(())
}

fn validate_registration_config(config: &super::RegistrationConfig) -> Result<()> {
    if config.email_domain.is_empty() {
        return Err(AluMapError::Config(
            "Registration email domain is required".to_string(),
        ));
    }

    if config.min_password_length < 8 {
        return Err(AluMapError::Config(
            "Minimum password length must be at least 8".to_string(),
        ));
    }

    if config.min_graduation_year >= config.max_graduation_year {
        return Err(AluMapError::Config(
            "Graduation year range is empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_notifier_config(config: &super::NotifierConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(AluMapError::Config(
            "Notification bot base URL is required".to_string(),
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(AluMapError::Config(
            "Notifier timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_reminder_config(config: &super::ReminderConfig) -> Result<()> {
    if config.lead_hours <= 0 || config.window_minutes <= 0 || config.interval_minutes == 0 {
        return Err(AluMapError::Config(
            "Reminder schedule values must be positive".to_string(),
        ));
    }
    Ok(())
}

fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(AluMapError::Config("Logging level is required".to_string()));
    }
    Ok(())
}
