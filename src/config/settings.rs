//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub registration: RegistrationConfig,
    pub allow_list: AllowListConfig,
    pub mail: MailConfig,
    pub notifier: NotifierConfig,
    pub reminder: ReminderConfig,
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Bearer token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub token_secret: String,
}

/// Registration input constraints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistrationConfig {
    /// Required institutional email domain suffix, e.g. "inst.edu"
    pub email_domain: String,
    pub min_password_length: usize,
    pub min_graduation_year: i32,
    pub max_graduation_year: i32,
}

/// Allow-list hashing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AllowListConfig {
    /// HMAC key for hashed allowed emails. When absent, every email is
    /// treated as not allow-listed.
    pub hash_secret: Option<String>,
}

/// Outbound SMTP configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub from_name: String,
}

/// Telegram notification bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Event reminder sweep configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReminderConfig {
    /// How far ahead of the event start reminders go out
    pub lead_hours: i64,
    /// Half-width of the sweep window in minutes
    pub window_minutes: i64,
    /// How often the sweep runs
    pub interval_minutes: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("ALUMAP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::AluMapError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/alumap".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            auth: AuthConfig {
                token_secret: String::new(),
            },
            registration: RegistrationConfig {
                email_domain: "inst.edu".to_string(),
                min_password_length: 8,
                min_graduation_year: 1990,
                max_graduation_year: 2100,
            },
            allow_list: AllowListConfig { hash_secret: None },
            mail: MailConfig {
                smtp_host: "smtp.gmail.com".to_string(),
                smtp_port: 587,
                username: String::new(),
                password: String::new(),
                from_address: "noreply@inst.edu".to_string(),
                from_name: "AluMap".to_string(),
            },
            notifier: NotifierConfig {
                base_url: "https://alumap-notification-bot.netlify.app/.netlify/functions"
                    .to_string(),
                timeout_seconds: 5,
            },
            reminder: ReminderConfig {
                lead_hours: 12,
                window_minutes: 30,
                interval_minutes: 60,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
            },
        }
    }
}
