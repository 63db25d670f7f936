//! Error handling for AluMap
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the AluMap backend
#[derive(Error, Debug)]
pub enum AluMapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Authentication failed: {0}")]
    Unauthenticated(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Please wait {seconds} seconds before requesting a new code")]
    RateLimited { seconds: i64 },

    #[error("Invalid verification code")]
    InvalidCode,

    #[error("Verification code has expired")]
    CodeExpired,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for AluMap operations
pub type Result<T> = std::result::Result<T, AluMapError>;

impl AluMapError {
    /// Shorthand for a not-found error on a named entity
    pub fn not_found(entity: &'static str) -> Self {
        AluMapError::NotFound { entity }
    }

    /// Check if the error should surface as a client fault rather than a
    /// server fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AluMapError::NotFound { .. }
                | AluMapError::Forbidden(_)
                | AluMapError::Conflict(_)
                | AluMapError::Unauthenticated(_)
                | AluMapError::Validation(_)
                | AluMapError::RateLimited { .. }
                | AluMapError::InvalidCode
                | AluMapError::CodeExpired
        )
    }

    /// Get error severity level for logging
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AluMapError::Database(_) => ErrorSeverity::Critical,
            AluMapError::Migration(_) => ErrorSeverity::Critical,
            AluMapError::Config(_) => ErrorSeverity::Critical,
            AluMapError::Internal(_) => ErrorSeverity::Error,
            AluMapError::Forbidden(_) => ErrorSeverity::Warning,
            AluMapError::Unauthenticated(_) => ErrorSeverity::Warning,
            AluMapError::RateLimited { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Info,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message_reports_whole_seconds() {
        let err = AluMapError::RateLimited { seconds: 42 };
        assert_eq!(
            err.to_string(),
            "Please wait 42 seconds before requesting a new code"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(AluMapError::InvalidCode.is_client_error());
        assert!(AluMapError::Conflict("already verified".into()).is_client_error());
        assert!(!AluMapError::Internal("boom".into()).is_client_error());
    }
}
