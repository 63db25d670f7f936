//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the AluMap application.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// Returns the appender guard; dropping it stops the background writer, so
/// the caller must keep it alive for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "alumap.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log verification lifecycle transitions with structured data
pub fn log_verification_action(email: &str, action: &str, details: Option<&str>) {
    info!(
        email = email,
        action = action,
        details = details,
        "Verification action performed"
    );
}

/// Log event management actions
pub fn log_event_action(event_id: uuid::Uuid, action: &str, actor_id: uuid::Uuid, details: Option<&str>) {
    info!(
        event_id = %event_id,
        action = action,
        actor_id = %actor_id,
        details = details,
        "Event action performed"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: uuid::Uuid, action: &str, target: Option<&str>) {
    warn!(
        admin_id = %admin_id,
        action = action,
        target = target,
        "Admin action performed"
    );
}
