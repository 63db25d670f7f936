//! AluMap alumni network backend
//!
//! Main application entry point

use std::time::Duration;

use tracing::{error, info};

use AluMap::{
    config::Settings,
    database::{connection, DatabaseService},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}", AluMap::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool_config = connection::PoolConfig::from_settings(&settings.database);
    let pool = connection::create_pool(&pool_config).await?;

    connection::run_migrations(&pool).await?;

    let database = DatabaseService::new(pool);
    let services = ServiceFactory::new(settings, database)?;

    info!("Services initialized, starting reminder sweep");

    let reminder = services.reminder_service.clone();
    let mut ticker =
        tokio::time::interval(Duration::from_secs(reminder.interval_minutes() * 60));

    loop {
        ticker.tick().await;
        match reminder.send_due_reminders().await {
            Ok(0) => {}
            Ok(count) => info!(count = count, "Reminder sweep completed"),
            Err(e) => error!(severity = %e.severity(), error = %e, "Reminder sweep failed"),
        }
    }
}
