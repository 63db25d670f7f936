//! Event settings service
//!
//! Owns the `event_settings` singleton controlling the auto-approve policy.
//! The lazy default (`auto_approve = true`) is explicit here rather than an
//! implicit side effect of querying.

use tracing::info;

use crate::database::SettingsRepository;
use crate::models::{Actor, EventSettings, EVENT_SETTINGS_KEY};
use crate::utils::errors::{AluMapError, Result};

#[derive(Debug, Clone)]
pub struct EventSettingsService {
    repository: SettingsRepository,
}

impl EventSettingsService {
    /// Create a new EventSettingsService instance
    pub fn new(repository: SettingsRepository) -> Self {
        Self { repository }
    }

    /// Current settings, inserting the default row when absent
    pub async fn current(&self) -> Result<EventSettings> {
        let default = serde_json::to_value(EventSettings::default())?;
        let value = self
            .repository
            .get_or_insert(EVENT_SETTINGS_KEY, &default)
            .await?;
        let settings = serde_json::from_value(value)?;
        Ok(settings)
    }

    /// Admin read of the current settings
    pub async fn get(&self, actor: &Actor) -> Result<EventSettings> {
        require_admin(actor)?;
        self.current().await
    }

    /// Admin toggle of the auto-approve flag. Returns the new value.
    pub async fn toggle_auto_approve(&self, actor: &Actor) -> Result<EventSettings> {
        require_admin(actor)?;

        let current = self.current().await?;
        let updated = EventSettings {
            auto_approve: !current.auto_approve,
        };
        self.repository
            .upsert(EVENT_SETTINGS_KEY, &serde_json::to_value(updated)?)
            .await?;

        info!(auto_approve = updated.auto_approve, "Auto-approve setting toggled");
        Ok(updated)
    }
}

fn require_admin(actor: &Actor) -> Result<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AluMapError::Forbidden(
            "You are not authorized to access this resource".to_string(),
        ))
    }
}
