//! Event reminder sweep
//!
//! Periodically finds approved events starting about `lead_hours` from now
//! and pings every aliased participant and the owner. The window is wider
//! than the sweep interval on both sides so a slow tick cannot skip an
//! event.

use chrono::{Duration, Utc};
use futures::future::join_all;
use tracing::{error, info};

use crate::config::ReminderConfig;
use crate::database::{AlumniRepository, EventRepository};
use crate::models::Event;
use crate::services::notification::NotificationService;
use crate::utils::errors::Result;
use crate::utils::helpers::format_event_datetime;

#[derive(Clone)]
pub struct ReminderService {
    events: EventRepository,
    alumni: AlumniRepository,
    notifier: NotificationService,
    config: ReminderConfig,
}

impl ReminderService {
    /// Create a new ReminderService instance
    pub fn new(
        events: EventRepository,
        alumni: AlumniRepository,
        notifier: NotificationService,
        config: ReminderConfig,
    ) -> Self {
        Self {
            events,
            alumni,
            notifier,
            config,
        }
    }

    /// One sweep: remind about approved events whose start falls inside the
    /// window centered `lead_hours` ahead. Returns how many events were
    /// processed.
    pub async fn send_due_reminders(&self) -> Result<usize> {
        let center = Utc::now() + Duration::hours(self.config.lead_hours);
        let from = center - Duration::minutes(self.config.window_minutes);
        let to = center + Duration::minutes(self.config.window_minutes);

        let events = self.events.find_starting_between(from, to).await?;
        if events.is_empty() {
            return Ok(0);
        }

        info!(count = events.len(), "Sending event reminders");
        join_all(events.iter().map(|event| self.remind_event(event))).await;

        Ok(events.len())
    }

    async fn remind_event(&self, event: &Event) {
        let when = format_event_datetime(event.starts_at);
        let location = if event.is_online { "online" } else { event.location.as_str() };

        for alumni_id in event.notifiable_ids() {
            match self.alumni.find_by_id(alumni_id).await {
                Ok(Some(person)) => {
                    if let Some(alias) = &person.telegram_alias {
                        self.notifier
                            .notify_event_reminder(&event.title, alias, &when, location)
                            .await;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    error!(error = %e, event_id = %event.id, alumni_id = %alumni_id, "Failed to load participant for reminder");
                }
            }
        }
    }

    pub fn interval_minutes(&self) -> u64 {
        self.config.interval_minutes
    }
}
