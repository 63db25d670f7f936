//! Event lifecycle workflow
//!
//! Creation picks the initial approval state from the global auto-approve
//! setting; approve/decline/unapprove are admin-only; update and delete are
//! owner-or-admin and notify participants of changes to approved events.
//!
//! Approve and decline are idempotent: applying the decision an event
//! already carries succeeds without touching the row. Unapprove always
//! resets to pending.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::database::{AlumniRepository, EventRepository};
use crate::models::{
    Actor, ApprovalStatus, CreateEventRequest, Event, EventChanges, TimeFilter, UpdateEventRequest,
};
use crate::services::event_settings::EventSettingsService;
use crate::services::notification::NotificationService;
use crate::utils::errors::{AluMapError, Result};
use crate::utils::helpers::format_event_datetime;
use crate::utils::logging::log_event_action;

#[derive(Clone)]
pub struct EventService {
    events: EventRepository,
    alumni: AlumniRepository,
    settings: EventSettingsService,
    notifier: NotificationService,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(
        events: EventRepository,
        alumni: AlumniRepository,
        settings: EventSettingsService,
        notifier: NotificationService,
    ) -> Self {
        Self {
            events,
            alumni,
            settings,
            notifier,
        }
    }

    /// Create a new event. The owner becomes the sole initial participant;
    /// the initial approval state follows the auto-approve policy.
    pub async fn create(&self, actor: &Actor, request: CreateEventRequest) -> Result<Event> {
        let owner = match actor {
            Actor::Admin(_) => {
                return Err(AluMapError::Forbidden("Admins cannot create events".to_string()))
            }
            Actor::Alumni(alumni) => alumni,
        };

        let settings = self.settings.current().await?;
        let approved = if settings.auto_approve { Some(true) } else { None };

        let event = self.events.create(owner.id, request, approved).await?;
        log_event_action(event.id, "create", owner.id, None);
        Ok(event)
    }

    /// Fetch a single event
    pub async fn get(&self, event_id: uuid::Uuid) -> Result<Event> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AluMapError::not_found("Event"))
    }

    /// Update an event. Owner or admin only. Changes to location, start
    /// time, cost or online flag on an approved event notify every
    /// participant and the owner who have a telegram alias.
    pub async fn update(
        &self,
        actor: &Actor,
        event_id: uuid::Uuid,
        request: UpdateEventRequest,
    ) -> Result<Event> {
        let event = self.get(event_id).await?;

        if !actor.may_manage_event(event.owner_id) {
            return Err(AluMapError::Forbidden(
                "You don't have permission to update this event".to_string(),
            ));
        }

        let changes = EventChanges::detect(&event, &request);
        let updated = self.events.update(event_id, request).await?;
        log_event_action(event_id, "update", actor.id(), None);

        if !changes.is_empty() && updated.approval() == ApprovalStatus::Approved {
            let description = changes.describe();
            for alumni_id in updated.notifiable_ids() {
                if let Some(person) = self.alumni.find_by_id(alumni_id).await? {
                    if let Some(alias) = &person.telegram_alias {
                        self.notifier
                            .notify_event_updated(&updated.title, alias, &description)
                            .await;
                    }
                }
            }
        }

        Ok(updated)
    }

    /// Delete an event. Owner or admin only. An approved event's
    /// participants and owner are told about the cancellation first; the row
    /// is removed regardless.
    pub async fn delete(&self, actor: &Actor, event_id: uuid::Uuid) -> Result<()> {
        let event = self.get(event_id).await?;

        if !actor.may_manage_event(event.owner_id) {
            return Err(AluMapError::Forbidden(
                "You don't have permission to delete this event".to_string(),
            ));
        }

        if event.approval() == ApprovalStatus::Approved {
            let when = format_event_datetime(event.starts_at);
            for alumni_id in event.notifiable_ids() {
                if let Some(person) = self.alumni.find_by_id(alumni_id).await? {
                    if let Some(alias) = &person.telegram_alias {
                        self.notifier
                            .notify_event_deleted(&event.title, alias, &when)
                            .await;
                    }
                }
            }
        }

        self.events.delete(event_id).await?;
        log_event_action(event_id, "delete", actor.id(), None);
        Ok(())
    }

    /// Approve an event. Admin only; a no-op when already approved.
    pub async fn approve(&self, actor: &Actor, event_id: uuid::Uuid) -> Result<Event> {
        self.decide(actor, event_id, ApprovalStatus::Approved).await
    }

    /// Decline an event. Admin only; a no-op when already declined.
    pub async fn decline(&self, actor: &Actor, event_id: uuid::Uuid) -> Result<Event> {
        self.decide(actor, event_id, ApprovalStatus::Declined).await
    }

    /// Reset an event to pending, regardless of its current state. Admin
    /// only.
    pub async fn unapprove(&self, actor: &Actor, event_id: uuid::Uuid) -> Result<Event> {
        require_admin(actor)?;
        let event = self.get(event_id).await?;
        let event = self.events.set_approval(event.id, None).await?;
        log_event_action(event_id, "unapprove", actor.id(), None);
        Ok(event)
    }

    async fn decide(
        &self,
        actor: &Actor,
        event_id: uuid::Uuid,
        target: ApprovalStatus,
    ) -> Result<Event> {
        require_admin(actor)?;

        let event = self.get(event_id).await?;
        if event.approval() == target {
            return Ok(event);
        }

        let event = self.events.set_approval(event.id, target.to_column()).await?;
        info!(event_id = %event_id, admin_id = %actor.id(), status = ?target, "Event decision applied");
        Ok(event)
    }

    /// Public listing: approved events, newest start time first
    pub async fn list_approved(&self) -> Result<Vec<Event>> {
        self.events.list_approved().await
    }

    /// Events the actor owns that have received a decision
    pub async fn list_owner_events(&self, actor: &Actor) -> Result<Vec<Event>> {
        self.events.list_owner_decided(actor.id()).await
    }

    /// Events the actor owns that still await a decision
    pub async fn list_owner_pending(&self, actor: &Actor) -> Result<Vec<Event>> {
        self.events.list_owner_pending(actor.id()).await
    }

    /// Approved events a given alumni participates in, optionally including
    /// the ones they created and filtered to past or upcoming
    pub async fn list_participant_events(
        &self,
        participant_id: uuid::Uuid,
        include_created: bool,
        time_filter: Option<TimeFilter>,
    ) -> Result<Vec<Event>> {
        self.events
            .list_participant_events(participant_id, include_created, time_filter, Utc::now())
            .await
    }

    /// Every event regardless of state. Admin dashboard listing.
    pub async fn list_all(&self, actor: &Actor) -> Result<Vec<Event>> {
        require_admin(actor)?;
        self.events.list_all().await
    }

    /// Approved events starting inside a window. Contract for the reminder
    /// sweep.
    pub async fn find_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        self.events.find_starting_between(from, to).await
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
