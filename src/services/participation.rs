//! Participation workflow
//!
//! Joining and leaving approved events. The target defaults to the acting
//! alumni; naming someone else requires admin rights. Join notifications go
//! to the owner only when both sides carry a telegram alias.

use uuid::Uuid;

use crate::database::{AlumniRepository, EventRepository, ParticipantOutcome};
use crate::models::{Actor, Alumni, Event};
use crate::services::notification::NotificationService;
use crate::utils::errors::{AluMapError, Result};
use crate::utils::logging::log_event_action;

#[derive(Clone)]
pub struct ParticipationService {
    events: EventRepository,
    alumni: AlumniRepository,
    notifier: NotificationService,
}

impl ParticipationService {
    /// Create a new ParticipationService instance
    pub fn new(
        events: EventRepository,
        alumni: AlumniRepository,
        notifier: NotificationService,
    ) -> Self {
        Self {
            events,
            alumni,
            notifier,
        }
    }

    /// Add a participant to an event. `target` defaults to the actor;
    /// admins may name anyone.
    pub async fn add_participant(
        &self,
        actor: &Actor,
        event_id: Uuid,
        target: Option<Uuid>,
    ) -> Result<Event> {
        let (event, person) = self.resolve(actor, event_id, target).await?;

        match self.events.add_participant(event.id, person.id).await? {
            ParticipantOutcome::Applied(event) => {
                log_event_action(event.id, "join", person.id, None);
                self.notify_owner_of_join(&event, &person).await;
                Ok(event)
            }
            ParticipantOutcome::NoOp => Err(AluMapError::Conflict(
                "User is already a participant of this event".to_string(),
            )),
            ParticipantOutcome::EventNotFound => Err(AluMapError::not_found("Event")),
        }
    }

    /// Remove a participant from an event. Owners may leave their own event;
    /// the event itself stays.
    pub async fn remove_participant(
        &self,
        actor: &Actor,
        event_id: Uuid,
        target: Option<Uuid>,
    ) -> Result<Event> {
        let (event, person) = self.resolve(actor, event_id, target).await?;

        match self.events.remove_participant(event.id, person.id).await? {
            ParticipantOutcome::Applied(event) => {
                log_event_action(event.id, "leave", person.id, None);
                Ok(event)
            }
            ParticipantOutcome::NoOp => Err(AluMapError::Conflict(
                "User is not a participant of this event".to_string(),
            )),
            ParticipantOutcome::EventNotFound => Err(AluMapError::not_found("Event")),
        }
    }

    /// Load the event and the affected alumni, enforcing that only admins
    /// act on behalf of someone else
    async fn resolve(
        &self,
        actor: &Actor,
        event_id: Uuid,
        target: Option<Uuid>,
    ) -> Result<(Event, Alumni)> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AluMapError::not_found("Event"))?;

        let target_id = target.unwrap_or_else(|| actor.id());
        if !actor.may_act_on(target_id) {
            return Err(AluMapError::Forbidden(
                "You can only manage your own participation".to_string(),
            ));
        }

        let person = self
            .alumni
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AluMapError::not_found("User"))?;

        Ok((event, person))
    }

    async fn notify_owner_of_join(&self, event: &Event, joiner: &Alumni) {
        if joiner.id == event.owner_id {
            return;
        }

        let Some(joiner_alias) = &joiner.telegram_alias else {
            return;
        };

        match self.alumni.find_by_id(event.owner_id).await {
            Ok(Some(owner)) => {
                if let Some(owner_alias) = &owner.telegram_alias {
                    self.notifier
                        .notify_join_event(&event.title, owner_alias, joiner_alias)
                        .await;
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, event_id = %event.id, "Failed to load event owner for join notification");
            }
        }
    }
}
