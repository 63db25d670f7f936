//! Event repository implementation
//!
//! Participant-set mutation is a read-modify-write under a row lock: the new
//! set is built explicitly and written whole, so concurrent join/leave on the
//! same event cannot drop an update.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::event::{CreateEventRequest, Event, TimeFilter, UpdateEventRequest};
use crate::utils::errors::AluMapError;

const EVENT_COLUMNS: &str =
    "id, owner_id, participant_ids, title, description, location, starts_at, cost, is_online, cover, approved";

/// Outcome of a participant-set mutation
#[derive(Debug, Clone)]
pub enum ParticipantOutcome {
    Applied(Event),
    /// Add: target already in the set. Remove: target not in the set.
    NoOp,
    EventNotFound,
}

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event. The owner is the sole initial participant.
    pub async fn create(
        &self,
        owner_id: Uuid,
        request: CreateEventRequest,
        approved: Option<bool>,
    ) -> Result<Event, AluMapError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (id, owner_id, participant_ids, title, description, location, starts_at, cost, is_online, cover, approved)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(vec![owner_id])
        .bind(request.title)
        .bind(request.description)
        .bind(request.location)
        .bind(request.starts_at)
        .bind(request.cost)
        .bind(request.is_online)
        .bind(request.cover)
        .bind(approved)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, AluMapError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE id = $1",
            EVENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Partial-field update. The cover is double-optional so an explicit
    /// null clears it back to no image.
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateEventRequest,
    ) -> Result<Event, AluMapError> {
        let cover_set = request.cover.is_some();
        let cover = request.cover.flatten();

        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                starts_at = COALESCE($5, starts_at),
                cost = COALESCE($6, cost),
                is_online = COALESCE($7, is_online),
                cover = CASE WHEN $9 THEN $8 ELSE cover END
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.location)
        .bind(request.starts_at)
        .bind(request.cost)
        .bind(request.is_online)
        .bind(cover)
        .bind(cover_set)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event
    pub async fn delete(&self, id: Uuid) -> Result<(), AluMapError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Set the tri-state approval column
    pub async fn set_approval(
        &self,
        id: Uuid,
        approved: Option<bool>,
    ) -> Result<Event, AluMapError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET approved = $2 WHERE id = $1 RETURNING {}",
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(approved)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Append a participant. Locks the event row, rebuilds the set and writes
    /// it whole.
    pub async fn add_participant(
        &self,
        event_id: Uuid,
        participant_id: Uuid,
    ) -> Result<ParticipantOutcome, AluMapError> {
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE id = $1 FOR UPDATE",
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(event) = event else {
            tx.rollback().await?;
            return Ok(ParticipantOutcome::EventNotFound);
        };

        if event.is_participant(participant_id) {
            tx.rollback().await?;
            return Ok(ParticipantOutcome::NoOp);
        }

        let mut participant_ids = event.participant_ids.clone();
        participant_ids.push(participant_id);

        let event = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET participant_ids = $2 WHERE id = $1 RETURNING {}",
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .bind(participant_ids)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ParticipantOutcome::Applied(event))
    }

    /// Remove a participant, symmetric with [`Self::add_participant`]
    pub async fn remove_participant(
        &self,
        event_id: Uuid,
        participant_id: Uuid,
    ) -> Result<ParticipantOutcome, AluMapError> {
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE id = $1 FOR UPDATE",
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(event) = event else {
            tx.rollback().await?;
            return Ok(ParticipantOutcome::EventNotFound);
        };

        if !event.is_participant(participant_id) {
            tx.rollback().await?;
            return Ok(ParticipantOutcome::NoOp);
        }

        let participant_ids: Vec<Uuid> = event
            .participant_ids
            .iter()
            .copied()
            .filter(|id| *id != participant_id)
            .collect();

        let event = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET participant_ids = $2 WHERE id = $1 RETURNING {}",
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .bind(participant_ids)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ParticipantOutcome::Applied(event))
    }

    /// Public listing: approved events, most recent start time first
    pub async fn list_approved(&self) -> Result<Vec<Event>, AluMapError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE approved = true ORDER BY starts_at DESC",
            EVENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Owner listing of decided events (approved or declined)
    pub async fn list_owner_decided(&self, owner_id: Uuid) -> Result<Vec<Event>, AluMapError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE owner_id = $1 AND approved IS NOT NULL ORDER BY starts_at DESC",
            EVENT_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Owner listing of events still pending a decision
    pub async fn list_owner_pending(&self, owner_id: Uuid) -> Result<Vec<Event>, AluMapError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE owner_id = $1 AND approved IS NULL ORDER BY starts_at DESC",
            EVENT_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Approved events a given alumni participates in, optionally unioned
    /// with the ones they own and filtered by time window.
    pub async fn list_participant_events(
        &self,
        participant_id: Uuid,
        include_created: bool,
        time_filter: Option<TimeFilter>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Event>, AluMapError> {
        let mut sql = format!(
            "SELECT {} FROM events WHERE approved = true AND (participant_ids @> ARRAY[$1]::uuid[] OR ($2 AND owner_id = $1))",
            EVENT_COLUMNS
        );
        match time_filter {
            Some(TimeFilter::Past) => sql.push_str(" AND starts_at < $3"),
            Some(TimeFilter::Upcoming) => sql.push_str(" AND starts_at >= $3"),
            None => {}
        }
        sql.push_str(" ORDER BY starts_at DESC");

        let mut query = sqlx::query_as::<_, Event>(&sql)
            .bind(participant_id)
            .bind(include_created);
        if time_filter.is_some() {
            query = query.bind(now);
        }

        let events = query.fetch_all(&self.pool).await?;
        Ok(events)
    }

    /// All events every moderator can see, for the admin dashboard
    pub async fn list_all(&self) -> Result<Vec<Event>, AluMapError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events ORDER BY starts_at DESC",
            EVENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Approved events starting inside a window. Reminder sweep contract.
    pub async fn find_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Event>, AluMapError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE approved = true AND starts_at >= $1 AND starts_at <= $2",
            EVENT_COLUMNS
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
