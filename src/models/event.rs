//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::helpers::format_event_datetime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub owner_id: Uuid,
    /// Insertion-ordered, duplicate-free. Owner is included at creation.
    pub participant_ids: Vec<Uuid>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: DateTime<Utc>,
    pub cost: f64,
    pub is_online: bool,
    pub cover: Option<String>,
    /// NULL = pending, true = approved, false = declined
    pub approved: Option<bool>,
}

impl Event {
    pub fn approval(&self) -> ApprovalStatus {
        ApprovalStatus::from_column(self.approved)
    }

    pub fn is_participant(&self, alumni_id: Uuid) -> bool {
        self.participant_ids.contains(&alumni_id)
    }

    /// Everyone to notify about a change to this event: participants plus the
    /// owner, deduplicated while keeping insertion order.
    pub fn notifiable_ids(&self) -> Vec<Uuid> {
        let mut ids = self.participant_ids.clone();
        if !ids.contains(&self.owner_id) {
            ids.push(self.owner_id);
        }
        ids
    }
}

/// Tri-state approval lifecycle of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Declined,
}

impl ApprovalStatus {
    pub fn from_column(approved: Option<bool>) -> Self {
        match approved {
            None => ApprovalStatus::Pending,
            Some(true) => ApprovalStatus::Approved,
            Some(false) => ApprovalStatus::Declined,
        }
    }

    pub fn to_column(self) -> Option<bool> {
        match self {
            ApprovalStatus::Pending => None,
            ApprovalStatus::Approved => Some(true),
            ApprovalStatus::Declined => Some(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: DateTime<Utc>,
    pub cost: f64,
    pub is_online: bool,
    pub cover: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub cost: Option<f64>,
    pub is_online: Option<bool>,
    /// Outer None leaves the cover untouched; `Some(None)` (an explicit JSON
    /// null) clears it.
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub cover: Option<Option<String>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Changes to notification-relevant fields detected by the update workflow.
/// Title, description and cover edits do not trigger participant notifications.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChanges {
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub cost: Option<f64>,
    pub is_online: Option<bool>,
}

impl EventChanges {
    /// Diff an update request against the current event state
    pub fn detect(current: &Event, update: &UpdateEventRequest) -> Self {
        let mut changes = EventChanges::default();

        if let Some(location) = &update.location {
            if *location != current.location {
                changes.location = Some(location.clone());
            }
        }
        if let Some(starts_at) = update.starts_at {
            if starts_at != current.starts_at {
                changes.starts_at = Some(starts_at);
            }
        }
        if let Some(cost) = update.cost {
            if cost != current.cost {
                changes.cost = Some(cost);
            }
        }
        if let Some(is_online) = update.is_online {
            if is_online != current.is_online {
                changes.is_online = Some(is_online);
            }
        }

        changes
    }

    pub fn is_empty(&self) -> bool {
        *self == EventChanges::default()
    }

    /// Human-readable change list for the notification message
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(location) = &self.location {
            parts.push(format!("location: {}", location));
        }
        if let Some(starts_at) = self.starts_at {
            parts.push(format!("datetime: {}", format_event_datetime(starts_at)));
        }
        if let Some(cost) = self.cost {
            parts.push(format!("cost: {}", cost));
        }
        if let Some(is_online) = self.is_online {
            parts.push(format!("is_online: {}", is_online));
        }
        parts.join(", ")
    }
}

/// Time-window filter for participant event listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    Past,
    Upcoming,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> Event {
        Event {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            participant_ids: vec![],
            title: "Reunion".to_string(),
            description: "Annual reunion".to_string(),
            location: "Main hall".to_string(),
            starts_at: Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap(),
            cost: 0.0,
            is_online: false,
            cover: None,
            approved: None,
        }
    }

    #[test]
    fn test_approval_tri_state_round_trip() {
        for status in [
            ApprovalStatus::Pending,
            ApprovalStatus::Approved,
            ApprovalStatus::Declined,
        ] {
            assert_eq!(ApprovalStatus::from_column(status.to_column()), status);
        }
    }

    #[test]
    fn test_notifiable_ids_include_owner_once() {
        let mut event = sample_event();
        let other = Uuid::new_v4();
        event.participant_ids = vec![event.owner_id, other];
        assert_eq!(event.notifiable_ids(), vec![event.owner_id, other]);

        event.participant_ids = vec![other];
        assert_eq!(event.notifiable_ids(), vec![other, event.owner_id]);
    }

    #[test]
    fn test_update_request_distinguishes_missing_and_null_cover() {
        let missing: UpdateEventRequest = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(missing.cover, None);

        let cleared: UpdateEventRequest = serde_json::from_str(r#"{"cover":null}"#).unwrap();
        assert_eq!(cleared.cover, Some(None));

        let set: UpdateEventRequest = serde_json::from_str(r#"{"cover":"img.png"}"#).unwrap();
        assert_eq!(set.cover, Some(Some("img.png".to_string())));
    }

    #[test]
    fn test_change_detection_ignores_equal_values() {
        let event = sample_event();
        let update = UpdateEventRequest {
            location: Some(event.location.clone()),
            cost: Some(event.cost),
            ..Default::default()
        };
        assert!(EventChanges::detect(&event, &update).is_empty());
    }

    #[test]
    fn test_change_detection_tracks_notification_fields() {
        let event = sample_event();
        let update = UpdateEventRequest {
            title: Some("New title".to_string()),
            location: Some("Online".to_string()),
            is_online: Some(true),
            ..Default::default()
        };
        let changes = EventChanges::detect(&event, &update);
        assert_eq!(changes.location.as_deref(), Some("Online"));
        assert_eq!(changes.is_online, Some(true));
        assert!(changes.starts_at.is_none());
        assert!(!changes.is_empty());
        assert_eq!(changes.describe(), "location: Online, is_online: true");
    }
}
