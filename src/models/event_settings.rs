//! Event settings model
//!
//! Stored as the JSONB value of the `event_settings` row in the settings
//! table.

use serde::{Deserialize, Serialize};

pub const EVENT_SETTINGS_KEY: &str = "event_settings";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventSettings {
    pub auto_approve: bool,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self { auto_approve: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_auto_approve_is_true() {
        assert!(EventSettings::default().auto_approve);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = EventSettings { auto_approve: false };
        let value = serde_json::to_value(settings).unwrap();
        assert_eq!(value, serde_json::json!({"auto_approve": false}));
        let back: EventSettings = serde_json::from_value(value).unwrap();
        assert_eq!(back, settings);
    }
}
