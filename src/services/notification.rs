//! Notification service implementation
//!
//! HTTP client for the Telegram notification-bot endpoint. Every send is
//! best-effort: failures are logged and swallowed so a dead notifier can
//! never fail the operation that triggered it.

use std::time::Duration;

use serde_json::json;
use tracing::{error, info, warn};

use crate::config::NotifierConfig;
use crate::utils::helpers::{is_valid_telegram_alias, normalize_telegram_alias};

#[derive(Debug, Clone)]
pub struct NotificationService {
    client: reqwest::Client,
    base_url: String,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(config: &NotifierConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Notify the event owner that a user joined their event
    pub async fn notify_join_event(&self, event_name: &str, owner_alias: &str, user_alias: &str) {
        let (Some(owner), Some(user)) = (clean_alias(owner_alias), clean_alias(user_alias)) else {
            warn!(
                owner_alias = owner_alias,
                user_alias = user_alias,
                "Skipping join notification, missing or invalid telegram alias"
            );
            return;
        };

        let url = format!(
            "{}/notifyJoin/{}/{}/{}/",
            self.base_url,
            urlencoding::encode(event_name),
            owner,
            user
        );
        self.post(&url, None, "join").await;
    }

    /// Notify one user that an approved event they attend was changed
    pub async fn notify_event_updated(&self, event_name: &str, user_alias: &str, changes: &str) {
        let Some(user) = clean_alias(user_alias) else {
            warn!(user_alias = user_alias, "Skipping update notification, invalid alias");
            return;
        };

        let url = format!(
            "{}/notifyUpdate/{}/{}/{}/",
            self.base_url,
            urlencoding::encode(event_name),
            user,
            urlencoding::encode(changes)
        );
        self.post(&url, None, "update").await;
    }

    /// Notify one user that an approved event was cancelled
    pub async fn notify_event_deleted(&self, event_name: &str, user_alias: &str, event_datetime: &str) {
        let Some(user) = clean_alias(user_alias) else {
            warn!(user_alias = user_alias, "Skipping delete notification, invalid alias");
            return;
        };

        let url = format!(
            "{}/notifyDelete/{}/{}/{}/",
            self.base_url,
            urlencoding::encode(event_name),
            user,
            urlencoding::encode(event_datetime)
        );
        self.post(&url, None, "delete").await;
    }

    /// Remind one user about an event starting soon
    pub async fn notify_event_reminder(
        &self,
        event_name: &str,
        user_alias: &str,
        event_datetime: &str,
        location: &str,
    ) {
        let Some(user) = clean_alias(user_alias) else {
            warn!(user_alias = user_alias, "Skipping reminder, invalid alias");
            return;
        };

        let url = format!(
            "{}/notifyReminder/{}/{}/{}/{}/",
            self.base_url,
            urlencoding::encode(event_name),
            user,
            urlencoding::encode(event_datetime),
            urlencoding::encode(location)
        );
        self.post(&url, None, "reminder").await;
    }

    /// Broadcast a manual-verification request to the admin channel
    pub async fn notify_admins_manual_verification(&self, user_email: &str, user_name: &str) {
        let message = format!(
            "🔔 Manual Verification Request\n\nName: {}\nEmail: {}\n\nYou can verify this account via the admin dashboard.",
            user_name, user_email
        );

        let url = format!("{}/notifyAdmins", self.base_url);
        self.post(&url, Some(json!({ "s": message })), "admin_manual_verification")
            .await;
    }

    async fn post(&self, url: &str, body: Option<serde_json::Value>, kind: &str) {
        let request = match body {
            Some(body) => self.client.post(url).json(&body),
            None => self.client.post(url),
        };

        match request.send().await.and_then(|r| r.error_for_status()) {
            Ok(_) => info!(kind = kind, "Notification sent successfully"),
            Err(e) => error!(kind = kind, error = %e, "Failed to send notification"),
        }
    }
}

/// Strip a leading `@` and reject aliases with characters the bot URL cannot
/// carry
fn clean_alias(alias: &str) -> Option<String> {
    let cleaned = normalize_telegram_alias(alias);
    if is_valid_telegram_alias(&cleaned) {
        Some(cleaned)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_alias_strips_at_and_validates() {
        assert_eq!(clean_alias("@good_alias").as_deref(), Some("good_alias"));
        assert_eq!(clean_alias("bad alias"), None);
        assert_eq!(clean_alias(""), None);
    }
}
