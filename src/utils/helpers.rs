//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

fn alias_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]{3,32}$").expect("valid alias regex"))
}

/// Normalize an email for comparison and hashing: lowercase and trim
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Strip a leading `@` from a Telegram alias
pub fn normalize_telegram_alias(alias: &str) -> String {
    alias.trim().trim_start_matches('@').to_string()
}

/// Check an already-normalized Telegram alias: 3 to 32 characters, letters,
/// digits and underscores only
pub fn is_valid_telegram_alias(alias: &str) -> bool {
    alias_regex().is_match(alias)
}

/// Basic email shape check before the domain-suffix gate
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Format an event start time for notification messages
pub fn format_event_datetime(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A.Graduate@Inst.EDU "), "a.graduate@inst.edu");
    }

    #[test]
    fn test_normalize_telegram_alias_strips_at() {
        assert_eq!(normalize_telegram_alias("@some_user"), "some_user");
        assert_eq!(normalize_telegram_alias("some_user"), "some_user");
    }

    #[test]
    fn test_alias_validation() {
        assert!(is_valid_telegram_alias("abc"));
        assert!(is_valid_telegram_alias("user_123"));
        assert!(!is_valid_telegram_alias("ab"));
        assert!(!is_valid_telegram_alias(&"x".repeat(33)));
        assert!(!is_valid_telegram_alias("bad-alias"));
        assert!(!is_valid_telegram_alias("spaced out"));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@inst.edu"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@inst.edu"));
        assert!(!is_valid_email("a@nodot"));
    }

    #[test]
    fn test_format_event_datetime() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 18, 30, 0).unwrap();
        assert_eq!(format_event_datetime(ts), "2025-06-01 18:30");
    }
}
