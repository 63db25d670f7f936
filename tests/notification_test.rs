//! Integration tests for the notification-bot HTTP client
//!
//! Runs a wiremock server in place of the Telegram notification bot and
//! asserts the endpoint shapes and the best-effort delivery policy.

use serde_json::json;
use serial_test::serial;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use AluMap::config::NotifierConfig;
use AluMap::services::NotificationService;

fn service_for(server: &MockServer) -> NotificationService {
    NotificationService::new(&NotifierConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    })
}

#[tokio::test]
#[serial]
async fn test_join_notification_hits_bot_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notifyJoin/Reunion/owner_alias/joiner_alias/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = service_for(&server);
    notifier
        .notify_join_event("Reunion", "@owner_alias", "joiner_alias")
        .await;
}

#[tokio::test]
#[serial]
async fn test_update_notification_encodes_change_list() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notifyUpdate/Reunion/someone/location%3A%20Main%20hall/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = service_for(&server);
    notifier
        .notify_event_updated("Reunion", "someone", "location: Main hall")
        .await;
}

#[tokio::test]
#[serial]
async fn test_admin_broadcast_posts_message_payload() {
    let server = MockServer::start().await;

    let expected = json!({
        "s": "🔔 Manual Verification Request\n\nName: Ada Graduate\nEmail: ada@inst.edu\n\nYou can verify this account via the admin dashboard."
    });

    Mock::given(method("POST"))
        .and(path("/notifyAdmins"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = service_for(&server);
    notifier
        .notify_admins_manual_verification("ada@inst.edu", "Ada Graduate")
        .await;
}

#[tokio::test]
#[serial]
async fn test_invalid_alias_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let notifier = service_for(&server);
    notifier
        .notify_join_event("Reunion", "has spaces", "joiner_alias")
        .await;
    notifier.notify_event_deleted("Reunion", "", "2025-06-01 18:00").await;
}

#[tokio::test]
#[serial]
async fn test_bot_failure_is_swallowed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let notifier = service_for(&server);
    // Must not panic or propagate; delivery is best-effort.
    notifier
        .notify_event_reminder("Reunion", "someone", "2025-06-01 18:00", "Main hall")
        .await;
}
