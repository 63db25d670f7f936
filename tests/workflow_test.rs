//! End-to-end workflow tests over a real PostgreSQL instance
//!
//! Each test runs against a fresh containerized database with migrations
//! applied, with the notification bot replaced by a wiremock server.

mod helpers;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use serial_test::serial;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::{test_settings, TestDatabase};
use AluMap::models::{
    Actor, Admin, ApprovalStatus, City, CreateEventRequest, RegisterAlumniRequest,
    UpdateEventRequest,
};
use AluMap::services::RegistrationOutcome;
use AluMap::{AluMapError, DatabaseService, ServiceFactory};

fn admin_actor() -> Actor {
    Actor::Admin(Admin {
        id: Uuid::new_v4(),
        email: "mod@inst.edu".to_string(),
        hashed_password: String::new(),
        created_at: Utc::now(),
    })
}

fn register_request(email: &str, alias: &str) -> RegisterAlumniRequest {
    RegisterAlumniRequest {
        email: email.to_string(),
        password: "long enough password".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Graduate".to_string(),
        graduation_year: 2020,
        telegram_alias: Some(alias.to_string()),
        manual_verification: false,
    }
}

fn event_request() -> CreateEventRequest {
    CreateEventRequest {
        title: "Reunion".to_string(),
        description: "Annual reunion".to_string(),
        location: "Main hall".to_string(),
        starts_at: Utc::now() + Duration::days(7),
        cost: 0.0,
        is_online: false,
        cover: None,
    }
}

async fn setup(notifier: &MockServer) -> (ServiceFactory, DatabaseService, TestDatabase) {
    let db = TestDatabase::new().await;
    let database = DatabaseService::new(db.pool.clone());
    let services = ServiceFactory::new(test_settings(&notifier.uri()), database.clone())
        .expect("Failed to build services");
    (services, database, db)
}

/// Register an allow-listed account and return it as an acting alumni
async fn registered_alumni(
    services: &ServiceFactory,
    database: &DatabaseService,
    email: &str,
    alias: &str,
) -> Actor {
    services
        .allow_list_service
        .import_emails(&[email.to_string()])
        .await
        .unwrap();
    services
        .registration_service
        .register(register_request(email, alias))
        .await
        .unwrap();
    let alumni = database.alumni.find_by_email(email).await.unwrap().unwrap();
    Actor::Alumni(alumni)
}

/// A wiremock server that accepts anything, for tests that only exercise the
/// best-effort sends incidentally
async fn permissive_notifier() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
#[serial]
async fn test_unrecognized_registration_goes_to_admin_review() {
    let notifier = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notifyAdmins"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&notifier)
        .await;

    let (services, database, _db) = setup(&notifier).await;

    let outcome = services
        .registration_service
        .register(register_request("unknown@inst.edu", "unknown_grad"))
        .await
        .unwrap();
    assert_matches!(outcome, RegistrationOutcome::PendingManualUnrecognized { .. });

    let alumni = database
        .alumni
        .find_by_email("unknown@inst.edu")
        .await
        .unwrap()
        .unwrap();
    assert!(!alumni.is_verified);

    let record = database
        .verifications
        .find_by_alumni_id(alumni.id)
        .await
        .unwrap()
        .unwrap();
    assert!(record.manual_requested);
}

#[tokio::test]
#[serial]
async fn test_allow_listed_registration_issues_code_without_admin_alert() {
    let notifier = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notifyAdmins"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&notifier)
        .await;

    let (services, database, _db) = setup(&notifier).await;

    services
        .allow_list_service
        .import_emails(&["ada@inst.edu".to_string()])
        .await
        .unwrap();
    let outcome = services
        .registration_service
        .register(register_request("ada@inst.edu", "ada_grad"))
        .await
        .unwrap();
    assert_matches!(outcome, RegistrationOutcome::CodeSent { .. });

    let alumni = database
        .alumni
        .find_by_email("ada@inst.edu")
        .await
        .unwrap()
        .unwrap();
    let record = database
        .verifications
        .find_by_alumni_id(alumni.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!record.manual_requested);
    assert_eq!(record.verification_code.len(), 6);
    assert!(record.verification_code.bytes().all(|b| b.is_ascii_digit()));
}

#[tokio::test]
#[serial]
async fn test_code_verification_lifecycle() {
    let notifier = permissive_notifier().await;
    let (services, database, _db) = setup(&notifier).await;

    let actor = registered_alumni(&services, &database, "ada@inst.edu", "ada_grad").await;
    let record = database
        .verifications
        .find_by_alumni_id(actor.id())
        .await
        .unwrap()
        .unwrap();

    let wrong = if record.verification_code == "000000" { "000001" } else { "000000" };
    assert_matches!(
        services
            .verification_service
            .verify_code("ada@inst.edu", wrong)
            .await,
        Err(AluMapError::InvalidCode)
    );

    // Cooldown starts at registration, so an immediate resend is refused
    assert_matches!(
        services.verification_service.resend_code("ada@inst.edu").await,
        Err(AluMapError::RateLimited { seconds }) if seconds > 0
    );

    let token = services
        .verification_service
        .verify_code("ada@inst.edu", &record.verification_code)
        .await
        .unwrap();
    assert_eq!(token.token_type, "bearer");

    let alumni = database
        .alumni
        .find_by_email("ada@inst.edu")
        .await
        .unwrap()
        .unwrap();
    assert!(alumni.is_verified);

    assert_matches!(
        services
            .verification_service
            .verify_code("ada@inst.edu", &record.verification_code)
            .await,
        Err(AluMapError::Conflict(_))
    );
}

#[tokio::test]
#[serial]
async fn test_event_creation_follows_auto_approve_setting() {
    let notifier = permissive_notifier().await;
    let (services, database, _db) = setup(&notifier).await;

    let owner = registered_alumni(&services, &database, "ada@inst.edu", "ada_grad").await;
    let admin = admin_actor();

    assert_matches!(
        services.event_service.create(&admin, event_request()).await,
        Err(AluMapError::Forbidden(_))
    );

    // Lazy default is auto-approve on
    let event = services.event_service.create(&owner, event_request()).await.unwrap();
    assert_eq!(event.approval(), ApprovalStatus::Approved);
    assert_eq!(event.participant_ids, vec![owner.id()]);

    let settings = services
        .event_settings_service
        .toggle_auto_approve(&admin)
        .await
        .unwrap();
    assert!(!settings.auto_approve);

    let pending = services.event_service.create(&owner, event_request()).await.unwrap();
    assert_eq!(pending.approval(), ApprovalStatus::Pending);

    assert_matches!(
        services.event_settings_service.toggle_auto_approve(&owner).await,
        Err(AluMapError::Forbidden(_))
    );
}

#[tokio::test]
#[serial]
async fn test_event_decisions_idempotent_and_unapprove_resets() {
    let notifier = permissive_notifier().await;
    let (services, database, _db) = setup(&notifier).await;

    let owner = registered_alumni(&services, &database, "ada@inst.edu", "ada_grad").await;
    let admin = admin_actor();

    services
        .event_settings_service
        .toggle_auto_approve(&admin)
        .await
        .unwrap();
    let event = services.event_service.create(&owner, event_request()).await.unwrap();
    assert_eq!(event.approval(), ApprovalStatus::Pending);

    assert_matches!(
        services.event_service.approve(&owner, event.id).await,
        Err(AluMapError::Forbidden(_))
    );

    let approved = services.event_service.approve(&admin, event.id).await.unwrap();
    assert_eq!(approved.approval(), ApprovalStatus::Approved);

    // Re-applying the decision the event already carries is a no-op
    let again = services.event_service.approve(&admin, event.id).await.unwrap();
    assert_eq!(again.approval(), ApprovalStatus::Approved);

    let declined = services.event_service.decline(&admin, event.id).await.unwrap();
    assert_eq!(declined.approval(), ApprovalStatus::Declined);
    let again = services.event_service.decline(&admin, event.id).await.unwrap();
    assert_eq!(again.approval(), ApprovalStatus::Declined);

    // Unapprove resets from any state
    let reset = services.event_service.unapprove(&admin, event.id).await.unwrap();
    assert_eq!(reset.approval(), ApprovalStatus::Pending);
}

#[tokio::test]
#[serial]
async fn test_participation_rejects_noop_joins_and_leaves() {
    let notifier = permissive_notifier().await;
    let (services, database, _db) = setup(&notifier).await;

    let owner = registered_alumni(&services, &database, "ada@inst.edu", "ada_grad").await;
    let joiner = registered_alumni(&services, &database, "bob@inst.edu", "bob_grad").await;

    let event = services.event_service.create(&owner, event_request()).await.unwrap();

    // The owner is already in the participant set
    assert_matches!(
        services
            .participation_service
            .add_participant(&owner, event.id, None)
            .await,
        Err(AluMapError::Conflict(_))
    );

    let joined = services
        .participation_service
        .add_participant(&joiner, event.id, None)
        .await
        .unwrap();
    assert_eq!(joined.participant_ids, vec![owner.id(), joiner.id()]);

    assert_matches!(
        services
            .participation_service
            .add_participant(&joiner, event.id, None)
            .await,
        Err(AluMapError::Conflict(_))
    );

    // Acting on someone else requires admin rights
    assert_matches!(
        services
            .participation_service
            .remove_participant(&joiner, event.id, Some(owner.id()))
            .await,
        Err(AluMapError::Forbidden(_))
    );

    let left = services
        .participation_service
        .remove_participant(&joiner, event.id, None)
        .await
        .unwrap();
    assert_eq!(left.participant_ids, vec![owner.id()]);

    assert_matches!(
        services
            .participation_service
            .remove_participant(&joiner, event.id, None)
            .await,
        Err(AluMapError::Conflict(_))
    );
}

#[tokio::test]
#[serial]
async fn test_update_clears_cover_only_on_explicit_null() {
    let notifier = permissive_notifier().await;
    let (services, database, _db) = setup(&notifier).await;

    let owner = registered_alumni(&services, &database, "ada@inst.edu", "ada_grad").await;

    let mut request = event_request();
    request.cover = Some("cover.png".to_string());
    let event = services.event_service.create(&owner, request).await.unwrap();
    assert_eq!(event.cover.as_deref(), Some("cover.png"));

    // An absent cover field leaves the stored image alone
    let update = UpdateEventRequest {
        title: Some("Renamed".to_string()),
        ..Default::default()
    };
    let updated = services.event_service.update(&owner, event.id, update).await.unwrap();
    assert_eq!(updated.cover.as_deref(), Some("cover.png"));

    let update = UpdateEventRequest {
        cover: Some(None),
        ..Default::default()
    };
    let cleared = services.event_service.update(&owner, event.id, update).await.unwrap();
    assert_eq!(cleared.cover, None);
}

#[tokio::test]
#[serial]
async fn test_city_lookup_is_case_insensitive_prefix_search() {
    let notifier = permissive_notifier().await;
    let (services, database, _db) = setup(&notifier).await;

    for (city, country, lat, lng) in [
        ("Berlin", "Germany", 52.52, 13.405),
        ("Bergen", "Norway", 60.3913, 5.3221),
        ("Madrid", "Spain", 40.4168, -3.7038),
    ] {
        database
            .cities
            .insert_if_absent(&City {
                city: city.to_string(),
                country: country.to_string(),
                lat,
                lng,
            })
            .await
            .unwrap();
    }

    let coords = services
        .city_service
        .coordinates("berlin", "GERMANY")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(coords.lat, 52.52);
    assert!(services
        .city_service
        .coordinates("Berlin", "France")
        .await
        .unwrap()
        .is_none());

    let matches: Vec<String> = services
        .city_service
        .search("ber", None)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.city)
        .collect();
    assert_eq!(matches, vec!["Bergen".to_string(), "Berlin".to_string()]);

    // Limits outside the page size are clamped, not errors
    let capped = services.city_service.search("b", Some(50)).await.unwrap();
    assert_eq!(capped.len(), 2);
}
