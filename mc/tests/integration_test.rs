//! Integration tests for MindCare
//!
//! These tests drive the registries and the desk end to end through the
//! public API, the way the console and demo do.

use std::sync::Arc;
use std::time::Duration;

use mindcare::alerts::AlertRegistry;
use mindcare::auth::{LoginStore, UserDirectory};
use mindcare::config::{Config, ReplyConfig};
use mindcare::domain::{AlertStatus, DEFAULT_GREETING, Sender, User};
use mindcare::events::{CareEvent, EventBus};
use mindcare::sessions::{SessionError, SessionRegistry};
use mindcare::{AckOutcome, CareDesk, DashboardView, DeskError, Responder};
use tempfile::TempDir;

fn user(username: &str) -> User {
    UserDirectory::seeded()
        .find_by_username(username)
        .cloned()
        .expect("seeded user")
}

fn desk_with_replies(min_delay_ms: u64, max_delay_ms: u64) -> CareDesk {
    let mut config = Config::default();
    config.replies = ReplyConfig {
        enabled: true,
        min_delay_ms,
        max_delay_ms,
    };
    CareDesk::start(&config)
}

// =============================================================================
// Registry Scenarios
// =============================================================================

#[tokio::test]
async fn test_alert_scenario() {
    let alerts = AlertRegistry::spawn(Arc::new(EventBus::default()));

    let alert = alerts.raise("s1", "Jane", "Suicidal thoughts").await.unwrap();
    let listed = alerts.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, AlertStatus::New);

    assert_eq!(alerts.acknowledge(&alert.id).await.unwrap(), AckOutcome::Acknowledged);
    assert_eq!(alerts.list().await.unwrap()[0].status, AlertStatus::Acknowledged);
    assert_eq!(alerts.acknowledge("SOS-unknown").await.unwrap(), AckOutcome::NotFound);
}

#[tokio::test]
async fn test_session_scenario() {
    let sessions = SessionRegistry::spawn(Arc::new(EventBus::default()), DEFAULT_GREETING);

    let session = sessions.start("sess-1", "s1", "c1").await.unwrap();
    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.messages[0].sender, Sender::Counselor);

    sessions.send_message("sess-1", Sender::Student, "I'm anxious").await.unwrap();
    let session = sessions.get("sess-1").await.unwrap().unwrap();
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[1].sender, Sender::Student);
    assert_eq!(session.messages[1].text, "I'm anxious");

    assert!(sessions.end("sess-1").await.unwrap().is_some());
    assert!(sessions.get("sess-1").await.unwrap().is_none());
    assert_eq!(
        sessions.send_message("sess-1", Sender::Student, "hello?").await,
        Err(SessionError::NoActiveSession("sess-1".to_string()))
    );
}

#[tokio::test]
async fn test_concurrent_sessions_keep_participants_apart() {
    let sessions = SessionRegistry::spawn(Arc::new(EventBus::default()), DEFAULT_GREETING);

    sessions.start("sess-a", "s1", "c1").await.unwrap();
    sessions.start("sess-b", "s2", "c2").await.unwrap();

    let err = sessions.start("sess-c", "s1", "c3").await.unwrap_err();
    assert!(matches!(err, SessionError::ParticipantBusy { .. }));

    sessions.send_message("sess-a", Sender::Student, "only in a").await.unwrap();
    assert_eq!(sessions.get("sess-b").await.unwrap().unwrap().messages.len(), 1);
    assert_eq!(sessions.list().await.unwrap().len(), 2);
}

// =============================================================================
// Desk Flow
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_sos_to_session_flow() {
    let desk = desk_with_replies(10, 20);
    let student = user("student1");
    let counselor = user("counselor1");
    let mut events = desk.subscribe();

    let alert = desk.raise_sos(&student, "Panic attack").await.unwrap();
    assert_eq!(
        desk.dashboard(&counselor).await.unwrap(),
        DashboardView::Counselor {
            live_session: None,
            new_alerts: 1,
        }
    );

    let session = desk.respond_to_alert(&counselor, &alert.id).await.unwrap();
    assert_eq!(session.session_id, format!("session-SOS-{}", alert.id));

    desk.send(&student, "I can't breathe").await.unwrap();
    desk.send(&counselor, "Breathe with me").await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;

    let transcript = desk.transcript(&student).await.unwrap().unwrap();
    let senders: Vec<Sender> = transcript.messages.iter().map(|m| m.sender).collect();
    assert_eq!(
        senders,
        vec![Sender::Counselor, Sender::Student, Sender::Counselor, Sender::Student]
    );

    let ended = desk.end_session(&counselor).await.unwrap().unwrap();
    assert_eq!(ended.messages.len(), 4);
    assert_eq!(
        desk.dashboard(&student).await.unwrap(),
        DashboardView::Student { live_session: None }
    );

    let mut kinds = Vec::new();
    while let Ok(event) = events.try_recv() {
        kinds.push(event.event_type());
    }
    assert_eq!(kinds.first(), Some(&"alert_raised"));
    assert!(kinds.contains(&"alert_acknowledged"));
    assert_eq!(kinds.last(), Some(&"session_ended"));
}

#[tokio::test(start_paused = true)]
async fn test_pending_reply_never_lands_after_end() {
    let desk = desk_with_replies(100, 150);
    let counselor = user("counselor1");
    let student = user("student1");

    desk.start_session(&counselor, "sess-1", &student.id).await.unwrap();
    desk.send(&counselor, "How are you?").await.unwrap();
    assert_eq!(desk.replies().pending_count("sess-1").await, 1);

    desk.end_session(&student).await.unwrap();
    // Same id, new session
    desk.start_session(&counselor, "sess-1", &student.id).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    let session = desk.transcript(&counselor).await.unwrap().unwrap();
    assert_eq!(session.messages.len(), 1);
    assert_eq!(desk.replies().pending_count("sess-1").await, 0);
}

#[tokio::test]
async fn test_logout_ends_session_for_both_sides() {
    let desk = desk_with_replies(10, 20);
    let counselor = user("counselor2");
    let student = user("student1");
    let mut events = desk.subscribe();

    desk.start_session(&counselor, "booked-1", &student.id).await.unwrap();
    let ended = desk.logout(&student).await.unwrap();
    assert_eq!(ended.len(), 1);
    assert!(desk.transcript(&counselor).await.unwrap().is_none());

    let mut saw_end = false;
    while let Ok(event) = events.try_recv() {
        if let CareEvent::SessionEnded { session_id, .. } = event {
            saw_end = session_id == "booked-1";
        }
    }
    assert!(saw_end);
}

#[tokio::test]
async fn test_roles_are_enforced() {
    let desk = desk_with_replies(10, 20);
    assert!(matches!(
        desk.start_session(&user("student1"), "sess-1", "3").await,
        Err(DeskError::Forbidden { .. })
    ));
    assert!(matches!(
        desk.raise_sos(&user("admin"), "help").await,
        Err(DeskError::Forbidden { .. })
    ));
}

struct SilentResponder;

impl Responder for SilentResponder {
    fn reply(&self, _speaker: Sender, _prompt: &str) -> Option<String> {
        None
    }
}

#[tokio::test]
async fn test_custom_responder() {
    let desk = CareDesk::with_responder(&Config::default(), Arc::new(SilentResponder));
    let counselor = user("counselor1");

    desk.start_session(&counselor, "sess-1", "3").await.unwrap();
    desk.send(&counselor, "Anyone there?").await.unwrap();
    assert_eq!(desk.replies().pending_count("sess-1").await, 0);
}

// =============================================================================
// Login Persistence
// =============================================================================

#[test]
fn test_login_survives_restart() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let directory = UserDirectory::seeded();
    let counselor = directory.authenticate("counselor1", "secret", "EDU001").unwrap();

    LoginStore::new(temp_dir.path()).save(&counselor).unwrap();

    let restored = LoginStore::new(temp_dir.path()).load().unwrap();
    assert_eq!(restored, Some(counselor));
}
