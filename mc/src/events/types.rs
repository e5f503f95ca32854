//! Event types for MindCare state changes
//!
//! These events represent every change a dashboard may need to react to:
//! - Alert lifecycle (raised, acknowledged)
//! - Session lifecycle (started, message appended, ended)

use serde::{Deserialize, Serialize};

use crate::domain::{Alert, Message};

/// Core event enum - the vocabulary of registry changes
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CareEvent {
    // === Alerts ===
    /// A student raised an SOS alert
    AlertRaised { alert: Alert },
    /// A counselor acknowledged an alert
    AlertAcknowledged { alert_id: String, student_id: String },

    // === Sessions ===
    /// A counseling session went live
    SessionStarted {
        session_id: String,
        student_id: String,
        counselor_id: String,
    },
    /// A message was appended to a session transcript
    MessageAppended {
        session_id: String,
        student_id: String,
        counselor_id: String,
        message: Message,
    },
    /// A session was ended by one of its participants
    SessionEnded {
        session_id: String,
        epoch: u64,
        student_id: String,
        counselor_id: String,
        message_count: usize,
    },
}

impl CareEvent {
    /// Short name of the event kind (for logging)
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AlertRaised { .. } => "alert_raised",
            Self::AlertAcknowledged { .. } => "alert_acknowledged",
            Self::SessionStarted { .. } => "session_started",
            Self::MessageAppended { .. } => "message_appended",
            Self::SessionEnded { .. } => "session_ended",
        }
    }

    /// Session the event belongs to, if any
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::SessionStarted { session_id, .. }
            | Self::MessageAppended { session_id, .. }
            | Self::SessionEnded { session_id, .. } => Some(session_id),
            Self::AlertRaised { .. } | Self::AlertAcknowledged { .. } => None,
        }
    }

    /// Whether a user with this id should see the event
    ///
    /// Alert events go to everyone (counselors filter by role). Session events
    /// only go to the two participants.
    pub fn concerns(&self, user_id: &str) -> bool {
        match self {
            Self::AlertRaised { .. } | Self::AlertAcknowledged { .. } => true,
            Self::SessionStarted {
                student_id,
                counselor_id,
                ..
            }
            | Self::MessageAppended {
                student_id,
                counselor_id,
                ..
            }
            | Self::SessionEnded {
                student_id,
                counselor_id,
                ..
            } => student_id == user_id || counselor_id == user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sender;

    #[test]
    fn test_event_type_and_session_id() {
        let event = CareEvent::SessionStarted {
            session_id: "sess-1".to_string(),
            student_id: "s1".to_string(),
            counselor_id: "c1".to_string(),
        };
        assert_eq!(event.event_type(), "session_started");
        assert_eq!(event.session_id(), Some("sess-1"));

        let event = CareEvent::AlertAcknowledged {
            alert_id: "SOS-1".to_string(),
            student_id: "s1".to_string(),
        };
        assert_eq!(event.session_id(), None);
    }

    #[test]
    fn test_concerns() {
        let started = CareEvent::SessionStarted {
            session_id: "sess-1".to_string(),
            student_id: "s1".to_string(),
            counselor_id: "c1".to_string(),
        };
        assert!(started.concerns("s1"));
        assert!(started.concerns("c1"));
        assert!(!started.concerns("c2"));

        let appended = CareEvent::MessageAppended {
            session_id: "sess-1".to_string(),
            student_id: "s1".to_string(),
            counselor_id: "c1".to_string(),
            message: Message::new(Sender::Student, "hi"),
        };
        assert!(appended.concerns("c1"));
        assert!(!appended.concerns("s2"));

        let raised = CareEvent::AlertRaised {
            alert: crate::domain::Alert::new("s1", "Jane", "Other urgent crisis"),
        };
        assert!(raised.concerns("anyone"));
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = CareEvent::AlertAcknowledged {
            alert_id: "SOS-1".to_string(),
            student_id: "s1".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"AlertAcknowledged\""));
    }
}
