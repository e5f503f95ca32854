//! Counseling session domain types
//!
//! A session is a live chat between exactly one student and one counselor.
//! Its transcript is append-only; insertion order is the chat order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{MESSAGE_PREFIX, generate_id};

/// Greeting the counselor side opens every session with
pub const DEFAULT_GREETING: &str = "Hello! I'm here for our session. How are you feeling today?";

/// Which side of a session wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Student,
    Counselor,
}

impl Sender {
    /// The other participant
    pub fn counterpart(self) -> Self {
        match self {
            Self::Student => Self::Counselor,
            Self::Counselor => Self::Student,
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Counselor => write!(f, "counselor"),
        }
    }
}

/// A single chat message (immutable once created)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: generate_id(MESSAGE_PREFIX),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

/// A live counseling session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub student_id: String,
    pub counselor_id: String,
    pub messages: Vec<Message>,
    pub started_at: DateTime<Utc>,
    /// Registry-assigned start counter; distinguishes reuses of the same session_id
    pub epoch: u64,
}

impl Session {
    /// Create a session seeded with the counselor greeting
    pub fn new(
        session_id: impl Into<String>,
        student_id: impl Into<String>,
        counselor_id: impl Into<String>,
        greeting: &str,
        epoch: u64,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            student_id: student_id.into(),
            counselor_id: counselor_id.into(),
            messages: vec![Message::new(Sender::Counselor, greeting)],
            started_at: Utc::now(),
            epoch,
        }
    }

    /// Whether the user takes part in this session
    pub fn involves(&self, user_id: &str) -> bool {
        self.student_id == user_id || self.counselor_id == user_id
    }

    /// The side the user speaks for, if they take part
    pub fn participant_role(&self, user_id: &str) -> Option<Sender> {
        if self.student_id == user_id {
            Some(Sender::Student)
        } else if self.counselor_id == user_id {
            Some(Sender::Counselor)
        } else {
            None
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_seeded_with_greeting() {
        let session = Session::new("sess-1", "s1", "c1", DEFAULT_GREETING, 1);
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].sender, Sender::Counselor);
        assert_eq!(session.messages[0].text, DEFAULT_GREETING);
    }

    #[test]
    fn test_participant_role() {
        let session = Session::new("sess-1", "s1", "c1", DEFAULT_GREETING, 1);
        assert_eq!(session.participant_role("s1"), Some(Sender::Student));
        assert_eq!(session.participant_role("c1"), Some(Sender::Counselor));
        assert_eq!(session.participant_role("x"), None);
        assert!(session.involves("s1"));
        assert!(!session.involves("c2"));
    }

    #[test]
    fn test_sender_counterpart() {
        assert_eq!(Sender::Student.counterpart(), Sender::Counselor);
        assert_eq!(Sender::Counselor.counterpart(), Sender::Student);
    }
}
