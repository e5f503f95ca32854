//! Session registry messages
//!
//! Commands and responses for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::{Message, Sender, Session};

/// Errors from session operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No active session: {0}")]
    NoActiveSession(String),

    #[error("Session already active: {0}")]
    SessionAlreadyActive(String),

    #[error("User {user_id} is already in session {session_id}")]
    ParticipantBusy { user_id: String, session_id: String },

    #[error("Session {session_id} was restarted; reply for epoch {epoch} dropped")]
    StaleSession { session_id: String, epoch: u64 },

    #[error("Message text must not be empty")]
    EmptyMessage,

    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("Channel error")]
    ChannelError,
}

/// Response from session operations
pub type SessionResponse<T> = Result<T, SessionError>;

/// A message that landed in a live session, with the session's participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub session_id: String,
    pub student_id: String,
    pub counselor_id: String,
    pub message: Message,
}

/// Commands sent to the SessionRegistry actor
#[derive(Debug)]
pub enum SessionCommand {
    Start {
        session_id: String,
        student_id: String,
        counselor_id: String,
        reply: oneshot::Sender<SessionResponse<Session>>,
    },
    End {
        session_id: String,
        reply: oneshot::Sender<Option<Session>>,
    },
    EndFor {
        user_id: String,
        reply: oneshot::Sender<Vec<Session>>,
    },
    SendMessage {
        session_id: String,
        sender: Sender,
        text: String,
        reply: oneshot::Sender<SessionResponse<Delivered>>,
    },
    DeliverScheduled {
        session_id: String,
        epoch: u64,
        sender: Sender,
        text: String,
        reply: oneshot::Sender<SessionResponse<Delivered>>,
    },
    Get {
        session_id: String,
        reply: oneshot::Sender<Option<Session>>,
    },
    ActiveFor {
        user_id: String,
        reply: oneshot::Sender<Option<Session>>,
    },
    List {
        reply: oneshot::Sender<Vec<Session>>,
    },

    // Shutdown
    Shutdown,
}
