//! Alert registry messages
//!
//! Commands and responses for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::Alert;

/// Errors from alert operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlertError {
    #[error("Invalid alert: {0}")]
    InvalidAlert(String),

    #[error("Channel error")]
    ChannelError,
}

/// Response from alert operations
pub type AlertResponse<T> = Result<T, AlertError>;

/// Outcome of an acknowledge call
///
/// Acknowledging is never an error; the outcome says whether anything changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    /// Status moved from new to acknowledged
    Acknowledged,
    /// Alert was already acknowledged; nothing changed
    AlreadyAcknowledged,
    /// No alert with that ID; nothing changed
    NotFound,
}

impl AckOutcome {
    pub fn changed(self) -> bool {
        self == Self::Acknowledged
    }
}

/// Commands sent to the AlertRegistry actor
#[derive(Debug)]
pub enum AlertCommand {
    Raise {
        student_id: String,
        student_name: String,
        reason: String,
        reply: oneshot::Sender<AlertResponse<Alert>>,
    },
    Acknowledge {
        id: String,
        reply: oneshot::Sender<AckOutcome>,
    },
    Get {
        id: String,
        reply: oneshot::Sender<Option<Alert>>,
    },
    List {
        reply: oneshot::Sender<Vec<Alert>>,
    },

    // Shutdown
    Shutdown,
}
