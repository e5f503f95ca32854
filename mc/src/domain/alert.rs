//! SOS alert domain type
//!
//! An urgent help request raised by a student and tracked until a counselor
//! acknowledges it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::id::{ALERT_PREFIX, generate_id};

/// Alert status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Raised, waiting for a counselor
    #[default]
    New,
    /// Seen by a counselor
    Acknowledged,
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Acknowledged => write!(f, "acknowledged"),
        }
    }
}

/// An SOS alert raised by a student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    pub status: AlertStatus,
}

impl Alert {
    /// Create a new alert with a fresh ID, the current time and status `New`
    pub fn new(student_id: impl Into<String>, student_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: generate_id(ALERT_PREFIX),
            student_id: student_id.into(),
            student_name: student_name.into(),
            reason: reason.into(),
            timestamp: Utc::now(),
            status: AlertStatus::New,
        }
    }

    pub fn is_new(&self) -> bool {
        self.status == AlertStatus::New
    }

    /// Mark as acknowledged
    ///
    /// Returns true if the status changed. Acknowledged alerts never go back to new.
    pub fn acknowledge(&mut self) -> bool {
        debug!(id = %self.id, status = %self.status, "Alert::acknowledge: called");
        if self.status == AlertStatus::Acknowledged {
            return false;
        }
        self.status = AlertStatus::Acknowledged;
        true
    }
}
