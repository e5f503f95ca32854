//! AlertBook - the alert state owned by the registry actor
//!
//! Alerts are kept most-recent-first and are never removed.

use std::collections::VecDeque;

use tracing::debug;

use crate::domain::Alert;

use super::messages::{AckOutcome, AlertError};

#[derive(Debug, Default)]
pub struct AlertBook {
    alerts: VecDeque<Alert>,
}

impl AlertBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new alert at the front of the book
    pub fn raise(&mut self, student_id: &str, student_name: &str, reason: &str) -> Result<Alert, AlertError> {
        debug!(%student_id, %reason, "AlertBook::raise: called");
        if student_id.trim().is_empty() {
            return Err(AlertError::InvalidAlert("student id must not be empty".to_string()));
        }
        if reason.trim().is_empty() {
            return Err(AlertError::InvalidAlert("reason must not be empty".to_string()));
        }

        let alert = Alert::new(student_id, student_name, reason);
        self.alerts.push_front(alert.clone());
        Ok(alert)
    }

    pub fn acknowledge(&mut self, id: &str) -> AckOutcome {
        debug!(%id, "AlertBook::acknowledge: called");
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                if alert.acknowledge() {
                    AckOutcome::Acknowledged
                } else {
                    AckOutcome::AlreadyAcknowledged
                }
            }
            None => {
                debug!(%id, "AlertBook::acknowledge: no such alert");
                AckOutcome::NotFound
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// Snapshot of all alerts, most recent first
    pub fn list(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
