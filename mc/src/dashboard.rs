//! Role-based dashboard selection
//!
//! Picks what a logged-in user sees from the current registry snapshots. This
//! is a read-only projection; mutations go through the registries.

use serde::Serialize;

use crate::domain::{Alert, Role, Session, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DashboardView {
    Student {
        live_session: Option<Session>,
    },
    Counselor {
        live_session: Option<Session>,
        new_alerts: usize,
    },
    Admin,
}

impl DashboardView {
    pub fn live_session(&self) -> Option<&Session> {
        match self {
            Self::Student { live_session } | Self::Counselor { live_session, .. } => live_session.as_ref(),
            Self::Admin => None,
        }
    }
}

/// Select the dashboard for `user`
pub fn select_view(user: &User, sessions: &[Session], alerts: &[Alert]) -> DashboardView {
    match user.role {
        Role::Student => DashboardView::Student {
            live_session: sessions.iter().find(|s| s.student_id == user.id).cloned(),
        },
        Role::Counselor => DashboardView::Counselor {
            live_session: sessions.iter().find(|s| s.counselor_id == user.id).cloned(),
            new_alerts: alerts.iter().filter(|a| a.is_new()).count(),
        },
        Role::Admin => DashboardView::Admin,
    }
}
