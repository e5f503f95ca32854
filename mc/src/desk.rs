//! CareDesk - the front-end facing surface
//!
//! Owns one handle to each registry plus the reply scheduler, constructed once
//! at startup and passed to the console and demo. Every operation here is a
//! user action: it checks the caller's role, resolves the caller's live
//! session, and delegates to the registries.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::alerts::{AckOutcome, AlertError, AlertRegistry};
use crate::config::Config;
use crate::dashboard::{DashboardView, select_view};
use crate::domain::{Alert, Message, Role, Sender, Session, User, sos_session_id};
use crate::events::{CareEvent, EventBus};
use crate::replies::{CannedResponder, ReplyScheduler, Responder};
use crate::sessions::{SessionError, SessionRegistry};

/// Errors from desk operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeskError {
    #[error(transparent)]
    Alert(#[from] AlertError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("A {role} cannot {action}")]
    Forbidden { role: Role, action: &'static str },

    #[error("Unknown alert: {0}")]
    UnknownAlert(String),
}

pub type DeskResult<T> = Result<T, DeskError>;

#[derive(Clone)]
pub struct CareDesk {
    alerts: AlertRegistry,
    sessions: SessionRegistry,
    replies: ReplyScheduler,
    events: Arc<EventBus>,
}

impl CareDesk {
    /// Spawn the registries and the reply scheduler with canned replies
    pub fn start(config: &Config) -> Self {
        Self::with_responder(config, Arc::new(CannedResponder::default()))
    }

    /// Spawn the registries with a custom responder for simulated replies
    pub fn with_responder(config: &Config, responder: Arc<dyn Responder>) -> Self {
        debug!(capacity = config.events.capacity, "CareDesk::with_responder: called");
        let events = Arc::new(EventBus::new(config.events.capacity));
        let alerts = AlertRegistry::spawn(events.clone());
        let sessions = SessionRegistry::spawn(events.clone(), config.sessions.greeting.clone());
        let replies = ReplyScheduler::spawn(sessions.clone(), &events, responder, config.replies.clone());

        info!("CareDesk started");
        Self {
            alerts,
            sessions,
            replies,
            events,
        }
    }

    pub fn alerts(&self) -> &AlertRegistry {
        &self.alerts
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn replies(&self) -> &ReplyScheduler {
        &self.replies
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CareEvent> {
        self.events.subscribe()
    }

    /// A student asks for help
    pub async fn raise_sos(&self, user: &User, reason: &str) -> DeskResult<Alert> {
        debug!(user_id = %user.id, "raise_sos: called");
        require(user, Role::Student, "raise an SOS alert")?;
        Ok(self.alerts.raise(&user.id, &user.name, reason).await?)
    }

    /// A counselor marks an alert as handled
    pub async fn acknowledge(&self, user: &User, alert_id: &str) -> DeskResult<AckOutcome> {
        debug!(user_id = %user.id, %alert_id, "acknowledge: called");
        require(user, Role::Counselor, "acknowledge alerts")?;
        Ok(self.alerts.acknowledge(alert_id).await?)
    }

    /// A counselor answers an SOS: open a session with its student, then acknowledge it
    ///
    /// The alert stays new if the session cannot start, so another counselor
    /// still sees it.
    pub async fn respond_to_alert(&self, user: &User, alert_id: &str) -> DeskResult<Session> {
        debug!(user_id = %user.id, %alert_id, "respond_to_alert: called");
        require(user, Role::Counselor, "respond to alerts")?;

        let alert = self
            .alerts
            .get(alert_id)
            .await?
            .ok_or_else(|| DeskError::UnknownAlert(alert_id.to_string()))?;

        let session = self
            .sessions
            .start(&sos_session_id(&alert.id), &alert.student_id, &user.id)
            .await?;
        self.alerts.acknowledge(alert_id).await?;
        info!(alert_id = %alert.id, session_id = %session.session_id, "Responded to alert");
        Ok(session)
    }

    /// A counselor opens a booked session with a student
    pub async fn start_session(&self, user: &User, session_id: &str, student_id: &str) -> DeskResult<Session> {
        debug!(user_id = %user.id, %session_id, %student_id, "start_session: called");
        require(user, Role::Counselor, "start sessions")?;
        Ok(self.sessions.start(session_id, student_id, &user.id).await?)
    }

    /// Say something in the caller's live session
    ///
    /// A counselor message schedules a simulated student reply.
    pub async fn send(&self, user: &User, text: &str) -> DeskResult<Message> {
        debug!(user_id = %user.id, "send: called");
        let session = self.live_session(user).await?;
        let sender = session
            .participant_role(&user.id)
            .ok_or_else(|| SessionError::NoActiveSession(user.id.clone()))?;

        let message = self.sessions.send_message(&session.session_id, sender, text).await?;

        if sender == Sender::Counselor
            && let Some(delay) = self.replies.schedule(&session, sender.counterpart(), text).await
        {
            debug!(session_id = %session.session_id, ?delay, "send: student reply scheduled");
        }
        Ok(message)
    }

    /// End the caller's live session; `None` if there was none
    pub async fn end_session(&self, user: &User) -> DeskResult<Option<Session>> {
        debug!(user_id = %user.id, "end_session: called");
        let Some(session) = self.sessions.active_for(&user.id).await? else {
            debug!(user_id = %user.id, "end_session: no live session");
            return Ok(None);
        };
        Ok(self.sessions.end(&session.session_id).await?)
    }

    /// End every session the user takes part in
    pub async fn logout(&self, user: &User) -> DeskResult<Vec<Session>> {
        debug!(user_id = %user.id, "logout: called");
        let ended = self.sessions.end_for(&user.id).await?;
        info!(user_id = %user.id, ended = ended.len(), "Logged out");
        Ok(ended)
    }

    pub async fn dashboard(&self, user: &User) -> DeskResult<DashboardView> {
        debug!(user_id = %user.id, "dashboard: called");
        let sessions = self.sessions.list().await?;
        let alerts = match user.role {
            Role::Counselor => self.alerts.list().await?,
            Role::Student | Role::Admin => Vec::new(),
        };
        Ok(select_view(user, &sessions, &alerts))
    }

    /// The caller's live session with its full transcript
    pub async fn transcript(&self, user: &User) -> DeskResult<Option<Session>> {
        debug!(user_id = %user.id, "transcript: called");
        Ok(self.sessions.active_for(&user.id).await?)
    }

    /// All alerts, most recent first; counselors only
    pub async fn alert_feed(&self, user: &User) -> DeskResult<Vec<Alert>> {
        debug!(user_id = %user.id, "alert_feed: called");
        require(user, Role::Counselor, "view alerts")?;
        Ok(self.alerts.list().await?)
    }

    pub async fn shutdown(&self) {
        debug!("CareDesk::shutdown: called");
        if let Err(e) = self.sessions.shutdown().await {
            debug!(error = %e, "SessionRegistry already stopped");
        }
        if let Err(e) = self.alerts.shutdown().await {
            debug!(error = %e, "AlertRegistry already stopped");
        }
        info!("CareDesk stopped");
    }

    async fn live_session(&self, user: &User) -> DeskResult<Session> {
        self.sessions
            .active_for(&user.id)
            .await?
            .ok_or_else(|| SessionError::NoActiveSession(user.id.clone()).into())
    }
}

fn require(user: &User, role: Role, action: &'static str) -> DeskResult<()> {
    if user.role == role {
        Ok(())
    } else {
        Err(DeskError::Forbidden { role: user.role, action })
    }
}
