//! AlertRegistry - actor that owns the AlertBook
//!
//! Processes commands via channels so every view shares one ordered source of
//! truth for alert state. Events are emitted by the actor right after each
//! change, so the bus sees them in the same order the book applied them.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::domain::Alert;
use crate::events::{CareEvent, EventBus};

use super::book::AlertBook;
use super::messages::{AckOutcome, AlertCommand, AlertError, AlertResponse};

/// Handle to send commands to the AlertRegistry
#[derive(Clone)]
pub struct AlertRegistry {
    tx: mpsc::Sender<AlertCommand>,
}

impl AlertRegistry {
    /// Spawn a new AlertRegistry actor
    pub fn spawn(events: Arc<EventBus>) -> Self {
        debug!("AlertRegistry::spawn: called");
        let (tx, rx) = mpsc::channel(256);

        tokio::spawn(actor_loop(AlertBook::new(), rx, events));

        info!("AlertRegistry spawned");
        Self { tx }
    }

    /// Raise a new SOS alert
    pub async fn raise(&self, student_id: &str, student_name: &str, reason: &str) -> AlertResponse<Alert> {
        debug!(%student_id, %reason, "raise: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(AlertCommand::Raise {
                student_id: student_id.to_string(),
                student_name: student_name.to_string(),
                reason: reason.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| AlertError::ChannelError)?;
        reply_rx.await.map_err(|_| AlertError::ChannelError)?
    }

    /// Acknowledge an alert (idempotent)
    pub async fn acknowledge(&self, id: &str) -> AlertResponse<AckOutcome> {
        debug!(%id, "acknowledge: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(AlertCommand::Acknowledge {
                id: id.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| AlertError::ChannelError)?;
        reply_rx.await.map_err(|_| AlertError::ChannelError)
    }

    /// Get an alert by ID
    pub async fn get(&self, id: &str) -> AlertResponse<Option<Alert>> {
        debug!(%id, "get: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(AlertCommand::Get {
                id: id.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| AlertError::ChannelError)?;
        reply_rx.await.map_err(|_| AlertError::ChannelError)
    }

    /// List all alerts, most recent first
    pub async fn list(&self) -> AlertResponse<Vec<Alert>> {
        debug!("list: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(AlertCommand::List { reply: reply_tx })
            .await
            .map_err(|_| AlertError::ChannelError)?;
        reply_rx.await.map_err(|_| AlertError::ChannelError)
    }

    /// Alerts still waiting for a counselor, most recent first
    pub async fn new_alerts(&self) -> AlertResponse<Vec<Alert>> {
        debug!("new_alerts: called");
        Ok(self.list().await?.into_iter().filter(Alert::is_new).collect())
    }

    /// Stop the actor
    pub async fn shutdown(&self) -> AlertResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(AlertCommand::Shutdown)
            .await
            .map_err(|_| AlertError::ChannelError)
    }
}

/// The actor loop that owns the AlertBook and processes commands
async fn actor_loop(mut book: AlertBook, mut rx: mpsc::Receiver<AlertCommand>, events: Arc<EventBus>) {
    debug!("AlertRegistry actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            AlertCommand::Raise {
                student_id,
                student_name,
                reason,
                reply,
            } => {
                debug!(%student_id, "actor_loop: Raise command");
                let result = book.raise(&student_id, &student_name, &reason);
                if let Ok(alert) = &result {
                    info!(alert_id = %alert.id, student_id = %alert.student_id, "SOS alert raised");
                    events.emit(CareEvent::AlertRaised { alert: alert.clone() });
                }
                let _ = reply.send(result);
            }

            AlertCommand::Acknowledge { id, reply } => {
                debug!(%id, "actor_loop: Acknowledge command");
                let outcome = book.acknowledge(&id);
                if outcome.changed()
                    && let Some(alert) = book.get(&id)
                {
                    info!(alert_id = %id, "SOS alert acknowledged");
                    events.emit(CareEvent::AlertAcknowledged {
                        alert_id: alert.id.clone(),
                        student_id: alert.student_id.clone(),
                    });
                }
                let _ = reply.send(outcome);
            }

            AlertCommand::Get { id, reply } => {
                debug!(%id, "actor_loop: Get command");
                let _ = reply.send(book.get(&id).cloned());
            }

            AlertCommand::List { reply } => {
                debug!(count = book.len(), "actor_loop: List command");
                let _ = reply.send(book.list());
            }

            AlertCommand::Shutdown => {
                info!("AlertRegistry shutting down");
                break;
            }
        }
    }

    debug!("AlertRegistry actor stopped");
}
