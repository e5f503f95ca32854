//! SessionRegistry - actor that owns the SessionBook
//!
//! Processes commands via channels so the student and counselor views of a
//! session always agree on its transcript. The actor emits each event right
//! after the change it describes, so event order on the bus is transcript
//! order, whichever handle made the change.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::domain::{Message, Sender, Session};
use crate::events::{CareEvent, EventBus};

use super::book::SessionBook;
use super::messages::{Delivered, SessionCommand, SessionError, SessionResponse};

/// Handle to send commands to the SessionRegistry
#[derive(Clone)]
pub struct SessionRegistry {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionRegistry {
    /// Spawn a new SessionRegistry actor; sessions open with `greeting`
    pub fn spawn(events: Arc<EventBus>, greeting: impl Into<String>) -> Self {
        debug!("SessionRegistry::spawn: called");
        let (tx, rx) = mpsc::channel(256);

        tokio::spawn(actor_loop(SessionBook::new(greeting), rx, events));

        info!("SessionRegistry spawned");
        Self { tx }
    }

    /// Start a session between a student and a counselor
    pub async fn start(&self, session_id: &str, student_id: &str, counselor_id: &str) -> SessionResponse<Session> {
        debug!(%session_id, %student_id, %counselor_id, "start: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::Start {
                session_id: session_id.to_string(),
                student_id: student_id.to_string(),
                counselor_id: counselor_id.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::ChannelError)?;
        reply_rx.await.map_err(|_| SessionError::ChannelError)?
    }

    /// End a session; `None` if it was not live
    pub async fn end(&self, session_id: &str) -> SessionResponse<Option<Session>> {
        debug!(%session_id, "end: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::End {
                session_id: session_id.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::ChannelError)?;
        reply_rx.await.map_err(|_| SessionError::ChannelError)
    }

    /// End every session the user takes part in (logout)
    pub async fn end_for(&self, user_id: &str) -> SessionResponse<Vec<Session>> {
        debug!(%user_id, "end_for: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::EndFor {
                user_id: user_id.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::ChannelError)?;
        reply_rx.await.map_err(|_| SessionError::ChannelError)
    }

    /// Append a message to a live session
    pub async fn send_message(&self, session_id: &str, sender: Sender, text: &str) -> SessionResponse<Message> {
        debug!(%session_id, %sender, "send_message: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::SendMessage {
                session_id: session_id.to_string(),
                sender,
                text: text.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::ChannelError)?;
        let delivered = reply_rx.await.map_err(|_| SessionError::ChannelError)??;
        Ok(delivered.message)
    }

    /// Append a timer-scheduled message if the session with this epoch is still live
    pub async fn deliver_scheduled(
        &self,
        session_id: &str,
        epoch: u64,
        sender: Sender,
        text: &str,
    ) -> SessionResponse<Message> {
        debug!(%session_id, epoch, %sender, "deliver_scheduled: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::DeliverScheduled {
                session_id: session_id.to_string(),
                epoch,
                sender,
                text: text.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::ChannelError)?;
        let delivered = reply_rx.await.map_err(|_| SessionError::ChannelError)??;
        Ok(delivered.message)
    }

    /// Get a live session by ID
    pub async fn get(&self, session_id: &str) -> SessionResponse<Option<Session>> {
        debug!(%session_id, "get: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::Get {
                session_id: session_id.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::ChannelError)?;
        reply_rx.await.map_err(|_| SessionError::ChannelError)
    }

    /// The live session the user takes part in, if any
    pub async fn active_for(&self, user_id: &str) -> SessionResponse<Option<Session>> {
        debug!(%user_id, "active_for: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::ActiveFor {
                user_id: user_id.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::ChannelError)?;
        reply_rx.await.map_err(|_| SessionError::ChannelError)
    }

    /// All live sessions, oldest first
    pub async fn list(&self) -> SessionResponse<Vec<Session>> {
        debug!("list: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::List { reply: reply_tx })
            .await
            .map_err(|_| SessionError::ChannelError)?;
        reply_rx.await.map_err(|_| SessionError::ChannelError)
    }

    /// Stop the actor
    pub async fn shutdown(&self) -> SessionResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| SessionError::ChannelError)
    }
}

fn emit_started(events: &EventBus, session: &Session) {
    info!(session_id = %session.session_id, epoch = session.epoch, "Session started");
    events.emit(CareEvent::SessionStarted {
        session_id: session.session_id.clone(),
        student_id: session.student_id.clone(),
        counselor_id: session.counselor_id.clone(),
    });
    // The seeded greeting is part of the transcript too
    if let Some(greeting) = session.last_message() {
        events.emit(CareEvent::MessageAppended {
            session_id: session.session_id.clone(),
            student_id: session.student_id.clone(),
            counselor_id: session.counselor_id.clone(),
            message: greeting.clone(),
        });
    }
}

fn emit_delivered(events: &EventBus, delivered: &Delivered) {
    events.emit(CareEvent::MessageAppended {
        session_id: delivered.session_id.clone(),
        student_id: delivered.student_id.clone(),
        counselor_id: delivered.counselor_id.clone(),
        message: delivered.message.clone(),
    });
}

fn emit_ended(events: &EventBus, session: &Session) {
    info!(
        session_id = %session.session_id,
        messages = session.messages.len(),
        "Session ended"
    );
    events.emit(CareEvent::SessionEnded {
        session_id: session.session_id.clone(),
        epoch: session.epoch,
        student_id: session.student_id.clone(),
        counselor_id: session.counselor_id.clone(),
        message_count: session.messages.len(),
    });
}

/// The actor loop that owns the SessionBook and processes commands
async fn actor_loop(mut book: SessionBook, mut rx: mpsc::Receiver<SessionCommand>, events: Arc<EventBus>) {
    debug!("SessionRegistry actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            SessionCommand::Start {
                session_id,
                student_id,
                counselor_id,
                reply,
            } => {
                debug!(%session_id, "actor_loop: Start command");
                let result = book.start(&session_id, &student_id, &counselor_id);
                if let Ok(session) = &result {
                    emit_started(&events, session);
                }
                let _ = reply.send(result);
            }

            SessionCommand::End { session_id, reply } => {
                debug!(%session_id, "actor_loop: End command");
                let ended = book.end(&session_id);
                match &ended {
                    Some(session) => emit_ended(&events, session),
                    None => debug!(%session_id, "actor_loop: session was not live"),
                }
                let _ = reply.send(ended);
            }

            SessionCommand::EndFor { user_id, reply } => {
                debug!(%user_id, "actor_loop: EndFor command");
                let ended = book.end_for(&user_id);
                for session in &ended {
                    emit_ended(&events, session);
                }
                let _ = reply.send(ended);
            }

            SessionCommand::SendMessage {
                session_id,
                sender,
                text,
                reply,
            } => {
                debug!(%session_id, %sender, "actor_loop: SendMessage command");
                let result = book.send_message(&session_id, sender, &text);
                if let Ok(delivered) = &result {
                    emit_delivered(&events, delivered);
                }
                let _ = reply.send(result);
            }

            SessionCommand::DeliverScheduled {
                session_id,
                epoch,
                sender,
                text,
                reply,
            } => {
                debug!(%session_id, epoch, "actor_loop: DeliverScheduled command");
                let result = book.deliver_scheduled(&session_id, epoch, sender, &text);
                if let Ok(delivered) = &result {
                    emit_delivered(&events, delivered);
                }
                let _ = reply.send(result);
            }

            SessionCommand::Get { session_id, reply } => {
                debug!(%session_id, "actor_loop: Get command");
                let _ = reply.send(book.get(&session_id).cloned());
            }

            SessionCommand::ActiveFor { user_id, reply } => {
                debug!(%user_id, "actor_loop: ActiveFor command");
                let _ = reply.send(book.active_for(&user_id).cloned());
            }

            SessionCommand::List { reply } => {
                debug!(count = book.len(), "actor_loop: List command");
                let _ = reply.send(book.list());
            }

            SessionCommand::Shutdown => {
                info!("SessionRegistry shutting down");
                break;
            }
        }
    }

    debug!("SessionRegistry actor stopped");
}
