//! ReplyScheduler - timer-scheduled simulated replies
//!
//! Each scheduled reply is a spawned task that sleeps for a random delay and
//! then delivers its text into the session it was scheduled for. Pending
//! replies are aborted when that session ends, and delivery is guarded by the
//! session epoch, so a reply racing the abort is dropped instead of landing in
//! an ended or restarted session.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ReplyConfig;
use crate::domain::{Sender, Session};
use crate::events::{CareEvent, EventBus};
use crate::sessions::{SessionError, SessionRegistry};

use super::responder::Responder;

/// Pending reply tasks keyed by (session_id, epoch)
type PendingReplies = Arc<Mutex<HashMap<(String, u64), Vec<JoinHandle<()>>>>>;

/// Schedules simulated replies and cancels them with their session
#[derive(Clone)]
pub struct ReplyScheduler {
    sessions: SessionRegistry,
    responder: Arc<dyn Responder>,
    config: ReplyConfig,
    pending: PendingReplies,
}

impl ReplyScheduler {
    /// Create the scheduler and start the task that cancels replies on session end
    pub fn spawn(
        sessions: SessionRegistry,
        events: &EventBus,
        responder: Arc<dyn Responder>,
        config: ReplyConfig,
    ) -> Self {
        debug!(?config, "ReplyScheduler::spawn: called");
        let pending: PendingReplies = Arc::new(Mutex::new(HashMap::new()));

        tokio::spawn(cancel_on_end(events.subscribe(), pending.clone()));

        info!("ReplyScheduler spawned");
        Self {
            sessions,
            responder,
            config,
            pending,
        }
    }

    /// Schedule a reply spoken as `speaker` into `session`
    ///
    /// Returns the chosen delay, or `None` when replies are disabled or the
    /// responder has nothing to say.
    pub async fn schedule(&self, session: &Session, speaker: Sender, prompt: &str) -> Option<Duration> {
        debug!(session_id = %session.session_id, epoch = session.epoch, %speaker, "schedule: called");
        if !self.config.enabled {
            debug!("schedule: replies disabled");
            return None;
        }
        let text = self.responder.reply(speaker, prompt)?;
        let delay = pick_delay(&self.config);

        let sessions = self.sessions.clone();
        let pending = self.pending.clone();
        let key = (session.session_id.clone(), session.epoch);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let (session_id, epoch) = &task_key;
            match sessions.deliver_scheduled(session_id, *epoch, speaker, &text).await {
                Ok(message) => debug!(%session_id, message_id = %message.id, "Scheduled reply delivered"),
                Err(e @ (SessionError::StaleSession { .. } | SessionError::NoActiveSession(_))) => {
                    // The session this reply belonged to is gone; so are its siblings
                    pending.lock().await.remove(&task_key);
                    debug!(%session_id, error = %e, "Scheduled reply dropped");
                }
                Err(e) => debug!(%session_id, error = %e, "Scheduled reply dropped"),
            }
        });

        let mut pending = self.pending.lock().await;
        prune_finished(&mut pending);
        pending.entry(key).or_default().push(handle);

        debug!(?delay, "schedule: reply scheduled");
        Some(delay)
    }

    /// Abort every pending reply for a session id; returns how many were aborted
    pub async fn cancel(&self, session_id: &str) -> usize {
        debug!(%session_id, "cancel: called");
        let mut pending = self.pending.lock().await;
        let keys: Vec<(String, u64)> = pending.keys().filter(|(id, _)| id == session_id).cloned().collect();
        keys.iter()
            .filter_map(|key| pending.remove(key))
            .map(abort_all)
            .sum()
    }

    /// Number of replies still waiting to fire for a session id
    pub async fn pending_count(&self, session_id: &str) -> usize {
        let pending = self.pending.lock().await;
        pending
            .iter()
            .filter(|((id, _), _)| id == session_id)
            .flat_map(|(_, handles)| handles.iter())
            .filter(|h| !h.is_finished())
            .count()
    }
}

fn pick_delay(config: &ReplyConfig) -> Duration {
    if config.min_delay_ms >= config.max_delay_ms {
        return config.min_delay();
    }
    Duration::from_millis(rand::rng().random_range(config.min_delay_ms..=config.max_delay_ms))
}

/// Drop finished handles and the keys left with none
fn prune_finished(pending: &mut HashMap<(String, u64), Vec<JoinHandle<()>>>) {
    pending.retain(|_, handles| {
        handles.retain(|h| !h.is_finished());
        !handles.is_empty()
    });
}

fn abort_all(handles: Vec<JoinHandle<()>>) -> usize {
    let mut aborted = 0;
    for handle in handles {
        if !handle.is_finished() {
            handle.abort();
            aborted += 1;
        }
    }
    aborted
}

/// Abort pending replies whenever a session ends
async fn cancel_on_end(mut rx: tokio::sync::broadcast::Receiver<CareEvent>, pending: PendingReplies) {
    debug!("cancel_on_end: started");
    loop {
        match rx.recv().await {
            Ok(CareEvent::SessionEnded { session_id, epoch, .. }) => {
                let handles = pending.lock().await.remove(&(session_id.clone(), epoch));
                if let Some(handles) = handles {
                    let aborted = abort_all(handles);
                    debug!(%session_id, epoch, aborted, "cancel_on_end: aborted pending replies");
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Reply scheduler lagged behind the event bus");
            }
            Err(RecvError::Closed) => break,
        }
    }
    debug!("cancel_on_end: stopped");
}
