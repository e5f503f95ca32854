//! SessionBook - the live sessions owned by the registry actor
//!
//! Sessions are keyed by session_id. Starting is compare-and-set: an id that
//! is already live, or a participant already in another live session, is
//! rejected instead of overwritten. Each user is in at most one live session.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{DEFAULT_GREETING, Message, Sender, Session};

use super::messages::{Delivered, SessionError};

#[derive(Debug)]
pub struct SessionBook {
    sessions: HashMap<String, Session>,
    greeting: String,
    next_epoch: u64,
}

impl Default for SessionBook {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}

impl SessionBook {
    /// Create an empty book; new sessions open with `greeting`
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            sessions: HashMap::new(),
            greeting: greeting.into(),
            next_epoch: 1,
        }
    }

    pub fn start(&mut self, session_id: &str, student_id: &str, counselor_id: &str) -> Result<Session, SessionError> {
        debug!(%session_id, %student_id, %counselor_id, "SessionBook::start: called");
        if session_id.trim().is_empty() || student_id.trim().is_empty() || counselor_id.trim().is_empty() {
            return Err(SessionError::InvalidSession(
                "session, student and counselor ids must not be empty".to_string(),
            ));
        }
        if student_id == counselor_id {
            return Err(SessionError::InvalidSession(format!(
                "{} cannot counsel themselves",
                student_id
            )));
        }
        if self.sessions.contains_key(session_id) {
            debug!(%session_id, "SessionBook::start: id already live");
            return Err(SessionError::SessionAlreadyActive(session_id.to_string()));
        }
        for user_id in [student_id, counselor_id] {
            if let Some(busy) = self.active_for(user_id) {
                debug!(%user_id, busy_session = %busy.session_id, "SessionBook::start: participant busy");
                return Err(SessionError::ParticipantBusy {
                    user_id: user_id.to_string(),
                    session_id: busy.session_id.clone(),
                });
            }
        }

        let epoch = self.next_epoch;
        self.next_epoch += 1;

        let session = Session::new(session_id, student_id, counselor_id, &self.greeting, epoch);
        self.sessions.insert(session_id.to_string(), session.clone());
        Ok(session)
    }

    /// Remove a live session, returning its final transcript
    pub fn end(&mut self, session_id: &str) -> Option<Session> {
        debug!(%session_id, "SessionBook::end: called");
        self.sessions.remove(session_id)
    }

    /// End every session the user takes part in
    pub fn end_for(&mut self, user_id: &str) -> Vec<Session> {
        debug!(%user_id, "SessionBook::end_for: called");
        let ids: Vec<String> = self
            .sessions
            .values()
            .filter(|s| s.involves(user_id))
            .map(|s| s.session_id.clone())
            .collect();
        let mut ended: Vec<Session> = ids.iter().filter_map(|id| self.sessions.remove(id)).collect();
        ended.sort_by_key(|s| s.epoch);
        ended
    }

    pub fn send_message(&mut self, session_id: &str, sender: Sender, text: &str) -> Result<Delivered, SessionError> {
        debug!(%session_id, %sender, "SessionBook::send_message: called");
        self.append(session_id, None, sender, text)
    }

    /// Append a timer-scheduled message, only if the session was not restarted since
    pub fn deliver_scheduled(
        &mut self,
        session_id: &str,
        epoch: u64,
        sender: Sender,
        text: &str,
    ) -> Result<Delivered, SessionError> {
        debug!(%session_id, epoch, %sender, "SessionBook::deliver_scheduled: called");
        self.append(session_id, Some(epoch), sender, text)
    }

    fn append(
        &mut self,
        session_id: &str,
        expected_epoch: Option<u64>,
        sender: Sender,
        text: &str,
    ) -> Result<Delivered, SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        let session = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NoActiveSession(session_id.to_string()))?;

        if let Some(epoch) = expected_epoch
            && session.epoch != epoch
        {
            return Err(SessionError::StaleSession {
                session_id: session_id.to_string(),
                epoch,
            });
        }

        let message = Message::new(sender, text);
        session.messages.push(message.clone());
        Ok(Delivered {
            session_id: session.session_id.clone(),
            student_id: session.student_id.clone(),
            counselor_id: session.counselor_id.clone(),
            message,
        })
    }

    pub fn get(&self, session_id: &str) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    /// The live session the user takes part in, if any
    pub fn active_for(&self, user_id: &str) -> Option<&Session> {
        self.sessions.values().find(|s| s.involves(user_id))
    }

    /// Snapshot of all live sessions, oldest first
    pub fn list(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.sessions.values().cloned().collect();
        sessions.sort_by_key(|s| s.epoch);
        sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_start_seeds_greeting() {
        let mut book = SessionBook::default();
        book.start("sess-1", "s1", "c1").unwrap();

        let session = book.get("sess-1").unwrap();
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].sender, Sender::Counselor);
        assert_eq!(session.messages[0].text, DEFAULT_GREETING);
    }

    #[test]
    fn test_start_send_scenario() {
        let mut book = SessionBook::default();
        book.start("sess-1", "s1", "c1").unwrap();
        book.send_message("sess-1", Sender::Student, "I'm anxious").unwrap();

        let session = book.get("sess-1").unwrap();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].sender, Sender::Student);
        assert_eq!(session.messages[1].text, "I'm anxious");
    }

    #[test]
    fn test_start_does_not_overwrite_live_session() {
        let mut book = SessionBook::default();
        book.start("sess-1", "s1", "c1").unwrap();
        book.send_message("sess-1", Sender::Student, "hello").unwrap();

        let err = book.start("sess-1", "s2", "c2").unwrap_err();
        assert_eq!(err, SessionError::SessionAlreadyActive("sess-1".to_string()));
        assert_eq!(book.get("sess-1").unwrap().messages.len(), 2);
    }

    #[test]
    fn test_participant_busy() {
        let mut book = SessionBook::default();
        book.start("sess-1", "s1", "c1").unwrap();

        let err = book.start("sess-2", "s1", "c2").unwrap_err();
        assert!(matches!(err, SessionError::ParticipantBusy { ref user_id, .. } if user_id == "s1"));

        let err = book.start("sess-3", "s2", "c1").unwrap_err();
        assert!(matches!(err, SessionError::ParticipantBusy { ref user_id, .. } if user_id == "c1"));

        // Different pair runs concurrently
        book.start("sess-4", "s2", "c2").unwrap();
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_start_rejects_invalid_ids() {
        let mut book = SessionBook::default();
        assert!(matches!(book.start("", "s1", "c1"), Err(SessionError::InvalidSession(_))));
        assert!(matches!(book.start("sess-1", "u1", "u1"), Err(SessionError::InvalidSession(_))));
        assert!(book.is_empty());
    }

    #[test]
    fn test_end_then_send_fails() {
        let mut book = SessionBook::default();
        book.start("sess-1", "s1", "c1").unwrap();

        let ended = book.end("sess-1").unwrap();
        assert_eq!(ended.session_id, "sess-1");
        assert!(book.get("sess-1").is_none());
        assert!(book.end("sess-1").is_none());

        let err = book.send_message("sess-1", Sender::Student, "anyone there?").unwrap_err();
        assert_eq!(err, SessionError::NoActiveSession("sess-1".to_string()));
    }

    #[test]
    fn test_empty_message_rejected() {
        let mut book = SessionBook::default();
        book.start("sess-1", "s1", "c1").unwrap();
        assert_eq!(
            book.send_message("sess-1", Sender::Student, "  ").unwrap_err(),
            SessionError::EmptyMessage
        );
        assert_eq!(book.get("sess-1").unwrap().messages.len(), 1);
    }

    #[test]
    fn test_deliver_scheduled_checks_epoch() {
        let mut book = SessionBook::default();
        let first = book.start("sess-1", "s1", "c1").unwrap();
        book.end("sess-1");
        let second = book.start("sess-1", "s1", "c1").unwrap();
        assert!(second.epoch > first.epoch);

        let err = book
            .deliver_scheduled("sess-1", first.epoch, Sender::Student, "late reply")
            .unwrap_err();
        assert!(matches!(err, SessionError::StaleSession { .. }));
        assert_eq!(book.get("sess-1").unwrap().messages.len(), 1);

        book.deliver_scheduled("sess-1", second.epoch, Sender::Student, "on time")
            .unwrap();
        assert_eq!(book.get("sess-1").unwrap().messages.len(), 2);
    }

    #[test]
    fn test_end_for_and_active_for() {
        let mut book = SessionBook::default();
        book.start("sess-1", "s1", "c1").unwrap();
        book.start("sess-2", "s2", "c2").unwrap();

        assert_eq!(book.active_for("s1").unwrap().session_id, "sess-1");
        assert_eq!(book.active_for("c2").unwrap().session_id, "sess-2");
        assert!(book.active_for("admin").is_none());

        let ended = book.end_for("c1");
        assert_eq!(ended.len(), 1);
        assert_eq!(ended[0].session_id, "sess-1");
        assert!(book.active_for("s1").is_none());
        assert_eq!(book.list().len(), 1);
    }

    #[test]
    fn test_custom_greeting() {
        let mut book = SessionBook::new("Welcome back.");
        let session = book.start("sess-1", "s1", "c1").unwrap();
        assert_eq!(session.messages[0].text, "Welcome back.");
    }

    fn sender_strategy() -> impl Strategy<Value = Sender> {
        prop_oneof![Just(Sender::Student), Just(Sender::Counselor)]
    }

    proptest! {
        #[test]
        fn prop_send_appends_in_call_order(msgs in prop::collection::vec((sender_strategy(), "[a-z]{1,20}"), 0..40)) {
            let mut book = SessionBook::default();
            book.start("sess-1", "s1", "c1").unwrap();

            for (sender, text) in &msgs {
                book.send_message("sess-1", *sender, text).unwrap();
            }

            let session = book.get("sess-1").unwrap();
            prop_assert_eq!(session.messages.len(), msgs.len() + 1);
            for (message, (sender, text)) in session.messages[1..].iter().zip(&msgs) {
                prop_assert_eq!(message.sender, *sender);
                prop_assert_eq!(&message.text, text);
            }
        }

        #[test]
        fn prop_each_user_in_at_most_one_session(pairs in prop::collection::vec((0u8..5, 0u8..5), 1..30)) {
            let mut book = SessionBook::default();
            for (i, (student, counselor)) in pairs.iter().enumerate() {
                let _ = book.start(&format!("sess-{}", i), &format!("s{}", student), &format!("c{}", counselor));
            }

            let sessions = book.list();
            for user in (0..5).flat_map(|n| [format!("s{}", n), format!("c{}", n)]) {
                let count = sessions.iter().filter(|s| s.involves(&user)).count();
                prop_assert!(count <= 1);
            }
        }
    }
}
