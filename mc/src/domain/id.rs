//! Identifier generation
//!
//! All generated IDs use the format: `{prefix}-{uuid-v7-hex}`
//! Example: `SOS-0193a2f4c1d87b3e9f2a6c1d0e4b5a7f`
//!
//! UUIDv7 is time-ordered, so IDs minted later sort after earlier ones.

/// Prefix for SOS alert IDs
pub const ALERT_PREFIX: &str = "SOS";

/// Prefix for chat message IDs
pub const MESSAGE_PREFIX: &str = "msg";

/// Generate a fresh ID with the given prefix
pub fn generate_id(prefix: &str) -> String {
    let uuid = uuid::Uuid::now_v7();
    format!("{}-{}", prefix, uuid.simple())
}

/// Prefix of the session opened when a counselor answers an SOS alert
pub const SOS_SESSION_PREFIX: &str = "session-SOS";

/// Session ID used when a counselor answers an SOS alert: `session-SOS-<alert id>`
///
/// Alert ids carry their own `SOS-` prefix, so the full id reads
/// `session-SOS-SOS-…`.
pub fn sos_session_id(alert_id: &str) -> String {
    format!("{}-{}", SOS_SESSION_PREFIX, alert_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_has_prefix() {
        let id = generate_id(ALERT_PREFIX);
        assert!(id.starts_with("SOS-"));
        assert_eq!(id.len(), "SOS-".len() + 32);
    }

    #[test]
    fn test_generate_id_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id(MESSAGE_PREFIX)).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_sos_session_id() {
        assert_eq!(sos_session_id("SOS-abc"), "session-SOS-SOS-abc");
        let alert_id = generate_id(ALERT_PREFIX);
        assert_eq!(sos_session_id(&alert_id), format!("session-SOS-{}", alert_id));
    }
}
