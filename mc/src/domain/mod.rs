//! Domain types for MindCare
//!
//! Core domain types: Alert, Session, Message, User.

mod alert;
mod id;
mod session;
mod user;

pub use alert::{Alert, AlertStatus};
pub use id::{ALERT_PREFIX, MESSAGE_PREFIX, SOS_SESSION_PREFIX, generate_id, sos_session_id};
pub use session::{DEFAULT_GREETING, Message, Sender, Session};
pub use user::{Role, StudentProfile, User};
