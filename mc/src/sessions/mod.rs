//! Counseling session registry with actor pattern
//!
//! SessionRegistry owns the SessionBook and processes messages via channels.
//! Sessions are keyed by id; each participant is in at most one live session.

mod book;
mod messages;
mod registry;

pub use book::SessionBook;
pub use messages::{Delivered, SessionCommand, SessionError, SessionResponse};
pub use registry::SessionRegistry;
