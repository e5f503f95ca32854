//! Simulated session replies
//!
//! The other side of a session is simulated by a [`Responder`] whose reply is
//! delivered after a delay by the [`ReplyScheduler`].

mod responder;
mod scheduler;

pub use responder::{CannedResponder, Responder};
pub use scheduler::ReplyScheduler;
