//! SOS alert registry with actor pattern
//!
//! AlertRegistry owns the AlertBook and processes messages via channels,
//! giving every dashboard the same ordered view of alert state.

mod book;
mod messages;
mod registry;

pub use book::AlertBook;
pub use messages::{AckOutcome, AlertCommand, AlertError, AlertResponse};
pub use registry::AlertRegistry;
