//! Mock authentication
//!
//! A fixed user directory plus a persisted login record.

mod directory;
mod store;

pub use directory::UserDirectory;
pub use store::{APP_KEY, LoginStore};
